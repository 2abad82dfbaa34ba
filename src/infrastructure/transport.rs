//! 上传通道 - 基础设施层
//!
//! 只暴露"把一组文件以 multipart 方式 POST 到某个接口"的能力，
//! 由调用方注入，测试中可以替换成假实现。

use crate::error::UploadError;
use crate::models::{ImportResponse, RawFile};
use futures::future::BoxFuture;

pub type UploadFuture<'a> = BoxFuture<'a, Result<ImportResponse, UploadError>>;

/// 上传通道
pub trait UploadTransport: Send + Sync {
    /// 上传文件
    ///
    /// # 参数
    /// - `endpoint`: 接口路径，如 `/facturas/importar`
    /// - `field`: multipart 字段名，每个文件一个同名字段
    /// - `files`: 要上传的文件
    fn upload<'a>(
        &'a self,
        endpoint: &'a str,
        field: &'a str,
        files: &'a [RawFile],
    ) -> UploadFuture<'a>;
}
