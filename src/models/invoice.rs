use crate::models::raw_file::RawFile;
use crate::utils::logging::truncate_text;
use serde::Serialize;

/// 规范化后的发票记录
///
/// 业务字段可能为空字符串，只要文档结构符合发票格式即视为有效。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    /// 访问码（唯一标识一张税务凭证）
    pub access_key: String,
    /// 开票日期，原样保留
    pub issue_date: String,
    /// 开票方名称
    pub issuer_name: String,
    /// 购买方名称
    pub buyer_name: String,
    /// 总金额，缺失或无法解析时为 0
    pub total_amount: f64,
    pub source_filename: String,
    /// 原始文件，用于之后上传
    #[serde(skip)]
    pub raw: RawFile,
}

impl std::fmt::Display for InvoiceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 名称截断到 30 个字符，方便在日志中对齐
        write!(
            f,
            "{} | {} | {} | {:.2}",
            self.source_filename,
            self.issue_date,
            truncate_text(&self.issuer_name, 30),
            self.total_amount
        )
    }
}
