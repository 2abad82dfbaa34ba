//! 基础设施层：持有稀缺资源（HTTP 客户端），只暴露能力

pub mod http_transport;
pub mod transport;

pub use http_transport::HttpTransport;
pub use transport::{UploadFuture, UploadTransport};
