//! HTTP 上传通道 - 基础设施层
//!
//! 持有唯一的 `reqwest::Client`，会话 Cookie 原样附加到每个请求。

use crate::config::Config;
use crate::error::UploadError;
use crate::infrastructure::transport::{UploadFuture, UploadTransport};
use crate::models::{ImportResponse, RawFile};
use anyhow::{Context, Result};
use reqwest::header::COOKIE;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// 基于 reqwest 的上传通道
pub struct HttpTransport {
    client: Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl HttpTransport {
    /// 创建新的上传通道
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("无法创建 HTTP 客户端")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session_cookie: config.session_cookie.clone(),
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn post_files(
        &self,
        endpoint: &str,
        field: &str,
        files: &[RawFile],
    ) -> Result<ImportResponse, UploadError> {
        let url = self.build_url(endpoint);

        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes().to_vec()).file_name(file.name().to_string());
            form = form.part(field.to_string(), part);
        }

        debug!("上传 {} 个文件到 {}", files.len(), url);

        let mut request = self.client.post(&url).multipart(form);
        if let Some(cookie) = &self.session_cookie {
            request = request.header(COOKIE, cookie.as_str());
        }

        let response = request.send().await.map_err(|source| UploadError::Request {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("上传失败 {}: status={}, body={}", endpoint, status, body);
            return Err(UploadError::Rejected {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: extract_message(&body),
            });
        }

        response
            .json::<ImportResponse>()
            .await
            .map_err(|source| UploadError::InvalidResponse {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

impl UploadTransport for HttpTransport {
    fn upload<'a>(
        &'a self,
        endpoint: &'a str,
        field: &'a str,
        files: &'a [RawFile],
    ) -> UploadFuture<'a> {
        Box::pin(self.post_files(endpoint, field, files))
    }
}

/// 从错误响应体中提取 `message` 字段
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileErrorEntry;
    use mockito::Matcher;

    fn transport_for(server: &mockito::Server, cookie: Option<&str>) -> HttpTransport {
        let config = Config {
            api_base_url: format!("{}/", server.url()),
            session_cookie: cookie.map(str::to_string),
            request_timeout_secs: 5,
            ..Config::default()
        };
        HttpTransport::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_upload_sends_files_and_cookie() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/facturas/importar")
            .match_header("cookie", "sessionid=abc123")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"filename="b\.xml""#.to_string()),
                Matcher::Regex(r#"filename="c\.xml""#.to_string()),
                Matcher::Regex("xml_files".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"imported":[41,42],"errors":[]}"#)
            .create_async()
            .await;

        let transport = transport_for(&server, Some("sessionid=abc123"));
        let files = vec![
            RawFile::new("b.xml", "<factura/>"),
            RawFile::new("c.xml", "<factura/>"),
        ];

        let response = transport
            .upload("/facturas/importar", "xml_files[]", &files)
            .await
            .unwrap();

        assert_eq!(response.imported, vec![41, 42]);
        assert!(response.errors.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_parses_reported_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/import-sri-txt")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"imported":[],"errors":[{"file":"a.txt","error":"línea 3 inválida"}]}"#)
            .create_async()
            .await;

        let transport = transport_for(&server, None);
        let response = transport
            .upload("/import-sri-txt", "file", &[RawFile::new("a.txt", "x")])
            .await
            .unwrap();

        assert_eq!(
            response.errors,
            vec![FileErrorEntry::new("a.txt", "línea 3 inválida")]
        );
    }

    #[tokio::test]
    async fn test_rejection_carries_server_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/facturas/importar")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"server error"}"#)
            .create_async()
            .await;

        let transport = transport_for(&server, None);
        let err = transport
            .upload("/facturas/importar", "xml_files[]", &[RawFile::new("b.xml", "")])
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::Rejected { status: 500, .. }));
        assert_eq!(err.server_message(), Some("server error"));
    }

    #[tokio::test]
    async fn test_rejection_without_json_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/facturas/importar")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let transport = transport_for(&server, None);
        let err = transport
            .upload("/facturas/importar", "xml_files[]", &[RawFile::new("b.xml", "")])
            .await
            .unwrap_err();

        assert_eq!(err.server_message(), None);
    }

    #[tokio::test]
    async fn test_invalid_success_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/import-sri-txt")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let transport = transport_for(&server, None);
        let err = transport
            .upload("/import-sri-txt", "file", &[RawFile::new("a.txt", "")])
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::InvalidResponse { .. }));
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(extract_message(r#"{"message":" duplicada "}"#).as_deref(), Some("duplicada"));
        assert_eq!(extract_message(r#"{"message":""}"#), None);
        assert_eq!(extract_message(r#"{"detail":"x"}"#), None);
        assert_eq!(extract_message("not json"), None);
    }
}
