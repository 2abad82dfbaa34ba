//! 发票解析服务 - 业务能力层
//!
//! 只负责"把一份 XML 文本变成一条发票记录"，不关心队列和上传。
//!
//! ## 支持的两种文档形态
//! - **授权信封**：`<autorizacion>` 包裹一个 `<comprobante>`，其中是转义后的
//!   XML 文本（或 CDATA），需要二次解析才能拿到 `<factura>`；
//!   信封上的 `<fechaAutorizacion>` 作为开票日期的兜底值。
//! - **直接形态**：文档任意深度内直接包含 `<factura>`。
//!
//! 结构不符（找不到 `<factura>`，或缺少 `<infoTributaria>` / `<infoFactura>`）
//! 返回 `Ok(None)`；XML 语法错误返回 `Err`。

use crate::error::ParseError;
use crate::models::{InvoiceRecord, RawFile};
use crate::services::xml_tree::{self, XmlElement};
use regex::Regex;
use std::sync::OnceLock;

const WRAPPER_TAG: &str = "autorizacion";
const EMBEDDED_TAG: &str = "comprobante";
const AUTHORIZATION_DATE_TAG: &str = "fechaAutorizacion";
const INVOICE_TAG: &str = "factura";
const HEADER_TAG: &str = "infoTributaria";
const BODY_TAG: &str = "infoFactura";

const ACCESS_KEY_TAG: &str = "claveAcceso";
const ISSUER_NAME_TAG: &str = "razonSocial";
const ISSUE_DATE_TAG: &str = "fechaEmision";
const BUYER_NAME_TAG: &str = "razonSocialComprador";
const TOTAL_TAG: &str = "importeTotal";

/// 文档形态，每份文档只判定一次
#[derive(Debug, Clone, PartialEq)]
pub enum DetectedShape {
    /// 授权信封，`inner` 是二次解析得到的文档根
    Enveloped {
        authorization_date: String,
        inner: XmlElement,
    },
    /// 直接形态
    Direct { root: XmlElement },
}

impl DetectedShape {
    /// 判定文档形态，两种形态都找不到 `<factura>` 时返回 `None`
    pub fn detect(document: XmlElement) -> Result<Option<Self>, ParseError> {
        if let Some(shape) = Self::unwrap_envelope(&document)? {
            return Ok(Some(shape));
        }

        if document.find(INVOICE_TAG).is_some() {
            return Ok(Some(DetectedShape::Direct { root: document }));
        }

        Ok(None)
    }

    fn unwrap_envelope(document: &XmlElement) -> Result<Option<Self>, ParseError> {
        let Some(wrapper) = document.find(WRAPPER_TAG) else {
            return Ok(None);
        };
        let Some(embedded) = wrapper.child(EMBEDDED_TAG) else {
            return Ok(None);
        };

        let payload = normalize(&embedded.text_content());
        if payload.is_empty() {
            return Ok(None);
        }

        // 内容不是标记（普通文本）时按结构不符处理
        let inner = match xml_tree::parse_document(&payload) {
            Ok(inner) => inner,
            Err(ParseError::NoRootElement) => return Ok(None),
            Err(e) => return Err(e),
        };
        if inner.find(INVOICE_TAG).is_none() {
            return Ok(None);
        }

        Ok(Some(DetectedShape::Enveloped {
            authorization_date: wrapper.find_text(AUTHORIZATION_DATE_TAG),
            inner,
        }))
    }

    /// `<factura>` 元素
    pub fn invoice(&self) -> Option<&XmlElement> {
        match self {
            DetectedShape::Enveloped { inner, .. } => inner.find(INVOICE_TAG),
            DetectedShape::Direct { root } => root.find(INVOICE_TAG),
        }
    }

    /// 开票日期缺失时的兜底值（仅信封形态有）
    pub fn fallback_issue_date(&self) -> &str {
        match self {
            DetectedShape::Enveloped {
                authorization_date, ..
            } => authorization_date,
            DetectedShape::Direct { .. } => "",
        }
    }
}

/// 解析发票 XML
///
/// # 参数
/// - `xml_text`: 原始 XML 文本
/// - `source_name`: 来源文件名
///
/// # 返回
/// - `Ok(Some(record))`: 有效发票
/// - `Ok(None)`: 结构不符
/// - `Err(_)`: XML 语法错误
pub fn parse(xml_text: &str, source_name: &str) -> Result<Option<InvoiceRecord>, ParseError> {
    parse_with_raw(xml_text, RawFile::new(source_name, xml_text.as_bytes().to_vec()))
}

/// 解析已加载的文件
///
/// 记录中保存的是原文件本身（原始字节），上传时内容与输入完全一致，
/// 即使文件不是 UTF-8 编码。
pub fn parse_file(file: &RawFile) -> Result<Option<InvoiceRecord>, ParseError> {
    parse_with_raw(&file.text(), file.clone())
}

fn parse_with_raw(xml_text: &str, raw: RawFile) -> Result<Option<InvoiceRecord>, ParseError> {
    let document = xml_tree::parse_document(&normalize(xml_text))?;

    let Some(shape) = DetectedShape::detect(document)? else {
        return Ok(None);
    };
    let Some(invoice) = shape.invoice() else {
        return Ok(None);
    };
    let (Some(header), Some(body)) = (invoice.find(HEADER_TAG), invoice.find(BODY_TAG)) else {
        return Ok(None);
    };

    let mut issue_date = body.find_text(ISSUE_DATE_TAG);
    if issue_date.is_empty() {
        issue_date = shape.fallback_issue_date().to_string();
    }

    Ok(Some(InvoiceRecord {
        access_key: header.find_text(ACCESS_KEY_TAG),
        issue_date,
        issuer_name: header.find_text(ISSUER_NAME_TAG),
        buyer_name: body.find_text(BUYER_NAME_TAG),
        total_amount: parse_amount(&body.find_text(TOTAL_TAG)),
        source_filename: raw.name().to_string(),
        raw,
    }))
}

/// 去掉回车、换行以及字面的 `&#13;` / `&#10;` / `&#xD;` / `&#xA;` 实体，再去首尾空白
pub fn normalize(xml_text: &str) -> String {
    static LINE_BREAKS: OnceLock<Regex> = OnceLock::new();
    let re = LINE_BREAKS.get_or_init(|| {
        Regex::new(r"(?i)[\r\n]|&#0*1[03];|&#x0*[ad];").expect("换行匹配正则无效")
    });
    re.replace_all(xml_text, "").trim().to_string()
}

/// 解析金额：取开头的数字部分，空值、非数字、非有限值都按 0 处理
pub fn parse_amount(text: &str) -> f64 {
    static LEADING_NUMBER: OnceLock<Regex> = OnceLock::new();
    let re = LEADING_NUMBER.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("金额匹配正则无效")
    });

    re.find(text.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|amount| amount.is_finite())
        .unwrap_or(0.0)
}
