//! 轻量 XML 树
//!
//! 基于 `quick-xml` 的事件流构建一棵只含元素名和文本的树，
//! 提供"按名称查找第一个匹配元素"和"取文本内容"两种能力。
//! 元素名只比较本地名，忽略命名空间前缀；属性不保留。

use crate::error::ParseError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// 树节点
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// XML 元素
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    children: Vec<XmlNode>,
}

impl XmlElement {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 直接子元素
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// 按名称查找直接子元素
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    /// 先序遍历查找第一个匹配的元素（包括自身），不限深度
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        if self.name == name {
            return Some(self);
        }
        self.elements().find_map(|element| element.find(name))
    }

    /// 所有后代文本按文档顺序拼接
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    /// 查找元素并返回去掉首尾空白的文本，找不到时返回空字符串
    pub fn find_text(&self, name: &str) -> String {
        self.find(name)
            .map(|element| element.text_content().trim().to_string())
            .unwrap_or_default()
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Element(element) => element.collect_text(out),
                XmlNode::Text(text) => out.push_str(text),
            }
        }
    }
}

/// 解析 XML 文本，返回根元素
///
/// 语法错误、未闭合标签、多个根元素都视为错误。
pub fn parse_document(xml: &str) -> Result<XmlElement, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(source) => {
                return Err(ParseError::Syntax {
                    position: reader.buffer_position(),
                    source,
                })
            }
        };

        match event {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                stack.push(XmlElement::new(name));
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                attach(&mut stack, &mut root, XmlElement::new(name))?;
            }
            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| ParseError::UnexpectedClosingTag {
                    tag: String::from_utf8_lossy(end.local_name().as_ref()).into_owned(),
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let unescaped = match text.unescape() {
                        Ok(unescaped) => unescaped.into_owned(),
                        Err(source) => {
                            return Err(ParseError::Syntax {
                                position: reader.buffer_position(),
                                source,
                            })
                        }
                    };
                    parent.children.push(XmlNode::Text(unescaped));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    parent.children.push(XmlNode::Text(raw));
                }
            }
            Event::Eof => break,
            // 声明、注释、处理指令、DOCTYPE 都不需要
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::Unclosed { tag: open.name });
    }

    root.ok_or(ParseError::NoRootElement)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(ParseError::TrailingElement { tag: element.name }),
    }
    Ok(())
}
