pub mod archive_expander;
pub mod invoice_parser;
pub mod notifier;
pub mod xml_tree;

pub use invoice_parser::DetectedShape;
pub use notifier::{NoticeLevel, NoticeWriter, Notifier};
pub use xml_tree::{XmlElement, XmlNode};
