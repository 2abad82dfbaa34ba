pub mod invoice;
pub mod loaders;
pub mod preview;
pub mod raw_file;
pub mod report;
pub mod submission;

pub use invoice::InvoiceRecord;
pub use loaders::load_input_files;
pub use preview::{FilePreview, PreviewStatus, QueueSnapshot};
pub use raw_file::RawFile;
pub use report::{BatchReport, ItemReport};
pub use submission::{FileErrorEntry, ImportResponse, SubmissionResult};
