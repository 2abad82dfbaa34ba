pub mod ingestion_queue;

pub use ingestion_queue::IngestionQueue;
