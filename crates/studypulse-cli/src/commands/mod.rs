pub mod generate;
pub mod ingest;
pub mod init;
pub mod report;
pub mod score;
pub mod summary;
