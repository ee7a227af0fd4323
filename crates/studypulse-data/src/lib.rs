//! studypulse-data: flat-table I/O and dataset collaborators.
//!
//! Everything the core pipeline treats as an external collaborator lives
//! here: CSV ingestion with schema validation, manual-entry conversion
//! against the question bank, and the seeded synthetic dataset generator.

pub mod bank;
pub mod error;
pub mod generate;
pub mod ingest;
pub mod manual;

pub use error::IngestError;
