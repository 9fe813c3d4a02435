//! Infrastructure collaborators for the Intervo orchestration core.
//!
//! Record-store implementations (in-memory and TOML file) and the
//! plain-text file extraction collaborator.

pub mod memory_record_store;
pub mod text_extraction;
pub mod toml_record_store;

pub use memory_record_store::MemoryRecordStore;
pub use text_extraction::PlainTextExtractor;
pub use toml_record_store::TomlRecordStore;
