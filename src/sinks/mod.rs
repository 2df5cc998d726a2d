//! Append-only JSON-lines record stream shared by concurrent workers.
mod records;


pub use records::{RecordSink, read_records};
