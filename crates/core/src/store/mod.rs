//! Store module - in-memory record storage that reports its mutations.

mod record_store;

pub use record_store::{Record, RecordStore};
