//! # tagwatch-ingest: Inventory CSV In and Out
//!
//! Turns a cloud inventory CSV into a [`Dataset`] of
//! [`ResourceRecord`](tagwatch_core::ResourceRecord)s and writes record
//! collections back out with the same schema.
//!
//! ## Pipeline
//!
//! 1. **Header check** (`loader.rs`): every mapped column and every required
//!    tag column must be present, else `TagwatchError::Schema`.
//! 2. **Quoted-row recovery**: exports that wrap each whole line in quotes
//!    are unwrapped and re-parsed.
//! 3. **Row parsing**: cells are trimmed, cost is parsed as an exact decimal,
//!    unmapped columns are carried through.
//! 4. **Duplicates**: handled per [`DuplicatePolicy`]; the outcome is
//!    recorded in [`LoadSummary`].
//!
//! [`DatasetCache`] holds one loaded dataset until explicitly reloaded.
//! [`write_records`] is the inverse of loading.

pub mod cache;
pub mod columns;
pub mod export;
pub mod loader;

pub use cache::DatasetCache;
pub use columns::{ColumnMapping, DuplicatePolicy, LoadOptions};
pub use export::{export_path, write_records, CsvLayout, LEGACY_TAGGED_COLUMN};
pub use loader::{load_path, load_str, Dataset, LoadSummary};
