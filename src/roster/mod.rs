//! Bulk roster import pipeline
//!
//! Spreadsheet rows arrive as JSON objects keyed by the original column
//! headers (the file is parsed client-side). The pipeline runs in three
//! stages, sequentially within one request:
//!
//! 1. [`normalize`] maps each raw row to a canonical record shape,
//! 2. [`validate`] classifies each record as valid / warning / error,
//! 3. [`import`] creates one staff member per valid record, collecting
//!    per-row failures without aborting the batch.

pub mod import;
pub mod normalize;
pub mod validate;

pub use import::{run_import, ImportReport, RosterKind, RosterSink, SeaOrmRosterSink, SinkError};
pub use normalize::{normalize_row, NormalizedRecord};
pub use validate::{validate_row, RowResult, ALLOWED_IMPORT_ROLES};
