//! Structural editor for legacy BIFF8 workbook streams.
//!
//! A workbook stream is a flat sequence of variable-length records: workbook
//! globals first, then one substream per sheet, each delimited by `BOF`/`EOF`
//! markers. Record order is the on-wire order, and two pieces of structure
//! hang off it:
//! - each `BoundSheet8` descriptor stores the absolute byte offset of its
//!   sheet's `BOF` record, so any edit ahead of a sheet shifts offsets that
//!   other records depend on;
//! - sheet membership is recovered by scanning for the delimiters, not from
//!   an index.
//!
//! [`WorkbookStream`] keeps those invariants intact across edits. Every
//! mutator is value-producing: the source stream is never modified and stays
//! valid, so a failed edit leaves the caller exactly where they started.
//! Edits address records by structural equality rather than numeric index,
//! which stays stable across unrelated edits at the cost of an O(n) scan per
//! operation.

mod container;
mod error;
mod labels;
mod sheets;
mod stream;

pub use error::StreamError;
pub use labels::AUTO_OPEN_PREFIX;
pub use stream::WorkbookStream;

pub use xlstream_biff::{BoundSheet8, Lbl, Record};
