//! Minimal BIFF8 record codec for legacy workbook-stream editing.
//!
//! This crate is intentionally small: it models the physical record layer
//! (`[id: u16][len: u16][payload]`), parses and serializes whole streams with
//! an exact round-trip guarantee, and provides typed views over the handful
//! of record kinds that carry workbook structure:
//! - `BOF` / `EOF` (substream delimiters),
//! - `BoundSheet8` (sheet descriptor holding the byte offset of its sheet's
//!   `BOF`),
//! - `Lbl` (`NAME` records, including built-in names).
//!
//! Everything else is carried as opaque payload bytes. Record-level editing
//! semantics (ordering, offsets, sheet runs) live in `xlstream-edit`.

mod bound_sheet;
mod lbl;
mod records;
mod strings;

pub use bound_sheet::BoundSheet8;
pub use lbl::{Lbl, BUILTIN_AUTO_OPEN_NAME};
pub use records::{
    bof_record, eof_record, parse_records, write_records, CodecError, Record, RecordTypeError,
    BOF_DT_WORKBOOK_GLOBALS, BOF_DT_WORKSHEET, BOF_VERSION_BIFF8, RECORD_BOF, RECORD_BOUNDSHEET,
    RECORD_CODEPAGE, RECORD_EOF, RECORD_HEADER_LEN, RECORD_NAME,
};
