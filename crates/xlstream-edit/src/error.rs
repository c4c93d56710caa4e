use thiserror::Error;

use xlstream_biff::{CodecError, RecordTypeError};

/// Failures surfaced by workbook-stream queries and edits.
///
/// Every public operation either returns a fully valid new stream or one of
/// these; there is no partial-success state and the source stream is never
/// left modified.
#[derive(Debug, Error)]
pub enum StreamError {
    /// A referenced record (edit target, insertion anchor, or sheet `BOF`)
    /// has no structural match in the stream.
    #[error("could not find {what}")]
    RecordNotFound { what: &'static str },

    /// A sheet substream is missing its terminating `EOF` record.
    #[error("sheet substream has no terminating EOF record")]
    UnterminatedSheet,

    /// `BoundSheet8` descriptors and sheet `BOF` records must pair
    /// one-to-one, in order.
    #[error("workbook has {descriptors} BoundSheet8 record(s) but {markers} sheet BOF record(s)")]
    SheetCountMismatch { descriptors: usize, markers: usize },

    /// `add_sheet` needs an existing descriptor as its insertion anchor.
    #[error("workbook has no existing BoundSheet8 record to anchor the new sheet descriptor")]
    NoExistingSheets,

    /// The workbook defines no auto-open label to obfuscate.
    #[error("workbook defines no auto-open label")]
    NoAutoOpenLabel,

    /// A sheet `BOF` lies beyond the range the u32 `lbPlyPos` field can
    /// express.
    #[error("sheet BOF byte offset {offset} does not fit the u32 lbPlyPos field")]
    OffsetOverflow { offset: u64 },

    /// The compound file has no workbook stream under a known name.
    #[error("missing workbook stream (expected `Workbook` or `Book`)")]
    MissingWorkbookStream,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    RecordType(#[from] RecordTypeError),

    #[error("failed to read compound file: {0}")]
    Io(#[from] std::io::Error),
}
