//! Structured-storage access for the raw workbook stream.

use std::io::Read;
use std::path::Path;

use crate::error::StreamError;

/// Stream names used by legacy Excel compound files, in lookup order.
const WORKBOOK_STREAM_CANDIDATES: [&str; 4] = ["/Workbook", "/Book", "Workbook", "Book"];

/// Read the raw workbook stream bytes out of a compound (structured storage)
/// file. The stream is read exactly once.
pub(crate) fn read_workbook_stream(path: &Path) -> Result<Vec<u8>, StreamError> {
    let mut comp = cfb::open(path)?;

    for candidate in WORKBOOK_STREAM_CANDIDATES {
        if let Ok(mut stream) = comp.open_stream(candidate) {
            let mut bytes = Vec::new();
            stream.read_to_end(&mut bytes)?;
            return Ok(bytes);
        }
    }

    Err(StreamError::MissingWorkbookStream)
}
