use std::path::Path;

use xlstream_biff::{parse_records, write_records, Record, RECORD_CODEPAGE, RECORD_EOF};

use crate::container;
use crate::error::StreamError;

/// Codepage assumed for 8-bit strings when no `CODEPAGE` record is present.
const DEFAULT_CODEPAGE: u16 = 1252;

/// An ordered, immutable sequence of workbook-stream records.
///
/// Every edit returns a new `WorkbookStream`; records are cloned, never
/// aliased, whenever a result crosses this interface, so no edit on one
/// stream value can corrupt another. All positional operations address
/// records by *structural equality* (same type tag, same payload) and act on
/// the first match in stream order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookStream {
    records: Vec<Record>,
}

impl WorkbookStream {
    /// Open a compound file and parse its workbook stream.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        let bytes = container::read_workbook_stream(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Parse a raw workbook stream.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StreamError> {
        Ok(Self {
            records: parse_records(bytes)?,
        })
    }

    /// Wrap an explicit record list (already in on-wire order).
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when some record is structurally equal to `record`.
    pub fn contains(&self, record: &Record) -> bool {
        // Narrow by type tag first; full payload comparison only runs against
        // same-type records.
        self.records
            .iter()
            .filter(|r| r.id == record.id)
            .any(|r| r == record)
    }

    /// Index of the first structural match. Recomputed fresh on every call;
    /// the stream is immutable so there is nothing to cache.
    fn record_offset(&self, record: &Record, what: &'static str) -> Result<usize, StreamError> {
        self.records
            .iter()
            .position(|r| r == record)
            .ok_or(StreamError::RecordNotFound { what })
    }

    /// New stream with the first structural match of `record` excised.
    pub fn remove(&self, record: &Record) -> Result<WorkbookStream, StreamError> {
        let offset = self.record_offset(record, "the record to remove")?;
        let mut records = self.records.clone();
        records.remove(offset);
        Ok(WorkbookStream { records })
    }

    /// New stream with `record` spliced in after the first structural match
    /// of `after`, or appended when `after` is `None`.
    pub fn insert_record(
        &self,
        record: Record,
        after: Option<&Record>,
    ) -> Result<WorkbookStream, StreamError> {
        self.insert_records(std::slice::from_ref(&record), after)
    }

    /// New stream with `records` spliced in, in order, after the first
    /// structural match of `after`, or appended when `after` is `None`.
    pub fn insert_records(
        &self,
        records: &[Record],
        after: Option<&Record>,
    ) -> Result<WorkbookStream, StreamError> {
        let insert_at = match after {
            None => self.records.len(),
            Some(anchor) => self.record_offset(anchor, "the insertion anchor")? + 1,
        };

        let mut out = Vec::with_capacity(self.records.len() + records.len());
        out.extend_from_slice(&self.records[..insert_at]);
        out.extend_from_slice(records);
        out.extend_from_slice(&self.records[insert_at..]);
        Ok(WorkbookStream { records: out })
    }

    /// New stream with the first structural match of `old` substituted,
    /// index-for-index, by `new`.
    pub fn replace(&self, old: &Record, new: Record) -> Result<WorkbookStream, StreamError> {
        let offset = self.record_offset(old, "the record to replace")?;
        let mut records = self.records.clone();
        records[offset] = new;
        Ok(WorkbookStream { records })
    }

    /// Absolute byte offset of the first structural match of `record` in the
    /// serialized stream: the sum of `4 + payload length` over every record
    /// ahead of it.
    pub fn byte_offset_of(&self, record: &Record) -> Result<u64, StreamError> {
        let offset = self.record_offset(record, "the record")?;
        Ok(self.records[..offset]
            .iter()
            .map(|r| r.wire_len() as u64)
            .sum())
    }

    /// Every record with the given type tag, in stream order, as independent
    /// copies. Callers may mutate the copies freely.
    pub fn records_of_type(&self, id: u16) -> Vec<Record> {
        self.records
            .iter()
            .filter(|r| r.id == id)
            .cloned()
            .collect()
    }

    /// The inclusive record run of one sheet: from the first structural
    /// match of `sheet_bof` up to and including the nearest following `EOF`.
    ///
    /// A run with no terminating `EOF` is a malformed container and surfaces
    /// as [`StreamError::UnterminatedSheet`], never a silent truncation.
    pub fn records_for_sheet(&self, sheet_bof: &Record) -> Result<Vec<Record>, StreamError> {
        let start = self.record_offset(sheet_bof, "the sheet BOF record")?;
        let run = &self.records[start..];
        let end = run
            .iter()
            .position(|r| r.id == RECORD_EOF)
            .ok_or(StreamError::UnterminatedSheet)?;
        Ok(run[..=end].to_vec())
    }

    /// Serialize the stream back to its exact on-wire byte sequence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StreamError> {
        Ok(write_records(&self.records)?)
    }

    /// Workbook codepage for decoding 8-bit strings, from the `CODEPAGE`
    /// record when present.
    pub(crate) fn codepage(&self) -> u16 {
        self.records
            .iter()
            .find(|r| r.id == RECORD_CODEPAGE)
            .and_then(|r| r.data.get(..2))
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .unwrap_or(DEFAULT_CODEPAGE)
    }
}
