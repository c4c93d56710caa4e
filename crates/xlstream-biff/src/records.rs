use thiserror::Error;

/// BIFF `EOF` record id.
pub const RECORD_EOF: u16 = 0x000A;
/// BIFF `NAME` (`Lbl`) record id.
pub const RECORD_NAME: u16 = 0x0018;
/// BIFF `CODEPAGE` record id.
pub const RECORD_CODEPAGE: u16 = 0x0042;
/// BIFF `BoundSheet8` record id.
pub const RECORD_BOUNDSHEET: u16 = 0x0085;
/// BIFF8 `BOF` record id.
pub const RECORD_BOF: u16 = 0x0809;

/// Fixed size of the physical record header (id + payload length).
pub const RECORD_HEADER_LEN: usize = 4;

// BOF payload constants. See [MS-XLS] 2.4.21.
pub const BOF_VERSION_BIFF8: u16 = 0x0600;
pub const BOF_DT_WORKBOOK_GLOBALS: u16 = 0x0005;
pub const BOF_DT_WORKSHEET: u16 = 0x0010;

/// Failures while parsing or serializing the physical record layer.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("truncated record header at byte offset {offset} (stream len {len})")]
    TruncatedHeader { offset: usize, len: usize },
    #[error(
        "record 0x{id:04X} at byte offset {offset} declares {declared} payload bytes but only {available} remain"
    )]
    TruncatedPayload {
        id: u16,
        offset: usize,
        declared: usize,
        available: usize,
    },
    #[error("record 0x{id:04X} payload of {len} bytes does not fit a u16 record length")]
    PayloadTooLong { id: u16, len: usize },
    #[error("unexpected end of string data")]
    TruncatedString,
    #[error("character {c:?} cannot be stored as an 8-bit BIFF string")]
    UnencodableChar { c: char },
    #[error("string of {len} characters does not fit the record's length field")]
    StringTooLong { len: usize },
}

/// Failures while viewing a generic record as a specific record kind.
#[derive(Debug, Error)]
pub enum RecordTypeError {
    #[error("expected a {expected} record, found record id 0x{actual:04X}")]
    WrongRecordId { expected: &'static str, actual: u16 },
    #[error("malformed {record} record: {reason}")]
    Malformed { record: &'static str, reason: String },
}

/// One physical BIFF record: a u16 type tag and an opaque payload.
///
/// Records are value types; equality is structural (same id, same payload
/// bytes). The on-wire size is [`Record::wire_len`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: u16,
    pub data: Vec<u8>,
}

impl Record {
    pub fn new(id: u16, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    /// On-wire size: the 4-byte header plus the payload.
    pub fn wire_len(&self) -> usize {
        RECORD_HEADER_LEN + self.data.len()
    }
}

/// Split a raw workbook stream into its physical records.
///
/// Parsing is strict: a truncated header or payload is an error, never a
/// silently shortened record. The whole stream must be consumed by records.
pub fn parse_records(stream: &[u8]) -> Result<Vec<Record>, CodecError> {
    let mut records = Vec::new();
    let mut offset = 0usize;

    while offset < stream.len() {
        let header =
            stream
                .get(offset..offset + RECORD_HEADER_LEN)
                .ok_or(CodecError::TruncatedHeader {
                    offset,
                    len: stream.len(),
                })?;
        let id = u16::from_le_bytes([header[0], header[1]]);
        let declared = u16::from_le_bytes([header[2], header[3]]) as usize;

        let data_start = offset + RECORD_HEADER_LEN;
        let data = stream
            .get(data_start..data_start + declared)
            .ok_or(CodecError::TruncatedPayload {
                id,
                offset,
                declared,
                available: stream.len() - data_start,
            })?;

        records.push(Record::new(id, data.to_vec()));
        offset = data_start + declared;
    }

    Ok(records)
}

/// Serialize records back into the exact on-wire byte sequence.
///
/// Round-trips with [`parse_records`]: `write_records(&parse_records(b)?)`
/// reproduces `b` byte for byte.
pub fn write_records(records: &[Record]) -> Result<Vec<u8>, CodecError> {
    let total: usize = records.iter().map(Record::wire_len).sum();
    let mut out = Vec::with_capacity(total);

    for record in records {
        let len = u16::try_from(record.data.len()).map_err(|_| CodecError::PayloadTooLong {
            id: record.id,
            len: record.data.len(),
        })?;
        out.extend_from_slice(&record.id.to_le_bytes());
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&record.data);
    }

    Ok(out)
}

/// Build a BIFF8 `BOF` record for the given substream type (`dt`).
///
/// The build/year fields carry stable defaults; only the version and `dt`
/// matter structurally.
pub fn bof_record(dt: u16) -> Record {
    let mut data = [0u8; 16];
    data[0..2].copy_from_slice(&BOF_VERSION_BIFF8.to_le_bytes());
    data[2..4].copy_from_slice(&dt.to_le_bytes());
    data[4..6].copy_from_slice(&0x0DBBu16.to_le_bytes()); // build
    data[6..8].copy_from_slice(&0x07CCu16.to_le_bytes()); // year
    Record::new(RECORD_BOF, data.to_vec())
}

/// Build an empty `EOF` record.
pub fn eof_record() -> Record {
    Record::new(RECORD_EOF, Vec::new())
}
