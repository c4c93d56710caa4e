use crate::records::{Record, RecordTypeError, RECORD_NAME};
use crate::strings;

// NAME record payload layout [MS-XLS 2.4.150]:
// [grbit: u16][chKey: u8][cch: u8][cce: u16][reserved: u16][itab: u16]
// [cchCustMenu: u8][cchDescription: u8][cchHelpTopic: u8][cchStatusText: u8]
// [rgchName: XLUnicodeStringNoCch][rgce: cce bytes][optional strings]
const HEADER_LEN: usize = 14;
const CCH_OFFSET: usize = 3;
const GRBIT_BUILTIN: u16 = 0x0020;

/// Name value of a built-in `Lbl` marking the auto-open trigger: a single
/// byte holding the built-in name id 0x01.
pub const BUILTIN_AUTO_OPEN_NAME: &str = "\u{1}";

/// Typed view over a `NAME` (`Lbl`) defined-name record.
///
/// The name value keeps embedded NUL characters exactly as stored; the host
/// application ignores them when matching names, so they are significant for
/// anyone inspecting the raw record. Everything behind the name (`rgce` and
/// the optional trailing strings) is opaque here and carried verbatim
/// through edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lbl {
    record: Record,
    grbit: u16,
    name: String,
    name_wide: bool,
    /// Bytes consumed by `rgchName` (flags byte + char bytes).
    name_len: usize,
}

impl Lbl {
    pub fn from_record(record: &Record, codepage: u16) -> Result<Self, RecordTypeError> {
        if record.id != RECORD_NAME {
            return Err(RecordTypeError::WrongRecordId {
                expected: "Lbl",
                actual: record.id,
            });
        }

        let data = &record.data;
        if data.len() < HEADER_LEN {
            return Err(malformed("payload shorter than the fixed header"));
        }
        let grbit = u16::from_le_bytes([data[0], data[1]]);
        let cch = data[CCH_OFFSET] as usize;

        let (name, name_wide, name_len) =
            strings::decode_string_no_cch(&data[HEADER_LEN..], cch, codepage)
                .map_err(|err| malformed(&err.to_string()))?;

        Ok(Self {
            record: record.clone(),
            grbit,
            name,
            name_wide,
            name_len,
        })
    }

    /// Build a fresh workbook-scoped `Lbl` carrying the given formula token
    /// stream.
    pub fn new(name: &str, wide: bool, builtin: bool, rgce: &[u8]) -> Result<Self, RecordTypeError> {
        let (encoded, cch) =
            strings::encode_string_no_cch(name, wide).map_err(|err| malformed(&err.to_string()))?;
        let cch_u8 = u8::try_from(cch)
            .map_err(|_| malformed(&format!("name of {cch} characters does not fit a u8 length")))?;
        let cce = u16::try_from(rgce.len())
            .map_err(|_| malformed("rgce token stream does not fit a u16 length"))?;

        let grbit: u16 = if builtin { GRBIT_BUILTIN } else { 0 };

        let mut data = Vec::with_capacity(HEADER_LEN + encoded.len() + rgce.len());
        data.extend_from_slice(&grbit.to_le_bytes());
        data.push(0); // chKey
        data.push(cch_u8);
        data.extend_from_slice(&cce.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes()); // reserved
        data.extend_from_slice(&0u16.to_le_bytes()); // itab (workbook scope)
        data.extend_from_slice(&[0, 0, 0, 0]); // optional string lengths
        data.extend_from_slice(&encoded);
        data.extend_from_slice(rgce);

        Ok(Self {
            record: Record::new(RECORD_NAME, data),
            grbit,
            name: name.to_owned(),
            name_wide: wide,
            name_len: encoded.len(),
        })
    }

    /// True when the `fBuiltin` flag marks this as an Excel built-in name.
    pub fn is_builtin(&self) -> bool {
        self.grbit & GRBIT_BUILTIN != 0
    }

    /// The raw name value, embedded NULs and all.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name as the host application matches it: NULs stripped, case
    /// folded.
    pub fn normalized_name(&self) -> String {
        self.name.replace('\0', "").to_lowercase()
    }

    /// True when the name was stored as UTF-16LE rather than 8-bit chars.
    pub fn is_name_wide(&self) -> bool {
        self.name_wide
    }

    /// Copy of this label with the name replaced.
    ///
    /// The header's `cch` is updated and `rgce` plus any trailing strings are
    /// carried unchanged. The record's byte length changes when the new name
    /// encodes to a different size, which shifts the offsets of every record
    /// behind it; callers are expected to run an offset fixup afterwards.
    pub fn with_name(&self, name: &str, wide: bool) -> Result<Lbl, RecordTypeError> {
        let (encoded, cch) =
            strings::encode_string_no_cch(name, wide).map_err(|err| malformed(&err.to_string()))?;
        let cch_u8 = u8::try_from(cch)
            .map_err(|_| malformed(&format!("name of {cch} characters does not fit a u8 length")))?;

        let tail = &self.record.data[HEADER_LEN + self.name_len..];
        let mut data = Vec::with_capacity(HEADER_LEN + encoded.len() + tail.len());
        data.extend_from_slice(&self.record.data[..HEADER_LEN]);
        data[CCH_OFFSET] = cch_u8;
        data.extend_from_slice(&encoded);
        data.extend_from_slice(tail);

        Ok(Self {
            record: Record::new(RECORD_NAME, data),
            grbit: self.grbit,
            name: name.to_owned(),
            name_wide: wide,
            name_len: encoded.len(),
        })
    }

    /// Copy of this label with the `fBuiltin` flag set or cleared.
    pub fn with_builtin(&self, builtin: bool) -> Lbl {
        let mut updated = self.clone();
        if builtin {
            updated.grbit |= GRBIT_BUILTIN;
        } else {
            updated.grbit &= !GRBIT_BUILTIN;
        }
        updated.record.data[0..2].copy_from_slice(&updated.grbit.to_le_bytes());
        updated
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

fn malformed(reason: &str) -> RecordTypeError {
    RecordTypeError::Malformed {
        record: "Lbl",
        reason: reason.to_owned(),
    }
}
