use crate::records::{Record, RecordTypeError, RECORD_BOUNDSHEET};
use crate::strings;

// BoundSheet8 payload layout [MS-XLS 2.4.28]:
// [lbPlyPos: u32][grbit: u16][stName: ShortXLUnicodeString]
const FIXED_LEN: usize = 6;
// Visible worksheet: hsState = 0, dt = 0.
const GRBIT_VISIBLE_WORKSHEET: u16 = 0x0000;

/// Typed view over a `BoundSheet8` sheet-descriptor record.
///
/// The view keeps the raw record; edits patch the `lbPlyPos` bytes in place
/// rather than re-encoding the payload, so the descriptor's byte length (and
/// with it the byte offset of every record behind it) never changes as a
/// side effect of an offset fixup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSheet8 {
    record: Record,
    name: String,
}

impl BoundSheet8 {
    pub fn from_record(record: &Record, codepage: u16) -> Result<Self, RecordTypeError> {
        if record.id != RECORD_BOUNDSHEET {
            return Err(RecordTypeError::WrongRecordId {
                expected: "BoundSheet8",
                actual: record.id,
            });
        }

        let name_data = record
            .data
            .get(FIXED_LEN..)
            .ok_or_else(|| malformed("payload shorter than the fixed header"))?;
        let (name, _) = strings::decode_short_string(name_data, codepage)
            .map_err(|err| malformed(&err.to_string()))?;

        Ok(Self {
            record: record.clone(),
            name,
        })
    }

    /// Build a fresh visible-worksheet descriptor with a zero `lbPlyPos`.
    ///
    /// The position is a placeholder; an offset fixup assigns the real value
    /// once the sheet's records are in place.
    pub fn new(name: &str) -> Result<Self, RecordTypeError> {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&GRBIT_VISIBLE_WORKSHEET.to_le_bytes());
        let encoded =
            strings::encode_short_string(name).map_err(|err| malformed(&err.to_string()))?;
        data.extend_from_slice(&encoded);

        Ok(Self {
            record: Record::new(RECORD_BOUNDSHEET, data),
            name: name.to_owned(),
        })
    }

    pub fn sheet_name(&self) -> &str {
        &self.name
    }

    /// Serialized byte offset of this sheet's `BOF` record (`lbPlyPos`).
    pub fn sheet_position(&self) -> u32 {
        // The constructors guarantee at least the 6 fixed payload bytes.
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.record.data[0..4]);
        u32::from_le_bytes(bytes)
    }

    /// Copy of this descriptor with `lbPlyPos` replaced.
    pub fn with_sheet_position(&self, position: u32) -> BoundSheet8 {
        let mut updated = self.clone();
        updated.record.data[0..4].copy_from_slice(&position.to_le_bytes());
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
        record: "BoundSheet8",
        reason: reason.to_owned(),
    }
}
