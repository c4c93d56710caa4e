//! Sheet insertion and the `lbPlyPos` offset fixup.

use log::debug;
use xlstream_biff::{parse_records, BoundSheet8, Record, RECORD_BOF, RECORD_BOUNDSHEET};

use crate::error::StreamError;
use crate::stream::WorkbookStream;

impl WorkbookStream {
    /// Append a whole sheet: splice `descriptor` in after the last existing
    /// `BoundSheet8` record, append the sheet's record run at the end of the
    /// stream, and repair every descriptor's stored byte offset.
    ///
    /// The descriptor's own `lbPlyPos` may be a placeholder; the fixup
    /// overwrites it with the real offset of the appended `BOF`.
    pub fn add_sheet(
        &self,
        descriptor: BoundSheet8,
        sheet_records: &[Record],
    ) -> Result<WorkbookStream, StreamError> {
        let anchor = self
            .records_of_type(RECORD_BOUNDSHEET)
            .pop()
            .ok_or(StreamError::NoExistingSheets)?;

        debug!(
            "adding sheet {:?} with {} record(s)",
            descriptor.sheet_name(),
            sheet_records.len()
        );

        self.insert_record(descriptor.into_record(), Some(&anchor))?
            .insert_records(sheet_records, None)?
            .fix_sheet_offsets()
    }

    /// [`add_sheet`](Self::add_sheet) with the sheet supplied as serialized
    /// record bytes.
    pub fn add_sheet_from_bytes(
        &self,
        descriptor: BoundSheet8,
        sheet_bytes: &[u8],
    ) -> Result<WorkbookStream, StreamError> {
        let sheet_records = parse_records(sheet_bytes)?;
        self.add_sheet(descriptor, &sheet_records)
    }

    /// Rewrite every `BoundSheet8` descriptor's `lbPlyPos` to the actual
    /// byte offset of its sheet's `BOF` record.
    ///
    /// The first `BOF` in the stream opens the workbook globals substream;
    /// the Nth descriptor pairs with the (N+1)th `BOF`. Pairing is by stream
    /// position, so sheets with byte-identical `BOF` payloads each still get
    /// their own offset. A stream where the counts disagree has desynced
    /// structure no pairing can repair, so that fails outright.
    ///
    /// The fixup only ever patches bytes inside existing records; record
    /// count and byte length are unchanged, which makes a second fixup a
    /// no-op.
    pub fn fix_sheet_offsets(&self) -> Result<WorkbookStream, StreamError> {
        let mut bof_offsets = Vec::new();
        let mut offset = 0u64;
        for record in self.records() {
            if record.id == RECORD_BOF {
                bof_offsets.push(offset);
            }
            offset += record.wire_len() as u64;
        }
        // Skip the workbook-globals BOF.
        let sheet_bofs = bof_offsets.get(1..).unwrap_or_default();

        let descriptors = self.records_of_type(RECORD_BOUNDSHEET);
        if descriptors.len() != sheet_bofs.len() {
            return Err(StreamError::SheetCountMismatch {
                descriptors: descriptors.len(),
                markers: sheet_bofs.len(),
            });
        }

        let codepage = self.codepage();
        let mut stream = self.clone();
        for (descriptor, &bof_offset) in descriptors.iter().zip(sheet_bofs) {
            let position = u32::try_from(bof_offset)
                .map_err(|_| StreamError::OffsetOverflow { offset: bof_offset })?;
            let updated = BoundSheet8::from_record(descriptor, codepage)?
                .with_sheet_position(position);
            stream = stream.replace(descriptor, updated.into_record())?;
        }
        Ok(stream)
    }
}
