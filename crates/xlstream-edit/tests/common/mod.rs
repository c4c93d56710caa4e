//! Workbook-stream fixtures assembled byte by byte, independent of the
//! library's own encoder.
#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

pub const RECORD_BOF: u16 = 0x0809;
pub const RECORD_EOF: u16 = 0x000A;
pub const RECORD_BOUNDSHEET: u16 = 0x0085;
pub const RECORD_NAME: u16 = 0x0018;
pub const RECORD_CODEPAGE: u16 = 0x0042;

const BOF_DT_GLOBALS: u16 = 0x0005;
const BOF_DT_WORKSHEET: u16 = 0x0010;

/// Builds a globals substream followed by sheet substreams, patching each
/// `BoundSheet8` record's `lbPlyPos` with its sheet's real byte offset when
/// the stream is finished.
pub struct WorkbookBuilder {
    bytes: Vec<u8>,
    /// Byte offsets of the `lbPlyPos` fields awaiting their sheet offsets.
    descriptor_patches: Vec<usize>,
    sheet_bof_offsets: Vec<u32>,
    globals_open: bool,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            bytes: Vec::new(),
            descriptor_patches: Vec::new(),
            sheet_bof_offsets: Vec::new(),
            globals_open: true,
        };
        builder.bof(BOF_DT_GLOBALS);
        builder.push_record(RECORD_CODEPAGE, &1252u16.to_le_bytes());
        builder
    }

    pub fn push_record(&mut self, id: u16, payload: &[u8]) {
        self.bytes.extend_from_slice(&id.to_le_bytes());
        self.bytes
            .extend_from_slice(&(payload.len() as u16).to_le_bytes());
        self.bytes.extend_from_slice(payload);
    }

    fn bof(&mut self, dt: u16) {
        let mut payload = Vec::with_capacity(16);
        payload.extend_from_slice(&0x0600u16.to_le_bytes()); // BIFF8
        payload.extend_from_slice(&dt.to_le_bytes());
        payload.extend_from_slice(&0x0DBBu16.to_le_bytes()); // rupBuild
        payload.extend_from_slice(&0x07CCu16.to_le_bytes()); // rupYear
        payload.extend_from_slice(&[0u8; 8]);
        self.push_record(RECORD_BOF, &payload);
    }

    /// Visible-worksheet descriptor with a compressed name and a zero
    /// `lbPlyPos` to be patched by [`finish`](Self::finish).
    pub fn boundsheet(&mut self, name: &str) {
        assert!(self.globals_open, "descriptors belong in the globals substream");
        let mut payload = Vec::new();
        payload.extend_from_slice(&0u32.to_le_bytes()); // lbPlyPos placeholder
        payload.extend_from_slice(&0u16.to_le_bytes()); // visible worksheet
        payload.push(name.len() as u8);
        payload.push(0); // compressed
        payload.extend_from_slice(name.as_bytes());

        // lbPlyPos sits right after the 4-byte record header.
        self.descriptor_patches.push(self.bytes.len() + 4);
        self.push_record(RECORD_BOUNDSHEET, &payload);
    }

    /// Workbook-scoped defined name with a compressed name string.
    pub fn name_record(&mut self, name: &str, builtin: bool, rgce: &[u8]) {
        let grbit: u16 = if builtin { 0x0020 } else { 0 };
        let mut payload = Vec::new();
        payload.extend_from_slice(&grbit.to_le_bytes());
        payload.push(0); // chKey
        payload.push(name.len() as u8);
        payload.extend_from_slice(&(rgce.len() as u16).to_le_bytes());
        payload.extend_from_slice(&0u16.to_le_bytes()); // reserved
        payload.extend_from_slice(&0u16.to_le_bytes()); // itab
        payload.extend_from_slice(&[0, 0, 0, 0]); // optional string lengths
        payload.push(0); // compressed
        payload.extend_from_slice(name.as_bytes());
        payload.extend_from_slice(rgce);
        self.push_record(RECORD_NAME, &payload);
    }

    /// Close the globals substream and append one sheet substream carrying a
    /// single filler record.
    pub fn sheet(&mut self, filler: &[u8]) {
        if self.globals_open {
            self.push_record(RECORD_EOF, &[]);
            self.globals_open = false;
        }
        self.sheet_bof_offsets.push(self.bytes.len() as u32);
        self.bof(BOF_DT_WORKSHEET);
        self.push_record(0x0200, filler); // Dimensions stand-in
        self.push_record(RECORD_EOF, &[]);
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.globals_open {
            self.push_record(RECORD_EOF, &[]);
        }
        assert_eq!(
            self.descriptor_patches.len(),
            self.sheet_bof_offsets.len(),
            "descriptor/sheet count drifted in the fixture"
        );
        for (patch, offset) in self
            .descriptor_patches
            .iter()
            .zip(&self.sheet_bof_offsets)
        {
            self.bytes[*patch..*patch + 4].copy_from_slice(&offset.to_le_bytes());
        }
        self.bytes
    }
}

/// Two visible sheets, one plain `Auto_Open` defined name, correct offsets.
pub fn two_sheet_workbook() -> Vec<u8> {
    let mut builder = WorkbookBuilder::new();
    builder.boundsheet("Sheet1");
    builder.boundsheet("Sheet2");
    builder.name_record("Auto_Open", false, &[0x1E, 0x01, 0x00]);
    builder.sheet(&[0x11]);
    builder.sheet(&[0x22]);
    builder.finish()
}

/// Wrap raw workbook-stream bytes in a compound file under the `Workbook`
/// stream name.
pub fn write_compound_file(path: &Path, stream_bytes: &[u8]) {
    let mut comp = cfb::create(path).expect("create compound file");
    let mut stream = comp
        .create_stream("/Workbook")
        .expect("create workbook stream");
    stream.write_all(stream_bytes).expect("write stream");
    drop(stream);
    comp.flush().expect("flush compound file");
}
