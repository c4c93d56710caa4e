mod common;

use pretty_assertions::assert_eq;
use xlstream_biff::{bof_record, eof_record, BoundSheet8, Record, BOF_DT_WORKSHEET};
use xlstream_edit::{StreamError, WorkbookStream};

#[test]
fn parses_a_fixture_stream_and_serializes_it_back_unchanged() {
    let bytes = common::two_sheet_workbook();
    let stream = WorkbookStream::from_bytes(&bytes).expect("parse");

    assert_eq!(stream.records_of_type(common::RECORD_BOUNDSHEET).len(), 2);
    assert_eq!(stream.records_of_type(common::RECORD_BOF).len(), 3);
    assert_eq!(stream.to_bytes().expect("serialize"), bytes);
}

#[test]
fn opens_the_workbook_stream_from_a_compound_file() {
    let bytes = common::two_sheet_workbook();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fixture.xls");
    common::write_compound_file(&path, &bytes);

    let stream = WorkbookStream::from_file(&path).expect("open");
    assert_eq!(stream.to_bytes().expect("serialize"), bytes);
}

#[test]
fn opening_a_compound_file_without_a_workbook_stream_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.xls");
    drop(cfb::create(&path).expect("create compound file"));

    let err = WorkbookStream::from_file(&path).unwrap_err();
    assert!(matches!(err, StreamError::MissingWorkbookStream));
}

#[test]
fn fixture_offsets_match_the_library_fixup() {
    // The fixture patches descriptor offsets itself; a library fixup over it
    // must change nothing.
    let stream =
        WorkbookStream::from_bytes(&common::two_sheet_workbook()).expect("parse");
    let fixed = stream.fix_sheet_offsets().expect("fixup");
    assert_eq!(fixed, stream);
}

#[test]
fn adds_a_macro_sheet_end_to_end() {
    let stream =
        WorkbookStream::from_bytes(&common::two_sheet_workbook()).expect("parse");
    let descriptor = BoundSheet8::new("Macro1").expect("descriptor");
    let sheet = [
        bof_record(BOF_DT_WORKSHEET),
        Record::new(0x0200, vec![0x33]),
        eof_record(),
    ];

    let grown = stream.add_sheet(descriptor, &sheet).expect("add sheet");

    // Survives a serialize/reparse round trip with offsets intact.
    let bytes = grown.to_bytes().expect("serialize");
    let reparsed = WorkbookStream::from_bytes(&bytes).expect("reparse");
    assert_eq!(reparsed, grown);
    assert_eq!(
        reparsed.fix_sheet_offsets().expect("fixup"),
        reparsed,
    );

    // All three descriptors point at BOF records.
    for record in reparsed.records_of_type(common::RECORD_BOUNDSHEET) {
        let descriptor = BoundSheet8::from_record(&record, 1252).expect("descriptor");
        let at = descriptor.sheet_position() as usize;
        assert_eq!(&bytes[at..at + 2], &common::RECORD_BOF.to_le_bytes());
    }

    // The new sheet is reachable through the delimiter scan.
    let run = reparsed
        .records_for_sheet(&bof_record(BOF_DT_WORKSHEET))
        .expect("sheet run");
    assert_eq!(*run.last().expect("run is non-empty"), eof_record());
}

#[test]
fn removing_a_globals_record_shifts_every_sheet_offset() {
    let stream =
        WorkbookStream::from_bytes(&common::two_sheet_workbook()).expect("parse");
    let name = stream.records_of_type(common::RECORD_NAME)[0].clone();

    let trimmed = stream
        .remove(&name)
        .expect("remove")
        .fix_sheet_offsets()
        .expect("fixup");

    let bytes = trimmed.to_bytes().expect("serialize");
    for record in trimmed.records_of_type(common::RECORD_BOUNDSHEET) {
        let descriptor = BoundSheet8::from_record(&record, 1252).expect("descriptor");
        let at = descriptor.sheet_position() as usize;
        assert_eq!(&bytes[at..at + 2], &common::RECORD_BOF.to_le_bytes());
    }
}
