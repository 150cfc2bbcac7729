//! Integration tests for the conversion pipeline over the library API.

use std::fs;
use std::path::PathBuf;

use tempfile::{TempDir, tempdir};

use tabcast::prelude::*;

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const PEOPLE_CSV: &[u8] = b"name,age,city\nAlice,34,Oslo\nBob,9,Lima\nCarol,51,Kyiv\n";

#[test]
fn csv_to_json_and_back() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "people.csv", PEOPLE_CSV);
    let options = ConvertOptions::new();

    let loaded = load_dataset(&input, &options).unwrap();
    assert_eq!(loaded.format, Format::Csv);
    assert_eq!(loaded.dataset.len(), 3);

    let json_path = dir.path().join("people.json");
    let report = save_dataset(&loaded.dataset, &json_path, None, &options).unwrap();
    assert_eq!(report.records, 3);
    assert_eq!(report.format, Format::Json);

    let reloaded = load_dataset(&json_path, &options).unwrap();
    assert_eq!(reloaded.format, Format::Json);
    assert_eq!(reloaded.dataset, loaded.dataset);
}

#[test]
fn csv_to_dbf_and_back() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "people.csv", PEOPLE_CSV);
    let options = ConvertOptions::new();

    let loaded = load_dataset(&input, &options).unwrap();
    let dbf_path = dir.path().join("people.dbf");
    save_dataset(&loaded.dataset, &dbf_path, None, &options).unwrap();

    let reloaded = load_dataset(&dbf_path, &options).unwrap();
    assert_eq!(reloaded.format, Format::Dbf);
    assert_eq!(reloaded.dataset.len(), 3);
    // DBF uppercases field names; cell values survive untouched.
    assert_eq!(
        reloaded.dataset.headers(),
        Some(&["NAME".to_string(), "AGE".to_string(), "CITY".to_string()][..])
    );
    for (row, expected) in reloaded.dataset.rows().iter().zip(loaded.dataset.rows()) {
        assert_eq!(row, expected);
    }
}

#[test]
fn same_format_roundtrip_is_identity() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "people.csv", PEOPLE_CSV);
    let options = ConvertOptions::new();

    let loaded = load_dataset(&input, &options).unwrap();
    let out = dir.path().join("copy.csv");
    save_dataset(&loaded.dataset, &out, None, &options).unwrap();

    let reloaded = load_dataset(&out, &options).unwrap();
    assert_eq!(reloaded.dataset, loaded.dataset);
}

#[test]
fn headerless_csv_respects_explicit_false() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "raw.csv", b"1,2\n3,4\n");
    let options = ConvertOptions::new().headers(false);

    let loaded = load_dataset(&input, &options).unwrap();
    assert_eq!(loaded.dataset.headers(), None);
    assert_eq!(loaded.dataset.len(), 2);
    assert_eq!(loaded.dataset.cell(0, 0), "1");
}

#[test]
fn skip_lines_zero_is_forwarded_not_dropped() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "people.csv", PEOPLE_CSV);

    // skip_lines(0) must behave exactly like unset, not get confused
    // with a dropped option.
    let with_zero = load_dataset(&input, &ConvertOptions::new().skip_lines(0)).unwrap();
    let unset = load_dataset(&input, &ConvertOptions::new()).unwrap();
    assert_eq!(with_zero.dataset, unset.dataset);

    let skipped = load_dataset(&input, &ConvertOptions::new().skip_lines(1).headers(false));
    assert_eq!(skipped.unwrap().dataset.len(), 3);
}

#[test]
fn delimiter_option_ignored_by_json_codec() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "data.json", br#"[{"a": "x,y", "b": "z"}]"#);

    // The delimiter option is outside JSON's capability set and must be
    // silently dropped, not rejected.
    let options = ConvertOptions::new().delimiter(';');
    let loaded = load_dataset(&input, &options).unwrap();
    assert_eq!(loaded.dataset.cell(0, 0), "x,y");
}

#[test]
fn mislabeled_extension_is_reconciled_with_content() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "data.csv", b"name\tage\nAlice\t34\n");

    let loaded = load_dataset(&input, &ConvertOptions::new()).unwrap();
    assert_eq!(loaded.format, Format::Tsv);
    let mismatch = loaded.mismatch.expect("mismatch diagnostic expected");
    assert_eq!(mismatch.guessed, Format::Csv);
    assert_eq!(mismatch.sniffed, Format::Tsv);
    // Decoded with the sniffed format: tabs split the columns.
    assert_eq!(loaded.dataset.cell(0, 1), "34");
}

#[test]
fn extensionless_input_resolves_by_content_alone() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "export", br#"[["a", "b"], ["c", "d"]]"#);

    let loaded = load_dataset(&input, &ConvertOptions::new()).unwrap();
    assert_eq!(loaded.format, Format::Json);
    assert!(loaded.mismatch.is_none());
    assert_eq!(loaded.dataset.len(), 2);
}

#[test]
fn undetectable_input_fails_cleanly() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "mystery.dat", b"no structure to be found here\n");

    let err = load_dataset(&input, &ConvertOptions::new()).unwrap_err();
    assert!(err.is_format_undetectable());
}

#[test]
fn empty_input_is_fatal_not_silent() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "empty.csv", b"");
    let err = load_dataset(&input, &ConvertOptions::new()).unwrap_err();
    assert!(err.is_empty_dataset() || err.is_decode());

    let whitespace = write_file(&dir, "empty.json", b"[]");
    let err = load_dataset(&whitespace, &ConvertOptions::new()).unwrap_err();
    assert!(err.is_empty_dataset());
}

#[test]
fn export_to_buffer_matches_codec_bytes_exactly() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "people.csv", PEOPLE_CSV);
    let options = ConvertOptions::new();
    let loaded = load_dataset(&input, &options).unwrap();

    // Text format, interactive console: allowed.
    let mut text_out = Vec::new();
    export_dataset(&loaded.dataset, Format::Csv, &options, &mut text_out, true).unwrap();
    assert_eq!(text_out, PEOPLE_CSV);

    // Binary format, interactive console: refused before any byte is
    // written.
    let mut bin_out = Vec::new();
    let err =
        export_dataset(&loaded.dataset, Format::Dbf, &options, &mut bin_out, true).unwrap_err();
    assert!(matches!(err, TabcastError::BinaryToConsole { .. }));
    assert!(bin_out.is_empty());

    // Binary format, redirected console: exact codec bytes pass through.
    export_dataset(&loaded.dataset, Format::Dbf, &options, &mut bin_out, false).unwrap();
    let file_path = dir.path().join("people.dbf");
    save_dataset(&loaded.dataset, &file_path, None, &options).unwrap();
    assert_eq!(bin_out, fs::read(&file_path).unwrap());
}

#[test]
fn save_report_counts_data_rows_only() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "people.csv", PEOPLE_CSV);
    let options = ConvertOptions::new();
    let loaded = load_dataset(&input, &options).unwrap();

    let report = save_dataset(
        &loaded.dataset,
        &dir.path().join("out.tsv"),
        None,
        &options,
    )
    .unwrap();
    assert_eq!(report.records, 3);
}

#[test]
fn unix_dialect_applies_on_save() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "people.csv", b"a,b\n1,2\n");
    let options = ConvertOptions::new().dialect("unix");
    let loaded = load_dataset(&input, &options).unwrap();

    let out = dir.path().join("out.csv");
    save_dataset(&loaded.dataset, &out, None, &options).unwrap();
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "\"a\",\"b\"\n\"1\",\"2\"\n"
    );
}

#[test]
fn fast_dbf_load_through_pipeline() {
    let dir = tempdir().unwrap();
    let options = ConvertOptions::new();
    let input = write_file(&dir, "people.csv", PEOPLE_CSV);
    let loaded = load_dataset(&input, &options).unwrap();

    let dbf_path = dir.path().join("people.dbf");
    save_dataset(&loaded.dataset, &dbf_path, None, &options).unwrap();

    let fast = load_dataset(&dbf_path, &ConvertOptions::new().fast(true)).unwrap();
    assert_eq!(fast.dataset.len(), 3);
}

#[test]
fn render_styles_through_pipeline() {
    let dir = tempdir().unwrap();
    let input = write_file(&dir, "people.csv", b"name,age\nAlice,34\n");
    let loaded = load_dataset(&input, &ConvertOptions::new()).unwrap();

    let simple = loaded.dataset.render(TableStyle::Simple);
    assert!(simple.contains("-----"));
    let grid = loaded.dataset.render(TableStyle::Grid);
    assert!(grid.contains("| Alice |"));
    let plain = loaded.dataset.render(TableStyle::Plain);
    assert!(!plain.contains('|'));
    assert!(!plain.contains("--"));
}
