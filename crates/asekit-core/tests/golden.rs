use std::fs;
use std::path::Path;

use asekit_core::{InspectReport, decode_file, inspect_file};

fn load_expected_report(dir: &str) -> InspectReport {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");
    let expected_path = root.join(dir).join("expected_report.json");

    let expected_json = fs::read_to_string(&expected_path).expect("read expected_report.json");
    serde_json::from_str(&expected_json).expect("parse expected report")
}

fn input_path(dir: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(dir)
        .join("input.aseprite")
}

fn run_golden(dir: &str) {
    let expected = load_expected_report(dir);

    let mut actual = inspect_file(&input_path(dir)).expect("inspect aseprite file");
    actual.generated_at = expected.generated_at.clone();
    actual.input.path = expected.input.path.clone();

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");

    assert_eq!(actual_value, expected_value, "golden mismatch in {dir}");
}

#[test]
fn golden_basic() {
    run_golden("tests/golden/basic");
}

#[test]
fn golden_unknown_chunks() {
    run_golden("tests/golden/unknown_chunks");
}

#[test]
fn golden_skipped_cels() {
    run_golden("tests/golden/skipped_cels");
}

#[test]
fn golden_new_chunk_count() {
    run_golden("tests/golden/new_chunk_count");
}

#[test]
fn golden_basic_pixels_match_cel_geometry() {
    let decoded = decode_file(&input_path("tests/golden/basic")).expect("decode basic");
    let document = decoded.document;
    assert_eq!(document.layers.len(), 2);
    assert_eq!(document.cels.len(), 4);
    for cel in &document.cels {
        assert_eq!(cel.pixels.len(), usize::from(cel.width) * usize::from(cel.height) * 4);
    }
    let hat = document.cel(1, 1).expect("hat cel in frame 1");
    assert_eq!((hat.x, hat.y), (2, -1));
    assert_eq!(hat.opacity, 128);
}

#[test]
fn golden_skipped_cels_reports_each_skip() {
    let report = load_expected_report("tests/golden/skipped_cels");
    let ids: Vec<&str> = report.diagnostics.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["ASE-CEL-TYPE", "ASE-CEL-TYPE", "ASE-CEL-SIZE"]);
    assert_eq!(report.cels.len(), 2);
}
