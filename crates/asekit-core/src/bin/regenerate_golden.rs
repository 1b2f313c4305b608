use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use asekit_core::{DEFAULT_GENERATED_AT, InspectReport, inspect_file};

const INPUT_NAME: &str = "input.aseprite";
const EXPECTED_NAME: &str = "expected_report.json";

// Usage: regenerate_golden [--check] [CASE...]
// With no CASE every directory under tests/golden holding an input is refreshed.
fn main() -> ExitCode {
    let mut check = false;
    let mut cases = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "--check" {
            check = true;
        } else {
            cases.push(arg);
        }
    }

    match run(check, &cases) {
        Ok(stale) if stale.is_empty() => ExitCode::SUCCESS,
        Ok(stale) => {
            for case in stale {
                eprintln!("stale golden report: {}", case.display());
            }
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run(check: bool, cases: &[String]) -> Result<Vec<PathBuf>, String> {
    let root = PathBuf::from("tests").join("golden");
    let dirs = if cases.is_empty() {
        discover_cases(&root)?
    } else {
        cases.iter().map(|case| root.join(case)).collect()
    };

    let mut stale = Vec::new();
    for dir in dirs {
        let report = golden_report(&dir.join(INPUT_NAME))?;
        let json = serde_json::to_string(&report)
            .map_err(|err| format!("cannot serialize report for {}: {err}", dir.display()))?;
        let expected = dir.join(EXPECTED_NAME);
        if check {
            if !matches_on_disk(&expected, &report)? {
                stale.push(dir);
            }
        } else {
            fs::write(&expected, json)
                .map_err(|err| format!("cannot write {}: {err}", expected.display()))?;
            println!("updated {}", expected.display());
        }
    }
    Ok(stale)
}

fn discover_cases(root: &Path) -> Result<Vec<PathBuf>, String> {
    let entries =
        fs::read_dir(root).map_err(|err| format!("cannot list {}: {err}", root.display()))?;
    let mut dirs = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| format!("cannot list {}: {err}", root.display()))?
            .path();
        if path.join(INPUT_NAME).is_file() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Decode a fixture with the volatile fields pinned so the output is stable.
fn golden_report(input: &Path) -> Result<InspectReport, String> {
    let mut report =
        inspect_file(input).map_err(|err| format!("cannot decode {}: {err}", input.display()))?;
    report.generated_at = DEFAULT_GENERATED_AT.to_string();
    report.input.path = INPUT_NAME.to_string();
    Ok(report)
}

fn matches_on_disk(expected: &Path, report: &InspectReport) -> Result<bool, String> {
    let Ok(text) = fs::read_to_string(expected) else {
        return Ok(false);
    };
    let on_disk: serde_json::Value = serde_json::from_str(&text)
        .map_err(|err| format!("cannot parse {}: {err}", expected.display()))?;
    let fresh = serde_json::to_value(report)
        .map_err(|err| format!("cannot serialize report: {err}"))?;
    Ok(on_disk == fresh)
}
