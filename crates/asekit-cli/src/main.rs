use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use asekit_core::{FileHeader, FrameHeader, InspectReport};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

const EXAMPLES: &str = "Examples:\n  asekit inspect hero.aseprite -o hero.json\n  asekit inspect 'sprites/hero*.aseprite' --stdout --pretty\n  asekit header hero.aseprite";
const INPUT_HINT: &str = "expected a .aseprite or .ase file";
const SPRITE_EXTENSIONS: [&str; 2] = ["aseprite", "ase"];

#[derive(Parser, Debug)]
#[command(name = "asekit", version, long_version = LONG_VERSION)]
#[command(
    about = "Inspect Aseprite sprite files: layers, cels and decoding diagnostics.",
    after_help = EXAMPLES
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("ASEKIT_BUILD_COMMIT"),
    ", ",
    env!("ASEKIT_BUILD_DATE"),
    ")"
);

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a sprite and write a JSON report of its layers and cels.
    #[command(alias = "info", after_help = EXAMPLES)]
    Inspect(InspectArgs),
    /// Print the file header and every frame header as JSON.
    Header(HeaderArgs),
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Sprite path or glob pattern matching exactly one file
    input: PathBuf,

    /// Where to write the JSON report
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Print the JSON report on stdout instead of writing a file
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    #[command(flatten)]
    json: JsonStyle,

    /// Only print errors
    #[arg(long)]
    quiet: bool,

    /// Fail (exit code 2) when any chunk or cel had to be skipped
    #[arg(long)]
    strict: bool,

    /// Print every decoding diagnostic on stderr
    #[arg(long)]
    list_diagnostics: bool,
}

#[derive(Args, Debug)]
struct HeaderArgs {
    /// Sprite path or glob pattern matching exactly one file
    input: PathBuf,

    #[command(flatten)]
    json: JsonStyle,
}

#[derive(Args, Debug, Clone, Copy)]
struct JsonStyle {
    /// Indent the JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Single-line JSON output (default)
    #[arg(long)]
    compact: bool,
}

impl JsonStyle {
    fn render<T: Serialize>(self, value: &T) -> Result<String, CliError> {
        let rendered = if self.pretty && !self.compact {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        Ok(rendered.context("JSON serialization failed")?)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Inspect(args) => inspect(args),
        Command::Header(args) => header(args),
    };
    let Err(err) = outcome else {
        return ExitCode::SUCCESS;
    };
    eprintln!("error: {}", err.message);
    if let Some(hint) = &err.hint {
        eprintln!("hint: {hint}");
    }
    ExitCode::from(2)
}

/// User-facing failure: one error line plus an optional hint line.
#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn hinted(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            message: format!("{err:#}"),
            hint: None,
        }
    }
}

fn inspect(args: InspectArgs) -> Result<(), CliError> {
    let input = sprite_input(&args.input)?;
    let report_path = match (&args.report, args.stdout) {
        (_, true) => None,
        (Some(path), false) => {
            reject_input_overwrite(&input, path)?;
            Some(path.as_path())
        }
        (None, false) => {
            return Err(CliError::hinted(
                "missing output path",
                "use -o/--report or --stdout",
            ));
        }
    };

    let report = asekit_core::inspect_file(&input)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    let json = args.json.render(&report)?;

    match report_path {
        Some(path) => write_report(path, &json)?,
        None => print!("{json}"),
    }

    if !args.quiet {
        if args.list_diagnostics {
            list_diagnostics(&report);
        }
        if let Some(path) = report_path {
            eprintln!("OK: report written -> {}", path.display());
        }
    }

    if args.strict && !report.diagnostics.is_empty() {
        return Err(CliError::hinted(
            format!("{} decoding diagnostics reported", report.diagnostics.len()),
            "run with --list-diagnostics to see them",
        ));
    }
    Ok(())
}

#[derive(Serialize)]
struct HeaderDump {
    file: FileHeader,
    frames: Vec<FrameHeader>,
}

fn header(args: HeaderArgs) -> Result<(), CliError> {
    let input = sprite_input(&args.input)?;
    let bytes = asekit_core::load_file(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let file = asekit_core::read_file_header(&bytes)
        .with_context(|| format!("Bad file header in {}", input.display()))?;
    let frames = asekit_core::read_frame_headers(&bytes, &file)
        .with_context(|| format!("Bad frame header in {}", input.display()))?;

    println!("{}", args.json.render(&HeaderDump { file, frames })?);
    Ok(())
}

fn write_report(path: &Path, json: &str) -> Result<(), CliError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }
    fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

fn list_diagnostics(report: &InspectReport) {
    eprintln!("Diagnostics:");
    if report.diagnostics.is_empty() {
        eprintln!("  none");
    }
    for entry in &report.diagnostics {
        eprintln!(
            "  {} frame {} @ {}: {}",
            entry.id, entry.frame, entry.offset, entry.message
        );
    }
}

/// Refuse a report path that resolves to the input sprite itself.
fn reject_input_overwrite(input: &Path, report: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let dir = match report.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    // A directory that does not exist yet cannot hold the input.
    let (Ok(dir_abs), Some(name)) = (fs::canonicalize(dir), report.file_name()) else {
        return Ok(());
    };
    if dir_abs.join(name) == input_abs {
        return Err(CliError::hinted(
            format!("report path must differ from input: {}", report.display()),
            "choose a different output path",
        ));
    }
    Ok(())
}

/// Resolve a path or glob to exactly one existing sprite file.
fn sprite_input(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    let path = if pattern.contains(['*', '?', '[']) {
        expand_single(&pattern)?
    } else {
        input.to_path_buf()
    };

    if !path.is_file() {
        let what = if path.exists() {
            "input is not a file"
        } else {
            "input file not found"
        };
        return Err(CliError::hinted(
            format!("{what}: {}", path.display()),
            INPUT_HINT,
        ));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !SPRITE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(CliError::hinted(
            format!("unsupported input format '{}'", path.display()),
            INPUT_HINT,
        ));
    }
    Ok(path)
}

fn expand_single(pattern: &str) -> Result<PathBuf, CliError> {
    let bad_pattern = |detail: String| {
        CliError::hinted(format!("invalid input pattern '{pattern}'"), detail)
    };
    let mut matches = Vec::new();
    for entry in glob::glob(pattern).map_err(|err| bad_pattern(err.msg.to_string()))? {
        let path = entry.map_err(|err| bad_pattern(err.to_string()))?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::hinted(
            format!("no files match pattern '{pattern}'"),
            "check the path or quote the pattern",
        )),
        1 => Ok(matches.swap_remove(0)),
        count => {
            let shown: Vec<String> = matches
                .iter()
                .take(3)
                .map(|path| path.display().to_string())
                .collect();
            let more = if count > shown.len() { ", ..." } else { "" };
            Err(CliError::hinted(
                format!(
                    "multiple files match pattern '{pattern}' ({count} matches): {}{more}",
                    shown.join(", ")
                ),
                "pass a single sprite file, or run once per file",
            ))
        }
    }
}
