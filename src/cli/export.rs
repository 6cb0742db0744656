//! Saving scan results to files.
//!
//! Files are auto-named `scan-YYYYMMDD-HHMMSS.<ext>` inside the output
//! directory. When no format was requested on the command line, the user
//! is asked interactively.

use crate::cli::Cli;
use crate::config::AppSettings;
use crate::error::{CliResult, ExportError, ExportResult};
use crate::output::{self, ExportFormat};
use crate::scanner::{ScanReport, ScanResult};
use chrono::{DateTime, Local};
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// What the user picked at the save prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportChoice {
    Csv,
    Json,
    Both,
    Skip,
}

impl ExportChoice {
    /// Interpret a prompt answer. Anything unrecognized means skip.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_ascii_lowercase().as_str() {
            "1" | "csv" => Self::Csv,
            "2" | "json" => Self::Json,
            "3" | "both" => Self::Both,
            _ => Self::Skip,
        }
    }

    pub fn formats(self) -> &'static [ExportFormat] {
        match self {
            Self::Csv => &[ExportFormat::Csv],
            Self::Json => &[ExportFormat::Json],
            Self::Both => &[ExportFormat::Csv, ExportFormat::Json],
            Self::Skip => &[],
        }
    }
}

/// Build the file path for an export taken at `now`.
pub fn auto_name(dir: &Path, format: ExportFormat, now: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "scan-{}.{}",
        now.format("%Y%m%d-%H%M%S"),
        format.extension()
    ))
}

/// Write `results` into `dir` in `format`, returning the file path.
///
/// The output is rendered in memory first so a failure never leaves a
/// half-written file behind.
pub fn save(dir: &Path, format: ExportFormat, results: &[ScanResult]) -> ExportResult<PathBuf> {
    let mut content = Vec::new();
    format.write(&mut content, results)?;

    fs::create_dir_all(dir)?;
    let path = auto_name(dir, format, Local::now());
    fs::write(&path, content)?;

    debug!(path = %path.display(), %format, count = results.len(), "saved results");
    Ok(path)
}

/// Show the save menu on `output` and read one answer from `input`.
pub fn prompt_choice<R: BufRead, W: Write>(mut input: R, mut output: W) -> ExportResult<ExportChoice> {
    writeln!(output)?;
    writeln!(output, "Save the results?")?;
    writeln!(output, "1 - CSV")?;
    writeln!(output, "2 - JSON")?;
    writeln!(output, "3 - CSV + JSON")?;
    writeln!(output, "4 - Don't save")?;
    write!(output, "> ")?;
    output.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|e| ExportError::Prompt(e.to_string()))?;

    Ok(ExportChoice::from_answer(&answer))
}

/// Save the report as requested by flags, or ask when none were given.
pub fn handle_exports(cli: &Cli, settings: &AppSettings, report: &ScanReport) -> CliResult<()> {
    let mut formats = cli.export_formats();

    if formats.is_empty() && should_prompt(cli, settings) {
        let stdin = io::stdin();
        let choice = prompt_choice(stdin.lock(), io::stdout())?;
        formats = choice.formats().to_vec();
        if choice == ExportChoice::Skip {
            output::print_info("Results not saved.");
        }
    }

    let dir = cli.output_dir(settings);
    for format in formats {
        let path = save(&dir, format, &report.results)?;
        output::print_success(&format!("{} saved to {}", format, path.display()));
    }

    Ok(())
}

fn should_prompt(cli: &Cli, settings: &AppSettings) -> bool {
    !cli.no_prompt
        && settings.prompt_export
        && io::stdin().is_terminal()
        && console::user_attended()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_auto_name() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let path = auto_name(Path::new("scans"), ExportFormat::Csv, now);
        assert_eq!(path, Path::new("scans").join("scan-20240309-070501.csv"));

        let path = auto_name(Path::new("out"), ExportFormat::Json, now);
        assert_eq!(path, Path::new("out").join("scan-20240309-070501.json"));
    }

    #[test]
    fn test_answers() {
        assert_eq!(ExportChoice::from_answer("1\n"), ExportChoice::Csv);
        assert_eq!(ExportChoice::from_answer(" 2 "), ExportChoice::Json);
        assert_eq!(ExportChoice::from_answer("3"), ExportChoice::Both);
        assert_eq!(ExportChoice::from_answer("JSON"), ExportChoice::Json);
        assert_eq!(ExportChoice::from_answer("4"), ExportChoice::Skip);
        assert_eq!(ExportChoice::from_answer(""), ExportChoice::Skip);
        assert_eq!(ExportChoice::from_answer("yes please"), ExportChoice::Skip);
        assert_eq!(ExportChoice::Both.formats().len(), 2);
    }

    #[test]
    fn test_prompt_reads_answer() {
        let mut shown = Vec::new();
        let choice = prompt_choice("3\n".as_bytes(), &mut shown).unwrap();

        assert_eq!(choice, ExportChoice::Both);
        let menu = String::from_utf8(shown).unwrap();
        assert!(menu.contains("1 - CSV"));
        assert!(menu.ends_with("> "));
    }

    #[test]
    fn test_prompt_eof_skips() {
        let choice = prompt_choice("".as_bytes(), io::sink()).unwrap();
        assert_eq!(choice, ExportChoice::Skip);
    }

    #[test]
    fn test_save_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("nested").join("scans");
        let results = vec![ScanResult::open(Port::new(80).unwrap(), Some("hello".into()))];

        let path = save(&out_dir, ExportFormat::Csv, &results).unwrap();

        assert!(path.starts_with(&out_dir));
        assert_eq!(path.extension().unwrap(), "csv");
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "port,service,status,banner\n80,HTTP,open,hello\n");

        let path = save(&out_dir, ExportFormat::Json, &results).unwrap();
        let parsed: Vec<ScanResult> =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed, results);
    }
}
