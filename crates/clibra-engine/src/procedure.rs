//! Procedure files: batches of update or generate requests.
//!
//! One request per line, fields separated by whitespace:
//!
//! ```text
//! # exchange symbol begin end
//! bybit BTCUSDT 20240101 20240131
//! ```
//!
//! Generate procedures add an interval column. Blank lines and lines
//! starting with `#` are skipped.

use clibra_format::OutputFormat;
use clibra_types::ClibraError;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{GenerateRequest, UpdateRequest};

/// Reads a procedure file into a string.
///
/// # Errors
///
/// Returns [`ClibraError::Io`] if the file cannot be read.
pub fn read_procedure_file(path: &Path) -> Result<String, ClibraError> {
    Ok(fs::read_to_string(path)?)
}

/// Parses `exchange symbol begin end` lines.
///
/// # Errors
///
/// Returns [`ClibraError::Procedure`] naming the first malformed line.
pub fn parse_update_procedure(text: &str) -> Result<Vec<UpdateRequest>, ClibraError> {
    procedure_lines(text)
        .map(|(line, fields)| match fields.as_slice() {
            [exchange, symbol, begin, end] => UpdateRequest::parse(exchange, symbol, begin, end)
                .map_err(|e| procedure_error(line, &e)),
            _ => Err(field_count_error(line, 4, fields.len())),
        })
        .collect()
}

/// Parses `exchange symbol begin end interval` lines.
///
/// Every request writes `format` into `output_dir`.
///
/// # Errors
///
/// Returns [`ClibraError::Procedure`] naming the first malformed line.
pub fn parse_generate_procedure(
    text: &str,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<GenerateRequest>, ClibraError> {
    procedure_lines(text)
        .map(|(line, fields)| match fields.as_slice() {
            [exchange, symbol, begin, end, interval] => GenerateRequest::parse(
                exchange,
                symbol,
                begin,
                end,
                interval,
                PathBuf::from(output_dir),
            )
            .map(|request| request.with_format(format))
            .map_err(|e| procedure_error(line, &e)),
            _ => Err(field_count_error(line, 5, fields.len())),
        })
        .collect()
}

/// Yields one-based line numbers with their fields, skipping blanks and comments.
fn procedure_lines(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines().enumerate().filter_map(|(idx, line)| {
        let line_text = line.trim();
        if line_text.is_empty() || line_text.starts_with('#') {
            None
        } else {
            Some((idx + 1, line_text.split_whitespace().collect()))
        }
    })
}

fn procedure_error(line: usize, cause: &ClibraError) -> ClibraError {
    ClibraError::Procedure {
        line,
        reason: cause.to_string(),
    }
}

fn field_count_error(line: usize, expected: usize, found: usize) -> ClibraError {
    ClibraError::Procedure {
        line,
        reason: format!("expected {expected} fields, found {found}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_procedure() {
        let text = "# daily refresh\n\nbybit BTCUSDT 20240101 20240103\n  Bybit\tETHUSDT 2024-02-01 2024-02-01  \n";
        let requests = parse_update_procedure(text).unwrap();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].symbol, "BTCUSDT");
        assert_eq!(requests[0].range.total_days(), 3);
        assert_eq!(requests[1].exchange, "bybit");
    }

    #[test]
    fn test_generate_procedure() {
        let text = "bybit BTCUSDT 20240101 20240131 1h\nbybit ETHUSDT 20240101 20240131 300\n";
        let requests =
            parse_generate_procedure(text, Path::new("out"), OutputFormat::Ndjson).unwrap();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].interval.seconds(), 3_600);
        assert_eq!(requests[1].format, OutputFormat::Ndjson);
        assert_eq!(requests[1].output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_malformed_line_reports_number() {
        let text = "bybit BTCUSDT 20240101 20240103\n# ok\nbybit BTCUSDT 20240101\n";
        let err = parse_update_procedure(text).unwrap_err();
        assert!(matches!(err, ClibraError::Procedure { line: 3, .. }));

        let text = "bybit BTCUSDT 20240101 20240103 soon\n";
        let err = parse_generate_procedure(text, Path::new("."), OutputFormat::Csv).unwrap_err();
        assert!(matches!(err, ClibraError::Procedure { line: 1, ref reason } if reason.contains("soon")));
    }

    #[test]
    fn test_empty_procedure() {
        assert!(parse_update_procedure("\n# nothing\n").unwrap().is_empty());
    }
}
