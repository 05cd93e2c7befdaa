// Report export: spreadsheet, CSV, JSON and the console table

use crate::audit::{AuditReport, StatusSummary};
use colored::{ColoredString, Colorize};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use sitecheck_scanner::{DiscoverySource, ERROR_MARKER, StatusResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Base name of the exported file when no `--output` is given.
pub const DEFAULT_OUTPUT_STEM: &str = "url_status_codes";

pub const COLUMN_HEADERS: [&str; 2] = ["URL", "Status Code"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Some(ReportFormat::Xlsx),
            "csv" => Some(ReportFormat::Csv),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

/// `url_status_codes.<ext>` in the working directory.
pub fn default_output_path(format: ReportFormat) -> PathBuf {
    PathBuf::from(format!("{}.{}", DEFAULT_OUTPUT_STEM, format.extension()))
}

/// Write the results as a two-column sheet, overwriting `path`. Codes are
/// stored as numbers, failed checks as the `Error` marker.
pub fn write_xlsx(results: &[StatusResult], path: &Path) -> Result<(), ReportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, header) in COLUMN_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }

    for (idx, result) in results.iter().enumerate() {
        let row = idx as u32 + 1;
        worksheet.write_string(row, 0, &result.url)?;
        match result.status_code {
            Some(code) => worksheet.write_number(row, 1, code as f64)?,
            None => worksheet.write_string(row, 1, result.status_label())?,
        };
    }

    let url_width = results
        .iter()
        .map(|r| r.url.len())
        .max()
        .unwrap_or(0)
        .clamp(10, 100);
    worksheet.set_column_width(0, url_width as f64)?;
    worksheet.set_column_width(1, 12)?;

    workbook.save(path)?;
    info!("Wrote {} row(s) to {}", results.len(), path.display());
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn generate_csv_report(results: &[StatusResult]) -> String {
    let mut report = String::new();
    report.push_str(&COLUMN_HEADERS.join(","));
    report.push('\n');
    for result in results {
        report.push_str(&csv_field(&result.url));
        report.push(',');
        report.push_str(&result.status_label());
        report.push('\n');
    }
    report
}

fn describe_source(source: &DiscoverySource) -> &'static str {
    match source {
        DiscoverySource::Robots => "robots.txt",
        DiscoverySource::Fallback => "common path",
        DiscoverySource::Nothing { .. } => "none",
    }
}

pub fn generate_json_report(report: &AuditReport) -> Result<String, ReportError> {
    let rows: Vec<_> = report
        .results
        .iter()
        .map(|r| {
            serde_json::json!({
                "url": r.url,
                "status_code": match r.status_code {
                    Some(code) => serde_json::json!(code),
                    None => serde_json::json!(ERROR_MARKER),
                },
                "response_time_ms": r.response_time.as_millis() as u64,
                "error": r.error,
            })
        })
        .collect();

    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "sitecheck",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json",
            },
            "domain": report.domain,
            "discovery": {
                "source": describe_source(&report.discovery.source),
                "sitemaps": report.discovery.sitemaps,
            },
            "expansion": {
                "documents": report.expansion.documents,
                "failures": report.expansion.failures,
            },
            "summary": report.summary(),
            "results": rows,
        }
    });

    Ok(serde_json::to_string_pretty(&json_report)?)
}

fn color_status(result: &StatusResult) -> ColoredString {
    let label = format!("{:>5}", result.status_label());
    match result.status_code {
        Some(100..=199) => label.white(),
        Some(200..=299) => label.green(),
        Some(300..=399) => label.cyan(),
        Some(400..=499) => label.yellow(),
        Some(500..=599) => label.red(),
        Some(_) => label.normal(),
        None => label.red().bold(),
    }
}

/// Console rendering: one line per result, then the summary.
pub fn generate_text_report(report: &AuditReport) -> String {
    let divider = "━".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("{}\n", divider.bright_blue()));
    out.push_str(&format!(
        "{} {}\n",
        "Site:".bold(),
        report.domain.bright_white()
    ));
    out.push_str(&format!(
        "{} {} ({})\n",
        "Sitemaps:".bold(),
        report.discovery.sitemaps.len(),
        describe_source(&report.discovery.source)
    ));
    out.push_str(&format!("{}\n\n", divider.bright_blue()));

    for result in &report.results {
        out.push_str(&format!(
            "  {}  {}\n",
            color_status(result),
            result.url
        ));
    }

    if !report.expansion.failures.is_empty() {
        out.push_str(&format!("\n{}\n", "Sitemaps that could not be read:".yellow()));
        for failure in &report.expansion.failures {
            out.push_str(&format!("  {} {}\n", failure.url, failure.reason.dimmed()));
        }
    }

    out.push('\n');
    out.push_str(&generate_summary(&report.summary()));
    out
}

pub fn generate_summary(summary: &StatusSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "# Summary:".bold()));
    out.push_str(&format!("  URLs checked: {}\n", summary.total()));

    let rows = [
        ("1xx", summary.informational, "informational".white()),
        ("2xx", summary.success, "success".green()),
        ("3xx", summary.redirect, "redirect".cyan()),
        ("4xx", summary.client_error, "client error".yellow()),
        ("5xx", summary.server_error, "server error".red()),
        ("???", summary.other, "non-standard".normal()),
        ("Error", summary.errors, "no response".red().bold()),
    ];
    for (class, count, label) in rows {
        if count > 0 {
            out.push_str(&format!("  {:<6} {:>6}  {}\n", class, count, label));
        }
    }
    out
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Write `report` to `path` in the requested format.
pub fn export_report(
    report: &AuditReport,
    format: ReportFormat,
    path: &Path,
) -> Result<(), ReportError> {
    match format {
        ReportFormat::Xlsx => write_xlsx(&report.results, path),
        ReportFormat::Csv => Ok(save_report(&generate_csv_report(&report.results), path)?),
        ReportFormat::Json => Ok(save_report(&generate_json_report(report)?, path)?),
    }
}
