// Report generation for analysis results

use crate::error::AnalysisError;
use crate::model::{AnalysisResult, SeverityCounts};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "markdown",
        }
    }
}

/// An analysis result plus the page metadata shown around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub generated_at: i64,
    pub result: AnalysisResult,
}

impl AnalysisReport {
    pub fn new(url: &str, title: Option<String>, result: AnalysisResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.to_string(),
            title,
            generated_at: chrono::Utc::now().timestamp(),
            result,
        }
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        self.result.severity_counts()
    }
}

pub fn render_report(report: &AnalysisReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(report)),
        ReportFormat::Json => generate_json_report(report),
        ReportFormat::Markdown => Ok(generate_markdown_report(report)),
    }
}

pub fn generate_text_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push_str("                           PAGECHECK PAGE REPORT\n");
    out.push_str(RULE);
    out.push('\n');

    out.push_str(&format!("Target:       {}\n", report.url));
    if let Some(ref title) = report.title {
        out.push_str(&format!("Title:        {}\n", title));
    }
    out.push_str(&format!("Generated:    {}\n", format_timestamp(report.generated_at)));
    out.push_str(&format!("Report ID:    {}\n\n", report.id));

    out.push_str(RULE);
    out.push_str("METRICS\n");
    out.push_str(RULE);
    out.push('\n');

    let metric_rows: Vec<Vec<String>> = report
        .result
        .metrics
        .iter()
        .map(|m| vec![m.metric.clone(), m.value.clone()])
        .collect();
    out.push_str(&render_table(&["Metric", "Value"], &metric_rows));
    out.push('\n');

    out.push_str(RULE);
    out.push_str("ISSUES\n");
    out.push_str(RULE);
    out.push('\n');

    if report.result.issues.is_empty() {
        out.push_str("  No issues detected\n\n");
    } else {
        let issue_rows: Vec<Vec<String>> = report
            .result
            .issues
            .iter()
            .map(|i| {
                vec![
                    i.issue_type.label().to_string(),
                    i.description.clone(),
                    i.severity.as_str().to_uppercase(),
                ]
            })
            .collect();
        out.push_str(&render_table(&["Type", "Description", "Severity"], &issue_rows));
        out.push('\n');
    }

    let counts = report.severity_counts();
    out.push_str(&format!("Total Issues: {}\n", counts.total()));
    if counts.high > 0 {
        out.push_str(&format!("  [HIGH]     {}\n", counts.high));
    }
    if counts.medium > 0 {
        out.push_str(&format!("  [MEDIUM]   {}\n", counts.medium));
    }
    if counts.low > 0 {
        out.push_str(&format!("  [LOW]      {}\n", counts.low));
    }
    out.push('\n');

    out.push_str(RULE);
    out.push_str("Load time is simulated and robots.txt/sitemap.xml are text matches only.\n");
    out.push_str("Generated by pagecheck\n\n");

    out
}

pub fn generate_json_report(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    let counts = report.severity_counts();
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "pagecheck",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": format_iso8601_timestamp(report.generated_at),
                "format": ReportFormat::Json.as_str()
            },
            "page": {
                "id": report.id,
                "url": report.url,
                "title": report.title
            },
            "summary": {
                "total_issues": counts.total(),
                "severity_breakdown": {
                    "high": counts.high,
                    "medium": counts.medium,
                    "low": counts.low
                }
            },
            "metrics": report.result.metrics,
            "issues": report.result.issues
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Page report: {}\n\n", report.url));
    if let Some(ref title) = report.title {
        out.push_str(&format!("**Title:** {}  \n", escape_markdown(title)));
    }
    out.push_str(&format!(
        "**Generated:** {}\n\n",
        format_timestamp(report.generated_at)
    ));

    out.push_str("## Metrics\n\n");
    out.push_str("| Metric | Value |\n");
    out.push_str("|---|---|\n");
    for metric in &report.result.metrics {
        out.push_str(&format!(
            "| {} | {} |\n",
            escape_markdown(&metric.metric),
            escape_markdown(&metric.value)
        ));
    }

    out.push_str("\n## Issues\n\n");
    if report.result.issues.is_empty() {
        out.push_str("No issues detected.\n");
    } else {
        out.push_str("| Type | Description | Severity |\n");
        out.push_str("|---|---|---|\n");
        for issue in &report.result.issues {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                issue.issue_type.label(),
                escape_markdown(&issue.description),
                issue.severity.as_str()
            ));
        }
    }

    out
}

/// One-line notification for a failed analysis.
pub fn format_failure(url: &str, error: &AnalysisError) -> String {
    match error {
        AnalysisError::InvalidInput { reason, .. } => {
            format!("Invalid URL '{}': {}", url.trim(), reason)
        }
        AnalysisError::RetrievalFailed(e) => {
            format!("Could not analyze {}: {}", url.trim(), e)
        }
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut table = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    table.push_str(&render_row(&header, &widths));
    table.push_str("  ");
    table.push_str(
        &widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    table.push('\n');

    for row in rows {
        table.push_str(&render_row(row, &widths));
    }

    table
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    format!("  {}\n", padded.join("  ").trim_end())
}

fn escape_markdown(text: &str) -> String {
    text.replace('|', "\\|")
}

fn format_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Utc};
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now);
    datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn format_iso8601_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Utc};
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now);
    datetime.to_rfc3339()
}
