pub mod analyzer;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod rules;
pub mod session;
pub mod signals;
pub mod timing;

use colored::Colorize;

pub use analyzer::{PageAnalyzer, analyze_html, validate_url};
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, ConfigError, SessionError};
pub use model::{AnalysisResult, IssueCategory, IssueEntry, MetricEntry, Severity, SeverityCounts};
pub use report::{AnalysisReport, ReportFormat};
pub use session::AnalysisSession;
pub use timing::{FixedLoadTime, LoadTimeSource, SimulatedLoadTime};

pub fn print_banner() {
    let banner = r#"
  ┌─┐┌─┐┌─┐┌─┐┌─┐┬ ┬┌─┐┌─┐┬┌─
  ├─┘├─┤│ ┬├┤ │  ├─┤├┤ │  ├┴┐
  ┴  ┴ ┴└─┘└─┘└─┘┴ ┴└─┘└─┘┴ ┴"#;
    eprintln!("{}", banner.bright_cyan().bold());
    eprintln!(
        "  {} {}\n",
        "quick heuristics for a single page".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
