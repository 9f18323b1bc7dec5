use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pagecheck_core::config::{AnalyzerConfig, CONFIG_FILE_NAME};
use pagecheck_core::error::SessionError;
use pagecheck_core::report::{AnalysisReport, ReportFormat, format_failure, render_report, save_report};
use pagecheck_core::{AnalysisSession, FixedLoadTime, PageAnalyzer};
use pagecheck_fetch::{ProxyEnvelope, StaticFetcher};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

/// Load URLs from either a file or a single URL argument
pub fn load_urls_from_source(
    url: Option<&String>,
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(url) = url {
        Ok(vec![url.clone()])
    } else {
        Err("Either --url or --hosts-file must be provided".to_string())
    }
}

/// Load URLs from a file, one per line. Blank lines and `#` comments are
/// skipped; everything else is passed through for the analyzer to validate.
pub fn load_urls_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if urls.is_empty() {
        return Err(format!("No URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Load the config file (explicit or default location) and apply command-line overrides.
pub fn resolve_config(args: &ArgMatches) -> Result<AnalyzerConfig> {
    let config_path = args.get_one::<PathBuf>("config");
    let mut config = AnalyzerConfig::load_or_default(config_path.map(PathBuf::as_path))
        .context("Failed to load configuration")?;

    if args.get_flag("direct") {
        config.use_proxy = false;
    }
    if let Some(endpoint) = args.get_one::<String>("proxy") {
        config.use_proxy = true;
        config.proxy_endpoint = endpoint.clone();
    }
    if args.get_flag("raw-proxy") {
        config.proxy_envelope = ProxyEnvelope::Raw;
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        config.timeout_secs = *timeout;
    }
    config.validate().context("Invalid configuration")?;

    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

pub fn build_session(
    config: &AnalyzerConfig,
    html_file: Option<&Path>,
    load_time: Option<f64>,
) -> Result<AnalysisSession> {
    let mut analyzer = match html_file {
        Some(path) => {
            let fetcher = StaticFetcher::from_file(path)
                .with_context(|| format!("Failed to read HTML file {}", path.display()))?;
            PageAnalyzer::new(Arc::new(fetcher))
        }
        None => config
            .build_analyzer()
            .context("Invalid analyzer configuration")?,
    };

    if let Some(secs) = load_time {
        anyhow::ensure!(
            secs.is_finite() && secs >= 0.0,
            "Load time must be a non-negative number of seconds, got {}",
            secs
        );
        analyzer = analyzer.with_load_time_source(Arc::new(FixedLoadTime(secs)));
    }

    Ok(AnalysisSession::new(analyzer))
}

#[derive(Debug, Default)]
pub struct AnalysisOutcome {
    pub reports: Vec<AnalysisReport>,
    pub failures: Vec<String>,
}

impl AnalysisOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Analyze each URL in turn. A failure is recorded and the batch continues.
pub async fn run_analysis(
    session: &AnalysisSession,
    urls: &[String],
    progress: Option<&ProgressBar>,
) -> AnalysisOutcome {
    let mut outcome = AnalysisOutcome::default();

    for (idx, url) in urls.iter().enumerate() {
        if let Some(pb) = progress {
            pb.set_message(format!("[{}/{}] Analyzing {}", idx + 1, urls.len(), url.trim()));
        }

        match session.run(url).await {
            Ok(report) => {
                info!(
                    "Analyzed {}: {} issue(s)",
                    report.url,
                    report.result.issues.len()
                );
                outcome.reports.push(report);
            }
            Err(SessionError::Analysis(e)) => outcome.failures.push(format_failure(url, &e)),
            Err(e @ SessionError::Busy) => outcome.failures.push(e.to_string()),
        }
    }

    outcome
}

/// Render several reports into one document. JSON reports become an array.
pub fn render_reports(reports: &[AnalysisReport], format: ReportFormat) -> Result<String> {
    let rendered = reports
        .iter()
        .map(|report| render_report(report, format))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to serialize report")?;

    Ok(match (format, rendered.len()) {
        (_, 1) => rendered.concat(),
        (ReportFormat::Json, _) => format!("[{}]", rendered.join(",\n")),
        _ => rendered.join("\n"),
    })
}

pub fn init_tracing(verbose: bool, quiet: bool) {
    let level = if quiet {
        LevelFilter::OFF
    } else if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> String {
    print!("{} ", msg.bright_cyan().bold());
    let _ = io::stdout().flush();
    let mut response = String::new();
    if io::stdin().read_line(&mut response).is_err() {
        return String::new();
    }
    response.trim().to_lowercase()
}

fn print_summary(report: &AnalysisReport) {
    let counts = report.severity_counts();
    eprintln!(
        "{} {} {} issue(s): {} high, {} medium, {} low",
        "✓".green().bold(),
        report.url.bright_white(),
        counts.total(),
        counts.high.to_string().red().bold(),
        counts.medium.to_string().yellow(),
        counts.low.to_string().blue()
    );
}

/// Write a default `config.toml` into `dir`. Returns `None` when a file is
/// already there and `overwrite` is false.
pub fn write_default_config(dir: &Path, overwrite: bool) -> Result<Option<PathBuf>> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() && !overwrite {
        return Ok(None);
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    let content = AnalyzerConfig::default().to_toml_string()?;
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(Some(config_path))
}

pub fn handle_init(args: &ArgMatches) -> Result<()> {
    print_divider();
    println!("{}", "  PAGECHECK INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let dir_arg = args
        .get_one::<String>("PATH")
        .map(String::as_str)
        .unwrap_or(pagecheck_core::config::DEFAULT_CONFIG_DIR);
    let force = args.get_flag("force");
    let expanded = shellexpand::tilde(dir_arg);
    let config_dir = Path::new(expanded.as_ref());
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    println!(
        "{} Target: {}",
        "→".blue(),
        config_path.display().to_string().bright_white()
    );
    println!();

    let mut overwrite = force;
    if config_path.exists() && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("Configuration file already exists:");
        println!(
            "  {} {}",
            "•".yellow(),
            config_path.display().to_string().bright_white()
        );
        println!();

        let response = print_prompt("Would you like to overwrite it? [y/N]:");
        println!();

        if response != "y" && response != "yes" {
            println!("{} Initialization cancelled.", "✗".red().bold());
            return Ok(());
        }
        overwrite = true;
    }

    match write_default_config(config_dir, overwrite)? {
        Some(path) => println!(
            "{} Configuration written to {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        ),
        None => println!("{} Configuration left unchanged", "→".blue()),
    }

    Ok(())
}

pub async fn handle_analyze(args: &ArgMatches, quiet: bool) {
    let urls = match load_urls_from_source(
        args.get_one::<String>("url"),
        args.get_one::<PathBuf>("hosts-file"),
    ) {
        Ok(urls) => urls,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let output = args.get_one::<PathBuf>("output");
    let html_file = args.get_one::<PathBuf>("html-file").map(PathBuf::as_path);
    let load_time = args.get_one::<f64>("load-time").copied();

    let session = match build_session(&config, html_file, load_time) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    };

    let outcome = run_analysis(&session, &urls, Some(&spinner)).await;
    spinner.finish_and_clear();

    for failure in &outcome.failures {
        eprintln!("{} {}", "✗".red().bold(), failure);
    }

    if !outcome.reports.is_empty() {
        if !quiet {
            for report in &outcome.reports {
                print_summary(report);
            }
            eprintln!();
        }

        let content = match render_reports(&outcome.reports, format) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        };

        match output {
            Some(path) => match save_report(&content, path) {
                Ok(()) => eprintln!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                ),
                Err(e) => {
                    eprintln!(
                        "{} Failed to save report to {}: {}",
                        "✗".red().bold(),
                        path.display(),
                        e
                    );
                    std::process::exit(1);
                }
            },
            None => print!("{}", content),
        }
    }

    if outcome.has_failures() {
        std::process::exit(1);
    }
}
