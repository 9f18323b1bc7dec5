use clap::{arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

/// Accepts finite, non-negative seconds.
pub fn parse_load_time(value: &str) -> Result<f64, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("'{}' must be a non-negative number of seconds", value));
    }
    // -0 would otherwise print as "-0.00s"
    Ok(secs.abs())
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("pagecheck")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pagecheck")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner, progress and log output").required(false))
        .arg(
            arg!(-v --"verbose" "Show debug logging")
                .required(false)
                .conflicts_with("quiet"),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Writes a default pagecheck configuration file")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Directory to store the configuration in")
                        .default_value("~/.config/pagecheck/"),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite an existing configuration without asking")
                        .required(false),
                ),
        )
        .subcommand(
            command!("analyze")
                .about(
                    "Fetch a page and report size, tag presence and other quick heuristics, \
                plus a list of flagged issues.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The URL to analyze")
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of URLs to analyze one after another")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(false)
                        .help("Configuration file (default: ~/.config/pagecheck/config.toml)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"proxy" <ENDPOINT>)
                        .required(false)
                        .help("Proxy endpoint prefix; the encoded target URL is appended")
                        .conflicts_with("direct"),
                )
                .arg(
                    arg!(--"raw-proxy")
                        .required(false)
                        .help("The proxy returns the page body as-is instead of a JSON envelope")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("direct"),
                )
                .arg(
                    arg!(--"direct")
                        .required(false)
                        .help("Fetch pages directly instead of through the proxy")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"html-file" <PATH>)
                        .required(false)
                        .help("Analyze a local HTML file instead of fetching the URL")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Retrieval timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    arg!(--"load-time" <SECONDS>)
                        .required(false)
                        .help("Use a fixed simulated load time instead of a random one")
                        .value_parser(parse_load_time),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown", "md"])
                        .default_value("text"),
                ),
        )
}
