use colored::Colorize;
use pagecheck::commands::command_argument_builder;
use pagecheck::handlers::{handle_analyze, handle_init, init_tracing};
use pagecheck_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    init_tracing(verbose, quiet);

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    match chosen_command.subcommand() {
        Some(("init", primary_command)) => {
            if let Err(e) = handle_init(primary_command) {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        }
        Some(("analyze", primary_command)) => handle_analyze(primary_command, quiet).await,
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
