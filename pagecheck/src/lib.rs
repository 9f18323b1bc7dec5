pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    AnalysisOutcome, build_session, load_urls_from_file, load_urls_from_source, render_reports,
    resolve_config, run_analysis,
};
