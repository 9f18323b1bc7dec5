// Issue rules evaluated against page signals

use crate::model::{IssueCategory, IssueEntry, Severity};
use crate::signals::PageSignals;

pub const SLOW_LOAD_THRESHOLD_SECS: f64 = 2.0;
pub const MAX_IMAGES: usize = 15;

pub const ISSUE_NO_HTTPS: &str = "Website is not using HTTPS";
pub const ISSUE_SLOW_LOAD: &str = "Page load time exceeds 2 seconds";
pub const ISSUE_NO_VIEWPORT: &str = "Missing viewport meta tag for mobile devices";
pub const ISSUE_NO_META_DESCRIPTION: &str = "Missing meta description";
pub const ISSUE_NO_H1: &str = "Missing H1 heading";
pub const ISSUE_NO_FAVICON: &str = "Missing favicon";
pub const ISSUE_NO_CANONICAL: &str = "Missing canonical tag";
pub const ISSUE_TOO_MANY_IMAGES: &str = "High number of images may affect load time";
pub const ISSUE_NO_ROBOTS_TXT: &str = "No reference to robots.txt found";
pub const ISSUE_NO_SITEMAP: &str = "No reference to sitemap.xml found";

pub type Rule = fn(&PageSignals) -> Option<IssueEntry>;

/// Evaluation order is the emission order of issues.
pub const RULES: [Rule; 10] = [
    check_https,
    check_load_time,
    check_viewport,
    check_meta_description,
    check_h1,
    check_favicon,
    check_canonical,
    check_image_count,
    check_robots_txt,
    check_sitemap,
];

fn issue_if(condition: bool, category: IssueCategory, description: &str, severity: Severity) -> Option<IssueEntry> {
    condition.then(|| IssueEntry::new(category, description, severity))
}

pub fn check_https(signals: &PageSignals) -> Option<IssueEntry> {
    issue_if(!signals.has_https, IssueCategory::Security, ISSUE_NO_HTTPS, Severity::High)
}

pub fn check_load_time(signals: &PageSignals) -> Option<IssueEntry> {
    issue_if(
        signals.load_time_seconds > SLOW_LOAD_THRESHOLD_SECS,
        IssueCategory::Performance,
        ISSUE_SLOW_LOAD,
        Severity::High,
    )
}

pub fn check_viewport(signals: &PageSignals) -> Option<IssueEntry> {
    issue_if(!signals.has_viewport, IssueCategory::Mobile, ISSUE_NO_VIEWPORT, Severity::High)
}

pub fn check_meta_description(signals: &PageSignals) -> Option<IssueEntry> {
    issue_if(
        !signals.has_meta_description,
        IssueCategory::Seo,
        ISSUE_NO_META_DESCRIPTION,
        Severity::Medium,
    )
}

pub fn check_h1(signals: &PageSignals) -> Option<IssueEntry> {
    issue_if(!signals.has_h1, IssueCategory::Seo, ISSUE_NO_H1, Severity::Medium)
}

pub fn check_favicon(signals: &PageSignals) -> Option<IssueEntry> {
    issue_if(!signals.has_favicon, IssueCategory::Ui, ISSUE_NO_FAVICON, Severity::Low)
}

pub fn check_canonical(signals: &PageSignals) -> Option<IssueEntry> {
    issue_if(!signals.has_canonical, IssueCategory::Seo, ISSUE_NO_CANONICAL, Severity::Medium)
}

pub fn check_image_count(signals: &PageSignals) -> Option<IssueEntry> {
    issue_if(
        signals.images_count > MAX_IMAGES,
        IssueCategory::Performance,
        ISSUE_TOO_MANY_IMAGES,
        Severity::Medium,
    )
}

// Only looks for the literal text in the page; the file itself is never requested.
pub fn check_robots_txt(signals: &PageSignals) -> Option<IssueEntry> {
    issue_if(!signals.has_robots_txt, IssueCategory::Seo, ISSUE_NO_ROBOTS_TXT, Severity::Medium)
}

pub fn check_sitemap(signals: &PageSignals) -> Option<IssueEntry> {
    issue_if(!signals.has_sitemap, IssueCategory::Seo, ISSUE_NO_SITEMAP, Severity::Medium)
}

pub fn evaluate_rules(signals: &PageSignals) -> Vec<IssueEntry> {
    RULES.iter().filter_map(|rule| rule(signals)).collect()
}
