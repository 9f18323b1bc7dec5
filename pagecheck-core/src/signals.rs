//! Signals derived from the raw HTML text of a page.
//!
//! All checks are case-sensitive substring searches over the document text;
//! nothing here parses markup except [`extract_title`].

use crate::model::MetricEntry;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

pub const METRIC_PAGE_SIZE: &str = "Page Size";
pub const METRIC_IMAGES: &str = "Images";
pub const METRIC_VIEWPORT: &str = "Mobile Viewport";
pub const METRIC_FAVICON: &str = "Favicon";
pub const METRIC_META_DESCRIPTION: &str = "Meta Description";
pub const METRIC_H1: &str = "H1 Heading";
pub const METRIC_CANONICAL: &str = "Canonical Tag";
pub const METRIC_HTTPS: &str = "HTTPS";
pub const METRIC_ROBOTS_TXT: &str = "robots.txt";
pub const METRIC_SITEMAP: &str = "sitemap.xml";
pub const METRIC_LOAD_TIME: &str = "Load Time (simulated)";

/// Display order of the metrics table.
pub const METRIC_LABELS: [&str; 11] = [
    METRIC_PAGE_SIZE,
    METRIC_IMAGES,
    METRIC_VIEWPORT,
    METRIC_FAVICON,
    METRIC_META_DESCRIPTION,
    METRIC_H1,
    METRIC_CANONICAL,
    METRIC_HTTPS,
    METRIC_ROBOTS_TXT,
    METRIC_SITEMAP,
    METRIC_LOAD_TIME,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSignals {
    pub html_size_kb: f64,
    pub images_count: usize,
    pub has_viewport: bool,
    pub has_favicon: bool,
    pub has_meta_description: bool,
    pub has_h1: bool,
    pub has_canonical: bool,
    pub has_https: bool,
    pub has_robots_txt: bool,
    pub has_sitemap: bool,
    pub load_time_seconds: f64,
}

impl PageSignals {
    /// `requested_url` is the URL as the caller typed it, not the fetched one.
    pub fn derive(html: &str, requested_url: &str, load_time_seconds: f64) -> Self {
        Self {
            html_size_kb: html.len() as f64 / 1024.0,
            images_count: html.matches("<img").count(),
            has_viewport: html.contains(r#"name="viewport""#),
            has_favicon: html.contains(r#"rel="icon""#) || html.contains(r#"rel="shortcut icon""#),
            has_meta_description: html.contains(r#"name="description""#),
            has_h1: html.contains("<h1"),
            has_canonical: html.contains(r#"rel="canonical""#),
            has_https: requested_url.starts_with("https://"),
            has_robots_txt: html.contains("robots.txt"),
            has_sitemap: html.contains("sitemap.xml"),
            load_time_seconds,
        }
    }

    pub fn to_metrics(&self) -> Vec<MetricEntry> {
        vec![
            MetricEntry::new(METRIC_PAGE_SIZE, format!("{:.2} KB", self.html_size_kb)),
            MetricEntry::new(METRIC_IMAGES, self.images_count.to_string()),
            MetricEntry::new(METRIC_VIEWPORT, present(self.has_viewport)),
            MetricEntry::new(METRIC_FAVICON, present(self.has_favicon)),
            MetricEntry::new(METRIC_META_DESCRIPTION, present(self.has_meta_description)),
            MetricEntry::new(METRIC_H1, present(self.has_h1)),
            MetricEntry::new(METRIC_CANONICAL, present(self.has_canonical)),
            MetricEntry::new(METRIC_HTTPS, yes_no(self.has_https)),
            MetricEntry::new(METRIC_ROBOTS_TXT, yes_no(self.has_robots_txt)),
            MetricEntry::new(METRIC_SITEMAP, yes_no(self.has_sitemap)),
            MetricEntry::new(METRIC_LOAD_TIME, format!("{:.2}s", self.load_time_seconds)),
        ]
    }
}

fn present(flag: bool) -> &'static str {
    if flag { "Present" } else { "Missing" }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Text of the first `<title>` element, whitespace-collapsed.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<Vec<_>>()
        .join(" ");
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");

    if title.is_empty() { None } else { Some(title) }
}
