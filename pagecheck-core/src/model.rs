use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` column of the issues table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    Security,
    Performance,
    Mobile,
    #[serde(rename = "SEO")]
    Seo,
    #[serde(rename = "UI")]
    Ui,
}

impl IssueCategory {
    pub fn label(&self) -> &'static str {
        match self {
            IssueCategory::Security => "Security",
            IssueCategory::Performance => "Performance",
            IssueCategory::Mobile => "Mobile",
            IssueCategory::Seo => "SEO",
            IssueCategory::Ui => "UI",
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub metric: String,
    pub value: String,
}

impl MetricEntry {
    pub fn new(metric: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueEntry {
    #[serde(rename = "type")]
    pub issue_type: IssueCategory,
    pub description: String,
    pub severity: Severity,
}

impl IssueEntry {
    pub fn new(issue_type: IssueCategory, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            issue_type,
            description: description.into(),
            severity,
        }
    }
}

/// Outcome of one analysis: metrics in display order, issues in rule order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metrics: Vec<MetricEntry>,
    pub issues: Vec<IssueEntry>,
}

impl AnalysisResult {
    pub fn metric(&self, label: &str) -> Option<&str> {
        self.metrics
            .iter()
            .find(|m| m.metric == label)
            .map(|m| m.value.as_str())
    }

    pub fn has_issue(&self, description: &str) -> bool {
        self.issues.iter().any(|i| i.description == description)
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        SeverityCounts::from_issues(&self.issues)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn from_issues(issues: &[IssueEntry]) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}
