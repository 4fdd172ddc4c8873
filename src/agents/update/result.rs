use serde::Serialize;
use std::fmt;

/// Terminal classification of one package's update attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    Success,
    Skipped,
    Failed,
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpdateStatus::Success => "success",
            UpdateStatus::Skipped => "skipped",
            UpdateStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Outcome of checking one package, produced exactly once per package per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateResult {
    pub package: String,
    pub status: UpdateStatus,
    pub version_info: Option<String>,
    /// Skip reason or failure text
    pub error: Option<String>,
}

impl UpdateResult {
    pub fn success(package: impl Into<String>, version_info: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            status: UpdateStatus::Success,
            version_info: Some(version_info.into()),
            error: None,
        }
    }

    pub fn skipped(package: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            status: UpdateStatus::Skipped,
            version_info: None,
            error: Some(reason.into()),
        }
    }

    pub fn failed(package: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            status: UpdateStatus::Failed,
            version_info: None,
            error: Some(error.into()),
        }
    }
}
