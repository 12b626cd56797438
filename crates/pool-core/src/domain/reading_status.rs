// ============================================================================
// Pool Core - Reading Status
// File: crates/pool-core/src/domain/reading_status.rs
// Description: Forward-only lifecycle of a submitted reading
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reading status. Variant order is the lifecycle order, so `Ord` compares
/// lifecycle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    Open,
    Submitted,
    InProgress,
    Completed,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 4] = [
        ReadingStatus::Open,
        ReadingStatus::Submitted,
        ReadingStatus::InProgress,
        ReadingStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Open => "open",
            ReadingStatus::Submitted => "submitted",
            ReadingStatus::InProgress => "in_progress",
            ReadingStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(ReadingStatus::Open),
            "submitted" => Some(ReadingStatus::Submitted),
            "in_progress" => Some(ReadingStatus::InProgress),
            "completed" => Some(ReadingStatus::Completed),
            _ => None,
        }
    }

    /// Display label shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            ReadingStatus::Open => "Açık",
            ReadingStatus::Submitted => "Gönderildi",
            ReadingStatus::InProgress => "İnceleniyor",
            ReadingStatus::Completed => "Tamamlandı",
        }
    }

    /// Readonly for non-administrators: measurements are locked.
    pub fn is_readonly(&self) -> bool {
        matches!(self, ReadingStatus::InProgress | ReadingStatus::Completed)
    }

    /// Forward moves only; staying in place is allowed.
    pub fn can_transition_to(&self, next: ReadingStatus) -> bool {
        next >= *self
    }

    /// Status after a measurement revision: a draft or submitted reading
    /// becomes submitted, anything further along keeps its status.
    pub fn after_revision(&self) -> ReadingStatus {
        (*self).max(ReadingStatus::Submitted)
    }
}

impl Default for ReadingStatus {
    fn default() -> Self {
        ReadingStatus::Open
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
