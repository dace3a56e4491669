use serde::{Deserialize, Serialize};

/// Named scoring policy selecting which factors dominate the priority
/// computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Inverse days-until-due; undated tasks sit at a small non-zero floor.
    Urgency,
    /// The 1–10 importance value, used directly.
    Importance,
    /// Weighted blend of per-batch-normalized urgency and importance.
    Balanced,
    /// Balanced plus a boost for tasks other tasks are waiting on.
    DependencyAware,
}

/// The strategy name did not match any known policy. No scoring is performed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown strategy: {0} (expected one of urgency, importance, balanced, dependency_aware)")]
pub struct UnknownStrategyError(pub String);

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Urgency,
        Strategy::Importance,
        Strategy::Balanced,
        Strategy::DependencyAware,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Urgency => "urgency",
            Strategy::Importance => "importance",
            Strategy::Balanced => "balanced",
            Strategy::DependencyAware => "dependency_aware",
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = UnknownStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "urgency" => Ok(Strategy::Urgency),
            "importance" => Ok(Strategy::Importance),
            "balanced" => Ok(Strategy::Balanced),
            "dependency_aware" => Ok(Strategy::DependencyAware),
            other => Err(UnknownStrategyError(other.to_string())),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
