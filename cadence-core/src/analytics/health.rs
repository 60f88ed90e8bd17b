//! Health classification: consistency score to discrete tier.

use serde::{Deserialize, Serialize};

/// Discrete habit health tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLevel {
    Excellent,
    Good,
    NeedsImprovement,
    Critical,
}

impl HealthLevel {
    /// Returns the identifier used in persisted reports
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthLevel::Excellent => "excellent",
            HealthLevel::Good => "good",
            HealthLevel::NeedsImprovement => "needs_improvement",
            HealthLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HealthLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excellent" => Ok(HealthLevel::Excellent),
            "good" => Ok(HealthLevel::Good),
            "needs_improvement" => Ok(HealthLevel::NeedsImprovement),
            "critical" => Ok(HealthLevel::Critical),
            _ => Err(format!("unknown health level: {}", s)),
        }
    }
}

/// Health tier together with its display color and icon glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HabitHealth {
    /// Tier tag
    pub status: HealthLevel,
    /// Display color (hex)
    pub color: &'static str,
    /// Icon glyph
    pub icon: &'static str,
}

impl HabitHealth {
    /// Classify a consistency score. Total over all inputs; boundaries are
    /// closed at the lower edge of each tier.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self {
                status: HealthLevel::Excellent,
                color: "#10b981",
                icon: "🔥",
            }
        } else if score >= 50.0 {
            Self {
                status: HealthLevel::Good,
                color: "#f59e0b",
                icon: "👍",
            }
        } else if score >= 25.0 {
            Self {
                status: HealthLevel::NeedsImprovement,
                color: "#ef4444",
                icon: "⚠️",
            }
        } else {
            Self {
                status: HealthLevel::Critical,
                color: "#dc2626",
                icon: "❌",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(HabitHealth::from_score(80.0).status, HealthLevel::Excellent);
        assert_eq!(HabitHealth::from_score(79.9).status, HealthLevel::Good);
        assert_eq!(HabitHealth::from_score(50.0).status, HealthLevel::Good);
        assert_eq!(
            HabitHealth::from_score(49.9).status,
            HealthLevel::NeedsImprovement
        );
        assert_eq!(
            HabitHealth::from_score(25.0).status,
            HealthLevel::NeedsImprovement
        );
        assert_eq!(HabitHealth::from_score(24.9).status, HealthLevel::Critical);
        assert_eq!(HabitHealth::from_score(0.0).status, HealthLevel::Critical);
        assert_eq!(HabitHealth::from_score(100.0).status, HealthLevel::Excellent);
    }

    #[test]
    fn test_tier_display_data() {
        let health = HabitHealth::from_score(90.0);
        assert_eq!(health.color, "#10b981");
        assert_eq!(health.icon, "🔥");
    }

    #[test]
    fn test_level_roundtrip() {
        for level in [
            HealthLevel::Excellent,
            HealthLevel::Good,
            HealthLevel::NeedsImprovement,
            HealthLevel::Critical,
        ] {
            assert_eq!(level.as_str().parse::<HealthLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&HealthLevel::NeedsImprovement).unwrap();
        assert_eq!(json, "\"needs_improvement\"");
    }
}
