use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PhonewiseError;

/// What the user wants from one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Help,
    ModelSearch,
    MultiModelSearch,
    SpecFilter,
    BatteryFocused,
    CameraFocused,
    UsageRecommendation,
    BrandQuery,
    BudgetQuery,
    Comparison,
    General,
}

impl Intent {
    pub const ALL: [Intent; 12] = [
        Intent::Greeting,
        Intent::Help,
        Intent::ModelSearch,
        Intent::MultiModelSearch,
        Intent::SpecFilter,
        Intent::BatteryFocused,
        Intent::CameraFocused,
        Intent::UsageRecommendation,
        Intent::BrandQuery,
        Intent::BudgetQuery,
        Intent::Comparison,
        Intent::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Help => "help",
            Intent::ModelSearch => "model_search",
            Intent::MultiModelSearch => "multi_model_search",
            Intent::SpecFilter => "spec_filter",
            Intent::BatteryFocused => "battery_focused",
            Intent::CameraFocused => "camera_focused",
            Intent::UsageRecommendation => "usage_recommendation",
            Intent::BrandQuery => "brand_query",
            Intent::BudgetQuery => "budget_query",
            Intent::Comparison => "comparison",
            Intent::General => "general",
        }
    }

    /// Intents answered with a phone list.
    pub fn is_recommendation(&self) -> bool {
        !matches!(self, Intent::Greeting | Intent::Help | Intent::Comparison)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = PhonewiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| PhonewiseError::invalid_argument(format!("unknown intent '{s}'")))
    }
}
