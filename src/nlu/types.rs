//! Structured output of entity extraction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inclusive price range in RM.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            BudgetRange { min, max }
        } else {
            BudgetRange { min: max, max: min }
        }
    }

    /// Whether the price lies inside the range.
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }

    /// Midpoint of the range.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// What the user mainly does with a phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageType {
    Gaming,
    Photography,
    Business,
    Entertainment,
    #[serde(rename = "Social Media")]
    SocialMedia,
    Basic,
}

impl UsageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageType::Gaming => "Gaming",
            UsageType::Photography => "Photography",
            UsageType::Business => "Business",
            UsageType::Entertainment => "Entertainment",
            UsageType::SocialMedia => "Social Media",
            UsageType::Basic => "Basic",
        }
    }
}

impl fmt::Display for UsageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inferred user archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Senior,
    Student,
    Professional,
    Photographer,
    Gamer,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Senior => "senior",
            Persona::Student => "student",
            Persona::Professional => "professional",
            Persona::Photographer => "photographer",
            Persona::Gamer => "gamer",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a model mention was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Fuzzy,
}

/// A model-name candidate taken from the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMention {
    pub text: String,
    pub match_type: MatchType,
}

/// Minimum spec thresholds stated in the message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecMinimums {
    /// Battery capacity in mAh.
    pub battery: Option<u32>,
    /// Main rear camera in MP.
    pub camera: Option<u32>,
    /// RAM in GB.
    pub ram: Option<u32>,
    /// Storage in GB.
    pub storage: Option<u32>,
}

impl SpecMinimums {
    pub fn is_empty(&self) -> bool {
        self.battery.is_none() && self.camera.is_none() && self.ram.is_none() && self.storage.is_none()
    }
}

/// Everything extracted from a single message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedQuery {
    pub original_text: String,
    pub budget: Option<BudgetRange>,
    /// Canonical brand names, in order of first mention.
    pub brands_preferred: Vec<String>,
    pub brands_excluded: Vec<String>,
    pub models_mentioned: Vec<ModelMention>,
    pub spec_min: SpecMinimums,
    /// Non-numeric spec requirements such as `5g`.
    pub spec_other: Vec<String>,
    pub usage_type: Option<UsageType>,
    pub persona: Option<Persona>,
    pub feature: Option<String>,
    pub has_explicit_sentiment: bool,
    pub battery_focus: bool,
    pub camera_focus: bool,
    pub is_simple_brand_query: bool,
    pub context_continuation: bool,
    pub is_multi_model: bool,
}

impl ExtractedQuery {
    /// Whether any brand was mentioned with or without sentiment.
    pub fn has_brands(&self) -> bool {
        !self.brands_preferred.is_empty() || !self.brands_excluded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_range_normalizes_bounds() {
        let range = BudgetRange::new(3000.0, 1000.0);
        assert_eq!(range.min, 1000.0);
        assert_eq!(range.max, 3000.0);
        assert!(range.contains(1000.0));
        assert!(range.contains(3000.0));
        assert!(!range.contains(3000.5));
        assert_eq!(range.midpoint(), 2000.0);
    }

    #[test]
    fn test_usage_type_serde_names() {
        let json = serde_json::to_string(&UsageType::SocialMedia).unwrap();
        assert_eq!(json, "\"Social Media\"");
        let persona: Persona = serde_json::from_str("\"senior\"").unwrap();
        assert_eq!(persona, Persona::Senior);
    }
}
