//! Preference overrides and the percentage match score.
//!
//! A [`PreferenceOverride`] carries the same named fields as a stored user
//! preference. It is built either from configured defaults or from an
//! [`ExtractedQuery`], so both shapes go through one scorer.

use serde::{Deserialize, Serialize};

use crate::catalog::entry::CatalogEntry;
use crate::config::PreferenceDefaults;
use crate::context::ActiveFilters;
use crate::error::Result;
use crate::nlu::{BudgetRange, ExtractedQuery, UsageType};
use crate::recommend::scorer::Scorer;
use crate::util::spec_text::format_amount;

const SEPARATOR: &str = " • ";

/// Explicit preference values for one recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceOverride {
    pub budget: BudgetRange,
    pub min_ram_gb: f64,
    pub min_storage_gb: f64,
    pub min_camera_mp: f64,
    pub min_battery_mah: f64,
    pub requires_5g: bool,
    pub min_screen_size: f64,
    pub max_screen_size: f64,
    pub primary_usage: Vec<UsageType>,
    pub important_features: Vec<String>,
    pub preferred_brands: Vec<String>,
}

impl PreferenceOverride {
    pub fn from_defaults(defaults: &PreferenceDefaults) -> Self {
        PreferenceOverride {
            budget: defaults.budget,
            min_ram_gb: defaults.min_ram_gb,
            min_storage_gb: defaults.min_storage_gb,
            min_camera_mp: defaults.min_camera_mp,
            min_battery_mah: defaults.min_battery_mah,
            requires_5g: false,
            min_screen_size: defaults.min_screen_size,
            max_screen_size: defaults.max_screen_size,
            primary_usage: Vec::new(),
            important_features: Vec::new(),
            preferred_brands: Vec::new(),
        }
    }

    /// Stated values from a message, defaults for the rest.
    pub fn from_query(query: &ExtractedQuery, defaults: &PreferenceDefaults) -> Self {
        let mut preference = Self::from_defaults(defaults);
        if let Some(budget) = query.budget {
            preference.budget = budget;
        }
        let spec = &query.spec_min;
        if let Some(ram) = spec.ram {
            preference.min_ram_gb = f64::from(ram);
        }
        if let Some(storage) = spec.storage {
            preference.min_storage_gb = f64::from(storage);
        }
        if let Some(camera) = spec.camera {
            preference.min_camera_mp = f64::from(camera);
        }
        if let Some(battery) = spec.battery {
            preference.min_battery_mah = f64::from(battery);
        }
        preference.requires_5g = query.spec_other.iter().any(|s| s == "5g");
        preference.primary_usage.extend(query.usage_type);
        preference.important_features.extend(query.feature.clone());
        preference.preferred_brands = query.brands_preferred.clone();
        preference
    }

    /// Layer a session's active filters over this preference.
    pub fn with_active_filters(mut self, filters: &ActiveFilters) -> Self {
        if let Some(budget) = filters.budget {
            self.budget = budget;
        }
        if let Some(battery) = filters.battery_min {
            self.min_battery_mah = f64::from(battery);
        }
        if let Some(camera) = filters.camera_min {
            self.min_camera_mp = f64::from(camera);
        }
        if let Some(ram) = filters.ram_min {
            self.min_ram_gb = f64::from(ram);
        }
        if let Some(storage) = filters.storage_min {
            self.min_storage_gb = f64::from(storage);
        }
        if let Some(usage) = filters.usage_type
            && !self.primary_usage.contains(&usage)
        {
            self.primary_usage.push(usage);
        }
        self
    }

    pub fn with_preferred_brands(mut self, brands: Vec<String>) -> Self {
        self.preferred_brands = brands;
        self
    }

    fn prefers(&self, entry: &CatalogEntry) -> bool {
        self.preferred_brands.iter().any(|b| entry.is_brand(b))
    }
}

/// Percentage match against a [`PreferenceOverride`].
///
/// The budget is a hard limit: an entry priced outside it scores 0.
#[derive(Debug, Clone)]
pub struct MatchScorer {
    preference: PreferenceOverride,
}

impl MatchScorer {
    pub fn new(preference: PreferenceOverride) -> Self {
        MatchScorer { preference }
    }

    pub fn preference(&self) -> &PreferenceOverride {
        &self.preference
    }

    /// Match percentage in 0-100, rounded to two decimals.
    pub fn match_score(&self, entry: &CatalogEntry) -> f64 {
        let pref = &self.preference;
        if !pref.budget.contains(entry.price) {
            return 0.0;
        }

        let mut score = 0.0;
        let mut max_score = 0.0;

        max_score += 50.0;
        if pref.preferred_brands.is_empty() || self.preference.prefers(entry) {
            score += 50.0;
        } else {
            score += 10.0;
        }

        max_score += 25.0;
        let range = pref.budget.max - pref.budget.min;
        if range > 0.0 {
            let distance = (entry.price - pref.budget.midpoint()).abs();
            score += (25.0 - distance / range * 10.0).max(15.0);
        } else {
            score += 25.0;
        }

        if let Some(specs) = entry.specs() {
            max_score += 10.0;
            if specs.max_ram_gb().is_some_and(|gb| gb >= pref.min_ram_gb) {
                score += 10.0;
            }

            max_score += 10.0;
            if specs
                .max_storage_gb()
                .is_some_and(|gb| gb >= pref.min_storage_gb)
            {
                score += 10.0;
            }

            max_score += 15.0;
            if specs
                .rear_camera_main_mp
                .is_some_and(|mp| f64::from(mp) >= pref.min_camera_mp)
            {
                score += 15.0;
            }

            max_score += 15.0;
            if specs
                .battery_capacity_mah
                .is_some_and(|mah| f64::from(mah) >= pref.min_battery_mah)
            {
                score += 15.0;
            }

            max_score += 10.0;
            if !pref.requires_5g || specs.has_5g == Some(true) {
                score += 10.0;
            }

            max_score += 10.0;
            if specs
                .screen_size
                .is_some_and(|size| size >= pref.min_screen_size && size <= pref.max_screen_size)
            {
                score += 10.0;
            }
        }

        (score / max_score * 10_000.0).round() / 100.0
    }

    /// Bullet-joined reasons the entry suits the preference.
    pub fn reasoning(&self, entry: &CatalogEntry) -> String {
        let pref = &self.preference;
        let mut reasons = Vec::new();

        if pref.prefers(entry) {
            reasons.push(format!("✓ From your preferred brand: {}", entry.brand));
        }
        if pref.budget.contains(entry.price) {
            reasons.push(format!(
                "Within your budget of RM{} - RM{}",
                format_amount(pref.budget.min),
                format_amount(pref.budget.max)
            ));
        }
        if let Some(specs) = entry.specs() {
            if let Some(gb) = specs.max_ram_gb().filter(|gb| *gb >= 8.0) {
                reasons.push(format!("Excellent performance with up to {gb}GB RAM"));
            }
            if let Some(mp) = specs.rear_camera_main_mp.filter(|mp| *mp >= 48) {
                reasons.push(format!("Great {mp}MP camera for photography"));
            }
            if let Some(mah) = specs.battery_capacity_mah.filter(|mah| *mah >= 4500) {
                reasons.push(format!("Long-lasting {mah}mAh battery"));
            }
            if specs.has_5g == Some(true) {
                reasons.push("Future-ready with 5G connectivity".to_string());
            }
        }

        if reasons.is_empty() {
            "Good overall specifications for the price".to_string()
        } else {
            reasons.join(SEPARATOR)
        }
    }
}

impl Scorer for MatchScorer {
    fn score(&self, entry: &CatalogEntry) -> Result<f64> {
        Ok(self.match_score(entry))
    }

    fn reason(&self, entry: &CatalogEntry) -> String {
        self.reasoning(entry)
    }

    fn name(&self) -> &'static str {
        "match"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::entry::SpecSet;
    use crate::nlu::SpecMinimums;

    fn phone(brand: &str, price: f64) -> CatalogEntry {
        CatalogEntry::new(1, brand, "Test", price).with_specs(SpecSet {
            ram_options: Some("8GB".to_string()),
            storage_options: Some("256GB".to_string()),
            rear_camera_main_mp: Some(50),
            battery_capacity_mah: Some(5000),
            has_5g: Some(true),
            screen_size: Some(6.5),
            ..SpecSet::default()
        })
    }

    fn preference() -> PreferenceOverride {
        PreferenceOverride::from_defaults(&PreferenceDefaults::default())
    }

    #[test]
    fn test_outside_budget_scores_zero() {
        let scorer = MatchScorer::new(preference());
        assert_eq!(scorer.match_score(&phone("Samsung", 6000.0)), 0.0);
    }

    #[test]
    fn test_perfect_match() {
        // midpoint of 500-5000 is 2750
        let scorer = MatchScorer::new(preference());
        assert_eq!(scorer.match_score(&phone("Samsung", 2750.0)), 100.0);
    }

    #[test]
    fn test_non_preferred_brand_scores_lower() {
        let pref = preference().with_preferred_brands(vec!["Apple".to_string()]);
        let scorer = MatchScorer::new(pref);
        let apple = scorer.match_score(&phone("Apple", 2750.0));
        let samsung = scorer.match_score(&phone("Samsung", 2750.0));
        assert_eq!(apple, 100.0);
        // 135 - 40 brand points
        assert_eq!(samsung, 70.37);
    }

    #[test]
    fn test_entry_without_specs() {
        let scorer = MatchScorer::new(preference());
        let bare = CatalogEntry::new(2, "Nokia", "3210", 2750.0);
        assert_eq!(scorer.match_score(&bare), 100.0);
        assert_eq!(
            scorer.reasoning(&bare),
            "Within your budget of RM500 - RM5,000"
        );
    }

    #[test]
    fn test_reasoning() {
        let pref = preference().with_preferred_brands(vec!["Samsung".to_string()]);
        let scorer = MatchScorer::new(pref);
        let reasons = scorer.reasoning(&phone("Samsung", 1999.0));
        assert_eq!(
            reasons,
            "✓ From your preferred brand: Samsung • Within your budget of RM500 - RM5,000 • \
             Excellent performance with up to 8GB RAM • Great 50MP camera for photography • \
             Long-lasting 5000mAh battery • Future-ready with 5G connectivity"
        );

        let scorer = MatchScorer::new(preference());
        assert_eq!(
            scorer.reasoning(&phone("Samsung", 9999.0).with_specs(SpecSet::default())),
            "Good overall specifications for the price"
        );
    }

    #[test]
    fn test_from_query() {
        let query = ExtractedQuery {
            budget: Some(BudgetRange::new(1000.0, 2000.0)),
            spec_min: SpecMinimums {
                battery: Some(5000),
                ..SpecMinimums::default()
            },
            spec_other: vec!["5g".to_string()],
            brands_preferred: vec!["Xiaomi".to_string()],
            ..ExtractedQuery::default()
        };
        let pref = PreferenceOverride::from_query(&query, &PreferenceDefaults::default());
        assert_eq!(pref.budget, BudgetRange::new(1000.0, 2000.0));
        assert_eq!(pref.min_battery_mah, 5000.0);
        assert_eq!(pref.min_ram_gb, 4.0);
        assert!(pref.requires_5g);
        assert_eq!(pref.preferred_brands, vec!["Xiaomi".to_string()]);
    }
}
