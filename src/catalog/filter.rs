//! Predicate queries over catalog entries.
//!
//! A [`CatalogFilter`] combines brand, price and spec predicates. Spec
//! predicates distinguish "required" thresholds, which reject entries whose
//! value is unknown, from soft ones, which let unknown values through.

use serde::{Deserialize, Serialize};

use crate::catalog::entry::{CatalogEntry, SpecSet};

/// Numeric spec fields a predicate can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecField {
    BatteryMah,
    RearCameraMp,
    FrontCameraMp,
    RamGb,
    StorageGb,
    RefreshRateHz,
    ScreenSizeInches,
}

impl SpecField {
    /// The field's value, or `None` when unknown.
    pub fn value(&self, specs: &SpecSet) -> Option<f64> {
        match self {
            SpecField::BatteryMah => specs.battery_capacity_mah.map(f64::from),
            SpecField::RearCameraMp => specs.rear_camera_main_mp.map(f64::from),
            SpecField::FrontCameraMp => specs.front_camera_mp.map(f64::from),
            SpecField::RamGb => specs.max_ram_gb(),
            SpecField::StorageGb => specs.max_storage_gb(),
            SpecField::RefreshRateHz => specs.refresh_rate.map(f64::from),
            SpecField::ScreenSizeInches => specs.screen_size,
        }
    }
}

/// Boolean features a predicate can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureFlag {
    FiveG,
    WirelessCharging,
    WaterResistance,
    ExpandableStorage,
    DualSim,
    FastCharging,
    AmoledDisplay,
    Nfc,
    Fingerprint,
    FaceUnlock,
}

impl FeatureFlag {
    /// Map a canonical feature name to a flag.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        let flag = match name.as_str() {
            "5g" => FeatureFlag::FiveG,
            "wireless charging" => FeatureFlag::WirelessCharging,
            "water resistance" => FeatureFlag::WaterResistance,
            "expandable storage" => FeatureFlag::ExpandableStorage,
            "dual sim" => FeatureFlag::DualSim,
            "fast charging" => FeatureFlag::FastCharging,
            "amoled display" => FeatureFlag::AmoledDisplay,
            "nfc" => FeatureFlag::Nfc,
            "fingerprint" => FeatureFlag::Fingerprint,
            "face unlock" => FeatureFlag::FaceUnlock,
            _ => return None,
        };
        Some(flag)
    }

    /// Whether the phone has the feature, or `None` when unknown.
    pub fn value(&self, specs: &SpecSet) -> Option<bool> {
        let text_present = |field: &Option<String>| field.as_ref().map(|s| !s.trim().is_empty());
        match self {
            FeatureFlag::FiveG => specs.has_5g,
            FeatureFlag::WirelessCharging => specs.wireless_charging,
            FeatureFlag::WaterResistance => text_present(&specs.water_resistance),
            FeatureFlag::ExpandableStorage => specs.expandable_storage,
            FeatureFlag::DualSim => specs.dual_sim,
            FeatureFlag::FastCharging => {
                match (
                    text_present(&specs.fast_charging),
                    text_present(&specs.charging_speed),
                ) {
                    (None, None) => None,
                    (a, b) => Some(a.unwrap_or(false) || b.unwrap_or(false)),
                }
            }
            FeatureFlag::AmoledDisplay => specs.screen_type.as_ref().map(|_| specs.is_amoled()),
            FeatureFlag::Nfc => specs.nfc,
            FeatureFlag::Fingerprint => specs.fingerprint_sensor,
            FeatureFlag::FaceUnlock => specs.face_unlock,
        }
    }
}

/// A single spec condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpecPredicate {
    /// `field >= min`.
    AtLeast {
        field: SpecField,
        min: f64,
        required: bool,
    },
    /// The feature is present.
    Has { feature: FeatureFlag, required: bool },
}

impl SpecPredicate {
    /// Threshold that rejects unknown values.
    pub fn required_at_least(field: SpecField, min: f64) -> Self {
        SpecPredicate::AtLeast {
            field,
            min,
            required: true,
        }
    }

    /// Threshold that lets unknown values through.
    pub fn at_least(field: SpecField, min: f64) -> Self {
        SpecPredicate::AtLeast {
            field,
            min,
            required: false,
        }
    }

    pub fn has(feature: FeatureFlag) -> Self {
        SpecPredicate::Has {
            feature,
            required: false,
        }
    }

    fn is_required(&self) -> bool {
        match self {
            SpecPredicate::AtLeast { required, .. } | SpecPredicate::Has { required, .. } => {
                *required
            }
        }
    }

    /// Evaluate against an entry's specs.
    pub fn matches(&self, specs: Option<&SpecSet>) -> bool {
        let outcome = specs.and_then(|specs| match self {
            SpecPredicate::AtLeast { field, min, .. } => field.value(specs).map(|v| v >= *min),
            SpecPredicate::Has { feature, .. } => feature.value(specs),
        });
        outcome.unwrap_or(!self.is_required())
    }
}

/// Query over active catalog entries. Empty brand lists mean "any brand".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub brands: Vec<String>,
    pub exclude_brands: Vec<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub spec_predicates: Vec<SpecPredicate>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brands = brands.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_excluded_brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_brands = brands.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price_min(mut self, min: f64) -> Self {
        self.price_min = Some(min);
        self
    }

    pub fn with_price_max(mut self, max: f64) -> Self {
        self.price_max = Some(max);
        self
    }

    pub fn with_price_range(self, min: f64, max: f64) -> Self {
        self.with_price_min(min).with_price_max(max)
    }

    pub fn with_predicate(mut self, predicate: SpecPredicate) -> Self {
        self.spec_predicates.push(predicate);
        self
    }

    /// Whether an entry satisfies every condition. The active flag is the
    /// store's concern.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if !self.brands.is_empty() && !self.brands.iter().any(|b| entry.is_brand(b)) {
            return false;
        }
        if self.exclude_brands.iter().any(|b| entry.is_brand(b)) {
            return false;
        }
        if self.price_min.is_some_and(|min| entry.price < min) {
            return false;
        }
        if self.price_max.is_some_and(|max| entry.price > max) {
            return false;
        }
        self.spec_predicates
            .iter()
            .all(|predicate| predicate.matches(entry.specs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone(battery: Option<u32>) -> CatalogEntry {
        let entry = CatalogEntry::new(1, "Samsung", "Galaxy A35", 1399.0);
        match battery {
            Some(mah) => entry.with_specs(SpecSet {
                battery_capacity_mah: Some(mah),
                ..Default::default()
            }),
            None => entry,
        }
    }

    #[test]
    fn test_brand_filters_ignore_case() {
        let filter = CatalogFilter::new().with_brands(["samsung"]);
        assert!(filter.matches(&phone(None)));

        let filter = CatalogFilter::new().with_excluded_brands(["SAMSUNG"]);
        assert!(!filter.matches(&phone(None)));
    }

    #[test]
    fn test_price_bounds_inclusive() {
        let filter = CatalogFilter::new().with_price_range(1399.0, 1399.0);
        assert!(filter.matches(&phone(None)));
        let filter = CatalogFilter::new().with_price_max(1398.99);
        assert!(!filter.matches(&phone(None)));
    }

    #[test]
    fn test_unknown_values_and_required_predicates() {
        let soft = CatalogFilter::new().with_predicate(SpecPredicate::at_least(SpecField::BatteryMah, 5000.0));
        let hard = CatalogFilter::new()
            .with_predicate(SpecPredicate::required_at_least(SpecField::BatteryMah, 5000.0));

        // unknown battery
        assert!(soft.matches(&phone(None)));
        assert!(!hard.matches(&phone(None)));

        // known values are compared either way
        assert!(soft.matches(&phone(Some(5000))));
        assert!(!soft.matches(&phone(Some(4500))));
        assert!(hard.matches(&phone(Some(6000))));
    }

    #[test]
    fn test_feature_flags() {
        assert_eq!(FeatureFlag::from_name("Water Resistance"), Some(FeatureFlag::WaterResistance));
        assert_eq!(FeatureFlag::from_name("performance"), None);

        let specs = SpecSet {
            has_5g: Some(false),
            water_resistance: Some("IP68".to_string()),
            ..Default::default()
        };
        assert_eq!(FeatureFlag::FiveG.value(&specs), Some(false));
        assert_eq!(FeatureFlag::WaterResistance.value(&specs), Some(true));
        assert_eq!(FeatureFlag::Nfc.value(&specs), None);
        assert_eq!(FeatureFlag::FastCharging.value(&specs), None);

        let predicate = SpecPredicate::has(FeatureFlag::FiveG);
        assert!(!predicate.matches(Some(&specs)));
        assert!(predicate.matches(None));
    }
}
