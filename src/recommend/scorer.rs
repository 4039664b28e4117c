//! Scoring implementations for ranking catalog entries.
//!
//! Every scorer returns a non-negative score where higher is better. Unknown
//! spec fields contribute nothing to a score; they never fail it.

use std::fmt::Debug;

use crate::catalog::SpecField;
use crate::catalog::entry::{CatalogEntry, SpecSet};
use crate::catalog::filter::FeatureFlag;
use crate::error::Result;
use crate::nlu::{Persona, UsageType};
use crate::util::spec_text::format_price;

/// Trait for candidate scorers.
pub trait Scorer: Send + Sync + Debug {
    /// Calculate the score for a catalog entry.
    fn score(&self, entry: &CatalogEntry) -> Result<f64>;

    /// Short explanation shown next to the entry.
    fn reason(&self, entry: &CatalogEntry) -> String;

    /// Get the name of this scorer.
    fn name(&self) -> &'static str;
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn mah(specs: &SpecSet) -> f64 {
    specs.battery_capacity_mah.map(f64::from).unwrap_or(0.0)
}

fn rear_mp(specs: &SpecSet) -> f64 {
    specs.rear_camera_main_mp.map(f64::from).unwrap_or(0.0)
}

fn front_mp(specs: &SpecSet) -> f64 {
    specs.front_camera_mp.map(f64::from).unwrap_or(0.0)
}

fn refresh(specs: &SpecSet) -> u32 {
    specs.refresh_rate.unwrap_or(0)
}

fn screen(specs: &SpecSet) -> f64 {
    specs.screen_size.unwrap_or(0.0)
}

fn ram(specs: &SpecSet) -> f64 {
    specs.max_ram_gb().unwrap_or(0.0)
}

fn has_5g(specs: &SpecSet) -> bool {
    specs.has_5g == Some(true)
}

/// Points for cheap phones: at most RM1500 earns `low`, at most RM2500 `mid`.
fn price_tier(price: f64, low: f64, mid: f64) -> f64 {
    if price <= 1500.0 {
        low
    } else if price <= 2500.0 {
        mid
    } else {
        0.0
    }
}

/// Tiered bonus: the points of the first threshold the value reaches.
fn tier(value: f64, tiers: &[(f64, f64)]) -> f64 {
    tiers
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map_or(0.0, |(_, points)| *points)
}

fn bonus(condition: bool, points: f64) -> f64 {
    if condition { points } else { 0.0 }
}

/// Overall value for money.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueScorer;

impl ValueScorer {
    pub fn value(entry: &CatalogEntry) -> f64 {
        let Some(specs) = entry.specs() else {
            return 50.0;
        };
        50.0 + (rear_mp(specs) / 10.0).min(15.0)
            + (mah(specs) / 500.0).min(10.0)
            + bonus(refresh(specs) >= 90, 10.0)
            + bonus(has_5g(specs), 5.0)
            + bonus(entry.price < 1500.0, 10.0)
    }
}

impl Scorer for ValueScorer {
    fn score(&self, entry: &CatalogEntry) -> Result<f64> {
        Ok(Self::value(entry))
    }

    fn reason(&self, entry: &CatalogEntry) -> String {
        format!("Great value at {}", format_price(entry.price))
    }

    fn name(&self) -> &'static str {
        "value"
    }
}

/// Fit for a usage type, optionally adjusted for a persona.
#[derive(Debug, Clone, Copy)]
pub struct UsageScorer {
    usage: UsageType,
    persona: Option<Persona>,
}

impl UsageScorer {
    pub fn new(usage: UsageType) -> Self {
        UsageScorer {
            usage,
            persona: None,
        }
    }

    pub fn with_persona(mut self, persona: Option<Persona>) -> Self {
        self.persona = persona;
        self
    }

    pub fn usage(&self) -> UsageType {
        self.usage
    }

    /// Usage fit. Scales differ per usage type.
    pub fn usage_score(usage: UsageType, entry: &CatalogEntry) -> f64 {
        let Some(s) = entry.specs() else {
            return 0.0;
        };
        match usage {
            UsageType::Gaming => {
                tier(refresh(s) as f64, &[(120.0, 30.0), (90.0, 20.0)])
                    + bonus(s.offers_ram(8.0) || s.offers_ram(12.0), 25.0)
                    + bonus(s.has_flagship_processor(), 25.0)
                    + bonus(mah(s) >= 4500.0, 20.0)
            }
            UsageType::Photography => {
                tier(rear_mp(s), &[(108.0, 40.0), (64.0, 30.0), (48.0, 20.0)])
                    + bonus(s.has_multi_lens(), 15.0)
                    + bonus(s.is_amoled(), 15.0)
                    + bonus(front_mp(s) >= 32.0, 15.0)
            }
            UsageType::Business => {
                bonus(has_5g(s), 25.0)
                    + tier(mah(s), &[(5000.0, 30.0), (4500.0, 20.0)])
                    + bonus(s.has_flagship_processor(), 15.0)
                    + bonus(s.has_fast_charging(), 10.0)
            }
            UsageType::Entertainment => {
                tier(screen(s), &[(6.7, 25.0), (6.5, 15.0)])
                    + bonus(s.is_amoled(), 25.0)
                    + bonus(mah(s) >= 5000.0, 25.0)
                    + bonus(refresh(s) >= 90, 15.0)
            }
            UsageType::SocialMedia => {
                tier(front_mp(s), &[(32.0, 30.0), (16.0, 20.0)])
                    + bonus(rear_mp(s) >= 48.0, 20.0)
                    + bonus(s.is_amoled(), 15.0)
                    + bonus(mah(s) >= 4500.0, 15.0)
            }
            UsageType::Basic => {
                tier(mah(s), &[(5000.0, 40.0), (4000.0, 25.0)])
                    + bonus(screen(s) >= 6.0, 20.0)
                    + bonus(entry.price <= 1500.0, 30.0)
                    + bonus(s.offers_ram(4.0), 15.0)
            }
        }
    }

    /// Persona fit. Photographer and gamer personas are covered by their
    /// usage type and add nothing here.
    pub fn persona_score(persona: Persona, entry: &CatalogEntry) -> f64 {
        let price = entry.price;
        let Some(s) = entry.specs() else {
            return match persona {
                Persona::Senior => price_tier(price, 100.0, 50.0),
                Persona::Student => bonus((1000.0..=2500.0).contains(&price), 80.0),
                _ => 0.0,
            };
        };
        match persona {
            Persona::Senior => {
                mah(s) / 5.0
                    + bonus(screen(s) >= 6.5, 50.0)
                    + price_tier(price, 100.0, 50.0)
                    + bonus(s.is_oled(), 60.0)
            }
            Persona::Student => {
                let chip = if s.processor_matches(&[
                    "snapdragon 7",
                    "snapdragon 8",
                    "dimensity 8",
                    "dimensity 9",
                    "helio g9",
                ]) {
                    120.0
                } else if s.processor_matches(&["snapdragon", "dimensity", "helio"]) {
                    60.0
                } else {
                    0.0
                };
                bonus((1000.0..=2500.0).contains(&price), 80.0)
                    + chip
                    + tier(ram(s), &[(8.0, 80.0), (6.0, 50.0)])
                    + mah(s) / 8.0
            }
            Persona::Professional => {
                let battery = match mah(s) {
                    m if m >= 5000.0 => 150.0,
                    m if m >= 4500.0 => 100.0,
                    m => m / 30.0,
                };
                battery
                    + tier(
                        s.max_storage_gb().unwrap_or(0.0),
                        &[(256.0, 120.0), (128.0, 80.0)],
                    )
                    + bonus(
                        s.processor_matches(&[
                            "snapdragon 8",
                            "snapdragon 7",
                            "dimensity 8",
                            "dimensity 9",
                        ]),
                        100.0,
                    )
                    + bonus(ram(s) >= 8.0, 60.0)
            }
            Persona::Photographer | Persona::Gamer => 0.0,
        }
    }
}

impl Scorer for UsageScorer {
    fn score(&self, entry: &CatalogEntry) -> Result<f64> {
        let persona = self
            .persona
            .map_or(0.0, |persona| Self::persona_score(persona, entry));
        Ok(Self::usage_score(self.usage, entry) + persona)
    }

    fn reason(&self, entry: &CatalogEntry) -> String {
        let fallback = format!("Optimized for {}", self.usage);
        let Some(s) = entry.specs() else {
            return fallback;
        };
        match self.usage {
            UsageType::Gaming => format!(
                "{}Hz display, {} RAM - Perfect for gaming",
                or_na(s.refresh_rate),
                or_na(s.ram_options.as_deref())
            ),
            UsageType::Photography => format!(
                "{}MP main camera - Excellent for photography",
                or_na(s.rear_camera_main_mp)
            ),
            UsageType::Business => format!(
                "{}{}mAh battery - Ideal for business",
                if has_5g(s) { "5G, " } else { "" },
                or_na(s.battery_capacity_mah)
            ),
            UsageType::Entertainment => format!(
                "{}\" {} display - Great for entertainment",
                or_na(s.screen_size),
                or_na(s.screen_type.as_deref())
            ),
            UsageType::SocialMedia | UsageType::Basic => fallback,
        }
    }

    fn name(&self) -> &'static str {
        "usage"
    }
}

/// Camera quality.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraScorer;

impl Scorer for CameraScorer {
    fn score(&self, entry: &CatalogEntry) -> Result<f64> {
        Ok(entry.specs().map_or(0.0, |s| {
            rear_mp(s).min(50.0) + front_mp(s).min(20.0) + bonus(s.has_multi_lens(), 15.0)
        }))
    }

    fn reason(&self, entry: &CatalogEntry) -> String {
        let specs = entry.specs();
        format!(
            "{}MP main camera with {}",
            or_na(specs.and_then(|s| s.rear_camera_main_mp)),
            or_na(specs.and_then(|s| s.rear_camera.as_deref()))
        )
    }

    fn name(&self) -> &'static str {
        "camera"
    }
}

/// Processing power.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceScorer;

impl Scorer for PerformanceScorer {
    fn score(&self, entry: &CatalogEntry) -> Result<f64> {
        let Some(s) = entry.specs() else {
            return Ok(0.0);
        };
        let chip = match s.processor_brand.as_deref().map(str::to_ascii_lowercase) {
            Some(brand) if brand == "apple" => 40.0,
            Some(brand) if brand == "qualcomm" => 35.0,
            _ => 0.0,
        };
        let memory = if s.offers_ram(12.0) {
            30.0
        } else if s.offers_ram(8.0) {
            20.0
        } else {
            0.0
        };
        Ok(chip + memory + tier(refresh(s) as f64, &[(120.0, 20.0), (90.0, 10.0)]))
    }

    fn reason(&self, entry: &CatalogEntry) -> String {
        let specs = entry.specs();
        format!(
            "{} processor, {} RAM",
            or_na(specs.and_then(|s| s.processor_brand.as_deref())),
            or_na(specs.and_then(|s| s.ram_options.as_deref()))
        )
    }

    fn name(&self) -> &'static str {
        "performance"
    }
}

/// Battery capacity.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatteryScorer;

impl Scorer for BatteryScorer {
    fn score(&self, entry: &CatalogEntry) -> Result<f64> {
        Ok(entry.specs().map_or(0.0, |s| mah(s) / 100.0))
    }

    fn reason(&self, entry: &CatalogEntry) -> String {
        match entry.specs().and_then(|s| s.battery_capacity_mah) {
            Some(mah) => format!("{mah}mAh battery"),
            None => "Battery capacity not listed".to_string(),
        }
    }

    fn name(&self) -> &'static str {
        "battery"
    }
}

/// Display quality.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayScorer;

impl Scorer for DisplayScorer {
    fn score(&self, entry: &CatalogEntry) -> Result<f64> {
        Ok(entry.specs().map_or(0.0, |s| {
            bonus(s.is_amoled(), 30.0)
                + tier(refresh(s) as f64, &[(120.0, 30.0), (90.0, 20.0)])
                + tier(screen(s), &[(6.7, 20.0), (6.5, 10.0)])
        }))
    }

    fn reason(&self, entry: &CatalogEntry) -> String {
        let specs = entry.specs();
        format!(
            "{}\" {}, {}Hz",
            or_na(specs.and_then(|s| s.screen_size)),
            or_na(specs.and_then(|s| s.screen_type.as_deref())),
            or_na(specs.and_then(|s| s.refresh_rate))
        )
    }

    fn name(&self) -> &'static str {
        "display"
    }
}

/// Main camera resolution with a storage tie-breaker.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotographyScorer;

impl Scorer for PhotographyScorer {
    fn score(&self, entry: &CatalogEntry) -> Result<f64> {
        Ok(entry.specs().map_or(0.0, |s| {
            rear_mp(s) + s.max_storage_gb().unwrap_or(0.0) / 10.0
        }))
    }

    fn reason(&self, entry: &CatalogEntry) -> String {
        format!(
            "{}MP main camera - Excellent for photography",
            or_na(entry.specs().and_then(|s| s.rear_camera_main_mp))
        )
    }

    fn name(&self) -> &'static str {
        "photography"
    }
}

/// Raw value of a single numeric spec field.
#[derive(Debug, Clone, Copy)]
pub struct SpecFieldScorer {
    field: SpecField,
}

impl SpecFieldScorer {
    pub fn new(field: SpecField) -> Self {
        SpecFieldScorer { field }
    }
}

impl Scorer for SpecFieldScorer {
    fn score(&self, entry: &CatalogEntry) -> Result<f64> {
        Ok(entry
            .specs()
            .and_then(|s| self.field.value(s))
            .unwrap_or(0.0)
            .max(0.0))
    }

    fn reason(&self, entry: &CatalogEntry) -> String {
        let value = entry.specs().and_then(|s| self.field.value(s));
        let unit = match self.field {
            SpecField::BatteryMah => "mAh battery",
            SpecField::RearCameraMp => "MP main camera",
            SpecField::FrontCameraMp => "MP front camera",
            SpecField::RamGb => "GB RAM",
            SpecField::StorageGb => "GB storage",
            SpecField::RefreshRateHz => "Hz display",
            SpecField::ScreenSizeInches => "\" display",
        };
        format!("{}{unit}", or_na(value))
    }

    fn name(&self) -> &'static str {
        "spec_field"
    }
}

/// Value score with a bonus for entries known to have a feature.
#[derive(Debug, Clone)]
pub struct FeatureScorer {
    flag: FeatureFlag,
    label: String,
}

impl FeatureScorer {
    pub fn new<S: Into<String>>(flag: FeatureFlag, label: S) -> Self {
        FeatureScorer {
            flag,
            label: label.into(),
        }
    }

    fn known_present(&self, entry: &CatalogEntry) -> bool {
        entry.specs().and_then(|s| self.flag.value(s)) == Some(true)
    }
}

impl Scorer for FeatureScorer {
    fn score(&self, entry: &CatalogEntry) -> Result<f64> {
        Ok(bonus(self.known_present(entry), 100.0) + ValueScorer::value(entry))
    }

    fn reason(&self, entry: &CatalogEntry) -> String {
        if self.known_present(entry) {
            format!("Has {}", self.label)
        } else {
            format!("{} not listed", self.label)
        }
    }

    fn name(&self) -> &'static str {
        "feature"
    }
}
