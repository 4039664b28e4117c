//! Catalog records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::util::spec_text::{max_capacity_gb, offers_capacity};

/// A phone in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub brand: String,
    pub model_name: String,
    /// Price in RM.
    pub price: f64,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub specs: Option<SpecSet>,
}

fn default_active() -> bool {
    true
}

impl CatalogEntry {
    /// An active entry without specifications.
    pub fn new<B: Into<String>, M: Into<String>>(id: u64, brand: B, model_name: M, price: f64) -> Self {
        CatalogEntry {
            id,
            brand: brand.into(),
            model_name: model_name.into(),
            price,
            release_date: None,
            is_active: true,
            specs: None,
        }
    }

    pub fn with_specs(mut self, specs: SpecSet) -> Self {
        self.specs = Some(specs);
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    /// "Brand Model", the name used for fuzzy lookup and display.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model_name)
    }

    /// Specifications, if the entry has any.
    pub fn specs(&self) -> Option<&SpecSet> {
        self.specs.as_ref()
    }

    /// Whether the brand equals `brand`, ignoring case.
    pub fn is_brand(&self, brand: &str) -> bool {
        self.brand.eq_ignore_ascii_case(brand)
    }
}

/// Technical specifications. Every field is optional; a missing field means
/// "unknown", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecSet {
    /// Inches.
    pub screen_size: Option<f64>,
    pub screen_resolution: Option<String>,
    /// e.g. "Dynamic AMOLED 2X", "IPS LCD".
    pub screen_type: Option<String>,
    /// Hz.
    pub refresh_rate: Option<u32>,
    pub processor: Option<String>,
    /// e.g. "Qualcomm", "MediaTek", "Apple".
    pub processor_brand: Option<String>,
    /// Free text, e.g. "8GB / 12GB".
    pub ram_options: Option<String>,
    /// Free text, e.g. "256GB, 512GB, 1TB".
    pub storage_options: Option<String>,
    pub expandable_storage: Option<bool>,
    /// Full rear camera description; `+` separates lenses.
    pub rear_camera: Option<String>,
    pub rear_camera_main_mp: Option<u32>,
    pub front_camera_mp: Option<u32>,
    pub battery_capacity_mah: Option<u32>,
    /// e.g. "45W".
    pub charging_speed: Option<String>,
    pub fast_charging: Option<String>,
    pub wireless_charging: Option<bool>,
    pub has_5g: Option<bool>,
    pub nfc: Option<bool>,
    pub operating_system: Option<String>,
    /// Grams.
    pub weight: Option<f64>,
    pub fingerprint_sensor: Option<bool>,
    pub face_unlock: Option<bool>,
    /// e.g. "IP68".
    pub water_resistance: Option<String>,
    pub dual_sim: Option<bool>,
}

const FLAGSHIP_PROCESSOR_BRANDS: &[&str] = &["qualcomm", "apple"];

impl SpecSet {
    /// Largest RAM option in GB.
    pub fn max_ram_gb(&self) -> Option<f64> {
        self.ram_options.as_deref().and_then(max_capacity_gb)
    }

    /// Largest storage option in GB, TB converted.
    pub fn max_storage_gb(&self) -> Option<f64> {
        self.storage_options.as_deref().and_then(max_capacity_gb)
    }

    /// Whether a RAM option of exactly `gb` is offered.
    pub fn offers_ram(&self, gb: f64) -> bool {
        self.ram_options
            .as_deref()
            .is_some_and(|text| offers_capacity(text, gb))
    }

    /// AMOLED panel, including Super/Dynamic AMOLED.
    pub fn is_amoled(&self) -> bool {
        self.screen_type
            .as_deref()
            .is_some_and(|t| t.to_ascii_lowercase().contains("amoled"))
    }

    /// Any OLED panel, AMOLED included.
    pub fn is_oled(&self) -> bool {
        self.screen_type
            .as_deref()
            .is_some_and(|t| t.to_ascii_lowercase().contains("oled"))
    }

    pub fn has_multi_lens(&self) -> bool {
        self.rear_camera.as_deref().is_some_and(|c| c.contains('+'))
    }

    pub fn has_flagship_processor(&self) -> bool {
        self.processor_brand.as_deref().is_some_and(|brand| {
            FLAGSHIP_PROCESSOR_BRANDS
                .iter()
                .any(|b| brand.eq_ignore_ascii_case(b))
        })
    }

    /// Whether the processor name contains any of the given chip families.
    pub fn processor_matches(&self, families: &[&str]) -> bool {
        self.processor.as_deref().is_some_and(|p| {
            let p = p.to_ascii_lowercase();
            families.iter().any(|family| p.contains(family))
        })
    }

    /// Fast charging is advertised in either charging field.
    pub fn has_fast_charging(&self) -> bool {
        let non_empty = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        non_empty(&self.fast_charging) || non_empty(&self.charging_speed)
    }

    pub fn has_water_resistance(&self) -> bool {
        self.water_resistance
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}
