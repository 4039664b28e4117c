//! Side-by-side comparison of two catalog entries.
//!
//! [`compare_entries`] is pure: it looks at two entries and reports a display
//! value and a winner for each attribute in a fixed list, plus an overall
//! winner decided by a subset of those attributes.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::entry::{CatalogEntry, SpecSet};
use crate::util::spec_text::{capacity_values_gb, format_price};

/// Which side an attribute favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    A,
    B,
    Tie,
    /// Not orderable, or a side is unknown.
    None,
}

impl Winner {
    /// The same outcome seen from the other side.
    pub fn mirror(self) -> Self {
        match self {
            Winner::A => Winner::B,
            Winner::B => Winner::A,
            other => other,
        }
    }
}

/// Aggregate outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallWinner {
    A,
    B,
    Tie,
}

impl fmt::Display for OverallWinner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallWinner::A => write!(f, "A"),
            OverallWinner::B => write!(f, "B"),
            OverallWinner::Tie => write!(f, "Tie"),
        }
    }
}

/// One compared attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeComparison {
    pub label: String,
    pub value_a: String,
    pub value_b: String,
    pub winner: Winner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub entry_a_id: u64,
    pub entry_b_id: u64,
    pub attributes: Vec<AttributeComparison>,
    pub overall_winner: OverallWinner,
}

impl ComparisonResult {
    pub fn attribute(&self, label: &str) -> Option<&AttributeComparison> {
        self.attributes.iter().find(|a| a.label == label)
    }

    /// Attribute wins per side, over every attribute.
    pub fn win_counts(&self) -> (usize, usize) {
        self.attributes.iter().fold((0, 0), |(a, b), attr| match attr.winner {
            Winner::A => (a + 1, b),
            Winner::B => (a, b + 1),
            _ => (a, b),
        })
    }
}

/// Attributes that decide the overall winner.
pub const DECISIVE_ATTRIBUTES: &[&str] = &[
    "Price",
    "Screen Size",
    "Rear Camera",
    "Battery",
    "5G",
    "Refresh Rate",
];

enum Rule {
    HigherWins(Option<f64>, Option<f64>),
    LowerWins(Option<f64>, Option<f64>),
    PresenceWins(Option<bool>, Option<bool>),
    Unordered,
}

impl Rule {
    fn winner(&self) -> Winner {
        match self {
            Rule::HigherWins(a, b) => numeric_winner(*a, *b),
            Rule::LowerWins(a, b) => numeric_winner(a.map(|v| -v), b.map(|v| -v)),
            Rule::PresenceWins(Some(a), Some(b)) => match (a, b) {
                (true, false) => Winner::A,
                (false, true) => Winner::B,
                _ => Winner::Tie,
            },
            Rule::PresenceWins(_, _) | Rule::Unordered => Winner::None,
        }
    }
}

fn numeric_winner(a: Option<f64>, b: Option<f64>) -> Winner {
    match (a, b) {
        (Some(a), Some(b)) => match a.partial_cmp(&b) {
            Some(Ordering::Greater) => Winner::A,
            Some(Ordering::Less) => Winner::B,
            Some(Ordering::Equal) => Winner::Tie,
            None => Winner::None,
        },
        _ => Winner::None,
    }
}

fn text(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(|| "N/A".to_string(), str::to_string)
}

fn with_unit<T: fmt::Display>(value: Option<T>, unit: &str) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v}{unit}"))
}

fn yes_no(value: Option<bool>) -> String {
    match value {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => "N/A".to_string(),
    }
}

/// Leading wattage of a charging description such as "45W wired".
fn watts(specs: &SpecSet) -> Option<f64> {
    let speed = specs.charging_speed.as_deref()?;
    let digits: String = speed
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().ok()
}

fn max_gb(options: Option<&str>) -> Option<f64> {
    options.and_then(|text| capacity_values_gb(text).into_iter().reduce(f64::max))
}

struct Side<'a> {
    entry: &'a CatalogEntry,
    specs: Option<&'a SpecSet>,
}

impl<'a> Side<'a> {
    fn new(entry: &'a CatalogEntry) -> Self {
        Side {
            entry,
            specs: entry.specs(),
        }
    }

    fn get<T>(&self, f: impl Fn(&SpecSet) -> Option<T>) -> Option<T> {
        self.specs.and_then(f)
    }

    fn str_field(&self, f: impl Fn(&SpecSet) -> Option<&str>) -> Option<&'a str> {
        self.specs.and_then(f)
    }

    fn text(&self, f: impl Fn(&SpecSet) -> Option<&str>) -> String {
        text(self.str_field(f))
    }
}

/// Compare two entries attribute by attribute.
pub fn compare_entries(a: &CatalogEntry, b: &CatalogEntry) -> ComparisonResult {
    let (sa, sb) = (Side::new(a), Side::new(b));
    let mut attributes = Vec::with_capacity(20);
    let mut push = |label: &str, value_a: String, value_b: String, rule: Rule| {
        attributes.push(AttributeComparison {
            label: label.to_string(),
            value_a,
            value_b,
            winner: rule.winner(),
        });
    };

    push(
        "Price",
        format_price(a.price),
        format_price(b.price),
        Rule::LowerWins(Some(a.price), Some(b.price)),
    );
    push("Brand", a.brand.clone(), b.brand.clone(), Rule::Unordered);

    let screen = |s: &Side| s.get(|x| x.screen_size);
    push(
        "Screen Size",
        with_unit(screen(&sa), "\""),
        with_unit(screen(&sb), "\""),
        Rule::HigherWins(screen(&sa), screen(&sb)),
    );
    push(
        "Resolution",
        sa.text(|x| x.screen_resolution.as_deref()),
        sb.text(|x| x.screen_resolution.as_deref()),
        Rule::Unordered,
    );
    push(
        "Display Type",
        sa.text(|x| x.screen_type.as_deref()),
        sb.text(|x| x.screen_type.as_deref()),
        Rule::Unordered,
    );

    let refresh = |s: &Side| s.get(|x| x.refresh_rate);
    push(
        "Refresh Rate",
        with_unit(refresh(&sa), "Hz"),
        with_unit(refresh(&sb), "Hz"),
        Rule::HigherWins(refresh(&sa).map(f64::from), refresh(&sb).map(f64::from)),
    );
    push(
        "Processor",
        sa.text(|x| x.processor.as_deref()),
        sb.text(|x| x.processor.as_deref()),
        Rule::Unordered,
    );

    let ram = |s: &Side| max_gb(s.str_field(|x| x.ram_options.as_deref()));
    push(
        "RAM",
        sa.text(|x| x.ram_options.as_deref()),
        sb.text(|x| x.ram_options.as_deref()),
        Rule::HigherWins(ram(&sa), ram(&sb)),
    );
    let storage = |s: &Side| max_gb(s.str_field(|x| x.storage_options.as_deref()));
    push(
        "Storage",
        sa.text(|x| x.storage_options.as_deref()),
        sb.text(|x| x.storage_options.as_deref()),
        Rule::HigherWins(storage(&sa), storage(&sb)),
    );

    let rear = |s: &Side| s.get(|x| x.rear_camera_main_mp);
    let rear_text = |s: &Side| match s.str_field(|x| x.rear_camera.as_deref()) {
        Some(description) if !description.trim().is_empty() => description.trim().to_string(),
        _ => with_unit(rear(s), "MP"),
    };
    push(
        "Rear Camera",
        rear_text(&sa),
        rear_text(&sb),
        Rule::HigherWins(rear(&sa).map(f64::from), rear(&sb).map(f64::from)),
    );
    let front = |s: &Side| s.get(|x| x.front_camera_mp);
    push(
        "Front Camera",
        with_unit(front(&sa), "MP"),
        with_unit(front(&sb), "MP"),
        Rule::HigherWins(front(&sa).map(f64::from), front(&sb).map(f64::from)),
    );

    let battery = |s: &Side| s.get(|x| x.battery_capacity_mah);
    push(
        "Battery",
        with_unit(battery(&sa), "mAh"),
        with_unit(battery(&sb), "mAh"),
        Rule::HigherWins(battery(&sa).map(f64::from), battery(&sb).map(f64::from)),
    );
    push(
        "Charging",
        sa.text(|x| x.charging_speed.as_deref()),
        sb.text(|x| x.charging_speed.as_deref()),
        Rule::HigherWins(sa.get(watts), sb.get(watts)),
    );

    let flags: [(&str, fn(&SpecSet) -> Option<bool>); 2] = [
        ("Wireless Charging", |x| x.wireless_charging),
        ("5G", |x| x.has_5g),
    ];
    for (label, flag) in flags {
        push(
            label,
            yes_no(sa.get(flag)),
            yes_no(sb.get(flag)),
            Rule::PresenceWins(sa.get(flag), sb.get(flag)),
        );
    }
    push(
        "NFC",
        yes_no(sa.get(|x| x.nfc)),
        yes_no(sb.get(|x| x.nfc)),
        Rule::PresenceWins(sa.get(|x| x.nfc), sb.get(|x| x.nfc)),
    );
    push(
        "OS",
        sa.text(|x| x.operating_system.as_deref()),
        sb.text(|x| x.operating_system.as_deref()),
        Rule::Unordered,
    );
    push(
        "Fingerprint",
        yes_no(sa.get(|x| x.fingerprint_sensor)),
        yes_no(sb.get(|x| x.fingerprint_sensor)),
        Rule::PresenceWins(
            sa.get(|x| x.fingerprint_sensor),
            sb.get(|x| x.fingerprint_sensor),
        ),
    );

    let water = |s: &Side| {
        s.str_field(|x| x.water_resistance.as_deref())
            .map(|v| !v.trim().is_empty())
    };
    push(
        "Water Resistance",
        sa.text(|x| x.water_resistance.as_deref()),
        sb.text(|x| x.water_resistance.as_deref()),
        Rule::PresenceWins(water(&sa), water(&sb)),
    );

    let weight = |s: &Side| s.get(|x| x.weight);
    push(
        "Weight",
        with_unit(weight(&sa), "g"),
        with_unit(weight(&sb), "g"),
        Rule::LowerWins(weight(&sa), weight(&sb)),
    );

    let overall_winner = overall(&attributes);
    ComparisonResult {
        entry_a_id: sa.entry.id,
        entry_b_id: sb.entry.id,
        attributes,
        overall_winner,
    }
}

fn overall(attributes: &[AttributeComparison]) -> OverallWinner {
    let (wins_a, wins_b) = attributes
        .iter()
        .filter(|attr| DECISIVE_ATTRIBUTES.contains(&attr.label.as_str()))
        .fold((0, 0), |(a, b), attr| match attr.winner {
            Winner::A => (a + 1, b),
            Winner::B => (a, b + 1),
            _ => (a, b),
        });
    match wins_a.cmp(&wins_b) {
        Ordering::Greater => OverallWinner::A,
        Ordering::Less => OverallWinner::B,
        Ordering::Equal => OverallWinner::Tie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flagship() -> CatalogEntry {
        CatalogEntry::new(1, "Samsung", "Galaxy S24 Ultra", 5999.0).with_specs(SpecSet {
            screen_size: Some(6.8),
            refresh_rate: Some(120),
            ram_options: Some("12GB".to_string()),
            storage_options: Some("256GB, 512GB, 1TB".to_string()),
            rear_camera: Some("200MP + 12MP + 10MP + 50MP".to_string()),
            rear_camera_main_mp: Some(200),
            front_camera_mp: Some(12),
            battery_capacity_mah: Some(5000),
            charging_speed: Some("45W".to_string()),
            has_5g: Some(true),
            weight: Some(232.0),
            ..SpecSet::default()
        })
    }

    fn budget() -> CatalogEntry {
        CatalogEntry::new(2, "Xiaomi", "Redmi 13C", 499.0).with_specs(SpecSet {
            screen_size: Some(6.74),
            refresh_rate: Some(90),
            ram_options: Some("4GB / 8GB".to_string()),
            storage_options: Some("128GB, 256GB".to_string()),
            rear_camera_main_mp: Some(50),
            front_camera_mp: Some(8),
            battery_capacity_mah: Some(5000),
            charging_speed: Some("18W".to_string()),
            has_5g: Some(false),
            weight: Some(192.0),
            ..SpecSet::default()
        })
    }

    #[test]
    fn test_attribute_winners() {
        let result = compare_entries(&flagship(), &budget());
        assert_eq!(result.attributes.len(), 20);

        let winner = |label: &str| result.attribute(label).unwrap().winner;
        assert_eq!(winner("Price"), Winner::B);
        assert_eq!(winner("Brand"), Winner::None);
        assert_eq!(winner("Screen Size"), Winner::A);
        assert_eq!(winner("RAM"), Winner::A);
        assert_eq!(winner("Storage"), Winner::A);
        assert_eq!(winner("Battery"), Winner::Tie);
        assert_eq!(winner("Charging"), Winner::A);
        assert_eq!(winner("5G"), Winner::A);
        assert_eq!(winner("Weight"), Winner::B);
        // both unknown
        assert_eq!(winner("NFC"), Winner::None);

        let price = result.attribute("Price").unwrap();
        assert_eq!(price.value_a, "RM5,999.00");
        assert_eq!(result.attribute("Rear Camera").unwrap().value_b, "50MP");
        assert_eq!(result.attribute("NFC").unwrap().value_a, "N/A");

        // price only vs screen, camera, 5G and refresh rate
        assert_eq!(result.overall_winner, OverallWinner::A);
    }

    #[test]
    fn test_comparison_is_symmetric() {
        let ab = compare_entries(&flagship(), &budget());
        let ba = compare_entries(&budget(), &flagship());
        for (x, y) in ab.attributes.iter().zip(&ba.attributes) {
            assert_eq!(x.label, y.label);
            assert_eq!(x.winner, y.winner.mirror(), "{}", x.label);
            assert_eq!(x.value_a, y.value_b);
        }
        assert_eq!(ba.overall_winner, OverallWinner::B);
    }

    #[test]
    fn test_unknown_specs_never_win() {
        let bare = CatalogEntry::new(3, "Nokia", "105", 499.0);
        let result = compare_entries(&bare, &budget());
        assert_eq!(result.attribute("Battery").unwrap().winner, Winner::None);
        assert_eq!(result.attribute("Price").unwrap().winner, Winner::Tie);
        assert_eq!(result.overall_winner, OverallWinner::Tie);
        assert_eq!(result.win_counts(), (0, 0));
    }
}
