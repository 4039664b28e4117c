//! Budget extraction.
//!
//! Patterns are tried in three tiers: explicit ranges, then single-bound
//! phrases, then a bare 3-5 digit number read as a maximum. Within a tier the
//! first pattern with an acceptable match wins. A number directly followed by
//! a spec unit (`5000mah`, `8 gb`) is never a price.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::NluConfig;
use crate::nlu::types::BudgetRange;

const NUM: &str = r"(\d+(?:\.\d+)?)";
const RM: &str = r"(?:rm\s*)?";

static THOUSANDS_SEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d),(\d{3})\b").expect("thousands pattern is valid"));
static K_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)\s*k\b").expect("k suffix pattern is valid"));
/// Wording that makes a `k` amount money rather than a resolution.
static MONEY_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\brm\s*\d|\b(?:budget|price|cost|spend|afford|cheap|cheaper|under|below|within|between|around|about|near|above|over|max|maximum|less than|more than|up to|at least|from)\b|\d\s*k\s*(?:to|-)\s*\d",
    )
    .expect("money context pattern is valid")
});
/// Words after a number that describe video or screen resolution.
static DISPLAY_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:k\b)?\s*(?:video|videos|display|resolution|recording|screen|footage|hdr|uhd|p\b)")
        .expect("display pattern is valid")
});
static UNIT_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:mah|mp|gb|tb|hz|w\b|inch|inches|"|mm|fps)"#).expect("unit pattern is valid")
});

#[derive(Debug, Clone, Copy)]
enum BoundKind {
    /// `(floor, X)`
    Max,
    /// `(X - spread, X + spread)`
    Near,
    /// `(X, ceiling)`
    Min,
}

/// Extracts a price range from lower-cased text.
#[derive(Debug, Clone)]
pub struct BudgetExtractor {
    ranges: Vec<Regex>,
    bounds: Vec<(Regex, BoundKind)>,
    bare: Regex,
    floor: f64,
    ceiling: f64,
    spread: f64,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("budget patterns are valid")
}

impl BudgetExtractor {
    pub fn new(config: &NluConfig) -> Self {
        let ranges = vec![
            compile(&format!(r"rm\s*{NUM}\s*(?:to|-|and)\s*rm\s*{NUM}")),
            compile(&format!(r"between\s+{RM}{NUM}\s+(?:and|to|-)\s+{RM}{NUM}")),
            compile(&format!(r"\b{RM}{NUM}\s*(?:to|-)\s*{RM}{NUM}")),
        ];
        let bounds = vec![
            (
                compile(&format!(
                    r"\b(?:under|below|within|less than|cheaper than|up to|not more than|no more than|max|maximum|budget of|budget is|budget)\s+{RM}{NUM}"
                )),
                BoundKind::Max,
            ),
            (
                compile(&format!(r"\b(?:around|about|near|approximately|roughly)\s+{RM}{NUM}")),
                BoundKind::Near,
            ),
            (
                compile(&format!(r"\b(?:above|over|more than|at least|from|starting at)\s+{RM}{NUM}")),
                BoundKind::Min,
            ),
            (compile(&format!(r"\brm\s*{NUM}")), BoundKind::Max),
        ];

        BudgetExtractor {
            ranges,
            bounds,
            bare: compile(r"(?:^|\s)(\d{3,5})(?:\s|$)"),
            floor: config.budget_floor,
            ceiling: config.above_ceiling,
            spread: config.near_spread,
        }
    }

    /// Normalize money notation: drop thousands separators, expand `3k`.
    ///
    /// `k` amounts are only expanded when the message talks about money, and
    /// never when they name a resolution (`4k video`).
    pub fn normalize(text: &str) -> String {
        let text = THOUSANDS_SEP.replace_all(text, "$1$2");
        if !MONEY_CONTEXT.is_match(&text) {
            return text.into_owned();
        }
        K_SUFFIX
            .replace_all(&text, |caps: &Captures| {
                let whole = &caps[0];
                let end = caps.get(0).map_or(text.len(), |m| m.end());
                if DISPLAY_AFTER.is_match(&text[end..]) {
                    return whole.to_string();
                }
                let value: f64 = caps[1].parse().unwrap_or(0.0);
                format!("{}", (value * 1000.0).round() as i64)
            })
            .into_owned()
    }

    pub fn extract(&self, text: &str) -> Option<BudgetRange> {
        let text = Self::normalize(&text.to_lowercase());

        for pattern in &self.ranges {
            for caps in pattern.captures_iter(&text) {
                let (Some(lo), Some(hi)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                if followed_by_unit(&text, lo.end()) || followed_by_unit(&text, hi.end()) {
                    continue;
                }
                let (Ok(lo), Ok(hi)) = (lo.as_str().parse::<f64>(), hi.as_str().parse::<f64>()) else {
                    continue;
                };
                return Some(BudgetRange::new(lo, hi));
            }
        }

        for (pattern, kind) in &self.bounds {
            for caps in pattern.captures_iter(&text) {
                let Some(value) = caps.get(1) else { continue };
                if followed_by_unit(&text, value.end()) {
                    continue;
                }
                let Ok(value) = value.as_str().parse::<f64>() else {
                    continue;
                };
                return Some(self.bound(*kind, value));
            }
        }

        for caps in self.bare.captures_iter(&text) {
            let Some(value) = caps.get(1) else { continue };
            if followed_by_unit(&text, value.end()) || DISPLAY_AFTER.is_match(&text[value.end()..]) {
                continue;
            }
            if let Ok(value) = value.as_str().parse::<f64>() {
                return Some(self.bound(BoundKind::Max, value));
            }
        }

        None
    }

    fn bound(&self, kind: BoundKind, value: f64) -> BudgetRange {
        match kind {
            BoundKind::Max => {
                // a cap below the floor keeps its own value as the lower bound
                let min = if value >= self.floor { self.floor } else { 0.0 };
                BudgetRange::new(min, value)
            }
            BoundKind::Near => {
                BudgetRange::new((value - self.spread).max(self.floor.min(value)), value + self.spread)
            }
            BoundKind::Min => BudgetRange::new(value, self.ceiling.max(value)),
        }
    }
}

fn followed_by_unit(text: &str, end: usize) -> bool {
    UNIT_AFTER.is_match(&text[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> BudgetExtractor {
        BudgetExtractor::new(&NluConfig::default())
    }

    fn extract(text: &str) -> Option<(f64, f64)> {
        extractor().extract(text).map(|b| (b.min, b.max))
    }

    #[test]
    fn test_between_round_trips() {
        for (lo, hi) in [(0.0, 0.0), (800.0, 1200.0), (1500.0, 3000.0), (1999.5, 2499.5), (3000.0, 15000.0)] {
            assert_eq!(extract(&format!("between {lo} and {hi}")), Some((lo, hi)));
        }
    }

    #[test]
    fn test_single_bounds() {
        assert_eq!(extract("under 2000"), Some((500.0, 2000.0)));
        assert_eq!(extract("phones below RM1,500"), Some((500.0, 1500.0)));
        assert_eq!(extract("within 5000"), Some((500.0, 5000.0)));
        assert_eq!(extract("around 2000"), Some((1500.0, 2500.0)));
        assert_eq!(extract("above 3000"), Some((3000.0, 15000.0)));
        assert_eq!(extract("max 2.5k"), Some((500.0, 2500.0)));
        assert_eq!(extract("rm2000"), Some((500.0, 2000.0)));
    }

    #[test]
    fn test_ranges() {
        assert_eq!(extract("rm1000 to rm2000"), Some((1000.0, 2000.0)));
        assert_eq!(extract("1000-2000"), Some((1000.0, 2000.0)));
        assert_eq!(extract("3k to 2k"), Some((2000.0, 3000.0)));
    }

    #[test]
    fn test_bare_number_is_a_maximum() {
        assert_eq!(extract("3000"), Some((500.0, 3000.0)));
        assert_eq!(extract("something for 1800 please"), Some((500.0, 1800.0)));
    }

    #[test]
    fn test_units_are_not_prices() {
        assert_eq!(extract("battery above 5000mah"), None);
        assert_eq!(extract("at least 8 gb ram"), None);
        assert_eq!(extract("5000 mah"), None);
        assert_eq!(extract("120hz screen"), None);
        assert_eq!(extract("above 5000 mah under 2000"), Some((500.0, 2000.0)));
    }

    #[test]
    fn test_resolutions_are_not_prices() {
        assert_eq!(extract("phone that records 4k video"), None);
        assert_eq!(extract("4k recording"), None);
        assert_eq!(extract("1080 display"), None);
        assert_eq!(extract("8k video under 3k"), Some((500.0, 3000.0)));
        assert_eq!(BudgetExtractor::normalize("shoots 4k"), "shoots 4k");
        assert_eq!(BudgetExtractor::normalize("budget 4k"), "budget 4000");
    }

    #[test]
    fn test_nothing_to_extract() {
        assert_eq!(extract("hello there"), None);
        assert_eq!(extract("iphone 15"), None);
    }
}
