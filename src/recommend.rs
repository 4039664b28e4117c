//! Recommendation and ranking.
//!
//! Scorers turn a catalog entry into a non-negative number, the ranking
//! helpers order scored entries deterministically, and the
//! [`RecommendationEngine`] ties both to the catalog.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use phonewise::catalog::entry::{CatalogEntry, SpecSet};
//! use phonewise::catalog::memory::InMemoryCatalog;
//! use phonewise::config::RankingConfig;
//! use phonewise::recommend::{RecommendationEngine, SearchConstraints};
//!
//! # fn main() -> phonewise::error::Result<()> {
//! let catalog = InMemoryCatalog::from_entries(vec![
//!     CatalogEntry::new(1, "Xiaomi", "Redmi Note 13", 899.0).with_specs(SpecSet {
//!         battery_capacity_mah: Some(5000),
//!         ..SpecSet::default()
//!     }),
//!     CatalogEntry::new(2, "Apple", "iPhone 15", 3999.0).with_specs(SpecSet {
//!         battery_capacity_mah: Some(3349),
//!         ..SpecSet::default()
//!     }),
//! ]);
//! let engine = RecommendationEngine::new(Arc::new(catalog), RankingConfig::default());
//!
//! let results = engine.recommend_by_battery(&SearchConstraints::new(), 5)?;
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].reason, "5000mAh battery");
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod preference;
pub mod ranking;
pub mod scorer;

pub use engine::{FeaturePriority, RecommendationEngine, SearchConstraints};
pub use preference::{MatchScorer, PreferenceOverride};
pub use ranking::RankedResult;
pub use scorer::Scorer;
