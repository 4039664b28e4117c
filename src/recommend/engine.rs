//! The recommendation engine.
//!
//! Each `recommend_*` method builds a catalog filter from the request, pulls
//! the matching active entries and ranks them with one scorer. Requests
//! naming more than one brand fan out: every brand is ranked on its own with
//! [`per_brand_limit`] slots, then the groups are merged and re-sorted. The
//! merged list is cut to `top_n`, so when brands outnumber `top_n / 2` the
//! lowest scoring brands can miss out.

use std::sync::{Arc, LazyLock};

use ahash::AHashSet;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::entry::CatalogEntry;
use crate::catalog::filter::FeatureFlag;
use crate::catalog::{CatalogFilter, CatalogStore, SpecField, SpecPredicate};
use crate::config::RankingConfig;
use crate::error::Result;
use crate::nlu::{BudgetRange, Persona, SpecMinimums, UsageType};
use crate::recommend::preference::{MatchScorer, PreferenceOverride};
use crate::recommend::ranking::{
    RankedResult, merge_groups, per_brand_limit, rank, round_robin, threshold_or_top,
};
use crate::recommend::scorer::{
    BatteryScorer, CameraScorer, DisplayScorer, FeatureScorer, PerformanceScorer,
    PhotographyScorer, Scorer, SpecFieldScorer, UsageScorer, ValueScorer,
};

static MODEL_LIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+and\s+|\s*&\s*|\s*,\s*").expect("model list separator is valid")
});

/// Brand and budget limits shared by every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConstraints {
    pub brands: Vec<String>,
    pub excluded_brands: Vec<String>,
    pub budget: Option<BudgetRange>,
}

impl SearchConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brands(mut self, brands: Vec<String>) -> Self {
        self.brands = brands;
        self
    }

    pub fn with_excluded_brands(mut self, brands: Vec<String>) -> Self {
        self.excluded_brands = brands;
        self
    }

    pub fn with_budget(mut self, budget: Option<BudgetRange>) -> Self {
        self.budget = budget;
        self
    }

    fn filter(&self, brands: &[String]) -> CatalogFilter {
        let mut filter = CatalogFilter::new()
            .with_brands(brands.iter().cloned())
            .with_excluded_brands(self.excluded_brands.iter().cloned());
        if let Some(budget) = self.budget {
            filter = filter.with_price_range(budget.min, budget.max);
        }
        filter
    }
}

/// The spec a ranking request puts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturePriority {
    Value,
    Battery,
    Camera,
    Display,
    Performance,
}

impl FeaturePriority {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "value" => Some(FeaturePriority::Value),
            "battery" => Some(FeaturePriority::Battery),
            "camera" => Some(FeaturePriority::Camera),
            "display" | "screen" => Some(FeaturePriority::Display),
            "performance" => Some(FeaturePriority::Performance),
            _ => None,
        }
    }

    fn scorer(&self) -> Box<dyn Scorer> {
        match self {
            FeaturePriority::Value => Box::new(ValueScorer),
            FeaturePriority::Battery => Box::new(BatteryScorer),
            FeaturePriority::Camera => Box::new(CameraScorer),
            FeaturePriority::Display => Box::new(DisplayScorer),
            FeaturePriority::Performance => Box::new(PerformanceScorer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateOrder {
    Catalog,
    PriceDescending,
}

/// Ranks catalog entries for every recommendation path.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogStore>,
    config: RankingConfig,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<dyn CatalogStore>, config: RankingConfig) -> Self {
        RecommendationEngine { catalog, config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogStore> {
        &self.catalog
    }

    fn fetch(&self, filter: &CatalogFilter, order: CandidateOrder) -> Result<Vec<CatalogEntry>> {
        let mut candidates = self.catalog.find_active(filter)?;
        if order == CandidateOrder::PriceDescending {
            candidates.sort_by(|a, b| b.price.total_cmp(&a.price));
        }
        Ok(candidates)
    }

    fn rank_with(
        &self,
        constraints: &SearchConstraints,
        predicates: &[SpecPredicate],
        scorer: &dyn Scorer,
        order: CandidateOrder,
        top_n: usize,
    ) -> Result<Vec<RankedResult>> {
        let with_predicates = |filter: CatalogFilter| {
            predicates
                .iter()
                .fold(filter, |filter, predicate| filter.with_predicate(*predicate))
        };

        if constraints.brands.len() > 1 {
            let per_brand = per_brand_limit(top_n, constraints.brands.len());
            let groups = constraints
                .brands
                .iter()
                .map(|brand| {
                    let filter = with_predicates(constraints.filter(std::slice::from_ref(brand)));
                    Ok(rank(self.fetch(&filter, order)?, scorer, per_brand))
                })
                .collect::<Result<Vec<_>>>()?;
            debug!(
                "Fan-out over {} brands with {per_brand} slots each using '{}'",
                constraints.brands.len(),
                scorer.name()
            );
            return Ok(merge_groups(groups, top_n));
        }

        let filter = with_predicates(constraints.filter(&constraints.brands));
        let candidates = self.fetch(&filter, order)?;
        debug!(
            "Ranking {} candidates using '{}'",
            candidates.len(),
            scorer.name()
        );
        Ok(rank(candidates, scorer, top_n))
    }

    /// Best value for money, most expensive first among equals.
    pub fn recommend_by_budget(
        &self,
        constraints: &SearchConstraints,
        top_n: usize,
    ) -> Result<Vec<RankedResult>> {
        self.rank_with(
            constraints,
            &[],
            &ValueScorer,
            CandidateOrder::PriceDescending,
            top_n,
        )
    }

    /// Fit for a usage type, adjusted for a persona when one is known.
    pub fn recommend_by_usage(
        &self,
        usage: UsageType,
        persona: Option<Persona>,
        constraints: &SearchConstraints,
        top_n: usize,
    ) -> Result<Vec<RankedResult>> {
        let scorer = UsageScorer::new(usage).with_persona(persona);
        self.rank_with(constraints, &[], &scorer, CandidateOrder::Catalog, top_n)
    }

    /// Largest batteries at or above the configured minimum.
    pub fn recommend_by_battery(
        &self,
        constraints: &SearchConstraints,
        top_n: usize,
    ) -> Result<Vec<RankedResult>> {
        let min = f64::from(self.config.battery_focus_min_mah);
        self.rank_with(
            constraints,
            &[SpecPredicate::required_at_least(SpecField::BatteryMah, min)],
            &BatteryScorer,
            CandidateOrder::Catalog,
            top_n,
        )
    }

    /// Best main cameras at or above `min_mp`, or the configured minimum.
    pub fn recommend_for_photography(
        &self,
        min_mp: Option<u32>,
        constraints: &SearchConstraints,
        top_n: usize,
    ) -> Result<Vec<RankedResult>> {
        let min = f64::from(min_mp.unwrap_or(self.config.photography_min_mp));
        self.rank_with(
            constraints,
            &[SpecPredicate::required_at_least(SpecField::RearCameraMp, min)],
            &PhotographyScorer,
            CandidateOrder::Catalog,
            top_n,
        )
    }

    /// Entries meeting every stated threshold. Unknown values fail a
    /// threshold here.
    pub fn recommend_by_specs(
        &self,
        spec: &SpecMinimums,
        constraints: &SearchConstraints,
        top_n: usize,
    ) -> Result<Vec<RankedResult>> {
        let thresholds = [
            (SpecField::BatteryMah, spec.battery),
            (SpecField::RearCameraMp, spec.camera),
            (SpecField::RamGb, spec.ram),
            (SpecField::StorageGb, spec.storage),
        ];
        let predicates: Vec<SpecPredicate> = thresholds
            .iter()
            .filter_map(|(field, min)| {
                min.map(|min| SpecPredicate::required_at_least(*field, f64::from(min)))
            })
            .collect();

        let scorer: Box<dyn Scorer> = if spec.battery.is_some() {
            Box::new(SpecFieldScorer::new(SpecField::BatteryMah))
        } else if spec.camera.is_some() {
            Box::new(SpecFieldScorer::new(SpecField::RearCameraMp))
        } else {
            Box::new(ValueScorer)
        };
        self.rank_with(
            constraints,
            &predicates,
            scorer.as_ref(),
            CandidateOrder::Catalog,
            top_n,
        )
    }

    /// Best value among the requested brands. Empty without a brand.
    pub fn recommend_by_brand(
        &self,
        constraints: &SearchConstraints,
        top_n: usize,
    ) -> Result<Vec<RankedResult>> {
        if constraints.brands.is_empty() {
            return Ok(Vec::new());
        }
        self.rank_with(
            constraints,
            &[],
            &ValueScorer,
            CandidateOrder::Catalog,
            top_n,
        )
    }

    /// Entries with a canonical feature. Entries whose value is unknown stay
    /// in the running behind those known to have it.
    pub fn recommend_by_feature(
        &self,
        feature: &str,
        constraints: &SearchConstraints,
        top_n: usize,
    ) -> Result<Vec<RankedResult>> {
        if let Some(priority) = FeaturePriority::from_name(feature) {
            return self.recommend_by_priority(priority, constraints, top_n);
        }
        match FeatureFlag::from_name(feature) {
            Some(FeatureFlag::AmoledDisplay) => self.rank_with(
                constraints,
                &[SpecPredicate::has(FeatureFlag::AmoledDisplay)],
                &DisplayScorer,
                CandidateOrder::Catalog,
                top_n,
            ),
            Some(flag) => self.rank_with(
                constraints,
                &[SpecPredicate::has(flag)],
                &FeatureScorer::new(flag, feature_label(feature)),
                CandidateOrder::Catalog,
                top_n,
            ),
            None => self.recommend_by_budget(constraints, top_n),
        }
    }

    /// Rank by a single spec priority.
    pub fn recommend_by_priority(
        &self,
        priority: FeaturePriority,
        constraints: &SearchConstraints,
        top_n: usize,
    ) -> Result<Vec<RankedResult>> {
        let scorer = priority.scorer();
        self.rank_with(
            constraints,
            &[],
            scorer.as_ref(),
            CandidateOrder::Catalog,
            top_n,
        )
    }

    /// Percentage match against explicit preferences.
    ///
    /// With several preferred brands the result is interleaved so that each
    /// brand is represented.
    pub fn recommend_with_preferences(
        &self,
        preference: &PreferenceOverride,
        excluded_brands: &[String],
        top_n: usize,
    ) -> Result<Vec<RankedResult>> {
        let filter = CatalogFilter::new().with_excluded_brands(excluded_brands.iter().cloned());
        let candidates = self.fetch(&filter, CandidateOrder::Catalog)?;
        let scorer = MatchScorer::new(preference.clone());
        let ranked = rank(candidates, &scorer, usize::MAX);

        let threshold = self.config.match_threshold;
        if preference.preferred_brands.len() > 1 {
            Ok(round_robin(
                &ranked,
                &preference.preferred_brands,
                threshold,
                top_n,
            ))
        } else {
            Ok(threshold_or_top(ranked, threshold, top_n))
        }
    }

    /// Active entries priced within the configured spread of the given
    /// entry, best value first. Empty when the id is unknown.
    pub fn similar_to(&self, id: u64, top_n: usize) -> Result<Vec<RankedResult>> {
        let Some(entry) = self.catalog.get_by_id(id)? else {
            return Ok(Vec::new());
        };
        let spread = self.config.similar_price_spread;
        let filter = CatalogFilter::new()
            .with_price_range(entry.price * (1.0 - spread), entry.price * (1.0 + spread));
        let candidates: Vec<CatalogEntry> = self
            .fetch(&filter, CandidateOrder::Catalog)?
            .into_iter()
            .filter(|candidate| candidate.id != id)
            .collect();
        Ok(rank(candidates, &ValueScorer, top_n))
    }

    /// Catalog entries resembling a model name, at or above the fuzzy
    /// threshold, best first.
    pub fn find_models(&self, query: &str) -> Result<Vec<(CatalogEntry, f64)>> {
        let matches = self
            .catalog
            .fuzzy_search_models(query, self.config.fuzzy_limit)?;
        Ok(matches
            .into_iter()
            .filter(|(_, similarity)| *similarity >= self.config.fuzzy_threshold)
            .collect())
    }

    /// The best match for each model in a list such as
    /// "iphone 15 and galaxy s24", without duplicates.
    pub fn find_model_list(&self, text: &str) -> Result<Vec<(CatalogEntry, f64)>> {
        let mut seen = AHashSet::new();
        let mut found = Vec::new();
        for part in MODEL_LIST_SEPARATOR.split(text) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some((entry, similarity)) = self.find_models(part)?.into_iter().next()
                && seen.insert(entry.id)
            {
                found.push((entry, similarity));
            }
        }
        Ok(found)
    }
}

fn feature_label(feature: &str) -> String {
    if feature.eq_ignore_ascii_case("5g") {
        "5G".to_string()
    } else if feature.eq_ignore_ascii_case("nfc") {
        "NFC".to_string()
    } else {
        feature.to_string()
    }
}
