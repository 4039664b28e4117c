//! Template-driven reply text.

use crate::catalog::entry::CatalogEntry;
use crate::config::{ResponseTemplates, render};
use crate::nlu::{BudgetRange, SpecMinimums, UsageType};
use crate::recommend::RankedResult;
use crate::respond::reply::ComposedReply;
use crate::util::spec_text::{format_amount, format_price};

pub const REDIRECT_COMPARE: &str = "redirect_compare";

/// Turns intents and ranked results into reply text.
#[derive(Debug, Clone, Default)]
pub struct ResponseComposer {
    templates: ResponseTemplates,
}

impl ResponseComposer {
    pub fn new(templates: ResponseTemplates) -> Self {
        ResponseComposer { templates }
    }

    pub fn templates(&self) -> &ResponseTemplates {
        &self.templates
    }

    pub fn greeting(&self) -> ComposedReply {
        ComposedReply::text(&self.templates.greeting)
            .with_quick_replies(self.templates.greeting_quick_replies.clone())
    }

    pub fn help(&self) -> ComposedReply {
        ComposedReply::text(&self.templates.help)
    }

    pub fn general(&self) -> ComposedReply {
        ComposedReply::text(&self.templates.general)
            .with_quick_replies(self.templates.general_quick_replies.clone())
    }

    pub fn comparison(&self) -> ComposedReply {
        ComposedReply::text(&self.templates.comparison).with_action(REDIRECT_COMPARE)
    }

    pub fn budget(&self, budget: Option<BudgetRange>, results: &[RankedResult]) -> ComposedReply {
        let Some(budget) = budget else {
            return ComposedReply::text(&self.templates.budget_clarify);
        };
        let (min, max) = (format_amount(budget.min), format_amount(budget.max));
        let values = [("min", min.as_str()), ("max", max.as_str())];
        if results.is_empty() {
            return ComposedReply::text(render(&self.templates.budget_not_found, &values));
        }
        self.listing(render(&self.templates.budget_found, &values), results)
    }

    /// Fuzzy model lookup for one mention.
    pub fn model(&self, query: &str, matches: &[(CatalogEntry, f64)]) -> ComposedReply {
        match matches {
            [] => ComposedReply::text(render(&self.templates.model_not_found, &[("query", query)])),
            [(entry, _)] => {
                let name = entry.display_name();
                let mut text = render(&self.templates.model_single, &[("name", name.as_str())]);
                text.push_str("\n\n");
                text.push_str(&phone_line(entry));
                text.push_str(&spec_lines(entry));
                ComposedReply::recommendation(text.trim_end())
            }
            _ => self.entry_listing(matches),
        }
    }

    /// One best match per model in a list.
    pub fn multi_model(&self, matches: &[(CatalogEntry, f64)]) -> ComposedReply {
        if matches.is_empty() {
            return ComposedReply::text(&self.templates.multi_model_not_found);
        }
        self.entry_listing(matches)
    }

    fn entry_listing(&self, matches: &[(CatalogEntry, f64)]) -> ComposedReply {
        let count = matches.len().to_string();
        let mut text = render(&self.templates.model_multiple, &[("count", count.as_str())]);
        text.push_str("\n\n");
        for (entry, _) in matches {
            text.push_str(&phone_line(entry));
            text.push_str(&spec_lines(entry));
            text.push('\n');
        }
        ComposedReply::recommendation(text.trim_end())
    }

    pub fn spec_filter(
        &self,
        spec: &SpecMinimums,
        brands: &[String],
        results: &[RankedResult],
    ) -> ComposedReply {
        let filters = describe_filters(spec);
        if results.is_empty() {
            return ComposedReply::text(render(
                &self.templates.spec_not_found,
                &[("filters", filters.as_str())],
            ));
        }
        let brand_text = brand_text(brands);
        let header = if let Some(battery) = spec.battery {
            render(
                &self.templates.spec_battery,
                &[("value", battery.to_string().as_str()), ("brand_text", brand_text.as_str())],
            )
        } else if let Some(camera) = spec.camera {
            render(
                &self.templates.spec_camera,
                &[("value", camera.to_string().as_str()), ("brand_text", brand_text.as_str())],
            )
        } else {
            render(&self.templates.spec_general, &[("filters", filters.as_str())])
        };
        self.listing(header, results)
    }

    pub fn battery(
        &self,
        brands: &[String],
        budget: Option<BudgetRange>,
        results: &[RankedResult],
    ) -> ComposedReply {
        if results.is_empty() {
            return ComposedReply::text(&self.templates.battery_not_found);
        }
        let header = render(
            &self.templates.battery_found,
            &[
                ("brand_text", brand_text(brands).as_str()),
                ("budget_text", self.budget_text(budget).as_str()),
            ],
        );
        self.listing(header, results)
    }

    pub fn camera(
        &self,
        brands: &[String],
        budget: Option<BudgetRange>,
        min_mp: u32,
        results: &[RankedResult],
    ) -> ComposedReply {
        if results.is_empty() {
            return ComposedReply::text(render(
                &self.templates.camera_not_found,
                &[("value", min_mp.to_string().as_str())],
            ));
        }
        let header = render(
            &self.templates.camera_found,
            &[
                ("brand_text", brand_text(brands).as_str()),
                ("budget_text", self.budget_text(budget).as_str()),
            ],
        );
        self.listing(header, results)
    }

    pub fn usage(
        &self,
        usage: UsageType,
        budget: Option<BudgetRange>,
        results: &[RankedResult],
    ) -> ComposedReply {
        let usage = usage.to_string();
        if results.is_empty() {
            return ComposedReply::text(render(
                &self.templates.usage_not_found,
                &[("usage", usage.as_str())],
            ));
        }
        let header = render(
            &self.templates.usage_found,
            &[("usage", usage.as_str()), ("budget_text", self.budget_text(budget).as_str())],
        );
        self.listing(header, results)
    }

    pub fn brand(
        &self,
        brands: &[String],
        budget: Option<BudgetRange>,
        results: &[RankedResult],
    ) -> ComposedReply {
        if brands.is_empty() {
            return ComposedReply::text(&self.templates.brand_clarify);
        }
        let names = brands.join(", ");
        if results.is_empty() {
            return ComposedReply::text(render(
                &self.templates.brand_not_found,
                &[("brands", names.as_str())],
            ));
        }
        let header = render(
            &self.templates.brand_found,
            &[("brands", names.as_str()), ("budget_text", self.budget_text(budget).as_str())],
        );
        self.listing(header, results)
    }

    pub fn feature(
        &self,
        feature: &str,
        budget: Option<BudgetRange>,
        results: &[RankedResult],
    ) -> ComposedReply {
        if results.is_empty() {
            return ComposedReply::text(render(
                &self.templates.feature_not_found,
                &[("feature", feature)],
            ));
        }
        let header = render(
            &self.templates.feature_found,
            &[
                ("feature", feature),
                ("budget_text", self.budget_text(budget).as_str()),
            ],
        );
        self.listing(header, results)
    }

    fn budget_text(&self, budget: Option<BudgetRange>) -> String {
        budget.map_or_else(String::new, |budget| {
            let (min, max) = (format_amount(budget.min), format_amount(budget.max));
            render(
                &self.templates.budget_text,
                &[("min", min.as_str()), ("max", max.as_str())],
            )
        })
    }

    fn listing(&self, header: String, results: &[RankedResult]) -> ComposedReply {
        let mut text = header;
        text.push_str("\n\n");
        for result in results {
            text.push_str(&phone_line(&result.entry));
            if !result.reason.is_empty() {
                text.push_str("   ");
                text.push_str(&result.reason);
                text.push('\n');
            }
            text.push('\n');
        }
        ComposedReply::recommendation(text.trim_end())
    }
}

fn phone_line(entry: &CatalogEntry) -> String {
    format!("📱 {} - {}\n", entry.display_name(), format_price(entry.price))
}

fn spec_lines(entry: &CatalogEntry) -> String {
    let Some(specs) = entry.specs() else {
        return String::new();
    };
    let mut lines = String::new();
    if let Some(mah) = specs.battery_capacity_mah {
        lines.push_str(&format!("🔋 {mah}mAh battery\n"));
    }
    if let Some(mp) = specs.rear_camera_main_mp {
        lines.push_str(&format!("📸 {mp}MP camera\n"));
    }
    if let Some(ram) = specs.ram_options.as_deref() {
        lines.push_str(&format!("💾 {ram} RAM\n"));
    }
    if let Some(storage) = specs.storage_options.as_deref() {
        lines.push_str(&format!("💿 {storage} storage\n"));
    }
    lines
}

fn brand_text(brands: &[String]) -> String {
    if brands.is_empty() {
        String::new()
    } else {
        format!(" from {}", brands.join(", "))
    }
}

/// e.g. "battery above 5000mAh and RAM above 8GB".
pub fn describe_filters(spec: &SpecMinimums) -> String {
    let mut parts = Vec::new();
    if let Some(battery) = spec.battery {
        parts.push(format!("battery above {battery}mAh"));
    }
    if let Some(camera) = spec.camera {
        parts.push(format!("camera above {camera}MP"));
    }
    if let Some(ram) = spec.ram {
        parts.push(format!("RAM above {ram}GB"));
    }
    if let Some(storage) = spec.storage {
        parts.push(format!("storage above {storage}GB"));
    }
    if parts.is_empty() {
        "your requirements".to_string()
    } else {
        parts.join(" and ")
    }
}
