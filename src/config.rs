//! Configuration for the Phonewise assistant.
//!
//! Every keyword table, threshold and reply template the pipeline consults is
//! held here as plain data. A configuration is loaded once, wrapped in an
//! `Arc`, and handed to the components that need it; nothing reads it through
//! global state.
//!
//! # Examples
//!
//! ```
//! use phonewise::config::AssistantConfig;
//!
//! let config = AssistantConfig::default();
//! assert_eq!(config.ranking.top_n, 5);
//! assert_eq!(config.nlu.budget_floor, 500.0);
//!
//! // Partial JSON overrides fall back to the defaults.
//! let config = AssistantConfig::from_json_str(r#"{"ranking": {"top_n": 3}}"#).unwrap();
//! assert_eq!(config.ranking.top_n, 3);
//! assert_eq!(config.context.idle_timeout_secs, 1800);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PhonewiseError, Result};
use crate::nlu::types::{BudgetRange, Persona, UsageType};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub nlu: NluConfig,
    pub context: ContextConfig,
    pub ranking: RankingConfig,
    pub classifier: ClassifierConfig,
    pub templates: ResponseTemplates,
}

impl AssistantConfig {
    /// Load a configuration from a JSON file. Missing sections use defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PhonewiseError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&content)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: AssistantConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.ranking.top_n == 0 {
            return Err(PhonewiseError::config("ranking.top_n must be positive"));
        }
        if !(0.0..=100.0).contains(&self.ranking.fuzzy_threshold) {
            return Err(PhonewiseError::config(
                "ranking.fuzzy_threshold must be within 0-100",
            ));
        }
        if self.nlu.budget_floor < 0.0 || self.nlu.budget_floor >= self.nlu.above_ceiling {
            return Err(PhonewiseError::config(
                "nlu.budget_floor must be non-negative and below nlu.above_ceiling",
            ));
        }
        if self.classifier.word_ngram_min == 0
            || self.classifier.word_ngram_min > self.classifier.word_ngram_max
        {
            return Err(PhonewiseError::config("invalid word n-gram range"));
        }
        if self.classifier.char_ngram_min == 0
            || self.classifier.char_ngram_min > self.classifier.char_ngram_max
        {
            return Err(PhonewiseError::config("invalid char n-gram range"));
        }
        if self.context.idle_timeout_secs == 0 {
            return Err(PhonewiseError::config(
                "context.idle_timeout_secs must be positive",
            ));
        }
        Ok(())
    }
}

/// Brand name with the keywords that refer to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandAlias {
    pub brand: String,
    pub keywords: Vec<String>,
}

/// Keywords that imply a usage type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageKeywords {
    pub usage: UsageType,
    pub keywords: Vec<String>,
}

/// Keywords that identify a persona and the defaults it implies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaRule {
    pub persona: Persona,
    pub keywords: Vec<String>,
    pub usage: UsageType,
    pub budget: Option<BudgetRange>,
}

/// Literal keywords mapped to a canonical feature name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureKeywords {
    pub feature: String,
    pub keywords: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn alias(brand: &str, keywords: &[&str]) -> BrandAlias {
    BrandAlias {
        brand: brand.to_string(),
        keywords: words(keywords),
    }
}

/// Entity extraction tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NluConfig {
    pub brand_aliases: Vec<BrandAlias>,
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
    /// Words inspected on each side of a brand keyword.
    pub sentiment_window: usize,
    pub battery_focus_keywords: Vec<String>,
    pub camera_focus_keywords: Vec<String>,
    /// Matched at word starts, so `gam` covers gaming and gamer.
    pub usage_keywords: Vec<UsageKeywords>,
    pub personas: Vec<PersonaRule>,
    /// Checked in order; the first match wins.
    pub features: Vec<FeatureKeywords>,
    pub greeting_phrases: Vec<String>,
    pub help_phrases: Vec<String>,
    pub comparison_phrases: Vec<String>,
    /// Lower bound for `under X` and bare-number budgets.
    pub budget_floor: f64,
    /// Upper bound for `above X` budgets.
    pub above_ceiling: f64,
    /// Half-width of `around X` budgets.
    pub near_spread: f64,
    /// Words ignored when deciding whether a message is only a brand name.
    pub brand_query_filler_words: Vec<String>,
}

impl Default for NluConfig {
    fn default() -> Self {
        Self {
            brand_aliases: vec![
                alias("Apple", &["apple", "iphone", "ios"]),
                alias("Samsung", &["samsung", "galaxy"]),
                alias("Xiaomi", &["xiaomi", "redmi", "poco", "mi"]),
                alias("Huawei", &["huawei"]),
                alias("Honor", &["honor"]),
                alias("Oppo", &["oppo"]),
                alias("Vivo", &["vivo", "iqoo"]),
                alias("Realme", &["realme"]),
                alias("Google", &["google", "pixel"]),
                alias("OnePlus", &["oneplus", "one plus"]),
                alias("Nokia", &["nokia"]),
                alias("Sony", &["sony", "xperia"]),
                alias("Motorola", &["motorola", "moto"]),
                alias("Asus", &["asus", "rog"]),
                alias("Nothing", &["nothing phone"]),
                alias("Infinix", &["infinix"]),
                alias("Tecno", &["tecno"]),
            ],
            positive_words: words(&[
                "love",
                "like",
                "prefer",
                "want",
                "need",
                "adore",
                "favorite",
                "favourite",
                "best",
                "good",
                "great",
                "excellent",
                "amazing",
                "fantastic",
                "perfect",
                "interested in",
            ]),
            negative_words: words(&[
                "hate",
                "dislike",
                "don't like",
                "dont like",
                "not like",
                "not love",
                "avoid",
                "exclude",
                "no",
                "never",
                "reject",
                "refuse",
                "against",
                "opposed to",
                "not interested",
                "not want",
                "don't want",
                "dont want",
                "except",
                "without",
            ]),
            sentiment_window: 5,
            battery_focus_keywords: words(&[
                "long lasting",
                "long-lasting",
                "battery life",
                "battery",
                "mah",
                "charge",
                "charging",
            ]),
            camera_focus_keywords: words(&[
                "photographer",
                "photography",
                "camera",
                "photo",
                "picture",
                "selfie",
                "video",
                "recording",
                "megapixel",
                "mp",
                "lens",
                "zoom",
                "night mode",
                "portrait",
                "wide angle",
            ]),
            usage_keywords: vec![
                UsageKeywords {
                    usage: UsageType::Gaming,
                    keywords: words(&["gam", "game", "play", "player"]),
                },
                UsageKeywords {
                    usage: UsageType::Photography,
                    keywords: words(&["photo", "camera", "picture", "selfie"]),
                },
                UsageKeywords {
                    usage: UsageType::Business,
                    keywords: words(&["business", "work", "office", "professional", "productivity"]),
                },
                UsageKeywords {
                    usage: UsageType::Entertainment,
                    keywords: words(&[
                        "entertainment",
                        "video",
                        "movie",
                        "media",
                        "streaming",
                        "youtube",
                        "netflix",
                    ]),
                },
                UsageKeywords {
                    usage: UsageType::SocialMedia,
                    keywords: words(&["social", "facebook", "instagram", "tiktok", "whatsapp"]),
                },
            ],
            personas: vec![
                PersonaRule {
                    persona: Persona::Senior,
                    keywords: words(&["senior", "elderly", "grandparent", "grandma", "grandpa"]),
                    usage: UsageType::Basic,
                    budget: Some(BudgetRange::new(500.0, 1500.0)),
                },
                PersonaRule {
                    persona: Persona::Student,
                    keywords: words(&["student", "college", "university"]),
                    usage: UsageType::Gaming,
                    budget: Some(BudgetRange::new(1000.0, 3000.0)),
                },
                PersonaRule {
                    persona: Persona::Professional,
                    keywords: words(&["professional", "executive", "working adult"]),
                    usage: UsageType::Business,
                    budget: Some(BudgetRange::new(2500.0, 5000.0)),
                },
                PersonaRule {
                    persona: Persona::Photographer,
                    keywords: words(&["photographer"]),
                    usage: UsageType::Photography,
                    budget: Some(BudgetRange::new(2000.0, 6000.0)),
                },
                PersonaRule {
                    persona: Persona::Gamer,
                    keywords: words(&["gamer"]),
                    usage: UsageType::Gaming,
                    budget: None,
                },
            ],
            features: vec![
                FeatureKeywords {
                    feature: "5g".to_string(),
                    keywords: words(&["5g"]),
                },
                FeatureKeywords {
                    feature: "wireless charging".to_string(),
                    keywords: words(&["wireless charging", "wireless charge"]),
                },
                FeatureKeywords {
                    feature: "water resistance".to_string(),
                    keywords: words(&["ip68", "ip67", "water resist", "waterproof"]),
                },
                FeatureKeywords {
                    feature: "expandable storage".to_string(),
                    keywords: words(&["expandable", "sd card", "microsd"]),
                },
                FeatureKeywords {
                    feature: "dual sim".to_string(),
                    keywords: words(&["dual sim"]),
                },
                FeatureKeywords {
                    feature: "fast charging".to_string(),
                    keywords: words(&["fast charging", "fast charge"]),
                },
                FeatureKeywords {
                    feature: "amoled display".to_string(),
                    keywords: words(&["amoled", "oled"]),
                },
                FeatureKeywords {
                    feature: "nfc".to_string(),
                    keywords: words(&["nfc"]),
                },
                FeatureKeywords {
                    feature: "fingerprint".to_string(),
                    keywords: words(&["fingerprint"]),
                },
                FeatureKeywords {
                    feature: "face unlock".to_string(),
                    keywords: words(&["face unlock", "face id"]),
                },
                FeatureKeywords {
                    feature: "performance".to_string(),
                    keywords: words(&["fast processor", "powerful processor"]),
                },
            ],
            greeting_phrases: words(&[
                "hello",
                "hi",
                "hey",
                "good morning",
                "good afternoon",
                "good evening",
                "greetings",
            ]),
            help_phrases: words(&["help", "how", "what can you do"]),
            comparison_phrases: words(&["vs", "versus", "compare", "comparison", "difference between"]),
            budget_floor: 500.0,
            above_ceiling: 15000.0,
            near_spread: 500.0,
            brand_query_filler_words: words(&[
                "phone",
                "phones",
                "smartphone",
                "smartphones",
                "and",
                "or",
                "the",
                "a",
                "an",
                "show",
                "me",
                "some",
            ]),
        }
    }
}

/// Conversation context settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Sessions idle longer than this are evicted.
    pub idle_timeout_secs: u64,
    /// Extracted-query snapshots kept per session.
    pub max_messages: usize,
}

impl ContextConfig {
    pub fn idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.idle_timeout_secs as i64)
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 30 * 60,
            max_messages: 50,
        }
    }
}

/// Defaults used when a preference field is not stated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceDefaults {
    pub budget: BudgetRange,
    pub min_ram_gb: f64,
    pub min_storage_gb: f64,
    pub min_camera_mp: f64,
    pub min_battery_mah: f64,
    pub min_screen_size: f64,
    pub max_screen_size: f64,
}

impl Default for PreferenceDefaults {
    fn default() -> Self {
        Self {
            budget: BudgetRange::new(500.0, 5000.0),
            min_ram_gb: 4.0,
            min_storage_gb: 64.0,
            min_camera_mp: 12.0,
            min_battery_mah: 3000.0,
            min_screen_size: 5.5,
            max_screen_size: 7.0,
        }
    }
}

/// Ranking engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub top_n: usize,
    /// Minimum token-sort similarity (0-100) for a fuzzy model match.
    pub fuzzy_threshold: f64,
    /// Candidates returned by a single fuzzy model lookup.
    pub fuzzy_limit: usize,
    pub battery_focus_min_mah: u32,
    pub photography_min_mp: u32,
    /// Minimum match percentage kept by preference-based recommendations.
    pub match_threshold: f64,
    /// Relative price window for similar phones.
    pub similar_price_spread: f64,
    pub preference_defaults: PreferenceDefaults,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            fuzzy_threshold: 60.0,
            fuzzy_limit: 5,
            battery_focus_min_mah: 4000,
            photography_min_mp: 48,
            match_threshold: 50.0,
            similar_price_spread: 0.3,
            preference_defaults: PreferenceDefaults::default(),
        }
    }
}

/// Statistical intent classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Predictions below this confidence defer to the rules.
    pub confidence_floor: f64,
    pub epochs: usize,
    pub seed: u64,
    pub word_ngram_min: usize,
    pub word_ngram_max: usize,
    pub char_ngram_min: usize,
    pub char_ngram_max: usize,
    /// Trained artifact to load at startup, if any.
    pub model_path: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_floor: 0.25,
            epochs: 20,
            seed: 42,
            word_ngram_min: 1,
            word_ngram_max: 2,
            char_ngram_min: 3,
            char_ngram_max: 4,
            model_path: None,
        }
    }
}

/// Reply templates. Placeholders look like `{name}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseTemplates {
    pub greeting: String,
    pub help: String,
    pub general: String,
    pub comparison: String,
    pub budget_found: String,
    pub budget_not_found: String,
    pub budget_clarify: String,
    pub model_single: String,
    pub model_multiple: String,
    pub model_not_found: String,
    pub multi_model_not_found: String,
    pub spec_battery: String,
    pub spec_camera: String,
    pub spec_general: String,
    pub spec_not_found: String,
    pub battery_found: String,
    pub battery_not_found: String,
    pub camera_found: String,
    pub camera_not_found: String,
    pub usage_found: String,
    pub usage_not_found: String,
    pub brand_found: String,
    pub brand_not_found: String,
    pub brand_clarify: String,
    pub feature_found: String,
    pub feature_not_found: String,
    pub budget_text: String,
    pub greeting_quick_replies: Vec<String>,
    pub general_quick_replies: Vec<String>,
}

impl Default for ResponseTemplates {
    fn default() -> Self {
        Self {
            greeting: "Hello! I'm the Phonewise assistant. I'm here to help you find the perfect smartphone. How can I assist you today?".to_string(),
            help: "I can help you with:\n\n\
                   • Phone recommendations based on your needs\n\
                   • Phones within your budget\n\
                   • Comparing different phone models\n\
                   • Browsing phones by brand\n\
                   • Long-lasting phones with great battery\n\
                   • Phones for photography\n\n\
                   Just ask me anything like:\n\
                   • \"Find me a phone under RM2000\"\n\
                   • \"Best phones for gaming\"\n\
                   • \"Show me Samsung phones\"\n\
                   • \"Long lasting phone\"\n\
                   • \"iPhone 15 pro and Xiaomi 14 pro\"".to_string(),
            general: "I'm here to help you find the perfect smartphone! You can ask me about:\n\n\
                      • Phone recommendations\n\
                      • Specific models (e.g., 'iPhone 15', 'Xiaomi 14 Pro')\n\
                      • Budget options\n\
                      • Brand preferences\n\
                      • Phones with specific features (battery, camera, etc.)\n\n\
                      What would you like to know?".to_string(),
            comparison: "I can help you compare phones! Please go to the Compare page and select two phones you'd like to compare side-by-side.".to_string(),
            budget_found: "Here are the top phones within RM{min} - RM{max}:".to_string(),
            budget_not_found: "I couldn't find phones in that exact range (RM{min} - RM{max}). Would you like to adjust your budget?".to_string(),
            budget_clarify: "What's your budget range? For example, 'I'm looking for phones under RM2000' or 'phones between RM1000 and RM3000'".to_string(),
            model_single: "I found {name}:".to_string(),
            model_multiple: "I found {count} phone(s) matching your query:".to_string(),
            model_not_found: "I couldn't find a specific model matching '{query}'. Would you like to:\n• See all phones from a specific brand\n• Get recommendations based on your budget\n• Browse by category".to_string(),
            multi_model_not_found: "Sorry, I could not find the phone models you specified. Please check the model names and try again.".to_string(),
            spec_battery: "Here are phones with battery above {value}mAh{brand_text}:".to_string(),
            spec_camera: "Here are phones with camera above {value}MP{brand_text}:".to_string(),
            spec_general: "Here are the best phones for {filters}:".to_string(),
            spec_not_found: "I couldn't find phones matching {filters}. Would you like to:\n• Adjust your budget\n• See similar phones\n• Browse by brand".to_string(),
            battery_found: "Here are the best phones{brand_text} with battery{budget_text}:".to_string(),
            battery_not_found: "I couldn't find phones with good battery in your criteria. Would you like to adjust your filters?".to_string(),
            camera_found: "Great choice! Here are the best phones for Photography{brand_text}{budget_text}:".to_string(),
            camera_not_found: "I couldn't find phones with camera above {value}MP matching your criteria. Would you like to see phones with lower camera specifications?".to_string(),
            usage_found: "Great choice! Here are the best phones for {usage}{budget_text}:".to_string(),
            usage_not_found: "I couldn't find phones optimized for {usage}. Would you like to see general recommendations?".to_string(),
            brand_found: "Here are {brands} phones{budget_text}:".to_string(),
            brand_not_found: "I couldn't find {brands} phones matching your criteria. Would you like to adjust your filters?".to_string(),
            brand_clarify: "Which brand are you interested in? We have Samsung, Apple, Xiaomi, Huawei, Vivo, Oppo, Realme, and more!".to_string(),
            feature_found: "Here are phones with {feature}{budget_text}:".to_string(),
            feature_not_found: "I couldn't find phones with {feature} matching your criteria. Would you like to adjust your filters?".to_string(),
            budget_text: " within RM{min} - RM{max}".to_string(),
            greeting_quick_replies: words(&["Find a phone", "Compare phones", "Show me budget options"]),
            general_quick_replies: words(&["Find a phone", "Budget options", "Popular brands"]),
        }
    }
}

/// Substitute `{key}` placeholders in a template.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AssistantConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.nlu.sentiment_window, 5);
        assert_eq!(config.ranking.fuzzy_threshold, 60.0);
        assert_eq!(config.classifier.confidence_floor, 0.25);
        assert_eq!(config.context.idle_timeout(), chrono::Duration::minutes(30));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"nlu": {{"budget_floor": 100.0}}, "context": {{"idle_timeout_secs": 60}}}}"#
        )
        .unwrap();

        let config = AssistantConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.nlu.budget_floor, 100.0);
        assert_eq!(config.context.idle_timeout_secs, 60);
        // untouched fields keep defaults
        assert_eq!(config.nlu.above_ceiling, 15000.0);
        assert!(!config.nlu.brand_aliases.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = AssistantConfig::from_json_str(r#"{"ranking": {"top_n": 0}}"#);
        assert!(matches!(result, Err(PhonewiseError::Config(_))));

        let result = AssistantConfig::from_json_str("not json");
        assert!(matches!(result, Err(PhonewiseError::Json(_))));
    }

    #[test]
    fn test_render() {
        let text = render(
            "Here are the top phones within RM{min} - RM{max}:",
            &[("min", "500"), ("max", "2,000")],
        );
        assert_eq!(text, "Here are the top phones within RM500 - RM2,000:");
    }
}
