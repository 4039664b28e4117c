//! Spec-threshold extraction.
//!
//! Each category has an ordered pattern family; the first pattern that
//! matches decides the value and later ones are not consulted.

use regex::Regex;

use crate::nlu::types::SpecMinimums;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("spec patterns are valid")
}

fn threshold_family(unit: &str) -> Vec<Regex> {
    vec![
        compile(&format!(r"\babove\s+(\d+)\s*{unit}\b")),
        compile(&format!(r"\bover\s+(\d+)\s*{unit}\b")),
        compile(&format!(r"\b(\d+)\s*{unit}\s+or\s+(?:more|above|higher|better)\b")),
        compile(&format!(r"\bat\s+least\s+(\d+)\s*{unit}\b")),
        compile(&format!(r"\bmore\s+than\s+(\d+)\s*{unit}\b")),
        compile(&format!(r"\bminimum\s+(\d+)\s*{unit}\b")),
        compile(&format!(r"\b(\d+)\s*\+\s*{unit}\b")),
        compile(&format!(r"\b(\d+)\s*{unit}\s*\+")),
    ]
}

fn memory_family(noun: &str) -> Vec<Regex> {
    vec![
        compile(&format!(r"\b(\d+)\s*gb\s+(?:of\s+)?{noun}\b")),
        compile(&format!(r"\b{noun}\s+(?:of\s+)?(\d+)\s*gb\b")),
        compile(&format!(r"\b(\d+)\s*gb\s*\+\s*{noun}\b")),
    ]
}

/// Extracts minimum battery, camera, RAM and storage values.
#[derive(Debug, Clone)]
pub struct SpecExtractor {
    battery: Vec<Regex>,
    camera: Vec<Regex>,
    ram: Vec<Regex>,
    storage: Vec<Regex>,
    five_g: Regex,
}

impl Default for SpecExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecExtractor {
    pub fn new() -> Self {
        let mut camera = threshold_family("mp");
        camera.push(compile(r"\bcamera.*?(\d+)\s*mp\b"));

        SpecExtractor {
            battery: threshold_family("mah"),
            camera,
            ram: memory_family("ram"),
            storage: memory_family("storage"),
            five_g: compile(r"\b5g\b"),
        }
    }

    /// Returns the numeric minimums and any non-numeric requirements.
    pub fn extract(&self, text: &str) -> (SpecMinimums, Vec<String>) {
        let text = text.to_lowercase();
        let minimums = SpecMinimums {
            battery: first_value(&self.battery, &text),
            camera: first_value(&self.camera, &text),
            ram: first_value(&self.ram, &text),
            storage: first_value(&self.storage, &text),
        };

        let mut other = Vec::new();
        if self.five_g.is_match(&text) {
            other.push("5g".to_string());
        }

        (minimums, other)
    }
}

fn first_value(patterns: &[Regex], text: &str) -> Option<u32> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> SpecMinimums {
        SpecExtractor::new().extract(text).0
    }

    #[test]
    fn test_battery_forms() {
        assert_eq!(extract("battery above 5000mah").battery, Some(5000));
        assert_eq!(extract("at least 4500 mAh please").battery, Some(4500));
        assert_eq!(extract("6000mah or more").battery, Some(6000));
        assert_eq!(extract("5000+ mah").battery, Some(5000));
        assert_eq!(extract("a 5000mah battery").battery, None);
    }

    #[test]
    fn test_camera_forms() {
        assert_eq!(extract("over 48mp").camera, Some(48));
        assert_eq!(extract("camera with 108 mp").camera, Some(108));
        assert_eq!(extract("64mp or higher").camera, Some(64));
    }

    #[test]
    fn test_memory_forms() {
        let specs = extract("8gb ram and 256 gb storage");
        assert_eq!(specs.ram, Some(8));
        assert_eq!(specs.storage, Some(256));

        let specs = extract("ram 12gb, storage of 512gb");
        assert_eq!(specs.ram, Some(12));
        assert_eq!(specs.storage, Some(512));
    }

    #[test]
    fn test_five_g_is_not_a_threshold() {
        let (minimums, other) = SpecExtractor::new().extract("a 5G phone");
        assert!(minimums.is_empty());
        assert_eq!(other, vec!["5g".to_string()]);
    }
}
