use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const KNOWN_SPECIALS_DAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub name: String,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub catalogue_url: Option<String>,
    /// Day of week the store rotates its weekly specials, lowercase.
    pub specials_day: Option<String>,
}

impl StoreConfig {
    /// Generate a URL-safe slug from the store name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct StoresFile {
    pub stores: Vec<StoreConfig>,
}

/// Load and validate the stores configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_stores(path: &Path) -> Result<StoresFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let stores_file: StoresFile =
        serde_yaml::from_str(&content).map_err(ConfigError::StoresFileParse)?;

    validate_stores(&stores_file)?;

    Ok(stores_file)
}

fn validate_stores(stores_file: &StoresFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for store in &stores_file.stores {
        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store name must be non-empty".to_string(),
            ));
        }

        if let Some(day) = &store.specials_day {
            if !KNOWN_SPECIALS_DAYS.contains(&day.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "store '{}' has unknown specials_day '{day}'; expected a lowercase weekday",
                    store.name
                )));
            }
        }

        let lower_name = store.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate store name: '{}'",
                store.name
            )));
        }

        let slug = store.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store slug: '{}' (from store '{}')",
                slug, store.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(name: &str) -> StoreConfig {
        StoreConfig {
            name: name.to_string(),
            logo_url: None,
            website_url: None,
            catalogue_url: None,
            specials_day: Some("wednesday".to_string()),
        }
    }

    #[test]
    fn slug_simple_name() {
        assert_eq!(store("Woolworths").slug(), "woolworths");
    }

    #[test]
    fn slug_multiword_name() {
        assert_eq!(store("Harris Farm Markets").slug(), "harris-farm-markets");
    }

    #[test]
    fn slug_strips_punctuation() {
        assert_eq!(store("Drakes' Super IGA").slug(), "drakes-super-iga");
    }

    #[test]
    fn validate_rejects_empty_name() {
        let file = StoresFile {
            stores: vec![store("  ")],
        };
        assert!(matches!(
            validate_stores(&file),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_duplicate_slug() {
        let file = StoresFile {
            stores: vec![store("Coles"), store("coles")],
        };
        assert!(matches!(
            validate_stores(&file),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_unknown_specials_day() {
        let mut bad = store("ALDI");
        bad.specials_day = Some("Wednesday".to_string());
        let file = StoresFile { stores: vec![bad] };
        assert!(matches!(
            validate_stores(&file),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_accepts_distinct_stores() {
        let file = StoresFile {
            stores: vec![store("Woolworths"), store("Coles"), store("ALDI")],
        };
        assert!(validate_stores(&file).is_ok());
    }

    #[test]
    fn yaml_roundtrip_parses_store_fields() {
        let yaml = "stores:\n  - name: IGA\n    website_url: https://www.iga.com.au\n    specials_day: wednesday\n";
        let parsed: StoresFile = serde_yaml::from_str(yaml).expect("parse stores yaml");
        assert_eq!(parsed.stores.len(), 1);
        assert_eq!(parsed.stores[0].name, "IGA");
        assert_eq!(parsed.stores[0].specials_day.as_deref(), Some("wednesday"));
    }
}
