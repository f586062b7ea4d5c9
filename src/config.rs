use crate::constants::{self, fields};
use crate::error::{Result, ScanError};
use crate::types::DwcTerm;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::info;

/// Everything a conversion run needs besides its input and output paths.
/// Every table defaults to the built-in VectorBase/SCAN values, so a config
/// file only has to name what it overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub vocabulary: VocabularyConfig,
    pub fields: FieldMapping,
    pub output: OutputConfig,
    pub remarks: RemarksConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub genera: Vec<String>,
    pub subspecies: Vec<String>,
    pub group_qualifiers: Vec<String>,
    pub rank_markers: Vec<String>,
    /// Exact-match rewrites applied before tokenizing a species designation
    pub species_rewrites: BTreeMap<String, String>,
    pub provider_tags: Vec<String>,
    pub discard_tags: Vec<String>,
    pub skip_provider_tags: Vec<String>,
    pub skip_protocols: Vec<String>,
    pub skip_projects: Vec<String>,
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            genera: owned(constants::GENUS_TERMS),
            subspecies: owned(constants::SUBSPECIES_TERMS),
            group_qualifiers: owned(constants::GROUP_TERMS),
            rank_markers: owned(constants::RANK_MARKERS),
            species_rewrites: constants::SPECIES_REWRITES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            provider_tags: owned(constants::PROVIDER_TAGS),
            discard_tags: owned(constants::DISCARD_TAGS),
            skip_provider_tags: owned(constants::SKIP_PROVIDER_TAGS),
            skip_protocols: owned(constants::SKIP_PROTOCOLS),
            skip_projects: Vec::new(),
        }
    }
}

/// Source field names for each input attribute the pipeline reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub id: String,
    pub projects: String,
    pub species: String,
    pub coordinates: String,
    pub country: String,
    pub state_province: String,
    pub locality: String,
    pub collection_date: String,
    pub collection_date_range: String,
    pub protocols: String,
    pub collection_protocols: String,
    pub citations: String,
    pub tags: String,
    pub sex: String,
    pub life_stage: String,
    pub sample_size: String,
    pub licenses: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            id: fields::ACCESSION.to_string(),
            projects: fields::PROJECTS.to_string(),
            species: fields::SPECIES.to_string(),
            coordinates: fields::GEO_COORDS.to_string(),
            country: fields::COUNTRY.to_string(),
            state_province: fields::STATE_PROVINCE.to_string(),
            locality: fields::LOCALITY.to_string(),
            collection_date: fields::COLLECTION_DATE.to_string(),
            collection_date_range: fields::COLLECTION_DATE_RANGE.to_string(),
            protocols: fields::PROTOCOLS.to_string(),
            collection_protocols: fields::COLLECTION_PROTOCOLS.to_string(),
            citations: fields::CITATIONS.to_string(),
            tags: fields::TAGS.to_string(),
            sex: fields::SEX.to_string(),
            life_stage: fields::LIFE_STAGE.to_string(),
            sample_size: fields::SAMPLE_SIZE.to_string(),
            licenses: fields::LICENSES.to_string(),
        }
    }
}

impl FieldMapping {
    /// All mapped source names; the template for default filling.
    pub fn template(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.projects.as_str(),
            self.species.as_str(),
            self.coordinates.as_str(),
            self.country.as_str(),
            self.state_province.as_str(),
            self.locality.as_str(),
            self.collection_date.as_str(),
            self.collection_date_range.as_str(),
            self.protocols.as_str(),
            self.collection_protocols.as_str(),
            self.citations.as_str(),
            self.tags.as_str(),
            self.sex.as_str(),
            self.life_stage.as_str(),
            self.sample_size.as_str(),
            self.licenses.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub columns: Vec<DwcTerm>,
    pub basis_of_record: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            columns: DwcTerm::default_columns(),
            basis_of_record: constants::DEFAULT_BASIS_OF_RECORD.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemarksConfig {
    pub curator: String,
    pub map_url: String,
}

impl Default for RemarksConfig {
    fn default() -> Self {
        Self {
            curator: constants::DEFAULT_CURATOR.to_string(),
            map_url: constants::DEFAULT_MAP_URL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from an explicit path, else from `SCAN_DWC_CONFIG`,
    /// else fall back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(constants::CONFIG_ENV_VAR).ok();
        let chosen = path
            .map(Path::to_path_buf)
            .or_else(|| env_path.filter(|p| !p.trim().is_empty()).map(Into::into));

        let settings = match chosen {
            Some(config_path) => {
                let content = fs::read_to_string(&config_path).map_err(|e| {
                    ScanError::Config(format!(
                        "Failed to read config file '{}': {}",
                        config_path.display(),
                        e
                    ))
                })?;
                info!("Loaded configuration from {}", config_path.display());
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }

    /// Pre-flight checks; any failure here aborts before a staging file exists.
    pub fn validate(&self) -> Result<()> {
        if self.output.columns.is_empty() {
            return Err(ScanError::Config("output.columns must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for column in &self.output.columns {
            if !seen.insert(*column) {
                return Err(ScanError::Config(format!("duplicate output column '{}'", column)));
            }
        }

        if self.vocabulary.genera.is_empty() {
            return Err(ScanError::Config("vocabulary.genera must not be empty".into()));
        }

        if self.fields.id.trim().is_empty() {
            return Err(ScanError::Config("fields.id must name a source field".into()));
        }

        reqwest::Url::parse(&self.remarks.map_url).map_err(|e| {
            ScanError::Config(format!("remarks.map_url '{}' is not a URL: {}", self.remarks.map_url, e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.output.columns.len(), 21);
        assert!(settings.vocabulary.genera.iter().any(|g| g == "Anopheles"));
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let settings = Settings::from_toml(
            r#"
            [vocabulary]
            skip_projects = ["VBP0000001"]

            [remarks]
            curator = "PopBio"
            "#,
        )
        .unwrap();

        assert_eq!(settings.vocabulary.skip_projects, vec!["VBP0000001".to_string()]);
        assert_eq!(settings.remarks.curator, "PopBio");
        assert_eq!(settings.remarks.map_url, constants::DEFAULT_MAP_URL);
        assert_eq!(settings.fields.species, "species");
        assert!(!settings.vocabulary.genera.is_empty());
    }

    #[test]
    fn test_unknown_output_column_is_rejected_at_parse_time() {
        let result = Settings::from_toml(
            r#"
            [output]
            columns = ["occurrenceID", "notADarwinCoreTerm"]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_output_column_fails_validation() {
        let settings = Settings::from_toml(
            r#"
            [output]
            columns = ["occurrenceID", "scientificName", "occurrenceID"]
            "#,
        )
        .unwrap();
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate output column"));
    }

    #[test]
    fn test_bad_map_url_fails_validation() {
        let mut settings = Settings::default();
        settings.remarks.map_url = "not a url".to_string();
        assert!(matches!(settings.validate(), Err(ScanError::Config(_))));
    }

    #[test]
    fn test_species_rewrites_parse_from_inline_table() {
        let settings = Settings::from_toml(
            r#"
            [vocabulary.species_rewrites]
            "Aedes sp" = "Aedes"
            "#,
        )
        .unwrap();
        assert_eq!(settings.vocabulary.species_rewrites.get("Aedes sp").map(String::as_str), Some("Aedes"));
        // Replacing the table drops the built-in rewrites
        assert_eq!(settings.vocabulary.species_rewrites.len(), 1);
    }
}
