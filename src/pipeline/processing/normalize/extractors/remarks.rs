use reqwest::Url;

use crate::config::RemarksConfig;
use crate::error::{Result, ScanError};

/// Builds the attribution sentence written to `occurrenceRemarks`.
#[derive(Debug, Clone)]
pub struct RemarksComposer {
    curator: String,
    map_url: Url,
}

impl RemarksComposer {
    pub fn new(config: &RemarksConfig) -> Result<Self> {
        let map_url = Url::parse(&config.map_url)
            .map_err(|e| ScanError::Config(format!("invalid remarks.map_url: {}", e)))?;
        Ok(Self {
            curator: config.curator.clone(),
            map_url,
        })
    }

    /// Link to the record location on the map, scoped either to the
    /// provider tag or to the record's projects.
    pub fn deep_link(&self, coordinates: &str, provider: Option<&str>, projects: &[String]) -> String {
        let mut url = self.map_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("center", coordinates);
            match provider {
                Some(tag) => {
                    query.append_pair("tag", tag);
                }
                None => {
                    for project in projects {
                        query.append_pair("projectID", project);
                    }
                }
            }
        }
        url.to_string()
    }

    pub fn compose(
        &self,
        provider: Option<&str>,
        citations: &[String],
        coordinates: &str,
        projects: &[String],
    ) -> String {
        let mut remarks = format!("Data provided by {}", self.curator);
        if let Some(tag) = provider {
            remarks.push_str(" on behalf of ");
            remarks.push_str(tag);
        }
        remarks.push_str(". Source: ");
        remarks.push_str(&self.deep_link(coordinates, provider, projects));

        if !citations.is_empty() {
            remarks.push_str(". Citations: ");
            remarks.push_str(&citations.join("; "));
        }

        remarks
    }
}
