use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Separator used both to split multi-valued CSV cells and to join
/// multi-valued sources into a single output cell.
pub const MULTI_VALUE_SEPARATOR: &str = ";";

/// Darwin Core terms this converter can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DwcTerm {
    #[serde(rename = "occurrenceID")]
    OccurrenceId,
    #[serde(rename = "catalogNumber")]
    CatalogNumber,
    #[serde(rename = "dataGeneralizations")]
    DataGeneralizations,
    #[serde(rename = "basisOfRecord")]
    BasisOfRecord,
    #[serde(rename = "individualCount")]
    IndividualCount,
    #[serde(rename = "sex")]
    Sex,
    #[serde(rename = "lifeStage")]
    LifeStage,
    #[serde(rename = "references")]
    References,
    #[serde(rename = "eventDate")]
    EventDate,
    #[serde(rename = "verbatimEventDate")]
    VerbatimEventDate,
    #[serde(rename = "samplingProtocol")]
    SamplingProtocol,
    #[serde(rename = "country")]
    Country,
    #[serde(rename = "stateProvince")]
    StateProvince,
    #[serde(rename = "locality")]
    Locality,
    #[serde(rename = "decimalLatitude")]
    DecimalLatitude,
    #[serde(rename = "decimalLongitude")]
    DecimalLongitude,
    #[serde(rename = "identificationRemarks")]
    IdentificationRemarks,
    #[serde(rename = "scientificName")]
    ScientificName,
    #[serde(rename = "identificationQualifier")]
    IdentificationQualifier,
    #[serde(rename = "occurrenceRemarks")]
    OccurrenceRemarks,
    #[serde(rename = "dcterms:license")]
    License,
}

impl DwcTerm {
    pub fn as_str(&self) -> &'static str {
        match self {
            DwcTerm::OccurrenceId => "occurrenceID",
            DwcTerm::CatalogNumber => "catalogNumber",
            DwcTerm::DataGeneralizations => "dataGeneralizations",
            DwcTerm::BasisOfRecord => "basisOfRecord",
            DwcTerm::IndividualCount => "individualCount",
            DwcTerm::Sex => "sex",
            DwcTerm::LifeStage => "lifeStage",
            DwcTerm::References => "references",
            DwcTerm::EventDate => "eventDate",
            DwcTerm::VerbatimEventDate => "verbatimEventDate",
            DwcTerm::SamplingProtocol => "samplingProtocol",
            DwcTerm::Country => "country",
            DwcTerm::StateProvince => "stateProvince",
            DwcTerm::Locality => "locality",
            DwcTerm::DecimalLatitude => "decimalLatitude",
            DwcTerm::DecimalLongitude => "decimalLongitude",
            DwcTerm::IdentificationRemarks => "identificationRemarks",
            DwcTerm::ScientificName => "scientificName",
            DwcTerm::IdentificationQualifier => "identificationQualifier",
            DwcTerm::OccurrenceRemarks => "occurrenceRemarks",
            DwcTerm::License => "dcterms:license",
        }
    }

    /// The default output layout, in column order.
    pub fn default_columns() -> Vec<DwcTerm> {
        use DwcTerm::*;
        vec![
            OccurrenceId,
            CatalogNumber,
            DataGeneralizations,
            BasisOfRecord,
            IndividualCount,
            Sex,
            LifeStage,
            References,
            EventDate,
            VerbatimEventDate,
            SamplingProtocol,
            Country,
            StateProvince,
            Locality,
            DecimalLatitude,
            DecimalLongitude,
            IdentificationRemarks,
            ScientificName,
            IdentificationQualifier,
            OccurrenceRemarks,
            License,
        ]
    }
}

impl fmt::Display for DwcTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record as delivered by the export parsers: every value already
/// normalized to an ordered list of strings, but fields may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub fields: BTreeMap<String, Vec<String>>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and adapters.
    pub fn with(mut self, name: &str, values: &[&str]) -> Self {
        self.insert(name, values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn insert(&mut self, name: &str, values: Vec<String>) {
        self.fields.insert(name.to_string(), values);
    }

    /// Coalesce this record against a template of expected field names.
    /// Missing fields become present with an empty value list.
    pub fn with_defaults<'a, I>(mut self, template: I) -> SourceRecord
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in template {
            self.fields.entry(name.to_string()).or_default();
        }
        SourceRecord { fields: self.fields }
    }
}

/// A raw record after default filling. Lookups are total: a name outside
/// the template still yields an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    fields: BTreeMap<String, Vec<String>>,
}

impl SourceRecord {
    pub fn values(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of a possibly multi-valued field, or "".
    pub fn first(&self, name: &str) -> &str {
        self.values(name).first().map(String::as_str).unwrap_or("")
    }

    pub fn joined(&self, name: &str) -> String {
        self.values(name).join(MULTI_VALUE_SEPARATOR)
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Output row under construction. Unset terms render as empty strings, so
/// every row projected through the same column list has the same shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecord {
    values: HashMap<DwcTerm, String>,
}

impl NormalizedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, term: DwcTerm, value: impl Into<String>) {
        self.values.insert(term, value.into());
    }

    pub fn get(&self, term: DwcTerm) -> &str {
        self.values.get(&term).map(String::as_str).unwrap_or("")
    }

    /// Render in the given column order.
    pub fn to_row(&self, columns: &[DwcTerm]) -> Vec<&str> {
        columns.iter().map(|term| self.get(*term)).collect()
    }
}
