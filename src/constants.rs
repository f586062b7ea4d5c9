//! Built-in vocabulary tables and field names for VectorBase PopBio exports.
//!
//! These are the defaults behind `Settings::default()`; every table can be
//! replaced from the TOML configuration.

/// Genera (and a few higher taxa) accepted as the first species term
pub const GENUS_TERMS: &[&str] = &[
    "Aedeomyia",
    "Aedes",
    "Aedimorphus",
    "Anopheles",
    "Catageiomyia",
    "Ceratopogonidae",
    "Chironomidae",
    "Coquillettidia",
    "Culex",
    "Culicidae",
    "Culicinae",
    "Culiciomyia",
    "Culicoides",
    "Culiseta",
    "Eumelanomyia",
    "Lophoceraomyia",
    "Mansonia",
    "Mimomyia",
    "Oculeomyia",
    "Orthopodomyia",
    "Phlebotomus",
    "Psorophora",
    "Sergentomyia",
    "Simuliidae",
    "Toxorhynchites",
    "Uranotaenia",
    "Wyeomyia",
    "Avaritia",
];

/// Third terms that belong to the scientific name
pub const SUBSPECIES_TERMS: &[&str] = &["japonicus", "arabiensis", "vexans", "pallens", "S", "T"];

/// Third terms that qualify the identification instead
pub const GROUP_TERMS: &[&str] = &[
    "morphological",
    "group",
    "complex",
    "sensu",
    "lato",
    "stricto",
    "AD",
    "BCE",
    "subgroup",
];

/// Leading rank markers dropped before the genus term
pub const RANK_MARKERS: &[&str] = &["genus", "subgenus"];

/// Known malformed species strings and their canonical replacement
pub const SPECIES_REWRITES: &[(&str, &str)] = &[
    ("Culex pipiens/restuans", "Culex pipiens group"),
    ("Anopheles gambiae s.l.", "Anopheles gambiae sensu lato"),
];

/// Provider tags that attribute a record to a collecting organization
pub const PROVIDER_TAGS: &[&str] = &["ICEMR", "NEON"];

/// Tags without provenance meaning
pub const DISCARD_TAGS: &[&str] = &["abundance", "viral surveillance", "pathogen", "genotype"];

/// Providers whose records are published to the aggregator through another channel
pub const SKIP_PROVIDER_TAGS: &[&str] = &["NEON"];

/// Collection protocols whose counts are not occurrence observations
pub const SKIP_PROTOCOLS: &[&str] = &["BG-Counter trap catch"];

pub const DEFAULT_CURATOR: &str = "VectorBase";
pub const DEFAULT_MAP_URL: &str = "https://vectorbase.org/popbio-map/web/";
pub const DEFAULT_BASIS_OF_RECORD: &str = "HumanObservation";

/// Suffix appended to the final output path for the staging file
pub const STAGING_SUFFIX: &str = ".temp";

/// Seed used when sampling is requested without an explicit seed
pub const DEFAULT_SAMPLING_SEED: u64 = 20201112;

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "SCAN_DWC_CONFIG";

/// Source field names of the PopBio search export
pub mod fields {
    pub const ACCESSION: &str = "accession";
    pub const PROJECTS: &str = "projects";
    pub const SPECIES: &str = "species";
    pub const GEO_COORDS: &str = "geo_coords";
    pub const COUNTRY: &str = "country_s";
    pub const STATE_PROVINCE: &str = "adm1_s";
    pub const LOCALITY: &str = "geolocations";
    pub const COLLECTION_DATE: &str = "collection_date";
    pub const COLLECTION_DATE_RANGE: &str = "collection_date_range";
    pub const PROTOCOLS: &str = "protocols";
    pub const COLLECTION_PROTOCOLS: &str = "collection_protocols";
    pub const CITATIONS: &str = "exp_citations_ss";
    pub const TAGS: &str = "tags";
    pub const SEX: &str = "sex_s";
    pub const LIFE_STAGE: &str = "dev_stages_ss";
    pub const SAMPLE_SIZE: &str = "sample_size_i";
    pub const LICENSES: &str = "licenses_ss";
}
