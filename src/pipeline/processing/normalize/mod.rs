pub mod extractors;

use crate::config::{FieldMapping, Settings};
use crate::error::Result;
use crate::pipeline::processing::quality_gate::ProblemCollector;
use crate::types::{DwcTerm, NormalizedRecord, SourceRecord};
use crate::vocabulary::Vocabulary;

use extractors::{dates, geography, species, tags, RemarksComposer};

/// Runs every extractor over one default-filled source record to build a
/// Darwin Core row.
pub struct RecordNormalizer<'a> {
    fields: &'a FieldMapping,
    vocab: &'a Vocabulary,
    basis_of_record: &'a str,
    remarks: RemarksComposer,
}

impl<'a> RecordNormalizer<'a> {
    pub fn new(settings: &'a Settings, vocab: &'a Vocabulary) -> Result<Self> {
        Ok(Self {
            fields: &settings.fields,
            vocab,
            basis_of_record: &settings.output.basis_of_record,
            remarks: RemarksComposer::new(&settings.remarks)?,
        })
    }

    pub fn normalize(&self, record: &SourceRecord, problems: &mut ProblemCollector) -> NormalizedRecord {
        let f = self.fields;
        let record_id = record.first(&f.id);
        let mut out = NormalizedRecord::new();

        // Fields copied through unchanged
        out.set(DwcTerm::OccurrenceId, record.joined(&f.id));
        out.set(DwcTerm::CatalogNumber, record.joined(&f.id));
        out.set(DwcTerm::DataGeneralizations, record.joined(&f.projects));
        out.set(DwcTerm::BasisOfRecord, self.basis_of_record);
        out.set(DwcTerm::IndividualCount, record.joined(&f.sample_size));
        out.set(DwcTerm::Sex, record.joined(&f.sex));
        out.set(DwcTerm::LifeStage, record.joined(&f.life_stage));
        out.set(DwcTerm::References, record.joined(&f.citations));
        out.set(DwcTerm::VerbatimEventDate, record.joined(&f.collection_date_range));
        out.set(DwcTerm::SamplingProtocol, record.joined(&f.collection_protocols));
        out.set(DwcTerm::IdentificationRemarks, record.joined(&f.protocols));
        out.set(DwcTerm::License, record.joined(&f.licenses));

        let taxon = species::extract(record.first(&f.species), self.vocab, record_id, problems);
        out.set(DwcTerm::ScientificName, taxon.scientific_name);
        out.set(DwcTerm::IdentificationQualifier, taxon.identification_qualifier);

        let raw_coordinates = record.first(&f.coordinates);
        if let Some(coords) = geography::parse_coordinates(raw_coordinates, record_id, problems) {
            out.set(DwcTerm::DecimalLatitude, coords.latitude);
            out.set(DwcTerm::DecimalLongitude, coords.longitude);
        }
        out.set(DwcTerm::Country, geography::strip_qualifier(record.first(&f.country)));
        out.set(DwcTerm::StateProvince, geography::strip_qualifier(record.first(&f.state_province)));
        out.set(DwcTerm::Locality, geography::strip_qualifier(record.first(&f.locality)));

        out.set(DwcTerm::EventDate, dates::event_date(record.first(&f.collection_date), record_id));

        let resolution = tags::extract(record.values(&f.tags), self.vocab, record_id, problems);
        out.set(
            DwcTerm::OccurrenceRemarks,
            self.remarks.compose(
                resolution.provider.as_deref(),
                record.values(&f.citations),
                raw_coordinates,
                record.values(&f.projects),
            ),
        );

        out
    }
}
