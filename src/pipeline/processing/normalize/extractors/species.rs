use crate::pipeline::processing::quality_gate::{ProblemCategory, ProblemCollector};
use crate::vocabulary::Vocabulary;

/// Taxonomic fields derived from one species designation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxon {
    pub scientific_name: String,
    pub identification_qualifier: String,
}

/// Decompose a designation such as "genus Anopheles dirus complex" into a
/// scientific name and an identification qualifier.
///
/// Unknown vocabulary is recorded in `problems` and the offending term is
/// still carried into the output; this never fails.
pub fn extract(
    designation: &str,
    vocab: &Vocabulary,
    record_id: &str,
    problems: &mut ProblemCollector,
) -> Taxon {
    let designation = vocab.rewrite_species(designation);

    let mut terms: Vec<&str> = designation.split_whitespace().collect();
    if terms.first().is_some_and(|t| vocab.rank_markers.contains(t)) {
        terms.remove(0);
    }

    let mut taxon = Taxon::default();

    let Some((genus, rest)) = terms.split_first() else {
        problems.record(ProblemCategory::EmptySpecies, designation, record_id);
        return taxon;
    };

    if !vocab.genera.contains(genus) {
        problems.record(ProblemCategory::UnknownGenus, *genus, record_id);
    }
    taxon.scientific_name.push_str(genus);

    let mut rest = rest.iter();

    if let Some(epithet) = rest.next() {
        taxon.scientific_name.push(' ');
        taxon.scientific_name.push_str(epithet);
    }

    if let Some(third) = rest.next() {
        if vocab.subspecies.contains(third) {
            taxon.scientific_name.push(' ');
            taxon.scientific_name.push_str(third);
        } else if vocab.group_qualifiers.contains(third) {
            taxon.identification_qualifier.push_str(third);
        } else {
            problems.record(ProblemCategory::UnknownThirdTerm, *third, record_id);
        }
    }

    // Fourth and later terms always extend the qualifier
    for term in rest {
        if !taxon.identification_qualifier.is_empty() {
            taxon.identification_qualifier.push(' ');
        }
        taxon.identification_qualifier.push_str(term);
    }

    taxon
}
