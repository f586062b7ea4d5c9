use anyhow::Result;
use scan_dwc::infra::csv_output_adapter::{staging_path_for, StagedCsvSink};
use scan_dwc::pipeline::processing::ProblemCategory;
use scan_dwc::pipeline::sampling::{Sampler, SamplingRate};
use scan_dwc::{Pipeline, RawRecord, RunOutcome, RunReport, Settings, Vocabulary};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn record(id: &str, species: &str, tags: &[&str]) -> RawRecord {
    RawRecord::new()
        .with("accession", &[id])
        .with("projects", &["VBP0000290"])
        .with("species", &[species])
        .with("geo_coords", &["-0.0917,34.768"])
        .with("country_s", &["Kenya"])
        .with("geolocations", &["Kisumu (Kenya)"])
        .with("collection_date", &["2014-07-02T00:00:00Z"])
        .with("tags", tags)
}

fn convert(records: Vec<RawRecord>, output: &Path, sampler: Option<Sampler>) -> Result<RunReport> {
    let settings = Settings::default();
    let vocab = Vocabulary::from_config(&settings.vocabulary);
    let sink = StagedCsvSink::create(output)?;
    Ok(Pipeline::new(&settings, &vocab).run(records, sink, sampler)?)
}

fn read_rows(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::Reader::from_path(path)?;
    let header = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for row in reader.records() {
        rows.push(row?.iter().map(str::to_string).collect());
    }
    Ok((header, rows))
}

#[test]
fn test_clean_batch_is_committed_in_input_order() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("scan.csv");

    let report = convert(
        vec![
            record("VBA3", "Anopheles funestus", &["abundance", "ICEMR"]),
            record("VBA1", "Anopheles dirus complex", &[]),
            record("VBA2", "genus Culex pallens", &["abundance"]),
        ],
        &output,
        None,
    )?;

    assert!(report.outcome.is_committed());
    assert!(!staging_path_for(&output).exists());

    let (header, rows) = read_rows(&output)?;
    assert_eq!(header.len(), 21);
    assert_eq!(header[0], "occurrenceID");
    assert_eq!(header[20], "dcterms:license");

    let ids: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(ids, vec!["VBA3", "VBA1", "VBA2"]);
    assert!(rows.iter().all(|r| r.len() == header.len()));

    let name = header.iter().position(|h| h == "scientificName").unwrap();
    let qualifier = header.iter().position(|h| h == "identificationQualifier").unwrap();
    assert_eq!(rows[1][name], "Anopheles dirus");
    assert_eq!(rows[1][qualifier], "complex");
    assert_eq!(rows[2][name], "Culex pallens");
    Ok(())
}

#[test]
fn test_problem_batch_leaves_final_output_untouched() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("scan.csv");
    fs::write(&output, "previous release\n")?;

    let report = convert(
        vec![
            record("VBA1", "Aedes aegypti", &[]),
            record("VBA2", "Aedez aegypti", &[]),
            record("VBA3", "Aedez aegypti", &[]),
            record("VBA4", "Culex pipiens forma", &[]),
            record("VBA5", "Culex pipiens forma", &["ICEMR", "Unknown Lab"]),
            record("VBA6", "Aedes aegypti", &["Unknown Lab", "ICEMR"]),
        ],
        &output,
        None,
    )?;

    assert_eq!(fs::read_to_string(&output)?, "previous release\n");
    assert!(!staging_path_for(&output).exists());

    let RunOutcome::Rejected(problems) = &report.outcome else {
        panic!("expected rejection, got {:?}", report.outcome);
    };

    let summary: Vec<(ProblemCategory, &str, &str)> = problems
        .iter()
        .map(|p| (p.category, p.value.as_str(), p.record_id.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (ProblemCategory::UnknownGenus, "Aedez", "VBA2"),
            (ProblemCategory::UnknownThirdTerm, "forma", "VBA4"),
            (ProblemCategory::UnexpectedTag, "ICEMR;Unknown Lab", "VBA5"),
            (ProblemCategory::UnexpectedTag, "Unknown Lab;ICEMR", "VBA6"),
        ]
    );
    Ok(())
}

#[test]
fn test_rejected_batch_with_no_previous_output_creates_nothing() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("scan.csv");

    let report = convert(vec![record("VBA1", "Aedes aegypti sp. nov.", &[])], &output, None)?;

    assert!(!report.outcome.is_committed());
    assert!(!output.exists());
    assert!(fs::read_dir(dir.path())?.next().is_none());
    Ok(())
}

#[test]
fn test_full_sampling_keeps_every_filtered_record() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("scan.csv");
    let records: Vec<RawRecord> = (0..50)
        .map(|i| record(&format!("VBA{:03}", i), "Aedes aegypti", &[]))
        .collect();

    let sampler = Sampler::new(SamplingRate::new(100)?, 99);
    let report = convert(records, &output, Some(sampler))?;

    assert!(report.outcome.is_committed());
    let (_, rows) = read_rows(&output)?;
    assert_eq!(rows.len(), 50);
    Ok(())
}

#[test]
fn test_zero_sampling_commits_header_only() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("scan.csv");

    let sampler = Sampler::new(SamplingRate::new(0)?, 99);
    let report = convert(vec![record("VBA1", "Aedes aegypti", &[])], &output, Some(sampler))?;

    assert!(report.outcome.is_committed());
    let (header, rows) = read_rows(&output)?;
    assert_eq!(header.len(), 21);
    assert!(rows.is_empty());
    Ok(())
}

#[test]
fn test_same_input_and_seed_give_identical_bytes() -> Result<()> {
    let dir = tempdir()?;
    let records: Vec<RawRecord> = (0..200)
        .map(|i| record(&format!("VBA{:04}", i), "Anopheles gambiae sensu lato", &["ICEMR"]))
        .collect();

    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    let a = convert(records.clone(), &first, Some(Sampler::new(SamplingRate::new(40)?, 7)))?;
    let b = convert(records, &second, Some(Sampler::new(SamplingRate::new(40)?, 7)))?;

    assert_eq!(fs::read(&first)?, fs::read(&second)?);
    match (&a.outcome, &b.outcome) {
        (RunOutcome::Committed(x), RunOutcome::Committed(y)) => assert_eq!(x.sha256, y.sha256),
        other => panic!("expected two commits, got {:?}", other),
    }
    assert_eq!(a.stats, b.stats);
    assert!(a.stats.written > 0 && a.stats.written < 200);
    Ok(())
}

#[test]
fn test_non_iso_collection_date_still_commits() -> Result<()> {
    let dir = tempdir()?;
    let output = dir.path().join("scan.csv");

    let year_only = record("VBA1", "Aedes aegypti", &[]).with("collection_date", &["2015"]);
    let report = convert(vec![year_only], &output, None)?;

    assert!(report.outcome.is_committed(), "{:?}", report.outcome.problems());
    let (header, rows) = read_rows(&output)?;
    let event_date = header.iter().position(|h| h == "eventDate").unwrap();
    assert_eq!(rows[0][event_date], "2015");
    Ok(())
}
