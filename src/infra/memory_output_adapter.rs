use std::sync::{Arc, Mutex};

use crate::app::ports::{CommitReceipt, RecordSink};
use crate::error::{Result, ScanError};
use crate::idempotency::output_digest;
use crate::types::DwcTerm;

/// Shared view of what an `InMemorySink` ended up with
#[derive(Debug, Default)]
pub struct MemoryOutput {
    /// CSV bytes, present only after a commit
    pub committed: Option<Vec<u8>>,
    pub discarded: bool,
}

impl MemoryOutput {
    pub fn committed_text(&self) -> Option<String> {
        self.committed
            .as_ref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

/// CSV sink backed by a byte buffer, used by tests
pub struct InMemorySink {
    writer: csv::Writer<Vec<u8>>,
    rows: usize,
    output: Arc<Mutex<MemoryOutput>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self {
            writer: csv::Writer::from_writer(Vec::new()),
            rows: 0,
            output: Arc::new(Mutex::new(MemoryOutput::default())),
        }
    }

    /// Handle that stays readable after the sink is consumed
    pub fn output(&self) -> Arc<Mutex<MemoryOutput>> {
        Arc::clone(&self.output)
    }
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSink for InMemorySink {
    fn write_header(&mut self, columns: &[DwcTerm]) -> Result<()> {
        self.writer.write_record(columns.iter().map(DwcTerm::as_str))?;
        Ok(())
    }

    fn write_row(&mut self, row: &[&str]) -> Result<()> {
        self.writer.write_record(row)?;
        self.rows += 1;
        Ok(())
    }

    fn commit(self) -> Result<CommitReceipt> {
        let bytes = self
            .writer
            .into_inner()
            .map_err(|e| ScanError::Io(e.into_error()))?;
        let sha256 = output_digest(&bytes);

        let mut output = self
            .output
            .lock()
            .map_err(|_| ScanError::Config("memory sink lock poisoned".into()))?;
        output.committed = Some(bytes);

        Ok(CommitReceipt {
            location: "memory".to_string(),
            rows: self.rows,
            sha256,
        })
    }

    fn discard(self) -> Result<()> {
        let mut output = self
            .output
            .lock()
            .map_err(|_| ScanError::Config("memory sink lock poisoned".into()))?;
        output.discarded = true;
        Ok(())
    }
}
