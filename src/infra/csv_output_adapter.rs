use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::app::ports::{CommitReceipt, RecordSink};
use crate::constants::STAGING_SUFFIX;
use crate::error::{Result, ScanError};
use crate::idempotency::file_digest;
use crate::types::DwcTerm;

/// CSV sink that writes to `<final>.temp` and renames over the final path
/// on commit. The staging file sits in the same directory so the rename
/// stays on one filesystem.
pub struct StagedCsvSink {
    writer: csv::Writer<File>,
    staging_path: PathBuf,
    final_path: PathBuf,
    rows: usize,
}

impl StagedCsvSink {
    pub fn create(final_path: &Path) -> Result<Self> {
        let staging_path = staging_path_for(final_path);
        if let Some(dir) = final_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let writer = csv::Writer::from_path(&staging_path)?;
        info!("Staging output at {}", staging_path.display());

        Ok(Self {
            writer,
            staging_path,
            final_path: final_path.to_path_buf(),
            rows: 0,
        })
    }

    pub fn staging_path(&self) -> &Path {
        &self.staging_path
    }
}

pub fn staging_path_for(final_path: &Path) -> PathBuf {
    let mut name = final_path.as_os_str().to_os_string();
    name.push(STAGING_SUFFIX);
    PathBuf::from(name)
}

impl RecordSink for StagedCsvSink {
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
        let Self {
            writer,
            staging_path,
            final_path,
            rows,
        } = self;

        let file = writer
            .into_inner()
            .map_err(|e| ScanError::Io(e.into_error()))?;
        file.sync_all()?;
        drop(file);

        fs::rename(&staging_path, &final_path)?;
        let sha256 = file_digest(&final_path)?;
        info!("Committed {} rows to {}", rows, final_path.display());

        Ok(CommitReceipt {
            location: final_path.display().to_string(),
            rows,
            sha256,
        })
    }

    fn discard(self) -> Result<()> {
        let Self { writer, staging_path, .. } = self;
        drop(writer);

        match fs::remove_file(&staging_path) {
            Ok(()) => {
                debug!("Removed staging file {}", staging_path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Staging file {} already gone", staging_path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
