use crate::error::Result;
use crate::types::DwcTerm;

/// What a successful commit produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Where the output now lives
    pub location: String,
    pub rows: usize,
    /// Hex SHA-256 of the committed bytes
    pub sha256: String,
}

/// Staged tabular output. Nothing written through a sink is visible at its
/// final location until `commit`; `discard` throws the staged rows away.
pub trait RecordSink {
    fn write_header(&mut self, columns: &[DwcTerm]) -> Result<()>;

    fn write_row(&mut self, row: &[&str]) -> Result<()>;

    /// Atomically promote the staged output to its final location.
    fn commit(self) -> Result<CommitReceipt>
    where
        Self: Sized;

    /// Drop the staged output, leaving the final location untouched.
    fn discard(self) -> Result<()>
    where
        Self: Sized;
}
