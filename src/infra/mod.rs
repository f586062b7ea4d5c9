pub mod csv_output_adapter;
pub mod memory_output_adapter;

pub use csv_output_adapter::StagedCsvSink;
pub use memory_output_adapter::InMemorySink;
