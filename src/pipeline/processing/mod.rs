// Pipeline processing: filtering, normalization, and the quality gate

pub mod filter;
pub mod normalize;
pub mod quality_gate;

pub use filter::{RecordFilter, SkipReason};
pub use normalize::RecordNormalizer;
pub use quality_gate::{Problem, ProblemCategory, ProblemCollector};
