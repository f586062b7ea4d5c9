//! One extractor per output field group. Each is a plain function over
//! source values and the shared vocabulary, reporting anomalies to the
//! problem collector instead of failing.

pub mod dates;
pub mod geography;
pub mod remarks;
pub mod species;
pub mod tags;

pub use remarks::RemarksComposer;
pub use tags::TagResolution;
