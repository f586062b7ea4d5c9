use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, ScanError};

/// Percentage of filter-passing records to keep, validated to 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingRate(u32);

impl SamplingRate {
    pub fn new(percent: u32) -> Result<Self> {
        if percent > 100 {
            return Err(ScanError::InvalidSamplingRate(percent));
        }
        Ok(Self(percent))
    }

    pub fn percent(&self) -> u32 {
        self.0
    }
}

/// Seeded keep/drop decision stream, consumed once per record in input
/// order so a fixed seed always selects the same records.
pub struct Sampler {
    rng: StdRng,
    rate: SamplingRate,
}

impl Sampler {
    pub fn new(rate: SamplingRate, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            rate,
        }
    }

    pub fn keep(&mut self) -> bool {
        self.rng.gen_ratio(self.rate.percent(), 100)
    }

    pub fn rate(&self) -> SamplingRate {
        self.rate
    }
}
