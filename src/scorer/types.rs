use serde::{Deserialize, Serialize};

pub const DIMENSIONS: usize = 3;

// transfer_tau is carried end to end but never compared.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterVector {
    pub alpha: f64,
    pub overlap_tau: f64,
    pub transfer_tau: f64,
}

impl ParameterVector {
    pub fn new(alpha: f64, overlap_tau: f64, transfer_tau: f64) -> Self {
        Self {
            alpha,
            overlap_tau,
            transfer_tau,
        }
    }

    pub fn from_array(v: [f64; DIMENSIONS]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn to_array(self) -> [f64; DIMENSIONS] {
        [self.alpha, self.overlap_tau, self.transfer_tau]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|x| x.is_finite())
    }
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct FitnessBreakdown {
    // Rewards (size-weighted means)
    pub membership: f64,
    pub cohesion: f64,
    pub go_coherence: f64,

    // Penalty terms before weighting
    pub coupling: f64,
    pub fragmentation: f64,

    pub fitness: f64,

    pub total_memberships: usize,
    pub non_empty_clusters: usize,
    pub singleton_clusters: usize,
}
