use crate::error::{LcResult, LotusError};
use rand::Rng;
use rand_distr::StandardNormal;
use std::f64::consts::PI;

/// Mantegna's algorithm: `scale * u / |v|^(1/beta)`.
#[derive(Debug, Clone, Copy)]
pub struct LevyFlight {
    beta: f64,
    sigma_u: f64,
    scale: f64,
}

impl LevyFlight {
    pub fn new(beta: f64, scale: f64) -> LcResult<Self> {
        if !(beta > 0.0 && beta <= 2.0) {
            return Err(LotusError::Config(format!(
                "Levy beta must lie in (0, 2], got {}",
                beta
            )));
        }
        if !scale.is_finite() || scale < 0.0 {
            return Err(LotusError::Config(format!(
                "Levy scale must be finite and >= 0, got {}",
                scale
            )));
        }
        Ok(Self {
            beta,
            sigma_u: mantegna_sigma(beta),
            scale,
        })
    }

    pub fn sigma_u(&self) -> f64 {
        self.sigma_u
    }

    // All u draws come before all v draws.
    pub fn step<R: Rng, const N: usize>(&self, rng: &mut R) -> [f64; N] {
        let mut u = [0.0; N];
        for x in u.iter_mut() {
            let z: f64 = rng.sample(StandardNormal);
            *x = z * self.sigma_u;
        }
        let mut out = [0.0; N];
        for (o, ui) in out.iter_mut().zip(u) {
            let v: f64 = rng.sample(StandardNormal);
            *o = self.scale * ui / v.abs().powf(1.0 / self.beta);
        }
        out
    }
}

fn mantegna_sigma(beta: f64) -> f64 {
    let num = gamma(1.0 + beta) * (PI * beta / 2.0).sin();
    let den = gamma((1.0 + beta) / 2.0) * beta * 2f64.powf((beta - 1.0) / 2.0);
    (num / den).powf(1.0 / beta)
}

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

pub fn gamma(x: f64) -> f64 {
    if x < 0.5 {
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }
    let x = x - 1.0;
    let mut acc = LANCZOS_COEFFS[0];
    for (i, &c) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + LANCZOS_G + 0.5;
    (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * acc
}
