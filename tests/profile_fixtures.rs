//! Synthetic single-slit profiles shared by the integration tests.

#![allow(dead_code)]

use slit_fringe::IntensityProfile;

pub const WAVELENGTH: f64 = 670e-9;
pub const SCREEN_DISTANCE: f64 = 2.0;
pub const SLIT: f64 = 50e-6;

/// Dark-fringe spacing of the reference slit on the screen.
pub fn fringe_spacing() -> f64 {
    WAVELENGTH * SCREEN_DISTANCE / SLIT
}

/// Builder for sinc² profiles sampled on a symmetric screen window.
#[derive(Debug, Clone)]
pub struct SincProfile {
    pub samples: usize,
    pub half_window: f64,
    pub slit: f64,
    pub offset: f64,
    pub gain: f64,
    pub noise: f64,
    pub seed: u64,
}

impl Default for SincProfile {
    fn default() -> Self {
        Self {
            samples: 2001,
            half_window: 0.1,
            slit: SLIT,
            offset: 0.0,
            gain: 1.0,
            noise: 0.0,
            seed: 7,
        }
    }
}

impl SincProfile {
    pub fn positions(&self) -> Vec<f64> {
        let n = self.samples;
        (0..n)
            .map(|i| -self.half_window + 2.0 * self.half_window * i as f64 / (n - 1) as f64)
            .collect()
    }

    pub fn intensities(&self) -> Vec<f64> {
        let mut state = self.seed.max(1);
        self.positions()
            .iter()
            .map(|&x| {
                let u = std::f64::consts::PI * self.slit * (x - self.offset)
                    / (WAVELENGTH * SCREEN_DISTANCE);
                let ideal = if u.abs() < 1e-12 { 1.0 } else { (u.sin() / u).powi(2) };
                // xorshift64 uniform noise in [0, noise)
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let uniform = (state >> 11) as f64 / (1u64 << 53) as f64;
                (self.gain * ideal).min(1.0) + self.noise * uniform
            })
            .collect()
    }

    pub fn build(&self) -> IntensityProfile {
        IntensityProfile::new(self.positions(), self.intensities()).unwrap()
    }
}
