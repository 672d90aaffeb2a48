//! Wavelength-indexed reflectance sequence

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// First band of an ASD FieldSpec scan, in nanometers
pub const ASD_START_NM: u32 = 350;
/// Last band of an ASD FieldSpec scan, in nanometers
pub const ASD_END_NM: u32 = 2500;
/// Band spacing of the resampled ASD scans
pub const ASD_STEP_NM: u32 = 10;
/// Number of bands between `ASD_START_NM` and `ASD_END_NM`
pub const ASD_BANDS: usize = ((ASD_END_NM - ASD_START_NM) / ASD_STEP_NM + 1) as usize;

/// Reflectance values on a regular wavelength grid.
///
/// Band `i` sits at `start_nm + i * step_nm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    start_nm: u32,
    step_nm: u32,
    values: Vec<f64>,
}

impl Spectrum {
    pub fn new(start_nm: u32, step_nm: u32, values: Vec<f64>) -> Self {
        Self {
            start_nm,
            step_nm,
            values,
        }
    }

    /// A scan on the ASD grid (350-2500 nm, 10 nm)
    pub fn asd(values: Vec<f64>) -> Self {
        Self::new(ASD_START_NM, ASD_STEP_NM, values)
    }

    pub fn start_nm(&self) -> u32 {
        self.start_nm
    }

    pub fn step_nm(&self) -> u32 {
        self.step_nm
    }

    /// Wavelength of the last band; equals `start_nm` when empty.
    ///
    /// Saturates at `u32::MAX` for grids that run past it.
    pub fn end_nm(&self) -> u32 {
        self.wavelength_of(self.values.len().saturating_sub(1))
    }

    fn wavelength_of(&self, band: usize) -> u32 {
        let band = u32::try_from(band).unwrap_or(u32::MAX);
        self.start_nm.saturating_add(band.saturating_mul(self.step_nm))
    }

    /// Covered wavelengths, in nanometers
    pub fn range(&self) -> RangeInclusive<u32> {
        self.start_nm..=self.end_nm()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn wavelengths(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.values.len()).map(move |i| self.wavelength_of(i))
    }

    /// `(wavelength, reflectance)` pairs in ascending wavelength
    pub fn bands(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.wavelengths().zip(self.values.iter().copied())
    }

    /// Reflectance at an exact band wavelength
    pub fn value_at(&self, nm: u32) -> Option<f64> {
        if nm < self.start_nm || self.step_nm == 0 {
            return None;
        }
        let offset = nm - self.start_nm;
        if offset % self.step_nm != 0 {
            return None;
        }
        self.values.get((offset / self.step_nm) as usize).copied()
    }

    /// Whether the spectrum lies exactly on the given grid
    pub fn matches_grid(&self, start_nm: u32, end_nm: u32, step_nm: u32) -> bool {
        if step_nm == 0 || end_nm < start_nm || (end_nm - start_nm) % step_nm != 0 {
            return false;
        }
        let bands = ((end_nm - start_nm) / step_nm) as usize + 1;
        self.start_nm == start_nm && self.step_nm == step_nm && self.values.len() == bands
    }
}
