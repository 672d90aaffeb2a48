//! Reflectance spectra and the soil spectral library

mod coords;
mod library;
mod spectrum;

pub use coords::{decimal_degrees, Dms};
pub use library::{parse_plotcode, plotcode, LibraryEntry};
pub use spectrum::{Spectrum, ASD_BANDS, ASD_END_NM, ASD_START_NM, ASD_STEP_NM};
