#![cfg_attr(not(test), no_std)]

//! Scrolling audio spectrogram core: a fixed-rate producer fills
//! double-buffered capture windows, a cooperatively scheduled consumer
//! transforms each completed window with a fixed-point FFT, estimates
//! per-bin magnitudes without a square root and draws one waterfall
//! column per frame. No float hardware is assumed past table setup.

#[allow(unused_imports)]
use defmt::{debug, error, info, trace, warn};

use static_assertions as sa;

pub mod analysis;
pub mod capture;
pub mod clock;
pub mod fft;
pub mod fixed;
pub mod render;
pub mod spectrum;
pub mod trig;

// Compile-time configuration, see build.rs.
include!(concat!(env!("OUT_DIR"), "/config.rs"));

sa::const_assert!(NFFT.is_power_of_two());
sa::const_assert!(NFFT >= 4);
sa::const_assert!(2 * NPIX <= NFFT);
sa::const_assert!(
    clock::MIN_SAMPLE_RATE <= DEFAULT_SAMPLE_RATE
        && DEFAULT_SAMPLE_RATE <= clock::MAX_SAMPLE_RATE
);

pub use analysis::{Analyzer, Frame};
pub use capture::{Capture, SampleSource, Sampler};
pub use clock::SampleClock;
pub use fixed::Fx;
pub use render::{Display, Layout, Rgb, Waterfall};
pub use spectrum::Peak;
pub use trig::Trig;
