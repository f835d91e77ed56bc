//! The processing pass: snapshot a completed capture window, transform,
//! estimate magnitudes, draw one waterfall column.

use core::cell::RefCell;

use critical_section::Mutex;

#[allow(unused_imports)]
use defmt::{debug, trace};

use crate::capture::Capture;
use crate::fft;
use crate::fixed::Fx;
use crate::render::{Display, Waterfall};
use crate::spectrum::{self, Peak};
use crate::trig::Trig;

/// One frame of output: the capture window it came from and the dominant
/// bin estimate.
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct Frame {
    pub generation: u32,
    pub peak: Peak,
}

/// Consumer side of the pipeline. Owns the scratch spectrum arrays and
/// the waterfall; shares only the capture (and its ready flag) with the
/// tick context.
pub struct Analyzer<'a, D, const N: usize, const NPIX: usize> {
    capture: &'a Mutex<RefCell<Capture<N>>>,
    trig: &'a Trig<N>,
    waterfall: Waterfall<D>,
    sample_rate: u32,

    re: [Fx; N],
    im: [Fx; N],
    row: [Fx; NPIX],
}

impl<'a, D: Display, const N: usize, const NPIX: usize> Analyzer<'a, D, N, NPIX> {
    pub fn new(
        capture: &'a Mutex<RefCell<Capture<N>>>,
        trig: &'a Trig<N>,
        waterfall: Waterfall<D>,
        sample_rate: u32,
    ) -> Analyzer<'a, D, N, NPIX> {
        debug_assert!(2 * NPIX <= N);

        Analyzer {
            capture,
            trig,
            waterfall,
            sample_rate,
            re: [Fx::ZERO; N],
            im: [Fx::ZERO; N],
            row: [Fx::ZERO; NPIX],
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn waterfall(&mut self) -> &mut Waterfall<D> {
        &mut self.waterfall
    }

    /// Take over a new sample rate: discard the capture in flight (a
    /// window must not span two tick cadences) and redraw the axis.
    pub fn apply_rate(&mut self, hz: u32) {
        self.sample_rate = hz;
        critical_section::with(|cs| self.capture.borrow_ref_mut(cs).reset());
        self.waterfall.draw_axis(hz, N);
    }

    /// One pass of the pipeline. Returns `None` until the producer has
    /// published a window; a published window is processed to completion
    /// while the producer keeps filling the other bank.
    pub fn poll(&mut self) -> Option<Frame> {
        // Snapshot with the tick source fenced: the producer reuses the
        // ready bank's storage after the hand-off.
        let generation = critical_section::with(|cs| {
            self.capture.borrow_ref_mut(cs).take(&mut self.re)
        })?;

        fft::transform(&mut self.re, &mut self.im, self.trig);
        let peak = spectrum::magnitudes(&self.re, &self.im, &mut self.row);

        self.waterfall.draw_column(&self.row);
        self.waterfall
            .draw_readout(&peak, self.sample_rate, N);

        trace!("frame {}: peak bin {}", generation, peak.bin);
        Some(Frame { generation, peak })
    }
}
