//! Sample-rate control for the fixed-rate tick source.

use defmt::{debug, warn};

use crate::analysis::Analyzer;
use crate::render::Display;

/// Collaborator driving [`Sampler::tick`](crate::capture::Sampler::tick)
/// at a fixed cadence.
pub trait SampleClock {
    /// (Re)start periodic ticks at `hz`.
    fn start(&mut self, hz: u32);

    /// Stop ticks. No tick arrives after this returns.
    fn stop(&mut self);
}

/// Slowest cadence with a usable display range.
pub const MIN_SAMPLE_RATE: u32 = 500;

/// Upper bound on the cadence: keeps one tick period longer than the
/// per-tick work and one capture period longer than a worst-case
/// transform-and-render pass, so the pipeline never outruns itself.
pub const MAX_SAMPLE_RATE: u32 = 20_000;

/// Bound a requested rate to the supported range.
pub fn clamp_rate(hz: u32) -> u32 {
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&hz) {
        warn!(
            "sample rate {} Hz outside {}..{}, clamping",
            hz, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
        );
    }

    hz.clamp(MIN_SAMPLE_RATE, MAX_SAMPLE_RATE)
}

/// Apply a new sample rate. The tick source is stopped while the capture
/// is reset and the axis redrawn, then restarted with the new period: no
/// capture window spans two cadences and no tick interleaves the switch.
/// Returns the applied (possibly clamped) rate.
pub fn reconfigure<C, D, const N: usize, const NPIX: usize>(
    clock: &mut C,
    analyzer: &mut Analyzer<'_, D, N, NPIX>,
    hz: u32,
) -> u32
where
    C: SampleClock,
    D: Display,
{
    let hz = clamp_rate(hz);
    debug!("applying sample rate {} Hz", hz);

    clock.stop();
    analyzer.apply_rate(hz);
    clock.start(hz);

    hz
}
