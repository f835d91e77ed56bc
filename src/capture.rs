//! Fixed-rate sample capture with a double-buffered hand-off from the
//! tick context to the processing pass.

use core::cell::RefCell;

use critical_section::Mutex;

#[allow(unused_imports)]
use defmt::{debug, trace, warn};

use crate::fixed::Fx;
use crate::trig::Trig;

/// Capture collaborator: one call per tick.
pub trait SampleSource {
    /// Raw sample in ADC counts.
    fn raw_sample(&mut self) -> i16;
}

/// Double-buffered fixed-length sample store. The producer owns the
/// active bank exclusively; a completed bank is published to the consumer
/// as a (bank, generation) pair. Publishing over an unconsumed bank
/// discards it: the sampling cadence never waits for processing.
pub struct Capture<const N: usize> {
    banks: [[Fx; N]; 2],
    active: usize,
    fill: usize,

    /// Id of the capture window currently being filled.
    generation: u32,

    /// Completed bank, if any: (bank index, generation id).
    ready: Option<(usize, u32)>,

    /// Windows discarded because the consumer did not keep up.
    dropped: u32,
}

impl<const N: usize> Capture<N> {
    pub const fn new() -> Capture<N> {
        Capture {
            banks: [[Fx::ZERO; N]; 2],
            active: 0,
            fill: 0,
            generation: 0,
            ready: None,
            dropped: 0,
        }
    }

    /// Sample index the next push lands on.
    pub fn fill_index(&self) -> usize {
        self.fill
    }

    pub fn is_ready(&self) -> bool {
        self.ready.is_some()
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Append one windowed sample. Filling the bank publishes it and
    /// switches the other bank active under the next generation id.
    pub fn push(&mut self, v: Fx) {
        self.banks[self.active][self.fill] = v;
        self.fill += 1;

        if self.fill == N {
            if let Some((_, generation)) = self.ready.replace((self.active, self.generation)) {
                self.dropped = self.dropped.wrapping_add(1);
                warn!("capture: window {} dropped before consumption", generation);
            }

            self.active ^= 1;
            self.fill = 0;
            self.generation = self.generation.wrapping_add(1);
            trace!("capture: window ready, filling {}", self.generation);
        }
    }

    /// Copy the completed window out and clear the ready flag, returning
    /// the window's generation id. Must run with the tick source fenced
    /// (same critical section): the producer reuses this storage.
    pub fn take(&mut self, out: &mut [Fx; N]) -> Option<u32> {
        let (bank, generation) = self.ready.take()?;
        out.copy_from_slice(&self.banks[bank]);
        Some(generation)
    }

    /// Abandon the active fill and any unconsumed window. Used when the
    /// tick cadence changes: a window must not span two sample rates.
    pub fn reset(&mut self) {
        self.fill = 0;
        self.ready = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Fixed-rate producer step: reads one raw sample per tick, applies the
/// window coefficient at the current fill index and appends it to the
/// active bank. Bounded constant work per tick.
pub struct Sampler<'a, S, const N: usize> {
    source: S,
    trig: &'a Trig<N>,
    capture: &'a Mutex<RefCell<Capture<N>>>,
}

impl<'a, S: SampleSource, const N: usize> Sampler<'a, S, N> {
    pub fn new(
        source: S,
        trig: &'a Trig<N>,
        capture: &'a Mutex<RefCell<Capture<N>>>,
    ) -> Sampler<'a, S, N> {
        Sampler {
            source,
            trig,
            capture,
        }
    }

    /// Invoked once per tick by the timer service.
    pub fn tick(&mut self) {
        let raw = self.source.raw_sample();

        critical_section::with(|cs| {
            let mut cap = self.capture.borrow_ref_mut(cs);
            let w = self.trig.window(cap.fill_index());
            cap.push(Fx::from_int(raw as i32) * w);
        });
    }
}
