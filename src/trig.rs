//! Sine and window lookup tables, computed once at startup and read-only
//! afterwards.

use core::f32::consts::PI;

use libm::{cosf, sinf};

use crate::fixed::Fx;

/// One cycle of sine at half amplitude and one Hann window, both of
/// length `N`. The sine table doubles as the twiddle source for the
/// transform: it is stored pre-scaled by one half to match the per-stage
/// halving of the butterflies, and cosine is read a quarter period ahead.
pub struct Trig<const N: usize> {
    sin: [Fx; N],
    hann: [Fx; N],
}

impl<const N: usize> Trig<N> {
    pub fn new() -> Trig<N> {
        let mut sin = [Fx::ZERO; N];
        let mut hann = [Fx::ZERO; N];

        for i in 0..N {
            let phase = 2.0 * PI * i as f32 / N as f32;
            sin[i] = Fx::from_f32(0.5 * sinf(phase));
            hann[i] = Fx::from_f32(0.5 * (1.0 - cosf(phase)));
        }

        Trig { sin, hann }
    }

    /// Twiddle pair (cos, sin) for index `j`. Valid for `j < 3N/4`, which
    /// covers every index the transform generates.
    pub fn twiddle(&self, j: usize) -> (Fx, Fx) {
        (self.sin[j + N / 4], self.sin[j])
    }

    /// Window coefficient for sample index `i`.
    pub fn window(&self, i: usize) -> Fx {
        self.hann[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const N: usize = 512;

    #[test]
    fn window_shape() {
        let t = Trig::<N>::new();

        // Zero at the edges, maximum at the midpoint.
        assert_abs_diff_eq!(t.window(0).to_f32(), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(t.window(N - 1).to_f32(), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(t.window(N / 2).to_f32(), 1.0, epsilon = 1e-3);

        for i in 1..N {
            assert_abs_diff_eq!(
                t.window(i).to_f32(),
                t.window(N - i).to_f32(),
                epsilon = 1e-3
            );
            assert!(t.window(i) >= Fx::ZERO);
        }
    }

    #[test]
    fn sine_half_amplitude() {
        let t = Trig::<N>::new();

        assert_abs_diff_eq!(t.sin[N / 4].to_f32(), 0.5, epsilon = 1e-3);
        assert_abs_diff_eq!(t.sin[3 * N / 4].to_f32(), -0.5, epsilon = 1e-3);
        assert_abs_diff_eq!(t.sin[0].to_f32(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn quarter_wave_cosine() {
        let t = Trig::<N>::new();

        let (c, s) = t.twiddle(0);
        assert_abs_diff_eq!(c.to_f32(), 0.5, epsilon = 1e-3);
        assert_abs_diff_eq!(s.to_f32(), 0.0, epsilon = 1e-3);

        for j in 0..N / 2 {
            let (c, s) = t.twiddle(j);
            let phase = 2.0 * PI * j as f32 / N as f32;
            assert_abs_diff_eq!(c.to_f32(), 0.5 * phase.cos(), epsilon = 1e-3);
            assert_abs_diff_eq!(s.to_f32(), 0.5 * phase.sin(), epsilon = 1e-3);
        }
    }
}
