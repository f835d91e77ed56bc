//! In-place radix-2 decimation-in-time transform on fixed-point values.
//! Forward only.

use crate::fixed::Fx;
use crate::trig::Trig;

/// Transform `re` in place; `im` is cleared first and carries the
/// imaginary part of the result. `N` must be a power of two (at least 4).
///
/// Each butterfly replaces a bin pair with half-sum +- rotated-difference:
/// the even leg is shifted down by one and the twiddle table is stored at
/// half amplitude, so every stage halves the carried magnitude and no
/// intermediate value exceeds the input bound.
///
/// Real input spectra are mirror-symmetric: only bins `0..N/2` are
/// independent frequencies.
pub fn transform<const N: usize>(re: &mut [Fx; N], im: &mut [Fx; N], trig: &Trig<N>) {
    debug_assert!(N.is_power_of_two() && N >= 4);
    let log2n = N.trailing_zeros() as usize;

    for v in im.iter_mut() {
        *v = Fx::ZERO;
    }

    // Decimation in time: re-order input by bit-reversed index. The
    // imaginary part is all zero, only the real array needs swapping.
    let mut mr = 0;
    for m in 1..N {
        let mut l = N >> 1;
        while mr + l > N - 1 {
            l >>= 1;
        }
        mr = (mr & (l - 1)) + l;

        if mr > m {
            re.swap(m, mr);
        }
    }

    for stage in 0..log2n {
        let half = 1 << stage;
        let step = half << 1;
        let shift = log2n - 1 - stage;

        for m in 0..half {
            let (wr, ws) = trig.twiddle(m << shift);
            let wi = -ws;

            let mut i = m;
            while i < N {
                let j = i + half;

                let tr = wr * re[j] - wi * im[j];
                let ti = wr * im[j] + wi * re[j];
                let qr = re[i].half();
                let qi = im[i].half();

                re[j] = qr - tr;
                im[j] = qi - ti;
                re[i] = qr + tr;
                im[i] = qi + ti;

                i += step;
            }
        }
    }
}
