//! Scrolling waterfall: magnitudes map to color bands, one column per
//! completed capture window.

use core::fmt::Write as _;

use heapless::String;

#[allow(unused_imports)]
use defmt::{debug, trace};

use crate::fixed::Fx;
use crate::spectrum::Peak;

/// RGB565 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct Rgb(pub u16);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x0000);
    pub const WHITE: Rgb = Rgb(0xffff);
}

/// Pixel-push primitives supplied by the display collaborator. Drawing is
/// infallible by contract; there is no I/O error path inside the render
/// stage.
pub trait Display {
    fn draw_pixel(&mut self, x: u16, y: u16, color: Rgb);
    fn draw_text(&mut self, x: u16, y: u16, text: &str);

    fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.draw_pixel(xx, yy, color);
            }
        }
    }
}

impl<T: Display + ?Sized> Display for &mut T {
    fn draw_pixel(&mut self, x: u16, y: u16, color: Rgb) {
        (**self).draw_pixel(x, y, color)
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str) {
        (**self).draw_text(x, y, text)
    }

    fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb) {
        (**self).fill_rect(x, y, w, h, color)
    }
}

/// Ascending magnitude limits (whole units) and the color drawn below
/// each; anything past the last limit saturates to white.
const BANDS: [(i32, Rgb); 7] = [
    (1, Rgb(0x0000)),
    (2, Rgb(0x2945)),
    (4, Rgb(0x4a49)),
    (8, Rgb(0x738e)),
    (16, Rgb(0x85c1)),
    (32, Rgb(0xad55)),
    (64, Rgb(0xc638)),
];

pub fn band(mag: Fx) -> Rgb {
    for (limit, color) in BANDS {
        if mag < Fx::from_int(limit) {
            return color;
        }
    }

    Rgb::WHITE
}

/// Screen region of the scrolling spectrogram.
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct Layout {
    /// First column of the scroll area.
    pub left: u16,
    /// Last column of the scroll area (inclusive).
    pub right: u16,
    /// Display height in pixels; bin 0 is drawn on the bottom row.
    pub height: u16,
    /// Anchor of the dominant-frequency readout.
    pub readout_x: u16,
    pub readout_y: u16,
}

impl Default for Layout {
    /// Geometry of the reference 320x240 TFT, axis panel to the left.
    fn default() -> Layout {
        Layout {
            left: 61,
            right: 314,
            height: 240,
            readout_x: 100,
            readout_y: 0,
        }
    }
}

/// Height of the strip wiped under the frequency readout.
const READOUT_STRIP: u16 = 15;

/// Persistent render state: the scroll cursor, advanced one column per
/// frame and wrapped from the right edge back to the left margin.
pub struct Waterfall<D> {
    display: D,
    layout: Layout,
    col: u16,
}

impl<D: Display> Waterfall<D> {
    pub fn new(display: D, layout: Layout) -> Waterfall<D> {
        Waterfall {
            display,
            layout,
            col: layout.left,
        }
    }

    /// Column the next frame lands on.
    pub fn column(&self) -> u16 {
        self.col
    }

    /// Draw one column of magnitudes at the scroll cursor, then advance.
    pub fn draw_column(&mut self, mags: &[Fx]) {
        debug_assert!(mags.len() <= self.layout.height as usize);

        for (bin, mag) in mags.iter().enumerate() {
            let y = self.layout.height - 1 - bin as u16;
            self.display.draw_pixel(self.col, y, band(*mag));
        }

        self.col = if self.col < self.layout.right {
            self.col + 1
        } else {
            self.layout.left
        };
    }

    /// Dominant-frequency readout, updated once per frame.
    pub fn draw_readout(&mut self, peak: &Peak, rate: u32, n: usize) {
        let mut text: String<32> = String::new();
        write!(&mut text, "Max. freq: {} Hz", peak.frequency(rate, n)).ok();

        let x = self.layout.readout_x.saturating_sub(30).max(self.layout.left);
        let w = self.layout.right + 1 - x;
        self.display
            .fill_rect(x, self.layout.readout_y, w, READOUT_STRIP, Rgb::BLACK);
        self.display
            .draw_text(self.layout.readout_x, self.layout.readout_y, &text);
    }

    /// Frequency axis left of the scroll area: tick marks at quarters of
    /// the displayed range and their Hz labels. Redrawn whenever the
    /// sample rate changes.
    pub fn draw_axis(&mut self, rate: u32, n: usize) {
        let h = self.layout.height;
        let panel = self.layout.left.saturating_sub(5);

        self.display.fill_rect(0, 0, panel, h, Rgb::BLACK);
        self.display.fill_rect(panel + 1, 0, 3, h, Rgb::WHITE);

        for step in 0..=4u16 {
            let from_bottom = (u32::from(h) * u32::from(step) / 4).min(u32::from(h) - 1) as u16;
            let y = h - 1 - from_bottom;

            if self.layout.left >= 16 {
                self.display
                    .fill_rect(self.layout.left - 16, y, 12, 1, Rgb::WHITE);
            }

            let mut label: String<16> = String::new();
            if step == 0 {
                write!(&mut label, "0 Hz").ok();
            } else {
                write!(&mut label, "{}", u32::from(from_bottom) * rate / n as u32).ok();
            }

            let ty = if step == 0 {
                h.saturating_sub(20)
            } else {
                y.saturating_sub(9).max(2)
            };
            self.display.draw_text(0, ty, &label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockDisplay {
        pixels: HashMap<(u16, u16), u16>,
        texts: Vec<(u16, u16, std::string::String)>,
    }

    impl MockDisplay {
        fn new() -> MockDisplay {
            MockDisplay {
                pixels: HashMap::new(),
                texts: Vec::new(),
            }
        }
    }

    impl Display for MockDisplay {
        fn draw_pixel(&mut self, x: u16, y: u16, color: Rgb) {
            self.pixels.insert((x, y), color.0);
        }

        fn draw_text(&mut self, x: u16, y: u16, text: &str) {
            self.texts.push((x, y, text.into()));
        }
    }

    #[test]
    fn band_table_is_ordered() {
        assert_eq!(band(Fx::ZERO), Rgb(0x0000));
        assert_eq!(band(Fx::from_f32(0.99)), Rgb(0x0000));
        assert_eq!(band(Fx::from_int(1)), Rgb(0x2945));
        assert_eq!(band(Fx::from_int(3)), Rgb(0x4a49));
        assert_eq!(band(Fx::from_int(7)), Rgb(0x738e));
        assert_eq!(band(Fx::from_int(15)), Rgb(0x85c1));
        assert_eq!(band(Fx::from_int(31)), Rgb(0xad55));
        assert_eq!(band(Fx::from_int(50)), Rgb(0xc638));
        assert_eq!(band(Fx::from_int(64)), Rgb::WHITE);
        assert_eq!(band(Fx::from_int(10_000)), Rgb::WHITE);
    }

    #[test]
    fn column_drawn_bottom_up() {
        let mut mock = MockDisplay::new();
        let layout = Layout {
            left: 2,
            right: 9,
            height: 4,
            readout_x: 4,
            readout_y: 0,
        };

        {
            let mut wf = Waterfall::new(&mut mock, layout);
            wf.draw_column(&[
                Fx::from_int(70),
                Fx::from_int(20),
                Fx::from_int(5),
                Fx::ZERO,
            ]);
        }

        // Bin 0 on the bottom row, increasing bins upward.
        assert_eq!(mock.pixels[&(2, 3)], 0xffff);
        assert_eq!(mock.pixels[&(2, 2)], 0xad55);
        assert_eq!(mock.pixels[&(2, 1)], 0x738e);
        assert_eq!(mock.pixels[&(2, 0)], 0x0000);
    }

    #[test]
    fn cursor_advances_and_wraps() {
        let mut mock = MockDisplay::new();
        let layout = Layout {
            left: 5,
            right: 7,
            height: 2,
            readout_x: 5,
            readout_y: 0,
        };

        let mut wf = Waterfall::new(&mut mock, layout);
        assert_eq!(wf.column(), 5);

        for expected in [6, 7, 5, 6] {
            wf.draw_column(&[Fx::ZERO, Fx::ZERO]);
            assert_eq!(wf.column(), expected);
        }
    }

    #[test]
    fn zero_magnitudes_draw_only_lowest_band() {
        let mut mock = MockDisplay::new();
        let layout = Layout {
            left: 0,
            right: 3,
            height: 8,
            readout_x: 0,
            readout_y: 0,
        };

        {
            let mut wf = Waterfall::new(&mut mock, layout);
            wf.draw_column(&[Fx::ZERO; 8]);
        }

        assert!(mock.pixels.values().all(|c| *c == 0x0000));
    }

    #[test]
    fn readout_text() {
        let mut mock = MockDisplay::new();

        {
            let mut wf = Waterfall::new(&mut mock, Layout::default());
            let peak = Peak {
                bin: 51,
                value: Fx::ONE,
            };
            wf.draw_readout(&peak, 5000, 512);
        }

        assert_eq!(mock.texts.len(), 1);
        assert_eq!(mock.texts[0].0, 100);
        assert!(mock.texts[0].2.contains("498 Hz"));
    }

    #[test]
    fn axis_labels_follow_rate() {
        let mut mock = MockDisplay::new();

        {
            let mut wf = Waterfall::new(&mut mock, Layout::default());
            wf.draw_axis(5000, 512);
        }

        let labels: Vec<&str> = mock.texts.iter().map(|t| t.2.as_str()).collect();
        assert!(labels.contains(&"0 Hz"));
        // Top of the 240-row area: 239*5000/512.
        assert!(labels.contains(&"2333"));
        assert_eq!(labels.len(), 5);
    }
}
