use std::cell::RefCell;
use std::collections::HashMap;

use argh::FromArgs;
use critical_section::Mutex;

use spectro::{
    clock, Analyzer, Capture, Display, Frame, Layout, Rgb, SampleClock, SampleSource, Sampler,
    Trig, Waterfall, DEFAULT_SAMPLE_RATE, NFFT,
};

const COLS: u16 = 100;
const ROWS: usize = 60;

const LAYOUT: Layout = Layout {
    left: 20,
    right: COLS - 1,
    height: ROWS as u16,
    readout_x: 50,
    readout_y: 0,
};

#[derive(FromArgs)]
/// Feed a synthetic tone through the spectrogram pipeline and print the
/// resulting waterfall as ANSI cells.
struct Sim {
    #[argh(option, short = 'f', default = "400", description = "tone frequency [Hz]")]
    freq: u32,

    #[argh(
        option,
        short = 'r',
        default = "DEFAULT_SAMPLE_RATE",
        description = "sample rate [Hz]"
    )]
    rate: u32,

    #[argh(
        option,
        short = 'a',
        default = "400",
        description = "tone amplitude [ADC counts]"
    )]
    amplitude: u32,

    #[argh(option, short = 'n', default = "80", description = "frames to render")]
    frames: u32,
}

/// DC-biased tone, the shape an ADC would deliver.
struct Tone {
    amp: f32,
    freq: f32,
    rate: f32,
    t: u32,
}

impl SampleSource for Tone {
    fn raw_sample(&mut self) -> i16 {
        let phase = 2.0 * std::f32::consts::PI * self.freq * self.t as f32 / self.rate;
        self.t = self.t.wrapping_add(1);
        (512.0 + self.amp * phase.sin()) as i16
    }
}

/// The simulator drives ticks explicitly; there is no timer to start.
struct NullClock;

impl SampleClock for NullClock {
    fn start(&mut self, hz: u32) {
        eprintln!("tick source running at {hz} Hz");
    }

    fn stop(&mut self) {}
}

/// Cell-per-pixel terminal framebuffer.
struct Term {
    cells: Vec<Rgb>,
    texts: Vec<(u16, u16, String)>,
}

impl Term {
    fn new() -> Term {
        Term {
            cells: vec![Rgb::BLACK; COLS as usize * ROWS],
            texts: Vec::new(),
        }
    }

    fn print(&self) {
        let mut chars: HashMap<(u16, u16), char> = HashMap::new();
        for (x, y, t) in &self.texts {
            for (i, ch) in t.chars().enumerate() {
                chars.insert((x + i as u16, *y), ch);
            }
        }

        for y in 0..ROWS as u16 {
            let mut line = String::new();
            for x in 0..COLS {
                let Rgb(c) = self.cells[y as usize * COLS as usize + x as usize];
                let (r, g, b) = rgb888(c);
                match chars.get(&(x, y)) {
                    Some(ch) => {
                        line.push_str(&format!("\x1b[48;2;{r};{g};{b}m\x1b[1;37m{ch}\x1b[22m"))
                    }
                    None => line.push_str(&format!("\x1b[48;2;{r};{g};{b}m ")),
                }
            }
            line.push_str("\x1b[0m");
            println!("{line}");
        }
    }
}

impl Display for Term {
    fn draw_pixel(&mut self, x: u16, y: u16, color: Rgb) {
        if x < COLS && (y as usize) < ROWS {
            self.cells[y as usize * COLS as usize + x as usize] = color;
        }
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str) {
        self.texts.push((x, y, text.into()));
    }
}

fn rgb888(c: u16) -> (u8, u8, u8) {
    let r = ((c >> 11) & 0x1f) as u8;
    let g = ((c >> 5) & 0x3f) as u8;
    let b = (c & 0x1f) as u8;
    ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
}

fn main() -> anyhow::Result<()> {
    let args: Sim = argh::from_env();

    static CAPTURE: Mutex<RefCell<Capture<NFFT>>> = Mutex::new(RefCell::new(Capture::new()));

    let trig = Trig::<NFFT>::new();
    let mut term = Term::new();

    let mut analyzer: Analyzer<'_, &mut Term, NFFT, ROWS> = Analyzer::new(
        &CAPTURE,
        &trig,
        Waterfall::new(&mut term, LAYOUT),
        DEFAULT_SAMPLE_RATE,
    );

    let mut tick_source = NullClock;
    let rate = clock::reconfigure(&mut tick_source, &mut analyzer, args.rate);

    let mut sampler = Sampler::new(
        Tone {
            amp: args.amplitude as f32,
            freq: args.freq as f32,
            rate: rate as f32,
            t: 0,
        },
        &trig,
        &CAPTURE,
    );

    let mut last: Option<Frame> = None;
    for _ in 0..args.frames {
        // One capture period worth of ticks, then the processing pass the
        // scheduler would grant once the window is ready.
        for _ in 0..NFFT {
            sampler.tick();
        }

        if let Some(frame) = analyzer.poll() {
            last = Some(frame);
        }
    }

    drop(analyzer);
    term.print();

    if let Some(frame) = last {
        println!(
            "dominant bin {} -> {} Hz",
            frame.peak.bin,
            frame.peak.frequency(rate, NFFT)
        );
    }

    let dropped = critical_section::with(|cs| CAPTURE.borrow_ref(cs).dropped());
    if dropped > 0 {
        eprintln!("{dropped} capture windows dropped");
    }

    Ok(())
}
