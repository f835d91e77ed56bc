use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

fn main() {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("config.rs");

    let nfft: usize = option_env!("SPECTRO_NFFT")
        .map(|p| p.parse::<usize>().unwrap())
        .unwrap_or(512);

    let npix: usize = option_env!("SPECTRO_NPIX")
        .map(|p| p.parse::<usize>().unwrap())
        .unwrap_or(239);

    let rate: u32 = option_env!("SPECTRO_SAMPLE_RATE")
        .map(|p| p.parse::<u32>().unwrap())
        .unwrap_or(5000);

    let fd = fs::File::create(&dest_path).unwrap();
    writeln!(&fd, "/// Transform length (must be a power of two).").unwrap();
    writeln!(&fd, "pub const NFFT: usize = {nfft};").unwrap();
    writeln!(&fd, "/// Spectrum rows drawn per column (display height).").unwrap();
    writeln!(&fd, "pub const NPIX: usize = {npix};").unwrap();
    writeln!(&fd, "/// Sampling cadence at startup [Hz].").unwrap();
    writeln!(&fd, "pub const DEFAULT_SAMPLE_RATE: u32 = {rate};").unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
