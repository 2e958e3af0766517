use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Float64Builder, Int64Array, ListBuilder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use log::info;
use parquet::arrow::ArrowWriter;

/// Write synthetic single-slit diffraction profiles to a Parquet file.
#[derive(Debug, Parser)]
struct Args {
    /// Output file
    #[arg(short, long, default_value = "sample_profiles.parquet")]
    output: PathBuf,

    /// Samples per profile
    #[arg(long, default_value_t = 2001)]
    samples: usize,

    /// Half-width of the screen window, in metres
    #[arg(long, default_value_t = 0.1)]
    half_window: f64,
}

/// Fraunhofer intensity of a slit of width `a` at screen position `x`.
fn sinc_squared(x: f64, a: f64, wavelength: f64, distance: f64) -> f64 {
    let u = std::f64::consts::PI * a * x / (wavelength * distance);
    if u.abs() < 1e-12 {
        1.0
    } else {
        (u.sin() / u).powi(2)
    }
}

/// Profile as a camera records it: offset pattern, clipped at saturation,
/// with additive sensor noise.
fn generate_profile(
    positions: &[f64],
    slit: &Slit,
    noise_level: f64,
    rng: &mut NoiseRng,
) -> Vec<f64> {
    positions
        .iter()
        .map(|&x| {
            let signal = sinc_squared(x - slit.offset, slit.width, slit.wavelength, SCREEN_DISTANCE);
            (slit.gain * signal).min(1.0) + rng.half_normal(noise_level)
        })
        .collect()
}

const SCREEN_DISTANCE: f64 = 2.0;

struct Slit {
    width: f64,
    wavelength: f64,
    laser: &'static str,
    /// Pattern shift on the screen, in metres.
    offset: f64,
    /// Gain above 1 saturates the central order.
    gain: f64,
}

/// Deterministic sensor-noise source: xoshiro256** seeded through an LCG.
struct NoiseRng {
    state: [u64; 4],
}

impl NoiseRng {
    fn seeded(seed: u64) -> Self {
        let mut x = seed;
        let state = std::array::from_fn(|_| {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            x
        });
        NoiseRng { state }
    }

    fn next_u64(&mut self) -> u64 {
        let [s0, s1, s2, s3] = &mut self.state;
        let out = s1.wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = *s1 << 17;
        *s2 ^= *s0;
        *s3 ^= *s1;
        *s1 ^= *s2;
        *s0 ^= *s3;
        *s2 ^= t;
        *s3 = s3.rotate_left(45);
        out
    }

    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Dark-current noise is never negative: |N(0, sigma)| via Box-Muller.
    fn half_normal(&mut self, sigma: f64) -> f64 {
        let u1 = self.uniform().max(1e-15);
        let u2 = self.uniform();
        sigma * ((-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()).abs()
    }
}

fn list_array(rows: &[Vec<f64>]) -> arrow::array::ListArray {
    let mut builder = ListBuilder::new(Float64Builder::new());
    for row in rows {
        builder.values().append_slice(row);
        builder.append(true);
    }
    builder.finish()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = NoiseRng::seeded(42);

    let n = args.samples.max(2);
    let positions: Vec<f64> = (0..n)
        .map(|i| -args.half_window + 2.0 * args.half_window * i as f64 / (n - 1) as f64)
        .collect();

    let slits = [
        Slit { width: 50e-6, wavelength: 670e-9, laser: "red", offset: 0.0, gain: 1.0 },
        Slit { width: 50e-6, wavelength: 670e-9, laser: "red", offset: 0.004, gain: 3.0 },
        Slit { width: 80e-6, wavelength: 670e-9, laser: "red", offset: -0.002, gain: 2.0 },
        Slit { width: 80e-6, wavelength: 532e-9, laser: "green", offset: 0.0, gain: 2.0 },
        Slit { width: 100e-6, wavelength: 532e-9, laser: "green", offset: 0.001, gain: 4.0 },
    ];
    let noise_levels = [0.0, 0.002];

    let mut all_x: Vec<Vec<f64>> = Vec::new();
    let mut all_y: Vec<Vec<f64>> = Vec::new();
    let mut all_slit: Vec<f64> = Vec::new();
    let mut all_wavelength: Vec<f64> = Vec::new();
    let mut all_laser: Vec<&str> = Vec::new();
    let mut all_id: Vec<i64> = Vec::new();

    for slit in &slits {
        for &noise in &noise_levels {
            all_y.push(generate_profile(&positions, slit, noise, &mut rng));
            all_x.push(positions.clone());
            all_slit.push(slit.width * 1e6);
            all_wavelength.push(slit.wavelength * 1e9);
            all_laser.push(slit.laser);
            all_id.push(all_id.len() as i64);
        }
    }

    let list = DataType::List(Arc::new(Field::new("item", DataType::Float64, true)));
    let schema = Arc::new(Schema::new(vec![
        Field::new("position", list.clone(), false),
        Field::new("intensity", list, false),
        Field::new("slit_um", DataType::Float64, false),
        Field::new("wavelength_nm", DataType::Float64, false),
        Field::new("laser", DataType::Utf8, false),
        Field::new("capture_id", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(list_array(&all_x)),
            Arc::new(list_array(&all_y)),
            Arc::new(Float64Array::from(all_slit)),
            Arc::new(Float64Array::from(all_wavelength)),
            Arc::new(StringArray::from(all_laser)),
            Arc::new(Int64Array::from(all_id.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    info!("screen distance {SCREEN_DISTANCE} m for all captures");
    println!(
        "Wrote {} profiles ({} samples each) to {}",
        all_id.len(),
        n,
        args.output.display()
    );
    Ok(())
}
