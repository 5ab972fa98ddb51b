//! Rebuilds a ball flight from labelled frames and writes the per-frame
//! series plus the textual derivation.
//!
//! cargo run --example reconstruct -- --annotations annotations.xml --frames 120 --fps 30

use clap::Parser;
use flighttrack::annotation::{frames_to_cover, load_annotations_json, load_cvat_xml};
use flighttrack::math::parse_triplet;
use flighttrack::{derivation, detection, reconstruct, TrajectoryConfig};
use std::path::PathBuf;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "reconstruct")]
#[command(about = "3D ball trajectory with linear x/y and parabolic z between two anchor points")]
struct Cli {
    /// CVAT annotations.xml, or a JSON array of {"frame", "x2d", "y2d"} rows.
    #[arg(long)]
    annotations: PathBuf,

    /// Number of frames in the video; defaults to one past the last label.
    #[arg(long)]
    frames: Option<u32>,

    /// Video frame rate.
    #[arg(long)]
    fps: Option<f64>,

    /// Output directory.
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Ball position at launch, "x,y,z".
    #[arg(long, default_value = "0,7,2.0")]
    ball_start: String,

    /// Ball position at the end of the flight, "x,y,z".
    #[arg(long, default_value = "6,6,0")]
    ball_end: String,

    /// Gravity for z, overrides the config file.
    #[arg(long)]
    g: Option<f64>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TrajectoryConfig::from_json_file(path)?,
        None => TrajectoryConfig::default(),
    };
    if let Some(g) = cli.g {
        config.gravity = g;
    }

    let start = parse_triplet::<f64>(&cli.ball_start)?;
    let end = parse_triplet::<f64>(&cli.ball_end)?;
    let fps = config.resolve_fps(cli.fps);

    tracing::info!("Loading annotations: {}", cli.annotations.display());
    let is_xml = cli
        .annotations
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("xml"));
    let annotations = if is_xml {
        load_cvat_xml::<f64, _>(&cli.annotations)?
    } else {
        load_annotations_json::<f64, _>(&cli.annotations)?
    };

    let total = cli
        .frames
        .unwrap_or_else(|| frames_to_cover(&annotations));

    let rec = reconstruct(&annotations, total, fps, start, end, &config)?;

    let points: Vec<(u32, f64)> = flighttrack::annotation::valid_points(&annotations)
        .into_iter()
        .map(|(frame, _, y)| (frame, y))
        .collect();
    if let Some(peak) = detection::find_peak_height_frame(&points) {
        tracing::info!("Highest labelled frame: {}", peak);
    }
    if let Some((t, p)) = rec.coefficients.apex() {
        tracing::info!("Model apex at t = {:.3}s, z = {:.3}", t, p.z);
    }

    let files = rec.write_outputs(&cli.out)?;

    let residual = derivation::integral_round_trip(&rec.coefficients, rec.series.times().view());
    tracing::info!("Integral round trip residual: {:e}", residual);

    println!("{}", rec.derivation);
    println!("outputs:");
    println!("{}", files.csv.display());
    println!("{}", files.json.display());
    println!("{}", files.derivation.display());

    Ok(())
}
