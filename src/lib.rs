pub mod annotation;
pub mod config;
pub mod derivation;
pub mod detection;
pub mod error;
pub mod kinematics;
pub mod math;
pub mod model;
pub mod position;
pub mod series;
pub mod window;

pub use annotation::Annotation;
pub use config::TrajectoryConfig;
pub use derivation::DerivationReport;
pub use kinematics::KinematicsEvaluator;
pub use model::{MotionCoefficients, MotionModel};
pub use position::PositionEvaluator;
pub use series::{FrameKinematics, PerFrameSeries};
pub use window::FlightWindow;

use error::Result;
use math::lit;
use nalgebra as na;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub trait Float:
    num_traits::Float
    + num_traits::FromPrimitive
    + na::RealField
    + Copy
    + fmt::Debug
    + fmt::Display
    + 'static
{
}

impl<T> Float for T where
    T: num_traits::Float
        + num_traits::FromPrimitive
        + na::RealField
        + Copy
        + fmt::Debug
        + fmt::Display
        + 'static
{
}

/// 3D anchor of the ball at the start or end of the flight.
pub type BoundaryPoint<F> = na::Point3<F>;

/// Everything a single run produces.
#[derive(Debug, Clone)]
pub struct Reconstruction<F: na::Scalar> {
    pub window: FlightWindow<F>,
    pub coefficients: MotionCoefficients<F>,
    pub series: PerFrameSeries<F>,
    pub derivation: String,
}

/// Files written by [`Reconstruction::write_outputs`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFiles {
    pub csv: PathBuf,
    pub json: PathBuf,
    pub derivation: PathBuf,
}

impl<F: Float + serde::Serialize> Reconstruction<F> {
    /// Writes `series.csv`, `series.json` and `derivation.txt` into `dir`,
    /// creating it if needed.
    pub fn write_outputs<P: AsRef<Path>>(&self, dir: P) -> Result<OutputFiles> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let files = OutputFiles {
            csv: dir.join("series.csv"),
            json: dir.join("series.json"),
            derivation: dir.join("derivation.txt"),
        };

        let mut csv = BufWriter::new(File::create(&files.csv)?);
        self.series.write_csv(&mut csv)?;
        csv.flush()?;

        std::fs::write(&files.json, self.series.to_json()?)?;
        std::fs::write(&files.derivation, format!("{}\n", self.derivation))?;

        tracing::info!("wrote outputs to {}", dir.display());

        Ok(files)
    }
}

/// Labels -> flight window -> coefficients -> per-frame kinematics and derivation.
pub fn reconstruct<F: Float>(
    annotations: &[Annotation<F>],
    total_frames: u32,
    fps: F,
    start: BoundaryPoint<F>,
    end: BoundaryPoint<F>,
    config: &TrajectoryConfig,
) -> Result<Reconstruction<F>> {
    let window = FlightWindow::from_annotations(annotations, fps, config)?;
    let coefficients = MotionModel::new(lit(config.gravity)).derive(window, start, end);
    let series = PerFrameSeries::build(&coefficients, total_frames).with_labels(annotations);
    let derivation = DerivationReport::new(&coefficients, config.precision).render();

    tracing::info!(
        "reconstructed flight over frames {}..{} ({} s), {} frames evaluated",
        window.f0(),
        window.f1(),
        window.duration(),
        series.len()
    );

    Ok(Reconstruction {
        window,
        coefficients,
        series,
        derivation,
    })
}
