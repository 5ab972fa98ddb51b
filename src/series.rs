use crate::annotation::Annotation;
use crate::error::Result;
use crate::kinematics::{kinetic_energy, potential_energy, KinematicsEvaluator};
use crate::math::frame_time;
use crate::model::MotionCoefficients;
use crate::position::PositionEvaluator;
use nalgebra as na;
use ndarray::Array1;
use serde_derive::{Deserialize, Serialize};
use std::io::Write;

pub const CSV_HEADER: &str = "frame,t,x3d,y3d,z3d,vx,vy,vz,speed,ax,ay,az";

/// Kinematic state of the ball at one video frame.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FrameKinematics<F> {
    pub frame: u32,
    pub t: F,
    pub x3d: F,
    pub y3d: F,
    pub z3d: F,
    pub vx: F,
    pub vy: F,
    pub vz: F,
    pub speed: F,
    pub ax: F,
    pub ay: F,
    pub az: F,
    /// Image-space label of the ball on this frame, when one exists.
    pub x2d: Option<F>,
    pub y2d: Option<F>,
}

impl<F: crate::Float> FrameKinematics<F> {
    #[inline]
    pub fn position(&self) -> na::Point3<F> {
        na::Point3::new(self.x3d, self.y3d, self.z3d)
    }

    #[inline]
    pub fn velocity(&self) -> na::Vector3<F> {
        na::Vector3::new(self.vx, self.vy, self.vz)
    }

    #[inline]
    pub fn acceleration(&self) -> na::Vector3<F> {
        na::Vector3::new(self.ax, self.ay, self.az)
    }

    #[inline]
    pub fn acceleration_magnitude(&self) -> F {
        self.acceleration().norm()
    }

    #[inline]
    pub fn kinetic_energy(&self, mass: F) -> F {
        kinetic_energy(self.speed, mass)
    }

    #[inline]
    pub fn potential_energy(&self, mass: F, gravity: F) -> F {
        potential_energy(self.z3d, mass, gravity)
    }

    #[inline]
    pub fn total_energy(&self, mass: F, gravity: F) -> F {
        self.kinetic_energy(mass) + self.potential_energy(mass, gravity)
    }

    #[inline]
    pub fn label(&self) -> Option<(F, F)> {
        Annotation {
            frame: self.frame,
            x2d: self.x2d,
            y2d: self.y2d,
        }
        .point()
    }

    #[inline]
    pub fn has_position(&self) -> bool {
        !(num_traits::Float::is_nan(self.x3d)
            || num_traits::Float::is_nan(self.y3d)
            || num_traits::Float::is_nan(self.z3d))
    }
}

/// One row per video frame, frame `i` at index `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct PerFrameSeries<F> {
    fps: F,
    records: Vec<FrameKinematics<F>>,
}

impl<F: crate::Float> PerFrameSeries<F> {
    /// Evaluates the model at `t = frame / fps` for frames `0..total_frames`.
    pub fn build(coeffs: &MotionCoefficients<F>, total_frames: u32) -> Self {
        let fps = coeffs.window().fps();
        let times: Array1<F> = (0..total_frames).map(|f| frame_time(f, fps)).collect();

        let positions = PositionEvaluator::new(coeffs).evaluate(times.view());
        let table = KinematicsEvaluator::new(coeffs).evaluate(times.view());

        let records = times
            .iter()
            .enumerate()
            .map(|(i, &t)| FrameKinematics {
                frame: i as u32,
                t,
                x3d: positions[[i, 0]],
                y3d: positions[[i, 1]],
                z3d: positions[[i, 2]],
                vx: table.velocity[[i, 0]],
                vy: table.velocity[[i, 1]],
                vz: table.velocity[[i, 2]],
                speed: table.speed[i],
                ax: table.acceleration[[i, 0]],
                ay: table.acceleration[[i, 1]],
                az: table.acceleration[[i, 2]],
                x2d: None,
                y2d: None,
            })
            .collect();

        Self { fps, records }
    }

    /// Attaches the 2D label of every annotated frame inside the series.
    pub fn with_labels(mut self, annotations: &[Annotation<F>]) -> Self {
        for a in annotations {
            if let Some(r) = self.records.get_mut(a.frame as usize) {
                r.x2d = a.x2d;
                r.y2d = a.y2d;
            }
        }

        self
    }

    #[inline]
    pub fn fps(&self) -> F {
        self.fps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &FrameKinematics<F>> {
        self.records.iter()
    }

    #[inline]
    pub fn records(&self) -> &[FrameKinematics<F>] {
        &self.records
    }

    /// `None` for frames past the end of the video.
    #[inline]
    pub fn get(&self, frame: u32) -> Option<&FrameKinematics<F>> {
        self.records.get(frame as usize)
    }

    pub fn times(&self) -> Array1<F> {
        self.records.iter().map(|r| r.t).collect()
    }

    pub fn write_csv<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "{}", CSV_HEADER)?;

        for r in &self.records {
            writeln!(
                out,
                "{},{},{},{},{},{},{},{},{},{},{},{}",
                r.frame, r.t, r.x3d, r.y3d, r.z3d, r.vx, r.vy, r.vz, r.speed, r.ax, r.ay, r.az
            )?;
        }

        Ok(())
    }

    /// Text lines a video overlay draws on `frame`.
    ///
    /// Kinematics lines need a position, the label line needs a 2D label.
    /// `None` when the frame is outside the series or neither is present.
    pub fn overlay_lines(&self, frame: u32) -> Option<Vec<String>> {
        let r = self.get(frame)?;
        let mut lines = Vec::new();

        if r.has_position() {
            lines.push(format!("frame {}  t {:.3}s", r.frame, r.t));
            lines.push(format!("x {:.3}  y {:.3}  z {:.3}", r.x3d, r.y3d, r.z3d));

            if num_traits::Float::is_finite(r.speed) {
                lines.push(format!("|v| {:.3} m/s", r.speed));
            }

            let accel = r.acceleration_magnitude();
            if num_traits::Float::is_finite(accel) {
                lines.push(format!("|a| {:.3} m/s^2", accel));
            }
        }

        if let Some((x, y)) = r.label() {
            lines.push(format!("ball ({:.0}, {:.0}) px", x, y));
        }

        if lines.is_empty() {
            None
        } else {
            Some(lines)
        }
    }
}

impl<F: crate::Float + serde::Serialize> PerFrameSeries<F> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records)?)
    }
}

/// First, middle and last frame of a video, for still extraction.
pub fn key_frames(total_frames: u32) -> Vec<u32> {
    match total_frames {
        0 => Vec::new(),
        1 => vec![0],
        n => vec![0, n / 2, n - 1],
    }
}
