use crate::annotation::{valid_points, Annotation};
use crate::config::TrajectoryConfig;
use crate::detection::detect_launch_frame;
use crate::error::{Error, Result};
use crate::math::{frame_time, lit};

/// Frame interval during which the parabolic model applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightWindow<F> {
    f0: u32,
    f1: u32,
    fps: F,
    t0: F,
    t1: F,
    duration: F,
}

impl<F: crate::Float> FlightWindow<F> {
    /// Builds the window `[f0, f1]` at `fps`.
    ///
    /// A duration shorter than `min_duration` is clamped to it instead of
    /// failing; this keeps the coefficients finite at the cost of a slightly
    /// wrong slope.
    pub fn new(f0: u32, f1: u32, fps: F, min_duration: F) -> Result<Self> {
        if !num_traits::Float::is_finite(fps) || fps <= F::zero() {
            return Err(Error::InvalidFps(
                num_traits::ToPrimitive::to_f64(&fps).unwrap_or(f64::NAN),
            ));
        }

        if f1 <= f0 {
            return Err(Error::InvalidWindow { f0, f1 });
        }

        let t0 = frame_time(f0, fps);
        let t1 = frame_time(f1, fps);
        let span = t1 - t0;

        let duration = if span < min_duration {
            tracing::debug!(
                "flight window {}..{} spans {}s, clamped to {}s",
                f0,
                f1,
                span,
                min_duration
            );

            min_duration
        } else {
            span
        };

        Ok(Self {
            f0,
            f1,
            fps,
            t0,
            t1,
            duration,
        })
    }

    /// Window from labelled frames: starts at the detected launch (never
    /// before the first valid label) and ends at the last valid label, at
    /// least one frame later.
    pub fn from_annotations(
        annotations: &[Annotation<F>],
        fps: F,
        config: &TrajectoryConfig,
    ) -> Result<Self> {
        let points = valid_points(annotations);
        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first.0, last.0),
            _ => return Err(Error::NoValidAnnotations),
        };

        let ys: Vec<(u32, F)> = points.iter().map(|&(frame, _, y)| (frame, y)).collect();
        let launch = detect_launch_frame(&ys, lit(config.launch_threshold)).unwrap_or(first);

        let f0 = first.max(launch);
        let next = f0
            .checked_add(1)
            .ok_or(Error::InvalidWindow { f0, f1: last })?;
        let f1 = last.max(next);

        tracing::debug!(
            "flight window: first = {}, launch = {}, last = {} -> [{}, {}]",
            first,
            launch,
            last,
            f0,
            f1
        );

        Self::new(f0, f1, fps, lit(config.min_duration))
    }

    #[inline]
    pub fn f0(&self) -> u32 {
        self.f0
    }

    #[inline]
    pub fn f1(&self) -> u32 {
        self.f1
    }

    #[inline]
    pub fn fps(&self) -> F {
        self.fps
    }

    #[inline]
    pub fn t0(&self) -> F {
        self.t0
    }

    #[inline]
    pub fn t1(&self) -> F {
        self.t1
    }

    /// `t1 - t0`, floored at the minimum duration.
    #[inline]
    pub fn duration(&self) -> F {
        self.duration
    }

    #[inline]
    pub fn midpoint(&self) -> F {
        self.t0 + self.duration * lit(0.5)
    }
}
