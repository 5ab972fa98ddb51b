//! Closed-form motion between two boundary points.
//!
//! Inside the flight window the ball moves linearly in `x` and `y`, while `z`
//! is a linear ramp between the boundary heights plus a parabolic bulge that
//! vanishes at both ends:
//!
//! ```text
//! z(t) = z0 + (z1 - z0) * (t - t0) / T + g * T * (t - t0) / 2 - g * (t - t0)^2 / 2
//! ```
//!
//! The bulge peaks at `g * T^2 / 8` over the window midpoint, so `z(t0) = z0`
//! and `z(t1) = z1` hold for any `g`.

use crate::math::{linear, lit, quadratic};
use crate::window::FlightWindow;
use crate::BoundaryPoint;
use nalgebra as na;

pub const STANDARD_GRAVITY: f64 = 9.81;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionModel<F> {
    gravity: F,
}

impl<F: crate::Float> Default for MotionModel<F> {
    fn default() -> Self {
        Self::new(lit(STANDARD_GRAVITY))
    }
}

impl<F: crate::Float> MotionModel<F> {
    pub fn new(gravity: F) -> Self {
        Self { gravity }
    }

    #[inline]
    pub fn gravity(&self) -> F {
        self.gravity
    }

    /// Expands the boundary conditions into polynomial coefficients in absolute time.
    pub fn derive(
        &self,
        window: FlightWindow<F>,
        start: BoundaryPoint<F>,
        end: BoundaryPoint<F>,
    ) -> MotionCoefficients<F> {
        let g = self.gravity;
        let half = lit::<F>(0.5);
        let t0 = window.t0();
        let tt = window.duration();

        let m_x = (end.x - start.x) / tt;
        let q_x = start.x - m_x * t0;
        let m_y = (end.y - start.y) / tt;
        let q_y = start.y - m_y * t0;

        let a = -half * g;
        let ramp = (end.z - start.z) / tt + half * g * tt;
        let b = ramp + g * t0;
        let c = start.z - ramp * t0 - half * g * t0 * t0;

        tracing::debug!(
            "motion coefficients: m_x = {}, q_x = {}, m_y = {}, q_y = {}, a = {}, b = {}, c = {}",
            m_x,
            q_x,
            m_y,
            q_y,
            a,
            b,
            c
        );

        MotionCoefficients {
            window,
            start,
            end,
            gravity: g,
            m_x,
            q_x,
            m_y,
            q_y,
            a,
            b,
            c,
        }
    }
}

/// Coefficients of
/// `x(t) = m_x t + q_x`, `y(t) = m_y t + q_y`, `z(t) = a t^2 + b t + c`
/// together with the inputs they were derived from.
///
/// Every position, velocity and derivation printout is read from this value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCoefficients<F: na::Scalar> {
    window: FlightWindow<F>,
    start: BoundaryPoint<F>,
    end: BoundaryPoint<F>,
    gravity: F,
    m_x: F,
    q_x: F,
    m_y: F,
    q_y: F,
    a: F,
    b: F,
    c: F,
}

impl<F: crate::Float> MotionCoefficients<F> {
    #[inline]
    pub fn window(&self) -> &FlightWindow<F> {
        &self.window
    }

    #[inline]
    pub fn start(&self) -> BoundaryPoint<F> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> BoundaryPoint<F> {
        self.end
    }

    #[inline]
    pub fn gravity(&self) -> F {
        self.gravity
    }

    #[inline]
    pub fn m_x(&self) -> F {
        self.m_x
    }

    #[inline]
    pub fn q_x(&self) -> F {
        self.q_x
    }

    #[inline]
    pub fn m_y(&self) -> F {
        self.m_y
    }

    #[inline]
    pub fn q_y(&self) -> F {
        self.q_y
    }

    #[inline]
    pub fn a(&self) -> F {
        self.a
    }

    #[inline]
    pub fn b(&self) -> F {
        self.b
    }

    #[inline]
    pub fn c(&self) -> F {
        self.c
    }

    /// Slope of `vz(t) = 2 a t + b`, i.e. the in-flight vertical acceleration.
    #[inline]
    pub fn accel_z(&self) -> F {
        self.a + self.a
    }

    /// Polynomial position, without the window clamping.
    #[inline]
    pub fn polynomial_position(&self, t: F) -> BoundaryPoint<F> {
        na::Point3::new(
            linear(self.m_x, self.q_x, t),
            linear(self.m_y, self.q_y, t),
            quadratic(self.a, self.b, self.c, t),
        )
    }

    /// Polynomial velocity, without the window clamping.
    #[inline]
    pub fn polynomial_velocity(&self, t: F) -> na::Vector3<F> {
        na::Vector3::new(self.m_x, self.m_y, self.accel_z() * t + self.b)
    }

    /// Constant obtained by integrating `vz` and imposing `z(t0) = z0`.
    ///
    /// Equals `c` up to rounding.
    pub fn integration_constant(&self) -> F {
        let t0 = self.window.t0();

        self.start.z - self.a * t0 * t0 - self.b * t0
    }

    /// Time and position of the highest point, if it falls inside the window.
    pub fn apex(&self) -> Option<(F, BoundaryPoint<F>)> {
        if self.a == F::zero() {
            return None;
        }

        let t = -self.b / self.accel_z();

        if t > self.window.t0() && t < self.window.t1() {
            Some((t, self.polynomial_position(t)))
        } else {
            None
        }
    }
}
