use crate::math::lit;
use crate::model::MotionCoefficients;
use nalgebra as na;
use ndarray::{Array1, Array2, ArrayView1};

/// Velocity, speed and acceleration columns for a time grid.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicsTable<F> {
    /// (n, 3): vx, vy, vz
    pub velocity: Array2<F>,
    pub speed: Array1<F>,
    /// (n, 3): ax, ay, az
    pub acceleration: Array2<F>,
}

/// Analytic derivatives of the motion model.
///
/// Derivatives are taken on the half-open window `[t0, t1)`: the ball is
/// still at `t < t0`, and at exactly `t1` it is treated as already stopped,
/// so velocity drops to zero there while position is continuous.
#[derive(Debug, Clone, Copy)]
pub struct KinematicsEvaluator<'a, F: na::Scalar> {
    coeffs: &'a MotionCoefficients<F>,
}

impl<'a, F: crate::Float> KinematicsEvaluator<'a, F> {
    pub fn new(coeffs: &'a MotionCoefficients<F>) -> Self {
        Self { coeffs }
    }

    #[inline]
    pub fn in_flight(&self, t: F) -> bool {
        let window = self.coeffs.window();

        t >= window.t0() && t < window.t1()
    }

    pub fn velocity_at(&self, t: F) -> na::Vector3<F> {
        if self.in_flight(t) {
            self.coeffs.polynomial_velocity(t)
        } else {
            na::Vector3::zeros()
        }
    }

    pub fn acceleration_at(&self, t: F) -> na::Vector3<F> {
        if self.in_flight(t) {
            na::Vector3::new(F::zero(), F::zero(), self.coeffs.accel_z())
        } else {
            na::Vector3::zeros()
        }
    }

    #[inline]
    pub fn speed_at(&self, t: F) -> F {
        self.velocity_at(t).norm()
    }

    pub fn evaluate(&self, times: ArrayView1<'_, F>) -> KinematicsTable<F> {
        let n = times.len();
        let mut velocity = Array2::zeros((n, 3));
        let mut speed = Array1::zeros(n);
        let mut acceleration = Array2::zeros((n, 3));

        for (i, &t) in times.iter().enumerate() {
            let v = self.velocity_at(t);
            let a = self.acceleration_at(t);

            for j in 0..3 {
                velocity[[i, j]] = v[j];
                acceleration[[i, j]] = a[j];
            }

            speed[i] = v.norm();
        }

        KinematicsTable {
            velocity,
            speed,
            acceleration,
        }
    }
}

/// `m v^2 / 2`
#[inline]
pub fn kinetic_energy<F: crate::Float>(speed: F, mass: F) -> F {
    lit::<F>(0.5) * mass * speed * speed
}

/// `m g z`, measured from `z = 0`.
#[inline]
pub fn potential_energy<F: crate::Float>(z: F, mass: F, gravity: F) -> F {
    mass * gravity * z
}

#[inline]
pub fn total_energy<F: crate::Float>(speed: F, z: F, mass: F, gravity: F) -> F {
    kinetic_energy(speed, mass) + potential_energy(z, mass, gravity)
}
