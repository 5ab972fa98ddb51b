use crate::model::MotionCoefficients;
use crate::BoundaryPoint;
use ndarray::{Array2, ArrayView1};

/// Piecewise position: start point up to `t0`, polynomial strictly inside
/// the window, end point from `t1` on.
#[derive(Debug, Clone, Copy)]
pub struct PositionEvaluator<'a, F: nalgebra::Scalar> {
    coeffs: &'a MotionCoefficients<F>,
}

impl<'a, F: crate::Float> PositionEvaluator<'a, F> {
    pub fn new(coeffs: &'a MotionCoefficients<F>) -> Self {
        Self { coeffs }
    }

    pub fn position_at(&self, t: F) -> BoundaryPoint<F> {
        let window = self.coeffs.window();

        if t <= window.t0() {
            self.coeffs.start()
        } else if t >= window.t1() {
            self.coeffs.end()
        } else {
            self.coeffs.polynomial_position(t)
        }
    }

    /// Positions for every query time, one `(x, y, z)` row per time.
    pub fn evaluate(&self, times: ArrayView1<'_, F>) -> Array2<F> {
        let mut out = Array2::zeros((times.len(), 3));

        for (mut row, &t) in out.rows_mut().into_iter().zip(times.iter()) {
            let p = self.position_at(t);

            row[0] = p.x;
            row[1] = p.y;
            row[2] = p.z;
        }

        out
    }
}
