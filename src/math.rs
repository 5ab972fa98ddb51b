use crate::error::{Error, Result};
use crate::BoundaryPoint;
use nalgebra as na;
use num_traits::Float;

/// Converts an `f64` constant into the working scalar.
#[inline]
pub fn lit<F: Float>(v: f64) -> F {
    F::from(v).unwrap_or_else(F::nan)
}

/// Time of a frame index at the given rate.
#[inline]
pub fn frame_time<F: Float>(frame: u32, fps: F) -> F {
    lit::<F>(frame as f64) / fps
}

#[inline]
pub fn linear<F: Float>(m: F, q: F, t: F) -> F {
    m * t + q
}

#[inline]
pub fn quadratic<F: Float>(a: F, b: F, c: F, t: F) -> F {
    a * t * t + b * t + c
}

/// Symmetric difference quotient of `fx` at `t` with step `h`.
#[inline]
pub fn central_difference<F: Float, FN: Fn(F) -> F>(fx: FN, t: F, h: F) -> F {
    (fx(t + h) - fx(t - h)) / (h + h)
}

/// Parses "x,y,z" (also space or semicolon separated) into a point.
pub fn parse_triplet<F: crate::Float>(txt: &str) -> Result<BoundaryPoint<F>> {
    let parts: Vec<&str> = txt
        .trim()
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    if parts.len() != 3 {
        return Err(Error::InvalidTriplet(txt.to_string()));
    }

    let mut xyz = [F::zero(); 3];
    for (dst, part) in xyz.iter_mut().zip(parts) {
        let v: f64 = part
            .parse()
            .map_err(|_| Error::InvalidTriplet(txt.to_string()))?;

        *dst = lit(v);
    }

    Ok(na::Point3::new(xyz[0], xyz[1], xyz[2]))
}
