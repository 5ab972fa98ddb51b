//! Launch / landing heuristics over the image-space vertical signal.
//!
//! Image `y` grows downward, so a ball going up shows a negative jump in `y2d`.
//! No smoothing is applied: one noisy label can move the result by a frame.

/// First frame whose `y2d` dropped by more than `threshold` (a negative number)
/// since the previous annotated frame.
///
/// Falls back to the first annotated frame. `None` only for an empty input.
pub fn detect_launch_frame<F: crate::Float>(points: &[(u32, F)], threshold: F) -> Option<u32> {
    let first = points.first()?.0;

    let frame = points
        .windows(2)
        .find(|w| w[1].1 - w[0].1 < threshold)
        .map(|w| w[1].0);

    if frame.is_none() {
        tracing::warn!("no launch jump below {}, using first frame {}", threshold, first);
    }

    Some(frame.unwrap_or(first))
}

/// Last frame whose `y2d` grew by more than `threshold` since the previous
/// annotated frame. Falls back to the last annotated frame.
pub fn detect_landing_frame<F: crate::Float>(points: &[(u32, F)], threshold: F) -> Option<u32> {
    let last = points.last()?.0;

    let frame = points
        .windows(2)
        .rev()
        .find(|w| w[1].1 - w[0].1 > threshold)
        .map(|w| w[1].0);

    if frame.is_none() {
        tracing::debug!("no landing jump above {}, using last frame {}", threshold, last);
    }

    Some(frame.unwrap_or(last))
}

/// Frame where the ball is highest in the image (smallest `y2d`), first one on ties.
pub fn find_peak_height_frame<F: crate::Float>(points: &[(u32, F)]) -> Option<u32> {
    let mut iter = points.iter();
    let mut best = *iter.next()?;

    for &(frame, y) in iter {
        if y < best.1 {
            best = (frame, y);
        }
    }

    Some(best.0)
}

/// Seconds between detected launch and landing.
pub fn estimated_flight_duration<F: crate::Float>(
    points: &[(u32, F)],
    fps: F,
    launch_threshold: F,
    landing_threshold: F,
) -> Option<F> {
    let launch = detect_launch_frame(points, launch_threshold)?;
    let landing = detect_landing_frame(points, landing_threshold)?;

    let frames = crate::math::lit::<F>(landing as f64 - launch as f64);

    Some(frames / fps)
}
