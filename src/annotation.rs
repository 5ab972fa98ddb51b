use crate::error::{Error, Result};
use crate::math::lit;
use serde::de::DeserializeOwned;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

/// One labelled frame: image-space centre of the ball, if it was visible.
///
/// `y2d` grows downward, as in any image.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Annotation<F> {
    pub frame: u32,
    pub x2d: Option<F>,
    pub y2d: Option<F>,
}

impl<F: crate::Float> Annotation<F> {
    #[inline]
    pub fn new(frame: u32, x2d: F, y2d: F) -> Self {
        Self {
            frame,
            x2d: Some(x2d),
            y2d: Some(y2d),
        }
    }

    /// Frame without a usable position.
    #[inline]
    pub fn missing(frame: u32) -> Self {
        Self {
            frame,
            x2d: None,
            y2d: None,
        }
    }

    /// Centre of a left-top / right-bottom box.
    pub fn from_box(frame: u32, xtl: F, ytl: F, xbr: F, ybr: F) -> Self {
        let half = lit::<F>(0.5);

        Self::new(frame, half * (xtl + xbr), half * (ytl + ybr))
    }

    #[inline]
    pub fn point(&self) -> Option<(F, F)> {
        match (self.x2d, self.y2d) {
            (Some(x), Some(y)) if !num_traits::Float::is_nan(x) && !num_traits::Float::is_nan(y) => {
                Some((x, y))
            }
            _ => None,
        }
    }
}

/// Annotations carrying both coordinates, as `(frame, x2d, y2d)` sorted by frame.
pub fn valid_points<F: crate::Float>(annotations: &[Annotation<F>]) -> Vec<(u32, F, F)> {
    let mut points: Vec<_> = annotations
        .iter()
        .filter_map(|a| a.point().map(|(x, y)| (a.frame, x, y)))
        .collect();

    points.sort_by_key(|p| p.0);
    points
}

/// Frame count reaching one past the last annotated frame, saturating at `u32::MAX`.
pub fn frames_to_cover<F>(annotations: &[Annotation<F>]) -> u32 {
    annotations
        .iter()
        .map(|a| a.frame.saturating_add(1))
        .max()
        .unwrap_or(0)
}

pub fn load_annotations_json<F, P>(path: P) -> Result<Vec<Annotation<F>>>
where
    F: crate::Float + DeserializeOwned,
    P: AsRef<Path>,
{
    let data = std::fs::read_to_string(path)?;
    let mut annotations: Vec<Annotation<F>> = serde_json::from_str(&data)?;
    annotations.sort_by_key(|a| a.frame);

    Ok(annotations)
}

/// Reads a CVAT `annotations.xml` export.
pub fn load_cvat_xml<F, P>(path: P) -> Result<Vec<Annotation<F>>>
where
    F: crate::Float,
    P: AsRef<Path>,
{
    let text = std::fs::read_to_string(path)?;

    parse_cvat_xml(&text)
}

/// Box centres of the first `<track>`, sorted by frame.
///
/// Shapes without a `frame` attribute are skipped, missing corners count as 0.
pub fn parse_cvat_xml<F: crate::Float>(text: &str) -> Result<Vec<Annotation<F>>> {
    let doc = roxmltree::Document::parse(text)?;
    let track = doc
        .descendants()
        .find(|n| n.has_tag_name("track"))
        .ok_or(Error::NoTrack)?;

    let mut annotations = Vec::new();
    for shape in track.children().filter(|n| n.is_element()) {
        if !shape.tag_name().name().to_lowercase().ends_with("box") {
            continue;
        }

        let frame = match shape.attribute("frame") {
            Some(v) if !v.is_empty() => {
                v.trim()
                    .parse::<u32>()
                    .map_err(|_| Error::InvalidAttribute {
                        name: "frame".into(),
                        value: v.into(),
                    })?
            }
            _ => continue,
        };

        let corner = |name: &str| -> Result<F> {
            match shape.attribute(name) {
                Some(v) => v
                    .trim()
                    .parse::<f64>()
                    .map(lit::<F>)
                    .map_err(|_| Error::InvalidAttribute {
                        name: name.into(),
                        value: v.into(),
                    }),
                None => Ok(F::zero()),
            }
        };

        annotations.push(Annotation::from_box(
            frame,
            corner("xtl")?,
            corner("ytl")?,
            corner("xbr")?,
            corner("ybr")?,
        ));
    }

    if annotations.is_empty() {
        return Err(Error::NoBoxShapes);
    }

    annotations.sort_by_key(|a| a.frame);
    tracing::debug!("read {} box shapes from CVAT track", annotations.len());

    Ok(annotations)
}
