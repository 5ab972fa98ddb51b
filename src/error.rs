use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no annotated frame carries both x2d and y2d")]
    NoValidAnnotations,

    #[error("flight window has non-positive duration: f0 = {f0}, f1 = {f1}")]
    InvalidWindow { f0: u32, f1: u32 },

    #[error("invalid frame rate: {0}")]
    InvalidFps(f64),

    #[error("expected three values \"x,y,z\", got: {0:?}")]
    InvalidTriplet(String),

    #[error("annotation file has no <track> element")]
    NoTrack,

    #[error("track has no box shapes")]
    NoBoxShapes,

    #[error("attribute {name}={value:?} is not a number")]
    InvalidAttribute { name: String, value: String },

    #[error("Xml Error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
