use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The 4-point correspondence cannot form a valid homography.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Contract violation caught at configure time, before any frame is
    /// processed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
