use thiserror::Error;

/// Errors raised by the simulation core. Both are configuration or
/// geometry problems: the operation that detects one aborts without
/// writing partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("invalid grid dimensions {rows}x{cols} (rows must be 1..=1080, cols 1..=1920)")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error(
        "grid {rows}x{cols} does not match {width}x{height} target at scale {scale} \
         (target holds {expected_rows}x{expected_cols} cells)"
    )]
    GridTargetMismatch {
        rows: usize,
        cols: usize,
        width: usize,
        height: usize,
        scale: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
}
