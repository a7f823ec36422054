use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecolorError {
    #[error("invalid gradient color {0:?} (expected 6 hex digits, optionally prefixed with '#')")]
    InvalidColor(String),

    #[error("unknown quantization algorithm {0:?}")]
    UnknownAlgorithm(String),

    #[error("quantization algorithm {0:?} is not implemented")]
    UnsupportedAlgorithm(&'static str),

    #[error("max_colors must be between 2 and 256, got {0}")]
    InvalidMaxColors(u32),

    #[error("worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    #[error("loop count must be at least 1, got {0}")]
    InvalidLoopCount(usize),

    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("a worker thread panicked during the overlay pass")]
    WorkerPanic,
}
