use thiserror::Error;

/// Configuration problems detected when a layout is constructed. None of these
/// are recoverable: the caller surfaces them instead of drawing a partial map.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("hostsPerRow must be at least 1 (got {0})")]
    InvalidHostsPerRow(usize),
    #[error("unknown layout mode `{0}` (expected one of: wide)")]
    UnknownLayoutMode(String),
    #[error("unknown zoom mode `{0}` (expected one of: cooperative, greedy)")]
    UnknownZoomMode(String),
    #[error("hexagon radius must be a positive finite number (got {0})")]
    InvalidRadius(f32),
    #[error("{name} must be a non-negative finite number (got {value})")]
    InvalidSpacing { name: &'static str, value: f32 },
    #[error("minScale and maxScale must be finite with 0 < minScale <= maxScale (got {min}..{max})")]
    InvalidScaleRange { min: f32, max: f32 },
    #[error("zoomStep must be a finite number greater than 1 (got {0})")]
    InvalidZoomStep(f32),
    #[error("fitPadding must be a non-negative finite number (got {0})")]
    InvalidFitPadding(f32),
}
