use std::fmt;

// ---------------------------------------------------------------------------
// Error taxonomy of the analysis pipeline
// ---------------------------------------------------------------------------

/// Which detector invocation produced an empty minima set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionPass {
    /// First pass, width seeded from the intensity threshold.
    Coarse,
    /// Second pass, width derived from the central fringe.
    Refined,
}

impl fmt::Display for DetectionPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionPass::Coarse => write!(f, "coarse"),
            DetectionPass::Refined => write!(f, "refined"),
        }
    }
}

/// Every way a single analysis call can fail. All variants are fatal for the
/// call that produced them; nothing is retried internally.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("shape mismatch: {positions} position samples vs {intensities} intensity samples")]
    ShapeMismatch { positions: usize, intensities: usize },

    #[error("non-finite {axis} sample at index {index}")]
    NonFiniteSample { axis: &'static str, index: usize },

    #[error("invalid parameter `{name}` = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("{pass} minimum search found no peaks in width range [{lo:.2}, {hi:.2}]")]
    NoPeaksFound {
        pass: DetectionPass,
        lo: f64,
        hi: f64,
    },

    #[error(
        "central fringe not found: {left} minima left and {right} right of saturation index {saturation}"
    )]
    DetectionError {
        left: usize,
        right: usize,
        saturation: usize,
    },

    #[error("degenerate spacing: {minima} minima, {retained} spacing samples retained")]
    DegenerateSpacing { minima: usize, retained: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
