//! Error types for session setup and palette synthesis.

use thiserror::Error;

/// Top-level error returned by the starfield crate.
///
/// Configuration and palette failures are fatal to whatever was being set up.
/// A rejected draw target leaves the session untouched.
#[derive(Debug, Error, PartialEq)]
pub enum StarfieldError {
    /// The session parameters or viewport are inconsistent.
    #[error("invalid starfield configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The palette could not be produced.
    #[error("palette allocation failed: {0}")]
    PaletteAllocation(#[from] PaletteError),

    /// The pixel target cannot hold the viewport the session was built for.
    #[error("{width}x{height} target is smaller than the {required_width}x{required_height} viewport")]
    TargetTooSmall {
        width: u32,
        height: u32,
        required_width: u32,
        required_height: u32,
    },
}

/// Invalid session parameters, detected at session creation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The star count must partition evenly into `multiplier` buckets of
    /// `max_dist` stars each.
    #[error(
        "star count {star_count} must equal multiplier {multiplier} x max distance {max_dist} ({expected})"
    )]
    StarCountMismatch {
        star_count: usize,
        multiplier: i32,
        max_dist: i32,
        expected: i64,
    },

    #[error("max distance must be at least 1, got {0}")]
    InvalidMaxDistance(i32),

    #[error("multiplier must be at least 1, got {0}")]
    InvalidMultiplier(i32),

    #[error("phase period must be at least 1 tick")]
    ZeroPhasePeriod,

    /// A step larger than the far depth would skip whole depth bands.
    #[error("star speed must be between 1 and max distance {max_dist}, got {speed}")]
    InvalidSpeed { speed: i32, max_dist: i32 },

    /// The generator rotation list was empty.
    #[error("generator rotation is empty")]
    EmptyRotation,

    /// The buffer cannot hold a single star glow.
    #[error("viewport {width}x{height} is too small for a glow radius of {radius}")]
    ViewportTooSmall { width: u32, height: u32, radius: u32 },
}

/// Reasons a palette cannot be synthesized.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PaletteError {
    #[error("palette needs at least one hue shade")]
    NoShades,

    #[error("palette needs at least one luminance variant")]
    NoLuminances,

    #[error("luminance {0} is outside [0, 1]")]
    InvalidLuminance(f32),

    /// The black region plus the hue swatches do not fit in the table.
    #[error("palette needs {required} entries but only {capacity} are available")]
    TooManyEntries { required: usize, capacity: usize },

    /// A reserved UI colour would overwrite the black region or a swatch.
    #[error("reserved colour index {index} overlaps the starfield swatches (first free index is {first_free})")]
    ReservedOverlap { index: usize, first_free: usize },

    #[error("reserved colour index {0} is outside the palette")]
    ReservedOutOfRange(usize),
}
