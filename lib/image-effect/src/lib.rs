pub mod blur;
pub mod channel;
pub mod monochrome;
pub mod stylized;

use image::RgbImage;
use std::{fmt, str::FromStr};

pub type ImageEffectResult<T> = Result<T, ImageEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageEffectError {
    #[error("Photon error: {0}")]
    Photon(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),
}

/// A pure transform from one RGB bitmap to a new one. The input is never modified.
pub trait Effect {
    fn apply(&self, image: &RgbImage) -> ImageEffectResult<RgbImage>;
}

/// The fixed set of filters offered to the user, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Grayscale,
    BlackAndWhite,
    Cartoon,
    Negative,
    Contour,
    Blurred,
}

impl Filter {
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Grayscale => "Grayscale",
            Filter::BlackAndWhite => "Black and White",
            Filter::Cartoon => "Cartoon",
            Filter::Negative => "Negative",
            Filter::Contour => "Contour",
            Filter::Blurred => "Blurred",
        }
    }

    /// Suffix used in output file names: the lowercased name with spaces as `_`.
    pub fn suffix(&self) -> String {
        self.name().to_lowercase().replace(' ', "_")
    }

    pub fn all() -> &'static [Filter] {
        &[
            Filter::Grayscale,
            Filter::BlackAndWhite,
            Filter::Cartoon,
            Filter::Negative,
            Filter::Contour,
            Filter::Blurred,
        ]
    }
}

impl Effect for Filter {
    fn apply(&self, image: &RgbImage) -> ImageEffectResult<RgbImage> {
        match self {
            Filter::Grayscale => monochrome::GrayscaleConfig::new().apply(image),
            Filter::BlackAndWhite => monochrome::ThresholdConfig::new().apply(image),
            Filter::Cartoon => stylized::CartoonConfig::new().apply(image),
            Filter::Negative => channel::Invert.apply(image),
            Filter::Contour => stylized::ContourConfig::new().apply(image),
            Filter::Blurred => blur::GaussianBlurConfig::new().apply(image),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Filter {
    type Err = ImageEffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();

        Filter::all()
            .iter()
            .find(|f| f.name().to_lowercase() == wanted || f.suffix() == wanted)
            .copied()
            .ok_or_else(|| ImageEffectError::UnknownFilter(s.to_string()))
    }
}
