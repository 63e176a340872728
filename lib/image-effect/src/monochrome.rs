use crate::{Effect, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

/// ITU-R 601-2 luma in 16.16 fixed point: `L = R*299/1000 + G*587/1000 + B*114/1000`.
#[inline]
pub fn luminance(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

/// Single channel luminance image.
pub fn luma(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([luminance(image.get_pixel(x, y))])
    })
}

/// Expand a single channel image back to three equal channels.
pub fn expand(gray: GrayImage) -> RgbImage {
    DynamicImage::ImageLuma8(gray).to_rgb8()
}

/// Binarize: values below `threshold` become 0, the rest 255.
pub fn binarize(gray: &mut GrayImage, threshold: u8) {
    for pixel in gray.pixels_mut() {
        pixel[0] = if pixel[0] < threshold { 0 } else { 255 };
    }
}

#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct GrayscaleConfig;

impl GrayscaleConfig {
    pub fn new() -> Self {
        Self
    }
}

impl Effect for GrayscaleConfig {
    fn apply(&self, image: &RgbImage) -> ImageEffectResult<RgbImage> {
        Ok(expand(luma(image)))
    }
}

/// Black and white: luminance cut at `threshold`.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ThresholdConfig {
    #[derivative(Default(value = "128"))]
    threshold: u8,
}

impl ThresholdConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for ThresholdConfig {
    fn apply(&self, image: &RgbImage) -> ImageEffectResult<RgbImage> {
        let mut gray = luma(image);
        binarize(&mut gray, self.threshold);
        Ok(expand(gray))
    }
}
