use crate::{
    Effect, ImageEffectError, ImageEffectResult,
    monochrome::{binarize, luma},
};
use derivative::Derivative;
use derive_setters::Setters;
use image::{GrayImage, Rgb, RgbImage, imageops};

/// A 3x3 convolution kernel: `out = sum(w * p) / scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel3x3 {
    pub weights: [f32; 9],
    pub scale: f32,
    pub offset: f32,
}

pub const FIND_EDGES: Kernel3x3 = Kernel3x3 {
    weights: [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
    scale: 1.0,
    offset: 0.0,
};

pub const CONTOUR: Kernel3x3 = Kernel3x3 {
    weights: [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
    scale: 1.0,
    offset: 255.0,
};

pub const SMOOTH: Kernel3x3 = Kernel3x3 {
    weights: [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0],
    scale: 13.0,
    offset: 0.0,
};

/// Convolve every colour channel with `kernel`.
///
/// The outermost ring of pixels is copied from the input unchanged. Images
/// narrower or shorter than 3 pixels are returned as they are.
pub fn convolve(image: &RgbImage, kernel: &Kernel3x3) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut result = image.clone();
    if width < 3 || height < 3 {
        return result;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sum = [0.0f32; 3];

            for ky in -1i32..=1 {
                for kx in -1i32..=1 {
                    let pixel = image.get_pixel((x as i32 + kx) as u32, (y as i32 + ky) as u32);
                    let weight = kernel.weights[((ky + 1) * 3 + (kx + 1)) as usize];

                    for i in 0..3 {
                        sum[i] += pixel[i] as f32 * weight;
                    }
                }
            }

            let pixel = result.get_pixel_mut(x, y);
            for i in 0..3 {
                pixel[i] = (sum[i] / kernel.scale + kernel.offset)
                    .round()
                    .clamp(0.0, 255.0) as u8;
            }
        }
    }

    result
}

/// Keep only the `bits` most significant bits of every channel.
pub fn posterize(image: &RgbImage, bits: u8) -> ImageEffectResult<RgbImage> {
    if !(1..=8).contains(&bits) {
        return Err(ImageEffectError::InvalidParameter(format!(
            "posterize bits must be within 1..=8, got {bits}"
        )));
    }

    let mask = (0xff00u16 >> bits) as u8;
    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        pixel[0] &= mask;
        pixel[1] &= mask;
        pixel[2] &= mask;
    }

    Ok(result)
}

/// Stretch values away from the image mean by `factor`.
pub fn contrast(gray: &GrayImage, factor: f32) -> GrayImage {
    let count = gray.width() as usize * gray.height() as usize;
    if count == 0 {
        return gray.clone();
    }

    let sum: u64 = gray.pixels().map(|p| p[0] as u64).sum();
    let mean = (sum as f64 / count as f64 + 0.5) as i32 as f32;

    let mut result = gray.clone();
    for pixel in result.pixels_mut() {
        pixel[0] = (mean + factor * (pixel[0] as f32 - mean)).clamp(0.0, 255.0) as u8;
    }

    result
}

/// Contour: dark outlines on a white background.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct ContourConfig;

impl ContourConfig {
    pub fn new() -> Self {
        Self
    }
}

impl Effect for ContourConfig {
    fn apply(&self, image: &RgbImage) -> ImageEffectResult<RgbImage> {
        Ok(convolve(image, &CONTOUR))
    }
}

/// Posterize: fewer levels per channel.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct PosterizeConfig {
    #[derivative(Default(value = "2"))]
    bits: u8,
}

impl PosterizeConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for PosterizeConfig {
    fn apply(&self, image: &RgbImage) -> ImageEffectResult<RgbImage> {
        posterize(image, self.bits)
    }
}

/// Cartoon: posterized and smoothed colours with black outlines.
///
/// With `overlay_edges` disabled only the smoothed posterized image is returned.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct CartoonConfig {
    #[derivative(Default(value = "2"))]
    bits: u8,

    #[derivative(Default(value = "8.0"))]
    edge_contrast: f32,

    #[derivative(Default(value = "128"))]
    edge_threshold: u8,

    #[derivative(Default(value = "true"))]
    overlay_edges: bool,
}

impl CartoonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binary outline mask: 0 on edges, 255 elsewhere.
    pub fn edge_mask(&self, image: &RgbImage) -> GrayImage {
        let mut edges = luma(&convolve(image, &FIND_EDGES));
        imageops::invert(&mut edges);

        let mut edges = contrast(&edges, self.edge_contrast);
        binarize(&mut edges, self.edge_threshold);
        edges
    }
}

impl Effect for CartoonConfig {
    fn apply(&self, image: &RgbImage) -> ImageEffectResult<RgbImage> {
        let posterized = PosterizeConfig::new().with_bits(self.bits).apply(image)?;
        let mut result = convolve(&posterized, &SMOOTH);

        if self.overlay_edges {
            let (width, height) = image.dimensions();
            let mask = self.edge_mask(image);

            // The outer ring of the mask is copied source, not an edge response.
            for (x, y, pixel) in result.enumerate_pixels_mut() {
                let interior = x > 0 && y > 0 && x + 1 < width && y + 1 < height;
                if interior && mask.get_pixel(x, y)[0] == 0 {
                    *pixel = Rgb([0, 0, 0]);
                }
            }
        }

        Ok(result)
    }
}
