use crate::{Effect, ImageEffectError, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbImage;

/// Gaussian blur, `radius` being the standard deviation in pixels.
///
/// Two separable passes accumulate in `f32` and round once at the end, so flat
/// regions keep their exact colour. Pixels outside the image repeat the edge.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GaussianBlurConfig {
    #[derivative(Default(value = "5.0"))]
    radius: f32,
}

impl GaussianBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalised weights covering three standard deviations on each side.
    fn kernel(&self) -> Vec<f32> {
        let reach = (self.radius * 3.0).ceil() as i32;
        let denom = 2.0 * self.radius * self.radius;

        let weights: Vec<f32> = (-reach..=reach)
            .map(|d| (-((d * d) as f32) / denom).exp())
            .collect();
        let total: f32 = weights.iter().sum();

        weights.into_iter().map(|w| w / total).collect()
    }
}

impl Effect for GaussianBlurConfig {
    fn apply(&self, image: &RgbImage) -> ImageEffectResult<RgbImage> {
        if self.radius.is_nan() || self.radius <= 0.0 {
            return Err(ImageEffectError::InvalidParameter(format!(
                "blur radius must be positive, got {}",
                self.radius
            )));
        }

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Ok(image.clone());
        }

        let kernel = self.kernel();
        let reach = (kernel.len() / 2) as i32;
        let (w, h) = (width as i32, height as i32);

        // Horizontal pass
        let mut rows = vec![[0.0f32; 3]; width as usize * height as usize];
        for y in 0..h {
            for x in 0..w {
                let mut sum = [0.0f32; 3];
                for (i, weight) in kernel.iter().enumerate() {
                    let nx = (x + i as i32 - reach).clamp(0, w - 1);
                    let pixel = image.get_pixel(nx as u32, y as u32);
                    for c in 0..3 {
                        sum[c] += pixel[c] as f32 * weight;
                    }
                }
                rows[(y * w + x) as usize] = sum;
            }
        }

        // Vertical pass
        let mut result = RgbImage::new(width, height);
        for y in 0..h {
            for x in 0..w {
                let mut sum = [0.0f32; 3];
                for (i, weight) in kernel.iter().enumerate() {
                    let ny = (y + i as i32 - reach).clamp(0, h - 1);
                    let value = rows[(ny * w + x) as usize];
                    for c in 0..3 {
                        sum[c] += value[c] * weight;
                    }
                }

                let pixel = result.get_pixel_mut(x as u32, y as u32);
                for c in 0..3 {
                    pixel[c] = sum[c].round().clamp(0.0, 255.0) as u8;
                }
            }
        }

        Ok(result)
    }
}
