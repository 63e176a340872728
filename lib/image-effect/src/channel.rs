use crate::{Effect, ImageEffectError, ImageEffectResult};
use image::{DynamicImage, RgbImage, RgbaImage};
use photon_rs::{PhotonImage, channels};

/// Negative: every colour channel becomes `255 - value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Invert;

impl Effect for Invert {
    fn apply(&self, image: &RgbImage) -> ImageEffectResult<RgbImage> {
        let (width, height) = image.dimensions();
        let rgba = DynamicImage::ImageRgb8(image.clone()).into_rgba8();

        let mut photon_img = PhotonImage::new(rgba.into_raw(), width, height);
        channels::invert(&mut photon_img);

        let rgba = RgbaImage::from_raw(width, height, photon_img.get_raw_pixels())
            .ok_or_else(|| ImageEffectError::Photon("inverted buffer size mismatch".to_string()))?;

        Ok(DynamicImage::ImageRgba8(rgba).into_rgb8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_invert_values() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(0, 0, Rgb([0, 100, 255]));
        image.put_pixel(1, 0, Rgb([1, 128, 254]));

        let output = Invert.apply(&image).unwrap();
        assert_eq!(output.get_pixel(0, 0), &Rgb([255, 155, 0]));
        assert_eq!(output.get_pixel(1, 0), &Rgb([254, 127, 1]));
    }

    #[test]
    fn test_invert_twice_is_identity() {
        let image = RgbImage::from_fn(31, 17, |x, y| {
            Rgb([(x * 8) as u8, (y * 15) as u8, (x * y % 256) as u8])
        });

        let twice = Invert.apply(&Invert.apply(&image).unwrap()).unwrap();
        assert_eq!(twice, image);
    }
}
