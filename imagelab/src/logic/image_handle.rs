use crate::{Error, Result};
use image::{
    DynamicImage, ImageError, ImageReader, ImageResult, RgbImage, codecs::jpeg::JpegEncoder,
};
use log::{debug, info};
use std::{
    env,
    ffi::OsStr,
    fs,
    io::{BufWriter, Write},
    path::{self, Path, PathBuf},
};

/// Source name given to images that were downloaded rather than opened.
pub const DOWNLOADED_NAME: &str = "image_downloaded.jpg";

/// Base name used when the source name has no usable file stem.
pub const FALLBACK_BASE_NAME: &str = "image";

pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// A decoded bitmap, always 8-bit RGB, and the name it came from.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    source: String,
    image: RgbImage,
}

impl ImageHandle {
    /// Opens and decodes a local image file. The format is guessed from the content.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = path.to_string_lossy().to_string();

        let decoded = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(ImageError::IoError)
            .and_then(|reader| reader.decode())
            .map_err(|error| Error::Decode {
                source_name: source.clone(),
                error,
            })?;

        Ok(Self::from_decoded(source, decoded))
    }

    /// Decodes an in-memory image, e.g. downloaded content.
    pub fn from_bytes(bytes: &[u8], name: impl Into<String>) -> Result<Self> {
        let source = name.into();
        let decoded = image::load_from_memory(bytes).map_err(|error| Error::Decode {
            source_name: source.clone(),
            error,
        })?;

        Ok(Self::from_decoded(source, decoded))
    }

    fn from_decoded(source: String, decoded: DynamicImage) -> Self {
        let image = match decoded {
            DynamicImage::ImageRgb8(image) => image,
            other => {
                debug!("converting {source} from {:?} to RGB8", other.color());
                other.into_rgb8()
            }
        };

        info!("loaded {source} ({}x{})", image.width(), image.height());
        Self { source, image }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// An independent copy of the bitmap.
    pub fn image(&self) -> RgbImage {
        self.image.clone()
    }

    pub fn bitmap(&self) -> &RgbImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// File name of the source without directory and extension.
    pub fn base_name(&self) -> String {
        if self.source.ends_with(['/', '\\']) {
            return FALLBACK_BASE_NAME.to_string();
        }

        Path::new(&self.source)
            .file_stem()
            .and_then(OsStr::to_str)
            .filter(|stem| !stem.is_empty())
            .unwrap_or(FALLBACK_BASE_NAME)
            .to_string()
    }

    /// `{base}_{suffix}.jpg`
    pub fn output_file_name(&self, suffix: &str) -> String {
        format!("{}_{suffix}.jpg", self.base_name())
    }

    /// Saves `image` as JPEG into the current working directory.
    pub fn save(&self, image: &RgbImage, suffix: &str) -> Result<PathBuf> {
        self.save_to(env::current_dir()?, image, suffix, DEFAULT_JPEG_QUALITY)
    }

    /// Saves `image` as JPEG into `dir` and returns the absolute path written.
    ///
    /// An existing file with the same name is replaced. On failure nothing is left behind.
    pub fn save_to(
        &self,
        dir: impl AsRef<Path>,
        image: &RgbImage,
        suffix: &str,
        quality: u8,
    ) -> Result<PathBuf> {
        let file_name = self.output_file_name(suffix);
        let path = path::absolute(dir.as_ref().join(&file_name))?;
        let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

        let saved = write_jpeg(&tmp_path, image, quality)
            .and_then(|_| fs::rename(&tmp_path, &path).map_err(ImageError::IoError));

        if let Err(error) = saved {
            _ = fs::remove_file(&tmp_path);
            return Err(Error::Save { path, error });
        }

        info!("saved {}", path.display());
        Ok(path)
    }
}

fn write_jpeg(path: &Path, image: &RgbImage, quality: u8) -> ImageResult<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    image.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))?;
    writer.flush()?;
    Ok(())
}
