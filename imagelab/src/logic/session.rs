use crate::{
    Error, Result,
    config::Config,
    logic::image_handle::{DEFAULT_JPEG_QUALITY, DOWNLOADED_NAME, ImageHandle},
};
use derive_setters::Setters;
use downloader::ImageFetcher;
use image::RgbImage;
use image_effect::{Effect, Filter};
use log::info;
use std::{env, path::PathBuf};

/// Where an image is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    /// `http://` and `https://` inputs are URLs. Anything else is a path with all
    /// quote characters removed.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::EmptyInput);
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            return Ok(Source::Url(input.to_string()));
        }

        let path = input.replace(['"', '\''], "");
        if path.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        Ok(Source::Path(PathBuf::from(path)))
    }
}

/// Result of applying a filter: the new bitmap and the file it was saved to.
#[derive(Debug, Clone)]
pub struct Filtered {
    pub filter: Filter,
    pub image: RgbImage,
    pub path: PathBuf,
}

/// The currently loaded image plus the settings used to fetch and save.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
pub struct Session {
    #[setters(skip)]
    current: Option<ImageHandle>,

    fetcher: ImageFetcher,

    #[setters(strip_option)]
    output_dir: Option<PathBuf>,

    #[derivative(Default(value = "DEFAULT_JPEG_QUALITY"))]
    jpeg_quality: u8,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        let session = Self::new()
            .with_fetcher(config.fetcher())
            .with_jpeg_quality(config.output.jpeg_quality);

        match config.output_dir() {
            Some(dir) => session.with_output_dir(dir),
            None => session,
        }
    }

    pub fn current(&self) -> Option<&ImageHandle> {
        self.current.as_ref()
    }

    /// Directory filtered images are written to.
    pub fn output_dir(&self) -> Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(env::current_dir()?),
        }
    }

    /// Loads a new image from a path or URL. On failure the previous image stays loaded.
    pub async fn load(&mut self, input: &str) -> Result<&ImageHandle> {
        let handle = match Source::parse(input)? {
            Source::Url(url) => {
                let fetched = self.fetcher.fetch(&url).await?;
                ImageHandle::from_bytes(&fetched.bytes, DOWNLOADED_NAME)?
            }
            Source::Path(path) => ImageHandle::open(&path)?,
        };

        let handle: &ImageHandle = self.current.insert(handle);
        Ok(handle)
    }

    /// Applies `filter` to the loaded image and saves the result.
    pub fn apply(&self, filter: Filter) -> Result<Filtered> {
        let handle = self.current.as_ref().ok_or(Error::NoImageLoaded)?;

        info!("applying {filter} to {}", handle.source());
        let image = filter.apply(handle.bitmap())?;
        let path = handle.save_to(
            self.output_dir()?,
            &image,
            &filter.suffix(),
            self.jpeg_quality,
        )?;

        Ok(Filtered {
            filter,
            image,
            path,
        })
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            Source::parse("  https://example.com/a.png ").unwrap(),
            Source::Url("https://example.com/a.png".to_string())
        );
        assert_eq!(
            Source::parse("http://example.com/a.png").unwrap(),
            Source::Url("http://example.com/a.png".to_string())
        );
        assert_eq!(
            Source::parse("\"photo.jpg\"").unwrap(),
            Source::Path(PathBuf::from("photo.jpg"))
        );
        assert_eq!(
            Source::parse("'my photo.jpg'").unwrap(),
            Source::Path(PathBuf::from("my photo.jpg"))
        );
        assert_eq!(
            Source::parse("ftp://example.com/a.png").unwrap(),
            Source::Path(PathBuf::from("ftp://example.com/a.png"))
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Source::parse(""), Err(Error::EmptyInput)));
        assert!(matches!(Source::parse("   "), Err(Error::EmptyInput)));
        assert!(matches!(Source::parse("\"\""), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_apply_without_image() {
        let session = Session::new();
        assert!(session.current().is_none());
        assert!(matches!(session.apply(Filter::Negative), Err(Error::NoImageLoaded)));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.output.dir = "/tmp/imagelab-out".to_string();
        config.output.jpeg_quality = 90;

        let session = Session::from_config(&config);
        assert_eq!(session.output_dir().unwrap(), PathBuf::from("/tmp/imagelab-out"));
        assert_eq!(session.jpeg_quality, 90);
    }
}
