pub mod fetcher;

pub use fetcher::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, FetchedImage, ImageFetcher};

pub type Result<T> = std::result::Result<T, DownloadError>;

#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error("Download failed for {url}: HTTP status {status}")]
    Network { status: u16, url: String },

    #[error("URL does not reference a valid image: {url} (content type: {content_type:?})")]
    Validation { content_type: String, url: String },

    #[error("Download failed for {url}: {error}")]
    Fetch { error: reqwest::Error, url: String },

    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}
