//! Image Lab
//!
//! Loads an image from a local file or an HTTP(S) URL, applies one of a fixed
//! set of filters and saves the result as a JPEG named after the source and
//! the filter.
//!
//! # Architecture
//! - `logic::image_handle`: decoded RGB bitmap plus its source name
//! - `logic::session`: the currently loaded image and the load/apply/clear operations
//! - `logic::listing`: image files of a directory
//! - `logic::shell`: line based interactive front end over a session
//! - `config`: TOML configuration in the platform config directory

#[macro_use]
extern crate derivative;

pub mod config;
pub mod logic;

pub use image_effect::Filter;
pub use logic::{
    image_handle::ImageHandle,
    session::{Filtered, Session, Source},
};

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to process image {source_name}: {error}")]
    Decode {
        source_name: String,
        error: image::ImageError,
    },

    #[error("Could not save image to {}: {error}", path.display())]
    Save {
        path: PathBuf,
        error: image::ImageError,
    },

    #[error(transparent)]
    Fetch(#[from] downloader::DownloadError),

    #[error(transparent)]
    Effect(#[from] image_effect::ImageEffectError),

    #[error("Please enter a URL or a file path")]
    EmptyInput,

    #[error("Load an image first")]
    NoImageLoaded,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initializes the logger.
///
/// Line format: `[HH:MM:SS LEVEL file line] message`. Defaults to `warn`,
/// `RUST_LOG` overrides it.
pub fn init_logger() {
    use std::io::Write;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("reqwest", log::LevelFilter::Warn)
        .filter_module("hyper_util", log::LevelFilter::Warn)
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
