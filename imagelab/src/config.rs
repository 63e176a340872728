use crate::logic::image_handle::DEFAULT_JPEG_QUALITY;
use anyhow::{Context, Result, bail};
use downloader::ImageFetcher;
use log::{debug, warn};
use once_cell::sync::Lazy;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

const APP_NAME: &str = "imagelab";
static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    #[serde(default)]
    pub fetch: Fetch,

    #[serde(default)]
    pub output: Output,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Fetch {
    #[derivative(Default(value = "10"))]
    pub timeout_secs: u64,

    #[derivative(Default(value = "downloader::DEFAULT_USER_AGENT.to_string()"))]
    pub user_agent: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Output {
    /// Empty means the current working directory.
    pub dir: String,

    #[derivative(Default(value = "DEFAULT_JPEG_QUALITY"))]
    pub jpeg_quality: u8,
}

impl Config {
    /// Loads the config file at `path`.
    ///
    /// A missing file is created with defaults. An unparsable file is copied to
    /// `<path>.bak` and replaced by defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("create config dir {} failed", dir.display()))?;
        }

        let mut config = match fs::read_to_string(path) {
            Ok(text) => match toml::from_str::<Config>(&text) {
                Ok(c) => c,
                Err(e) => {
                    warn!("invalid config {}: {e}", path.display());
                    _ = fs::copy(path, format!("{}.bak", path.display()));
                    Config {
                        is_first_run: true,
                        ..Config::default()
                    }
                }
            },
            Err(_) => Config {
                is_first_run: true,
                ..Config::default()
            },
        };

        config.config_path = path.to_path_buf();
        if config.is_first_run {
            config.save()?;
        }

        debug!("{:?}", config);
        Ok(config)
    }

    /// Saves the current configuration to file
    pub fn save(&self) -> Result<()> {
        match toml::to_string_pretty(self) {
            Ok(text) => Ok(fs::write(&self.config_path, text)
                .with_context(|| "save config failed".to_string())?),
            Err(e) => bail!(format!("convert config to toml format failed. {e:?}")),
        }
    }

    pub fn fetcher(&self) -> ImageFetcher {
        ImageFetcher::new()
            .with_timeout(Duration::from_secs(self.fetch.timeout_secs))
            .with_user_agent(self.fetch.user_agent.clone())
    }

    pub fn output_dir(&self) -> Option<PathBuf> {
        let dir = self.output.dir.trim();
        (!dir.is_empty()).then(|| PathBuf::from(dir))
    }
}

/// Default location: `<platform config dir>/imagelab/imagelab.toml`.
pub fn default_path() -> Result<PathBuf> {
    let app_dirs = AppDirs::new(Some(APP_NAME), true).context("no config directory available")?;
    Ok(app_dirs.config_dir.join(format!("{APP_NAME}.toml")))
}

fn lock() -> MutexGuard<'static, Config> {
    CONFIG.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Initializes the global configuration from `path`, or from the default location.
///
/// This should be called once at application startup.
pub fn init(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => default_path()?,
    };

    *lock() = Config::load_from(&path).with_context(|| "load config file failed")?;
    Ok(())
}

/// Returns a clone of the current configuration
pub fn all() -> Config {
    lock().clone()
}

/// Saves a new configuration and updates the global instance
pub fn save(conf: Config) -> Result<()> {
    let mut config = lock();
    *config = conf;
    config.save()
}
