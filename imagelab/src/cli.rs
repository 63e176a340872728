use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use imagelab::{Filter, Session, config, logic::listing, logic::shell};
use std::{env, path::PathBuf};

#[derive(Parser, Debug)]
#[command(name = "imagelab", version, about = "Apply visual filters to images from files or URLs")]
struct Cli {
    /// Config file (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for filtered images (default: config value, then current directory)
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load an image and save one output per filter
    Apply {
        /// Local path or http(s) URL
        source: String,

        /// Filter names, e.g. `grayscale` or "black and white"
        #[arg(required = true)]
        filters: Vec<Filter>,
    },

    /// Print the available filters
    Filters,

    /// Print image files in a directory
    List {
        /// Directory to list (default: current directory)
        dir: Option<PathBuf>,
    },

    /// Interactive session reading commands from stdin
    Shell,

    /// Show or change the stored configuration
    Config {
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout_secs: Option<u64>,

        #[arg(long)]
        user_agent: Option<String>,

        /// Default output directory, empty for the current directory
        #[arg(long)]
        default_output_dir: Option<String>,

        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
        jpeg_quality: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    imagelab::init_logger();

    let cli = Cli::parse();
    config::init(cli.config)?;

    let mut session = Session::from_config(&config::all());
    if let Some(dir) = cli.output_dir {
        session = session.with_output_dir(dir);
    }

    match cli.command {
        Command::Apply { source, filters } => {
            let handle = session.load(&source).await?;
            println!("Image loaded: {}", handle.source());

            for filter in filters {
                let filtered = session
                    .apply(filter)
                    .with_context(|| format!("apply filter {filter} failed"))?;
                println!("{}", filtered.path.display());
            }
        }
        Command::Filters => {
            for filter in Filter::all() {
                println!("{:<16} {}", filter.name(), filter.suffix());
            }
        }
        Command::List { dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => env::current_dir()?,
            };

            let names = listing::list_images(&dir)
                .with_context(|| format!("list {} failed", dir.display()))?;
            if names.is_empty() {
                println!("No images found.");
            }
            for name in names {
                println!("{name}");
            }
        }
        Command::Shell => {
            println!("{}", shell::HELP);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell::run(&mut session, stdin, &mut std::io::stdout()).await?;
        }
        Command::Config {
            timeout_secs,
            user_agent,
            default_output_dir,
            jpeg_quality,
        } => {
            let mut conf = config::all();
            let changed = timeout_secs.is_some()
                || user_agent.is_some()
                || default_output_dir.is_some()
                || jpeg_quality.is_some();

            if let Some(secs) = timeout_secs {
                conf.fetch.timeout_secs = secs;
            }
            if let Some(agent) = user_agent {
                conf.fetch.user_agent = agent;
            }
            if let Some(dir) = default_output_dir {
                conf.output.dir = dir;
            }
            if let Some(quality) = jpeg_quality {
                conf.output.jpeg_quality = quality;
            }

            if changed {
                config::save(conf.clone())?;
            }

            println!("# {}", conf.config_path.display());
            print!("{}", toml::to_string_pretty(&conf)?);
        }
    }

    Ok(())
}
