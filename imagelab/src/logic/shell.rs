//! Line based front end over a [`Session`].

use crate::{Filter, Result, Session, logic::listing};
use std::{io::Write, str::FromStr};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "\
Commands:
  load <path|url>   load an image from a file or URL
  filter <name>     apply a filter and save the result
  clear             unload the current image
  list              list image files in the output directory
  filters           list available filters
  help              show this help
  quit              leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(String),
    Filter(Filter),
    Clear,
    List,
    Filters,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match name.to_lowercase().as_str() {
            "load" if !rest.is_empty() => Ok(Command::Load(rest.to_string())),
            "load" => Err("usage: load <path|url>".to_string()),
            "filter" => rest.parse().map(Command::Filter).map_err(|e| format!("{e}")),
            "clear" => Ok(Command::Clear),
            "list" | "ls" => Ok(Command::List),
            "filters" => Ok(Command::Filters),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(format!("unknown command: {name} (try `help`)")),
        }
    }
}

/// Runs commands read from `input` until `quit` or end of input.
///
/// Failed commands are reported on `out` and do not stop the loop.
pub async fn run<R, W>(session: &mut Session, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }

        if let Err(e) = execute(session, command, out).await {
            writeln!(out, "Error: {e}")?;
        }
    }

    Ok(())
}

async fn execute<W: Write>(session: &mut Session, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Load(input) => {
            let handle = session.load(&input).await?;
            let (width, height) = handle.dimensions();
            writeln!(out, "Image loaded: {} ({width}x{height})", handle.source())?;
        }
        Command::Filter(filter) => {
            let filtered = session.apply(filter)?;
            writeln!(out, "Success! Saved to: {}", filtered.path.display())?;
        }
        Command::Clear => {
            session.clear();
            writeln!(out, "No image loaded")?;
        }
        Command::List => {
            let dir = session.output_dir()?;
            let names = listing::list_images(&dir)?;

            writeln!(out, "Directory: {}", dir.display())?;
            if names.is_empty() {
                writeln!(out, "No images found.")?;
            }
            for name in names {
                writeln!(out, "{name}")?;
            }
        }
        Command::Filters => {
            for filter in Filter::all() {
                writeln!(out, "{:<16} {}", filter.name(), filter.suffix())?;
            }
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "load  \"my photo.jpg\" ".parse::<Command>(),
            Ok(Command::Load("\"my photo.jpg\"".to_string()))
        );
        assert_eq!(
            "filter black and white".parse::<Command>(),
            Ok(Command::Filter(Filter::BlackAndWhite))
        );
        assert_eq!("FILTER blurred".parse::<Command>(), Ok(Command::Filter(Filter::Blurred)));
        assert_eq!("clear".parse::<Command>(), Ok(Command::Clear));
        assert_eq!("ls".parse::<Command>(), Ok(Command::List));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!("load".parse::<Command>().is_err());
        assert!("filter sepia".parse::<Command>().is_err());
        assert!("paint".parse::<Command>().is_err());
    }

    #[tokio::test]
    async fn test_filter_before_load() {
        let mut session = Session::new();
        let mut out = Vec::new();

        run(&mut session, &b"filter negative\nfilters\nquit\nclear\n"[..], &mut out)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Error: Load an image first\n"));
        assert!(out.contains("Black and White  black_and_white"));
        assert!(!out.contains("No image loaded"));
    }
}
