use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use attrlift::{ContextAction, Dialect, MoveTextToAttribute, Outcome, ParserConfig, Session};
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "attrlift",
    version,
    about = "Move an element's text into an attribute at a caret position"
)]
struct Args {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Caret as a byte offset
    #[arg(long, value_name = "BYTES", conflicts_with = "at")]
    offset: Option<usize>,
    /// Caret as 1-based LINE:COL, column counted in characters
    #[arg(long, value_name = "LINE:COL", value_parser = parse_line_col)]
    at: Option<(usize, usize)>,
    /// Markup dialect (inferred from the input extension, else xml)
    #[arg(short, long, value_enum)]
    dialect: Option<DialectArg>,
    /// Only report whether the action applies; exit status 1 when it does not
    #[arg(long)]
    check: bool,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT", conflicts_with = "in_place")]
    output: Option<PathBuf>,
    /// Rewrite INPUT in place
    #[arg(long, requires = "input")]
    in_place: bool,
    /// Print the supported tags and their attributes
    #[arg(long, exclusive = true)]
    list_tags: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DialectArg {
    #[value(alias = "xaml")]
    Xml,
    Html,
}

impl From<DialectArg> for Dialect {
    fn from(value: DialectArg) -> Self {
        match value {
            DialectArg::Xml => Dialect::Xml,
            DialectArg::Html => Dialect::Html,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let action = MoveTextToAttribute::new();

    if args.list_tags {
        let mut out = String::new();
        for (tag, attribute) in action.tags().iter() {
            out.push_str(&format!("{tag} -> {attribute}\n"));
        }
        write_output(None, out.as_bytes())?;
        return Ok(ExitCode::SUCCESS);
    }

    let source = read_input(args.input.as_deref())?;
    let dialect = args
        .dialect
        .map(Dialect::from)
        .or_else(|| infer_dialect(args.input.as_deref()))
        .unwrap_or_default();

    let mut session = Session::with_options(source, dialect, ParserConfig::default())
        .context("failed to parse input")?;
    if let Some(path) = &args.input {
        session = session.with_path(path);
    }

    match (args.offset, args.at) {
        (Some(offset), _) => session.set_caret(offset)?,
        (None, Some((line, col))) => session.set_caret_at(line, col)?,
        (None, None) => bail!("no caret given; pass --offset or --at"),
    }

    if args.check {
        let Some(target) = action.resolve(&session) else {
            write_output(None, b"not available\n")?;
            return Ok(ExitCode::FAILURE);
        };
        let report = format!(
            "available: {} -> {} at {}\n",
            target.tag, target.attribute, target.element
        );
        write_output(None, report.as_bytes())?;
        return Ok(ExitCode::SUCCESS);
    }

    match action.execute(&mut session)? {
        Outcome::Applied(target) => {
            info!(tag = %target.tag, attribute = target.attribute, "applied");
        }
        Outcome::NotApplicable => {
            warn!("{} is not applicable at the caret", action.name());
            if args.in_place {
                return Ok(ExitCode::SUCCESS);
            }
        }
    }

    let target = if args.in_place {
        args.input.as_deref()
    } else {
        args.output.as_deref()
    };
    write_output(target, session.into_source().as_bytes())?;
    Ok(ExitCode::SUCCESS)
}

fn parse_line_col(value: &str) -> Result<(usize, usize), String> {
    let (line, col) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got {value:?}"))?;
    let line = line
        .parse()
        .map_err(|_| format!("invalid line number {line:?}"))?;
    let col = col
        .parse()
        .map_err(|_| format!("invalid column number {col:?}"))?;
    Ok((line, col))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}

fn infer_dialect(path: Option<&Path>) -> Option<Dialect> {
    let ext = path?.extension().and_then(|s| s.to_str())?;
    Dialect::from_extension(ext)
}
