// src/main.rs
//
// deminify-html: re-indent minified HTML
//
// - One file: `deminify-html <input> [output]`. Without an output the result is
//   written beside the input as <stem>_formatted.<ext>. "-" reads stdin and
//   writes stdout unless an output is given.
// - Batch: `--batch <DIR> [--recursive]` formats every .html/.htm file into its
//   _formatted sibling. A bad file is reported and the batch goes on.
// - Promote: `--promote <DIR> [--dry-run]` renames every *_formatted file over
//   its original.
//
// CLI flags:
//   --indent <N>            : spaces per level (default 2)
//   --keep-tag-whitespace   : emit tags written over several lines as-is
//   -v / -vv                : debug / trace logging on stderr
//   -q                      : errors only
// Exit status is non-zero when any file failed.

use clap::{ArgAction, Parser};
use deminify_html::files::{self, Report};
use deminify_html::{Error, Options};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Input HTML file ("-" for stdin)
    #[arg(
        required_unless_present_any = ["batch", "promote"],
        conflicts_with_all = ["batch", "promote"]
    )]
    input: Option<PathBuf>,

    /// Output file (default: <stem>_formatted.<ext> next to the input)
    #[arg(requires = "input")]
    output: Option<PathBuf>,

    /// Format every HTML file in this directory
    #[arg(long, value_name = "DIR", conflicts_with = "promote")]
    batch: Option<PathBuf>,

    /// Descend into subdirectories (with --batch)
    #[arg(long, action = ArgAction::SetTrue, requires = "batch")]
    recursive: bool,

    /// Replace the originals under this directory with their _formatted versions
    #[arg(long, value_name = "DIR")]
    promote: Option<PathBuf>,

    /// Show what --promote would do without touching any file
    #[arg(long = "dry-run", action = ArgAction::SetTrue, requires = "promote")]
    dry_run: bool,

    /// Spaces per indentation level
    #[arg(long, value_name = "N", default_value_t = 2)]
    indent: usize,

    /// Keep tags written over several lines as they are
    #[arg(long = "keep-tag-whitespace", action = ArgAction::SetTrue)]
    keep_tag_whitespace: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let options = Options {
        indent_width: cli.indent,
        reflow_multiline_tags: !cli.keep_tag_whitespace,
    };

    let outcome = match (&cli.batch, &cli.promote, &cli.input) {
        (Some(dir), _, _) => files::deminify_directory(dir, cli.recursive, &options)
            .map(|report| summarize(&report, "formatted")),
        (_, Some(dir), _) => files::promote_formatted(dir, cli.dry_run).map(|report| {
            summarize(&report, if cli.dry_run { "would be promoted" } else { "promoted" })
        }),
        (_, _, Some(input)) => format_one(input, cli.output.as_deref(), &options).map(|()| true),
        (None, None, None) => Ok(false),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn format_one(input: &Path, output: Option<&Path>, options: &Options) -> Result<(), Error> {
    if input != Path::new("-") {
        let written = files::deminify_file(input, output, options)?;
        tracing::info!("formatted {} -> {}", input.display(), written.display());
        return Ok(());
    }

    let mut src = String::new();
    io::stdin()
        .read_to_string(&mut src)
        .map_err(|source| Error::Read {
            path: input.to_path_buf(),
            source,
        })?;
    let out = deminify_html::format_with_options(&src, options);

    match output {
        Some(path) => files::write_document(path, &out),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(out.as_bytes())
                .and_then(|()| stdout.write_all(b"\n"))
                .map_err(|source| Error::Write {
                    path: PathBuf::from("-"),
                    source,
                })
        }
    }
}

/// Log the totals of a batch; true when nothing failed.
fn summarize(report: &Report, verb: &str) -> bool {
    tracing::info!(
        "{} of {} files {verb}",
        report.succeeded.len(),
        report.total()
    );
    if !report.is_success() {
        tracing::error!("{} files failed", report.failed.len());
    }
    report.is_success()
}
