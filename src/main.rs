//! snoopy - walk a directory and print it as an indented tree.
//!
//! Usage:
//!   snoopy [PATH]                          Print the whole tree
//!   snoopy [PATH] --sort size              Largest entries first
//!   snoopy [PATH] --prune "< 10 KB"        Drop small files and folders
//!   snoopy [PATH] --json -o tree.json      Export the tree instead
//!   snoopy --help                          Show help

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use snoopy_core::{Entry, Folder, OnError, WalkConfig};
use snoopy_render::{
    Detailed, Formatter, HumanSize, NameOnly, RenderOptions, Sink, format_size, write_to,
};
use snoopy_scan::{Ticker, TickerStyle, Walker};
use snoopy_transform::{PruneOptions, Sort, SortKey, prune};

const TICK: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(
    name = "snoopy",
    version,
    about = "Analyze and display folder structure and information",
    long_about = "snoopy walks a directory, optionally sorts and prunes the resulting tree, \
                  and prints it one line per folder, file and error."
)]
struct Cli {
    /// Directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// 0 = quiet, 1 = log each folder and error, 2 = also each file
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    verbosity: u8,

    /// Display the tree only up to this depth (the root is depth 0)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Maximum number of files to display per folder
    #[arg(long)]
    max_files_display: Option<usize>,

    /// Maximum number of subfolders to display per folder
    #[arg(long)]
    max_folders_display: Option<usize>,

    /// Maximum number of errors to display per folder
    #[arg(long)]
    max_errors_display: Option<usize>,

    /// Sort children by size, created, accessed, modified, files, folders, errors, name or kind
    #[arg(long, value_name = "KEY")]
    sort: Option<SortKey>,

    /// Sort smallest first
    #[arg(long, requires = "sort")]
    ascending: bool,

    /// Reject files and folders by size, e.g. "< 10 KB"
    #[arg(long, value_name = "EXPR")]
    prune: Option<String>,

    /// Hide pruned entries instead of removing them
    #[arg(long, requires = "prune")]
    hide_only: bool,

    /// Display hidden entries too
    #[arg(long)]
    show_hidden: bool,

    /// Ignore entries whose name matches this glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    ignore: Vec<String>,

    /// Ignore entries whose name starts with a dot
    #[arg(long)]
    skip_dotfiles: bool,

    /// Abort on the first unreadable directory instead of recording it
    #[arg(long)]
    raise_on_error: bool,

    /// Show a progress line on stderr while walking (`--progress=dots` picks a style)
    #[arg(
        long,
        value_name = "STYLE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "counters"
    )]
    progress: Option<TickerStyle>,

    /// Save the output under the given filename
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export the tree as JSON instead of rendering it
    #[arg(long)]
    json: bool,

    /// Suppress printing the output
    #[arg(long)]
    no_display: bool,

    /// Line labels for folders and files
    #[arg(long, value_enum, default_value_t = LabelStyle::Detailed)]
    labels: LabelStyle,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum LabelStyle {
    /// Full description with sizes, counts and timestamps
    #[default]
    Detailed,
    /// Name only
    Name,
    /// Name with human-readable size
    Size,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let tree = walk(&cli)?;
    let tree = match cli.sort {
        Some(key) => Sort {
            key,
            reverse: !cli.ascending,
        }
        .sort(tree),
        None => tree,
    };
    let Some(tree) = prune_tree(&cli, tree)? else {
        info!("root folder was pruned, nothing to display");
        return Ok(());
    };

    info!(
        path = %tree.path().display(),
        size = %format_size(tree.bytes()),
        files = tree.deep_files().len(),
        folders = tree.deep_folders().len(),
        errors = tree.deep_errors().len(),
        "walk complete"
    );

    let text = if cli.json {
        let mut json = serde_json::to_string_pretty(&tree).context("Failed to serialize tree")?;
        json.push('\n');
        json
    } else {
        formatter(&cli).render(&tree)
    };

    if !cli.no_display {
        write_to(&Sink::Stdout, &text)?;
    }
    if let Some(output) = &cli.output {
        write_to(&Sink::File(output.clone()), &text)
            .wrap_err_with(|| format!("Failed to save {}", output.display()))?;
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` overrides the verbosity level.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn walk(cli: &Cli) -> Result<Folder> {
    let on_error = if cli.raise_on_error {
        OnError::Raise
    } else {
        OnError::Continue
    };
    let config = WalkConfig::builder()
        .root(&cli.path)
        .on_error(on_error)
        .verbosity(cli.verbosity)
        .ignore_patterns(cli.ignore.clone())
        .skip_dotfiles(cli.skip_dotfiles)
        .build()
        .context("Invalid walk configuration")?;

    let walker = Walker::new();
    let ticker = cli
        .progress
        .map(|style| Ticker::start(walker.progress(), style, TICK));
    let result = walker.walk(&config);
    if let Some(ticker) = ticker {
        ticker.stop();
    }

    result.wrap_err_with(|| format!("Failed to walk {}", cli.path.display()))
}

fn prune_tree(cli: &Cli, tree: Folder) -> Result<Option<Folder>> {
    let Some(expr) = &cli.prune else {
        return Ok(Some(tree));
    };
    let options = PruneOptions {
        hide_only: cli.hide_only,
        ..Default::default()
    };
    prune::by_size_expr(tree, expr, options).context("Invalid --prune expression")
}

fn formatter(cli: &Cli) -> Formatter {
    let options = RenderOptions {
        max_depth: cli.max_depth,
        max_files: cli.max_files_display,
        max_folders: cli.max_folders_display,
        max_errors: cli.max_errors_display,
        show_hidden: cli.show_hidden,
        ..Default::default()
    };
    let formatter = Formatter::new(options);

    match cli.labels {
        LabelStyle::Detailed => formatter.folder_label(Detailed).file_label(Detailed),
        LabelStyle::Name => formatter
            .folder_label(NameOnly::default())
            .file_label(NameOnly::default()),
        LabelStyle::Size => formatter.folder_label(HumanSize).file_label(HumanSize),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["snoopy"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("."));
        assert_eq!(cli.verbosity, 0);
        assert!(cli.sort.is_none());
        assert!(cli.progress.is_none());
        assert!(!cli.raise_on_error);
    }

    #[test]
    fn test_parse_pipeline_flags() {
        let cli = Cli::try_parse_from([
            "snoopy",
            "/tmp",
            "--sort",
            "size",
            "--ascending",
            "--prune",
            "< 10 KB",
            "--hide-only",
            "--ignore",
            "*.log",
            "--ignore",
            "target",
            "--progress",
            "--labels",
            "name",
        ])
        .unwrap();

        assert_eq!(cli.sort, Some(SortKey::Size));
        assert!(cli.ascending);
        assert_eq!(cli.prune.as_deref(), Some("< 10 KB"));
        assert_eq!(cli.ignore, vec!["*.log", "target"]);
        assert_eq!(cli.progress, Some(TickerStyle::Counters));
        assert!(matches!(cli.labels, LabelStyle::Name));
    }

    #[test]
    fn test_progress_does_not_swallow_path() {
        let cli = Cli::try_parse_from(["snoopy", "--progress", "/tmp"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("/tmp"));
        assert_eq!(cli.progress, Some(TickerStyle::Counters));

        let cli = Cli::try_parse_from(["snoopy", "--progress=dots", "/tmp"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("/tmp"));
        assert_eq!(cli.progress, Some(TickerStyle::Dots));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(Cli::try_parse_from(["snoopy", "--verbosity", "3"]).is_err());
        assert!(Cli::try_parse_from(["snoopy", "--sort", "colour"]).is_err());
        assert!(Cli::try_parse_from(["snoopy", "--hide-only"]).is_err());
        assert!(Cli::try_parse_from(["snoopy", "--progress=sparkles"]).is_err());
    }
}
