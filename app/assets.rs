//! Command-line interface for assets.
//!
//! Crawls a folder and writes a JSON manifest of every file it finds, either
//! to standard output or to a file.

use assets::{AssetsBuilder, AssetsOptions, ToolBackend, catalog};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::exit;

/// assets — build-time asset manifest generator
#[derive(Parser)]
#[command(name = "assets", version, about, long_about = None)]
#[command(after_help = "Example: assets . assets.json\n  \
    Crawls the current directory and writes a manifest of every asset it finds to assets.json.")]
struct Cli {
    /// Folder to crawl for assets
    folder: Option<PathBuf>,

    /// Where to save the manifest (standard output if omitted)
    output: Option<PathBuf>,

    /// Rename each file to <key>.<hash>.<ext> before recording it
    #[arg(long)]
    cachebust: bool,

    /// Embed base64 contents of files up to this many bytes (0 disables)
    #[arg(long = "base64", value_name = "MAX_BYTES", default_value_t = 0)]
    base64: u64,

    /// Entry names to skip, comma-separated (can be repeated)
    #[arg(long = "ignore", value_name = "NAMES")]
    ignore: Vec<String>,

    /// Use the md5sum and base64 programs instead of computing in-process
    #[arg(long)]
    external_tools: bool,

    /// Log progress to standard error
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_options(self, folder: PathBuf) -> AssetsOptions {
        let tools = if self.external_tools {
            ToolBackend::External
        } else {
            ToolBackend::Native
        };
        AssetsBuilder::new(folder)
            .output(self.output)
            .cachebust(self.cachebust)
            .base64_threshold(self.base64)
            .ignore(self.ignore)
            .tools(tools)
            .build()
    }
}

fn main() {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    init_logging(cli.verbose);

    let Some(folder) = cli.folder.clone() else {
        let _ = Cli::command().print_help();
        exit(1);
    };

    if let Err(e) = catalog(cli.into_options(folder)) {
        #[cfg(feature = "logging")]
        tracing::error!("{:?}", e);
        println!("{}", e);
        exit(1);
    }
}

#[cfg(feature = "logging")]
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose { "warn,assets=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
