use anyhow::Context;
use clap::Parser;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use torrent_verify::output::{OutputFormat, Reporter};
use torrent_verify::{
    verify_torrent, CheckConfig, FileStorage, PieceVerifier, Torrent, TorrentLayout,
};

/// List the files of a torrent download whose pieces all match their checksums.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// The .torrent file describing the download
    torrent: PathBuf,

    /// Directory holding the downloaded data
    #[arg(short = 'C', long, default_value = ".")]
    root: PathBuf,

    /// More log output on stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// No progress bar and no summary
    #[arg(short, long)]
    quiet: bool,

    /// Terminate paths with NUL instead of newline
    #[arg(short = '0', long = "null", conflicts_with = "indices")]
    null: bool,

    /// Print file indices instead of paths
    #[arg(short, long)]
    indices: bool,

    /// Also reject files whose size on disk differs from the torrent
    #[arg(long)]
    check_size: bool,

    /// Largest single read while hashing, in bytes
    #[arg(long, default_value_t = torrent_verify::piece::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
}

impl Cli {
    fn config(&self) -> CheckConfig {
        CheckConfig::default()
            .with_root(&self.root)
            .with_chunk_size(self.chunk_size)
            .with_check_size(self.check_size)
    }

    fn format(&self) -> OutputFormat {
        if self.null {
            OutputFormat::NullTerminated
        } else if self.indices {
            OutputFormat::Indices
        } else {
            OutputFormat::Paths
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let torrent = Torrent::open(&cli.torrent)
        .with_context(|| format!("Failed to load {}", cli.torrent.display()))?;
    let layout = TorrentLayout::from_torrent(&torrent).context("Invalid torrent layout")?;
    let config = cli.config();

    let stdout = io::stdout();
    let mut reporter = Reporter::new(
        BufWriter::new(stdout.lock()),
        cli.format(),
        layout.num_pieces(),
        !cli.quiet,
    );
    let mut verifier = PieceVerifier::new(&layout, &config);

    let summary =
        verify_torrent(&mut verifier, &mut reporter, &config).context("Failed to write output")?;
    reporter.finish().context("Failed to write output")?;

    if !cli.quiet {
        eprintln!(
            "{}: {}/{} files intact ({} pieces hashed)",
            torrent.info.name, summary.valid_files, summary.files, summary.pieces_hashed,
        );
    }

    Ok(())
}
