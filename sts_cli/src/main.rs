use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use sts_codecs::DeflateCodec;
use sts_core::{compress_file, decompress_file, inspect_file};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "savethesize",
    about = "SaveTheSize: wrap a single file in a DEFLATE-compressed container",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compress a file into a .savethesize container
    Compress {
        /// File to compress
        input: PathBuf,
        /// Destination container (default: <INPUT>.savethesize)
        output: Option<PathBuf>,
        /// DEFLATE level, 0 (store) to 9 (smallest)
        #[arg(short, long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
        level: u32,
    },
    /// Restore the original file from a container
    Decompress {
        /// Container to decompress
        input: PathBuf,
        /// Destination file (default: the original name stored in the container)
        output: Option<PathBuf>,
    },
    /// Print the container header without decompressing
    Info {
        /// Container to inspect
        input: PathBuf,
        /// Print the header as JSON
        #[arg(long)]
        json: bool,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{} B ({:.2} {})", n, v, UNITS[unit])
    }
}

fn ratio_display(ratio: Option<f64>) -> String {
    match ratio {
        Some(pct) => format!("{:.1}%", pct),
        None => "n/a (empty original)".to_string(),
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
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_compress(input: &Path, output: Option<&Path>, level: u32) -> anyhow::Result<()> {
    let codec = DeflateCodec::new(level);
    let report = compress_file(&codec, input, output)
        .with_context(|| format!("compressing {}", input.display()))?;

    eprintln!("  input       : {}", report.input.display());
    eprintln!("  output      : {}", report.output.display());
    eprintln!("  original    : {}", human_bytes(report.header.original_size));
    eprintln!("  compressed  : {}", human_bytes(report.header.compressed_size));
    eprintln!("  container   : {}", human_bytes(report.container_size()));
    eprintln!("  ratio       : {}", ratio_display(report.ratio_percent()));
    Ok(())
}

fn run_decompress(input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let codec = DeflateCodec::default();
    let report = decompress_file(&codec, input, output)
        .with_context(|| format!("decompressing {}", input.display()))?;

    eprintln!("  input       : {}", report.input.display());
    eprintln!("  output      : {}", report.output.display());
    eprintln!("  size        : {}", human_bytes(report.header.original_size));
    if report.renamed {
        eprintln!(
            "  note        : target existed, wrote {} instead (an existing file there is replaced)",
            report.output.display()
        );
    }
    Ok(())
}

fn run_info(input: &Path, json: bool) -> anyhow::Result<()> {
    let report =
        inspect_file(input).with_context(|| format!("inspecting {}", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let h = &report.header;
    println!("=== SaveTheSize container: {} ===", input.display());
    println!();
    println!("  magic           : 0x{:08x}", h.magic);
    if report.version_supported {
        println!("  format version  : {}", h.version);
    } else {
        println!("  format version  : {} (unsupported)", h.version);
    }
    println!("  original name   : {}", h.original_name);
    println!("  original size   : {}", human_bytes(h.original_size));
    println!("  compressed size : {}", human_bytes(h.compressed_size));
    println!("  file on disk    : {}", human_bytes(report.file_size));
    println!("  ratio           : {}", ratio_display(report.ratio_percent));
    if !report.size_consistent {
        println!("  warning         : compressed size does not match file length");
    }
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version are not failures
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };
    init_logging(cli.verbose);
    tracing::debug!("parsed arguments: {:?}", cli);

    let result = match &cli.command {
        Commands::Compress {
            input,
            output,
            level,
        } => run_compress(input, output.as_deref(), *level),
        Commands::Decompress { input, output } => run_decompress(input, output.as_deref()),
        Commands::Info { input, json } => run_info(input, *json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("command failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
