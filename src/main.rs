//! eth-event-export CLI - chunked on-chain event log extraction

use clap::{Parser, Subcommand};
use eth_event_exporter::{
    ApiResult, Config, HttpMethod, RangeExtractor, RequestPayload, TransportKind,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "eth-event-export")]
#[command(
    version,
    about = "Chunked Ethereum event log extractor with filesystem resume"
)]
#[command(after_help = r#"EXAMPLES:
    # Extract events for a contract into ./events, 10k heights per file
    eth-event-export --rpc-url http://127.0.0.1:18888/rpc \
                     -c 0x7d73424a8256c0b2ba245e5d5a3de8820e45f390 \
                     -f 1 -t 250000 -o events

    # Re-run later with a wider range; chunks already on disk are skipped
    eth-event-export --rpc-url http://127.0.0.1:18888/rpc \
                     -c 0x7d73424a8256c0b2ba245e5d5a3de8820e45f390 \
                     -f 1 -t 500000 -o events

    # Curl backend against a self-signed test endpoint
    eth-event-export --config exporter.toml --transport curl --insecure -f 1 -t 100000

    # Probe the endpoint with a single raw request
    eth-event-export --rpc-url http://127.0.0.1:18888/rpc -c 0x... \
                     call --method GET --path /status
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// RPC endpoint base URL
    #[arg(long)]
    rpc_url: Option<String>,

    /// Contract address to extract events for
    #[arg(short, long)]
    contract: Option<String>,

    /// Start height (inclusive)
    #[arg(short = 'f', long, default_value = "1")]
    from_block: u64,

    /// End height (inclusive)
    #[arg(short = 't', long)]
    to_block: Option<u64>,

    /// Export folder for chunk artifacts
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Heights per artifact
    #[arg(long)]
    chunk_size: Option<u64>,

    /// Transport backend (http or curl)
    #[arg(long)]
    transport: Option<String>,

    /// Bearer/session token forwarded to the transport
    #[arg(long)]
    token: Option<String>,

    /// Skip TLS certificate verification (self-signed/test endpoints only)
    #[arg(long)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Load settings from a TOML file (flags override)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a height range (the default when no subcommand is given)
    Export,

    /// Issue one raw request against the endpoint and print the body
    Call {
        /// HTTP-style method (GET, PUT, POST, DELETE)
        #[arg(long, default_value = "GET")]
        method: String,

        /// Path appended to the endpoint base URL
        #[arg(long, default_value = "")]
        path: String,

        /// Request parameter, repeatable (key=value)
        #[arg(long = "param", action = clap::ArgAction::Append)]
        params: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = build_config(&cli)?;

    match &cli.command {
        Some(Commands::Call {
            method,
            path,
            params,
        }) => run_call(&config, method, path, params),
        _ => run_export(&cli, &config),
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => {
            let rpc_url = cli.rpc_url.clone().ok_or_else(|| {
                anyhow::anyhow!("RPC URL is required. Use --rpc-url or --config")
            })?;
            let contract = cli.contract.clone().ok_or_else(|| {
                anyhow::anyhow!("Contract address is required. Use -c or --contract")
            })?;
            let out_dir = cli.out_dir.clone().unwrap_or_else(|| "events".into());
            Config::new(rpc_url, contract, out_dir)
        }
    };

    // Explicit flags win over file settings.
    if let Some(rpc_url) = &cli.rpc_url {
        config.rpc_url = rpc_url.clone();
    }
    if let Some(contract) = &cli.contract {
        config.contract = contract.clone();
    }
    if let Some(out_dir) = &cli.out_dir {
        config.export_dir = out_dir.clone();
    }
    if let Some(chunk_size) = cli.chunk_size {
        config = config.with_chunk_size(chunk_size);
    }
    if let Some(transport) = &cli.transport {
        let transport: TransportKind = transport.parse()?;
        config = config.with_transport(transport);
    }
    if let Some(token) = &cli.token {
        config = config.with_token(token.clone());
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout_secs(timeout);
    }
    if cli.insecure {
        config = config.with_verify_tls(false);
    }

    Ok(config)
}

fn run_export(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let to_block = cli
        .to_block
        .ok_or_else(|| anyhow::anyhow!("End height is required. Use -t or --to-block"))?;
    let from_block = cli.from_block;
    if to_block < from_block {
        anyhow::bail!(
            "End height {} is below start height {}",
            to_block,
            from_block
        );
    }

    let extractor = RangeExtractor::from_config(config)?;

    // Progress bar over heights in the requested range
    let pb = if !cli.quiet {
        let pb = ProgressBar::new(to_block - from_block + 1);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} heights")
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let pb_clone = pb.clone();
    let extractor = extractor.with_progress(move |done_height, _end| {
        if let Some(pb) = &pb_clone {
            pb.set_position(done_height.saturating_sub(from_block.saturating_sub(1)));
        }
    });

    let start = Instant::now();
    extractor.export_range(from_block, to_block)?;
    let elapsed = start.elapsed();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    if !cli.quiet {
        eprintln!(
            "Extracted heights {} to {} into {} in {:.2}s",
            from_block,
            to_block,
            config.export_dir.display(),
            elapsed.as_secs_f64()
        );
    }

    Ok(())
}

fn run_call(config: &Config, method: &str, path: &str, params: &[String]) -> anyhow::Result<()> {
    let method: HttpMethod = method.parse()?;

    let mut payload = RequestPayload::new();
    for param in params {
        let (key, value) = param
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Invalid parameter (expected key=value): {}", param))?;
        payload.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    }

    let client = config.build_client()?;
    match method {
        // Reads print the unparsed body so garbled responses stay inspectable.
        HttpMethod::Get => match client.get_raw_response(path, &payload) {
            Some(body) => println!("{}", body),
            None => anyhow::bail!("No response obtained from server"),
        },
        other => match client.call(other, path, &payload) {
            ApiResult::Success { body } => println!("{}", serde_json::to_string_pretty(&body)?),
            ApiResult::Error { code, message } => anyhow::bail!("{}: {}", code, message),
        },
    }

    Ok(())
}
