//! UDP sink binary - stream stdin to a destination as framed datagrams
//!
//! Usage:
//!   udp-sink --host 10.0.0.5 --port 5000 --header-type seq_num < samples.bin
//!   udp-sink --config config/sink.toml --log-level debug
//!
//! Reads stdin in whole-item batches, hands each batch to the sink, and stops
//! the sink (sending the end-of-stream sentinel) on EOF or Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use codec::HeaderType;
use config::SinkConfig;
use network::{TransportError, UdpSink};
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "udp-sink")]
#[command(about = "Stream stdin to a UDP destination as framed datagrams")]
#[command(version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Destination host (empty for localhost)
    #[arg(long)]
    host: Option<String>,

    /// Destination port
    #[arg(short, long)]
    port: Option<u16>,

    /// Header type: 0-4 or none, seq_num, seq_plus_size, stream_id, seq_size_checksum
    #[arg(long)]
    header_type: Option<HeaderType>,

    /// Maximum datagram size in bytes, header included
    #[arg(long)]
    payload_size: Option<usize>,

    /// Bytes per sample
    #[arg(long)]
    item_size: Option<usize>,

    /// Samples per item
    #[arg(long)]
    vec_len: Option<usize>,

    /// Do not send the end-of-stream sentinel on shutdown
    #[arg(long)]
    no_eof: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let config = build_config(&args)?;
    let sink = Arc::new(UdpSink::start(config).context("Failed to start UDP sink")?);

    // Stop from the signal thread; the sink lock orders this against a batch in flight
    {
        let sink = Arc::clone(&sink);
        ctrlc::set_handler(move || {
            info!("Received shutdown signal");
            sink.stop();
            std::process::exit(130);
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    let result = stream_stdin(&sink);
    if let Err(e) = &result {
        error!("Streaming failed: {:#}", e);
    }

    sink.stop();

    let metrics = sink.metrics();
    info!(
        "Sent {} datagrams ({} bytes, {} payload), {} send errors",
        metrics.datagrams_sent, metrics.bytes_sent, metrics.payload_bytes_sent, metrics.send_errors
    );

    result
}

fn build_config(args: &Args) -> Result<SinkConfig> {
    let mut config = SinkConfig::load(args.config.as_deref())?;

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(header_type) = args.header_type {
        config.header_type = header_type;
    }
    if let Some(payload_size) = args.payload_size {
        config.payload_capacity = payload_size;
    }
    if let Some(item_size) = args.item_size {
        config.item_size = item_size;
    }
    if let Some(vec_len) = args.vec_len {
        config.vector_len = vec_len;
    }
    if args.no_eof {
        config.send_eof_on_stop = false;
    }

    Ok(config)
}

fn stream_stdin(sink: &UdpSink) -> Result<()> {
    let block_size = sink.config().block_size();
    let batch_items = sink.min_batch_items().max(1);
    let mut buf = vec![0u8; batch_items * block_size];

    info!(
        "Reading stdin in batches of {} items ({} bytes)",
        batch_items,
        buf.len()
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let filled = read_full(&mut input, &mut buf).context("Failed to read stdin")?;
        let n_items = filled / block_size;

        if n_items > 0 {
            match sink.work(n_items, &buf[..n_items * block_size]) {
                Ok(_) => {}
                Err(TransportError::Closed) => break,
                Err(e) => return Err(e.into()),
            }
        }

        if filled < buf.len() {
            let trailing = filled % block_size;
            if trailing > 0 {
                warn!("Discarding {} trailing bytes that do not form a whole item", trailing);
            }
            break;
        }
    }

    Ok(())
}

/// Fill `buf` from `input`, returning less than `buf.len()` only at EOF
fn read_full(input: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn init_logging(args: &Args) {
    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "udp-sink",
            "--host",
            "127.0.0.1",
            "--port",
            "6001",
            "--header-type",
            "seq_plus_size",
            "--payload-size",
            "512",
            "--item-size",
            "4",
            "--vec-len",
            "2",
            "--no-eof",
        ]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 6001);
        assert_eq!(config.header_type, HeaderType::SeqPlusSize);
        assert_eq!(config.payload_capacity, 512);
        assert_eq!(config.block_size(), 8);
        assert!(!config.send_eof_on_stop);
    }

    #[test]
    fn test_header_type_accepts_codes() {
        let args = Args::parse_from(["udp-sink", "--header-type", "3"]);
        assert_eq!(args.header_type, Some(HeaderType::StreamId));
        assert!(Args::try_parse_from(["udp-sink", "--header-type", "9"]).is_err());
    }

    #[test]
    fn test_read_full_stops_at_eof() {
        let mut input: &[u8] = &[1, 2, 3, 4, 5];
        let mut buf = [0u8; 4];
        assert_eq!(read_full(&mut input, &mut buf).unwrap(), 4);
        assert_eq!(read_full(&mut input, &mut buf).unwrap(), 1);
        assert_eq!(read_full(&mut input, &mut buf).unwrap(), 0);
    }
}
