//! Command-line argument parsing.

use clap::Parser;

use crate::config::{Config, SignatureMode};
use crate::error::{AppError, Result};
use crate::name::Name;

#[derive(Parser, Debug)]
#[command(name = "ndn-throughput-server", about = "Throughput-oriented signed Data responder for an NDN face")]
struct Args {
    /// Name prefix to register and serve under.
    #[arg(short = 'p', long = "prefix", default_value = "/throughput")]
    prefix: String,

    /// Signature mode: 0 digest, 1 RSA, 3 ECDSA.
    #[arg(short = 's', long = "sig-mode", default_value_t = 1)]
    sig_mode: u8,

    /// Key bits. Defaults to 2048 for RSA, 256 for ECDSA, applied after
    /// `sig_mode` is known if this flag is left unset.
    #[arg(short = 'k', long = "key-bits")]
    key_bits: Option<u32>,

    /// Worker thread count; 0 selects hardware parallelism.
    #[arg(short = 't', long = "threads", default_value_t = 0)]
    threads: usize,

    /// Content payload size in bytes.
    #[arg(short = 'c', long = "payload-size", default_value_t = 8192)]
    payload_size: usize,

    /// FreshnessPeriod in milliseconds; 0 omits the field.
    #[arg(short = 'f', long = "freshness-ms", default_value_t = 0)]
    freshness_ms: u32,

    /// Increase log verbosity; repeatable.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Parse process arguments into a `Config` plus the `-v` repeat count used to
/// set the tracing filter level, applying the mode-dependent `key_bits`
/// default and validating bit-size bounds.
pub fn parse() -> Result<(Config, u8)> {
    let args = Args::parse();
    let verbose = args.verbose;
    Ok((from_args(args)?, verbose))
}

fn from_args(args: Args) -> Result<Config> {
    let sig_mode = match args.sig_mode {
        0 => SignatureMode::Digest,
        1 => SignatureMode::Rsa,
        3 => SignatureMode::Ecdsa,
        other => {
            return Err(AppError::Config(format!(
                "invalid sig-mode {other}; expected 0 (digest), 1 (RSA), or 3 (ECDSA)"
            )))
        }
    };

    let key_bits = args.key_bits.unwrap_or(match sig_mode {
        SignatureMode::Digest => 0,
        SignatureMode::Rsa => 2048,
        SignatureMode::Ecdsa => 256,
    });

    match sig_mode {
        SignatureMode::Rsa if key_bits < 1024 => {
            return Err(AppError::Config(format!(
                "RSA key size {key_bits} is below the minimum of 1024 bits"
            )));
        }
        SignatureMode::Ecdsa if key_bits < 160 => {
            return Err(AppError::Config(format!(
                "ECDSA key size {key_bits} is below the minimum of 160 bits"
            )));
        }
        _ => {}
    }

    let thread_count = if args.threads == 0 {
        std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1)
    } else {
        args.threads
    };

    Ok(Config {
        prefix: Name::from_uri(&args.prefix),
        sig_mode,
        key_bits,
        thread_count,
        payload_size: args.payload_size,
        freshness_ms: args.freshness_ms,
    })
}
