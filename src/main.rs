//! Binary entry point: parse arguments, run the server, map errors to exit
//! codes.

use ndn_throughput_server::error::AppError;
use ndn_throughput_server::face::Face;
use ndn_throughput_server::keychain::InMemoryKeyChain;
use ndn_throughput_server::shutdown::ShutdownFlag;
use ndn_throughput_server::{cli, logging, server};

/// A production `Face` has no adapter in this crate: the server core is
/// exercised only against the in-memory double. This stub
/// documents the shape a real UDP/TCP/Unix-socket face adapter would need to
/// fill in, and always fails registration so running the binary without
/// wiring in a real transport fails loudly instead of silently doing nothing.
struct UnimplementedFace;

impl Face for UnimplementedFace {
    fn register_prefix(&self, prefix: &ndn_throughput_server::name::Name) -> ndn_throughput_server::error::Result<()> {
        Err(AppError::Registration(format!(
            "no Face transport is wired in; cannot register {prefix}. \
             This binary ships only the in-memory Face double used by tests."
        )))
    }

    fn put(&self, _data_wire: Vec<u8>) -> ndn_throughput_server::error::Result<()> {
        unreachable!("put is never called before a successful register_prefix")
    }

    fn process_events(&self, _on_interest: &mut dyn FnMut(ndn_throughput_server::name::Name)) {
        unreachable!("process_events is never called before a successful register_prefix")
    }
}

fn main() {
    let (config, verbosity) = match cli::parse() {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    logging::init(verbosity);

    let shutdown = ShutdownFlag::new();
    if let Err(err) = shutdown.install_signal_hook() {
        tracing::warn!(error = %err, "failed to install signal handler");
    }

    let face = UnimplementedFace;
    let mut keychain = InMemoryKeyChain::new();

    match server::run(config, &face, &mut keychain, shutdown) {
        Ok(summary) => {
            tracing::info!(
                total_packets = summary.final_totals.packets_sent,
                total_bytes = summary.final_totals.bytes_sent,
                "server shut down cleanly"
            );
        }
        Err(err) => {
            tracing::error!(error = %err, "fatal error");
            std::process::exit(1);
        }
    }
}
