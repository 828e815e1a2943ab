//! `ServerCore`: process lifecycle orchestration.

use std::sync::Arc;

use rand_core::OsRng;

use crate::config::{Config, SignatureMode};
use crate::counters::{CounterSnapshot, PerWorkerCounters};
use crate::data::{ContentBlock, SignatureInfo, SignatureType};
use crate::error::{AppError, Result};
use crate::face::Face;
use crate::keychain::KeyChain;
use crate::keymaterial::KeyMaterial;
use crate::queue::{QueueEntry, WorkQueue};
use crate::reporter::{self, ReporterSnapshot};
use crate::shutdown::ShutdownFlag;
use crate::signer::Signer;
use crate::worker;

/// A summary of one completed run, returned by [`run`] for callers (tests,
/// and `main`'s final log line) that want the totals.
pub struct RunSummary {
    /// Every windowed snapshot the Reporter emitted during the run.
    pub reporter_snapshots: Vec<ReporterSnapshot>,
    /// The run's aggregate totals across all workers.
    pub final_totals: CounterSnapshot,
}

/// Run the server to completion: generate key material, build the shared
/// immutable pieces of every Data, register the prefix, spawn workers and the
/// Reporter, run the Face event loop, then tear everything down.
///
/// Registration failure and any other fatal error tear down whatever was
/// already spawned before returning, so no worker thread outlives a failed
/// run.
pub fn run<F: Face>(
    config: Config,
    face: &F,
    keychain: &mut impl KeyChain,
    shutdown: ShutdownFlag,
) -> Result<RunSummary> {
    let key_material = generate_key_material(&config, keychain)?;
    let signature_info = Arc::new(build_signature_info(&config, &key_material));
    let content = Arc::new(build_content_block(config.payload_size));
    let signer = Signer::new(key_material);

    let counters: Vec<PerWorkerCounters> = (0..config.thread_count)
        .map(|_| PerWorkerCounters::default())
        .collect();

    if let Err(err) = face.register_prefix(&config.prefix) {
        teardown(keychain, &signer);
        return Err(err);
    }

    let outcome = std::thread::scope(|scope| {
        let queue = WorkQueue::new();

        for worker_counters in &counters {
            scope.spawn(|| {
                worker::run(
                    &queue,
                    &signer,
                    &content,
                    &signature_info,
                    config.freshness_ms,
                    face,
                    worker_counters,
                );
            });
        }

        let reporter_handle = scope.spawn(|| reporter::run(&counters, || shutdown.is_set()));

        face.process_events(&mut |name| {
            queue.enqueue(QueueEntry::new(name));
        });

        shutdown.set();
        for _ in 0..config.thread_count {
            queue.enqueue(QueueEntry::sentinel());
        }

        reporter_handle.join().unwrap_or_default()
    });

    teardown(keychain, &signer);

    Ok(RunSummary {
        reporter_snapshots: outcome,
        final_totals: CounterSnapshot::sum(&counters),
    })
}

fn generate_key_material(config: &Config, keychain: &mut impl KeyChain) -> Result<KeyMaterial> {
    match config.sig_mode {
        SignatureMode::Digest => Ok(KeyMaterial::Digest),
        SignatureMode::Rsa => keychain
            .generate_rsa_identity(&config.prefix, config.key_bits)
            .map_err(|e| AppError::Init(e.to_string())),
        SignatureMode::Ecdsa => keychain
            .generate_ecdsa_identity(&config.prefix, config.key_bits)
            .map_err(|e| AppError::Init(e.to_string())),
    }
}

fn build_signature_info(config: &Config, key_material: &KeyMaterial) -> SignatureInfo {
    match config.sig_mode {
        SignatureMode::Digest => SignatureInfo::digest(),
        SignatureMode::Rsa => SignatureInfo::asymmetric(
            SignatureType::RsaSha256,
            key_material
                .cert_name()
                .expect("RSA key material has a cert name"),
        ),
        SignatureMode::Ecdsa => SignatureInfo::asymmetric(
            SignatureType::EcdsaSha256,
            key_material
                .cert_name()
                .expect("ECDSA key material has a cert name"),
        ),
    }
}

fn build_content_block(payload_size: usize) -> ContentBlock {
    let mut rng = OsRng;
    ContentBlock::random(payload_size, &mut rng)
}

fn teardown(keychain: &mut impl KeyChain, signer: &Signer) {
    if let Some(cert_name) = signer.cert_name() {
        if let Err(err) = keychain.delete_identity(cert_name) {
            tracing::warn!(error = %err, "failed to delete identity during shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::InMemoryFace;
    use crate::keychain::InMemoryKeyChain;
    use crate::name::Name;

    fn base_config() -> Config {
        Config {
            prefix: Name::from_uri("/throughput"),
            sig_mode: SignatureMode::Digest,
            key_bits: 0,
            thread_count: 2,
            payload_size: 16,
            freshness_ms: 1000,
        }
    }

    #[test]
    fn digest_mode_emits_one_data_per_scripted_interest() {
        let config = base_config();
        let face = InMemoryFace::new(vec![Name::from_uri("/throughput/a")]);
        let mut keychain = InMemoryKeyChain::new();
        let shutdown = ShutdownFlag::new();

        let summary = run(config, &face, &mut keychain, shutdown).unwrap();
        assert_eq!(summary.final_totals.packets_sent, 1);
        assert_eq!(face.emitted().len(), 1);
    }

    #[test]
    fn registration_failure_is_propagated_and_tears_down_cleanly() {
        let config = base_config();
        let face = InMemoryFace::failing_registration();
        let mut keychain = InMemoryKeyChain::new();
        let shutdown = ShutdownFlag::new();

        let result = run(config, &face, &mut keychain, shutdown);
        assert!(matches!(result, Err(AppError::Registration(_))));
    }

    #[test]
    fn rsa_mode_emits_verifiable_data_for_a_batch() {
        let config = Config {
            sig_mode: SignatureMode::Rsa,
            key_bits: 1024,
            thread_count: 4,
            ..base_config()
        };
        let script: Vec<Name> = (0..20)
            .map(|i| Name::from_uri(&format!("/throughput/{i}")))
            .collect();
        let face = InMemoryFace::new(script);
        let mut keychain = InMemoryKeyChain::new();
        let shutdown = ShutdownFlag::new();

        let summary = run(config, &face, &mut keychain, shutdown).unwrap();
        assert_eq!(summary.final_totals.packets_sent, 20);
        assert_eq!(face.emitted().len(), 20);
    }
}
