//! Worker threads: the consumer side of the `WorkQueue`.

use std::sync::Arc;
use std::time::Instant;

use crate::counters::PerWorkerCounters;
use crate::data::{ContentBlock, Data, SignatureInfo};
use crate::face::Face;
use crate::queue::WorkQueue;
use crate::signer::Signer;

/// Dequeues Interests, builds and signs a `Data` for each, hands it to the
/// `Face`, and updates this worker's counters. Runs until it dequeues the
/// shutdown sentinel.
///
/// A signing failure or a rejected `Face::put` drops the Interest: the
/// worker logs it, counts it as an error, and moves on to the next entry. It
/// never counts a dropped Interest as a sent packet, and it never stops on a
/// per-packet failure.
pub fn run<F: Face>(
    queue: &WorkQueue,
    signer: &Signer,
    content: &Arc<ContentBlock>,
    signature_info: &Arc<SignatureInfo>,
    freshness_ms: u32,
    face: &F,
    counters: &PerWorkerCounters,
) {
    loop {
        let entry = queue.wait_dequeue();
        let dequeued_at = Instant::now();
        let queue_micros = dequeued_at
            .saturating_duration_since(entry.enqueued_at)
            .as_micros() as u64;

        if entry.is_sentinel() {
            return;
        }

        let mut data = Data::new(
            entry.interest_name,
            freshness_ms,
            content.clone(),
            signature_info.clone(),
        );

        let payload_size = content.len();
        match signer.sign_into(&mut data) {
            Ok(signature_value) => {
                let wire = data.finish_with_signature(signature_value);
                match face.put(wire) {
                    Ok(()) => {
                        let process_micros = dequeued_at.elapsed().as_micros() as u64;
                        counters.record_success(payload_size, queue_micros, process_micros);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Face::put failed, dropping Data");
                        counters.record_error(queue_micros);
                    }
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "signing failed, dropping Interest");
                counters.record_error(queue_micros);
            }
        }
    }
}
