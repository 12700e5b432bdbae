//! # Message Channel
//!
//! One-shot request/response abstraction over the inter-context messaging
//! primitive. Each `send` ships exactly one message and resolves exactly one
//! outcome: the relay's envelope on delivery, or `BridgeError::Unavailable`
//! when no live relay endpoint exists.
//!
//! Every message carries a generated correlation id and a dispatcher task
//! matches reply envelopes to pending callers by that id, so interleaved
//! calls cannot be misattributed.

use crate::bridge::message::{BridgeCall, BridgeMessage, Envelope};
use crate::error::{BridgeError, BridgeResult};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Envelope>>>>;

/// Caller-side endpoint of the bridge
pub struct MessageChannel {
    outbound: mpsc::UnboundedSender<BridgeMessage>,
    pending: PendingMap,
    next_id: AtomicU64,
}

impl MessageChannel {
    /// Attach to a relay endpoint over a pair of message streams.
    ///
    /// Spawns a dispatcher that routes each incoming envelope to the caller
    /// whose id it carries. When the reply stream closes (the relay endpoint
    /// was torn down), every still-pending call fails as unavailable.
    pub fn connect(
        outbound: mpsc::UnboundedSender<BridgeMessage>,
        mut inbound: mpsc::UnboundedReceiver<Envelope>,
    ) -> Self {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let dispatch = Arc::clone(&pending);
        tokio::spawn(async move {
            while let Some(envelope) = inbound.recv().await {
                match dispatch.lock().await.remove(&envelope.id) {
                    Some(slot) => {
                        // A dropped receiver just means the caller gave up
                        let _ = slot.send(envelope);
                    }
                    None => warn!("dropping reply with unknown id {}", envelope.id),
                }
            }
            // Relay gone; dropping the slots rejects the pending callers
            dispatch.lock().await.clear();
            debug!("bridge reply stream closed");
        });

        Self {
            outbound,
            pending,
            next_id: AtomicU64::new(1),
        }
    }

    /// Send one request and await its envelope.
    ///
    /// Returns `Err` only for delivery failure. A relay that executed the
    /// call but saw the capability throw still resolves `Ok`, with
    /// `success: false` set in the envelope — callers must check both.
    pub async fn send(&self, call: BridgeCall) -> BridgeResult<Envelope> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (slot, reply) = oneshot::channel();

        self.pending.lock().await.insert(id, slot);
        if self.outbound.send(BridgeMessage { id, call }).is_err() {
            self.pending.lock().await.remove(&id);
            return Err(BridgeError::unavailable());
        }

        reply.await.map_err(|_| BridgeError::unavailable())
    }
}
