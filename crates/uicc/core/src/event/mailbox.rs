//! Single-slot mailboxes for swap events
//!
//! The producer never blocks. Posting while an event is still unconsumed
//! replaces it, so the consumer only ever sees the latest edge of a sender.
//!
//! Every [`SwapSender::fork`] gets a slot of its own, and one
//! [`SwapReceiver`] waits on all of them. A fork can never evict an event
//! posted by another fork. Clones share the slot and close flag of their
//! original. Closing a sender drops its later posts and discards whatever it
//! posted that is still unconsumed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Select, Sender, TrySendError, bounded};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::event::SwapEvent;

/// Consumer ends of every slot created for one mailbox
type Slots = Arc<Mutex<Vec<Receiver<SwapEvent>>>>;

/// Create a connected sender/receiver pair
pub fn swap_mailbox() -> (SwapSender, SwapReceiver) {
    let slots = Slots::default();
    let sender = SwapSender::with_slot(Arc::clone(&slots));
    (sender, SwapReceiver { slots })
}

/// Producer half of a swap mailbox
#[derive(Debug, Clone)]
pub struct SwapSender {
    tx: Sender<SwapEvent>,
    /// Consumer end of this sender's slot, used to drop a stale event
    evict: Receiver<SwapEvent>,
    closed: Arc<AtomicBool>,
    slots: Slots,
}

impl SwapSender {
    fn with_slot(slots: Slots) -> Self {
        let (tx, rx) = bounded(1);
        slots.lock().push(rx.clone());
        Self {
            tx,
            evict: rx,
            closed: Arc::new(AtomicBool::new(false)),
            slots,
        }
    }

    /// Post an event, replacing any unconsumed one from this sender
    ///
    /// Returns `false` when this sender is closed.
    pub fn post(&self, event: SwapEvent) -> bool {
        if self.is_closed() {
            debug!(%event, "Dropping swap event posted after close");
            return false;
        }

        let mut pending = event;
        loop {
            match self.tx.try_send(pending) {
                Ok(()) => return true,
                Err(TrySendError::Full(rejected)) => {
                    if let Ok(stale) = self.evict.try_recv() {
                        trace!(%stale, event = %rejected, "Replacing unconsumed swap event");
                    }
                    pending = rejected;
                }
                // The receiver clone held here keeps the slot connected
                Err(TrySendError::Disconnected(_)) => return false,
            }
        }
    }

    /// Create a sender on the same mailbox with its own slot and close flag
    pub fn fork(&self) -> Self {
        Self::with_slot(Arc::clone(&self.slots))
    }

    /// Close this sender and discard its unconsumed event
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        if let Ok(event) = self.evict.try_recv() {
            debug!(%event, "Discarding swap event from closed sender");
        }
    }

    /// Whether this sender has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Consumer half of a swap mailbox
#[derive(Debug)]
pub struct SwapReceiver {
    slots: Slots,
}

impl SwapReceiver {
    /// Take a pending event without waiting
    pub fn try_recv(&self) -> Option<SwapEvent> {
        let slots = self.slots.lock().clone();
        slots.iter().find_map(|slot| slot.try_recv().ok())
    }

    /// Wait up to `timeout` for an event from any sender
    ///
    /// [`RecvTimeoutError::Disconnected`] means every sender is gone and
    /// nothing is left to consume.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<SwapEvent, RecvTimeoutError> {
        let deadline = Instant::now() + timeout;
        loop {
            // Snapshot so senders can fork while we wait
            let slots = self.slots.lock().clone();
            if slots.is_empty() {
                return Err(RecvTimeoutError::Disconnected);
            }

            let mut select = Select::new();
            for slot in &slots {
                select.recv(slot);
            }
            let Ok(operation) = select.select_deadline(deadline) else {
                return Err(RecvTimeoutError::Timeout);
            };

            let index = operation.index();
            match operation.recv(&slots[index]) {
                Ok(event) => return Ok(event),
                Err(_) => {
                    trace!(index, "Swap sender slot disconnected");
                    self.slots
                        .lock()
                        .retain(|slot| !slot.same_channel(&slots[index]));
                }
            }
        }
    }
}
