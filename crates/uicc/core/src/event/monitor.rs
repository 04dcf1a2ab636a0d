//! Dedicated consumer thread for swap events

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::event::{SwapPrompt, SwapReceiver};

/// Monitor that forwards swap events to a prompt on its own thread
#[derive(Debug)]
pub struct SwapMonitor {
    /// Whether the monitor is running
    running: Arc<Mutex<bool>>,
    /// Consumer thread, taken on stop
    thread: Option<JoinHandle<()>>,
}

impl SwapMonitor {
    /// Start consuming `receiver`, waking every `poll_interval` to check for stop
    pub fn spawn<P>(receiver: SwapReceiver, mut prompt: P, poll_interval: Duration) -> Self
    where
        P: SwapPrompt + 'static,
    {
        let running = Arc::new(Mutex::new(true));
        let flag = Arc::clone(&running);

        let thread = thread::spawn(move || {
            debug!("Swap monitor started");
            loop {
                if !*flag.lock() {
                    break;
                }

                match receiver.recv_timeout(poll_interval) {
                    Ok(event) => {
                        info!(%event, "Requesting restart prompt");
                        prompt.show_swap_prompt(event);
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => {
                        debug!("All swap senders dropped");
                        break;
                    }
                }
            }
            debug!("Swap monitor stopped");
        });

        Self {
            running,
            thread: Some(thread),
        }
    }

    /// Whether the consumer thread is still running
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Wait for the thread to drain the mailbox and exit
    ///
    /// Returns once every sender has been dropped.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Swap prompt panicked");
            }
        }
    }

    /// Stop monitoring and wait for the thread to exit
    pub fn stop(&mut self) {
        *self.running.lock() = false;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Swap prompt panicked");
            }
        }
    }
}

impl Drop for SwapMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
