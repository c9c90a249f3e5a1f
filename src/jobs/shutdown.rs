//! Cooperative shutdown signaling.
//!
//! One gate instance is shared by every in-flight executor. The transition
//! to shutting down is one-way: once requested, the gate reads as shutting
//! down for the rest of the process. Executors poll it at safe checkpoints
//! and resolve their current job as cancelled instead of starting more
//! work; nothing is ever interrupted mid-write.

use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide build stop flag.
///
/// Reads and writes use relaxed ordering: the flag is a monotonic
/// latest-wins signal with no data published alongside it, and a stale
/// `false` only delays cancellation until the reader's next checkpoint.
#[derive(Debug, Default)]
pub struct ShutdownGate {
    shutting_down: AtomicBool,
}

impl ShutdownGate {
    pub fn new() -> Self {
        Self {
            shutting_down: AtomicBool::new(false),
        }
    }

    /// Flip the gate. Idempotent; there is no way back.
    pub fn request_shutdown(&self) {
        self.shutting_down.store(true, Ordering::Relaxed);
    }

    /// Poll the gate.
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_gate_starts_running() {
        let gate = ShutdownGate::new();
        assert!(!gate.is_shutting_down());
    }

    #[test]
    fn test_request_shutdown_flips_once_and_stays() {
        let gate = ShutdownGate::new();
        gate.request_shutdown();
        assert!(gate.is_shutting_down());
        gate.request_shutdown();
        assert!(gate.is_shutting_down());
    }

    #[test]
    fn test_gate_is_visible_across_threads() {
        let gate = Arc::new(ShutdownGate::new());
        let writer = Arc::clone(&gate);
        let handle = std::thread::spawn(move || {
            writer.request_shutdown();
        });
        handle.join().unwrap();
        assert!(gate.is_shutting_down());
    }
}
