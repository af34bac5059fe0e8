use std::sync::atomic::{AtomicU64, Ordering};

use tic_common::TransferError;

use crate::Result;

/// Generation counter for the request currently being prepared.
///
/// Every `begin` supersedes earlier requests: their completions are dropped
/// and their prepared transfers can no longer be signed.
#[derive(Debug, Default)]
pub struct TransferSession {
    generation: AtomicU64,
}

impl TransferSession {
    pub fn new() -> Self {
        TransferSession::default()
    }

    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }

    /// Invalidates whatever is in flight, e.g. when the user edits the form.
    pub fn supersede(&self) {
        let generation = self.begin();
        log::info!("transfer session superseded, generation {}", generation);
    }

    pub fn ensure_current(&self, generation: u64) -> Result<()> {
        tic_ensure!(self.is_current(generation), TransferError::Superseded);
        Ok(())
    }
}
