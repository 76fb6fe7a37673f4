use {
    std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    tokio::sync::Notify,
};

/// A shared stop signal for orderly shutdown.
///
/// All clones observe the same flag. Loops check `is_raised()` at their
/// checkpoints, or await `raised()` while parked on I/O. Once raised, the
/// signal stays raised.
#[derive(Clone, Debug, Default)]
pub struct Stop {
    inner: Arc<StopInner>,
}

#[derive(Debug, Default)]
struct StopInner {
    raised: AtomicBool,
    notify: Notify,
}

impl Stop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal and wake every task waiting in `raised()`.
    pub fn raise(&self) {
        if !self.inner.raised.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_raised(&self) -> bool {
        self.inner.raised.load(Ordering::SeqCst)
    }

    /// Resolve once the signal is raised.
    pub async fn raised(&self) {
        loop {
            // register before checking so a concurrent raise() is not missed
            let notified = self.inner.notify.notified();
            if self.is_raised() {
                return;
            }
            notified.await;
        }
    }
}
