use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A background thread that calls a closure on a fixed interval, and can
/// be woken early to shut down cleanly.
///
/// Modeled as a condvar-gated loop rather than a bare `sleep`, so
/// shutdown doesn't have to wait out a stale interval: `shutdown` (or
/// dropping the handle) wakes the thread immediately instead of after
/// up to `interval` more time has passed.
pub struct Sweeper {
    shutdown: Arc<(Mutex<bool>, Condvar)>,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawns the background thread, calling `on_wake` once per interval
    /// elapsed and once more, at most, after `shutdown` is requested.
    pub fn spawn<F>(interval: Duration, mut on_wake: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let shutdown = Arc::new((Mutex::new(false), Condvar::new()));
        let shutdown_thread = shutdown.clone();

        let handle = thread::Builder::new()
            .name("engine-sweeper".into())
            .spawn(move || {
                let (lock, cvar) = &*shutdown_thread;
                loop {
                    let terminated = lock.lock().expect("sweeper lock poisoned");
                    let (terminated, _timeout) = cvar
                        .wait_timeout(terminated, interval)
                        .expect("sweeper lock poisoned");
                    let should_stop = *terminated;
                    drop(terminated);

                    if should_stop {
                        tracing::debug!("sweeper thread shutting down");
                        break;
                    }

                    on_wake();
                }
            })
            .expect("failed to spawn sweeper thread");

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signals the background thread to stop and blocks until it exits.
    /// Idempotent: a second call is a no-op.
    pub fn shutdown(&mut self) {
        {
            let (lock, cvar) = &*self.shutdown;
            *lock.lock().expect("sweeper lock poisoned") = true;
            cvar.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.shutdown();
    }
}
