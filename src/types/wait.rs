use futures::future::{self, BoxFuture, FutureExt};
use std::{fmt, future::Future, sync::Arc, time::Duration};

/// Pause between two probes.
///
/// The callback returns a future, so pacing never blocks the runtime.
/// It is not called after the last probe of a dump.
#[derive(Clone)]
pub struct Wait(Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>);

impl Wait {
    /// Wrap a callback returning the future to await between probes
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Wait(Arc::new(move || f().boxed()))
    }

    /// Probe again right away
    #[must_use]
    pub fn none() -> Self {
        Self::new(|| future::ready(()))
    }

    /// Sleep for a fixed `duration` between probes
    #[must_use]
    pub fn fixed(duration: Duration) -> Self {
        if duration == Duration::from_secs(0) {
            return Self::none();
        }
        Self::new(move || tokio::time::sleep(duration))
    }

    pub(crate) async fn wait(&self) {
        (self.0)().await;
    }
}

impl Default for Wait {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Duration> for Wait {
    fn from(duration: Duration) -> Self {
        Self::fixed(duration)
    }
}

impl fmt::Debug for Wait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Wait")
    }
}
