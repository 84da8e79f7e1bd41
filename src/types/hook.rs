use std::{fmt, sync::Arc};

/// Progress notification, called once per successful probe with the
/// destination and its updated seen-count.
///
/// The hook runs synchronously on the dump loop. Anything slow inside it
/// stalls the dump, so consumers living in another task should forward the
/// values through a non-blocking channel (e.g. `mpsc::Sender::try_send`).
#[derive(Clone)]
pub struct Hook(Arc<dyn Fn(&str, usize) + Send + Sync>);

impl Hook {
    /// Wrap a notification callback
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, usize) + Send + Sync + 'static,
    {
        Hook(Arc::new(f))
    }

    /// A hook that ignores every notification
    #[must_use]
    pub fn none() -> Self {
        Self::new(|_, _| {})
    }

    pub(crate) fn notify(&self, destination: &str, seen: usize) {
        (self.0)(destination, seen);
    }
}

impl Default for Hook {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook")
    }
}
