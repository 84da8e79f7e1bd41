use super::{ErrorKind, Tally};

/// Outcome of one dump.
///
/// Holds every destination observed before the dump stopped. If [`error`]
/// is set, the dump ended early and the destinations may be incomplete.
///
/// [`error`]: Report::error
#[derive(Debug)]
pub struct Report {
    tally: Tally,
    error: Option<ErrorKind>,
}

impl Report {
    pub(crate) fn new(tally: Tally, error: Option<ErrorKind>) -> Self {
        Report { tally, error }
    }

    /// Distinct destinations, in no particular order
    #[must_use]
    pub fn destinations(&self) -> Vec<&str> {
        self.tally.iter().map(|(d, _)| d).collect()
    }

    /// How often the resolver reported `destination`
    #[must_use]
    pub fn seen(&self, destination: &str) -> usize {
        self.tally.get(destination)
    }

    /// Number of probes that produced a destination
    #[must_use]
    pub fn probes(&self) -> usize {
        self.tally.total()
    }

    /// Counts of every destination
    #[must_use]
    pub const fn tally(&self) -> &Tally {
        &self.tally
    }

    /// Why the dump stopped early, if it did
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorKind> {
        self.error.as_ref()
    }

    /// The breaker halted the dump, no error occurred
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Split the report into its destinations and the terminal error
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Option<ErrorKind>) {
        (self.tally.into_destinations(), self.error)
    }
}
