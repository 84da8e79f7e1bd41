use std::collections::HashMap;

/// Occurrence counter of a single dump.
///
/// Maps every destination seen so far to the number of probes that reported
/// it. Counts only ever grow, and an entry exists only once it was seen, so
/// every stored count is at least 1.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tally(HashMap<String, usize>);

impl Tally {
    /// Create an empty tally
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more sighting of `destination` and return its new count
    pub(crate) fn record(&mut self, destination: &str) -> usize {
        let seen = self.0.entry(destination.to_string()).or_insert(0);
        *seen += 1;
        *seen
    }

    /// How often `destination` was seen; 0 if never
    #[must_use]
    pub fn get(&self, destination: &str) -> usize {
        self.0.get(destination).copied().unwrap_or(0)
    }

    /// True iff every recorded destination was seen at least `threshold` times.
    ///
    /// Vacuously true for an empty tally.
    #[must_use]
    pub fn all_at_least(&self, threshold: usize) -> bool {
        self.0.values().all(|&seen| seen >= threshold)
    }

    /// Number of distinct destinations
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was recorded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of successful probes, i.e. the sum of all counts
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Iterate over `(destination, seen)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(d, &seen)| (d.as_str(), seen))
    }

    /// Drain the tally into its destinations
    #[must_use]
    pub fn into_destinations(self) -> Vec<String> {
        self.0.into_iter().map(|(d, _)| d).collect()
    }
}
