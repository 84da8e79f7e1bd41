//! Halting checks for a dump.
//!
//! After every successful probe the dump asks its [`Breaker`] whether the
//! destinations seen so far are trustworthy enough to stop.
use anyhow::anyhow;
use std::{fmt, str::FromStr, sync::Arc};

use crate::Tally;

/// Signature of a user supplied halting check
pub type BreakerFn = dyn Fn(usize, &str, &Tally) -> bool + Send + Sync;

/// Decides when a dump stops.
///
/// A breaker looks at the user limit, the destination that was just seen and
/// the current tally, and returns `true` to halt. It has to be a pure
/// function: no side effects, no state kept between calls, same input same
/// answer. Breakers that keep their own state are not supported; the halting
/// point of a dump is only reproducible for pure breakers.
#[derive(Clone)]
pub enum Breaker {
    /// Halt once every known destination was seen at least `limit` times
    /// and the destination just seen was seen more than `limit` times
    Conservative,
    /// Halt once every known destination was seen at least `limit` times
    Eager,
    /// User supplied halting check
    Custom(Arc<BreakerFn>),
}

impl Breaker {
    /// Wrap a user supplied halting check
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(usize, &str, &Tally) -> bool + Send + Sync + 'static,
    {
        Breaker::Custom(Arc::new(f))
    }

    /// Returns `true` if the dump should stop
    #[must_use]
    pub fn should_halt(&self, limit: usize, destination: &str, tally: &Tally) -> bool {
        match self {
            Breaker::Conservative => {
                tally.all_at_least(limit) && tally.get(destination) > limit
            }
            Breaker::Eager => tally.all_at_least(limit),
            Breaker::Custom(f) => f(limit, destination, tally),
        }
    }
}

impl Default for Breaker {
    fn default() -> Self {
        Breaker::Conservative
    }
}

impl fmt::Debug for Breaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Breaker::Conservative => f.write_str("Conservative"),
            Breaker::Eager => f.write_str("Eager"),
            Breaker::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl FromStr for Breaker {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "conservative" => Ok(Breaker::Conservative),
            "eager" => Ok(Breaker::Eager),
            _ => Err(anyhow!(
                "Only `conservative` and `eager` allowed, got {}",
                s
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::tally;

    #[test]
    fn test_eager_halts_when_all_reach_limit() {
        let breaker = Breaker::Eager;
        assert!(!breaker.should_halt(2, "b", &tally(&[("a", 2), ("b", 1)])));
        assert!(breaker.should_halt(2, "b", &tally(&[("a", 2), ("b", 2)])));
        assert!(breaker.should_halt(2, "a", &tally(&[("a", 3), ("b", 2)])));
    }

    #[test]
    fn test_conservative_needs_extra_sighting() {
        let breaker = Breaker::Conservative;
        // All at the limit, but the last one is not above it
        assert!(!breaker.should_halt(2, "b", &tally(&[("a", 2), ("b", 2)])));
        assert!(breaker.should_halt(2, "a", &tally(&[("a", 3), ("b", 2)])));
        // The last one is above the limit, but another one lags behind
        assert!(!breaker.should_halt(2, "a", &tally(&[("a", 3), ("b", 1)])));
    }

    #[test]
    fn test_conservative_never_before_eager() {
        let tallies = [
            tally(&[("a", 1)]),
            tally(&[("a", 2)]),
            tally(&[("a", 3)]),
            tally(&[("a", 3), ("b", 1)]),
            tally(&[("a", 3), ("b", 2)]),
            tally(&[("a", 2), ("b", 3)]),
        ];
        for t in &tallies {
            for (destination, _) in t.iter() {
                if Breaker::Conservative.should_halt(2, destination, t) {
                    assert!(Breaker::Eager.should_halt(2, destination, t));
                }
            }
        }
    }

    #[test]
    fn test_breakers_are_idempotent() {
        let t = tally(&[("a", 3), ("b", 2)]);
        for breaker in &[Breaker::Conservative, Breaker::Eager] {
            let first = breaker.should_halt(2, "a", &t);
            assert_eq!(first, breaker.should_halt(2, "a", &t));
        }
    }

    #[test]
    fn test_custom_breaker() {
        let breaker = Breaker::custom(|_, _, tally| tally.len() >= 3);
        assert!(!breaker.should_halt(1, "b", &tally(&[("a", 1), ("b", 1)])));
        assert!(breaker.should_halt(1, "c", &tally(&[("a", 1), ("b", 1), ("c", 1)])));
    }

    #[test]
    fn test_breaker_from_str() {
        assert!(matches!("eager".parse::<Breaker>(), Ok(Breaker::Eager)));
        assert!(matches!(
            "Conservative".parse::<Breaker>(),
            Ok(Breaker::Conservative)
        ));
        assert!("sometimes".parse::<Breaker>().is_err());
    }
}
