//! Which redirects the HTTP client follows on its own.
//!
//! Without full trace, the client only follows hops that stay on the host of
//! the probed URL. The first hop to another host is not executed; its
//! `Location` header is read by the resolver instead. With full trace every
//! hop is followed. Both modes give up after [`MAX_REDIRECTS`] requests.
use reqwest::redirect::{Attempt, Policy};
use url::Url;

/// Maximum number of requests per probe before a redirect chain is deemed
/// malicious or circular
pub const MAX_REDIRECTS: usize = 10;

/// What to do with the next redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hop {
    /// Let the client request the next URL
    Follow,
    /// Hand the redirect response back untouched
    Stop,
    /// The chain is too long, fail the request
    TooMany,
}

/// Decide about the redirect to `next`, given the URLs requested so far
/// (`previous[0]` being the probed URL)
#[must_use]
pub fn next_hop(previous: &[Url], next: &Url, full_trace: bool) -> Hop {
    if previous.len() >= MAX_REDIRECTS {
        return Hop::TooMany;
    }
    if full_trace {
        return Hop::Follow;
    }
    match previous.first() {
        Some(origin) if same_host(origin, next) => Hop::Follow,
        _ => Hop::Stop,
    }
}

/// Hosts are equal if host and explicit port match. The scheme is ignored,
/// so an upgrade from `http` to `https` stays on the same host.
#[must_use]
pub fn same_host(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port() == b.port()
}

/// Build the reqwest redirect policy for the given trace mode
pub(crate) fn policy(full_trace: bool) -> Policy {
    Policy::custom(move |attempt: Attempt| {
        let hop = next_hop(attempt.previous(), attempt.url(), full_trace);
        match hop {
            Hop::Follow => attempt.follow(),
            Hop::Stop => attempt.stop(),
            Hop::TooMany => attempt.error(format!("stopped after {} redirects", MAX_REDIRECTS)),
        }
    })
}
