//! Dumping of split links.
//!
//! This module defines two structs, [`Dumper`] and [`DumperBuilder`].
//! `DumperBuilder` collects the configuration, `Dumper` runs the probe loop:
//! probe, count, notify, ask the breaker, check for cancellation, wait,
//! repeat.
use derive_builder::Builder;
use http::header::{self, HeaderMap, HeaderValue};
use log::{debug, info, warn};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    redirect, resolver::Resolver, Breaker, ErrorKind, Hook, Report, Result, Tally, Wait,
};

/// Default client timeout, 10 seconds
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default user agent, `splitdump/<PKG_VERSION>`
pub const DEFAULT_USER_AGENT: &str = concat!("splitdump/", env!("CARGO_PKG_VERSION"));

/// Dumps split links with a fixed configuration.
///
/// A `Dumper` can be reused; every call to [`Dumper::dump`] starts with an
/// empty tally.
#[derive(Debug, Clone)]
pub struct Dumper {
    resolver: Resolver,
    breaker: Breaker,
    cancel: CancellationToken,
    wait: Wait,
    hook: Hook,
}

/// Configuration of a [`Dumper`].
///
/// Every field is optional; unset fields fall back to a default when
/// calling `build`.
#[derive(Builder, Debug)]
#[builder(build_fn(skip))]
#[builder(setter(into))]
#[builder(name = "DumperBuilder")]
pub struct DumperBuilderInternal {
    /// Response timeout per probe
    timeout: Duration,
    /// Sent with every probe, defaults to [`DEFAULT_USER_AGENT`]
    user_agent: String,
    /// Accept invalid TLS certificates
    allow_insecure: bool,
    /// Extra headers sent with every probe
    custom_headers: HeaderMap,
    /// Follow redirects across hosts up to the final destination
    full_trace: bool,
    /// Halting check, defaults to [`Breaker::Conservative`]
    breaker: Breaker,
    /// Stops the dump from the outside
    cancel: CancellationToken,
    /// Pause between probes
    wait: Wait,
    /// Progress notification after every probe
    hook: Hook,
}

impl DumperBuilder {
    /// Build the [`Dumper`] and its HTTP client
    pub fn build(&mut self) -> Result<Dumper> {
        let mut headers = HeaderMap::new();

        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        headers.insert(header::USER_AGENT, HeaderValue::from_str(&user_agent)?);
        if let Some(custom) = &self.custom_headers {
            headers.extend(custom.clone());
        }

        let full_trace = self.full_trace.unwrap_or(false);

        let reqwest_client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .danger_accept_invalid_certs(self.allow_insecure.unwrap_or(false))
            .redirect(redirect::policy(full_trace))
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(ErrorKind::BuildClient)?;

        Ok(Dumper {
            resolver: Resolver::new(reqwest_client, full_trace),
            breaker: self.breaker.clone().unwrap_or_default(),
            cancel: self.cancel.clone().unwrap_or_else(CancellationToken::new),
            wait: self.wait.clone().unwrap_or_default(),
            hook: self.hook.clone().unwrap_or_default(),
        })
    }
}

impl Dumper {
    /// Probe `url` until the breaker is satisfied that every destination
    /// has been seen at least `limit` times.
    ///
    /// Returns an error without sending any request if `url` is malformed
    /// or `limit` is 0. Failures while probing end the dump early; the
    /// returned [`Report`] then carries the error next to the destinations
    /// found so far. Cancellation always surfaces as
    /// [`ErrorKind::Cancelled`].
    ///
    /// There is no upper bound on the number of probes. A link that keeps
    /// producing new destinations is probed until it fails or is cancelled.
    pub async fn dump(&self, url: &str, limit: usize) -> Result<Report> {
        let url = parse_url(url)?;
        if limit == 0 {
            return Err(ErrorKind::InvalidLimit);
        }
        info!("Dumping {} until every destination was seen {} times", url, limit);

        let mut tally = Tally::new();
        let error = loop {
            let destination = match self.resolver.resolve(&url, &self.cancel).await {
                Ok(destination) => destination,
                Err(e) => {
                    warn!("Probe of {} failed after {} probes: {}", url, tally.total(), e);
                    break Some(e);
                }
            };

            let seen = tally.record(&destination);
            debug!("Saw {} ({} times)", destination, seen);
            self.hook.notify(&destination, seen);

            if self.breaker.should_halt(limit, &destination, &tally) {
                info!(
                    "Found {} destinations of {} after {} probes",
                    tally.len(),
                    url,
                    tally.total()
                );
                break None;
            }
            if self.cancel.is_cancelled() {
                break Some(ErrorKind::Cancelled);
            }
            self.wait.wait().await;
        };

        Ok(Report::new(tally, error))
    }
}

/// Dump `url` with the default configuration.
///
/// See [`Dumper::dump`].
pub async fn dump(url: &str, limit: usize) -> Result<Report> {
    DumperBuilder::default().build()?.dump(url, limit).await
}

fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| ErrorKind::InvalidUrl(url.to_string(), e))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ErrorKind::InvalidUrlHost(url.to_string()));
    }
    Ok(parsed)
}
