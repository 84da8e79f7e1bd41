use log::debug;
use reqwest::header;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{ErrorKind, Result};

/// Issues a single probe and extracts the destination it points to.
///
/// The client must carry the redirect policy matching `full_trace`
/// (see [`crate::redirect`]).
#[derive(Debug, Clone)]
pub(crate) struct Resolver {
    reqwest_client: reqwest::Client,
    full_trace: bool,
}

impl Resolver {
    pub(crate) fn new(reqwest_client: reqwest::Client, full_trace: bool) -> Self {
        Resolver {
            reqwest_client,
            full_trace,
        }
    }

    /// Probe `url` once with a `HEAD` request.
    ///
    /// Without full trace, the destination is the `Location` header of the
    /// last response the client handed back, exactly as sent by the server.
    /// With full trace, it is the URL of the last request that was executed.
    /// A cancelled token aborts the request in flight.
    pub(crate) async fn resolve(&self, url: &Url, cancel: &CancellationToken) -> Result<String> {
        let request = self.reqwest_client.head(url.clone()).send();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ErrorKind::Cancelled),
            response = request => response?,
        };
        debug!("Probe of {} answered with {}", url, response.status());

        // HEAD responses carry no body; dropping the response closes it unread
        let destination = if self.full_trace {
            if response.url() == url {
                String::new()
            } else {
                response.url().to_string()
            }
        } else {
            match response.headers().get(header::LOCATION) {
                Some(location) => location.to_str()?.to_string(),
                None => String::new(),
            }
        };

        if destination.is_empty() {
            return Err(ErrorKind::EmptyDestination);
        }
        Ok(destination)
    }
}
