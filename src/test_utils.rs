#![cfg(test)]

use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use crate::Tally;

/// A redirect response pointing to `location`
pub(crate) fn redirect_to(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("Location", location)
}

/// Build a tally from `(destination, seen)` pairs
pub(crate) fn tally(entries: &[(&str, usize)]) -> Tally {
    let mut tally = Tally::new();
    for (destination, seen) in entries {
        for _ in 0..*seen {
            tally.record(destination);
        }
    }
    tally
}

/// Answers with the given responses in turn, starting over after the last.
/// Models a split link rotating over its destinations.
pub(crate) struct Sequence {
    templates: Vec<ResponseTemplate>,
    next: AtomicUsize,
}

impl Sequence {
    pub(crate) fn new(templates: Vec<ResponseTemplate>) -> Self {
        assert!(!templates.is_empty(), "Sequence needs at least one response");
        Sequence {
            templates,
            next: AtomicUsize::new(0),
        }
    }

    pub(crate) fn rotating(destinations: &[&str]) -> Self {
        Self::new(destinations.iter().map(|d| redirect_to(d)).collect())
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.templates[i % self.templates.len()].clone()
    }
}

/// Mock server answering every request on `/` with `responder`
pub(crate) async fn get_mock_server<R>(responder: R) -> MockServer
where
    R: Respond + 'static,
{
    let mock_server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(responder)
        .mount(&mock_server)
        .await;
    mock_server
}

/// Number of requests `mock_server` has seen so far
pub(crate) async fn requests(mock_server: &MockServer) -> usize {
    mock_server
        .received_requests()
        .await
        .map_or(0, |requests| requests.len())
}
