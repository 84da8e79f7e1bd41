use console::style;
use serde::{Serialize, Serializer};

use crate::options::Format;
use splitdump::{ErrorKind, Report};

/// Result of dumping one URL, as shown to the user
#[derive(Debug, Serialize)]
pub(crate) struct Outcome {
    pub url: String,
    pub destinations: Vec<String>,
    #[serde(serialize_with = "error_or_empty")]
    pub error: Option<String>,
    #[serde(skip)]
    pub cancelled: bool,
}

impl Outcome {
    pub(crate) fn new(url: &str, result: splitdump::Result<Report>) -> Self {
        let (mut destinations, error) = match result {
            Ok(report) => report.into_parts(),
            Err(e) => (Vec::new(), Some(e)),
        };
        destinations.sort();
        Outcome {
            url: url.to_string(),
            destinations,
            cancelled: error.as_ref().map_or(false, ErrorKind::is_cancelled),
            error: error.map(|e| e.to_string()),
        }
    }

    fn error_line(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|e| format!(r#"Error dumping domain on "{}": {}"#, self.url, e))
    }
}

/// A clean dump has an empty error string rather than `null`
fn error_or_empty<S>(error: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(error.as_deref().unwrap_or(""))
}

/// Renders the progress of a run. An empty string means nothing to print.
pub(crate) trait Formatter {
    /// Called before a URL is dumped
    fn start(&self, url: &str) -> String;
    /// Called after a URL is dumped
    fn result(&self, outcome: &Outcome) -> String;
    /// Called once all URLs are done
    fn complete(&self, outcomes: &[Outcome]) -> anyhow::Result<String>;
}

pub(crate) fn formatter(format: Format) -> Box<dyn Formatter> {
    match format {
        Format::Text => Box::new(Text),
        Format::Raw => Box::new(Raw),
        Format::Json => Box::new(Json),
    }
}

/// Human readable output
struct Text;

impl Formatter for Text {
    fn start(&self, url: &str) -> String {
        format!("Dumping urls from: {}", url)
    }

    fn result(&self, outcome: &Outcome) -> String {
        let mut lines = Vec::new();
        let mut found = format!("Found {} destinations:", outcome.destinations.len());
        if let Some(error) = outcome.error_line() {
            lines.push(style(error).red().bright().to_string());
            found = format!("(Incomplete){}", found);
        }
        lines.push(found);
        lines.extend(outcome.destinations.iter().cloned());
        lines.join("\n")
    }

    fn complete(&self, outcomes: &[Outcome]) -> anyhow::Result<String> {
        if outcomes.len() <= 1 {
            return Ok(String::new());
        }
        let total: usize = outcomes.iter().map(|o| o.destinations.len()).sum();
        Ok(format!("Dumped {} urls", total))
    }
}

/// Destinations only, one per line
struct Raw;

impl Formatter for Raw {
    fn start(&self, _url: &str) -> String {
        String::new()
    }

    fn result(&self, outcome: &Outcome) -> String {
        let mut lines = outcome.destinations.clone();
        lines.extend(outcome.error_line());
        lines.join("\n")
    }

    fn complete(&self, _outcomes: &[Outcome]) -> anyhow::Result<String> {
        Ok(String::new())
    }
}

/// A single JSON array, written once all URLs are done
struct Json;

impl Formatter for Json {
    fn start(&self, _url: &str) -> String {
        String::new()
    }

    fn result(&self, _outcome: &Outcome) -> String {
        String::new()
    }

    fn complete(&self, outcomes: &[Outcome]) -> anyhow::Result<String> {
        Ok(serde_json::to_string(outcomes)?)
    }
}
