use thiserror::Error;

/// Possible errors when dumping a split link.
///
/// Configuration errors are returned before any request is sent.
/// Every other kind ends a running dump and travels inside the
/// [`Report`](crate::Report) next to the partial destinations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The given string can not be parsed into a valid URL
    #[error("Cannot parse {0} as url: {1}")]
    InvalidUrl(String, #[source] url::ParseError),
    /// The given URL does not carry a host to compare redirects against
    #[error("URL {0} is missing a host")]
    InvalidUrlHost(String),
    /// Every destination has to be seen at least once
    #[error("Limit must be at least 1")]
    InvalidLimit,
    /// A custom header or the user agent could not be turned into a header value
    #[error("Header could not be parsed.")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),
    /// reqwest refused the client configuration
    #[error("Cannot build HTTP client: {0}")]
    BuildClient(#[source] reqwest::Error),
    /// Network error while probing, including timeouts and redirect loops
    #[error("Network error: {0}")]
    NetworkRequest(#[from] reqwest::Error),
    /// The probe answered without naming a destination
    #[error("location is empty")]
    EmptyDestination,
    /// The `Location` header holds bytes that are not visible ASCII
    #[error("Location header is not a valid string: {0}")]
    InvalidLocation(#[from] http::header::ToStrError),
    /// The dump was stopped through its cancellation token
    #[error("Operation aborted by the user")]
    Cancelled,
}

impl ErrorKind {
    /// The canonical cancellation indicator, regardless of where the
    /// cancellation was noticed.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The request ran into the client timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::NetworkRequest(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// The configuration was rejected before probing started.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl(..)
                | Self::InvalidUrlHost(_)
                | Self::InvalidLimit
                | Self::InvalidHeader(_)
                | Self::BuildClient(_)
        )
    }

    /// The network call itself failed.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkRequest(_))
    }

    /// The server answered, but not with a usable destination.
    #[must_use]
    pub const fn is_protocol(&self) -> bool {
        matches!(self, Self::EmptyDestination | Self::InvalidLocation(_))
    }
}

/// The result type of every fallible operation in this crate
pub type Result<T> = std::result::Result<T, ErrorKind>;
