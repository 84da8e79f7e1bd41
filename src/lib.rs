#![warn(missing_docs)]

/*!
`splitdump` finds every destination of a split link.

A split link redirects to one of several destinations, often picking a
different one on every request. `splitdump` keeps probing the link and
counting the destinations it is sent to, until a [`Breaker`] decides that
every destination has been seen often enough.

The main struct of this crate is [`DumperBuilder`], which configures
and builds a [`Dumper`].

"Hello world" example:
```no_run
use splitdump::{Breaker, DumperBuilder};
use std::error::Error;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let dumper = DumperBuilder::default()
        .breaker(Breaker::Eager)
        .wait(Duration::from_millis(50))
        .build()?;
    let report = dumper.dump("https://split.to/example", 3).await?;
    for destination in report.destinations() {
        println!("{}", destination);
    }
    if let Some(e) = report.error() {
        eprintln!("Incomplete: {}", e);
    }
    Ok(())
}
```
*/
mod breaker;
mod dumper;
mod resolver;
mod types;

pub mod redirect;
#[cfg(test)]
mod test_utils;

pub use breaker::{Breaker, BreakerFn};
pub use dumper::{dump, Dumper, DumperBuilder, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use tokio_util::sync::CancellationToken;
pub use types::*;
