mod error;
mod hook;
mod report;
mod tally;
mod wait;

pub use error::{ErrorKind, Result};
pub use hook::Hook;
pub use report::Report;
pub use tally::Tally;
pub use wait::Wait;
