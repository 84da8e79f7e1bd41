use anyhow::{anyhow, Error, Result};
use lazy_static::lazy_static;
use serde::Deserialize;
use std::str::FromStr;
use std::{fs, io::ErrorKind, path::PathBuf};
use structopt::StructOpt;

use splitdump::DEFAULT_USER_AGENT;

const LIMIT: usize = 3;
const TIMEOUT: u64 = 5;
const WAIT: u64 = 50;
const BREAKER: &str = "conservative";

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Text,
    Raw,
    Json,
}

impl FromStr for Format {
    type Err = Error;
    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format {
            "text" => Ok(Format::Text),
            "raw" => Ok(Format::Raw),
            "json" => Ok(Format::Json),
            _ => Err(anyhow!("Could not parse format {}", format)),
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::Text
    }
}

// this exists because structopt requires `&str` type values for defaults
// (we can't use e.g. `TIMEOUT` or `timeout()` which gets created for serde)
lazy_static! {
    static ref LIMIT_STR: String = LIMIT.to_string();
    static ref TIMEOUT_STR: String = TIMEOUT.to_string();
    static ref WAIT_STR: String = WAIT.to_string();
}

// Macro for generating default functions to be used by serde
macro_rules! default_function {
    ( $( $name:ident : $T:ty = $e:expr; )* ) => {
        $(
            fn $name() -> $T {
                $e
            }
        )*
    };
}

// Generate the functions for serde defaults
default_function! {
    limit: usize = LIMIT;
    timeout: u64 = TIMEOUT;
    wait: u64 = WAIT;
    breaker: String = BREAKER.to_string();
    user_agent: String = DEFAULT_USER_AGENT.to_string();
}

// Macro for merging configuration values
macro_rules! fold_in {
    ( $cli:ident , $toml:ident ; $( $key:ident : $default:expr; )* ) => {
        $(
            if $cli.$key == $default && $toml.$key != $default {
                $cli.$key = $toml.$key;
            }
        )*
    };
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "splitdump",
    about = "Find every destination of a split link.\n\n\
             Probes each URL until every destination it redirects to was seen often enough."
)]
pub(crate) struct SplitdumpOptions {
    /// The split links to dump
    #[structopt(name = "urls", required = true, min_values = 1)]
    pub urls: Vec<String>,

    /// Configuration file to use
    #[structopt(short, long = "config", default_value = "./splitdump.toml")]
    pub config_file: String,

    #[structopt(flatten)]
    pub config: Config,
}

#[derive(Debug, Deserialize, StructOpt)]
pub struct Config {
    /// Verbose program output
    #[structopt(short, long)]
    #[serde(default)]
    pub verbose: bool,

    /// Do not show the progress spinner.
    /// This is recommended for non-interactive shells (e.g. for continuous
    /// integration)
    #[structopt(short, long)]
    #[serde(default)]
    pub no_progress: bool,

    /// How many times every destination has to be seen before stopping
    #[structopt(short, long, default_value = &LIMIT_STR)]
    #[serde(default = "limit")]
    pub limit: usize,

    /// Client timeout in seconds
    #[structopt(short, long, default_value = &TIMEOUT_STR)]
    #[serde(default = "timeout")]
    pub timeout: u64,

    /// Pause between two probes in milliseconds
    #[structopt(short, long, default_value = &WAIT_STR)]
    #[serde(default = "wait")]
    pub wait: u64,

    /// Follow redirects to the final destination
    /// (will access hosts other than the one of the URL)
    #[structopt(short, long = "full")]
    #[serde(default)]
    pub full_trace: bool,

    /// When to stop probing (conservative, eager)
    #[structopt(short, long, default_value = BREAKER)]
    #[serde(default = "breaker")]
    pub breaker: String,

    /// Output format (text, raw, json)
    #[structopt(short = "F", long, default_value = "text")]
    #[serde(default)]
    pub format: Format,

    /// Output file of the report
    #[structopt(short, long, parse(from_os_str))]
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// User agent
    #[structopt(short, long, default_value = DEFAULT_USER_AGENT)]
    #[serde(default = "user_agent")]
    pub user_agent: String,

    /// Proceed for server connections considered insecure (invalid TLS)
    #[structopt(short, long)]
    #[serde(default)]
    pub insecure: bool,

    /// Custom request headers, e.g. `accept=text/html`
    #[structopt(short = "H", long, number_of_values = 1)]
    #[serde(default)]
    pub headers: Vec<String>,

    /// Number of threads to utilize.
    /// Defaults to number of cores available to the system
    #[structopt(short = "T", long)]
    #[serde(default)]
    pub threads: Option<usize>,
}

impl Config {
    /// Load configuration from a file
    pub(crate) fn load_from_file(path: &str) -> Result<Option<Config>> {
        // Read configuration file
        let result = fs::read(path);

        // Ignore a file not found error
        let contents = match result {
            Ok(c) => c,
            Err(e) => {
                return match e.kind() {
                    ErrorKind::NotFound => Ok(None),
                    _ => Err(Error::from(e)),
                }
            }
        };

        Ok(Some(toml::from_slice(&contents)?))
    }

    /// Merge the configuration from TOML into the CLI configuration
    pub(crate) fn merge(&mut self, toml: Config) {
        fold_in! {
            // Destination and source configs
            self, toml;

            // Keys with defaults to assign
            verbose: false;
            no_progress: false;
            limit: LIMIT;
            timeout: TIMEOUT;
            wait: WAIT;
            full_trace: false;
            breaker: BREAKER;
            format: Format::Text;
            output: None;
            user_agent: DEFAULT_USER_AGENT;
            insecure: false;
            headers: Vec::<String>::new();
            threads: None;
        }
    }
}
