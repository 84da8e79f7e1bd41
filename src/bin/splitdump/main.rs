use anyhow::{anyhow, Context, Result};
use http::header::{HeaderMap, HeaderName};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::{fs, path::PathBuf, time::Duration};
use structopt::StructOpt;
use tokio::sync::mpsc::{self, Receiver};

mod format;
mod options;

use crate::format::Outcome;
use crate::options::{Config, SplitdumpOptions};

use splitdump::{Breaker, CancellationToken, DumperBuilder, Hook};

/// Room for progress notifications the spinner has not drawn yet.
/// Notifications beyond that are dropped instead of stalling the dump.
const PROGRESS_BUFFER: usize = 32;

/// A C-like enum that can be cast to `i32` and used as process exit code.
enum ExitCode {
    Success = 0,
    // NOTE: exit code 1 is used for any `Result::Err` bubbled up to `main()` using the `?` operator.
    #[allow(unused)]
    UnexpectedFailure = 1,
    DumpFailure = 2,
}

fn main() -> Result<()> {
    env_logger::init();
    // std::process::exit doesn't guarantee that all destructors will be ran,
    // therefore we wrap "main" code in another function to guarantee that.
    let exit_code = run_main()?;
    std::process::exit(exit_code);
}

fn run_main() -> Result<i32> {
    let mut opts = SplitdumpOptions::from_args();

    // Load a potentially existing config file and merge it into the config from the CLI
    if let Some(c) = Config::load_from_file(&opts.config_file)? {
        opts.config.merge(c)
    }
    let cfg = &opts.config;

    let runtime = match cfg.threads {
        Some(threads) => {
            // We define our own runtime instead of the `tokio::main` attribute
            // since we want to make the number of threads configurable
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(threads)
                .enable_all()
                .build()?
        }
        None => tokio::runtime::Runtime::new()?,
    };

    runtime.block_on(run(cfg, &opts.urls))
}

/// Where formatted output ends up
struct Output {
    progress_bar: Option<ProgressBar>,
    file: Option<PathBuf>,
    buffer: Vec<String>,
}

impl Output {
    fn emit(&mut self, out: String) {
        if out.is_empty() {
            return;
        }
        if self.file.is_some() {
            self.buffer.push(out);
        } else if let Some(pb) = &self.progress_bar {
            // regular println! interferes with progress bar
            pb.println(out);
        } else {
            println!("{}", out);
        }
    }

    fn finish(self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_and_clear();
        }
        if let Some(path) = &self.file {
            fs::write(path, self.buffer.join("\n"))
                .context("Cannot write dump output to file")?;
        }
        Ok(())
    }
}

async fn show_progress(
    mut recv: Receiver<(String, usize)>,
    progress_bar: Option<ProgressBar>,
    verbose: bool,
) {
    while let Some((destination, seen)) = recv.recv().await {
        let out = format!("Saw {}: {}", seen, destination);
        if let Some(pb) = &progress_bar {
            pb.inc(1);
            pb.set_message(&out);
            if verbose {
                pb.println(out);
            }
        } else if verbose {
            println!("{}", out);
        }
    }
}

/// Cancel the dumps on Ctrl-C
fn handle_exit(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Received Ctrl-C, cancelling");
            cancel.cancel();
        }
    });
}

async fn run(cfg: &Config, urls: &[String]) -> Result<i32> {
    let headers = parse_headers(&cfg.headers)?;
    let breaker: Breaker = cfg.breaker.parse()?;

    let cancel = CancellationToken::new();
    handle_exit(cancel.clone());

    let pb = match cfg.no_progress {
        true => None,
        false => {
            let bar = ProgressBar::new_spinner().with_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.red.bright} {pos:.dim} probes [{elapsed_precise}] {wide_msg}"),
            );
            bar.enable_steady_tick(100);
            Some(bar)
        }
    };

    let (send_progress, recv_progress) = mpsc::channel(PROGRESS_BUFFER);
    let progress = tokio::spawn(show_progress(recv_progress, pb.clone(), cfg.verbose));

    let dumper = DumperBuilder::default()
        .timeout(Duration::from_secs(cfg.timeout))
        .user_agent(cfg.user_agent.clone())
        .allow_insecure(cfg.insecure)
        .custom_headers(headers)
        .full_trace(cfg.full_trace)
        .breaker(breaker)
        .cancel(cancel)
        .wait(Duration::from_millis(cfg.wait))
        .hook(Hook::new(move |destination, seen| {
            // Never block the dump on a slow terminal
            let _ = send_progress.try_send((destination.to_string(), seen));
        }))
        .build()?;

    let formatter = format::formatter(cfg.format);
    let mut output = Output {
        progress_bar: pb,
        file: cfg.output.clone(),
        buffer: Vec::new(),
    };

    let mut outcomes = Vec::with_capacity(urls.len());
    for url in urls {
        output.emit(formatter.start(url));
        let outcome = Outcome::new(url, dumper.dump(url, cfg.limit).await);
        output.emit(formatter.result(&outcome));

        let cancelled = outcome.cancelled;
        outcomes.push(outcome);
        if cancelled {
            break;
        }
    }

    // Dropping the dumper drops the hook and closes the progress channel
    drop(dumper);
    progress.await?;

    output.emit(formatter.complete(&outcomes)?);
    output.finish()?;

    match outcomes.iter().any(|o| o.error.is_some()) {
        true => Ok(ExitCode::DumpFailure as i32),
        false => Ok(ExitCode::Success as i32),
    }
}

fn read_header(input: &str) -> Result<(String, String)> {
    let elements: Vec<_> = input.split('=').collect();
    if elements.len() != 2 {
        return Err(anyhow!(
            "Header value should be of the form key=value, got {}",
            input
        ));
    }
    Ok((elements[0].into(), elements[1].into()))
}

fn parse_headers<T: AsRef<str>>(headers: &[T]) -> Result<HeaderMap> {
    let mut out = HeaderMap::new();
    for header in headers {
        let (key, val) = read_header(header.as_ref())?;
        out.insert(HeaderName::from_bytes(key.as_bytes())?, val.parse()?);
    }
    Ok(out)
}
