use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::{EndpointTarget, HTTP_CODE_NONE, Outcome, epoch_seconds};
use crate::error::{AppError, AppResult, InvokeError};

use super::Invoke;
use super::client::{InvokerConfig, build_prefetch_client, build_request_client};
use super::command::Invocation;
use super::execution::{
    EXIT_FAILURE, EXIT_OK, EXIT_WRITE, describe_error, drain_body, exit_code_for,
};
use super::prefetch::{PrefetchOutcome, download_source};

const PREFETCH_FAILED_PREFIX: &str = "local_prefetch_failed";
const PREFETCH_FAILED_COMMAND: &str = "<local_prefetch_failed>";

/// reqwest-backed [`Invoke`] implementation.
#[derive(Debug)]
pub struct HttpInvoker {
    client: Client,
    prefetch_client: Client,
    token: Option<String>,
    tmp_dir: PathBuf,
    insecure: bool,
}

/// Transport-level view of one request.
#[derive(Debug)]
struct Exchange {
    exit_code: i32,
    http_code: u16,
    wire_time: Option<Duration>,
    bytes: u64,
    diagnostic: String,
    output_sample: String,
}

impl Exchange {
    const fn failed(exit_code: i32, http_code: u16, diagnostic: String) -> Self {
        Self {
            exit_code,
            http_code,
            wire_time: None,
            bytes: 0,
            diagnostic,
            output_sample: String::new(),
        }
    }
}

impl HttpInvoker {
    /// Builds the HTTP clients and makes sure the scratch directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the temp directory cannot be created or the
    /// HTTP client cannot be built.
    pub fn new(config: InvokerConfig) -> AppResult<Self> {
        std::fs::create_dir_all(&config.tmp_dir).map_err(|err| {
            AppError::invoke(InvokeError::CreateTmpDir {
                path: config.tmp_dir.clone(),
                source: err,
            })
        })?;
        let client = build_request_client(&config)?;
        let prefetch_client = build_prefetch_client(&config)?;
        Ok(Self {
            client,
            prefetch_client,
            token: config.token,
            tmp_dir: config.tmp_dir,
            insecure: !config.verify_tls,
        })
    }

    fn scratch_output(&self, target: &EndpointTarget) -> std::io::Result<NamedTempFile> {
        tempfile::Builder::new()
            .prefix(&format!("{}_", target.region))
            .suffix(".fits")
            .tempfile_in(&self.tmp_dir)
    }

    async fn exchange(&self, invocation: &Invocation, scratch: Option<&NamedTempFile>) -> Exchange {
        let request = match invocation.build_request(&self.client) {
            Ok(request) => request,
            Err(err) => {
                return Exchange::failed(exit_code_for(&err), HTTP_CODE_NONE, describe_error(&err));
            }
        };
        let mut output = match scratch.map(|file| file.as_file().try_clone()).transpose() {
            Ok(handle) => handle.map(File::from_std),
            Err(err) => {
                return Exchange::failed(
                    EXIT_WRITE,
                    HTTP_CODE_NONE,
                    format!("failed to open output file: {}", err),
                );
            }
        };

        let sent = Instant::now();
        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                return Exchange::failed(exit_code_for(&err), HTTP_CODE_NONE, describe_error(&err));
            }
        };
        let http_code = response.status().as_u16();
        match drain_body(response, output.as_mut()).await {
            Ok(body) => Exchange {
                exit_code: EXIT_OK,
                http_code,
                wire_time: Some(sent.elapsed()),
                bytes: body.bytes,
                diagnostic: String::new(),
                output_sample: body.sample,
            },
            Err(err) => Exchange::failed(err.exit_code(), http_code, err.describe()),
        }
    }
}

#[async_trait]
impl Invoke for HttpInvoker {
    async fn invoke(&self, target: &EndpointTarget) -> Outcome {
        let wall_start = Utc::now();
        let started = Instant::now();

        let mut prefetch_duration = Duration::ZERO;
        if target.needs_prefetch() {
            let prefetch =
                download_source(&self.prefetch_client, &target.local_source_url, &self.tmp_dir)
                    .await;
            prefetch_duration = prefetch.duration;
            if !prefetch.ok {
                warn!(
                    "Prefetch for {}/{} failed: {}",
                    target.function_type, target.region, prefetch.diagnostic
                );
                return prefetch_failure(wall_start, started, &prefetch);
            }
        }

        let (scratch, scratch_error) = if target.is_data_function() {
            match self.scratch_output(target) {
                Ok(file) => (Some(file), None),
                Err(err) => (None, Some(err)),
            }
        } else {
            (None, None)
        };
        let invocation = Invocation::new(
            target,
            self.token.as_deref(),
            scratch.as_ref().map(NamedTempFile::path),
            self.insecure,
        );
        let exchange = match scratch_error {
            Some(err) => Exchange::failed(
                EXIT_WRITE,
                HTTP_CODE_NONE,
                format!("failed to create output file in {}: {}", self.tmp_dir.display(), err),
            ),
            None => self.exchange(&invocation, scratch.as_ref()).await,
        };
        drop(scratch);

        let elapsed = started.elapsed();
        let outcome = assemble_outcome(
            wall_start,
            elapsed,
            prefetch_duration,
            exchange,
            invocation.redacted_command(),
        );
        if !outcome.success {
            debug!(
                "Request to {}/{} failed: {}",
                target.function_type,
                target.region,
                outcome.error.as_deref().unwrap_or_default()
            );
        }
        outcome
    }
}

fn assemble_outcome(
    wall_start: DateTime<Utc>,
    elapsed: Duration,
    prefetch: Duration,
    exchange: Exchange,
    command: String,
) -> Outcome {
    let wall_end = Utc::now();
    let prefetch_s = prefetch.as_secs_f64();
    let request_duration_s = exchange.wire_time.map_or_else(
        || (elapsed.as_secs_f64() - prefetch_s).max(0.0),
        |wire| wire.as_secs_f64(),
    );
    let success = Outcome::is_success(exchange.exit_code, exchange.http_code);
    let diagnostic = exchange.diagnostic.trim().to_owned();
    let error = if success {
        None
    } else if diagnostic.is_empty() {
        Some(format!("http_code={:03}", exchange.http_code))
    } else {
        Some(diagnostic.clone())
    };

    Outcome {
        ts_start: epoch_seconds(wall_start),
        ts_end: epoch_seconds(wall_end),
        timestamp: wall_end.to_rfc3339(),
        duration_s: prefetch_s + request_duration_s,
        request_duration_s,
        prefetch_duration_s: prefetch_s,
        http_code: exchange.http_code,
        bytes: exchange.bytes,
        exit_code: exchange.exit_code,
        success,
        error,
        diagnostic,
        output_sample: exchange.output_sample,
        command,
    }
}

fn prefetch_failure(
    wall_start: DateTime<Utc>,
    started: Instant,
    prefetch: &PrefetchOutcome,
) -> Outcome {
    let wall_end = Utc::now();
    let diagnostic = prefetch.diagnostic.trim().to_owned();
    let reason = if diagnostic.is_empty() {
        "unknown error"
    } else {
        diagnostic.as_str()
    };
    Outcome {
        ts_start: epoch_seconds(wall_start),
        ts_end: epoch_seconds(wall_end),
        timestamp: wall_end.to_rfc3339(),
        duration_s: started.elapsed().as_secs_f64(),
        request_duration_s: 0.0,
        prefetch_duration_s: prefetch.duration.as_secs_f64(),
        http_code: HTTP_CODE_NONE,
        bytes: 0,
        exit_code: EXIT_FAILURE,
        success: false,
        error: Some(format!("{}: {}", PREFETCH_FAILED_PREFIX, reason)),
        diagnostic: diagnostic.clone(),
        output_sample: String::new(),
        command: PREFETCH_FAILED_COMMAND.to_owned(),
    }
}
