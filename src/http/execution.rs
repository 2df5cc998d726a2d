use std::error::Error as StdError;

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::domain::record::OUTPUT_SAMPLE_CHARS;

// Transport exit codes, numbered like curl's so raw records stay comparable.
pub(super) const EXIT_OK: i32 = 0;
pub(super) const EXIT_FAILURE: i32 = 1;
pub(super) const EXIT_MALFORMED_URL: i32 = 3;
pub(super) const EXIT_RESOLVE: i32 = 6;
pub(super) const EXIT_CONNECT: i32 = 7;
pub(super) const EXIT_WRITE: i32 = 23;
pub(super) const EXIT_TIMEOUT: i32 = 28;
pub(super) const EXIT_TOO_MANY_REDIRECTS: i32 = 47;
pub(super) const EXIT_RECV: i32 = 56;

/// Longest UTF-8 encoding of the sampled characters.
const SAMPLE_BYTES: usize = OUTPUT_SAMPLE_CHARS.saturating_mul(4);

#[derive(Debug, Default)]
pub(super) struct BodySummary {
    pub(super) bytes: u64,
    pub(super) sample: String,
}

#[derive(Debug)]
pub(super) enum BodyError {
    Transport(reqwest::Error),
    Write(std::io::Error),
}

impl BodyError {
    pub(super) fn exit_code(&self) -> i32 {
        match self {
            BodyError::Transport(err) => exit_code_for(err),
            BodyError::Write(_) => EXIT_WRITE,
        }
    }

    pub(super) fn describe(&self) -> String {
        match self {
            BodyError::Transport(err) => describe_error(err),
            BodyError::Write(err) => format!("failed writing body to output file: {}", err),
        }
    }
}

/// Streams the body to `output` (or nowhere), counting bytes.
pub(super) async fn drain_body(
    response: reqwest::Response,
    mut output: Option<&mut File>,
) -> Result<BodySummary, BodyError> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    let mut head: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(BodyError::Transport)?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
        if head.len() < SAMPLE_BYTES {
            let take = SAMPLE_BYTES.saturating_sub(head.len()).min(bytes.len());
            if let Some(prefix) = bytes.get(..take) {
                head.extend_from_slice(prefix);
            }
        }
        if let Some(file) = output.as_deref_mut() {
            file.write_all(&bytes).await.map_err(BodyError::Write)?;
        }
    }
    if let Some(file) = output {
        file.flush().await.map_err(BodyError::Write)?;
    }
    Ok(BodySummary {
        bytes: total_bytes,
        sample: String::from_utf8_lossy(&head)
            .chars()
            .take(OUTPUT_SAMPLE_CHARS)
            .collect(),
    })
}

pub(super) fn exit_code_for(err: &reqwest::Error) -> i32 {
    if err.is_timeout() {
        EXIT_TIMEOUT
    } else if err.is_builder() {
        EXIT_MALFORMED_URL
    } else if err.is_redirect() {
        EXIT_TOO_MANY_REDIRECTS
    } else if err.is_connect() {
        if describe_error(err).to_ascii_lowercase().contains("dns error") {
            EXIT_RESOLVE
        } else {
            EXIT_CONNECT
        }
    } else if err.is_body() || err.is_decode() || err.is_request() {
        EXIT_RECV
    } else {
        EXIT_FAILURE
    }
}

/// Flattens an error and its sources into one line.
pub(super) fn describe_error(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
