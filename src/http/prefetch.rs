use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tokio::time::Instant;
use tracing::debug;

use super::execution::{describe_error, drain_body};

/// First status treated as a failed download, as with `curl --fail`.
const FIRST_FAILING_STATUS: u16 = 400;

#[derive(Debug)]
pub(super) struct PrefetchOutcome {
    pub(super) ok: bool,
    pub(super) duration: Duration,
    pub(super) diagnostic: String,
}

/// Downloads the target's input file into a scratch file that is removed
/// before this returns, whatever the outcome.
pub(super) async fn download_source(
    client: &Client,
    source_url: &str,
    tmp_dir: &Path,
) -> PrefetchOutcome {
    let started = Instant::now();
    let result = fetch_into_temp(client, source_url, tmp_dir).await;
    let duration = started.elapsed();
    match result {
        Ok(bytes) => {
            debug!("Prefetched {} bytes from {} in {:?}", bytes, source_url, duration);
            PrefetchOutcome {
                ok: true,
                duration,
                diagnostic: String::new(),
            }
        }
        Err(diagnostic) => PrefetchOutcome {
            ok: false,
            duration,
            diagnostic,
        },
    }
}

async fn fetch_into_temp(client: &Client, source_url: &str, tmp_dir: &Path) -> Result<u64, String> {
    let scratch = tempfile::Builder::new()
        .prefix("local_input_")
        .suffix(".fits")
        .tempfile_in(tmp_dir)
        .map_err(|err| format!("failed to create input file in {}: {}", tmp_dir.display(), err))?;
    let handle = scratch
        .as_file()
        .try_clone()
        .map_err(|err| format!("failed to open input file: {}", err))?;
    let mut file = tokio::fs::File::from_std(handle);

    let response = client
        .get(source_url)
        .send()
        .await
        .map_err(|err| describe_error(&err))?;
    let status = response.status().as_u16();
    if status >= FIRST_FAILING_STATUS {
        return Err(format!("The requested URL returned error: {}", status));
    }
    let body = drain_body(response, Some(&mut file))
        .await
        .map_err(|err| err.describe())?;
    Ok(body.bytes)
}
