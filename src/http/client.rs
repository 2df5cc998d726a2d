use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, redirect};

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, InvokeError};

/// Redirect hops followed while downloading a prerequisite input file.
const PREFETCH_REDIRECT_LIMIT: usize = 10;

/// Everything the invoker needs; built once from the run configuration.
#[derive(Debug, Clone)]
pub struct InvokerConfig {
    pub token: Option<String>,
    pub tmp_dir: PathBuf,
    pub request_timeout: Duration,
    pub verify_tls: bool,
}

/// Client used for the measured request: redirects are reported, not followed.
pub(super) fn build_request_client(config: &InvokerConfig) -> AppResult<Client> {
    Client::builder()
        .timeout(config.request_timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .redirect(redirect::Policy::none())
        .danger_accept_invalid_certs(!config.verify_tls)
        .danger_accept_invalid_hostnames(!config.verify_tls)
        .build()
        .map_err(|err| AppError::invoke(InvokeError::BuildClient { source: err }))
}

pub(super) fn build_prefetch_client(config: &InvokerConfig) -> AppResult<Client> {
    Client::builder()
        .timeout(config.request_timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .redirect(redirect::Policy::limited(PREFETCH_REDIRECT_LIMIT))
        .build()
        .map_err(|err| AppError::invoke(InvokeError::BuildClient { source: err }))
}
