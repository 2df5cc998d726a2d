//! Single-attempt HTTP invocation of endpoint targets.
//!
//! The [`Invoke`] trait is the seam between scenario drivers and the
//! network: drivers only ever ask for "one attempt, one outcome", which lets
//! tests substitute a fake transport. [`HttpInvoker`] is the reqwest-backed
//! implementation used by the CLI.
mod client;
mod command;
mod execution;
mod invoker;
mod prefetch;


use async_trait::async_trait;

use crate::domain::{EndpointTarget, Outcome};

pub use client::InvokerConfig;
pub use command::{REDACTED_AUTHORIZATION, Invocation};
pub use invoker::HttpInvoker;

/// Performs exactly one request attempt against a target.
///
/// Implementations never fail: transport and HTTP errors are folded into the
/// returned [`Outcome`].
#[async_trait]
pub trait Invoke: Send + Sync {
    async fn invoke(&self, target: &EndpointTarget) -> Outcome;
}
