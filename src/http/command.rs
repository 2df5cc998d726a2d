use std::path::Path;

use reqwest::{Client, Request, header::AUTHORIZATION};

use crate::domain::EndpointTarget;

/// Authorization header as it appears in recorded command lines.
pub const REDACTED_AUTHORIZATION: &str = "Authorization: Bearer <REDACTED>";
const AUTHORIZATION_BEARER_PREFIX: &str = "Authorization: Bearer ";
const URL_PLACEHOLDER: &str = "<URL>";
const DISCARD_OUTPUT: &str = "/dev/null";

/// A fully constructed request attempt.
///
/// The same value drives the reqwest request and the curl-equivalent command
/// line stored in the record, so the two cannot drift apart.
#[derive(Debug, Clone)]
pub struct Invocation {
    url: String,
    bearer_token: Option<String>,
    query: Vec<(&'static str, String)>,
    output: Option<String>,
    insecure: bool,
}

impl Invocation {
    #[must_use]
    pub fn new(
        target: &EndpointTarget,
        token: Option<&str>,
        output: Option<&Path>,
        insecure: bool,
    ) -> Self {
        let bearer_token = if target.auth_required {
            token.map(str::to_owned)
        } else {
            None
        };
        let query = target
            .data_params()
            .map(|params| {
                params
                    .query_pairs()
                    .iter()
                    .map(|(key, value)| (*key, (*value).to_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            url: target.url.clone(),
            bearer_token,
            query,
            output: output.map(|path| path.to_string_lossy().into_owned()),
            insecure,
        }
    }

    /// Builds the GET request.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error when the URL is malformed.
    pub fn build_request(&self, client: &Client) -> Result<Request, reqwest::Error> {
        let mut builder = client.get(&self.url);
        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        if let Some(token) = self.bearer_token.as_deref() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.build()
    }

    /// The curl command line this attempt is equivalent to, secret included.
    #[must_use]
    pub fn command_parts(&self) -> Vec<String> {
        let mut parts: Vec<String> = vec!["curl".to_owned(), "-s".to_owned()];
        if self.insecure {
            parts.push("-k".to_owned());
        }
        parts.push("--get".to_owned());
        if let Some(token) = self.bearer_token.as_deref() {
            parts.push("-H".to_owned());
            parts.push(format!("{}{}", AUTHORIZATION_BEARER_PREFIX, token));
        }
        for (key, value) in &self.query {
            parts.push("--data-urlencode".to_owned());
            parts.push(format!("{}={}", key, value));
        }
        parts.push("-o".to_owned());
        parts.push(
            self.output
                .clone()
                .unwrap_or_else(|| DISCARD_OUTPUT.to_owned()),
        );
        parts.push(self.url.clone());
        parts
    }

    /// Command line safe to persist: credential and URL are masked.
    #[must_use]
    pub fn redacted_command(&self) -> String {
        redact_command(&self.command_parts())
    }
}

/// Masks bearer credentials and replaces the trailing URL with `<URL>`.
#[must_use]
pub fn redact_command(parts: &[String]) -> String {
    let without_url = parts.split_last().map_or(parts, |(_, rest)| rest);
    let mut rendered: Vec<String> = Vec::with_capacity(without_url.len().saturating_add(1));
    let mut previous_was_header_flag = false;
    for part in without_url {
        if previous_was_header_flag && part.starts_with(AUTHORIZATION_BEARER_PREFIX) {
            rendered.push(shell_quote(REDACTED_AUTHORIZATION));
        } else {
            rendered.push(shell_quote(part));
        }
        previous_was_header_flag = part == "-H";
    }
    rendered.push(URL_PLACEHOLDER.to_owned());
    rendered.join(" ")
}

fn shell_quote(value: &str) -> String {
    if value.is_empty() {
        return "''".to_owned();
    }
    let safe = value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || "@%+=:,./-_".contains(ch));
    if safe {
        return value.to_owned();
    }
    format!("'{}'", value.replace('\'', r#"'"'"'"#))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::target::CPU_DATA;

    #[test]
    fn recorded_command_never_contains_the_secret() -> Result<(), String> {
        let secret = "s3cr3t-t0k3n";
        let target = EndpointTarget::remote(CPU_DATA, "eu", "https://eu.example/soda");
        let invocation = Invocation::new(&target, Some(secret), None, true);

        let raw = invocation.command_parts().join(" ");
        if !raw.contains(secret) {
            return Err("the unredacted invocation should carry the header".to_owned());
        }
        let redacted = invocation.redacted_command();
        if redacted.contains(secret) {
            return Err(format!("secret leaked: {}", redacted));
        }
        if !redacted.contains("'Authorization: Bearer <REDACTED>'") {
            return Err(format!("missing redaction marker: {}", redacted));
        }
        if !redacted.ends_with(" <URL>") || redacted.contains("eu.example") {
            return Err(format!("url should be masked: {}", redacted));
        }
        Ok(())
    }

    #[test]
    fn unauthenticated_targets_send_no_header() -> Result<(), String> {
        let mut target = EndpointTarget::remote("nohup", "local", "http://localhost:8080");
        target.auth_required = false;
        let invocation = Invocation::new(&target, Some("ignored"), None, false);
        let command = invocation.redacted_command();
        if command.contains("Authorization") || command.contains("-k") {
            return Err(format!("unexpected flags: {}", command));
        }
        if !command.contains("-o /dev/null") {
            return Err(format!("body should be discarded: {}", command));
        }
        Ok(())
    }

    #[test]
    fn data_parameters_are_url_encoded_into_the_query() -> Result<(), String> {
        let target = EndpointTarget::remote(CPU_DATA, "eu", "https://eu.example/soda");
        let invocation = Invocation::new(&target, Some("tok"), None, true);
        let client = Client::new();
        let request = invocation
            .build_request(&client)
            .map_err(|err| format!("build failed: {}", err))?;
        let query = request.url().query().unwrap_or_default().to_owned();
        if !query.contains("CIRCLE=351.986728+8.778684+0.01") {
            return Err(format!("unexpected query: {}", query));
        }
        if !query.contains("RESPONSE_FORMAT=application%2Ffits") {
            return Err(format!("unexpected query: {}", query));
        }
        let auth = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if auth != "Bearer tok" {
            return Err(format!("unexpected auth header: {}", auth));
        }
        Ok(())
    }

    #[test]
    fn shell_quote_wraps_unsafe_values() -> Result<(), String> {
        if shell_quote("plain-value_1.0") != "plain-value_1.0" {
            return Err("safe values stay bare".to_owned());
        }
        if shell_quote("it's here") != r#"'it'"'"'s here'"# {
            return Err(format!("bad quoting: {}", shell_quote("it's here")));
        }
        Ok(())
    }
}
