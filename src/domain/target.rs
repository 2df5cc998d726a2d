use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Function category whose requests carry a dataset cutout payload.
pub const CPU_DATA: &str = "cpu_data";
/// Region name of the self-hosted endpoint.
pub const LOCAL_REGION: &str = "local";

pub const DATASET_ID: &str = "ivo://auth.example.org/datasets/fits?testing/5b/f5/PTF10tce.fits";
pub const CIRCLE: &str = "351.986728 8.778684 0.01";
pub const RESPONSE_FORMAT: &str = "application/fits";
pub const LOCAL_SOURCE_URL: &str =
    "https://gitlab.com/manuparra/test-data-faas/-/raw/main/PTF10tce.fits?inline=false";

/// Query parameters sent to `cpu_data` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "CIRCLE")]
    pub circle: String,
    #[serde(rename = "RESPONSE_FORMAT")]
    pub response_format: String,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            id: DATASET_ID.to_owned(),
            circle: CIRCLE.to_owned(),
            response_format: RESPONSE_FORMAT.to_owned(),
        }
    }
}

impl RequestParams {
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("ID", self.id.as_str()),
            ("CIRCLE", self.circle.as_str()),
            ("RESPONSE_FORMAT", self.response_format.as_str()),
        ]
    }
}

/// One invocable endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointTarget {
    pub function_type: String,
    pub region: String,
    pub url: String,
    pub auth_required: bool,
    pub request_params: Option<RequestParams>,
    pub local_source_url: String,
}

impl EndpointTarget {
    /// A configured remote endpoint: authenticated, default parameters.
    #[must_use]
    pub fn remote(function_type: &str, region: &str, url: &str) -> Self {
        Self {
            function_type: function_type.to_owned(),
            region: region.to_owned(),
            url: url.to_owned(),
            auth_required: true,
            request_params: None,
            local_source_url: LOCAL_SOURCE_URL.to_owned(),
        }
    }

    #[must_use]
    pub fn is_data_function(&self) -> bool {
        self.function_type == CPU_DATA
    }

    #[must_use]
    pub fn is_local(&self) -> bool {
        self.region == LOCAL_REGION
    }

    /// Local data endpoints download their input file before every call.
    #[must_use]
    pub fn needs_prefetch(&self) -> bool {
        self.is_data_function() && self.is_local()
    }

    /// Parameters to encode into the request, if the category takes any.
    #[must_use]
    pub fn data_params(&self) -> Option<Cow<'_, RequestParams>> {
        if !self.is_data_function() {
            return None;
        }
        Some(
            self.request_params
                .as_ref()
                .map_or_else(|| Cow::Owned(RequestParams::default()), Cow::Borrowed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_local_data_targets_prefetch() -> Result<(), String> {
        let mut target = EndpointTarget::remote(CPU_DATA, "eu", "https://eu.example/soda");
        if target.needs_prefetch() {
            return Err("remote target should not prefetch".to_owned());
        }
        target.region = LOCAL_REGION.to_owned();
        if !target.needs_prefetch() {
            return Err("local cpu_data target should prefetch".to_owned());
        }
        let nohup = EndpointTarget::remote("nohup", LOCAL_REGION, "http://localhost");
        if nohup.needs_prefetch() {
            return Err("nohup target should not prefetch".to_owned());
        }
        Ok(())
    }

    #[test]
    fn data_params_fall_back_to_dataset_defaults() -> Result<(), String> {
        let target = EndpointTarget::remote(CPU_DATA, "eu", "https://eu.example/soda");
        let params = target
            .data_params()
            .ok_or_else(|| "expected params for cpu_data".to_owned())?;
        if params.id != DATASET_ID || params.circle != CIRCLE {
            return Err(format!("unexpected defaults: {:?}", params));
        }
        let nohup = EndpointTarget::remote("nohup", "eu", "https://eu.example/nohup");
        if nohup.data_params().is_some() {
            return Err("nohup targets carry no params".to_owned());
        }
        Ok(())
    }
}
