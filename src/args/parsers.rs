use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult, ConfigError};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;

/// Parses `<digits><unit>` with unit `ms`, `s` (default), `m` or `h`.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let value = s.trim();
    if value.is_empty() {
        return Err(AppError::config(ConfigError::DurationEmpty));
    }

    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(AppError::config(ConfigError::InvalidDurationFormat {
            value: value.to_owned(),
        }));
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part.parse().map_err(|err| {
        AppError::config(ConfigError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })
    })?;

    let duration = match unit_part {
        "ms" => Duration::from_millis(number),
        "" | "s" => Duration::from_secs(number),
        "m" => Duration::from_secs(
            number
                .checked_mul(SECONDS_PER_MINUTE)
                .ok_or_else(|| AppError::config(ConfigError::DurationOverflow))?,
        ),
        "h" => Duration::from_secs(
            number
                .checked_mul(SECONDS_PER_HOUR)
                .ok_or_else(|| AppError::config(ConfigError::DurationOverflow))?,
        ),
        unit => {
            return Err(AppError::config(ConfigError::InvalidDurationUnit {
                unit: unit.to_owned(),
            }));
        }
    };

    if duration.is_zero() {
        return Err(AppError::config(ConfigError::DurationZero));
    }
    Ok(duration)
}

/// A `node=path` pair naming one summary to merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeInput {
    pub node: String,
    pub path: PathBuf,
}

pub(crate) fn parse_merge_input(s: &str) -> AppResult<MergeInput> {
    match s.split_once('=') {
        Some((node, path)) => Ok(MergeInput {
            node: node.to_owned(),
            path: PathBuf::from(path),
        }),
        None => Err(AppError::config(ConfigError::InvalidMergeInput {
            value: s.to_owned(),
        })),
    }
}
