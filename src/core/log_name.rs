// src/core/log_name.rs

//! Timestamped log file names for executor runs.

use crate::constants::LOG_TIMESTAMP_FORMAT;
use chrono::{DateTime, Local, TimeZone};

/// Builds a log file name such as `migration-20250114-093012.log` from the local time.
///
/// Two calls with the same prefix within the same second return the same name.
pub fn make_log_name(prefix: &str) -> String {
    make_log_name_at(prefix, &Local::now())
}

/// Same as [`make_log_name`], for an explicit instant.
pub fn make_log_name_at<Tz: TimeZone>(prefix: &str, instant: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}-{}.log", prefix, instant.format(LOG_TIMESTAMP_FORMAT))
}
