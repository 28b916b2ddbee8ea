//! Point-in-time query parsing helpers.
//!
//! Prices depend on when a discount expires, so read endpoints accept `?at=<RFC 3339>`
//! to price as of another instant.

use jiff::Timestamp;
use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use crate::extensions::*;

pub(crate) trait PointInTimeExt {
    /// The requested instant, or now when `at` is absent.
    fn into_point_in_time(self) -> Result<Timestamp, StatusError>;
}

impl PointInTimeExt for QueryParam<String, false> {
    fn into_point_in_time(self) -> Result<Timestamp, StatusError> {
        self.into_inner()
            .map(|value| value.parse::<Timestamp>())
            .transpose()
            .or_400("\"at\" must be an RFC 3339 timestamp")
            .map(|point_in_time| point_in_time.unwrap_or_else(Timestamp::now))
    }
}
