//! Askama filters for the admin console templates.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{Datelike, Utc};

/// Year printed in the admin console footer. The piped value is ignored.
///
/// Usage in templates: `{{ ""|copyright_year }}`
#[askama::filter_fn]
pub fn copyright_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(Utc::now().year())
}
