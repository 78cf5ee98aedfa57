//! Askama filters for the enquiry site templates.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{Datelike, Utc};

/// Year printed in the enquiry site footer. The piped value is ignored.
///
/// Usage in templates: `{{ ""|copyright_year }}`
#[askama::filter_fn]
pub fn copyright_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(Utc::now().year())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use askama::Template;
    use chrono::Datelike;

    use crate::filters;

    #[derive(Template)]
    #[template(source = "(c) {{ \"\"|copyright_year }}", ext = "txt")]
    struct Footer;

    #[test]
    fn test_copyright_year_is_current() {
        let year = chrono::Utc::now().year();
        assert_eq!(Footer.render().unwrap(), format!("(c) {year}"));
    }
}
