use crate::error::{ApiError, Result};
use chrono::{
    NaiveDateTime,
    format::{Item, StrftimeItems},
};
use serde::Deserialize;

pub const ISO_D: &str = "%Y-%m-%d";
pub const ISO_H: &str = "%Y-%m-%dT%H";
pub const ISO_M: &str = "%Y-%m-%dT%H:%M";
pub const ISO_S: &str = "%Y-%m-%dT%H:%M:%S";
pub const ISO_F: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Options controlling how a typed value is rendered as text.
///
/// Deserializes from `{"safe": bool, "html": bool, "format": "iso_d"}` with
/// every key optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Machine-stable, lossless output.
    pub safe: bool,
    /// Escape markup and render newlines as `<br>`.
    pub html: bool,
    /// A named preset (`iso_d`, `iso_h`, `iso_m`, `iso_s`, `iso_f`, `iso`)
    /// or a strftime pattern.
    pub format: Option<String>,
}

impl FormatOptions {
    pub fn safe() -> Self {
        FormatOptions {
            safe: true,
            ..Default::default()
        }
    }

    pub fn html() -> Self {
        FormatOptions {
            html: true,
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// The strftime pattern to use for temporal values.
    pub fn pattern(&self) -> &str {
        match self.format.as_deref() {
            Some(f) => resolve_preset(f).unwrap_or(f),
            None => ISO_F,
        }
    }
}

impl From<&str> for FormatOptions {
    fn from(format: &str) -> Self {
        FormatOptions::default().with_format(format)
    }
}

pub fn resolve_preset(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "iso_d" => Some(ISO_D),
        "iso_h" => Some(ISO_H),
        "iso_m" => Some(ISO_M),
        "iso_s" => Some(ISO_S),
        "iso_f" | "iso" => Some(ISO_F),
        _ => None,
    }
}

/// Renders a timestamp with the pattern selected by `opts`, rejecting
/// malformed patterns instead of panicking inside `Display`.
pub fn format_timestamp(dt: &NaiveDateTime, opts: &FormatOptions) -> Result<String> {
    let pattern = opts.pattern();
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(ApiError::parse("format", pattern, "malformed pattern"));
    }
    Ok(dt.format(pattern).to_string())
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Trims and collapses every run of whitespace to one space.
pub fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_milli_opt(7, 8, 9, 10)
            .unwrap()
    }

    #[test]
    fn test_presets() {
        let dt = sample();
        assert_eq!(
            format_timestamp(&dt, &FormatOptions::default()).unwrap(),
            "2024-03-05T07:08:09.010"
        );
        assert_eq!(
            format_timestamp(&dt, &"iso_d".into()).unwrap(),
            "2024-03-05"
        );
        assert_eq!(
            format_timestamp(&dt, &"ISO_M".into()).unwrap(),
            "2024-03-05T07:08"
        );
        assert_eq!(format_timestamp(&dt, &"%d/%m".into()).unwrap(), "05/03");
    }

    #[test]
    fn test_malformed_pattern_is_an_error() {
        assert!(format_timestamp(&sample(), &"%Q".into()).is_err());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: FormatOptions = serde_json::from_str(r#"{"safe": true}"#).unwrap();
        assert_eq!(opts, FormatOptions::safe());
    }

    #[test]
    fn test_normalize_and_escape() {
        assert_eq!(normalize("  a \n\t b  "), "a b");
        assert_eq!(escape_html("<b>&"), "&lt;b&gt;&amp;");
    }
}
