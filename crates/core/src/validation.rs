//! Schema checks for drafts before they are submitted.
//!
//! The rules mirror the server's create-list schema so that most problems are caught
//! locally. Issues use the same `{path, message}` shape as the server's `VALIDATION`
//! error payload, which lets local and server issues share one display.

use crate::constants::{
    DESCRIPTION_MAX_LEN, DESCRIPTION_MIN_LEN, IMAGE_EXTENSIONS, LIST_MAX_PLACES, LIST_MIN_PLACES,
    NAME_MAX_LEN, NAME_MIN_LEN,
};
use serde::{Deserialize, Serialize};
use terrace_types::{DraftPlace, NewList};
use url::Url;

/// One field-level problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(deserialize_with = "path_segments")]
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn new(path: &[&str], message: impl Into<String>) -> Self {
        Self {
            path: path.iter().map(|p| p.to_string()).collect(),
            message: message.into(),
        }
    }

    /// Path segments joined the way the error panel shows them, e.g. `places=>0=>name`.
    pub fn display_path(&self) -> String {
        self.path.join("=>")
    }

    fn prefixed(mut self, prefix: &[String]) -> Self {
        let mut path = prefix.to_vec();
        path.append(&mut self.path);
        self.path = path;
        self
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.display_path(), self.message)
    }
}

/// Validates a single place against the place schema.
///
/// Issue paths are relative to the place (`["name"]`, `["lat"]`, ...).
pub fn validate_place(place: &DraftPlace) -> Result<(), Vec<Issue>> {
    let mut issues = Vec::new();
    check_text(
        &mut issues,
        "name",
        &place.name,
        NAME_MIN_LEN,
        NAME_MAX_LEN,
    );
    check_text(
        &mut issues,
        "description",
        &place.description,
        DESCRIPTION_MIN_LEN,
        DESCRIPTION_MAX_LEN,
    );
    check_image_url(&mut issues, "thumbnail", place.thumbnail.as_deref());
    check_image_url(&mut issues, "banner", place.banner.as_deref());
    check_range(&mut issues, "lat", place.lat, -90.0, 90.0);
    check_range(&mut issues, "lon", place.lon, -180.0, 180.0);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Validates a whole list, including every place in it.
///
/// Place issues are prefixed with `["places", "<index>"]`.
pub fn validate_new_list(list: &NewList) -> Result<(), Vec<Issue>> {
    let mut issues = Vec::new();
    check_text(
        &mut issues,
        "name",
        &list.name,
        NAME_MIN_LEN,
        NAME_MAX_LEN,
    );
    check_text(
        &mut issues,
        "description",
        &list.description,
        DESCRIPTION_MIN_LEN,
        DESCRIPTION_MAX_LEN,
    );
    check_image_url(&mut issues, "thumbnail", list.thumbnail.as_deref());

    if list.places.len() < LIST_MIN_PLACES {
        issues.push(Issue::new(
            &["places"],
            format!("Array must contain at least {LIST_MIN_PLACES} element(s)"),
        ));
    } else if list.places.len() > LIST_MAX_PLACES {
        issues.push(Issue::new(
            &["places"],
            format!("Array must contain at most {LIST_MAX_PLACES} element(s)"),
        ));
    }

    for (i, place) in list.places.iter().enumerate() {
        if let Err(place_issues) = validate_place(place) {
            let prefix = ["places".to_string(), i.to_string()];
            issues.extend(place_issues.into_iter().map(|issue| issue.prefixed(&prefix)));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Returns true if `value` is an absolute http(s) URL pointing at a supported image type.
pub fn is_image_url(value: &str) -> bool {
    let Ok(url) = Url::parse(value) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    let last_segment = url.path().rsplit('/').next().unwrap_or_default();
    match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => IMAGE_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed)),
        _ => false,
    }
}

/// Accepts both string and numeric path segments; array indices arrive as numbers.
fn path_segments<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|segment| match segment {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "unsupported path segment: {other}"
            ))),
        })
        .collect()
}

fn check_text(issues: &mut Vec<Issue>, field: &str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min {
        issues.push(Issue::new(
            &[field],
            format!("String must contain at least {min} character(s)"),
        ));
    } else if len > max {
        issues.push(Issue::new(
            &[field],
            format!("String must contain at most {max} character(s)"),
        ));
    }
}

fn check_image_url(issues: &mut Vec<Issue>, field: &str, value: Option<&str>) {
    match value {
        None => {}
        Some(v) if v.is_empty() => {}
        Some(v) if is_image_url(v) => {}
        Some(_) => issues.push(Issue::new(&[field], "Invalid input")),
    }
}

fn check_range(issues: &mut Vec<Issue>, field: &str, value: f64, min: f64, max: f64) {
    if value.is_nan() {
        issues.push(Issue::new(&[field], "Expected number, received nan"));
    } else if value < min {
        issues.push(Issue::new(
            &[field],
            format!("Number must be greater than or equal to {min}"),
        ));
    } else if value > max {
        issues.push(Issue::new(
            &[field],
            format!("Number must be less than or equal to {max}"),
        ));
    }
}
