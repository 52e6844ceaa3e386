//! Domain types shared by the Terrace client crates.
//!
//! These are plain data carriers with serde support matching the wire format of the
//! Terrace API (camelCase field names). Nothing here performs I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Errors that can occur when creating validated identifier types.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The input text was empty or contained only whitespace
    #[error("identifier cannot be empty")]
    Empty,
}

/// Errors raised by [`Coordinates::new`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinatesError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// Server-assigned list identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(pub u64);

/// Server-assigned place identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(pub u64);

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque user identifier.
///
/// The API hands out user ids as strings. The input is trimmed of leading and trailing
/// whitespace during construction and must not be empty afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Creates a new `UserId` from the given input.
    ///
    /// # Returns
    ///
    /// Returns `Ok(UserId)` if the trimmed input is non-empty,
    /// or `Err(IdError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for UserId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        UserId::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A point on the map in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Creates coordinates, rejecting values outside the WGS84 ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinatesError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinatesError::Latitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinatesError::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Creates coordinates without range checks.
    ///
    /// Raw map clicks go through here; out-of-range values are reported later by
    /// validation instead of being rejected at the click.
    pub fn unchecked(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

/// A persisted place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub description: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl Place {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::unchecked(self.lat, self.lon)
    }
}

/// A place assembled on the client that has not been submitted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPlace {
    pub name: String,
    pub description: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl DraftPlace {
    /// A blank place anchored at `at`.
    pub fn at(at: Coordinates) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            lat: at.lat,
            lon: at.lon,
            thumbnail: None,
            banner: None,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::unchecked(self.lat, self.lon)
    }
}

/// A curated list of places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: ListId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub user_id: UserId,
    #[serde(default)]
    pub places: Vec<Place>,
}

/// A list row as returned by search and by the per-user listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSummary {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned_at: Option<DateTime<Utc>>,
}

/// Cursor information attached to paged responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub next_cursor: Option<u64>,
}

/// Payload of `POST /list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewList {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub places: Vec<DraftPlace>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_trims_and_rejects_blank() {
        assert_eq!(UserId::new("  abc ").unwrap().as_str(), "abc");
        assert!(matches!(UserId::new("   "), Err(IdError::Empty)));
    }

    #[test]
    fn test_coordinates_reject_out_of_range() {
        assert!(Coordinates::new(51.5, -0.1).is_ok());
        assert_eq!(
            Coordinates::new(91.0, 0.0),
            Err(CoordinatesError::Latitude(91.0))
        );
        assert_eq!(
            Coordinates::new(0.0, -180.5),
            Err(CoordinatesError::Longitude(-180.5))
        );
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_list_deserialises_wire_format() {
        let json = r#"{
            "id": 1,
            "name": "Pubs",
            "description": "Good pubs",
            "userId": "u-1",
            "places": [
                {"id": 10, "name": "The Eagle", "description": "Old", "lat": 52.2, "lon": 0.1, "listId": 1}
            ]
        }"#;
        let list: List = serde_json::from_str(json).unwrap();
        assert_eq!(list.id, ListId(1));
        assert_eq!(list.user_id.as_str(), "u-1");
        assert_eq!(list.places[0].id, PlaceId(10));
        assert_eq!(list.places[0].thumbnail, None);
    }

    #[test]
    fn test_user_rejects_blank_id() {
        let json = r#"{"id": " ", "name": "x", "createdAt": "2023-01-01T00:00:00Z", "updatedAt": "2023-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }

    #[test]
    fn test_new_list_omits_absent_urls() {
        let dto = NewList {
            name: "name".into(),
            description: "desc".into(),
            thumbnail: None,
            places: vec![DraftPlace::at(Coordinates::unchecked(1.0, 2.0))],
        };
        let value = serde_json::to_value(&dto).unwrap();
        assert!(value.get("thumbnail").is_none());
        assert!(value["places"][0].get("banner").is_none());
        assert_eq!(value["places"][0]["lat"], 1.0);
    }
}
