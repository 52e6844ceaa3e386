//! Client-visible routes.

use crate::TerraceResult;
use terrace_types::{ListId, UserId};
use url::{form_urlencoded, Url};

const ROUTE_BASE: &str = "http://terrace.invalid/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The map. `list_id` is the raw `?listId=` value; the list fetch decides whether it
    /// is usable.
    Index { list_id: Option<String> },
    User { user_id: UserId },
    AddList,
    SignIn,
    NotFound,
}

impl Route {
    pub fn index(list_id: Option<ListId>) -> Self {
        Route::Index {
            list_id: list_id.map(|id| id.to_string()),
        }
    }

    /// Parses a path with optional query, e.g. `/?listId=4` or `/user/abc`. Absolute URLs
    /// are accepted too; only their path and query are looked at.
    pub fn parse(input: &str) -> TerraceResult<Self> {
        let url = Url::parse(ROUTE_BASE)?.join(input.trim())?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let route = match segments.as_slice() {
            [] => Route::Index {
                list_id: url
                    .query_pairs()
                    .find(|(k, _)| k == "listId")
                    .map(|(_, v)| v.into_owned()),
            },
            ["user", id] => match UserId::new(id) {
                Ok(user_id) => Route::User { user_id },
                Err(_) => Route::NotFound,
            },
            ["add-list"] => Route::AddList,
            ["sign-in"] => Route::SignIn,
            _ => Route::NotFound,
        };
        Ok(route)
    }

    /// Pages behind the sign-in gate.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::AddList)
    }

    /// Pages only for signed-out visitors.
    pub fn requires_guest(&self) -> bool {
        matches!(self, Route::SignIn)
    }

    /// The page a visitor actually lands on. Signed-in users are sent from guest-only pages
    /// to the index.
    pub fn resolve_for(self, signed_in: bool) -> Route {
        if signed_in && self.requires_guest() {
            Route::index(None)
        } else {
            self
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Index { list_id: None } => write!(f, "/"),
            Route::Index {
                list_id: Some(id),
            } => {
                let encoded: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
                write!(f, "/?listId={encoded}")
            }
            Route::User { user_id } => write!(f, "/user/{user_id}"),
            Route::AddList => write!(f, "/add-list"),
            Route::SignIn => write!(f, "/sign-in"),
            Route::NotFound => write!(f, "/404"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index() {
        assert_eq!(Route::parse("/").unwrap(), Route::Index { list_id: None });
        assert_eq!(
            Route::parse("/?listId=42").unwrap(),
            Route::Index {
                list_id: Some("42".into())
            }
        );
        assert_eq!(
            Route::parse("?listId=abc&x=1").unwrap(),
            Route::Index {
                list_id: Some("abc".into())
            }
        );
    }

    #[test]
    fn test_parse_pages() {
        assert_eq!(
            Route::parse("/user/u-1").unwrap(),
            Route::User {
                user_id: UserId::new("u-1").unwrap()
            }
        );
        assert_eq!(Route::parse("/add-list").unwrap(), Route::AddList);
        assert_eq!(Route::parse("/sign-in/").unwrap(), Route::SignIn);
        assert_eq!(Route::parse("/nowhere").unwrap(), Route::NotFound);
        assert_eq!(Route::parse("/user").unwrap(), Route::NotFound);
    }

    #[test]
    fn test_parse_absolute_url() {
        assert_eq!(
            Route::parse("https://terrace.example.com/add-list").unwrap(),
            Route::AddList
        );
    }

    #[test]
    fn test_display_round_trips() {
        for route in [
            Route::index(None),
            Route::index(Some(ListId(42))),
            Route::parse("/user/abc").unwrap(),
            Route::AddList,
            Route::SignIn,
        ] {
            assert_eq!(Route::parse(&route.to_string()).unwrap(), route);
        }
        assert_eq!(Route::index(Some(ListId(42))).to_string(), "/?listId=42");
    }

    #[test]
    fn test_requires_auth() {
        assert!(Route::AddList.requires_auth());
        assert!(!Route::index(None).requires_auth());
    }

    #[test]
    fn test_signed_in_user_leaves_sign_in() {
        assert!(Route::SignIn.requires_guest());
        assert!(!Route::AddList.requires_guest());
        assert_eq!(Route::SignIn.resolve_for(true), Route::index(None));
        assert_eq!(Route::SignIn.resolve_for(false), Route::SignIn);
        assert_eq!(Route::AddList.resolve_for(true), Route::AddList);
    }
}
