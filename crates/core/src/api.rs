//! Data-fetch functions, one per endpoint.
//!
//! Each function distinguishes three outcomes:
//! - absent input (missing or unusable id): `Ok(None)` without touching the network,
//! - a usable response: `Ok(Some(..))`,
//! - a non-ok response or a response without `data`: `Err`, left for the caller to render.

use crate::constants::VALIDATION_ERROR_CODE;
use crate::http::{api_path, ApiRequest, ApiResponse, HttpClient};
use crate::validation::Issue;
use crate::{TerraceError, TerraceResult};
use serde::de::DeserializeOwned;
use terrace_types::{List, ListId, ListSummary, NewList, Place, PlaceId, User, UserId};

/// One page of the per-user list listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    pub lists: Vec<ListSummary>,
    pub next_cursor: Option<u64>,
}

/// Result of `POST /list` when the request itself went through.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateListOutcome {
    Created(ListId),
    /// The server's schema check failed.
    Rejected(Vec<Issue>),
}

/// Typed access to the Terrace API over any [`HttpClient`].
#[derive(Clone, Debug)]
pub struct TerraceApi<C> {
    client: C,
}

impl<C: HttpClient> TerraceApi<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// `GET /list/:id`. The id comes straight from the query string, so anything that is
    /// not a positive integer counts as absent.
    pub async fn fetch_list(&self, list_id: Option<&str>) -> TerraceResult<Option<List>> {
        match list_id.and_then(parse_list_id) {
            Some(id) => self.fetch_list_by_id(id).await.map(Some),
            None => Ok(None),
        }
    }

    /// `GET /list/:id` for an id that is already known to be valid.
    pub async fn fetch_list_by_id(&self, id: ListId) -> TerraceResult<List> {
        let path = format!("/list/{id}");
        let response = self.client.request(ApiRequest::get(&path)).await?;
        decode(&path, require_payload(&path, &response)?)
    }

    /// `GET /place/:id`. Both ids are needed; a detail panel is only shown for a place of
    /// the list on screen.
    pub async fn fetch_place(
        &self,
        place_id: Option<PlaceId>,
        list_id: Option<ListId>,
    ) -> TerraceResult<Option<Place>> {
        let (Some(place_id), Some(_)) = (place_id, list_id) else {
            return Ok(None);
        };
        let path = format!("/place/{place_id}");
        let response = self.client.request(ApiRequest::get(&path)).await?;
        decode(&path, require_payload(&path, &response)?).map(Some)
    }

    /// `GET /user/:id`
    pub async fn fetch_user(&self, user_id: Option<&UserId>) -> TerraceResult<Option<User>> {
        let Some(user_id) = user_id else {
            return Ok(None);
        };
        let path = api_path(&["user", user_id.as_str()])?;
        let response = self
            .client
            .request(ApiRequest::get(&path).with_credentials())
            .await?;
        decode(&path, require_payload(&path, &response)?).map(Some)
    }

    /// `GET /list/user/:id?cursor&take`
    pub async fn fetch_lists_by_user(
        &self,
        user_id: &UserId,
        cursor: u64,
        take: u32,
    ) -> TerraceResult<ListPage> {
        let path = api_path(&["list", "user", user_id.as_str()])?;
        let request = ApiRequest::get(&path)
            .query("cursor", cursor)
            .query("take", take);
        let response = self.client.request(request).await?;
        let lists = decode(&path, require_payload(&path, &response)?)?;
        let next_cursor = response
            .body
            .as_ref()
            .and_then(|b| b.pagination)
            .and_then(|p| p.next_cursor);
        Ok(ListPage { lists, next_cursor })
    }

    /// `GET /list?term=`. A blank term finds nothing and sends nothing.
    pub async fn search_lists(&self, term: &str) -> TerraceResult<Vec<ListSummary>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let path = "/list";
        let response = self
            .client
            .request(ApiRequest::get(path).query("term", term))
            .await?;
        decode(path, require_payload(path, &response)?)
    }

    /// `GET /auth/me`. A non-ok or empty answer means "signed out" rather than an error.
    pub async fn fetch_me(&self) -> TerraceResult<Option<User>> {
        let path = "/auth/me";
        let response = self
            .client
            .request(ApiRequest::get(path).with_credentials())
            .await?;
        match response.payload() {
            Some(value) => decode(path, value).map(Some),
            None => Ok(None),
        }
    }

    /// `POST /list`
    pub async fn create_list(&self, list: &NewList) -> TerraceResult<CreateListOutcome> {
        let path = "/list";
        let body = serde_json::to_value(list).map_err(TerraceError::Encode)?;
        let response = self
            .client
            .request(ApiRequest::post(path, body).with_credentials())
            .await?;

        if let Some(id) = response
            .payload()
            .and_then(|data| data.get("id"))
            .and_then(serde_json::Value::as_u64)
        {
            return Ok(CreateListOutcome::Created(ListId(id)));
        }

        let first_error = response
            .body
            .as_ref()
            .and_then(|b| b.errors.as_ref())
            .and_then(|errors| errors.first());
        if let Some(entry) = first_error {
            if entry.code == VALIDATION_ERROR_CODE {
                let issues: Vec<Issue> = decode(path, &entry.data)?;
                return Ok(CreateListOutcome::Rejected(issues));
            }
            tracing::warn!("create list rejected with code {}", entry.code);
        }

        if !response.ok {
            return Err(TerraceError::Server {
                path: path.to_string(),
                status: response.status,
            });
        }
        Err(TerraceError::MissingPayload {
            path: path.to_string(),
        })
    }
}

/// Parses a list id from a query-string value. Zero, negative and non-numeric values are
/// not ids.
pub fn parse_list_id(raw: &str) -> Option<ListId> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .map(ListId)
}

fn require_payload<'a>(path: &str, response: &'a ApiResponse) -> TerraceResult<&'a serde_json::Value> {
    if !response.ok {
        return Err(TerraceError::Server {
            path: path.to_string(),
            status: response.status,
        });
    }
    response.payload().ok_or_else(|| TerraceError::MissingPayload {
        path: path.to_string(),
    })
}

fn decode<T: DeserializeOwned>(path: &str, value: &serde_json::Value) -> TerraceResult<T> {
    T::deserialize(value).map_err(|source| TerraceError::Decode {
        path: path.to_string(),
        source,
    })
}
