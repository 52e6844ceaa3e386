//! Scripted [`HttpClient`] for unit tests.

use crate::http::{ApiRequest, ApiResponse, Envelope, ErrorEntry, HttpClient};
use crate::TerraceResult;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Answers requests from per-path queues and records every request it sees.
///
/// Unscripted paths answer `404` with no body. When a path's queue holds a single response
/// it is reused for every later request.
#[derive(Default)]
pub(crate) struct ScriptedClient {
    routes: Mutex<HashMap<String, VecDeque<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, path: &str, response: ApiResponse) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn request(&self, request: ApiRequest) -> TerraceResult<ApiResponse> {
        let path = request.path.clone();
        self.requests.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        let response = match routes.get_mut(&path) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| status(404)))
    }
}

pub(crate) fn ok(data: serde_json::Value) -> ApiResponse {
    ApiResponse {
        ok: true,
        status: 200,
        body: Some(Envelope {
            data: Some(data),
            ..Envelope::default()
        }),
    }
}

pub(crate) fn ok_paged(data: serde_json::Value, next_cursor: Option<u64>) -> ApiResponse {
    ApiResponse {
        ok: true,
        status: 200,
        body: Some(Envelope {
            data: Some(data),
            pagination: Some(terrace_types::Pagination { next_cursor }),
            ..Envelope::default()
        }),
    }
}

pub(crate) fn status(code: u16) -> ApiResponse {
    ApiResponse {
        ok: (200..300).contains(&code),
        status: code,
        body: None,
    }
}

pub(crate) fn rejected(code: &str, data: serde_json::Value) -> ApiResponse {
    ApiResponse {
        ok: false,
        status: 400,
        body: Some(Envelope {
            errors: Some(vec![ErrorEntry {
                code: code.to_string(),
                data,
            }]),
            ..Envelope::default()
        }),
    }
}

pub(crate) fn list_json(id: u64, places: &[(u64, f64, f64)]) -> serde_json::Value {
    let places: Vec<_> = places
        .iter()
        .map(|(pid, lat, lon)| {
            serde_json::json!({
                "id": pid,
                "name": format!("Place {pid}"),
                "description": "Somewhere",
                "lat": lat,
                "lon": lon,
            })
        })
        .collect();
    serde_json::json!({
        "id": id,
        "name": format!("List {id}"),
        "description": "A list",
        "userId": "user-1",
        "places": places,
    })
}

pub(crate) fn place_json(id: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Place {id}"),
        "description": "Somewhere",
        "lat": 51.0,
        "lon": 0.0,
    })
}

pub(crate) fn user_json(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": "Ada",
        "createdAt": "2023-01-01T00:00:00Z",
        "updatedAt": "2023-01-02T00:00:00Z",
    })
}
