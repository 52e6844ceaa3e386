//! Add-list drafting.
//!
//! A [`Draft`] holds the list being assembled: its own name, description and thumbnail,
//! the places already committed to it, and at most one pending place being edited.
//! A place lives either in `committed` or in the pending slot, never both.
//!
//! Map clicks open a pending place only when none is open; while one is open the map
//! ignores clicks and the pending place is closed only by accepting or discarding it.

use crate::api::{CreateListOutcome, TerraceApi};
use crate::constants::LOADING_ADDING_LIST;
use crate::http::HttpClient;
use crate::map::{self, MapAction, MarkerSpec, Viewport};
use crate::store::LoadingFlags;
use crate::validation::{self, Issue};
use crate::TerraceError;
use std::str::FromStr;
use terrace_types::{Coordinates, DraftPlace, ListId, NewList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceField {
    Name,
    Description,
    Thumbnail,
    Banner,
}

impl FromStr for PlaceField {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "thumbnail" => Ok(Self::Thumbnail),
            "banner" => Ok(Self::Banner),
            other => Err(DraftError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Name,
    Description,
    Thumbnail,
}

impl FromStr for ListField {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "thumbnail" => Ok(Self::Thumbnail),
            other => Err(DraftError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DraftError {
    #[error("no place is being edited")]
    NoPendingPlace,
    #[error("another place is already being edited")]
    PendingPlaceOpen,
    #[error("no committed place at index {index} (draft has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("place is invalid: {} issue(s)", .0.len())]
    Invalid(Vec<Issue>),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("list is invalid: {} issue(s)", .0.len())]
    Validation(Vec<Issue>),
    #[error("server rejected the list: {} issue(s)", .0.len())]
    ServerValidation(Vec<Issue>),
    #[error(transparent)]
    Request(#[from] TerraceError),
}

/// The list's own fields, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMeta {
    pub name: String,
    pub description: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone, Default)]
pub struct Draft {
    meta: ListMeta,
    committed: Vec<DraftPlace>,
    pending: Option<DraftPlace>,
    issues: Vec<Issue>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meta(&self) -> &ListMeta {
        &self.meta
    }

    pub fn committed(&self) -> &[DraftPlace] {
        &self.committed
    }

    pub fn pending(&self) -> Option<&DraftPlace> {
        self.pending.as_ref()
    }

    /// Issues from the last failed accept or submit.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn edit_meta_field(&mut self, field: ListField, value: impl Into<String>) {
        self.issues.clear();
        let value = value.into();
        match field {
            ListField::Name => self.meta.name = value,
            ListField::Description => self.meta.description = value,
            ListField::Thumbnail => self.meta.thumbnail = value,
        }
    }

    /// Opens a blank pending place at `at`. Does nothing and returns false when a place is
    /// already pending.
    pub fn begin_place_at(&mut self, at: Coordinates) -> bool {
        if self.pending.is_some() {
            tracing::debug!("ignoring map click at {}: a place is pending", at);
            return false;
        }
        self.issues.clear();
        self.pending = Some(DraftPlace::at(at));
        true
    }

    pub fn edit_pending_field(
        &mut self,
        field: PlaceField,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        let pending = self.pending.as_mut().ok_or(DraftError::NoPendingPlace)?;
        let value = value.into();
        match field {
            PlaceField::Name => pending.name = value,
            PlaceField::Description => pending.description = value,
            PlaceField::Thumbnail => pending.thumbnail = Some(value).filter(|v| !v.is_empty()),
            PlaceField::Banner => pending.banner = Some(value).filter(|v| !v.is_empty()),
        }
        self.issues.clear();
        Ok(())
    }

    /// Validates the pending place and moves it to the end of the committed places.
    ///
    /// On failure nothing moves; the issues are returned and also kept for display.
    pub fn accept_pending(&mut self) -> Result<(), DraftError> {
        let pending = self.pending.as_ref().ok_or(DraftError::NoPendingPlace)?;
        if let Err(issues) = validation::validate_place(pending) {
            self.issues = issues.clone();
            return Err(DraftError::Invalid(issues));
        }
        if let Some(place) = self.pending.take() {
            self.committed.push(place);
        }
        self.issues.clear();
        Ok(())
    }

    /// Drops the pending place. Returns false if there was none.
    pub fn discard_pending(&mut self) -> bool {
        self.issues.clear();
        self.pending.take().is_some()
    }

    /// Moves committed place `index` back into the pending slot for editing.
    pub fn edit_committed(&mut self, index: usize) -> Result<(), DraftError> {
        if self.pending.is_some() {
            return Err(DraftError::PendingPlaceOpen);
        }
        self.check_index(index)?;
        self.issues.clear();
        self.pending = Some(self.committed.remove(index));
        Ok(())
    }

    pub fn remove_committed(&mut self, index: usize) -> Result<DraftPlace, DraftError> {
        self.check_index(index)?;
        self.issues.clear();
        Ok(self.committed.remove(index))
    }

    /// Applies a resolved map click.
    pub fn handle_map_action(&mut self, action: MapAction) -> Result<(), DraftError> {
        match action {
            MapAction::Background(at) => {
                self.begin_place_at(at);
                Ok(())
            }
            MapAction::EditCommitted(index) => self.edit_committed(index),
            MapAction::Select(_) => Ok(()),
        }
    }

    pub fn markers(&self) -> Vec<MarkerSpec> {
        map::draft_markers(&self.committed, self.pending.as_ref())
    }

    pub fn viewport(&self) -> Viewport {
        map::draft_viewport()
    }

    /// The create-list payload for the committed places. The pending place is not part of
    /// it.
    pub fn to_new_list(&self) -> NewList {
        NewList {
            name: self.meta.name.clone(),
            description: self.meta.description.clone(),
            thumbnail: Some(self.meta.thumbnail.clone()).filter(|t| !t.is_empty()),
            places: self.committed.clone(),
        }
    }

    /// Validates and posts the draft.
    ///
    /// Local schema failures never reach the network. On success the draft is emptied and
    /// the new list id returned; on any failure the draft is left as it was so it can be
    /// resubmitted.
    pub async fn submit<C: HttpClient>(
        &mut self,
        api: &TerraceApi<C>,
        loading: &LoadingFlags,
    ) -> Result<ListId, SubmitError> {
        self.issues.clear();
        let list = self.to_new_list();
        if let Err(issues) = validation::validate_new_list(&list) {
            self.issues = issues.clone();
            return Err(SubmitError::Validation(issues));
        }

        let outcome = {
            let _loading = loading.guard(LOADING_ADDING_LIST);
            api.create_list(&list).await
        };

        match outcome {
            Ok(CreateListOutcome::Created(id)) => {
                tracing::info!("created list {} with {} places", id, list.places.len());
                *self = Draft::default();
                Ok(id)
            }
            Ok(CreateListOutcome::Rejected(issues)) => {
                self.issues = issues.clone();
                Err(SubmitError::ServerValidation(issues))
            }
            Err(e) => {
                tracing::error!("submitting list failed: {}", e);
                Err(SubmitError::Request(e))
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<(), DraftError> {
        if index >= self.committed.len() {
            return Err(DraftError::IndexOutOfRange {
                index,
                len: self.committed.len(),
            });
        }
        Ok(())
    }

    /// Committed places plus the pending one, if any.
    pub fn place_count(&self) -> usize {
        self.committed.len() + usize::from(self.pending.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ok, rejected, status, ScriptedClient};

    fn at(lat: f64, lon: f64) -> Coordinates {
        Coordinates::unchecked(lat, lon)
    }

    fn commit(draft: &mut Draft, name: &str, lat: f64, lon: f64) {
        assert!(draft.begin_place_at(at(lat, lon)));
        draft.edit_pending_field(PlaceField::Name, name).unwrap();
        draft
            .edit_pending_field(PlaceField::Description, "Worth a visit")
            .unwrap();
        draft.accept_pending().unwrap();
    }

    fn ready_draft() -> Draft {
        let mut draft = Draft::new();
        draft.edit_meta_field(ListField::Name, "London sights");
        draft.edit_meta_field(ListField::Description, "Things to see");
        commit(&mut draft, "Big Ben", 51.5, -0.12);
        commit(&mut draft, "London Eye", 51.5, -0.11);
        draft
    }

    #[test]
    fn test_begin_place_at_opens_blank_pending() {
        let mut draft = Draft::new();
        assert!(draft.begin_place_at(at(51.5, -0.1)));
        let pending = draft.pending().unwrap();
        assert_eq!(pending.coordinates(), at(51.5, -0.1));
        assert_eq!(pending.name, "");
        assert_eq!(pending.description, "");
    }

    #[test]
    fn test_second_click_is_ignored_while_pending() {
        let mut draft = Draft::new();
        draft.begin_place_at(at(1.0, 1.0));
        draft.edit_pending_field(PlaceField::Name, "Kept").unwrap();
        assert!(!draft.begin_place_at(at(2.0, 2.0)));
        let pending = draft.pending().unwrap();
        assert_eq!(pending.coordinates(), at(1.0, 1.0));
        assert_eq!(pending.name, "Kept");
    }

    #[test]
    fn test_edit_pending_without_pending_fails() {
        let mut draft = Draft::new();
        assert_eq!(
            draft.edit_pending_field(PlaceField::Name, "x"),
            Err(DraftError::NoPendingPlace)
        );
        assert_eq!(draft.accept_pending(), Err(DraftError::NoPendingPlace));
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!("banner".parse::<PlaceField>(), Ok(PlaceField::Banner));
        assert_eq!("thumbnail".parse::<ListField>(), Ok(ListField::Thumbnail));
        assert_eq!(
            "banner".parse::<ListField>(),
            Err(DraftError::UnknownField("banner".into()))
        );
    }

    #[test]
    fn test_accept_with_short_description_keeps_state() {
        let mut draft = Draft::new();
        draft.begin_place_at(at(51.5, -0.1));
        draft.edit_pending_field(PlaceField::Name, "Big Ben").unwrap();
        draft.edit_pending_field(PlaceField::Description, "ok").unwrap();

        let err = draft.accept_pending().expect_err("description too short");
        let expected = vec![Issue::new(
            &["description"],
            "String must contain at least 4 character(s)",
        )];
        assert_eq!(err, DraftError::Invalid(expected.clone()));
        assert!(draft.committed().is_empty());
        assert_eq!(draft.pending().unwrap().name, "Big Ben");
        assert_eq!(draft.issues(), expected.as_slice());

        draft
            .edit_pending_field(PlaceField::Description, "A clock tower")
            .unwrap();
        assert!(draft.issues().is_empty());
        draft.accept_pending().unwrap();
        assert_eq!(draft.committed().len(), 1);
        assert!(draft.pending().is_none());
    }

    #[test]
    fn test_empty_urls_count_as_absent() {
        let mut draft = Draft::new();
        draft.begin_place_at(at(1.0, 1.0));
        draft.edit_pending_field(PlaceField::Thumbnail, "").unwrap();
        draft
            .edit_pending_field(PlaceField::Banner, "https://img.example.com/b.png")
            .unwrap();
        let pending = draft.pending().unwrap();
        assert_eq!(pending.thumbnail, None);
        assert_eq!(pending.banner.as_deref(), Some("https://img.example.com/b.png"));
    }

    #[test]
    fn test_discard_pending() {
        let mut draft = Draft::new();
        assert!(!draft.discard_pending());
        draft.begin_place_at(at(1.0, 1.0));
        assert!(draft.discard_pending());
        assert!(draft.pending().is_none());
        assert!(draft.begin_place_at(at(2.0, 2.0)));
    }

    #[test]
    fn test_edit_committed_round_trips_through_pending() {
        let mut draft = ready_draft();
        draft.edit_committed(0).unwrap();
        assert_eq!(draft.committed().len(), 1);
        assert_eq!(draft.pending().unwrap().name, "Big Ben");
        assert_eq!(draft.edit_committed(0), Err(DraftError::PendingPlaceOpen));

        draft.accept_pending().unwrap();
        let names: Vec<_> = draft.committed().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["London Eye", "Big Ben"]);
    }

    #[test]
    fn test_remove_committed() {
        let mut draft = ready_draft();
        assert_eq!(
            draft.remove_committed(5),
            Err(DraftError::IndexOutOfRange { index: 5, len: 2 })
        );
        let removed = draft.remove_committed(0).unwrap();
        assert_eq!(removed.name, "Big Ben");
        assert_eq!(draft.committed().len(), 1);
        assert!(draft.pending().is_none());
    }

    #[test]
    fn test_place_count_changes_only_through_allowed_operations() {
        let mut draft = Draft::new();
        assert_eq!(draft.place_count(), 0);

        draft.begin_place_at(at(1.0, 1.0));
        assert_eq!(draft.place_count(), 1);
        let _ = draft.accept_pending();
        assert_eq!(draft.place_count(), 1);
        draft.begin_place_at(at(2.0, 2.0));
        assert_eq!(draft.place_count(), 1);

        draft.discard_pending();
        assert_eq!(draft.place_count(), 0);

        commit(&mut draft, "Big Ben", 51.5, -0.12);
        assert_eq!(draft.place_count(), 1);
        draft.edit_committed(0).unwrap();
        assert_eq!(draft.place_count(), 1);
        draft.accept_pending().unwrap();
        draft.remove_committed(0).unwrap();
        assert_eq!(draft.place_count(), 0);
    }

    #[test]
    fn test_handle_map_action() {
        let mut draft = ready_draft();
        draft
            .handle_map_action(MapAction::EditCommitted(1))
            .unwrap();
        assert_eq!(draft.pending().unwrap().name, "London Eye");

        draft
            .handle_map_action(MapAction::Background(at(9.0, 9.0)))
            .unwrap();
        assert_eq!(draft.pending().unwrap().name, "London Eye");

        draft.discard_pending();
        draft
            .handle_map_action(MapAction::Background(at(9.0, 9.0)))
            .unwrap();
        assert_eq!(draft.pending().unwrap().coordinates(), at(9.0, 9.0));
    }

    #[test]
    fn test_markers_follow_draft() {
        let mut draft = ready_draft();
        assert!(draft.markers().iter().all(|m| m.interactive));
        draft.begin_place_at(at(3.0, 3.0));
        let markers = draft.markers();
        assert_eq!(markers.len(), 3);
        assert!(markers[..2].iter().all(|m| !m.interactive));
    }

    #[tokio::test]
    async fn test_submit_with_one_place_makes_no_request() {
        let api = TerraceApi::new(ScriptedClient::new());
        let loading = LoadingFlags::new();
        let mut draft = Draft::new();
        draft.edit_meta_field(ListField::Name, "London sights");
        draft.edit_meta_field(ListField::Description, "Things to see");
        commit(&mut draft, "Big Ben", 51.5, -0.12);

        let err = draft.submit(&api, &loading).await.expect_err("one place");
        assert!(matches!(err, SubmitError::Validation(ref issues) if issues[0].path == vec!["places"]));
        assert!(api.client().requests().is_empty());
        assert_eq!(draft.committed().len(), 1);
        assert!(!draft.issues().is_empty());
    }

    #[tokio::test]
    async fn test_submit_success_clears_draft() {
        let api =
            TerraceApi::new(ScriptedClient::new().respond("/list", ok(serde_json::json!({"id": 42}))));
        let loading = LoadingFlags::new();
        let mut draft = ready_draft();

        let id = draft.submit(&api, &loading).await.unwrap();
        assert_eq!(id, ListId(42));
        assert_eq!(
            crate::routes::Route::index(Some(id)).to_string(),
            "/?listId=42"
        );
        assert!(draft.committed().is_empty());
        assert_eq!(draft.meta(), &ListMeta::default());
        assert!(!loading.is_loading());

        let body = api.client().requests()[0].body.clone().unwrap();
        assert_eq!(body["name"], "London sights");
        assert_eq!(body["places"].as_array().unwrap().len(), 2);
        assert!(body.get("thumbnail").is_none());
    }

    #[tokio::test]
    async fn test_submit_server_validation_keeps_draft() {
        let issues = serde_json::json!([{"path": ["name"], "message": "Name already taken"}]);
        let api = TerraceApi::new(ScriptedClient::new().respond("/list", rejected("VALIDATION", issues)));
        let loading = LoadingFlags::new();
        let mut draft = ready_draft();

        let err = draft.submit(&api, &loading).await.expect_err("rejected");
        assert!(matches!(err, SubmitError::ServerValidation(_)));
        assert_eq!(draft.committed().len(), 2);
        assert_eq!(draft.issues(), &[Issue::new(&["name"], "Name already taken")]);
    }

    #[tokio::test]
    async fn test_submit_server_failure_keeps_draft() {
        let api = TerraceApi::new(ScriptedClient::new().respond("/list", status(500)));
        let loading = LoadingFlags::new();
        let mut draft = ready_draft();

        let err = draft.submit(&api, &loading).await.expect_err("server down");
        assert!(matches!(err, SubmitError::Request(TerraceError::Server { status: 500, .. })));
        assert_eq!(draft.committed().len(), 2);
        assert!(draft.issues().is_empty());
    }
}
