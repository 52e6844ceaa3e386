//! The index page: one list on the map, with a detail panel for the selected place.
//!
//! Requests are split into `begin_*` / `complete_*` pairs so a front end can run them
//! concurrently and hand responses back in whatever order they arrive. Every response is
//! matched against the request that is current at that moment; anything older is dropped.
//! `load` and `select_and_load` are the sequential shortcuts for callers that just await.

use crate::api::{parse_list_id, TerraceApi};
use crate::constants::{LOADING_LIST, LOADING_PLACE};
use crate::http::HttpClient;
use crate::map::{self, MapAction, MarkerSpec, Viewport};
use crate::selection::{RequestSlot, Selection, Ticket};
use crate::store::LoadingFlags;
use crate::{TerraceError, TerraceResult};
use terrace_types::{List, ListId, Place, PlaceId, User, UserId};

type PlaceKey = (ListId, PlaceId);

#[derive(Debug)]
pub struct BrowseSession {
    loading: LoadingFlags,
    list: RequestSlot<Option<ListId>, TerraceResult<Option<List>>>,
    creator: RequestSlot<UserId, Option<User>>,
    selection: Selection,
    detail: RequestSlot<PlaceKey, TerraceResult<Option<Place>>>,
}

impl BrowseSession {
    pub fn new(loading: LoadingFlags) -> Self {
        Self {
            loading,
            list: RequestSlot::new(),
            creator: RequestSlot::new(),
            selection: Selection::Idle,
            detail: RequestSlot::new(),
        }
    }

    /// Navigates to `?listId=<raw>`. The selection is reset before anything is fetched for
    /// the new list.
    pub fn open(&mut self, list_param: Option<&str>) -> Ticket<Option<ListId>> {
        self.deselect();
        self.creator.clear();
        let list_id = list_param.and_then(parse_list_id);
        if list_param.is_some() && list_id.is_none() {
            tracing::debug!("ignoring unusable listId {:?}", list_param);
        }
        self.loading.set(LOADING_LIST, true);
        self.list.begin(list_id)
    }

    /// Hands back the list response. Returns the creator's id when a current list arrived,
    /// so the caller can fetch the byline.
    pub fn complete_list(
        &mut self,
        ticket: Ticket<Option<ListId>>,
        result: TerraceResult<Option<List>>,
    ) -> Option<UserId> {
        let creator = match &result {
            Ok(Some(list)) => Some(list.user_id.clone()),
            Ok(None) => None,
            Err(e) => {
                tracing::error!("fetching list {:?} failed: {}", ticket.key(), e);
                None
            }
        };
        if !self.list.complete(ticket, result) {
            return None;
        }
        self.loading.set(LOADING_LIST, false);
        creator
    }

    pub fn begin_creator_fetch(&mut self, user_id: UserId) -> Ticket<UserId> {
        self.creator.begin(user_id)
    }

    /// A failed creator fetch only loses the byline.
    pub fn complete_creator(&mut self, ticket: Ticket<UserId>, result: TerraceResult<Option<User>>) {
        let user = result.unwrap_or_else(|e| {
            tracing::warn!("fetching creator {} failed: {}", ticket.key(), e);
            None
        });
        self.creator.complete(ticket, user);
    }

    /// Feeds a click that the map reconciler translated into an action.
    pub fn handle_map_action(&mut self, action: MapAction) -> Option<Ticket<PlaceKey>> {
        match action {
            MapAction::Select(place_id) => self.select_marker(place_id),
            MapAction::Background(_) => {
                self.deselect();
                None
            }
            MapAction::EditCommitted(_) => None,
        }
    }

    /// Selects a place of the loaded list and starts its detail fetch. Returns `None` when
    /// no fetch is needed: no list is loaded, the place is not on it, or its detail is
    /// already loaded or in flight. A failed detail is fetched again.
    pub fn select_marker(&mut self, place_id: PlaceId) -> Option<Ticket<PlaceKey>> {
        let list = self.list()?;
        if !list.places.iter().any(|p| p.id == place_id) {
            return None;
        }
        let list_id = list.id;

        let changed = self.selection.click_marker(place_id);
        let key = (list_id, place_id);
        let failed = matches!(self.detail.value(), Some(Err(_)));
        if !changed && self.detail.key() == Some(&key) && !failed {
            return None;
        }
        self.loading.set(LOADING_PLACE, true);
        Some(self.detail.begin(key))
    }

    /// Background click or closing the detail panel.
    pub fn deselect(&mut self) {
        self.selection.click_background();
        self.detail.clear();
        self.loading.set(LOADING_PLACE, false);
    }

    pub fn close_detail(&mut self) {
        self.deselect();
    }

    /// Hands back a place response. Returns false if it was stale and dropped.
    pub fn complete_place(
        &mut self,
        ticket: Ticket<PlaceKey>,
        result: TerraceResult<Option<Place>>,
    ) -> bool {
        if let Err(e) = &result {
            tracing::error!("fetching place {} failed: {}", ticket.key().1, e);
        }
        if !self.detail.complete(ticket, result) {
            return false;
        }
        self.loading.set(LOADING_PLACE, false);
        true
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn list(&self) -> Option<&List> {
        self.list.value()?.as_ref().ok()?.as_ref()
    }

    pub fn list_error(&self) -> Option<&TerraceError> {
        self.list.value()?.as_ref().err()
    }

    pub fn creator(&self) -> Option<&User> {
        self.creator.value()?.as_ref()
    }

    /// The detail shown in the panel, only while it matches the selection.
    pub fn detail(&self) -> Option<&Place> {
        let (_, place_id) = self.detail.key()?;
        if self.selection.selected() != Some(*place_id) {
            return None;
        }
        self.detail.value()?.as_ref().ok()?.as_ref()
    }

    pub fn detail_error(&self) -> Option<&TerraceError> {
        self.detail.value()?.as_ref().err()
    }

    pub fn is_list_loading(&self) -> bool {
        self.list.is_pending()
    }

    pub fn is_detail_loading(&self) -> bool {
        self.detail.is_pending()
    }

    pub fn markers(&self) -> Vec<MarkerSpec> {
        let places = self.list().map(|l| l.places.as_slice()).unwrap_or_default();
        map::browse_markers(places, &self.selection)
    }

    pub fn viewport(&self) -> Viewport {
        let places = self.list().map(|l| l.places.as_slice()).unwrap_or_default();
        map::browse_viewport(places)
    }

    /// Opens a list and waits for it and its creator.
    pub async fn load<C: HttpClient>(&mut self, api: &TerraceApi<C>, list_param: Option<&str>) {
        let ticket = self.open(list_param);
        let result = match ticket.key() {
            Some(id) => api.fetch_list_by_id(*id).await.map(Some),
            None => Ok(None),
        };
        if let Some(user_id) = self.complete_list(ticket, result) {
            let ticket = self.begin_creator_fetch(user_id);
            let result = api.fetch_user(Some(ticket.key())).await;
            self.complete_creator(ticket, result);
        }
    }

    /// Selects a place and waits for its detail. Returns false if nothing was fetched.
    pub async fn select_and_load<C: HttpClient>(
        &mut self,
        api: &TerraceApi<C>,
        place_id: PlaceId,
    ) -> bool {
        let Some(ticket) = self.select_marker(place_id) else {
            return false;
        };
        let (list_id, place_id) = *ticket.key();
        let result = api.fetch_place(Some(place_id), Some(list_id)).await;
        self.complete_place(ticket, result)
    }
}

impl Drop for BrowseSession {
    fn drop(&mut self) {
        self.loading.clear(LOADING_LIST);
        self.loading.clear(LOADING_PLACE);
    }
}
