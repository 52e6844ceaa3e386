//! The user page: a user and their lists, fetched a page at a time.

use crate::api::TerraceApi;
use crate::constants::{FIRST_PAGE_CURSOR, LOADING_USER};
use crate::http::HttpClient;
use crate::store::LoadingFlags;
use crate::{TerraceError, TerraceResult};
use terrace_types::{ListSummary, User, UserId};

#[derive(Debug)]
pub struct ProfileSession {
    loading: LoadingFlags,
    page_size: u32,
    user: Option<User>,
    lists: Vec<ListSummary>,
    /// Cursor of the next page to fetch; `None` once the server stops handing one out.
    cursor: Option<u64>,
}

impl ProfileSession {
    pub fn new(loading: LoadingFlags, page_size: u32) -> Self {
        Self {
            loading,
            page_size: page_size.max(1),
            user: None,
            lists: Vec::new(),
            cursor: None,
        }
    }

    /// Fetches the user and the first page of their lists. Returns `Ok(false)` when the
    /// server does not know the user (404); the caller should navigate away. Other failures
    /// are errors.
    pub async fn load<C: HttpClient>(
        &mut self,
        api: &TerraceApi<C>,
        user_id: &UserId,
    ) -> TerraceResult<bool> {
        self.user = None;
        self.lists.clear();
        self.cursor = None;

        let _loading = self.loading.guard(LOADING_USER);
        let user = match api.fetch_user(Some(user_id)).await {
            Ok(Some(user)) => user,
            Ok(None) | Err(TerraceError::Server { status: 404, .. }) => {
                tracing::info!("no user {}", user_id);
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        tracing::debug!("loaded profile for {}", user.id);
        self.user = Some(user);
        self.cursor = Some(FIRST_PAGE_CURSOR);
        self.fetch_page(api, user_id).await?;
        Ok(true)
    }

    /// Appends the next page. Returns how many lists were added.
    pub async fn load_more<C: HttpClient>(&mut self, api: &TerraceApi<C>) -> TerraceResult<usize> {
        let Some(user_id) = self.user.as_ref().map(|u| u.id.clone()) else {
            return Ok(0);
        };
        if !self.has_more() {
            return Ok(0);
        }
        let _loading = self.loading.guard(LOADING_USER);
        self.fetch_page(api, &user_id).await
    }

    async fn fetch_page<C: HttpClient>(
        &mut self,
        api: &TerraceApi<C>,
        user_id: &UserId,
    ) -> TerraceResult<usize> {
        let Some(cursor) = self.cursor else {
            return Ok(0);
        };
        let page = api
            .fetch_lists_by_user(user_id, cursor, self.page_size)
            .await?;
        let added = page.lists.len();
        self.lists.extend(page.lists);
        self.cursor = page.next_cursor;
        Ok(added)
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn lists(&self) -> &[ListSummary] {
        &self.lists
    }

    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set(LOADING_USER)
    }
}
