//! Header search over list names.

use crate::api::TerraceApi;
use crate::constants::LOADING_SEARCH;
use crate::http::HttpClient;
use crate::store::LoadingFlags;
use crate::TerraceResult;
use terrace_types::ListSummary;

#[derive(Debug)]
pub struct SearchSession {
    loading: LoadingFlags,
    term: String,
    results: Vec<ListSummary>,
    open: bool,
}

impl SearchSession {
    pub fn new(loading: LoadingFlags) -> Self {
        Self {
            loading,
            term: String::new(),
            results: Vec::new(),
            open: false,
        }
    }

    /// Runs a search and opens the results. A blank term closes them instead.
    pub async fn search<C: HttpClient>(
        &mut self,
        api: &TerraceApi<C>,
        term: &str,
    ) -> TerraceResult<&[ListSummary]> {
        self.term = term.trim().to_string();
        if self.term.is_empty() {
            self.close();
            return Ok(&self.results);
        }

        let results = {
            let _loading = self.loading.guard(LOADING_SEARCH);
            api.search_lists(&self.term).await?
        };
        tracing::debug!("search {:?} found {} lists", self.term, results.len());
        self.results = results;
        self.open = true;
        Ok(&self.results)
    }

    pub fn close(&mut self) {
        self.results.clear();
        self.open = false;
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn results(&self) -> &[ListSummary] {
        &self.results
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
