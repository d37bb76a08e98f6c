use std::sync::Arc;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{CategoryId, ItemId, ResourceKind},
    error::ErrorBody,
    protocol::{
        CategoryListing, CategoryQuestions, CategoryRef, MutationAck, NewQuestion, Question,
        QuestionPage, SearchRequest, SearchResults, PAGE_SIZE,
    },
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub mod config;
pub mod error;
pub mod presentation;
pub mod state;

pub use config::{AuthSettings, Settings};
pub use error::{ErrorKind, ListError};
pub use presentation::{AssumeYes, Confirmer, Notifier};
pub use state::{ListItem, ListState, PageLabel};

const CATEGORIES_FAILURE_MESSAGE: &str = "Unable to load categories. Please try your request again";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Keeps the displayed list in step with a remote collection.
///
/// Every successful call replaces the published [`ListState`] as a whole.
/// Failed calls notify the user and leave the state untouched. Overlapping
/// calls are not sequenced: whichever response lands last wins.
pub struct ListController<T: ListItem = Question> {
    http: Client,
    base_url: String,
    resource: ResourceKind,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
    state: watch::Sender<Arc<ListState<T>>>,
}

impl<T: ListItem> ListController<T> {
    pub fn new(
        base_url: impl Into<String>,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let (state, _) = watch::channel(Arc::new(ListState::default()));
        Self {
            http: Client::new(),
            base_url,
            resource: ResourceKind::default(),
            notifier,
            confirmer,
            state,
        }
    }

    pub fn from_settings(
        settings: &Settings,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        Self::new(settings.base_url(), notifier, confirmer)
    }

    pub fn with_resource(mut self, resource: ResourceKind) -> Self {
        self.resource = resource;
        self
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn resource(&self) -> ResourceKind {
        self.resource
    }

    pub fn state(&self) -> Arc<ListState<T>> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ListState<T>>> {
        self.state.subscribe()
    }

    pub fn pagination_labels(&self) -> impl Iterator<Item = PageLabel> {
        self.state().pagination_labels()
    }

    pub fn resolve_category_label(&self, id: CategoryId) -> Result<String, ListError> {
        self.state().category_label(id).map(str::to_owned)
    }

    /// Loads page `page` of the unfiltered collection.
    ///
    /// The upper bound is only known while the snapshot shows the unfiltered
    /// list; after a filter or search any page from 1 is sent.
    pub async fn load_page(&self, page: u32) -> Result<(), ListError> {
        let current = self.state();
        let last = current.last_page();
        let bounded = current.has_loaded() && current.is_unfiltered();
        if page == 0 || (bounded && page > last) {
            warn!(page, last, resource = %self.resource, "rejecting out-of-range page");
            return Err(ListError::PageOutOfRange {
                requested: page,
                last,
            });
        }
        self.fetch_page(page).await
    }

    pub async fn filter_by_category(&self, category_id: CategoryId) -> Result<(), ListError> {
        let collection = self.resource.collection();
        let endpoint = format!("GET /categories/{category_id}/{collection}");
        let request = self
            .http
            .get(self.url(&format!("/categories/{category_id}/{collection}")));
        let result = self
            .fetch::<CategoryQuestions<T>>(&endpoint, request)
            .await;
        let body = self.report("filter_by_category", &self.resource.load_failure_message(), result)?;

        self.replace(|previous| ListState {
            items: body.questions,
            page: 1,
            page_size: PAGE_SIZE,
            total_count: body.total_questions,
            active_category: body
                .current_category
                .or(Some(CategoryRef::Id(category_id))),
            search_term: None,
            categories: previous.categories.clone(),
            revision: previous.revision + 1,
        });
        info!(%category_id, resource = %self.resource, "list filtered by category");
        Ok(())
    }

    /// Free-text search. The term travels in a JSON body so any character is allowed.
    pub async fn search(&self, term: &str) -> Result<(), ListError> {
        let collection = self.resource.collection();
        let endpoint = format!("POST /{collection}/search");
        let request = self
            .http
            .post(self.url(&format!("/{collection}/search")))
            .json(&SearchRequest {
                search_term: term.to_string(),
            });
        let result = self.fetch::<SearchResults<T>>(&endpoint, request).await;
        let body = self.report("search", &self.resource.load_failure_message(), result)?;

        let items = body.questions.unwrap_or_default();
        let total_count = body.total_questions.unwrap_or(0);
        self.replace(|previous| ListState {
            items,
            page: 1,
            page_size: PAGE_SIZE,
            total_count,
            active_category: body.current_category,
            search_term: Some(term.to_string()),
            categories: previous.categories.clone(),
            revision: previous.revision + 1,
        });
        info!(matches = total_count, resource = %self.resource, "search completed");
        Ok(())
    }

    /// Deletes after confirmation, then re-fetches the current page.
    ///
    /// A failure from the re-fetch is returned as-is; the remote item is already
    /// gone at that point.
    pub async fn delete_item(&self, id: ItemId) -> Result<DeleteOutcome, ListError> {
        if !self.confirmer.confirm(&self.resource.delete_prompt()).await {
            info!(%id, resource = %self.resource, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let collection = self.resource.collection();
        let endpoint = format!("DELETE /{collection}/{id}");
        let request = self.http.delete(self.url(&format!("/{collection}/{id}")));
        let result = self
            .fetch::<MutationAck>(&endpoint, request)
            .await
            .and_then(|ack| require_success(&endpoint, ack));
        self.report("delete_item", &self.resource.load_failure_message(), result)?;
        info!(%id, resource = %self.resource, "item deleted");

        self.fetch_page(self.state().page).await?;
        Ok(DeleteOutcome::Deleted)
    }

    /// Creates a question, then re-fetches the current page.
    pub async fn create_item(&self, new_item: &NewQuestion) -> Result<(), ListError> {
        let collection = self.resource.collection();
        let endpoint = format!("POST /{collection}");
        let request = self
            .http
            .post(self.url(&format!("/{collection}")))
            .json(new_item);
        let result = self
            .fetch::<MutationAck>(&endpoint, request)
            .await
            .and_then(|ack| require_success(&endpoint, ack));
        self.report("create_item", &self.resource.create_failure_message(), result)?;
        info!(resource = %self.resource, "item created");

        self.fetch_page(self.state().page).await
    }

    /// Refreshes the category set only; the rest of the snapshot is carried over.
    pub async fn load_categories(&self) -> Result<(), ListError> {
        let endpoint = "GET /categories";
        let request = self.http.get(self.url("/categories"));
        let result = self.fetch::<CategoryListing>(endpoint, request).await;
        let body = self.report("load_categories", CATEGORIES_FAILURE_MESSAGE, result)?;

        let categories = body.categories.into_vec();
        info!(
            count = categories.len(),
            total = body.total_categories,
            "categories loaded"
        );
        self.replace(|previous| ListState {
            categories,
            revision: previous.revision + 1,
            ..previous.clone()
        });
        Ok(())
    }

    async fn fetch_page(&self, page: u32) -> Result<(), ListError> {
        let collection = self.resource.collection();
        let endpoint = format!("GET /{collection}?page={page}");
        let request = self
            .http
            .get(self.url(&format!("/{collection}")))
            .query(&[("page", page)]);
        let result = self.fetch::<QuestionPage<T>>(&endpoint, request).await;
        let body = self.report("load_page", &self.resource.load_failure_message(), result)?;

        let categories = body.categories.into_vec();
        let mut next = ListState {
            items: body.questions,
            page,
            page_size: PAGE_SIZE,
            total_count: body.total_questions,
            active_category: None,
            search_term: None,
            categories,
            revision: 0,
        };
        // A mutation can shrink the collection under the page being shown.
        let last = next.last_page();
        if page > last {
            warn!(requested = page, last, resource = %self.resource, "clamping page past the end");
            next.page = last;
        }
        self.replace(|previous| ListState {
            revision: previous.revision + 1,
            ..next
        });
        info!(page, resource = %self.resource, "page loaded");
        Ok(())
    }

    async fn fetch<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<R, ListError> {
        debug!(endpoint, "dispatching list request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = ErrorBody::parse(&body)
                .map(|error_body| error_body.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(ListError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|err| ListError::contract(endpoint, err.to_string()))
    }

    fn report<V>(
        &self,
        operation: &'static str,
        message: &str,
        result: Result<V, ListError>,
    ) -> Result<V, ListError> {
        if let Err(err) = &result {
            error!(
                operation,
                resource = %self.resource,
                kind = ?err.kind(),
                error = %err,
                "list operation failed"
            );
            self.notifier.notify(message);
        }
        result
    }

    fn replace(&self, build: impl FnOnce(&ListState<T>) -> ListState<T>) {
        self.state.send_modify(|current| {
            let next = build(&**current);
            *current = Arc::new(next);
        });
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn require_success(endpoint: &str, ack: MutationAck) -> Result<MutationAck, ListError> {
    if ack.succeeded() {
        Ok(ack)
    } else {
        Err(ListError::contract(
            endpoint,
            "response is missing a truthy `success` marker",
        ))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
