//! List controller
//!
//! Owns the state of one entity list. Every reload is tagged with a sequence
//! number; only the response to the most recently issued reload is applied.

use super::{Filters, ListState, Resource};
use crate::api::ApiClient;
use crate::api::error::ApiError;
use crate::consts::cli_consts::PAGE_SIZE;
use crate::error_classifier::ErrorClassifier;
use crate::feedback::FeedbackQueue;
use crate::logging::log_at;
use log::debug;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, watch};

/// What happened to the result of one reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Items were replaced; carries the number of items now shown.
    Applied(usize),
    /// The request failed; previous items were kept.
    Failed(ApiError),
    /// A newer reload was issued meanwhile, so this result was dropped.
    Stale,
}

pub struct ListController<R: Resource> {
    client: ApiClient,
    feedback: FeedbackQueue,
    state: Mutex<ListState<R::Item>>,
    /// Sequence number of the latest issued reload.
    issued: AtomicU64,
    render: watch::Sender<ListState<R::Item>>,
    classifier: ErrorClassifier,
}

impl<R: Resource> ListController<R> {
    pub fn new(client: ApiClient, feedback: FeedbackQueue) -> Self {
        let (render, _) = watch::channel(ListState::default());
        Self {
            client,
            feedback,
            state: Mutex::new(ListState::default()),
            issued: AtomicU64::new(0),
            render,
            classifier: ErrorClassifier::new(),
        }
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> ListState<R::Item> {
        self.state.lock().await.clone()
    }

    /// Receives every published state. Renderers hold these, never the controller.
    pub fn subscribe(&self) -> watch::Receiver<ListState<R::Item>> {
        self.render.subscribe()
    }

    /// Sets page and filters in one step, without reloading.
    ///
    /// Any reload still in flight is superseded.
    pub async fn set_view(&self, page: u32, filters: Filters) {
        let mut state = self.state.lock().await;
        state.page = page.max(1);
        state.filters = filters
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect();
        state.loading = false;
        self.issued.fetch_add(1, Ordering::SeqCst);
        self.render.send_replace(state.clone());
    }

    /// Sets (or with an empty value, clears) one filter and reloads.
    pub async fn set_filter(&self, name: &str, value: &str) -> ReloadOutcome {
        let (sequence, path) = {
            let mut state = self.state.lock().await;
            if value.is_empty() {
                state.filters.remove(name);
            } else {
                state.filters.insert(name.to_string(), value.to_string());
            }
            self.begin_reload(&mut state)
        };
        self.complete_reload(sequence, path).await
    }

    /// Moves the page by `delta`, clamped at 1, then reloads.
    ///
    /// The new page is published, still loading, before the request goes out.
    pub async fn change_page(&self, delta: i64) -> ReloadOutcome {
        let (sequence, path) = {
            let mut state = self.state.lock().await;
            let page = (i64::from(state.page) + delta).max(1);
            state.page = u32::try_from(page).unwrap_or(u32::MAX);
            self.begin_reload(&mut state)
        };
        self.complete_reload(sequence, path).await
    }

    /// Fetches the current page with the current filters.
    pub async fn reload(&self) -> ReloadOutcome {
        let (sequence, path) = {
            let mut state = self.state.lock().await;
            self.begin_reload(&mut state)
        };
        self.complete_reload(sequence, path).await
    }

    /// Issues a new sequence number and marks the list loading.
    ///
    /// Must run under the same lock as the page or filter change it serves,
    /// so no older response can land in between.
    fn begin_reload(&self, state: &mut ListState<R::Item>) -> (u64, String) {
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        state.loading = true;
        self.render.send_replace(state.clone());
        (sequence, Self::list_path(state.page, &state.filters))
    }

    async fn complete_reload(&self, sequence: u64, path: String) -> ReloadOutcome {
        let result = match self.client.get::<Value>(&path).await {
            Ok(body) => R::extract(body),
            Err(e) => Err(e),
        };

        let mut state = self.state.lock().await;
        if sequence != self.issued.load(Ordering::SeqCst) {
            debug!(
                "Discarding stale {} response (request {} superseded)",
                R::NAME,
                sequence
            );
            return ReloadOutcome::Stale;
        }
        state.loading = false;

        match result {
            Ok(items) => {
                let filters = state.filters.clone();
                state.items = items
                    .into_iter()
                    .filter(|item| R::matches(item, &filters))
                    .collect();
                let count = state.items.len();
                self.render.send_replace(state.clone());
                drop(state);

                if let Some(message) = R::LOADED_MESSAGE {
                    self.feedback.success(message).await;
                }
                ReloadOutcome::Applied(count)
            }
            Err(error) => {
                self.render.send_replace(state.clone());
                drop(state);

                log_at(
                    self.classifier.classify_api_error(&error),
                    &format!("Loading {} failed: {}", R::NAME, error),
                );
                self.feedback
                    .error(format!("Failed to load {}: {}", R::NAME, error))
                    .await;
                ReloadOutcome::Failed(error)
            }
        }
    }

    /// Edits the loaded items in place, e.g. after a successful mutation.
    pub async fn update_items(&self, update: impl FnOnce(&mut Vec<R::Item>)) {
        let mut state = self.state.lock().await;
        update(&mut state.items);
        self.render.send_replace(state.clone());
    }

    fn list_path(page: u32, filters: &Filters) -> String {
        let skip = (page.max(1) - 1).saturating_mul(PAGE_SIZE);
        let mut query = vec![format!("skip={}", skip), format!("limit={}", PAGE_SIZE)];
        for name in R::SERVER_FILTERS {
            if let Some(value) = filters.get(*name).filter(|value| !value.is_empty()) {
                query.push(format!("{}={}", name, urlencoding::encode(value)));
            }
        }
        format!("{}?{}", R::ENDPOINT, query.join("&"))
    }
}
