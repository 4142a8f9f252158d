//! Paginated, filterable entity lists backed by the admin API.

pub mod controller;
pub mod registry;
pub mod resources;

pub use controller::{ListController, ReloadOutcome};
pub use registry::{ControllerRegistry, ListKind};

use crate::api::error::ApiError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Filter name to value. An absent key means "no filter".
pub type Filters = BTreeMap<String, String>;

/// In-memory state of one entity list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    /// Current page, never below 1.
    pub page: u32,
    pub filters: Filters,
    /// Items of the last successful load, after client-side filtering.
    pub items: Vec<T>,
    /// Whether a reload is in flight.
    pub loading: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            page: 1,
            filters: Filters::new(),
            items: Vec::new(),
            loading: false,
        }
    }
}

/// One entity type served by a list endpoint.
pub trait Resource: Send + Sync + 'static {
    type Item: Clone + Debug + PartialEq + Send + Sync + DeserializeOwned + 'static;

    /// Plural name used in messages, e.g. "withdrawals".
    const NAME: &'static str;
    /// List endpoint path.
    const ENDPOINT: &'static str;
    /// Key of the item array in the response body.
    const ITEMS_KEY: &'static str;
    /// Filters the server applies itself; everything else is applied locally.
    const SERVER_FILTERS: &'static [&'static str] = &[];
    /// Success feedback after a load, if this list announces it.
    const LOADED_MESSAGE: Option<&'static str> = None;
    /// Column headers for rendering.
    const COLUMNS: &'static [&'static str];

    /// Client-side filter predicate.
    fn matches(_item: &Self::Item, _filters: &Filters) -> bool {
        true
    }

    /// Renders one item as table cells, in [`Self::COLUMNS`] order.
    fn row(item: &Self::Item) -> Vec<String>;

    /// Pulls the item array out of a response body.
    ///
    /// Items are looked up at the top level first and then under `data`.
    fn extract(body: Value) -> Result<Vec<Self::Item>, ApiError> {
        let missing = || ApiError::Transport(format!("Response is missing `{}`", Self::ITEMS_KEY));
        let Value::Object(mut body) = body else {
            return Err(missing());
        };
        let items = match body.remove(Self::ITEMS_KEY) {
            Some(items) => items,
            None => match body.remove("data") {
                Some(Value::Array(items)) => Value::Array(items),
                Some(Value::Object(mut data)) => data.remove(Self::ITEMS_KEY).ok_or_else(missing)?,
                _ => return Err(missing()),
            },
        };
        Ok(serde_json::from_value(items)?)
    }
}
