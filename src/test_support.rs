//! Shared fixtures for unit tests.

use crate::api::{ApiClient, HttpResponse, Transport};
use crate::config::LocalStorage;
use crate::credentials::{CredentialStore, Credentials};
use crate::profile::ApiProfile;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

pub(crate) const TEST_BASE_URL: &str = "http://api.test";
pub(crate) const TEST_TOKEN: &str = "tok";

pub(crate) fn storage_in(dir: &TempDir) -> LocalStorage {
    LocalStorage::new(dir.path().join("storage.json"))
}

/// Console-profile client with a base URL and token already stored.
pub(crate) fn console_client(dir: &TempDir, transport: impl Transport + 'static) -> ApiClient {
    let store = CredentialStore::new(storage_in(dir), ApiProfile::Console);
    store
        .set(
            &Credentials::default()
                .with_base_url(TEST_BASE_URL)
                .with_token(TEST_TOKEN),
        )
        .unwrap();
    ApiClient::new(ApiProfile::Console, store, Arc::new(transport))
}

/// Legacy-profile client with a token stored under the legacy key.
pub(crate) fn legacy_client(dir: &TempDir, transport: impl Transport + 'static) -> ApiClient {
    let store = CredentialStore::new(storage_in(dir), ApiProfile::Legacy);
    store
        .set(&Credentials::default().with_token(TEST_TOKEN))
        .unwrap();
    ApiClient::new(ApiProfile::Legacy, store, Arc::new(transport))
}

pub(crate) fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}
