//! Credential store
//!
//! Reads and merges the API base URL and bearer token of one profile.

use crate::config::LocalStorage;
use crate::profile::{ApiProfile, CredentialKeys};
use serde::{Deserialize, Serialize};

/// API base URL and bearer token. Either may be unset.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

impl Credentials {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Token suitable for an `Authorization` header; empty tokens count as absent.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }
}

/// Shows the first and last four characters of a token, starring the rest.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

/// Credential store scoped to one [`ApiProfile`].
#[derive(Debug, Clone)]
pub struct CredentialStore {
    storage: LocalStorage,
    keys: CredentialKeys,
}

impl CredentialStore {
    pub fn new(storage: LocalStorage, profile: ApiProfile) -> Self {
        Self {
            storage,
            keys: profile.credential_keys(),
        }
    }

    /// Reads the current credentials from storage.
    pub fn get(&self) -> Result<Credentials, std::io::Error> {
        let base_url = match self.keys.base_url {
            Some(key) => self.storage.get_item(key)?,
            None => None,
        };
        Ok(Credentials {
            base_url,
            token: self.storage.get_item(self.keys.token)?,
        })
    }

    /// Merges `update` into storage: only fields that are `Some` are written.
    ///
    /// Setting a base URL on a profile without a stored base URL is ignored.
    pub fn set(&self, update: &Credentials) -> Result<(), std::io::Error> {
        if let (Some(key), Some(base_url)) = (self.keys.base_url, &update.base_url) {
            self.storage.set_item(key, base_url)?;
        }
        if let Some(token) = &update.token {
            self.storage.set_item(self.keys.token, token)?;
        }
        Ok(())
    }

    /// Removes this profile's credentials, leaving other profiles untouched.
    pub fn clear(&self) -> Result<(), std::io::Error> {
        if let Some(key) = self.keys.base_url {
            self.storage.remove_item(key)?;
        }
        self.storage.remove_item(self.keys.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(dir: &tempfile::TempDir, profile: ApiProfile) -> CredentialStore {
        CredentialStore::new(LocalStorage::new(dir.path().join("storage.json")), profile)
    }

    #[test]
    fn test_round_trip_returns_same_credentials() {
        let dir = tempdir().unwrap();
        let store = store(&dir, ApiProfile::Console);

        let creds = Credentials::default()
            .with_base_url("https://api.example.com")
            .with_token("secret");
        store.set(&creds).unwrap();

        assert_eq!(store.get().unwrap(), creds);
    }

    #[test]
    // Setting only the token must not clear a previously stored base URL.
    fn test_set_token_preserves_base_url() {
        let dir = tempdir().unwrap();
        let store = store(&dir, ApiProfile::Console);
        store
            .set(&Credentials::default().with_base_url("https://api.example.com"))
            .unwrap();

        store.set(&Credentials::default().with_token("t2")).unwrap();

        let creds = store.get().unwrap();
        assert_eq!(creds.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(creds.token.as_deref(), Some("t2"));
    }

    #[test]
    fn test_unconfigured_store_is_empty() {
        let dir = tempdir().unwrap();
        assert_eq!(
            store(&dir, ApiProfile::Console).get().unwrap(),
            Credentials::default()
        );
    }

    #[test]
    fn test_profiles_are_isolated() {
        let dir = tempdir().unwrap();
        let legacy = store(&dir, ApiProfile::Legacy);
        let console = store(&dir, ApiProfile::Console);

        legacy.set(&Credentials::default().with_token("legacy")).unwrap();
        console.set(&Credentials::default().with_token("console")).unwrap();
        console.clear().unwrap();

        assert_eq!(legacy.get().unwrap().token.as_deref(), Some("legacy"));
        assert_eq!(console.get().unwrap(), Credentials::default());
    }

    #[test]
    fn test_empty_base_url_is_kept_distinct_from_absent() {
        let dir = tempdir().unwrap();
        let store = store(&dir, ApiProfile::Console);
        assert_eq!(store.get().unwrap().base_url, None);

        store.set(&Credentials::default().with_base_url("")).unwrap();

        assert_eq!(store.get().unwrap().base_url, Some(String::new()));
    }

    #[test]
    fn test_mask_token_hides_the_middle() {
        assert_eq!(mask_token("abcdefghijklmnop"), "abcd****mnop");
        assert_eq!(mask_token("short"), "*****");
    }

    #[test]
    fn test_empty_token_is_not_a_bearer_token() {
        let creds = Credentials::default().with_token("");
        assert_eq!(creds.bearer_token(), None);
        assert_eq!(
            Credentials::default().with_token("abc").bearer_token(),
            Some("abc")
        );
    }
}
