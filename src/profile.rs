use crate::consts::cli_consts::{console_api, legacy_api};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The two independently configured API clients the console talks through.
#[derive(Clone, Default, Copy, PartialEq, Eq, Hash)]
pub enum ApiProfile {
    /// Legacy admin endpoints, served from a fixed base URL.
    Legacy,
    /// Newer admin endpoints, served from a user-configured base URL.
    #[default]
    Console,
}

/// Where a profile takes its base URL from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BaseUrlSource {
    /// Always this URL; the credential store is never consulted for it.
    Fixed(String),
    /// Whatever is stored under the given key.
    Stored(&'static str),
}

/// Storage keys one profile reads its credentials from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CredentialKeys {
    /// Key for the base URL, absent for fixed-URL profiles.
    pub base_url: Option<&'static str>,
    pub token: &'static str,
}

impl ApiProfile {
    pub const ALL: [ApiProfile; 2] = [ApiProfile::Legacy, ApiProfile::Console];

    pub fn credential_keys(&self) -> CredentialKeys {
        match self {
            ApiProfile::Legacy => CredentialKeys {
                base_url: None,
                token: legacy_api::TOKEN_KEY,
            },
            ApiProfile::Console => CredentialKeys {
                base_url: Some(console_api::BASE_URL_KEY),
                token: console_api::TOKEN_KEY,
            },
        }
    }

    /// Returns the base URL policy, honoring the legacy override variable.
    pub fn base_url_source(&self) -> BaseUrlSource {
        match self {
            ApiProfile::Legacy => BaseUrlSource::Fixed(
                std::env::var(legacy_api::BASE_URL_ENV)
                    .ok()
                    .filter(|url| !url.is_empty())
                    .unwrap_or_else(|| legacy_api::BASE_URL.to_string()),
            ),
            ApiProfile::Console => BaseUrlSource::Stored(console_api::BASE_URL_KEY),
        }
    }

    /// Whether requests must carry a bearer token.
    pub fn requires_token(&self) -> bool {
        matches!(self, ApiProfile::Legacy)
    }

    /// Message shown when no usable base URL is configured.
    pub fn missing_base_url_message(&self) -> &'static str {
        match self {
            ApiProfile::Legacy => "Legacy API base URL is empty",
            ApiProfile::Console => {
                "Configure API base URL (run `admin-console configure --base-url <URL>`)"
            }
        }
    }
}

impl FromStr for ApiProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(ApiProfile::Legacy),
            "console" => Ok(ApiProfile::Console),
            other => Err(format!("Unknown API profile: {}", other)),
        }
    }
}

impl Display for ApiProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiProfile::Legacy => write!(f, "Legacy"),
            ApiProfile::Console => write!(f, "Console"),
        }
    }
}

impl Debug for ApiProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiProfile::{}, base URL: {:?}", self, self.base_url_source())
    }
}
