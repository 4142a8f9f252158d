pub mod cli_consts {
    //! Console Configuration Constants
    //!
    //! Grouped by functional area, like the rest of the configuration surface.

    // =============================================================================
    // FEEDBACK CONFIGURATION
    // =============================================================================

    /// How long a toast stays visible before it removes itself (milliseconds).
    pub const TOAST_LIFETIME_MS: u64 = 3000;

    /// Buffer size of the channel carrying feedback events to the renderer.
    pub const FEEDBACK_EVENT_QUEUE_SIZE: usize = 100;

    /// Helper function to get the toast lifetime
    pub const fn toast_lifetime() -> std::time::Duration {
        std::time::Duration::from_millis(TOAST_LIFETIME_MS)
    }

    // =============================================================================
    // LIST CONFIGURATION
    // =============================================================================

    /// Items requested per page. Matches the server's default `limit`.
    pub const PAGE_SIZE: u32 = 50;

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// TCP connect timeout for the HTTP transport (seconds).
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Endpoints served by the legacy admin API.
    pub mod legacy_api {
        /// Base URL the legacy endpoints are always served from.
        pub const BASE_URL: &str = "http://localhost:8001/api";
        /// Environment variable overriding [`BASE_URL`] for one process.
        pub const BASE_URL_ENV: &str = "ADMIN_LEGACY_API_URL";
        /// Storage key holding the legacy bearer token.
        pub const TOKEN_KEY: &str = "authToken";
    }

    /// Endpoints served by the dynamically configured admin API.
    pub mod console_api {
        /// Storage key holding the configured base URL.
        pub const BASE_URL_KEY: &str = "admin_api_base";
        /// Storage key holding the bearer token.
        pub const TOKEN_KEY: &str = "admin_api_token";
    }

    // =============================================================================
    // STORAGE CONFIGURATION
    // =============================================================================

    /// Directory under `$HOME` holding persisted console state.
    pub const STORAGE_DIR: &str = ".admin-console";

    /// File inside [`STORAGE_DIR`] holding the key/value store.
    pub const STORAGE_FILE: &str = "storage.json";
}
