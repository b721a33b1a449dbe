//! Optional MangaDex authentication
//!
//! A single password-grant exchange at startup. When it works the catalog
//! client sends a bearer token; when it doesn't, the run continues
//! anonymously. Credentials are read from `MANGADEX_*` environment variables.
//!
//! # Examples
//!
//! ```rust,no_run
//! use manga_fetcher::app::{ClientConfig, MangaDexClient};
//! use manga_fetcher::auth::authenticate_best_effort;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::default();
//! let mut client = MangaDexClient::new(&config)?;
//! authenticate_best_effort(&mut client, &config.auth_url).await;
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod token;

// Re-export main public API
pub use credentials::{AuthStatus, Credentials};
pub use token::exchange_token;

use tracing::{debug, info, warn};
use url::Url;

use crate::app::MangaDexClient;

/// Try to attach a bearer token to `client`; returns whether it did
///
/// Never fails: missing credentials are logged at debug level when none are
/// configured and as a warning when only some are, and exchange failures
/// are logged as warnings.
pub async fn authenticate_best_effort(client: &mut MangaDexClient, auth_url: &Url) -> bool {
    let status = AuthStatus::from_env();
    if status.is_unconfigured() {
        debug!("{}", status.status_message());
        return false;
    }

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            warn!("{}; continuing anonymously", e);
            return false;
        }
    };

    match exchange_token(client.http_client(), auth_url, &credentials).await {
        Ok(token) => {
            client.set_bearer_token(token);
            info!("Authenticated as {}", credentials.username);
            true
        }
        Err(e) => {
            warn!("Authentication failed: {}; continuing anonymously", e);
            false
        }
    }
}
