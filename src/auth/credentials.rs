//! Credential lookup for the MangaDex password grant
//!
//! Credentials come from the environment (a `.env` file is loaded at startup).
//! They are never written anywhere by this tool.

use std::fmt;

use crate::constants::env as env_constants;
use crate::errors::{AuthError, AuthResult};

/// Everything the password grant needs
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`; blank values count as missing
    pub fn from_lookup<L>(lookup: L) -> AuthResult<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let client_id = value(env_constants::CLIENT_ID);
        let client_secret = value(env_constants::CLIENT_SECRET);
        let username = value(env_constants::USERNAME);
        let password = value(env_constants::PASSWORD);

        match (client_id, client_secret, username, password) {
            (Some(client_id), Some(client_secret), Some(username), Some(password)) => Ok(Self {
                client_id,
                client_secret,
                username,
                password,
            }),
            _ => Err(AuthError::MissingCredentials {
                missing: AuthStatus::from_lookup(&lookup).missing().join(", "),
            }),
        }
    }
}

/// Which credential variables are set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthStatus {
    pub client_id_set: bool,
    pub client_secret_set: bool,
    pub username_set: bool,
    pub password_set: bool,
}

impl AuthStatus {
    /// Check the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let set = |name: &str| lookup(name).is_some_and(|v| !v.trim().is_empty());
        Self {
            client_id_set: set(env_constants::CLIENT_ID),
            client_secret_set: set(env_constants::CLIENT_SECRET),
            username_set: set(env_constants::USERNAME),
            password_set: set(env_constants::PASSWORD),
        }
    }

    /// Check if every credential is available
    pub fn has_credentials(&self) -> bool {
        self.missing().is_empty()
    }

    /// True when none of the variables are set, i.e. the user never opted in
    pub fn is_unconfigured(&self) -> bool {
        !(self.client_id_set || self.client_secret_set || self.username_set || self.password_set)
    }

    /// Names of the variables that are not set
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (self.client_id_set, env_constants::CLIENT_ID),
            (self.client_secret_set, env_constants::CLIENT_SECRET),
            (self.username_set, env_constants::USERNAME),
            (self.password_set, env_constants::PASSWORD),
        ]
        .into_iter()
        .filter(|(set, _)| !set)
        .map(|(_, name)| name)
        .collect()
    }

    /// Get descriptive status message for display
    pub fn status_message(&self) -> String {
        if self.has_credentials() {
            "Credentials configured".to_string()
        } else if self.is_unconfigured() {
            "No credentials configured, running anonymously".to_string()
        } else {
            format!("Incomplete credentials, missing {}", self.missing().join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const FULL: [(&str, &str); 4] = [
        ("MANGADEX_CLIENT_ID", "personal-client-abc"),
        ("MANGADEX_CLIENT_SECRET", "s3cret"),
        ("MANGADEX_USERNAME", "reader"),
        ("MANGADEX_PASSWORD", "hunter2"),
    ];

    #[test]
    fn test_complete_credentials() {
        let credentials = Credentials::from_lookup(lookup(&FULL)).unwrap();
        assert_eq!(credentials.username, "reader");
        assert_eq!(credentials.client_id, "personal-client-abc");
    }

    #[test]
    fn test_missing_credentials_are_named() {
        let partial = lookup(&[("MANGADEX_USERNAME", "reader"), ("MANGADEX_PASSWORD", " ")]);
        let err = Credentials::from_lookup(partial).unwrap_err();
        match err {
            AuthError::MissingCredentials { missing } => {
                assert_eq!(
                    missing,
                    "MANGADEX_CLIENT_ID, MANGADEX_CLIENT_SECRET, MANGADEX_PASSWORD"
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::from_lookup(lookup(&FULL)).unwrap();
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("reader"));
    }

    #[test]
    fn test_auth_status_messages() {
        let none = AuthStatus::from_lookup(lookup(&[]));
        assert!(none.is_unconfigured());
        assert!(none.status_message().contains("anonymously"));

        let partial = AuthStatus::from_lookup(lookup(&FULL[..2]));
        assert!(!partial.has_credentials());
        assert!(partial.status_message().contains("MANGADEX_USERNAME"));

        let full = AuthStatus::from_lookup(lookup(&FULL));
        assert!(full.has_credentials());
        assert_eq!(full.status_message(), "Credentials configured");
    }
}
