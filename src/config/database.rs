//! Database connection settings.
//!
//! Values come from the secrets provider (a `.env` file loaded with `dotenv` at
//! start-up) and the process environment. Variables already present in the
//! environment take precedence over the file.

use std::env;
use std::fmt;

use crate::error::{DashboardError, DashboardResult};

pub const DB_HOST_KEY: &str = "DB_HOST";
pub const DB_PORT_KEY: &str = "DB_PORT";
pub const DB_NAME_KEY: &str = "DB_NAME";
pub const DB_USER_KEY: &str = "DB_USER";
pub const DB_PASSWORD_KEY: &str = "DB_PASSWORD";

#[derive(Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl DbSettings {
    /// Load settings from the process environment.
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// Blank values count as missing. Every missing key is reported at once so the
    /// user can fix the deployment in a single pass.
    pub fn from_lookup<F>(lookup: F) -> DashboardResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = read(DB_HOST_KEY);
        let port = read(DB_PORT_KEY);
        let database = read(DB_NAME_KEY);
        let user = read(DB_USER_KEY);
        let password = read(DB_PASSWORD_KEY);

        let missing: Vec<&str> = [
            (DB_HOST_KEY, host.is_none()),
            (DB_PORT_KEY, port.is_none()),
            (DB_NAME_KEY, database.is_none()),
            (DB_USER_KEY, user.is_none()),
            (DB_PASSWORD_KEY, password.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        match (host, port, database, user, password) {
            (Some(host), Some(port), Some(database), Some(user), Some(password)) => {
                let port = port.trim().parse::<u16>().map_err(|_| {
                    DashboardError::configuration(format!("{} (not a valid port: {})", DB_PORT_KEY, port))
                })?;
                Ok(Self {
                    host,
                    port,
                    database,
                    user,
                    password,
                })
            }
            _ => Err(DashboardError::configuration(missing.join(", "))),
        }
    }
}

// Keep the password out of logs.
impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_complete_settings() {
        let settings = DbSettings::from_lookup(lookup_from(&[
            ("DB_HOST", "db.example.org"),
            ("DB_PORT", "5432"),
            ("DB_NAME", "bi"),
            ("DB_USER", "reader"),
            ("DB_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(settings.host, "db.example.org");
        assert_eq!(settings.port, 5432);
        assert_eq!(settings.database, "bi");
        assert!(!format!("{:?}", settings).contains("secret"));
    }

    #[test]
    fn test_missing_keys_are_all_reported() {
        let err = DbSettings::from_lookup(lookup_from(&[
            ("DB_HOST", "db.example.org"),
            ("DB_USER", "   "),
        ]))
        .unwrap_err();

        assert_eq!(
            err,
            DashboardError::configuration("DB_PORT, DB_NAME, DB_USER, DB_PASSWORD")
        );
    }

    #[test]
    fn test_bad_port_is_a_configuration_error() {
        let err = DbSettings::from_lookup(lookup_from(&[
            ("DB_HOST", "h"),
            ("DB_PORT", "fifty"),
            ("DB_NAME", "n"),
            ("DB_USER", "u"),
            ("DB_PASSWORD", "p"),
        ]))
        .unwrap_err();

        assert!(matches!(err, DashboardError::Configuration { .. }));
    }
}
