//! On-disk session: the bearer token and who owns it.

use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[must_use]
#[derive(Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub access_token: String,
    pub logged_in_at: DateTime<Local>,
}

impl Session {
    pub fn new(email: String, access_token: String) -> Self {
        Self { email, access_token, logged_in_at: Local::now() }
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("not logged in (no session at `{}`)", path.display()))?;
        toml::from_str(&contents).context("failed to parse the session file")
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result {
        std::fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("failed to save the session to `{}`", path.display()))
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn delete(path: &Path) -> Result {
        if path.is_file() {
            std::fs::remove_file(path)
                .with_context(|| format!("failed to remove `{}`", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip() -> Result {
        let session = Session::new("user@example.com".to_string(), "token".to_string());
        let serialized = toml::to_string_pretty(&session)?;
        let parsed: Session = toml::from_str(&serialized)?;
        assert_eq!(parsed.email, session.email);
        assert_eq!(parsed.access_token, session.access_token);
        assert_eq!(parsed.logged_in_at, session.logged_in_at);
        Ok(())
    }
}
