use anyhow::Result;
use is_terminal::IsTerminal;
use log::info;
use std::fmt;

use crate::ui::prompts::prompt_password;

pub const PASSWORD_ENV: &str = "SUMA_PASSWORD";

/// API login and password
#[derive(Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Resolve credentials from the already-merged login and the environment
    ///
    /// The password is read from `SUMA_PASSWORD` (a `.env` file counts, it is
    /// loaded before this runs). When unset and stdin is a terminal the
    /// operator is prompted; otherwise resolution fails.
    pub fn resolve(login: Option<String>, url: &str) -> Result<Credentials> {
        let login = login.ok_or_else(|| {
            anyhow::anyhow!("No API login configured; pass --login or set SUMA_LOGIN")
        })?;

        let password = match std::env::var(PASSWORD_ENV) {
            Ok(password) if !password.is_empty() => {
                info!("Using password from {}", PASSWORD_ENV);
                password
            }
            _ if std::io::stdin().is_terminal() => prompt_password(&login, url)?,
            _ => anyhow::bail!(
                "{} environment variable not set and no terminal to prompt on",
                PASSWORD_ENV
            ),
        };

        Ok(Credentials { login, password })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}
