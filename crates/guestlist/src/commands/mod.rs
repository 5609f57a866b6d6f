//! CLI command handlers.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use console::Style;
use guestlist_client::{Error, LoginRequest, RequestClient, Session, SessionStore};
use guestlist_config::ConsoleConfig;

use crate::drafts::DraftStore;

pub mod accompanies;
pub mod auth;
pub mod drafts;
pub mod guests;
pub mod invitation;
pub mod repl;

/// Environment variable holding the admin email for non-interactive login.
pub const ADMIN_EMAIL_ENV: &str = "GUESTLIST_ADMIN_EMAIL";

/// Environment variable holding the admin password for non-interactive login.
pub const ADMIN_PASSWORD_ENV: &str = "GUESTLIST_ADMIN_PASSWORD";

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Server URL to connect to.
    pub server_url: String,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Merged configuration.
    pub config: ConsoleConfig,
    /// Directory holding config, logs and drafts.
    pub config_dir: PathBuf,
}

impl Context {
    /// Session store over a fresh client (and a fresh cookie jar).
    pub fn connect(&self) -> Result<SessionStore> {
        let mut builder = RequestClient::builder()
            .base_url(&self.server_url)
            .timeout(self.config.timeout())
            .refresh_timeout(self.config.refresh_timeout());
        if let Some(agent) = &self.config.client.user_agent {
            builder = builder.user_agent(agent);
        }
        Ok(SessionStore::connect(builder)?)
    }

    pub fn drafts(&self) -> DraftStore {
        DraftStore::new(self.config.drafts_path(&self.config_dir))
    }

    /// Connect and make sure an administrator is signed in.
    pub async fn signed_in(&self) -> Result<SessionStore> {
        let store = self.connect()?;
        if store.hydrate().await.is_authenticated {
            return Ok(store);
        }

        let email = std::env::var(ADMIN_EMAIL_ENV).ok().filter(|s| !s.is_empty());
        let credentials = credentials(email)?;
        let session = store.login(&credentials).await.map_err(describe)?;
        ensure_authenticated(&session)?;
        tracing::debug!(email = %credentials.email, "signed in");
        Ok(store)
    }
}

/// Gather credentials from the environment, prompting for whatever is missing.
pub fn credentials(email: Option<String>) -> Result<LoginRequest> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    if email.is_empty() {
        bail!("Email is required.");
    }

    let password = match std::env::var(ADMIN_PASSWORD_ENV) {
        Ok(password) if !password.is_empty() => password,
        _ => rpassword::prompt_password("Password: ")?,
    };
    if password.is_empty() {
        bail!("Password is required.");
    }

    Ok(LoginRequest { email, password })
}

/// Fail unless the login produced a usable session.
pub fn ensure_authenticated(session: &Session) -> Result<()> {
    if !session.is_authenticated {
        bail!("Login succeeded but the server did not return a profile");
    }
    Ok(())
}

/// Read one trimmed line from stdin after printing `label`.
pub fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Ask a yes/no question; anything but `y`/`yes` is no.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{question} [y/N] "))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Turn a client error into one carrying the operator-facing message.
pub fn describe(error: Error) -> anyhow::Error {
    match error {
        Error::Validation(errors) => {
            let lines: Vec<String> = errors.iter().map(|e| format!("  {e}")).collect();
            anyhow::anyhow!("Please fix the following:\n{}", lines.join("\n"))
        }
        other => anyhow::anyhow!(other.user_message()),
    }
}

pub fn print_error(message: &str) {
    let red = Style::new().red();
    eprintln!("{} {}", red.apply_to("Error:"), message);
}

pub fn print_success(message: &str) {
    let green = Style::new().green();
    println!("{} {}", green.apply_to("✓"), message);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
