use crate::configuration::Configuration;
use clap::Parser;

/// Command-line and environment configuration. Every flag can also be set
/// through the environment (or a `.env` file).
#[derive(Parser, Clone, Debug)]
#[command(about = "Appointment booking service for home-installation visits")]
pub struct ConfigurationHandler {
    /// Port the HTTP server listens on.
    #[arg(long, env = "PORT", default_value = "3000")]
    port: String,

    /// Postgres connection URL. Omit to run with the in-memory store
    /// (reservations do not survive a restart).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Admin account name.
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    admin_username: String,

    /// Salt prepended to the admin password before hashing.
    #[arg(long, env = "ADMIN_PASSWORD_SALT", default_value = "tartagal")]
    admin_password_salt: String,

    /// Hex SHA-256 digest of salt + admin password. The default matches
    /// the demo password "123"; override both in any real deployment.
    #[arg(
        long,
        env = "ADMIN_PASSWORD_DIGEST",
        default_value = "56571ae30fcf12304988e38a7e21756a8c000344472f0f48b9848ecf38b08dbe"
    )]
    admin_password_digest: String,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        // Load .env first so the env-backed flags can pick values up.
        let _ = dotenvy::dotenv();
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> String {
        self.port.clone()
    }

    fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }

    fn admin_username(&self) -> String {
        self.admin_username.clone()
    }

    fn admin_password_salt(&self) -> String {
        self.admin_password_salt.clone()
    }

    fn admin_password_digest(&self) -> String {
        self.admin_password_digest.clone()
    }
}
