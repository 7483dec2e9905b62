use anyhow::{anyhow, Result};
use clap::Args;
use tracing_subscriber::EnvFilter;

use club_accounting::Context;
use club_domain::Operators;

/// Settings shared by all commands. Every option can
/// also be set in the environment or in a `.env` file.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Name of the first operator
    #[clap(long, env = "CLUB_OPERATOR_PRIMARY")]
    pub operator_primary: String,

    /// Name of the second operator
    #[clap(long, env = "CLUB_OPERATOR_SECONDARY")]
    pub operator_secondary: String,

    /// The operator using this session
    #[clap(long, env = "CLUB_OPERATOR")]
    pub operator: Option<String>,

    #[clap(long, env = "CLUB_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Settings {
    pub fn session(&self, json: bool) -> Session {
        let operators = Operators::new(&self.operator_primary, &self.operator_secondary);
        Session {
            ctx: Context::new(operators),
            operator: self.operator.clone(),
            json,
        }
    }
}

/// Install the log subscriber. `RUST_LOG` wins over the
/// configured level.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The state of a command line session
pub struct Session {
    pub ctx: Context,
    operator: Option<String>,
    pub json: bool,
}

impl Session {
    /// Who is handling money in this session
    pub fn operator(&self) -> Result<&str> {
        self.operator
            .as_deref()
            .ok_or_else(|| anyhow!("no operator given, use --operator or CLUB_OPERATOR"))
    }
}
