//! meriadock-intranet server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens an
//! in-process SQLite store, and serves the intranet over HTTP.
//!
//! # Provisioning accounts
//!
//! Accounts are created from the command line, with the password read from
//! stdin. New accounts carry the must-change-password flag, so the operator
//! picks their own password at first sign-in:
//!
//! ```
//! cargo run -p meriadock-intranet --bin server -- \
//!   --create-user u1234 --full-name "María Solís"
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use meriadock_intranet::{AppState, ServerConfig, auth::AuthService};
use meriadock_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Meriadock intranet server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Create an account for this NISUV code (password read from stdin) and
  /// exit.
  #[arg(long, value_name = "NISUV")]
  create_user: Option<String>,

  /// Display name for `--create-user`.
  #[arg(long, value_name = "NAME", requires = "create_user")]
  full_name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    let hash = AuthService::<SqliteStore>::hash_password(&password)
      .context("failed to hash password")?;
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("MERIADOCK"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = AppState::new(Arc::new(store), Arc::new(server_cfg.clone()));

  // Helper mode: provision an account and exit.
  if let Some(nisuv) = cli.create_user {
    let full_name = cli.full_name.unwrap_or_else(|| nisuv.clone());
    let password = read_password()?;
    let account = state
      .auth
      .create_account(&nisuv, &full_name, &password)
      .await
      .context("failed to create account")?;
    println!("{} {}", account.user_id, account.login);
    return Ok(());
  }

  let app = meriadock_intranet::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin (no echo suppression; intended for setup).
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(line.trim_end().to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
