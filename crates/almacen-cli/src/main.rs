//! Almacén CLI - inspect and manage the admin client's stored session.
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`ALMACEN_*`)
//! 3. Project config (`.almacen/config.toml` in the project root)
//! 4. Global config (`~/.almacen/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `ALMACEN_DEBUG`: Enable debug logging (`true`/`false`)
//! - `ALMACEN_STORAGE_BACKEND`: `file` or `memory`
//! - `ALMACEN_STORAGE_PATH`: Session storage directory
//! - `ALMACEN_ORIGIN`: Origin whose session is used
//! - `ALMACEN_LOG_LEVEL`: Log filter when `RUST_LOG` is unset
//!
//! # Exit Codes
//!
//! - `0`: success (for `can`: allowed)
//! - `1`: error, or `can` denied

use almacen_auth::{token, Capability};
use almacen_runtime::config::{AlmacenConfig, ConfigError, ConfigLoader, ConfigResolver};
use almacen_runtime::session::{SessionStore, StoredUser};
use almacen_runtime::storage::{self, KeyValueStore};
use almacen_types::User;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Almacén CLI - session and access inspector
#[derive(Parser, Debug)]
#[command(name = "almacen")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    project: Option<PathBuf>,

    /// Custom session storage directory
    #[arg(long, global = true, value_name = "PATH")]
    storage: Option<PathBuf>,

    /// Origin whose session to use
    #[arg(long, global = true)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the stored session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Check one capability for the current user (exit 1 when denied)
    Can {
        /// Capability name, e.g. `manage_users`
        capability: String,
    },

    /// List the capabilities the current user holds
    Capabilities,

    /// Inspect bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand, Debug)]
enum SessionAction {
    /// Store a token and user record
    Login {
        /// Bearer token
        #[arg(long)]
        token: String,

        /// User record as JSON, e.g. `{"id":1,"nombre":"Ana","rol":"Administrador"}`
        #[arg(long)]
        user: String,
    },

    /// Remove the stored session
    Logout,

    /// Show who is logged in
    Status,
}

#[derive(Subcommand, Debug)]
enum TokenAction {
    /// Print a token's expiry and whether it is still valid
    Inspect {
        /// Bearer token
        token: String,
    },
}

/// CLI-based configuration resolver.
///
/// Merges file/env config via [`ConfigLoader`] and applies CLI argument
/// overrides as the highest-priority layer.
struct CliConfigResolver {
    project_root: PathBuf,
    global_config: Option<PathBuf>,
    debug: bool,
    storage: Option<PathBuf>,
    origin: Option<String>,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        let project_root = args.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        });

        Self {
            project_root,
            global_config: None,
            debug: args.debug,
            storage: args.storage.clone(),
            origin: args.origin.clone(),
        }
    }

    fn resolve(&self) -> Result<AlmacenConfig, ConfigError> {
        let mut loader = ConfigLoader::new().with_project_root(&self.project_root);
        if let Some(ref path) = self.global_config {
            loader = loader.with_global_config(path);
        }

        let mut config = loader.load()?;
        self.apply(&mut config);
        Ok(config)
    }
}

impl ConfigResolver for CliConfigResolver {
    fn apply(&self, config: &mut AlmacenConfig) {
        if self.debug {
            config.debug = true;
        }
        if let Some(ref path) = self.storage {
            config.storage.path = Some(path.clone());
        }
        if let Some(ref origin) = self.origin {
            config.storage.origin.clone_from(origin);
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let resolver = CliConfigResolver::from_args(&args);
    let config = resolver
        .resolve()
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    // Terminal filter: --debug > --verbose > RUST_LOG env > config level
    let filter = if config.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();

    info!(
        path = %resolver.project_root.display(),
        backend = ?config.storage.backend,
        origin = %config.storage.origin,
        "Configuration resolved"
    );

    let session = SessionStore::new(
        storage::open(&config.storage).context("failed to open session storage")?,
    );

    match args.command {
        Command::Session { action } => run_session(&session, action),
        Command::Can { capability } => run_can(&session, &capability),
        Command::Capabilities => run_capabilities(&session),
        Command::Token {
            action: TokenAction::Inspect { token },
        } => {
            inspect_token(&token);
            Ok(ExitCode::SUCCESS)
        }
    }
}

type CliSession = SessionStore<Box<dyn KeyValueStore>>;

fn run_session(session: &CliSession, action: SessionAction) -> Result<ExitCode> {
    match action {
        SessionAction::Login { token, user } => {
            let user = User::from_json(&user).context("invalid user record")?;
            session
                .set_session(&token, &user)
                .context("failed to store session")?;
            if token::is_expired_now(&token) {
                warn!("Stored token is already expired");
            }
            println!("Logged in as {user}");
        }
        SessionAction::Logout => {
            session.clear().context("failed to clear session")?;
            println!("Logged out");
        }
        SessionAction::Status => print_status(session),
    }
    Ok(ExitCode::SUCCESS)
}

fn print_status(session: &CliSession) {
    if let Some(current) = session.session() {
        println!("Authenticated as {}", current.user);
        let state = if token::is_expired_now(&current.token) {
            "expired"
        } else {
            "active"
        };
        println!("token: {state}");
        return;
    }
    match session.stored_user() {
        StoredUser::Corrupt { reason } => {
            println!("Not authenticated (stored user record is unreadable: {reason})");
        }
        StoredUser::Present(_) | StoredUser::Absent => println!("Not authenticated"),
    }
}

fn run_can(session: &CliSession, name: &str) -> Result<ExitCode> {
    let Some(capability) = Capability::parse(name) else {
        bail!("unknown capability '{name}'");
    };
    match session.policy().check(capability) {
        Ok(()) => {
            println!("allowed");
            Ok(ExitCode::SUCCESS)
        }
        Err(denied) => {
            println!("{denied}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_capabilities(session: &CliSession) -> Result<ExitCode> {
    let policy = session.policy();
    match policy.current_role() {
        Ok(role) => {
            info!(%role, "Listing capabilities");
            for capability in policy.allowed_capabilities() {
                println!("{capability}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(denied) => {
            eprintln!("{denied}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn inspect_token(raw: &str) {
    match token::decode_claims(raw) {
        Ok(claims) => {
            let at = claims
                .expires_at()
                .map_or_else(|| "out of range".to_string(), |t| t.to_rfc3339());
            println!("exp: {} ({at})", claims.exp);
            let now_ms = chrono::Utc::now().timestamp_millis();
            let status = if claims.is_expired_at(now_ms) {
                "expired"
            } else {
                "valid"
            };
            println!("status: {status}");
        }
        Err(e) => {
            println!("unreadable: {e}");
            println!("status: expired");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almacen_runtime::config::StorageBackend;
    use clap::CommandFactory;
    use tempfile::TempDir;

    /// Resolver rooted in an empty temp dir with no global config.
    fn resolver_with(
        debug: bool,
        storage: Option<PathBuf>,
        origin: Option<&str>,
    ) -> (TempDir, CliConfigResolver) {
        let temp = TempDir::new().expect("should create temp dir for test");
        let resolver = CliConfigResolver {
            project_root: temp.path().to_path_buf(),
            global_config: Some(temp.path().join("no-global.toml")),
            debug,
            storage,
            origin: origin.map(str::to_string),
        };
        (temp, resolver)
    }

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn resolve_defaults_no_overrides() {
        let (_temp, resolver) = resolver_with(false, None, None);
        let config = resolver.resolve().expect("resolve should succeed");

        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn resolve_storage_and_origin_overrides() {
        let path = PathBuf::from("/custom/storage");
        let (_temp, resolver) = resolver_with(true, Some(path.clone()), Some("tienda.example.com"));
        let config = resolver.resolve().expect("resolve should succeed");

        assert!(config.debug);
        assert_eq!(config.storage.path, Some(path));
        assert_eq!(config.storage.origin, "tienda.example.com");
    }

    #[test]
    fn cli_overrides_project_config() {
        let (temp, resolver) = resolver_with(false, None, Some("cli.example.com"));
        let dir = temp.path().join(".almacen");
        std::fs::create_dir_all(&dir).expect("create project config dir");
        std::fs::write(
            dir.join("config.toml"),
            "[storage]\norigin = \"project.example.com\"\nbackend = \"memory\"\n",
        )
        .expect("write project config");

        let config = resolver.resolve().expect("resolve should succeed");
        assert_eq!(config.storage.origin, "cli.example.com");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn false_flags_preserve_loader_values() {
        let mut config = AlmacenConfig::default();
        config.debug = true;
        let (_temp, resolver) = resolver_with(false, None, None);
        resolver.apply(&mut config);
        assert!(config.debug);
    }

    #[test]
    fn parse_session_login() {
        let args = Args::try_parse_from([
            "almacen",
            "--storage",
            "/tmp/s",
            "session",
            "login",
            "--token",
            "h.p.s",
            "--user",
            r#"{"id":1,"rol":"Cajero"}"#,
        ])
        .expect("should parse");

        assert_eq!(args.storage, Some(PathBuf::from("/tmp/s")));
        assert!(matches!(
            args.command,
            Command::Session {
                action: SessionAction::Login { ref token, .. }
            } if token == "h.p.s"
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["almacen", "can", "access_pos", "-d"]).expect("should parse");
        assert!(args.debug);
        assert!(matches!(
            args.command,
            Command::Can { ref capability } if capability == "access_pos"
        ));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Args::try_parse_from(["almacen"]).is_err());
    }
}
