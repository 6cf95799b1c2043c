//! Shared E2E test helpers for `almacen` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::time::Duration;
use tempfile::TempDir;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Variables that would leak the developer's configuration into a test.
const CONFIG_VARS: &[&str] = &[
    "ALMACEN_DEBUG",
    "ALMACEN_STORAGE_BACKEND",
    "ALMACEN_STORAGE_PATH",
    "ALMACEN_ORIGIN",
    "ALMACEN_LOG_LEVEL",
    "RUST_LOG",
];

/// An isolated home, project root and storage directory.
///
/// Every command built from the same sandbox shares one stored session.
pub struct Sandbox {
    root: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir for sandbox"),
        }
    }

    pub fn storage_dir(&self) -> std::path::PathBuf {
        self.root.path().join("storage")
    }

    /// Builds an `almacen` command confined to this sandbox.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd: assert_cmd::Command = cargo_bin_cmd!("almacen");
        cmd.timeout(TIMEOUT_BASIC);
        for var in CONFIG_VARS {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.root.path());
        cmd.arg("-C").arg(self.root.path());
        cmd.arg("--storage").arg(self.storage_dir());
        cmd
    }

    /// Stores a session through the CLI and asserts it succeeded.
    pub fn login(&self, token: &str, user_json: &str) {
        self.cmd()
            .args(["session", "login", "--token", token, "--user", user_json])
            .assert()
            .success();
    }
}

/// A JWT-shaped token whose payload carries `exp`.
pub fn token_expiring_at(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"id":1,"exp":{exp}}}"#));
    format!("{header}.{payload}.c2lnbmF0dXJl")
}

/// A token valid until 2100.
pub fn valid_token() -> String {
    token_expiring_at(4_102_444_800)
}

pub const ADMIN_JSON: &str = r#"{"id":1,"nombre":"Ana Lopez","rol":"Administrador"}"#;
pub const CAJERO_JSON: &str = r#"{"id":2,"rol":"Cajero"}"#;
