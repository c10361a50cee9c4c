//! Server configuration.
//!
//! Sources are layered in order: built-in defaults, the YAML file passed on
//! the command line, then `POSTGATE__`-prefixed environment variables with
//! `__` separating nested keys (`POSTGATE__SERVER__BIND_ADDR`).

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use anyhow::Context;
use authn_resolver::config::AuthNResolverConfig;
use authz_resolver::config::AuthZResolverConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use posts::config::PostsConfig;
use serde::Deserialize;

pub const ENV_PREFIX: &str = "POSTGATE__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub authn: AuthNResolverConfig,
    pub authz: AuthZResolverConfig,
    pub posts: PostsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `info,authz_resolver=debug`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional YAML file and the environment.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing or when any source does not match the
    /// configuration schema.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            anyhow::ensure!(
                path.is_file(),
                "config file not found: {}",
                path.display()
            );
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io::Write;

    use authn_resolver::config::AuthNMode;

    use super::*;

    fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_sources() {
        let cfg = temp_env::with_var_unset("POSTGATE__SERVER__BIND_ADDR", || {
            AppConfig::load(None).unwrap()
        });
        assert_eq!(cfg.server.bind_addr.port(), 8080);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.authz.create_rate_limit.limit, 5);
        assert_eq!(cfg.posts.max_title_length, 255);
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let file = yaml_file(
            r"
server:
  bind_addr: 0.0.0.0:9000
authn:
  mode: static_tokens
authz:
  create_rate_limit:
    limit: 10
",
        );

        let cfg = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.server.bind_addr.port(), 9000);
        assert_eq!(cfg.authn.mode, AuthNMode::StaticTokens);
        assert_eq!(cfg.authz.create_rate_limit.limit, 10);
        assert_eq!(cfg.authz.create_rate_limit.window_secs, 60);
    }

    #[test]
    fn environment_overrides_file() {
        let file = yaml_file("logging:\n  level: warn\n");

        let cfg = temp_env::with_vars(
            [
                ("POSTGATE__LOGGING__LEVEL", Some("debug")),
                ("POSTGATE__LOGGING__JSON", Some("true")),
            ],
            || AppConfig::load(Some(file.path())).unwrap(),
        );
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.logging.json);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = yaml_file("server:\n  port: 80\n");
        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/postgate.yaml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
