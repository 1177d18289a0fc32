//! Configuration loading and resolution.
//!
//! Layers, highest priority first: CLI flags, `CLOUDCTL_*` environment
//! variables, the TOML config file, built-in defaults.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Engine entry script, relative to the sandbox directory.
pub const DEFAULT_ENGINE_ENTRY: &str = "node_modules/@nimbella/nimbella-cli/bin/run";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sandbox: SandboxConfig,
}

/// Where the sandbox engine lives and how to start it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxConfig {
    /// Sandbox directory holding the engine install and its state.
    pub dir: PathBuf,
    /// Explicit node executable; looked up on `PATH` when unset.
    pub node: Option<PathBuf>,
    /// Engine entry script, absolute or relative to `dir`.
    pub engine_entry: PathBuf,
}

impl SandboxConfig {
    /// Absolute location of the engine entry script.
    #[must_use]
    pub fn engine_entry_path(&self) -> PathBuf {
        if self.engine_entry.is_absolute() {
            self.engine_entry.clone()
        } else {
            self.dir.join(&self.engine_entry)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sandbox: SandboxConfig {
                dir: cli_home().join("sandbox"),
                node: None,
                engine_entry: PathBuf::from(DEFAULT_ENGINE_ENTRY),
            },
        }
    }
}

/// Config values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub sandbox_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    sandbox: Option<TomlSandbox>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlSandbox {
    dir: Option<PathBuf>,
    node: Option<PathBuf>,
    engine_entry: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file, environment and CLI overrides.
    ///
    /// A config file named with `--config` must exist; the default one is
    /// optional.
    ///
    /// # Errors
    ///
    /// Fails if an explicit config file is missing or any config file cannot
    /// be read or parsed.
    pub fn load(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Self> {
        let mut config = Self::default();

        let path = config_path.map_or_else(|| cli_home().join(CONFIG_FILE_NAME), Path::to_path_buf);
        if path.is_file() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
            let toml_config: TomlConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
            log::debug!("loaded config file {}", path.display());
            config.apply_toml(toml_config);
        } else if config_path.is_some() {
            bail!("Config file '{}' not found", path.display());
        }

        config.apply_env(|key| std::env::var(key).ok());
        config.apply_cli(overrides);
        Ok(config)
    }

    fn apply_toml(&mut self, toml: TomlConfig) {
        if let Some(sandbox) = toml.sandbox {
            if let Some(dir) = sandbox.dir {
                self.sandbox.dir = dir;
            }
            if let Some(node) = sandbox.node {
                self.sandbox.node = Some(node);
            }
            if let Some(entry) = sandbox.engine_entry {
                self.sandbox.engine_entry = entry;
            }
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        if let Some(dir) = var("CLOUDCTL_SANDBOX_DIR") {
            self.sandbox.dir = dir;
        }
        if let Some(node) = var("CLOUDCTL_NODE") {
            self.sandbox.node = Some(node);
        }
        if let Some(entry) = var("CLOUDCTL_ENGINE_ENTRY") {
            self.sandbox.engine_entry = entry;
        }
    }

    fn apply_cli(&mut self, overrides: &CliOverrides) {
        if let Some(dir) = &overrides.sandbox_dir {
            self.sandbox.dir.clone_from(dir);
        }
    }
}

/// Per-user directory for the host CLI's files.
fn cli_home() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cloudctl")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.sandbox.dir.ends_with("cloudctl/sandbox"));
        assert_eq!(config.sandbox.node, None);
        assert_eq!(
            config.sandbox.engine_entry_path(),
            config.sandbox.dir.join(DEFAULT_ENGINE_ENTRY)
        );
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
[sandbox]
dir = "/opt/sandbox"
node = "/usr/local/bin/node"
engine_entry = "/opt/engine/run"
"#;
        let toml_config: TomlConfig = toml::from_str(toml_str).unwrap();
        let mut config = Config::default();
        config.apply_toml(toml_config);

        assert_eq!(config.sandbox.dir, PathBuf::from("/opt/sandbox"));
        assert_eq!(config.sandbox.node, Some(PathBuf::from("/usr/local/bin/node")));
        assert_eq!(config.sandbox.engine_entry_path(), PathBuf::from("/opt/engine/run"));
    }

    #[test]
    fn test_env_beats_toml_and_cli_beats_env() {
        let mut config = Config::default();
        config.apply_toml(toml::from_str("[sandbox]\ndir = \"/from/toml\"").unwrap());

        let env: HashMap<&str, &str> = [
            ("CLOUDCTL_SANDBOX_DIR", "/from/env"),
            ("CLOUDCTL_NODE", ""),
            ("CLOUDCTL_ENGINE_ENTRY", "bin/run"),
        ]
        .into_iter()
        .collect();
        config.apply_env(|k| env.get(k).map(|v| (*v).to_owned()));
        assert_eq!(config.sandbox.dir, PathBuf::from("/from/env"));
        assert_eq!(config.sandbox.node, None);
        assert_eq!(config.sandbox.engine_entry_path(), PathBuf::from("/from/env/bin/run"));

        config.apply_cli(&CliOverrides {
            sandbox_dir: Some(PathBuf::from("/from/cli")),
        });
        assert_eq!(config.sandbox.dir, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::load(Some(&missing), &CliOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sandbox\ndir = 1").unwrap();
        let err = Config::load(Some(&path), &CliOverrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_explicit_file_with_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sandbox]\nengine_entry = \"/engine/run\"\n").unwrap();
        let overrides = CliOverrides {
            sandbox_dir: Some(dir.path().to_owned()),
        };
        let config = Config::load(Some(&path), &overrides).unwrap();
        assert_eq!(config.sandbox.dir, dir.path());
        assert_eq!(config.sandbox.engine_entry, PathBuf::from("/engine/run"));
    }
}
