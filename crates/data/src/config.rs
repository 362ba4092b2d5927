use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND: &str = "0.0.0.0:7878";
pub const DEFAULT_WORKERS: usize = 4;

/// Settings shared by the server and the terminal client.
///
/// Layering, later wins: defaults, JSON config file, `TASKDRAW_*`
/// environment variables, command-line flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub bind: String,
    pub workers: usize,
    /// SQLite file. `None` keeps everything in memory.
    pub database: Option<PathBuf>,
    /// Catalog JSON. `None` uses the built-in catalog.
    pub cards: Option<PathBuf>,
    pub seed: Option<u64>,
    pub state_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            workers: DEFAULT_WORKERS,
            database: None,
            cards: None,
            seed: None,
            state_file: None,
        }
    }
}

impl AppConfig {
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
    }

    /// Full resolution for a binary: picks the config file from `--config`
    /// or `TASKDRAW_CONFIG`, then applies env and flags. Returns the
    /// positional arguments left over.
    pub fn resolve(args: &[String]) -> anyhow::Result<(Self, Vec<String>)> {
        Self::resolve_with(args, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(args: &[String], lookup: F) -> anyhow::Result<(Self, Vec<String>)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = flag_value(args, "--config")
            .map(PathBuf::from)
            .or_else(|| lookup("TASKDRAW_CONFIG").map(PathBuf::from));
        let mut config = match config_path {
            Some(path) => Self::load_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        let rest = config.apply_args(args)?;
        if config.workers == 0 {
            bail!("workers must be at least 1");
        }
        Ok((config, rest))
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("TASKDRAW_BIND") {
            self.bind = value;
        }
        if let Some(value) = lookup("TASKDRAW_WORKERS") {
            self.workers = value
                .parse()
                .with_context(|| format!("TASKDRAW_WORKERS={value}"))?;
        }
        if let Some(value) = lookup("TASKDRAW_DB") {
            self.database = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("TASKDRAW_CARDS") {
            self.cards = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("TASKDRAW_SEED") {
            self.seed = Some(value.parse().with_context(|| format!("TASKDRAW_SEED={value}"))?);
        }
        if let Some(value) = lookup("TASKDRAW_STATE") {
            self.state_file = Some(PathBuf::from(value));
        }
        Ok(())
    }

    pub fn apply_args(&mut self, args: &[String]) -> anyhow::Result<Vec<String>> {
        let mut rest = Vec::new();
        let mut idx = 0usize;
        while idx < args.len() {
            let arg = args[idx].as_str();
            let needs_value = matches!(
                arg,
                "--config" | "--bind" | "--workers" | "--db" | "--cards" | "--seed" | "--state"
            );
            if !needs_value {
                if arg.starts_with("--") {
                    bail!("unknown option {arg}");
                }
                rest.push(arg.to_string());
                idx += 1;
                continue;
            }
            let Some(value) = args.get(idx + 1) else {
                bail!("{arg} needs a value");
            };
            match arg {
                "--bind" => self.bind = value.clone(),
                "--workers" => {
                    self.workers = value
                        .parse()
                        .with_context(|| format!("invalid --workers {value}"))?
                }
                "--db" => self.database = Some(PathBuf::from(value)),
                "--cards" => self.cards = Some(PathBuf::from(value)),
                "--seed" => {
                    self.seed = Some(
                        value
                            .parse()
                            .with_context(|| format!("invalid --seed {value}"))?,
                    )
                }
                "--state" => self.state_file = Some(PathBuf::from(value)),
                _ => {}
            }
            idx += 2;
        }
        Ok(rest)
    }

    /// Client-local state file, falling back to `~/.taskdraw_state.json`.
    pub fn state_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.state_file {
            return Some(path.clone());
        }
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".taskdraw_state.json"))
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|idx| args.get(idx + 1))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn defaults_without_any_source() {
        let (config, rest) = AppConfig::resolve_with(&[], |_| None).expect("resolve");
        assert_eq!(config, AppConfig::default());
        assert!(rest.is_empty());
    }

    #[test]
    fn flags_override_env() {
        let env: HashMap<&str, &str> = [("TASKDRAW_BIND", "127.0.0.1:1"), ("TASKDRAW_SEED", "5")]
            .into_iter()
            .collect();
        let (config, rest) = AppConfig::resolve_with(
            &args(&["--bind", "127.0.0.1:2", "draw", "text"]),
            |key| env.get(key).map(|value| value.to_string()),
        )
        .expect("resolve");
        assert_eq!(config.bind, "127.0.0.1:2");
        assert_eq!(config.seed, Some(5));
        assert_eq!(rest, args(&["draw", "text"]));
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(AppConfig::resolve_with(&args(&["--seed", "abc"]), |_| None).is_err());
        assert!(AppConfig::resolve_with(&args(&["--workers", "0"]), |_| None).is_err());
        assert!(AppConfig::resolve_with(&args(&["--db"]), |_| None).is_err());
        assert!(AppConfig::resolve_with(&args(&["--verbose"]), |_| None).is_err());
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"workers": 2, "database": "cards.db"}"#).expect("parse");
        assert_eq!(config.workers, 2);
        assert_eq!(config.database, Some(PathBuf::from("cards.db")));
        assert_eq!(config.bind, DEFAULT_BIND);
    }
}
