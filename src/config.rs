use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::session::UserId;

pub(crate) const DB_ENV: &str = "MIFINANZAS_DB";
pub(crate) const PREFS_ENV: &str = "MIFINANZAS_PREFS";
pub(crate) const USER_ENV: &str = "MIFINANZAS_USER";

/// Where the data lives and who is using it.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) prefs_path: PathBuf,
    pub(crate) user: Option<UserId>,
}

impl Config {
    /// Resolves paths and user from the process environment. `--user <id>`
    /// in `args` wins over `MIFINANZAS_USER`.
    pub(crate) fn load(args: &[String]) -> Result<Self> {
        Self::resolve(args, |key| std::env::var(key).ok(), default_data_dir)
    }

    fn resolve(
        args: &[String],
        env: impl Fn(&str) -> Option<String>,
        data_dir: impl FnOnce() -> Result<PathBuf>,
    ) -> Result<Self> {
        let db_override = env(DB_ENV).filter(|v| !v.trim().is_empty());
        let prefs_override = env(PREFS_ENV).filter(|v| !v.trim().is_empty());

        let (db_path, prefs_path) = match (db_override, prefs_override) {
            (Some(db), Some(prefs)) => (PathBuf::from(db), PathBuf::from(prefs)),
            (db, prefs) => {
                let dir = data_dir()?;
                (
                    db.map(PathBuf::from)
                        .unwrap_or_else(|| dir.join("mifinanzas.db")),
                    prefs
                        .map(PathBuf::from)
                        .unwrap_or_else(|| dir.join("prefs.db")),
                )
            }
        };

        let user = user_flag(args)
            .or_else(|| env(USER_ENV))
            .and_then(UserId::new);

        Ok(Self {
            db_path,
            prefs_path,
            user,
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "mifinanzas", "MiFinanzas")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}

fn user_flag(args: &[String]) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == "--user")
        .map(|w| w[1].clone())
}

/// `args` without the `--user <id>` pair, so commands never see it.
pub(crate) fn strip_user_flag(args: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--user" {
            iter.next();
        } else {
            out.push(arg.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn fixed_dir() -> Result<PathBuf> {
        Ok(PathBuf::from("/data/mifinanzas"))
    }

    #[test]
    fn test_defaults_under_data_dir() {
        let cfg = Config::resolve(&args(&["mifinanzas"]), env_of(&[]), fixed_dir).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/data/mifinanzas/mifinanzas.db"));
        assert_eq!(cfg.prefs_path, PathBuf::from("/data/mifinanzas/prefs.db"));
        assert!(cfg.user.is_none());
    }

    #[test]
    fn test_env_overrides_paths_without_touching_data_dir() {
        let env = env_of(&[(DB_ENV, "/tmp/a.db"), (PREFS_ENV, "/tmp/p.db")]);
        let cfg = Config::resolve(&args(&["mifinanzas"]), env, || {
            anyhow::bail!("data dir should not be needed")
        })
        .unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/a.db"));
        assert_eq!(cfg.prefs_path, PathBuf::from("/tmp/p.db"));
    }

    #[test]
    fn test_user_flag_beats_env() {
        let env = env_of(&[(USER_ENV, "ana")]);
        let cfg = Config::resolve(&args(&["mifinanzas", "--user", "luis"]), env, fixed_dir)
            .unwrap();
        assert_eq!(cfg.user.unwrap().as_str(), "luis");
    }

    #[test]
    fn test_blank_user_is_anonymous() {
        let env = env_of(&[(USER_ENV, "  ")]);
        let cfg = Config::resolve(&args(&["mifinanzas"]), env, fixed_dir).unwrap();
        assert!(cfg.user.is_none());
    }

    #[test]
    fn test_strip_user_flag() {
        let stripped = strip_user_flag(&args(&["mifinanzas", "--user", "ana", "summary"]));
        assert_eq!(stripped, args(&["mifinanzas", "summary"]));
    }
}
