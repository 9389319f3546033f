//! Where marku keeps its data and writes its exports.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

pub const DATA_DIR_ENV: &str = "MARKU_HOME";
const DEFAULT_DIR_NAME: &str = ".marku";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
}

impl Config {
    /// Data dir: explicit flag, then `$MARKU_HOME`, then `~/.marku`.
    /// Export dir: explicit flag, then the current directory.
    pub fn resolve(data_dir: Option<PathBuf>, export_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir, env::var_os(DATA_DIR_ENV), dirs::home_dir())?;
        let export_dir = match export_dir {
            Some(dir) => dir,
            None => env::current_dir()?,
        };
        Ok(Self {
            data_dir,
            export_dir,
        })
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    resolve_data_dir(None, env::var_os(DATA_DIR_ENV), dirs::home_dir())
}

fn resolve_data_dir(
    flag: Option<PathBuf>,
    env_value: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(value));
    }
    let home_dir = home.ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(DEFAULT_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins() {
        let dir = resolve_data_dir(
            Some(PathBuf::from("/tmp/flag")),
            Some(OsString::from("/tmp/env")),
            Some(PathBuf::from("/home/u")),
        )
        .unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/flag"));
    }

    #[test]
    fn test_env_then_home() {
        let dir = resolve_data_dir(None, Some(OsString::from("/tmp/env")), Some(PathBuf::from("/home/u"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/env"));

        let dir = resolve_data_dir(None, Some(OsString::new()), Some(PathBuf::from("/home/u"))).unwrap();
        assert_eq!(dir, PathBuf::from("/home/u/.marku"));

        assert!(resolve_data_dir(None, None, None).is_err());
    }
}
