use std::path::{Path, PathBuf};

use anyhow::Context;
use dynfields::Config;

const CONFIG_ENV: &str = "DYNFIELDS_CONFIG";

/// Resolve the selector config with precedence: `--config` flag -> $DYNFIELDS_CONFIG
/// -> ~/.config/dynfields/config.toml -> built-in defaults.
///
/// An explicitly named file must exist; the default location is optional.
pub fn resolve(flag: Option<&Path>) -> anyhow::Result<Config> {
    let explicit = flag
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let config = match explicit {
        Some(path) => load(&path)?,
        None => match default_path().filter(|p| p.exists()) {
            Some(path) => load(&path)?,
            None => Config::default(),
        },
    };
    config.validate()?;
    Ok(config)
}

/// Returns the default config path (~/.config/dynfields/config.toml).
fn default_path() -> Option<PathBuf> {
    // Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".config")));
    config_dir.map(|d| d.join("dynfields").join("config.toml"))
}

fn load(path: &Path) -> anyhow::Result<Config> {
    tracing::debug!(path = %path.display(), "loading config");
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "path_separator = \".\"\nomit_param = \"exclude\"\n").unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.path_separator, ".");
        assert_eq!(config.omit_param, "exclude");
        assert_eq!(config.fields_param, "fields");
    }

    #[test]
    fn explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("could not read config file"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "path_separator = \"\"\n").unwrap();
        let err = resolve(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("path separator"));
    }
}
