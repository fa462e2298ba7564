pub mod file;
pub mod stdin;

use std::path::Path;

use crate::config::StockworthConfig;

/// Config file used when `--input` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Where a config document is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource<'a> {
    File(&'a str),
    Stdin,
}

/// `--input`, then `config.json` when it exists, then piped stdin.
///
/// Stdin is only consulted when no file applies, so a non-interactive stdin
/// that never closes cannot block a run that has a config on disk.
fn config_source(path: Option<&str>, default_exists: bool) -> ConfigSource<'_> {
    match path {
        Some(path) => ConfigSource::File(path),
        None if default_exists => ConfigSource::File(DEFAULT_CONFIG_PATH),
        None => ConfigSource::Stdin,
    }
}

/// Load the config from `--input`, `config.json`, or piped stdin, in that order.
pub fn load_config(path: Option<&str>) -> Result<StockworthConfig, Box<dyn std::error::Error>> {
    let default_exists = Path::new(DEFAULT_CONFIG_PATH).is_file();
    match config_source(path, default_exists) {
        ConfigSource::File(path) => {
            tracing::debug!(path, "reading config file");
            file::read_document(path)
        }
        ConfigSource::Stdin => {
            tracing::debug!("reading config from stdin");
            stdin::read_stdin()?.ok_or_else(|| {
                format!(
                    "no config: pass --input <file>, create {} or pipe one on stdin",
                    DEFAULT_CONFIG_PATH
                )
                .into()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(config_source(Some("grants.yaml"), true), ConfigSource::File("grants.yaml"));
        assert_eq!(config_source(Some("grants.yaml"), false), ConfigSource::File("grants.yaml"));
    }

    #[test]
    fn test_default_file_before_stdin() {
        assert_eq!(config_source(None, true), ConfigSource::File(DEFAULT_CONFIG_PATH));
        assert_eq!(config_source(None, false), ConfigSource::Stdin);
    }
}
