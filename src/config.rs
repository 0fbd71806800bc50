//! Configuration of the trace packer.

use std::{num::NonZeroUsize, path::PathBuf, sync::OnceLock};

use crate::{ConvError, ConvResult};

const DEFAULT_OUT_DIR: &str = "out";
const DEFAULT_MAX_OPEN_FILES: usize = 128;

#[derive(serde::Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
struct Config {
    out_dir: PathBuf,
    max_open_files: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            max_open_files: DEFAULT_MAX_OPEN_FILES,
        }
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

fn parse_config(content: &str) -> ConvResult<Config> {
    let config: Config = toml::from_str(content).map_err(ConvError::config)?;
    if config.max_open_files == 0 {
        return Err(ConvError::config("MaxOpenFiles must be greater than zero"));
    }
    Ok(config)
}

/// Load the configuration from a toml file.
/// Values not present in the file keep their defaults.
pub fn init_config_toml(config_file: &std::path::Path) -> ConvResult<()> {
    let content =
        std::fs::read_to_string(config_file).map_err(|e| ConvError::open(config_file, e))?;
    CONFIG
        .set(parse_config(&content)?)
        .map_err(|_| ConvError::config("initialize config more than once"))
}

fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

pub fn out_dir() -> PathBuf {
    get_config().out_dir.clone()
}

pub fn max_open_files() -> NonZeroUsize {
    NonZeroUsize::new(get_config().max_open_files).expect("MaxOpenFiles is checked to be non-zero")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_config() {
        assert_eq!(parse_config("").unwrap(), Config::default());
        let config = parse_config(
            r#"
            OutDir = "/tmp/traces"
            MaxOpenFiles = 16
            "#,
        )
        .unwrap();
        assert_eq!(config.out_dir, PathBuf::from("/tmp/traces"));
        assert_eq!(config.max_open_files, 16);
        let config = parse_config("MaxOpenFiles = 4").unwrap();
        assert_eq!(config.out_dir, PathBuf::from(DEFAULT_OUT_DIR));
        assert!(matches!(
            parse_config("MaxOpenFiles = 0"),
            Err(ConvError::Config(_))
        ));
        assert!(parse_config("MaxOpenFiles = -1").is_err());
        assert!(parse_config("BlockSize = 4096").is_err());
    }
}
