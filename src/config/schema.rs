use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where the store file lives (default: ~/.config/podium/store.json)
    #[serde(default)]
    pub data_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parses() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_data_path_parses() {
        let config: Config = serde_saphyr::from_str("data_path: /tmp/scores.json").unwrap();
        assert_eq!(config.data_path.unwrap(), PathBuf::from("/tmp/scores.json"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(serde_saphyr::from_str::<Config>("queries: []").is_err());
    }
}
