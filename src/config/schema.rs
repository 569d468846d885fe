use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_EXPORT_FILE_NAME: &str = "student_scores_export.csv";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Dark,
    Light,
}

/// Example YAML:
/// ```yaml
/// data_file: /srv/class-3/student_scores.csv
/// export_file_name: class-3-scores.csv
/// top_n: 5
/// theme: auto
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Backing CSV file (default: ~/.config/class-scores/student_scores.csv)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,

    /// Export artifact name; relative names land next to the data file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_file_name: Option<String>,

    /// How many students the ranking shows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,

    #[serde(default)]
    pub theme: ThemeMode,
}

impl Config {
    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(crate::store::get_data_path)
    }

    pub fn export_file_name(&self) -> &str {
        self.export_file_name
            .as_deref()
            .unwrap_or(DEFAULT_EXPORT_FILE_NAME)
    }

    pub fn top_n(&self) -> usize {
        self.top_n.unwrap_or(DEFAULT_TOP_N)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.top_n(), 5);
        assert_eq!(config.export_file_name(), DEFAULT_EXPORT_FILE_NAME);
        assert_eq!(config.theme, ThemeMode::Auto);
        assert!(config.data_file().ends_with("student_scores.csv"));
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = "data_file: /tmp/class.csv\nexport_file_name: out.csv\ntop_n: 3\ntheme: light\n";
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.data_file(), PathBuf::from("/tmp/class.csv"));
        assert_eq!(config.export_file_name(), "out.csv");
        assert_eq!(config.top_n(), 3);
        assert_eq!(config.theme, ThemeMode::Light);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let config: Config = serde_saphyr::from_str("top_n: 10\n").unwrap();
        assert_eq!(config.top_n(), 10);
        assert_eq!(config.theme, ThemeMode::Auto);
        assert!(config.data_file.is_none());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let result: Result<Config, _> = serde_saphyr::from_str("colour: blue\n");
        assert!(result.is_err());
    }
}
