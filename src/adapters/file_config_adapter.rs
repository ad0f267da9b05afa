//! INI file configuration adapter for position tickets.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .filter(|v| !v.trim().is_empty())
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_opt_double(section, key).unwrap_or(default)
    }

    fn get_opt_double(&self, section: &str, key: &str) -> Option<f64> {
        self.config.getfloat(section, key).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TICKET: &str = r#"
[account]
size = 50000

[asset]
symbol = BHP
exchange = ASX

[opening]
date_time = 2024-01-15T10:00:00
ask = 100.0
bid = 98.0

[risk]
strategy = plain
risk_per_trade = 500
risk_percentage =
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_ticket() {
        let adapter = FileConfigAdapter::from_string(TICKET).unwrap();
        assert_eq!(adapter.get_string("asset", "symbol"), Some("BHP".to_string()));
        assert_eq!(
            adapter.get_string("opening", "date_time"),
            Some("2024-01-15T10:00:00".to_string())
        );
        assert_eq!(adapter.get_double("account", "size", 0.0), 50_000.0);
    }

    #[test]
    fn get_string_returns_none_for_missing_or_blank() {
        let adapter = FileConfigAdapter::from_string(TICKET).unwrap();
        assert_eq!(adapter.get_string("asset", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
        assert_eq!(adapter.get_string("risk", "risk_percentage"), None);
    }

    #[test]
    fn get_opt_double_distinguishes_absent_values() {
        let adapter = FileConfigAdapter::from_string(TICKET).unwrap();
        assert_eq!(adapter.get_opt_double("risk", "risk_per_trade"), Some(500.0));
        assert_eq!(adapter.get_opt_double("risk", "proportion"), None);
        assert_eq!(adapter.get_opt_double("risk", "risk_percentage"), None);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[fees]\nfixed = five\n").unwrap();
        assert_eq!(adapter.get_double("fees", "fixed", 0.0), 0.0);
        assert_eq!(adapter.get_opt_double("fees", "fixed"), None);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Fees]\nFixed = 4.5\n").unwrap();
        assert_eq!(adapter.get_opt_double("fees", "fixed"), Some(4.5));
    }

    #[test]
    fn from_file_reads_ticket() {
        let file = create_temp_config("[fees]\nvariable = 0.001\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_opt_double("fees", "variable"), Some(0.001));
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/ticket.ini");
        assert!(result.is_err());
    }
}
