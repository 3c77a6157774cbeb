use anyhow::{bail, Context};
use poscore::pos::DEFAULT_TAX_RATE;
use poscore::ScannerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub scanner: ScannerConfig,
    pub tax_rate: f64,
    pub bind_address: SocketAddr,
    /// Pricebook rows loaded at startup.
    pub pricebook: Option<PathBuf>,
    /// Ring the terminal bell on confirmed scans.
    pub audible: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            scanner: ScannerConfig::default(),
            tax_rate: DEFAULT_TAX_RATE,
            bind_address: SocketAddr::from(([127, 0, 0, 1], 9000)),
            pricebook: None,
            audible: true,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub cooldown_ms: Option<u64>,
    pub buffer_capacity: Option<usize>,
    pub tax_rate: Option<f64>,
    pub bind_address: Option<SocketAddr>,
    pub pricebook: Option<PathBuf>,
}

impl TerminalConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading terminal config {}", path_ref.display()))?;
        let config: TerminalConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing terminal config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(cooldown_ms) = overrides.cooldown_ms {
            self.scanner.cooldown_ms = cooldown_ms;
        }
        if let Some(capacity) = overrides.buffer_capacity {
            self.scanner.buffer_capacity = capacity;
        }
        if let Some(tax_rate) = overrides.tax_rate {
            self.tax_rate = tax_rate;
        }
        if let Some(bind_address) = overrides.bind_address {
            self.bind_address = bind_address;
        }
        if overrides.pricebook.is_some() {
            self.pricebook = overrides.pricebook;
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.scanner
            .validate()
            .context("validating scanner settings")?;
        if !(0.0..1.0).contains(&self.tax_rate) {
            bail!("tax rate {} must be in [0, 1)", self.tax_rate);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_register_settings() {
        let cfg = TerminalConfig::default();
        assert_eq!(cfg.scanner.buffer_capacity, 15);
        assert_eq!(cfg.tax_rate, 0.0825);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"scanner:\n  buffer_capacity: 20\n  cooldown_ms: 5000\ntax_rate: 0.07\nbind_address: \"0.0.0.0:8080\"\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = TerminalConfig::load(&path).unwrap();
        assert_eq!(cfg.scanner.buffer_capacity, 20);
        assert_eq!(cfg.scanner.cooldown_ms, 5000);
        assert_eq!(cfg.scanner.confirmations, 3);
        assert_eq!(cfg.tax_rate, 0.07);
        assert_eq!(cfg.bind_address.port(), 8080);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let cfg = TerminalConfig::default().with_overrides(ConfigOverrides {
            cooldown_ms: Some(5000),
            tax_rate: Some(0.0),
            ..Default::default()
        });
        assert_eq!(cfg.scanner.cooldown_ms, 5000);
        assert_eq!(cfg.tax_rate, 0.0);
        assert_eq!(cfg.scanner.buffer_capacity, 15);
    }

    #[test]
    fn rejects_out_of_range_tax() {
        let cfg = TerminalConfig {
            tax_rate: 1.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = TerminalConfig::load("/nonexistent/terminal.yaml").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/terminal.yaml"));
    }
}
