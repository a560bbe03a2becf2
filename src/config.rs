use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub hash: HashConfig,

    #[serde(default)]
    pub partitions: PartitionsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Decimal places used when scaling byte counts
    pub decimals: u8,
    /// Also append every report to this file. Empty = disabled.
    pub output_file: String,
    /// Width of the `=` and `-` rules in text reports
    pub width: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// md5, sha1 or sha256
    pub default_algorithm: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionsConfig {
    /// Show proc, sysfs, tmpfs, loop devices and friends
    pub include_virtual: bool,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { decimals: 2, output_file: String::new(), width: 80 }
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self { default_algorithm: "sha256".into() }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    pub fn load() -> Self {
        match try_load() {
            Ok(c)  => c,
            Err(e) => {
                tracing::debug!(error = %e, "using default config");
                // Write defaults on first run (best-effort)
                let _ = try_write_defaults();
                Config::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fscli").join("fscli.toml"))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn output_file(&self) -> Option<PathBuf> {
        let f = self.general.output_file.trim();
        if f.is_empty() { None } else { Some(PathBuf::from(f)) }
    }
}

fn try_load() -> Result<Config> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    let text = fs::read_to_string(path)?;
    Config::parse(&text)
}

fn try_write_defaults() -> Result<()> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    if path.exists() {
        // present but unparsable: leave the user's file alone
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# fscli configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.general.decimals, 2);
        assert_eq!(cfg.hash.default_algorithm, "sha256");
        assert!(!cfg.partitions.include_virtual);
        assert!(cfg.output_file().is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::parse("[general]\noutput_file = \"/tmp/fscli.log\"\n\n[partitions]\ninclude_virtual = true\n").unwrap();
        assert_eq!(cfg.general.width, 80);
        assert_eq!(cfg.output_file(), Some(PathBuf::from("/tmp/fscli.log")));
        assert!(cfg.partitions.include_virtual);
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), Config::default());
    }

    #[test]
    fn bad_types_are_rejected() {
        assert!(Config::parse("[general]\ndecimals = \"two\"\n").is_err());
    }
}
