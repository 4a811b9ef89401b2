//! Persisted settings: the install options and the pause sentinel.
//!
//! Stored as pretty-printed JSON in `<config dir>/sultengutt.json`:
//!
//! ```json
//! {
//!   "install_options": { "days": ["Monday", "Friday"], "hour": "14:30" },
//!   "paused_until": -1
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sultengutt_core::{PauseState, Schedule, Zone};
use tracing::debug;

const CONFIG_DIR_NAME: &str = ".sultengutt";
const CONFIG_FILE_NAME: &str = "sultengutt.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOptions {
    pub days: Vec<String>,
    pub hour: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_link: Option<String>,
    /// IANA timezone; absent means the machine's local zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub install_options: InstallOptions,
    /// `-1` not paused, `0` paused indefinitely, otherwise a Unix timestamp.
    #[serde(default)]
    pub paused_until: PauseState,

    #[serde(skip)]
    path: PathBuf,
    #[serde(skip)]
    fresh_install: bool,
}

impl Config {
    pub fn is_fresh_install(&self) -> bool {
        self.fresh_install
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schedule(&self) -> Result<Schedule> {
        Ok(Schedule::new(
            &self.install_options.days[..],
            &self.install_options.hour,
        )?)
    }

    pub fn zone(&self) -> Result<Zone> {
        Ok(Zone::parse(self.install_options.timezone.as_deref())?)
    }

    fn validate(&self) -> Result<()> {
        if self.install_options.days.is_empty() {
            bail!("no days specified");
        }
        if self.install_options.hour.is_empty() {
            bail!("no hour specified");
        }
        self.schedule()?;
        self.zone()?;
        Ok(())
    }
}

/// Loads and saves [`Config`] inside one directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        ConfigManager {
            config_dir: config_dir.into(),
        }
    }

    /// `~/.sultengutt`.
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir().context("failed to get user home directory")?;
        Ok(ConfigManager::new(home.join(CONFIG_DIR_NAME)))
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Read the config. A missing file yields a fresh, unpaused default.
    pub fn load(&self) -> Result<Config> {
        let path = self.config_path();

        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, treating as fresh install");
                return Ok(Config {
                    path,
                    fresh_install: true,
                    ..Config::default()
                });
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        let mut cfg: Config = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        cfg.path = path;
        cfg.fresh_install = false;
        cfg.validate().context("invalid configuration")?;

        debug!(
            path = %cfg.path.display(),
            paused_until = cfg.paused_until.sentinel(),
            "loaded config"
        );
        Ok(cfg)
    }

    /// Write the config through a temporary file and a rename.
    pub fn save(&self, cfg: &mut Config) -> Result<()> {
        fs::create_dir_all(&self.config_dir).with_context(|| {
            format!(
                "failed to create config directory {}",
                self.config_dir.display()
            )
        })?;

        let path = self.config_path();
        let data = serde_json::to_string_pretty(cfg).context("failed to serialize config")?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data)
            .with_context(|| format!("failed to write temp config file {}", tmp.display()))?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e).with_context(|| format!("failed to save config file {}", path.display()));
        }

        cfg.path = path;
        cfg.fresh_install = false;
        debug!(
            path = %cfg.path.display(),
            paused_until = cfg.paused_until.sentinel(),
            "saved config"
        );
        Ok(())
    }

    /// Remove the whole config directory.
    pub fn clean(&self) -> Result<()> {
        match fs::remove_dir_all(&self.config_dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("failed to remove {}", self.config_dir.display())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn installed() -> Config {
        Config {
            install_options: InstallOptions {
                days: vec!["Monday".into(), "Wednesday".into()],
                hour: "14:30".into(),
                site_link: Some("https://example.com".into()),
                timezone: None,
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_missing_file_is_fresh_install() {
        let dir = TempDir::new().unwrap();
        let cfg = ConfigManager::new(dir.path()).load().unwrap();
        assert!(cfg.is_fresh_install());
        assert_eq!(cfg.paused_until, PauseState::NotPaused);
        assert_eq!(cfg.path(), dir.path().join("sultengutt.json"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let cm = ConfigManager::new(dir.path().join("nested"));
        let mut cfg = installed();
        cfg.paused_until = PauseState::Until(1_700_000_000);
        cm.save(&mut cfg).unwrap();
        assert!(!cfg.is_fresh_install());

        let loaded = cm.load().unwrap();
        assert!(!loaded.is_fresh_install());
        assert_eq!(loaded.install_options, cfg.install_options);
        assert_eq!(loaded.paused_until, PauseState::Until(1_700_000_000));
        assert!(!cm.config_path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_format_uses_sentinels() {
        let dir = TempDir::new().unwrap();
        let cm = ConfigManager::new(dir.path());
        let mut cfg = installed();
        cfg.paused_until = PauseState::Indefinite;
        cm.save(&mut cfg).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(cm.config_path()).unwrap()).unwrap();
        assert_eq!(raw["paused_until"], 0);
        assert_eq!(raw["install_options"]["hour"], "14:30");
        assert!(raw["install_options"].get("timezone").is_none());
    }

    #[test]
    fn test_loads_minimal_layout() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("sultengutt.json"),
            r#"{"install_options":{"days":["Friday"],"hour":"9:00"},"paused_until":-1}"#,
        )
        .unwrap();
        let cfg = ConfigManager::new(dir.path()).load().unwrap();
        assert_eq!(cfg.paused_until, PauseState::NotPaused);
        assert_eq!(cfg.install_options.days, vec!["Friday"]);
        assert_eq!(cfg.install_options.site_link, None);
    }

    #[test]
    fn test_rejects_invalid_content() {
        let cases = [
            r#"{"install_options":{"days":[],"hour":"14:30"},"paused_until":-1}"#,
            r#"{"install_options":{"days":["Funday"],"hour":"14:30"},"paused_until":-1}"#,
            r#"{"install_options":{"days":["Monday"],"hour":""},"paused_until":-1}"#,
            r#"{"install_options":{"days":["Monday"],"hour":"24:00"},"paused_until":-1}"#,
            r#"{"install_options":{"days":["Monday"],"hour":"14:30","timezone":"Mars/Base"},"paused_until":-1}"#,
            "not json",
        ];
        for content in cases {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("sultengutt.json"), content).unwrap();
            assert!(
                ConfigManager::new(dir.path()).load().is_err(),
                "accepted {content}"
            );
        }
    }

    #[test]
    fn test_clean_removes_directory() {
        let dir = TempDir::new().unwrap();
        let cm = ConfigManager::new(dir.path().join("cfg"));
        cm.save(&mut installed()).unwrap();
        assert!(cm.config_dir().exists());
        cm.clean().unwrap();
        assert!(!cm.config_dir().exists());
        // Cleaning twice is fine.
        cm.clean().unwrap();
    }
}
