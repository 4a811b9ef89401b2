//! Mantras shown with the reminder.
//!
//! The built-in list is compiled into the binary. A `mantras.json` in the
//! config directory replaces it.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

const BUILTIN: &str = include_str!("../assets/mantras.json");
const FALLBACK: &str = "Stay focused and keep moving forward.";
const MANTRAS_FILE_NAME: &str = "mantras.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mantras {
    list: Vec<String>,
}

impl Mantras {
    /// The override in `config_dir` if it is usable, else the built-in list.
    pub fn load(config_dir: &Path) -> Self {
        let path = config_dir.join(MANTRAS_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(data) => match parse(&data) {
                Ok(list) => {
                    debug!(path = %path.display(), count = list.len(), "loaded mantras");
                    return Mantras { list };
                }
                Err(e) => warn!(path = %path.display(), error = %e, "ignoring mantras file"),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to read mantras file"),
        }
        Self::builtin()
    }

    pub fn builtin() -> Self {
        let list = parse(BUILTIN).unwrap_or_else(|_| vec![FALLBACK.to_string()]);
        Mantras { list }
    }

    /// The mantra for `date`. The same date always gets the same mantra and
    /// consecutive dates walk through the list.
    pub fn for_day(&self, date: NaiveDate) -> &str {
        let len = self.list.len() as i64;
        if len == 0 {
            return FALLBACK;
        }
        let idx = i64::from(date.num_days_from_ce()).rem_euclid(len) as usize;
        &self.list[idx]
    }
}

fn parse(data: &str) -> Result<Vec<String>> {
    let list: Vec<String> = serde_json::from_str(data).context("expected a JSON array of strings")?;
    let list: Vec<String> = list
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    if list.is_empty() {
        bail!("no mantras found");
    }
    Ok(list)
}
