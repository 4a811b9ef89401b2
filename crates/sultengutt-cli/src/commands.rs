//! Command handlers.
//!
//! Each handler works on an [`App`], which owns the loaded config and borrows
//! the clock and the output stream, so tests can drive them with a fixed
//! clock and an in-memory buffer.

use std::io::Write;

use anyhow::{Context, Result};
use colored::Colorize;
use sultengutt_core::{parse_duration_tokens, Clock, Gate, PauseState, Schedule, Zone};
use tracing::{debug, info};

use crate::config::{Config, ConfigManager, InstallOptions};
use crate::mantras::Mantras;

const DATE_FORMAT: &str = "%A, %B %-d, %Y";
const TIME_FORMAT: &str = "%H:%M";
const NOT_INSTALLED: &str =
    "Sultengutt has not been installed yet, please run `sultengutt install` first";

pub struct App<'a, W: Write> {
    manager: ConfigManager,
    config: Config,
    clock: &'a dyn Clock,
    out: W,
}

/// Arguments of `sultengutt install`.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub days: Vec<String>,
    pub hour: String,
    pub site_link: Option<String>,
    pub timezone: Option<String>,
}

impl<'a, W: Write> App<'a, W> {
    pub fn new(manager: ConfigManager, config: Config, clock: &'a dyn Clock, out: W) -> Self {
        App {
            manager,
            config,
            clock,
            out,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Validate and store the schedule. An existing pause is kept.
    pub fn install(&mut self, req: InstallRequest) -> Result<()> {
        let schedule = Schedule::new(&req.days[..], &req.hour).context("invalid schedule")?;
        let zone = Zone::parse(req.timezone.as_deref())?;
        let reinstall = !self.config.is_fresh_install();

        self.config.install_options = InstallOptions {
            days: schedule.day_names(),
            hour: schedule.time_of_day().to_string(),
            site_link: req.site_link.filter(|s| !s.trim().is_empty()),
            timezone: match zone {
                Zone::Local => None,
                Zone::Named(_) => Some(zone.to_string()),
            },
        };
        self.manager
            .save(&mut self.config)
            .context("failed to save config")?;
        info!(
            reinstall,
            days = ?self.config.install_options.days,
            hour = %self.config.install_options.hour,
            "installed schedule"
        );

        writeln!(
            self.out,
            "{}",
            "✓ Sultengutt is set up! Happy dining!".green().bold()
        )?;
        writeln!(
            self.out,
            "{}",
            format!("Config saved to: {}", self.config.path().display()).blue()
        )?;
        Ok(())
    }

    /// One scheduled reminder run.
    pub fn execute(&mut self) -> Result<()> {
        if self.config.is_fresh_install() {
            writeln!(self.out, "{}", NOT_INSTALLED.red().bold())?;
            return Ok(());
        }

        let now_utc = self.clock.now();
        let now = now_utc.timestamp();
        match self.config.paused_until.gate(now) {
            Gate::Suppress => {
                debug!(paused_until = self.config.paused_until.sentinel(), "reminder suppressed");
                writeln!(self.out, "paused. Use 'sultengutt resume' to unpause.")?;
                return Ok(());
            }
            Gate::ResumeAndFire => {
                info!(
                    paused_until = self.config.paused_until.sentinel(),
                    "pause expired, resuming"
                );
                self.config.paused_until = PauseState::NotPaused;
                self.manager
                    .save(&mut self.config)
                    .context("failed to save config")?;
            }
            Gate::Fire => {}
        }

        writeln!(
            self.out,
            "{}",
            "🍔 Time to order your surprise dinner!".green().bold()
        )?;
        if let Some(link) = &self.config.install_options.site_link {
            writeln!(self.out, "{}", format!("Order here: {link}").blue())?;
        }

        let today = self
            .config
            .zone()?
            .localize(now)
            .map_or_else(|| now_utc.date_naive(), |dt| dt.date_naive());
        let mantras = Mantras::load(self.manager.config_dir());
        writeln!(
            self.out,
            "{} {}",
            "Your mantra for today:".dimmed(),
            mantras.for_day(today).italic()
        )?;
        Ok(())
    }

    /// Pause for a duration given as words, or indefinitely with none.
    pub fn pause(&mut self, args: &[String]) -> Result<()> {
        if self.config.is_fresh_install() {
            writeln!(self.out, "{}", NOT_INSTALLED.red().bold())?;
            return Ok(());
        }

        let elapsed = if args.is_empty() {
            None
        } else {
            Some(parse_duration_tokens(args).context("error parsing duration")?)
        };

        let zone = self.config.zone()?;
        let state = zone
            .pause_state(elapsed, &self.config.install_options.hour, self.clock.now())
            .context("error calculating pause time")?;

        self.config.paused_until = state;
        self.manager
            .save(&mut self.config)
            .context("failed to save config")?;
        info!(paused_until = state.sentinel(), "paused reminders");

        match state {
            PauseState::Until(ts) => writeln!(
                self.out,
                "Paused until {} at {}",
                zone.format(ts, DATE_FORMAT),
                zone.format(ts, TIME_FORMAT)
            )?,
            _ => writeln!(
                self.out,
                "Paused indefinitely. Use 'sultengutt resume' to unpause."
            )?,
        }
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        if self.config.is_fresh_install() {
            writeln!(self.out, "{}", NOT_INSTALLED.red().bold())?;
            return Ok(());
        }

        self.config.paused_until = PauseState::NotPaused;
        self.manager
            .save(&mut self.config)
            .context("failed to save config")?;
        info!("resumed reminders");
        writeln!(self.out, "{}", "Resumed Sultengutt reminders".blue())?;
        Ok(())
    }

    pub fn status(&mut self) -> Result<()> {
        if self.config.is_fresh_install() {
            writeln!(self.out, "{}", NOT_INSTALLED.red().bold())?;
            return Ok(());
        }

        let opts = &self.config.install_options;
        let zone = self.config.zone()?;
        let schedule = self.config.schedule()?;
        let now = self.clock.now();

        writeln!(self.out, "╭─────────────────────────────────────╮")?;
        writeln!(self.out, "│      SULTENGUTT STATUS              │")?;
        writeln!(self.out, "╰─────────────────────────────────────╯")?;
        writeln!(self.out)?;
        writeln!(self.out, "Schedule:")?;
        writeln!(self.out, "  Hour: {}", opts.hour)?;
        writeln!(self.out, "  Days: {}", opts.days.join(", "))?;
        writeln!(self.out, "  Timezone: {zone}")?;
        if let Some(link) = &opts.site_link {
            writeln!(self.out, "  Site: {link}")?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "Status:")?;
        writeln!(self.out, "  Config path: {}", self.config.path().display())?;

        let pause = self.config.paused_until;
        match pause {
            PauseState::NotPaused => writeln!(self.out, "  Paused: not paused (active)")?,
            PauseState::Indefinite => {
                writeln!(self.out, "  Paused: paused indefinitely")?;
                writeln!(self.out, "  tip: use 'sultengutt resume' to unpause")?;
            }
            PauseState::Until(ts) if pause.is_suppressing(now.timestamp()) => {
                writeln!(
                    self.out,
                    "  Paused: paused until {}",
                    zone.format(ts, &format!("{DATE_FORMAT} {TIME_FORMAT}"))
                )?;
                writeln!(self.out, "  tip: use 'sultengutt resume' to unpause early")?;
            }
            PauseState::Until(_) => {
                writeln!(self.out, "  Paused: pause expired, resumes on next run")?
            }
        }

        match zone.next_reminder(&schedule, pause, now)? {
            Some(next) => writeln!(
                self.out,
                "  Next reminder: {}",
                next.format(&format!("{DATE_FORMAT} {TIME_FORMAT}"))
            )?,
            None => writeln!(self.out, "  Next reminder: none while paused")?,
        }
        Ok(())
    }

    /// Remove the configuration. Without `confirm` nothing is touched.
    pub fn uninstall(&mut self, confirm: bool) -> Result<()> {
        if self.config.is_fresh_install() {
            writeln!(self.out, "{}", "Sultengutt is not installed".blue())?;
            return Ok(());
        }

        if !confirm {
            writeln!(self.out, "This will completely uninstall Sultengutt.")?;
            writeln!(
                self.out,
                "{}",
                "WARNING: This will remove all configuration files.".red().bold()
            )?;
            writeln!(self.out, "Re-run with --confirm to proceed.")?;
            return Ok(());
        }

        self.manager
            .clean()
            .context("failed to clean configuration")?;
        info!(dir = %self.manager.config_dir().display(), "removed configuration");
        writeln!(self.out, "{}", "Removed configuration files".green().bold())?;
        writeln!(
            self.out,
            "{}",
            "✓ Sultengutt has been uninstalled".green().bold()
        )?;
        Ok(())
    }
}
