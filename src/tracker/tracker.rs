use std::io::Write;
use std::time::Duration;

use super::error::TrackerError;
use super::report;
use super::types::{ErrorPolicy, Observation, ReportKind, RunSummary, TrackerMode, TrackerState};
use crate::abort::AbortListener;
use crate::geo::distance_km;
use crate::source::{FetchError, IssSource, LocationSource};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
pub struct TrackerSettings {
    pub poll_interval: Duration,
    pub on_error: ErrorPolicy,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            on_error: ErrorPolicy::Abort,
        }
    }
}

/// Follows the ISS and reports how far away it is.
pub struct PositionTracker<W> {
    iss: Box<dyn IssSource>,
    location: Box<dyn LocationSource>,
    settings: TrackerSettings,
    out: W,
    mode: TrackerMode,
    state: TrackerState,
}

impl<W: Write> PositionTracker<W> {
    pub fn new(
        iss: Box<dyn IssSource>,
        location: Box<dyn LocationSource>,
        settings: TrackerSettings,
        out: W,
    ) -> Self {
        Self {
            iss,
            location,
            settings,
            out,
            mode: TrackerMode::Idle,
            state: TrackerState::default(),
        }
    }

    pub fn mode(&self) -> TrackerMode {
        self.mode
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Fetch both positions and compute the distance between them.
    pub async fn refresh(&mut self) -> Result<Observation, FetchError> {
        let iss = self.iss.fetch().await?;
        self.state.iss = Some(iss);

        let user = self.location.resolve().await?;
        self.state.user = Some(user);

        let distance_km = distance_km(&iss.position, &user);
        self.state.last_distance_km = Some(distance_km);

        Ok(Observation {
            iss,
            user,
            distance_km,
        })
    }

    /// Print the distance to the ISS every poll interval.
    /// `count == 0` polls until aborted.
    pub async fn run_distance(
        &mut self,
        count: u64,
        abort: &mut AbortListener,
    ) -> Result<RunSummary, TrackerError> {
        self.poll(ReportKind::Distance, count, abort).await
    }

    /// Print the ISS position every poll interval, without looking up our own.
    /// `count == 0` polls until aborted.
    pub async fn run_position(
        &mut self,
        count: u64,
        abort: &mut AbortListener,
    ) -> Result<RunSummary, TrackerError> {
        self.poll(ReportKind::Position, count, abort).await
    }

    async fn poll(
        &mut self,
        kind: ReportKind,
        count: u64,
        abort: &mut AbortListener,
    ) -> Result<RunSummary, TrackerError> {
        let mut summary = RunSummary::default();

        self.mode = TrackerMode::Polling;
        log::info!(
            "Polling every {} ({}, on error: {})",
            humantime::format_duration(self.settings.poll_interval),
            if count == 0 {
                "until stopped".to_string()
            } else {
                format!("{count} cycles")
            },
            self.settings.on_error
        );

        if kind == ReportKind::Position {
            report::write_position_header(&mut self.out)?;
        }

        while count == 0 || summary.cycles < count {
            if let Some(signal) = abort.sleep(self.settings.poll_interval).await {
                log::info!("Stopping after {} cycles: {}", summary.cycles, signal.reason);
                summary.aborted = Some(signal);
                break;
            }

            summary.cycles += 1;
            match self.cycle(kind).await {
                Ok(()) => {}
                Err(TrackerError::Fetch(e)) if self.settings.on_error == ErrorPolicy::Skip => {
                    log::warn!("Cycle {} skipped: {}", summary.cycles, e);
                    summary.skipped += 1;
                }
                Err(e) => {
                    log::error!("Cycle {} failed: {}", summary.cycles, e);
                    self.mode = TrackerMode::Idle;
                    return Err(e);
                }
            }
        }

        self.mode = TrackerMode::Done;
        Ok(summary)
    }

    async fn cycle(&mut self, kind: ReportKind) -> Result<(), TrackerError> {
        match kind {
            ReportKind::Distance => {
                let observation = self.refresh().await?;
                report::write_distance(&mut self.out, &observation)?;
            }
            ReportKind::Position => {
                let fix = self.iss.fetch().await?;
                self.state.iss = Some(fix);
                report::write_position(&mut self.out, &fix)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
