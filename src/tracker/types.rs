use serde::Deserialize;

use crate::abort::AbortSignal;
use crate::geo::Coordinates;
use crate::source::IssFix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerMode {
    Idle,
    Polling,
    Done,
}

/// What to do when a cycle fails to fetch one of its positions.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop polling and report the error.
    #[default]
    Abort,
    /// Log the error and carry on with the next cycle.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// ISS position, own position and the distance between them.
    Distance,
    /// ISS position only.
    Position,
}

/// Result of one complete fetch + compute cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub iss: IssFix,
    pub user: Coordinates,
    pub distance_km: f64,
}

/// Latest known values. Each cycle overwrites what it fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackerState {
    pub iss: Option<IssFix>,
    pub user: Option<Coordinates>,
    pub last_distance_km: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Cycles attempted, including skipped ones.
    pub cycles: u64,
    pub skipped: u64,
    pub aborted: Option<AbortSignal>,
}
