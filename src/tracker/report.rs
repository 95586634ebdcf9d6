use std::io::{self, Write};

use chrono::{DateTime, Local};

use super::types::Observation;
use crate::source::IssFix;

const RULE: &str = "-----------------------";

pub fn write_position_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Current ISS Location:")
}

pub fn write_position<W: Write>(out: &mut W, fix: &IssFix) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Longitude: {}", fix.position.longitude_deg)?;
    writeln!(out, "Latitude:  {}", fix.position.latitude_deg)?;
    writeln!(out, "Current Time: {}", format_timestamp(fix.timestamp))?;
    writeln!(out)
}

pub fn write_distance<W: Write>(out: &mut W, observation: &Observation) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "ISS Longitude: {}", observation.iss.position.longitude_deg)?;
    writeln!(out, "ISS Latitude:  {}", observation.iss.position.latitude_deg)?;
    writeln!(out, "Your Location: {}", observation.user)?;
    writeln!(
        out,
        "Current Distance: {:.3} kilometers",
        observation.distance_km
    )?;
    writeln!(
        out,
        "Current Time: {}",
        format_timestamp(observation.iss.timestamp)
    )
}

/// Epoch seconds rendered in the local time zone.
pub fn format_timestamp(epoch_seconds: i64) -> String {
    match DateTime::from_timestamp(epoch_seconds, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => format!("@{epoch_seconds}"),
    }
}
