//! Live team standings.

use std::fmt;
use std::time::{Duration, Instant};

use crate::core::api::TeamPoints;

/// Group totals in descending order of points. Ties keep server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standings {
    teams: Vec<TeamPoints>,
}

/// One row of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked<'a> {
    /// 1-based position.
    pub rank: usize,
    pub team: &'a TeamPoints,
}

pub const PODIUM_SIZE: usize = 3;

impl Standings {
    pub fn new(mut teams: Vec<TeamPoints>) -> Self {
        // sort_by is stable
        teams.sort_by(|a, b| b.total_points.cmp(&a.total_points));
        Self { teams }
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn ranked(&self) -> impl Iterator<Item = Ranked<'_>> {
        self.teams
            .iter()
            .enumerate()
            .map(|(i, team)| Ranked { rank: i + 1, team })
    }

    /// Top three teams.
    pub fn podium(&self) -> impl Iterator<Item = Ranked<'_>> {
        self.ranked().take(PODIUM_SIZE)
    }

    /// Everyone after the podium.
    pub fn rest(&self) -> impl Iterator<Item = Ranked<'_>> {
        self.ranked().skip(PODIUM_SIZE)
    }

    pub fn leader(&self) -> Option<&TeamPoints> {
        self.teams.first()
    }

    /// Replace the standings with a fresh response. Errors clear the table.
    pub fn apply<E: fmt::Display>(&mut self, result: Result<Vec<TeamPoints>, E>) {
        *self = match result {
            Ok(teams) => Standings::new(teams),
            Err(e) => {
                log::warn!("Failed to refresh points: {e}");
                Standings::default()
            }
        };
    }
}

/// Periodic refresh timer driven from the UI tick.
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    interval: Duration,
    last: Option<Instant>,
    in_flight: bool,
}

impl RefreshSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            in_flight: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a fetch should start at `now`. Never overlaps fetches.
    pub fn is_due(&self, now: Instant) -> bool {
        if self.in_flight {
            return false;
        }
        match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    pub fn started(&mut self, now: Instant) {
        self.last = Some(now);
        self.in_flight = true;
    }

    pub fn finished(&mut self) {
        self.in_flight = false;
    }

    /// Make the next `is_due` true (manual refresh).
    pub fn force(&mut self) {
        self.last = None;
    }

    /// Time until the next refresh, zero when due.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        }
    }
}
