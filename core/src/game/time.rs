use anyhow::{Result, ensure};

use super::{MAX_TIME_MULTIPLIER, MIN_TIME_MULTIPLIER};
use crate::{CalendarDate, GameClock};

/// Converts host time into whole simulation ticks.
#[derive(Debug, Clone)]
pub(crate) struct SimulationClock {
    clock: GameClock,
    calendar: CalendarDate,
    paused: bool,
    time_multiplier: f64,
    pending: f64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self {
            clock: GameClock::new(),
            calendar: CalendarDate::from_start(),
            paused: false,
            time_multiplier: 1.0,
            pending: 0.0,
        }
    }

    pub fn time_multiplier(&self) -> f64 {
        self.time_multiplier
    }

    pub fn set_time_multiplier(&mut self, multiplier: f64) -> Result<()> {
        ensure!(
            multiplier.is_finite() && multiplier > 0.0,
            "時間倍率は正の有限値で指定してください"
        );
        self.time_multiplier = multiplier.clamp(MIN_TIME_MULTIPLIER, MAX_TIME_MULTIPLIER);
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn calendar_date(&self) -> CalendarDate {
        self.calendar
    }

    pub fn total_ticks(&self) -> u64 {
        self.clock.total_ticks()
    }

    /// Number of ticks owed for `elapsed` host ticks at the current speed.
    /// Fractions carry over to the next call; a paused clock owes nothing.
    pub fn advance(&mut self, elapsed: f64) -> Result<u64> {
        ensure!(elapsed.is_finite(), "経過時間が不正です");
        ensure!(elapsed >= 0.0, "経過時間は 0 以上で指定してください");
        if self.paused {
            return Ok(0);
        }

        self.pending += elapsed * self.time_multiplier;
        let whole = self.pending.floor();
        self.pending -= whole;
        Ok(whole as u64)
    }

    /// Records `ticks` completed ticks on the clock and calendar.
    pub fn commit_ticks(&mut self, ticks: u64) {
        let advanced = self.clock.advance_ticks(ticks);
        self.calendar.advance_months(advanced);
    }
}
