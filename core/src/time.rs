use serde::Serialize;

use crate::game::MONTHS_PER_YEAR;

/// Counts whole simulation ticks. One tick is one month of game time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameClock {
    total_ticks: u64,
}

impl GameClock {
    pub fn new() -> Self {
        Self { total_ticks: 0 }
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn elapsed_years(&self) -> f64 {
        self.total_ticks as f64 / MONTHS_PER_YEAR as f64
    }

    pub fn advance_ticks(&mut self, ticks: u64) -> u64 {
        self.total_ticks = self.total_ticks.saturating_add(ticks);
        ticks
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDate {
    pub year: u16,
    pub month: u8,
}

impl CalendarDate {
    pub fn new(year: u16, month: u8) -> Self {
        Self { year, month }
    }

    pub fn from_start() -> Self {
        Self::new(2025, 1)
    }

    pub fn advance_months(&mut self, months: u64) {
        let zero_based = self.month as u64 - 1 + months;
        let years = zero_based / MONTHS_PER_YEAR as u64;
        self.month = (zero_based % MONTHS_PER_YEAR as u64) as u8 + 1;
        self.year = self.year.saturating_add(years.min(u16::MAX as u64) as u16);
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}年{}月", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_rolls_over_year_boundary() {
        let mut date = CalendarDate::new(2025, 11);
        date.advance_months(3);
        assert_eq!(date, CalendarDate::new(2026, 2));
    }

    #[test]
    fn calendar_handles_multi_year_jumps() {
        let mut date = CalendarDate::from_start();
        date.advance_months(25);
        assert_eq!(date, CalendarDate::new(2027, 2));
    }

    #[test]
    fn clock_reports_elapsed_years() {
        let mut clock = GameClock::new();
        clock.advance_ticks(18);
        assert_eq!(clock.total_ticks(), 18);
        assert!((clock.elapsed_years() - 1.5).abs() < f64::EPSILON);
    }
}
