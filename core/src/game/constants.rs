pub(crate) const MONTHS_PER_YEAR: u32 = 12;
pub(crate) const TICK_YEARS: f64 = 1.0 / MONTHS_PER_YEAR as f64;

pub const MIN_COUNTRIES: usize = 4;
pub const MAX_COUNTRIES: usize = 12;
pub const INITIAL_COUNTRIES: usize = 8;

pub const BASE_TAX_RATE: f64 = 0.15;
pub const MIN_TAX_RATE: f64 = 0.05;
pub const MAX_TAX_RATE: f64 = 0.50;
pub(crate) const BASE_GDP_GROWTH: f64 = 0.02;

pub(crate) const BASE_POPULATION_GROWTH: f64 = 0.01;
pub const MAX_POPULATION_GROWTH: f64 = 0.03;
pub(crate) const BASE_HAPPINESS: f64 = 50.0;

pub(crate) const MIN_METRIC: f64 = 0.0;
pub(crate) const MAX_METRIC: f64 = 100.0;
pub(crate) const MIN_RELATION: f64 = -100.0;
pub(crate) const MAX_RELATION: f64 = 100.0;

pub(crate) const MAX_RECENT_EVENTS: usize = 10;
pub(crate) const EVENT_COOLDOWN_TICKS: u32 = 100;
pub(crate) const BASE_EVENT_PROBABILITY: f64 = 0.001;
pub(crate) const MAX_DIPLOMATIC_LOG: usize = 50;

pub(crate) const MIN_MILITARY_SPENDING: f64 = 0.05;

pub(crate) const MIN_TIME_MULTIPLIER: f64 = 0.1;
pub(crate) const MAX_TIME_MULTIPLIER: f64 = 5.0;

pub(crate) fn clamp_metric(value: f64) -> f64 {
    value.clamp(MIN_METRIC, MAX_METRIC)
}

pub(crate) fn clamp_relation(value: f64) -> f64 {
    value.clamp(MIN_RELATION, MAX_RELATION)
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
