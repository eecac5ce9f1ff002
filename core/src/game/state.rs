use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use super::{
    bootstrap::WorldBuilder,
    country::{Country, CountryId},
    diplomacy::{ActionOutcome, DiplomaticAction},
    economy::{BudgetShares, SpendingShares},
    government::GovernmentType,
    snapshot::{
        CountryEvents, CountrySnapshot, DiplomaticSummary, RecentEvents, RelationSummary,
        TimeStatus, WorldStats,
    },
    time::SimulationClock,
    world::World,
};
use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::CalendarDate;

/// Command and query surface over one running scenario.
///
/// Commands act on behalf of the player country. Queries never mutate.
pub struct GameState {
    world: World,
    simulation_clock: SimulationClock,
    rng: StdRng,
}

impl GameState {
    pub fn from_config(config: SimulationConfig) -> Result<Self> {
        let builder = WorldBuilder::new(config);
        let rng = builder.make_rng();
        Self::from_builder(builder, rng)
    }

    pub fn from_config_with_seed(config: SimulationConfig, seed: u64) -> Result<Self> {
        Self::from_builder(WorldBuilder::new(config), StdRng::seed_from_u64(seed))
    }

    fn from_builder(builder: WorldBuilder, mut rng: StdRng) -> Result<Self> {
        let world = builder.build(&mut rng)?;
        Ok(Self {
            world,
            simulation_clock: SimulationClock::new(),
            rng,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn countries(&self) -> &[Country] {
        self.world.countries()
    }

    pub fn player(&self) -> CountryId {
        self.world.player()
    }

    pub fn selected(&self) -> CountryId {
        self.world.selected()
    }

    pub fn calendar_date(&self) -> CalendarDate {
        self.simulation_clock.calendar_date()
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Accepts a 1-based index or a case-insensitive name.
    pub fn find_country(&self, name_or_index: &str) -> Option<CountryId> {
        let countries = self.world.countries();
        if let Ok(id) = name_or_index.trim().parse::<usize>() {
            if id > 0 && id <= countries.len() {
                return Some(CountryId(id - 1));
            }
        }

        let name_lower = name_or_index.trim().to_ascii_lowercase();
        countries
            .iter()
            .position(|country| country.name.to_ascii_lowercase() == name_lower)
            .map(CountryId)
    }

    fn ensure_known(&self, id: CountryId) -> SimResult<()> {
        if self.world.country(id).is_some() {
            Ok(())
        } else {
            Err(SimError::UnknownCountry(id.index()))
        }
    }

    fn player_country_mut(&mut self) -> SimResult<&mut Country> {
        let player = self.world.player();
        self.world
            .country_mut(player)
            .ok_or_else(|| SimError::InvariantViolation("プレイヤー国が存在しません".to_string()))
    }

    /// Sets the player's tax rate and returns the clamped value applied.
    pub fn set_tax_rate(&mut self, rate: f64) -> SimResult<f64> {
        if !rate.is_finite() {
            return Err(SimError::InvalidInput(format!("税率が不正です: {rate}")));
        }
        let country = self.player_country_mut()?;
        country.economy.set_tax_rate(rate);
        debug!(country = %country.name, rate = country.economy.tax_rate(), "税率を変更しました");
        Ok(country.economy.tax_rate())
    }

    pub fn allocate_budget(&mut self, shares: BudgetShares) -> SimResult<SpendingShares> {
        if let Some(bad) = shares.values().into_iter().flatten().find(|v| !v.is_finite()) {
            return Err(SimError::InvalidInput(format!("予算配分が不正です: {bad}")));
        }
        let country = self.player_country_mut()?;
        country.economy.allocate_budget(shares);
        Ok(country.economy.spending())
    }

    pub fn select_country(&mut self, id: CountryId) -> SimResult<()> {
        self.ensure_known(id)?;
        self.world.set_selected(id);
        Ok(())
    }

    pub fn perform_diplomatic_action(
        &mut self,
        target: CountryId,
        action: DiplomaticAction,
    ) -> SimResult<ActionOutcome> {
        self.ensure_known(target)?;
        let player = self.world.player();
        let (countries, diplomacy) = self.world.parts_mut();
        diplomacy.perform_diplomatic_action(countries, player, target, action, true, &mut self.rng)
    }

    pub fn change_government_type(&mut self, kind: GovernmentType) -> SimResult<()> {
        let player = self.world.player();
        let country = self
            .world
            .country_mut(player)
            .ok_or(SimError::UnknownCountry(player.index()))?;
        country.government.change_government_type(kind, &mut self.rng);
        Ok(())
    }

    pub fn pass_law(&mut self, name: &str, value: bool) -> SimResult<()> {
        let player = self.world.player();
        let country = self
            .world
            .country_mut(player)
            .ok_or(SimError::UnknownCountry(player.index()))?;
        country.government.pass_law(name, value, &mut self.rng)
    }

    /// Runs `ticks` whole ticks immediately, even while paused.
    pub fn advance_time(&mut self, ticks: u64) -> Vec<String> {
        let mut reports = Vec::new();
        for _ in 0..ticks {
            reports.extend(self.world.update(&mut self.rng));
            self.simulation_clock.commit_ticks(1);
        }
        reports
    }

    /// Converts host time into ticks at the current speed and runs them.
    pub fn advance(&mut self, elapsed: f64) -> Result<Vec<String>> {
        let ticks = self.simulation_clock.advance(elapsed)?;
        Ok(self.advance_time(ticks))
    }

    pub fn set_pause(&mut self, paused: bool) {
        self.simulation_clock.set_paused(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.simulation_clock.is_paused()
    }

    pub fn set_speed(&mut self, multiplier: f64) -> Result<f64> {
        self.simulation_clock.set_time_multiplier(multiplier)?;
        Ok(self.simulation_clock.time_multiplier())
    }

    pub fn time_status(&self) -> TimeStatus {
        TimeStatus {
            total_ticks: self.simulation_clock.total_ticks(),
            calendar: self.simulation_clock.calendar_date(),
            paused: self.simulation_clock.is_paused(),
            time_multiplier: self.simulation_clock.time_multiplier(),
        }
    }

    pub fn country_snapshot(&self, id: CountryId) -> SimResult<CountrySnapshot> {
        self.world
            .country(id)
            .map(CountrySnapshot::capture)
            .ok_or(SimError::UnknownCountry(id.index()))
    }

    pub fn selected_snapshot(&self) -> SimResult<CountrySnapshot> {
        self.country_snapshot(self.world.selected())
    }

    pub fn world_stats(&self) -> WorldStats {
        self.world.world_stats()
    }

    pub fn diplomatic_summary(&self, id: CountryId) -> SimResult<DiplomaticSummary> {
        self.ensure_known(id)?;
        Ok(DiplomaticSummary::capture(
            self.world.diplomacy(),
            self.world.countries(),
            id,
        ))
    }

    pub fn relation_summary(&self, a: CountryId, b: CountryId) -> SimResult<RelationSummary> {
        self.ensure_known(a)?;
        self.ensure_known(b)?;
        let relation = self.world.diplomacy().relation(a, b).ok_or_else(|| {
            SimError::InvalidInput("同じ国同士の関係は参照できません".to_string())
        })?;
        let partner_name = self
            .world
            .country(b)
            .map(|country| country.name.as_str())
            .unwrap_or_default();
        Ok(RelationSummary::from_relation(relation, b, partner_name))
    }

    pub fn recent_events(&self) -> RecentEvents {
        RecentEvents {
            diplomatic: self.world.diplomacy().recent_actions().cloned().collect(),
            countries: self
                .world
                .countries()
                .iter()
                .map(|country| CountryEvents {
                    country: country.name.clone(),
                    events: country.recent_events().cloned().collect(),
                })
                .collect(),
        }
    }
}
