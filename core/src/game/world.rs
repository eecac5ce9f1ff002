use rand::rngs::StdRng;

use super::country::{Country, CountryId};
use super::diplomacy::DiplomacySystem;
use super::snapshot::WorldStats;
use super::systems::diplomacy;

/// Country roster plus the relation graph between its members.
#[derive(Debug, Clone)]
pub struct World {
    countries: Vec<Country>,
    diplomacy: DiplomacySystem,
    player: CountryId,
    selected: CountryId,
    ai_enabled: bool,
}

impl World {
    pub(crate) fn new(
        countries: Vec<Country>,
        diplomacy: DiplomacySystem,
        player: CountryId,
        ai_enabled: bool,
    ) -> Self {
        Self {
            countries,
            diplomacy,
            player,
            selected: player,
            ai_enabled,
        }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn country(&self, id: CountryId) -> Option<&Country> {
        self.countries.get(id.index())
    }

    pub(crate) fn country_mut(&mut self, id: CountryId) -> Option<&mut Country> {
        self.countries.get_mut(id.index())
    }

    pub fn diplomacy(&self) -> &DiplomacySystem {
        &self.diplomacy
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [Country], &mut DiplomacySystem) {
        (&mut self.countries, &mut self.diplomacy)
    }

    pub fn player(&self) -> CountryId {
        self.player
    }

    pub fn selected(&self) -> CountryId {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, id: CountryId) {
        self.selected = id;
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    /// Advances every country by one tick, then runs diplomacy.
    ///
    /// The relation graph is only touched after all countries have updated.
    pub fn update(&mut self, rng: &mut StdRng) -> Vec<String> {
        let mut reports = Vec::new();
        for country in &mut self.countries {
            reports.extend(country.update(rng));
            if self.ai_enabled {
                reports.extend(country.ai_make_decisions(rng));
            }
        }
        if self.ai_enabled {
            reports.extend(diplomacy::update_ai_diplomacy(
                &mut self.diplomacy,
                &mut self.countries,
                rng,
            ));
        }
        reports.extend(diplomacy::resolve_wars(
            &mut self.diplomacy,
            &mut self.countries,
            rng,
        ));
        reports
    }

    pub fn world_stats(&self) -> WorldStats {
        let total_population = self
            .countries
            .iter()
            .map(|country| country.population.total)
            .sum();
        let total_gdp = self.countries.iter().map(|country| country.economy.gdp).sum();
        let count = self.countries.len().max(1) as f64;
        let average_stability = self
            .countries
            .iter()
            .map(|country| country.government.stability)
            .sum::<f64>()
            / count;
        let average_happiness = self
            .countries
            .iter()
            .map(|country| country.population.happiness)
            .sum::<f64>()
            / count;
        let strongest = self
            .countries
            .iter()
            .max_by(|a, b| a.get_power_score().total_cmp(&b.get_power_score()))
            .map(|country| country.name.clone());

        WorldStats {
            total_countries: self.countries.len(),
            total_population,
            total_gdp,
            average_stability,
            average_happiness,
            active_wars: self.diplomacy.active_wars(),
            active_alliances: self.diplomacy.active_alliances(),
            strongest_country: strongest,
        }
    }
}
