use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::economy::EconomyModel;
use super::government::{GovernmentModel, GovernmentType};
use super::population::PopulationModel;
use super::systems::{events, policy};
use super::{MAX_RECENT_EVENTS, clamp_unit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CountryId(pub usize);

impl CountryId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    Agricultural,
    Industrial,
    Technological,
    Militaristic,
    Peaceful,
    Corrupt,
    Efficient,
    ResourceRich,
    Educated,
}

impl Trait {
    pub const ALL: [Trait; 9] = [
        Trait::Agricultural,
        Trait::Industrial,
        Trait::Technological,
        Trait::Militaristic,
        Trait::Peaceful,
        Trait::Corrupt,
        Trait::Efficient,
        Trait::ResourceRich,
        Trait::Educated,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaturalResource {
    Oil,
    Minerals,
    Agriculture,
    Technology,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountryEventKind {
    EconomicBoom,
    Recession,
    NaturalDisaster,
    Epidemic,
    CorruptionScandal,
    Protest,
    TechBreakthrough,
    ResourceDiscovery,
}

impl CountryEventKind {
    pub const ALL: [CountryEventKind; 8] = [
        CountryEventKind::EconomicBoom,
        CountryEventKind::Recession,
        CountryEventKind::NaturalDisaster,
        CountryEventKind::Epidemic,
        CountryEventKind::CorruptionScandal,
        CountryEventKind::Protest,
        CountryEventKind::TechBreakthrough,
        CountryEventKind::ResourceDiscovery,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryEventRecord {
    pub kind: CountryEventKind,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone)]
pub struct Country {
    id: CountryId,
    pub name: String,
    pub position: Position,
    pub color: [u8; 3],
    traits: Vec<Trait>,
    pub military_strength: f64,
    natural_resources: BTreeMap<NaturalResource, f64>,
    recent_events: VecDeque<CountryEventRecord>,
    event_cooldowns: BTreeMap<CountryEventKind, u32>,
    is_player: bool,
    pub economy: EconomyModel,
    pub population: PopulationModel,
    pub government: GovernmentModel,
}

impl Country {
    pub fn new(
        id: CountryId,
        name: impl Into<String>,
        position: Position,
        traits: Vec<Trait>,
        population: f64,
        gdp: f64,
        government: GovernmentModel,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            color: [180, 180, 180],
            traits,
            military_strength: 1.0,
            natural_resources: BTreeMap::from([
                (NaturalResource::Oil, 0.5),
                (NaturalResource::Minerals, 0.5),
                (NaturalResource::Agriculture, 0.5),
                (NaturalResource::Technology, 0.5),
            ]),
            recent_events: VecDeque::with_capacity(MAX_RECENT_EVENTS),
            event_cooldowns: BTreeMap::new(),
            is_player: false,
            economy: EconomyModel::new(gdp, population),
            population: PopulationModel::new(population),
            government,
        }
    }

    /// Randomised country as produced by world generation.
    pub fn generate(
        id: CountryId,
        name: impl Into<String>,
        position: Position,
        government_type: GovernmentType,
        rng: &mut StdRng,
    ) -> Self {
        let color = [
            rng.gen_range(100..=255),
            rng.gen_range(100..=255),
            rng.gen_range(100..=255),
        ];
        let population = rng.gen_range(500_000..=5_000_000) as f64;
        let gdp = population * rng.gen_range(20.0..=80.0);
        let government = GovernmentModel::new(government_type, rng);
        let traits = generate_traits(rng);

        let mut country = Self::new(id, name, position, traits, population, gdp, government);
        country.color = color;
        country.military_strength = rng.gen_range(0.5..=1.5);
        country.natural_resources = BTreeMap::from([
            (NaturalResource::Oil, rng.gen_range(0.0..=1.0)),
            (NaturalResource::Minerals, rng.gen_range(0.0..=1.0)),
            (NaturalResource::Agriculture, rng.gen_range(0.3..=1.0)),
            (NaturalResource::Technology, rng.gen_range(0.2..=0.8)),
        ]);
        country
    }

    pub fn id(&self) -> CountryId {
        self.id
    }

    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    pub fn has_trait(&self, candidate: Trait) -> bool {
        self.traits.contains(&candidate)
    }

    pub fn natural_resources(&self) -> &BTreeMap<NaturalResource, f64> {
        &self.natural_resources
    }

    pub fn add_natural_resource(&mut self, resource: NaturalResource, amount: f64) {
        let slot = self.natural_resources.entry(resource).or_insert(0.0);
        *slot = clamp_unit(*slot + amount);
    }

    pub fn recent_events(&self) -> impl Iterator<Item = &CountryEventRecord> {
        self.recent_events.iter()
    }

    pub fn event_cooldowns(&self) -> &BTreeMap<CountryEventKind, u32> {
        &self.event_cooldowns
    }

    pub fn is_player(&self) -> bool {
        self.is_player
    }

    pub(crate) fn set_player_controlled(&mut self, is_player: bool) {
        self.is_player = is_player;
    }

    /// Runs one tick in the fixed order Economy, Population, Government.
    ///
    /// Economy reads the headcount copied at the end of the previous tick,
    /// so GDP per capita lags the population by one tick.
    pub fn update(&mut self, rng: &mut StdRng) -> Vec<String> {
        let mut reports = Vec::new();

        let mut growth_modifier = self.government.get_growth_modifier();
        let mut stability_bonus = (self.government.stability - 50.0) * 0.001;
        if self.has_trait(Trait::Industrial) {
            growth_modifier *= 1.1;
        }
        if self.has_trait(Trait::Technological) {
            growth_modifier *= 1.05;
        }
        if self.has_trait(Trait::Agricultural) {
            stability_bonus += 0.005;
        }

        self.economy.update_gdp(growth_modifier, stability_bonus, rng);
        self.economy.update_budget();

        let spending = self.economy.spending();
        self.population.update_population(
            spending.healthcare,
            spending.education,
            spending.welfare,
            self.economy.get_economic_health(),
            self.government.stability,
        );

        let approval = self.population.get_approval_rating();
        let economic_health = self.economy.get_economic_health();
        if let Some(outcome) = self
            .government
            .update_government(approval, economic_health, rng)
        {
            let winner = &self.government.parties()[outcome.winner].name;
            if outcome.changed_hands {
                reports.push(format!(
                    "{} で政権交代が起こり、{} が与党になりました。",
                    self.name, winner
                ));
            } else {
                reports.push(format!("{} の選挙で {} が政権を維持しました。", self.name, winner));
            }
        }

        self.economy.population = self.population.total;

        if let Some(report) = events::check_random_events(self, rng) {
            reports.push(report);
        }
        self.clean_old_events();
        reports
    }

    pub fn ai_make_decisions(&mut self, rng: &mut StdRng) -> Option<String> {
        if self.is_player {
            return None;
        }
        policy::make_decisions(self, rng)
    }

    pub fn get_power_score(&self) -> f64 {
        let economic_power = self.economy.gdp / 1_000_000.0;
        let military_power = self.military_strength * (self.population.total / 1_000_000.0);
        let stability_factor = self.government.stability / 100.0;
        (economic_power + military_power) * stability_factor
    }

    /// Strength used when a war is settled.
    pub fn war_strength(&self) -> f64 {
        self.military_strength * (self.government.stability / 100.0)
    }

    pub(crate) fn record_event(&mut self, kind: CountryEventKind, description: String) {
        self.recent_events.push_back(CountryEventRecord { kind, description });
        while self.recent_events.len() > MAX_RECENT_EVENTS {
            self.recent_events.pop_front();
        }
    }

    pub(crate) fn start_cooldown(&mut self, kind: CountryEventKind, ticks: u32) {
        self.event_cooldowns.insert(kind, ticks);
    }

    fn clean_old_events(&mut self) {
        self.event_cooldowns.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
        while self.recent_events.len() > MAX_RECENT_EVENTS {
            self.recent_events.pop_front();
        }
    }
}

fn generate_traits(rng: &mut StdRng) -> Vec<Trait> {
    let count = rng.gen_range(1..=3);
    rand::seq::index::sample(rng, Trait::ALL.len(), count)
        .into_iter()
        .map(|idx| Trait::ALL[idx])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sample_country(rng: &mut StdRng) -> Country {
        let government = GovernmentModel::new(GovernmentType::Democracy, rng);
        Country::new(
            CountryId(0),
            "Asteria",
            Position::new(100.0, 100.0),
            vec![Trait::Industrial],
            2_000_000.0,
            100_000_000.0,
            government,
        )
    }

    #[test]
    fn generated_traits_are_distinct_and_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let traits = generate_traits(&mut rng);
            assert!((1..=3).contains(&traits.len()));
            let mut sorted = traits.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), traits.len());
        }
    }

    #[test]
    fn generated_country_respects_initial_ranges() {
        let mut rng = StdRng::seed_from_u64(2);
        let country = Country::generate(
            CountryId(3),
            "Novaland",
            Position::new(10.0, 20.0),
            GovernmentType::Republic,
            &mut rng,
        );
        assert_eq!(country.id(), CountryId(3));
        assert!((500_000.0..=5_000_000.0).contains(&country.population.total));
        assert!((0.5..=1.5).contains(&country.military_strength));
        let ratio = country.economy.gdp / country.population.total;
        assert!((20.0..=80.0).contains(&ratio));
        for value in country.natural_resources().values() {
            assert!((0.0..=1.0).contains(value));
        }
    }

    #[test]
    fn update_syncs_population_into_economy() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut country = sample_country(&mut rng);
        country.update(&mut rng);
        assert_eq!(country.economy.population, country.population.total);
        assert!(country.government.years_in_power > 0.0);
    }

    #[test]
    fn recent_events_are_capped() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut country = sample_country(&mut rng);
        for idx in 0..25 {
            country.record_event(CountryEventKind::Protest, format!("event {idx}"));
        }
        let events: Vec<_> = country.recent_events().collect();
        assert_eq!(events.len(), MAX_RECENT_EVENTS);
        assert_eq!(events[0].description, "event 15");
    }

    #[test]
    fn cooldowns_expire_after_countdown() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut country = sample_country(&mut rng);
        country.start_cooldown(CountryEventKind::Recession, 2);
        country.clean_old_events();
        assert_eq!(country.event_cooldowns().get(&CountryEventKind::Recession), Some(&1));
        country.clean_old_events();
        assert!(country.event_cooldowns().is_empty());
    }

    #[test]
    fn power_score_scales_with_stability() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut country = sample_country(&mut rng);
        country.government.stability = 50.0;
        country.military_strength = 1.0;
        let expected = (100.0 + 2.0) * 0.5;
        assert!((country.get_power_score() - expected).abs() < 1e-9);
    }

    #[test]
    fn player_country_skips_ai() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut country = sample_country(&mut rng);
        country.set_player_controlled(true);
        country.economy.set_tax_rate(0.3);
        country.population.satisfaction.economic = 0.0;
        country.ai_make_decisions(&mut rng);
        assert!((country.economy.tax_rate() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn natural_resources_stay_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut country = sample_country(&mut rng);
        country.add_natural_resource(NaturalResource::Oil, 0.9);
        assert_eq!(country.natural_resources()[&NaturalResource::Oil], 1.0);
    }
}
