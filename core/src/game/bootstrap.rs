use anyhow::{Context, Result, ensure};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::country::{Country, CountryId, Position};
use super::diplomacy::DiplomacySystem;
use super::government::GovernmentType;
use super::world::World;
use crate::config::SimulationConfig;

const NAME_PREFIXES: [&str; 25] = [
    "Astra", "Bella", "Cypher", "Delta", "Echo", "Ferro", "Gamma", "Hexa", "Ignis", "Jade",
    "Kappa", "Luna", "Magna", "Nova", "Omega", "Prima", "Quantum", "Radiant", "Stellar", "Terra",
    "Ultra", "Vega", "Xenon", "Yara", "Zeta",
];

const NAME_SUFFIXES: [&str; 14] = [
    "land", "ia", "stan", "burg", "shire", "mark", "gard", "haven", "ford", "field", "wald",
    "meer", "dale", "ton",
];

const PLACEMENT_ATTEMPTS: usize = 50;
const MAP_MARGIN: f64 = 50.0;
/// Same order as `GovernmentType::ALL`.
const GOVERNMENT_WEIGHTS: [u32; 4] = [3, 1, 1, 2];

pub struct WorldBuilder {
    config: SimulationConfig,
}

impl WorldBuilder {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// RNG for this scenario: seeded when the configuration names a seed.
    pub fn make_rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn build(&self, rng: &mut StdRng) -> Result<World> {
        self.config.validate()?;
        let count = self.config.country_count;
        ensure!(
            count <= NAME_PREFIXES.len() * NAME_SUFFIXES.len(),
            "国名の候補が不足しています"
        );

        let names = generate_names(count, rng);
        let weights = WeightedIndex::new(GOVERNMENT_WEIGHTS)
            .context("政体の重み付けが不正です")?;

        let mut countries: Vec<Country> = Vec::with_capacity(count);
        for (idx, name) in names.into_iter().enumerate() {
            let position = self.place(&countries, rng);
            let government_type = GovernmentType::ALL[weights.sample(rng)];
            countries.push(Country::generate(
                CountryId(idx),
                name,
                position,
                government_type,
                rng,
            ));
        }

        let player = CountryId(0);
        countries[player.index()].set_player_controlled(true);
        let diplomacy = DiplomacySystem::new(&countries, rng);
        info!(countries = count, player = %countries[player.index()].name, "世界を生成しました");
        Ok(World::new(countries, diplomacy, player, self.config.ai_enabled))
    }

    /// Rejection sampling against already placed countries. After the
    /// attempt budget is spent the last candidate is used unchecked.
    fn place(&self, placed: &[Country], rng: &mut StdRng) -> Position {
        let mut candidate = self.random_position(rng);
        for _ in 0..PLACEMENT_ATTEMPTS {
            let clear = placed.iter().all(|country| {
                country.position.distance_to(&candidate) >= self.config.min_separation
            });
            if clear {
                return candidate;
            }
            candidate = self.random_position(rng);
        }
        candidate
    }

    fn random_position(&self, rng: &mut StdRng) -> Position {
        let x = rng.gen_range(MAP_MARGIN..=self.config.map_width - MAP_MARGIN);
        let y = rng.gen_range(MAP_MARGIN..=self.config.map_height - MAP_MARGIN);
        Position::new(x.round(), y.round())
    }
}

fn generate_names(count: usize, rng: &mut StdRng) -> Vec<String> {
    let total = NAME_PREFIXES.len() * NAME_SUFFIXES.len();
    rand::seq::index::sample(rng, total, count)
        .into_iter()
        .map(|idx| {
            let prefix = NAME_PREFIXES[idx / NAME_SUFFIXES.len()];
            let suffix = NAME_SUFFIXES[idx % NAME_SUFFIXES.len()];
            format!("{prefix}{suffix}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn build(config: SimulationConfig, seed: u64) -> Result<World> {
        let mut rng = StdRng::seed_from_u64(seed);
        WorldBuilder::new(config).build(&mut rng)
    }

    #[test]
    fn default_world_has_player_and_full_graph() {
        let world = build(SimulationConfig::default(), 1).unwrap();
        assert_eq!(world.countries().len(), 8);
        assert!(world.countries()[0].is_player());
        assert!(world.countries()[1..].iter().all(|c| !c.is_player()));
        assert_eq!(world.selected(), world.player());
        assert_eq!(world.diplomacy().relations().len(), 8 * 7 / 2);
    }

    #[test]
    fn names_are_unique() {
        let world = build(SimulationConfig::default().with_seed(2), 2).unwrap();
        let names: BTreeSet<_> = world.countries().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names.len(), world.countries().len());
    }

    #[test]
    fn positions_stay_inside_margins() {
        let config = SimulationConfig {
            country_count: 12,
            ..SimulationConfig::default()
        };
        let world = build(config, 3).unwrap();
        for country in world.countries() {
            assert!((50.0..=750.0).contains(&country.position.x));
            assert!((50.0..=550.0).contains(&country.position.y));
        }
    }

    #[test]
    fn country_count_is_validated() {
        let config = SimulationConfig {
            country_count: 2,
            ..SimulationConfig::default()
        };
        assert!(build(config, 4).is_err());
    }

    #[test]
    fn configured_seed_reproduces_world() {
        let builder = WorldBuilder::new(SimulationConfig::default().with_seed(77));
        let first = builder.build(&mut builder.make_rng()).unwrap();
        let second = builder.build(&mut builder.make_rng()).unwrap();
        let names = |world: &World| -> Vec<String> {
            world.countries().iter().map(|c| c.name.clone()).collect()
        };
        assert_eq!(names(&first), names(&second));
    }
}
