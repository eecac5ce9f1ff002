use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::game::country::{Country, CountryEventKind, NaturalResource};
use crate::game::economy::EconomicEvent;
use crate::game::government::PoliticalEvent;
use crate::game::population::PopulationEvent;
use crate::game::{BASE_EVENT_PROBABILITY, EVENT_COOLDOWN_TICKS};

const PROTEST_RISK_THRESHOLD: f64 = 0.5;

pub(crate) fn event_probability(stability: f64) -> f64 {
    let stability_factor = 1.0 + (50.0 - stability) / 100.0;
    (BASE_EVENT_PROBABILITY * stability_factor).clamp(0.0, 1.0)
}

pub(crate) fn check_random_events(country: &mut Country, rng: &mut StdRng) -> Option<String> {
    let probability = event_probability(country.government.stability);
    if !rng.gen_bool(probability) {
        return None;
    }
    trigger_random_event(country, rng)
}

pub(crate) fn trigger_random_event(country: &mut Country, rng: &mut StdRng) -> Option<String> {
    let available: Vec<CountryEventKind> = CountryEventKind::ALL
        .into_iter()
        .filter(|kind| !country.event_cooldowns().contains_key(kind))
        .collect();
    let kind = *available.choose(rng)?;

    let report = apply_event(country, kind, rng);
    country.start_cooldown(kind, EVENT_COOLDOWN_TICKS);
    if let Some(description) = &report {
        debug!(country = %country.name, ?kind, "ランダムイベント発生");
        country.record_event(kind, description.clone());
    }
    report
}

pub(crate) fn apply_event(
    country: &mut Country,
    kind: CountryEventKind,
    rng: &mut StdRng,
) -> Option<String> {
    match kind {
        CountryEventKind::EconomicBoom => {
            country.economy.trigger_economic_event(EconomicEvent::Boom);
            Some(format!("{} は好景気に沸いています。", country.name))
        }
        CountryEventKind::Recession => {
            country.economy.trigger_economic_event(EconomicEvent::Recession);
            Some(format!("{} は景気後退に陥りました。", country.name))
        }
        CountryEventKind::NaturalDisaster => {
            country.economy.gdp *= rng.gen_range(0.95..=0.98);
            country.population.handle_event(PopulationEvent::Epidemic, rng);
            Some(format!("{} を自然災害が襲いました。", country.name))
        }
        CountryEventKind::Epidemic => {
            country.population.handle_event(PopulationEvent::Epidemic, rng);
            Some(format!("{} で感染症が流行しています。", country.name))
        }
        CountryEventKind::CorruptionScandal => {
            country
                .government
                .trigger_political_event(PoliticalEvent::CorruptionScandal, rng);
            Some(format!("{} で汚職スキャンダルが発覚しました。", country.name))
        }
        CountryEventKind::Protest => {
            if country.population.trigger_protest_risk() > PROTEST_RISK_THRESHOLD {
                country
                    .government
                    .trigger_political_event(PoliticalEvent::Protest, rng);
                Some(format!("{} で抗議デモが発生しました。", country.name))
            } else {
                None
            }
        }
        CountryEventKind::TechBreakthrough => {
            country
                .economy
                .trigger_economic_event(EconomicEvent::TechBreakthrough);
            Some(format!("{} で技術革新が起こりました。", country.name))
        }
        CountryEventKind::ResourceDiscovery => {
            let (resource, label) = if rng.gen_bool(0.5) {
                (NaturalResource::Oil, "油田")
            } else {
                (NaturalResource::Minerals, "鉱床")
            };
            country.add_natural_resource(resource, rng.gen_range(0.1..=0.3));
            country.economy.gdp *= 1.02;
            Some(format!("{} で新たな{}が発見されました。", country.name, label))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::game::country::{CountryId, Position, Trait};
    use crate::game::government::{GovernmentModel, GovernmentType};
    use crate::game::{MAX_RECENT_EVENTS, MAX_METRIC};

    fn sample_country(rng: &mut StdRng) -> Country {
        let government = GovernmentModel::new(GovernmentType::Republic, rng);
        Country::new(
            CountryId(0),
            "Borealis",
            Position::new(0.0, 0.0),
            vec![Trait::Peaceful],
            1_500_000.0,
            60_000_000.0,
            government,
        )
    }

    #[test]
    fn unstable_countries_see_more_events() {
        assert!(event_probability(10.0) > event_probability(90.0));
        assert!((event_probability(50.0) - BASE_EVENT_PROBABILITY).abs() < 1e-15);
    }

    #[test]
    fn triggered_event_sets_cooldown() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut country = sample_country(&mut rng);
        country.population.happiness = 0.0;
        country.population.satisfaction.security = 0.0;
        trigger_random_event(&mut country, &mut rng);
        assert_eq!(country.event_cooldowns().len(), 1);
        let (_, remaining) = country.event_cooldowns().iter().next().unwrap();
        assert_eq!(*remaining, EVENT_COOLDOWN_TICKS);
        assert_eq!(country.recent_events().count(), 1);
    }

    #[test]
    fn all_kinds_on_cooldown_means_no_event() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut country = sample_country(&mut rng);
        for kind in CountryEventKind::ALL {
            country.start_cooldown(kind, 5);
        }
        assert!(trigger_random_event(&mut country, &mut rng).is_none());
        assert_eq!(country.recent_events().count(), 0);
    }

    #[test]
    fn calm_population_suppresses_protest() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut country = sample_country(&mut rng);
        country.population.happiness = MAX_METRIC;
        country.population.satisfaction.security = MAX_METRIC;
        let before = country.government.stability;
        assert!(apply_event(&mut country, CountryEventKind::Protest, &mut rng).is_none());
        assert_eq!(country.government.stability, before);
    }

    #[test]
    fn event_log_never_exceeds_cap_over_many_ticks() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut country = sample_country(&mut rng);
        country.population.happiness = 0.0;
        country.population.satisfaction.security = 0.0;
        for _ in 0..40 {
            for kind in CountryEventKind::ALL {
                if let Some(description) = apply_event(&mut country, kind, &mut rng) {
                    country.record_event(kind, description);
                }
            }
            assert!(country.recent_events().count() <= MAX_RECENT_EVENTS);
        }
    }

    #[test]
    fn resource_discovery_boosts_gdp() {
        let mut rng = StdRng::seed_from_u64(16);
        let mut country = sample_country(&mut rng);
        let before = country.economy.gdp;
        let report = apply_event(&mut country, CountryEventKind::ResourceDiscovery, &mut rng);
        assert!(report.is_some());
        assert!((country.economy.gdp - before * 1.02).abs() < 1e-6);
    }
}
