//! Read-only views handed to hosts. Everything here derives `Serialize`
//! so a front end can emit it as JSON.

use std::collections::BTreeMap;

use serde::Serialize;

use super::country::{Country, CountryEventRecord, CountryId, NaturalResource, Trait};
use super::diplomacy::{DiplomacySystem, DiplomaticLogEntry, DiplomaticRelation, RelationStatus};
use super::economy::SpendingShares;
use super::government::GovernmentType;
use super::population::Satisfaction;
use crate::time::CalendarDate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomySnapshot {
    pub gdp: f64,
    pub gdp_per_capita: f64,
    pub tax_rate: f64,
    pub government_budget: f64,
    pub debt: f64,
    pub inflation: f64,
    pub unemployment: f64,
    pub trade_balance: f64,
    pub economic_health: f64,
    pub spending: SpendingShares,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationSnapshot {
    pub total: f64,
    pub growth_rate: f64,
    pub happiness: f64,
    pub health: f64,
    pub education: f64,
    pub literacy_rate: f64,
    pub life_expectancy: f64,
    pub approval_rating: f64,
    pub protest_risk: f64,
    pub satisfaction: Satisfaction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GovernmentSnapshot {
    pub kind: GovernmentType,
    pub label: &'static str,
    pub stability: f64,
    pub corruption: f64,
    pub transparency: f64,
    pub ruling_party: String,
    pub years_in_power: f64,
    pub next_election: Option<f64>,
    pub laws: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySnapshot {
    pub id: CountryId,
    pub name: String,
    pub is_player: bool,
    pub color: [u8; 3],
    pub traits: Vec<Trait>,
    pub military_strength: f64,
    pub power_score: f64,
    pub natural_resources: BTreeMap<NaturalResource, f64>,
    pub economy: EconomySnapshot,
    pub population: PopulationSnapshot,
    pub government: GovernmentSnapshot,
    pub recent_events: Vec<CountryEventRecord>,
}

impl CountrySnapshot {
    pub fn capture(country: &Country) -> Self {
        let economy = &country.economy;
        let population = &country.population;
        let government = &country.government;
        Self {
            id: country.id(),
            name: country.name.clone(),
            is_player: country.is_player(),
            color: country.color,
            traits: country.traits().to_vec(),
            military_strength: country.military_strength,
            power_score: country.get_power_score(),
            natural_resources: country.natural_resources().clone(),
            economy: EconomySnapshot {
                gdp: economy.gdp,
                gdp_per_capita: economy.gdp_per_capita(),
                tax_rate: economy.tax_rate(),
                government_budget: economy.government_budget,
                debt: economy.debt,
                inflation: economy.inflation,
                unemployment: economy.unemployment,
                trade_balance: economy.trade_balance,
                economic_health: economy.get_economic_health(),
                spending: economy.spending(),
            },
            population: PopulationSnapshot {
                total: population.total,
                growth_rate: population.growth_rate,
                happiness: population.happiness,
                health: population.health,
                education: population.education,
                literacy_rate: population.literacy_rate,
                life_expectancy: population.life_expectancy,
                approval_rating: population.get_approval_rating(),
                protest_risk: population.trigger_protest_risk(),
                satisfaction: population.satisfaction,
            },
            government: GovernmentSnapshot {
                kind: government.kind(),
                label: government.kind().label(),
                stability: government.stability,
                corruption: government.corruption,
                transparency: government.transparency,
                ruling_party: government.ruling_party().name.clone(),
                years_in_power: government.years_in_power,
                next_election: government
                    .kind()
                    .holds_elections()
                    .then_some(government.next_election),
                laws: government.laws().clone(),
            },
            recent_events: country.recent_events().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldStats {
    pub total_countries: usize,
    pub total_population: f64,
    pub total_gdp: f64,
    pub average_stability: f64,
    pub average_happiness: f64,
    pub active_wars: usize,
    pub active_alliances: usize,
    pub strongest_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationSummary {
    pub partner: CountryId,
    pub partner_name: String,
    pub relation_value: f64,
    pub status: RelationStatus,
    pub trade_deal: bool,
    pub alliance: bool,
    pub at_war: bool,
    pub sanctions: bool,
}

impl RelationSummary {
    pub(crate) fn from_relation(
        relation: &DiplomaticRelation,
        partner: CountryId,
        partner_name: &str,
    ) -> Self {
        Self {
            partner,
            partner_name: partner_name.to_string(),
            relation_value: relation.relation_value(),
            status: relation.status(),
            trade_deal: relation.trade_deal,
            alliance: relation.alliance,
            at_war: relation.at_war,
            sanctions: relation.sanctions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiplomaticSummary {
    pub country: CountryId,
    pub relations: Vec<RelationSummary>,
    pub wars: Vec<String>,
    pub alliances: Vec<String>,
    pub trade_partners: Vec<String>,
}

impl DiplomaticSummary {
    pub(crate) fn capture(system: &DiplomacySystem, countries: &[Country], id: CountryId) -> Self {
        let relations: Vec<RelationSummary> = system
            .relations_of(id)
            .filter_map(|relation| {
                let partner = relation.partner_of(id)?;
                let name = countries.get(partner.index())?.name.as_str();
                Some(RelationSummary::from_relation(relation, partner, name))
            })
            .collect();
        let names_where = |flag: fn(&RelationSummary) -> bool| -> Vec<String> {
            relations
                .iter()
                .filter(|summary| flag(summary))
                .map(|summary| summary.partner_name.clone())
                .collect()
        };
        Self {
            country: id,
            wars: names_where(|summary| summary.at_war),
            alliances: names_where(|summary| summary.alliance),
            trade_partners: names_where(|summary| summary.trade_deal),
            relations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentEvents {
    pub diplomatic: Vec<DiplomaticLogEntry>,
    pub countries: Vec<CountryEvents>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryEvents {
    pub country: String,
    pub events: Vec<CountryEventRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeStatus {
    pub total_ticks: u64,
    pub calendar: CalendarDate,
    pub paused: bool,
    pub time_multiplier: f64,
}
