use rand::Rng;
use rand::rngs::StdRng;
use tracing::info;

use crate::game::country::{Country, CountryId, Trait};
use crate::game::diplomacy::{DiplomacySystem, DiplomaticAction, pair_mut};
use crate::game::{MIN_MILITARY_SPENDING, clamp_metric};

const AI_ACTION_PROBABILITY: f64 = 0.02;
const WAR_END_PROBABILITY: f64 = 0.01;

/// Picks the action a computer-controlled country attempts toward a partner,
/// or `None` when it does nothing this tick.
fn choose_ai_action(
    system: &DiplomacySystem,
    actor: &Country,
    target: CountryId,
    rng: &mut StdRng,
) -> Option<DiplomaticAction> {
    let relation = system.relation(actor.id(), target)?;
    let value = relation.relation_value();

    if value < -70.0 && !relation.at_war {
        (actor.has_trait(Trait::Militaristic) && rng.gen_bool(0.3))
            .then_some(DiplomaticAction::WarDeclaration)
    } else if value > 60.0 && !relation.alliance {
        (actor.has_trait(Trait::Peaceful) && rng.gen_bool(0.4))
            .then_some(DiplomaticAction::Alliance)
    } else if value > 20.0 && !relation.trade_deal {
        rng.gen_bool(0.5).then_some(DiplomaticAction::TradeDeal)
    } else if value < 0.0 {
        rng.gen_bool(0.3).then_some(DiplomaticAction::ImproveRelations)
    } else {
        None
    }
}

pub(crate) fn update_ai_diplomacy(
    system: &mut DiplomacySystem,
    countries: &mut [Country],
    rng: &mut StdRng,
) -> Vec<String> {
    let mut reports = Vec::new();
    let len = countries.len();
    for idx in 0..len {
        if countries[idx].is_player() {
            continue;
        }
        for other in 0..len {
            if idx == other || !rng.gen_bool(AI_ACTION_PROBABILITY) {
                continue;
            }
            let actor = countries[idx].id();
            let target = countries[other].id();
            let Some(action) = choose_ai_action(system, &countries[idx], target, rng) else {
                continue;
            };
            if let Ok(outcome) =
                system.perform_diplomatic_action(countries, actor, target, action, false, rng)
            {
                if outcome.success {
                    reports.push(outcome.message);
                }
            }
        }
    }
    reports
}

/// Applies war attrition and occasionally settles a war.
pub(crate) fn resolve_wars(
    system: &mut DiplomacySystem,
    countries: &mut [Country],
    rng: &mut StdRng,
) -> Vec<String> {
    let wars: Vec<(CountryId, CountryId)> = system
        .relations()
        .iter()
        .filter(|relation| relation.at_war)
        .map(|relation| relation.pair())
        .collect();

    let mut reports = Vec::new();
    for (first_id, second_id) in wars {
        let Ok((first, second)) = pair_mut(countries, first_id, second_id) else {
            continue;
        };
        for side in [&mut *first, &mut *second] {
            side.economy.gdp *= 0.999;
            side.population.happiness = clamp_metric(side.population.happiness - 0.1);
            side.government.adjust_stability(-0.1);
        }

        if !rng.gen_bool(WAR_END_PROBABILITY) {
            continue;
        }

        let (winner, loser) = if first.war_strength() > second.war_strength() {
            (first, second)
        } else {
            (second, first)
        };
        winner.economy.gdp *= 1.05;
        loser.economy.gdp *= 0.95;
        for side in [&mut *winner, &mut *loser] {
            side.economy.adjust_military_spending(-0.03, MIN_MILITARY_SPENDING);
        }
        info!(winner = %winner.name, loser = %loser.name, "戦争終結");
        reports.push(format!(
            "{} が {} との戦争に勝利しました。",
            winner.name, loser.name
        ));

        if let Some(relation) = system.relation_mut(first_id, second_id) {
            relation.at_war = false;
        }
    }
    reports
}
