//! Bilateral relation graph and the diplomatic action table.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::country::{Country, CountryId, Trait};
use super::{MAX_DIPLOMATIC_LOG, MIN_MILITARY_SPENDING, clamp_relation};
use crate::error::{SimError, SimResult};

const FRIENDLY_THRESHOLD: f64 = 60.0;
const POOR_THRESHOLD: f64 = -60.0;
const ALLIANCE_BREAK_THRESHOLD: f64 = -80.0;
const TRADE_BREAK_THRESHOLD: f64 = -90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationStatus {
    Hostile,
    Poor,
    Neutral,
    Friendly,
    Allied,
}

impl RelationStatus {
    pub fn label(self) -> &'static str {
        match self {
            RelationStatus::Hostile => "交戦中",
            RelationStatus::Poor => "険悪",
            RelationStatus::Neutral => "中立",
            RelationStatus::Friendly => "友好",
            RelationStatus::Allied => "同盟",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiplomaticAction {
    ImproveRelations,
    WorsenRelations,
    TradeDeal,
    Alliance,
    WarDeclaration,
    PeaceTreaty,
    Sanctions,
    ForeignAid,
}

impl DiplomaticAction {
    pub const ALL: [DiplomaticAction; 8] = [
        DiplomaticAction::ImproveRelations,
        DiplomaticAction::WorsenRelations,
        DiplomaticAction::TradeDeal,
        DiplomaticAction::Alliance,
        DiplomaticAction::WarDeclaration,
        DiplomaticAction::PeaceTreaty,
        DiplomaticAction::Sanctions,
        DiplomaticAction::ForeignAid,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DiplomaticAction::ImproveRelations => "improve_relations",
            DiplomaticAction::WorsenRelations => "worsen_relations",
            DiplomaticAction::TradeDeal => "trade_deal",
            DiplomaticAction::Alliance => "alliance",
            DiplomaticAction::WarDeclaration => "war_declaration",
            DiplomaticAction::PeaceTreaty => "peace_treaty",
            DiplomaticAction::Sanctions => "sanctions",
            DiplomaticAction::ForeignAid => "foreign_aid",
        }
    }
}

impl fmt::Display for DiplomaticAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DiplomaticAction {
    type Err = SimError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        DiplomaticAction::ALL
            .into_iter()
            .find(|action| action.key() == needle)
            .ok_or_else(|| SimError::UnknownDiplomaticAction(value.to_string()))
    }
}

/// Relation between an unordered pair of countries; `first < second`.
#[derive(Debug, Clone, PartialEq)]
pub struct DiplomaticRelation {
    first: CountryId,
    second: CountryId,
    relation_value: f64,
    pub trade_deal: bool,
    pub alliance: bool,
    pub at_war: bool,
    pub sanctions: bool,
}

impl DiplomaticRelation {
    pub fn new(a: CountryId, b: CountryId, relation_value: f64) -> Self {
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Self {
            first,
            second,
            relation_value: clamp_relation(relation_value),
            trade_deal: false,
            alliance: false,
            at_war: false,
            sanctions: false,
        }
    }

    /// Seeds the relation from distance, shared traits and noise.
    pub fn initialise(a: &Country, b: &Country, rng: &mut StdRng) -> Self {
        let distance = a.position.distance_to(&b.position);
        let distance_factor = (-distance / 10.0).max(-10.0);
        let mut trait_factor = 0.0;
        if a.has_trait(Trait::Peaceful) && b.has_trait(Trait::Peaceful) {
            trait_factor += 10.0;
        }
        if a.has_trait(Trait::Militaristic) && b.has_trait(Trait::Militaristic) {
            trait_factor -= 5.0;
        }
        let random_factor = rng.gen_range(-20.0..=20.0);
        Self::new(a.id(), b.id(), distance_factor + trait_factor + random_factor)
    }

    pub fn pair(&self) -> (CountryId, CountryId) {
        (self.first, self.second)
    }

    pub fn involves(&self, id: CountryId) -> bool {
        self.first == id || self.second == id
    }

    pub fn partner_of(&self, id: CountryId) -> Option<CountryId> {
        if self.first == id {
            Some(self.second)
        } else if self.second == id {
            Some(self.first)
        } else {
            None
        }
    }

    pub fn relation_value(&self) -> f64 {
        self.relation_value
    }

    pub fn status(&self) -> RelationStatus {
        if self.at_war {
            RelationStatus::Hostile
        } else if self.alliance {
            RelationStatus::Allied
        } else if self.relation_value >= FRIENDLY_THRESHOLD {
            RelationStatus::Friendly
        } else if self.relation_value <= POOR_THRESHOLD {
            RelationStatus::Poor
        } else {
            RelationStatus::Neutral
        }
    }

    pub fn update_relation(&mut self, change: f64) {
        self.relation_value = clamp_relation(self.relation_value + change);
        if self.relation_value < ALLIANCE_BREAK_THRESHOLD && self.alliance {
            self.alliance = false;
        }
        if self.relation_value < TRADE_BREAK_THRESHOLD && self.trade_deal {
            self.trade_deal = false;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_relation_value(&mut self, value: f64) {
        self.relation_value = clamp_relation(value);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    fn accepted(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }

    fn rejected(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiplomaticLogEntry {
    pub actor: String,
    pub target: String,
    pub action: DiplomaticAction,
    pub message: String,
    pub player_initiated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DiplomacySystem {
    relations: Vec<DiplomaticRelation>,
    country_count: usize,
    recent_actions: VecDeque<DiplomaticLogEntry>,
}

impl DiplomacySystem {
    /// Builds the complete relation graph over `countries`.
    pub fn new(countries: &[Country], rng: &mut StdRng) -> Self {
        let count = countries.len();
        let mut relations = Vec::with_capacity(count * count.saturating_sub(1) / 2);
        for (idx, first) in countries.iter().enumerate() {
            for second in &countries[idx + 1..] {
                relations.push(DiplomaticRelation::initialise(first, second, rng));
            }
        }
        Self {
            relations,
            country_count: count,
            recent_actions: VecDeque::with_capacity(MAX_DIPLOMATIC_LOG),
        }
    }

    pub fn country_count(&self) -> usize {
        self.country_count
    }

    pub fn relations(&self) -> &[DiplomaticRelation] {
        &self.relations
    }

    pub fn recent_actions(&self) -> impl Iterator<Item = &DiplomaticLogEntry> {
        self.recent_actions.iter()
    }

    fn pair_index(&self, a: CountryId, b: CountryId) -> Option<usize> {
        let (i, j) = if a < b { (a.0, b.0) } else { (b.0, a.0) };
        if i == j || j >= self.country_count {
            return None;
        }
        // Row-major offset into the upper triangle.
        let n = self.country_count;
        Some(i * (2 * n - i - 1) / 2 + (j - i - 1))
    }

    pub fn relation(&self, a: CountryId, b: CountryId) -> Option<&DiplomaticRelation> {
        self.pair_index(a, b).and_then(|idx| self.relations.get(idx))
    }

    pub fn relation_mut(&mut self, a: CountryId, b: CountryId) -> Option<&mut DiplomaticRelation> {
        self.pair_index(a, b)
            .and_then(move |idx| self.relations.get_mut(idx))
    }

    pub fn relations_of(&self, id: CountryId) -> impl Iterator<Item = &DiplomaticRelation> {
        self.relations.iter().filter(move |relation| relation.involves(id))
    }

    pub fn active_wars(&self) -> usize {
        self.relations.iter().filter(|relation| relation.at_war).count()
    }

    pub fn active_alliances(&self) -> usize {
        self.relations.iter().filter(|relation| relation.alliance).count()
    }

    pub fn is_at_war(&self, id: CountryId) -> bool {
        self.relations_of(id).any(|relation| relation.at_war)
    }

    pub(crate) fn log_action(&mut self, entry: DiplomaticLogEntry) {
        self.recent_actions.push_back(entry);
        while self.recent_actions.len() > MAX_DIPLOMATIC_LOG {
            self.recent_actions.pop_front();
        }
    }

    /// Executes `action` from `actor` toward `target`.
    ///
    /// Unknown ids and self-targeting are errors. A failed precondition is
    /// an `Ok` outcome with `success == false`, and nothing is mutated.
    pub fn perform_diplomatic_action(
        &mut self,
        countries: &mut [Country],
        actor: CountryId,
        target: CountryId,
        action: DiplomaticAction,
        player_initiated: bool,
        rng: &mut StdRng,
    ) -> SimResult<ActionOutcome> {
        if actor == target {
            return Err(SimError::InvalidInput(
                "自国を外交対象に選ぶことはできません".to_string(),
            ));
        }
        let (actor_country, target_country) = pair_mut(countries, actor, target)?;
        let relation = self.relation_mut(actor, target).ok_or_else(|| {
            SimError::InvariantViolation(format!("{actor} と {target} の関係が登録されていません"))
        })?;

        let outcome = apply_action(relation, actor_country, target_country, action, rng);
        if outcome.success {
            debug!(
                actor = %actor_country.name,
                target = %target_country.name,
                %action,
                "外交行動成功"
            );
            let entry = DiplomaticLogEntry {
                actor: actor_country.name.clone(),
                target: target_country.name.clone(),
                action,
                message: outcome.message.clone(),
                player_initiated,
            };
            self.log_action(entry);
        }
        Ok(outcome)
    }
}

fn apply_action(
    relation: &mut DiplomaticRelation,
    actor: &mut Country,
    target: &mut Country,
    action: DiplomaticAction,
    rng: &mut StdRng,
) -> ActionOutcome {
    match action {
        DiplomaticAction::ImproveRelations => {
            relation.update_relation(rng.gen_range(5.0..=15.0));
            ActionOutcome::accepted(format!(
                "{} は {} との関係改善に努めました",
                actor.name, target.name
            ))
        }
        DiplomaticAction::WorsenRelations => {
            relation.update_relation(-rng.gen_range(5.0..=15.0));
            ActionOutcome::accepted(format!(
                "{} は {} への態度を硬化させました",
                actor.name, target.name
            ))
        }
        DiplomaticAction::TradeDeal => {
            if relation.relation_value <= 20.0 || relation.at_war {
                return ActionOutcome::rejected("関係値が不十分なため貿易協定は拒否されました");
            }
            relation.trade_deal = true;
            let benefit = actor.economy.gdp.min(target.economy.gdp) * 0.02;
            actor.economy.gdp += benefit;
            target.economy.gdp += benefit;
            ActionOutcome::accepted(format!(
                "{} は {} と貿易協定を締結しました",
                actor.name, target.name
            ))
        }
        DiplomaticAction::Alliance => {
            if relation.relation_value <= 50.0 || relation.at_war {
                return ActionOutcome::rejected("関係値が不十分なため同盟は拒否されました");
            }
            relation.alliance = true;
            relation.update_relation(10.0);
            ActionOutcome::accepted(format!("{} は {} と同盟を結びました", actor.name, target.name))
        }
        DiplomaticAction::WarDeclaration => {
            if relation.alliance {
                return ActionOutcome::rejected("同盟国に宣戦布告することはできません");
            }
            relation.at_war = true;
            relation.alliance = false;
            relation.trade_deal = false;
            relation.update_relation(-30.0);
            actor.economy.adjust_military_spending(0.05, 0.0);
            target.economy.adjust_military_spending(0.05, 0.0);
            ActionOutcome::accepted(format!(
                "{} が {} に宣戦布告しました!",
                actor.name, target.name
            ))
        }
        DiplomaticAction::PeaceTreaty => {
            if !relation.at_war {
                return ActionOutcome::rejected("終結させる戦争がありません");
            }
            relation.at_war = false;
            relation.update_relation(20.0);
            actor
                .economy
                .adjust_military_spending(-0.05, MIN_MILITARY_SPENDING);
            target
                .economy
                .adjust_military_spending(-0.05, MIN_MILITARY_SPENDING);
            ActionOutcome::accepted(format!(
                "{} は {} と講和条約を結びました",
                actor.name, target.name
            ))
        }
        DiplomaticAction::Sanctions => {
            if relation.alliance || relation.relation_value >= 0.0 {
                return ActionOutcome::rejected("制裁を科すことはできません");
            }
            relation.sanctions = true;
            relation.trade_deal = false;
            relation.update_relation(-10.0);
            target.economy.gdp *= 0.98;
            target.population.adjust_happiness(-5.0);
            ActionOutcome::accepted(format!(
                "{} は {} に経済制裁を科しました",
                actor.name, target.name
            ))
        }
        DiplomaticAction::ForeignAid => {
            if actor.economy.gdp <= target.economy.gdp * 2.0 {
                return ActionOutcome::rejected("対外援助に必要な経済力が不足しています");
            }
            let aid = actor.economy.gdp * 0.01;
            actor.economy.gdp -= aid;
            target.economy.gdp += aid;
            relation.update_relation(15.0);
            ActionOutcome::accepted(format!(
                "{} は {} に対外援助を行いました",
                actor.name, target.name
            ))
        }
    }
}

/// Mutable access to two distinct countries of the roster.
pub(crate) fn pair_mut(
    countries: &mut [Country],
    a: CountryId,
    b: CountryId,
) -> SimResult<(&mut Country, &mut Country)> {
    let len = countries.len();
    if a.0 >= len {
        return Err(SimError::UnknownCountry(a.0));
    }
    if b.0 >= len {
        return Err(SimError::UnknownCountry(b.0));
    }
    if a == b {
        return Err(SimError::InvalidInput(
            "同じ国同士の相互関係は調整できません".to_string(),
        ));
    }
    if a.0 < b.0 {
        let (left, right) = countries.split_at_mut(b.0);
        Ok((&mut left[a.0], &mut right[0]))
    } else {
        let (left, right) = countries.split_at_mut(a.0);
        Ok((&mut right[0], &mut left[b.0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::game::government::{GovernmentModel, GovernmentType};
    use crate::game::country::Position;

    fn country(idx: usize, gdp: f64, rng: &mut StdRng) -> Country {
        let government = GovernmentModel::new(GovernmentType::Democracy, rng);
        Country::new(
            CountryId(idx),
            format!("Nation {}", idx + 1),
            Position::new(idx as f64 * 100.0, 0.0),
            vec![Trait::Educated],
            1_000_000.0,
            gdp,
            government,
        )
    }

    fn setup(gdps: &[f64], seed: u64) -> (Vec<Country>, DiplomacySystem, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let countries: Vec<Country> = gdps
            .iter()
            .enumerate()
            .map(|(idx, gdp)| country(idx, *gdp, &mut rng))
            .collect();
        let diplomacy = DiplomacySystem::new(&countries, &mut rng);
        (countries, diplomacy, rng)
    }

    const A: CountryId = CountryId(0);
    const B: CountryId = CountryId(1);

    #[test]
    fn graph_is_complete_and_symmetric() {
        let (_, diplomacy, _) = setup(&[1.0, 2.0, 3.0, 4.0, 5.0], 1);
        assert_eq!(diplomacy.relations().len(), 10);
        for i in 0..5 {
            for j in 0..5 {
                if i == j {
                    assert!(diplomacy.relation(CountryId(i), CountryId(j)).is_none());
                    continue;
                }
                let relation = diplomacy.relation(CountryId(i), CountryId(j)).unwrap();
                let (first, second) = relation.pair();
                assert_eq!((first.0.min(second.0), first.0.max(second.0)), (i.min(j), i.max(j)));
                assert!((-100.0..=100.0).contains(&relation.relation_value()));
            }
        }
    }

    #[test]
    fn status_prefers_war_then_alliance() {
        let mut relation = DiplomaticRelation::new(A, B, 70.0);
        assert_eq!(relation.status(), RelationStatus::Friendly);
        relation.alliance = true;
        assert_eq!(relation.status(), RelationStatus::Allied);
        relation.at_war = true;
        assert_eq!(relation.status(), RelationStatus::Hostile);
        let poor = DiplomaticRelation::new(A, B, -60.0);
        assert_eq!(poor.status(), RelationStatus::Poor);
        assert_eq!(DiplomaticRelation::new(A, B, 59.9).status(), RelationStatus::Neutral);
    }

    #[test]
    fn collapsing_relation_breaks_alliance_then_trade() {
        let mut relation = DiplomaticRelation::new(A, B, -85.0);
        relation.alliance = true;
        relation.trade_deal = true;
        relation.update_relation(0.5);
        assert!(!relation.alliance);
        assert!(relation.trade_deal);
        relation.update_relation(-10.0);
        assert!(!relation.trade_deal);
    }

    #[test]
    fn war_on_ally_is_rejected_without_changes() {
        let (mut countries, mut diplomacy, mut rng) = setup(&[1e6, 1e6], 2);
        diplomacy.relation_mut(A, B).unwrap().alliance = true;
        let before_relation = diplomacy.relation(A, B).unwrap().clone();
        let before_military = countries[0].economy.spending().military;
        let outcome = diplomacy
            .perform_diplomatic_action(
                &mut countries,
                A,
                B,
                DiplomaticAction::WarDeclaration,
                true,
                &mut rng,
            )
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(diplomacy.relation(A, B).unwrap(), &before_relation);
        assert_eq!(countries[0].economy.spending().military, before_military);
        assert_eq!(diplomacy.recent_actions().count(), 0);
    }

    #[test]
    fn war_declaration_clears_treaties() {
        let (mut countries, mut diplomacy, mut rng) = setup(&[1e6, 1e6], 3);
        {
            let relation = diplomacy.relation_mut(A, B).unwrap();
            relation.set_relation_value(10.0);
            relation.trade_deal = true;
        }
        let outcome = diplomacy
            .perform_diplomatic_action(
                &mut countries,
                A,
                B,
                DiplomaticAction::WarDeclaration,
                false,
                &mut rng,
            )
            .unwrap();
        assert!(outcome.success);
        let relation = diplomacy.relation(A, B).unwrap();
        assert!(relation.at_war);
        assert!(!relation.alliance);
        assert!(!relation.trade_deal);
        assert!((relation.relation_value() - (-20.0)).abs() < 1e-9);
        assert!((countries[0].economy.spending().military - 0.15).abs() < 1e-9);
        assert!((countries[1].economy.spending().military - 0.15).abs() < 1e-9);
        assert_eq!(relation.status(), RelationStatus::Hostile);
    }

    #[test]
    fn trade_deal_grants_two_percent_of_smaller_gdp() {
        let (mut countries, mut diplomacy, mut rng) = setup(&[3_000_000.0, 1_000_000.0], 4);
        diplomacy.relation_mut(A, B).unwrap().set_relation_value(25.0);
        let outcome = diplomacy
            .perform_diplomatic_action(
                &mut countries,
                A,
                B,
                DiplomaticAction::TradeDeal,
                true,
                &mut rng,
            )
            .unwrap();
        assert!(outcome.success);
        assert!(diplomacy.relation(A, B).unwrap().trade_deal);
        assert!((countries[0].economy.gdp - 3_020_000.0).abs() < 1e-6);
        assert!((countries[1].economy.gdp - 1_020_000.0).abs() < 1e-6);
        let entry = diplomacy.recent_actions().last().unwrap();
        assert!(entry.player_initiated);
        assert_eq!(entry.action, DiplomaticAction::TradeDeal);
    }

    #[test]
    fn trade_deal_needs_goodwill() {
        let (mut countries, mut diplomacy, mut rng) = setup(&[1e6, 1e6], 5);
        diplomacy.relation_mut(A, B).unwrap().set_relation_value(20.0);
        let outcome = diplomacy
            .perform_diplomatic_action(
                &mut countries,
                A,
                B,
                DiplomaticAction::TradeDeal,
                false,
                &mut rng,
            )
            .unwrap();
        assert!(!outcome.success);
        assert!(!outcome.message.is_empty());
        assert_eq!(countries[0].economy.gdp, 1e6);
    }

    #[test]
    fn foreign_aid_transfers_one_percent() {
        let (mut countries, mut diplomacy, mut rng) = setup(&[1_000_000.0, 400_000.0], 6);
        diplomacy.relation_mut(A, B).unwrap().set_relation_value(0.0);
        let outcome = diplomacy
            .perform_diplomatic_action(
                &mut countries,
                A,
                B,
                DiplomaticAction::ForeignAid,
                true,
                &mut rng,
            )
            .unwrap();
        assert!(outcome.success);
        assert!((countries[0].economy.gdp - 990_000.0).abs() < 1e-6);
        assert!((countries[1].economy.gdp - 410_000.0).abs() < 1e-6);
        assert!((diplomacy.relation(A, B).unwrap().relation_value() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn foreign_aid_rejected_for_comparable_economies() {
        let (mut countries, mut diplomacy, mut rng) = setup(&[1_000_000.0, 500_000.0], 7);
        let outcome = diplomacy
            .perform_diplomatic_action(
                &mut countries,
                A,
                B,
                DiplomaticAction::ForeignAid,
                true,
                &mut rng,
            )
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(countries[1].economy.gdp, 500_000.0);
    }

    #[test]
    fn peace_requires_war_and_floors_military() {
        let (mut countries, mut diplomacy, mut rng) = setup(&[1e6, 1e6], 8);
        let outcome = diplomacy
            .perform_diplomatic_action(
                &mut countries,
                A,
                B,
                DiplomaticAction::PeaceTreaty,
                false,
                &mut rng,
            )
            .unwrap();
        assert!(!outcome.success);

        diplomacy.relation_mut(A, B).unwrap().at_war = true;
        countries[0]
            .economy
            .allocate_budget(crate::game::economy::BudgetShares::default().military(0.06));
        let outcome = diplomacy
            .perform_diplomatic_action(
                &mut countries,
                B,
                A,
                DiplomaticAction::PeaceTreaty,
                false,
                &mut rng,
            )
            .unwrap();
        assert!(outcome.success);
        assert!(!diplomacy.relation(A, B).unwrap().at_war);
        assert!((countries[0].economy.spending().military - MIN_MILITARY_SPENDING).abs() < 1e-12);
        assert!((countries[1].economy.spending().military - 0.05).abs() < 1e-12);
    }

    #[test]
    fn sanctions_hit_target_only() {
        let (mut countries, mut diplomacy, mut rng) = setup(&[1e6, 1e6], 9);
        {
            let relation = diplomacy.relation_mut(A, B).unwrap();
            relation.set_relation_value(-5.0);
            relation.trade_deal = true;
        }
        let outcome = diplomacy
            .perform_diplomatic_action(
                &mut countries,
                A,
                B,
                DiplomaticAction::Sanctions,
                true,
                &mut rng,
            )
            .unwrap();
        assert!(outcome.success);
        let relation = diplomacy.relation(A, B).unwrap();
        assert!(relation.sanctions);
        assert!(!relation.trade_deal);
        assert!((relation.relation_value() + 15.0).abs() < 1e-9);
        assert_eq!(countries[0].economy.gdp, 1e6);
        assert!((countries[1].economy.gdp - 980_000.0).abs() < 1e-6);
        assert!((countries[1].population.happiness - 45.0).abs() < 1e-9);
    }

    #[test]
    fn alliance_requires_strong_relations() {
        let (mut countries, mut diplomacy, mut rng) = setup(&[1e6, 1e6], 10);
        diplomacy.relation_mut(A, B).unwrap().set_relation_value(55.0);
        let outcome = diplomacy
            .perform_diplomatic_action(
                &mut countries,
                A,
                B,
                DiplomaticAction::Alliance,
                false,
                &mut rng,
            )
            .unwrap();
        assert!(outcome.success);
        let relation = diplomacy.relation(A, B).unwrap();
        assert!(relation.alliance);
        assert!((relation.relation_value() - 65.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_targets_are_errors() {
        let (mut countries, mut diplomacy, mut rng) = setup(&[1e6, 1e6], 11);
        let self_target = diplomacy.perform_diplomatic_action(
            &mut countries,
            A,
            A,
            DiplomaticAction::ImproveRelations,
            true,
            &mut rng,
        );
        assert!(matches!(self_target, Err(SimError::InvalidInput(_))));
        let unknown = diplomacy.perform_diplomatic_action(
            &mut countries,
            A,
            CountryId(9),
            DiplomaticAction::ImproveRelations,
            true,
            &mut rng,
        );
        assert!(matches!(unknown, Err(SimError::UnknownCountry(9))));
    }

    #[test]
    fn action_log_is_bounded() {
        let (mut countries, mut diplomacy, mut rng) = setup(&[1e6, 1e6], 12);
        for _ in 0..(MAX_DIPLOMATIC_LOG + 20) {
            diplomacy
                .perform_diplomatic_action(
                    &mut countries,
                    A,
                    B,
                    DiplomaticAction::ImproveRelations,
                    false,
                    &mut rng,
                )
                .unwrap();
        }
        assert_eq!(diplomacy.recent_actions().count(), MAX_DIPLOMATIC_LOG);
    }

    #[test]
    fn parse_action_keys() {
        assert_eq!("TRADE_DEAL".parse::<DiplomaticAction>().unwrap(), DiplomaticAction::TradeDeal);
        assert!("annex".parse::<DiplomaticAction>().is_err());
    }
}
