use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{TICK_YEARS, clamp_metric};
use crate::error::SimError;

const ELECTION_NOISE: f64 = 0.05;
const TRANSITION_PENALTY: f64 = 5.0;
const COUP_SUCCESS_PROBABILITY: f64 = 0.3;
const COUP_STABILITY_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernmentType {
    Democracy,
    Monarchy,
    Dictatorship,
    Republic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GovernmentProfile {
    /// Years between elections; zero means the regime holds none.
    pub election_frequency: u32,
    pub corruption_resistance: f64,
    pub stability_bonus: f64,
    pub growth_modifier: f64,
}

impl GovernmentType {
    pub const ALL: [GovernmentType; 4] = [
        GovernmentType::Democracy,
        GovernmentType::Monarchy,
        GovernmentType::Dictatorship,
        GovernmentType::Republic,
    ];

    pub fn profile(self) -> GovernmentProfile {
        match self {
            GovernmentType::Democracy => GovernmentProfile {
                election_frequency: 4,
                corruption_resistance: 0.8,
                stability_bonus: 0.1,
                growth_modifier: 1.0,
            },
            GovernmentType::Monarchy => GovernmentProfile {
                election_frequency: 0,
                corruption_resistance: 0.5,
                stability_bonus: 0.2,
                growth_modifier: 0.9,
            },
            GovernmentType::Dictatorship => GovernmentProfile {
                election_frequency: 0,
                corruption_resistance: 0.3,
                stability_bonus: -0.1,
                growth_modifier: 1.1,
            },
            GovernmentType::Republic => GovernmentProfile {
                election_frequency: 6,
                corruption_resistance: 0.7,
                stability_bonus: 0.05,
                growth_modifier: 1.05,
            },
        }
    }

    pub fn holds_elections(self) -> bool {
        self.profile().election_frequency > 0
    }

    pub fn key(self) -> &'static str {
        match self {
            GovernmentType::Democracy => "democracy",
            GovernmentType::Monarchy => "monarchy",
            GovernmentType::Dictatorship => "dictatorship",
            GovernmentType::Republic => "republic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GovernmentType::Democracy => "民主制",
            GovernmentType::Monarchy => "君主制",
            GovernmentType::Dictatorship => "独裁制",
            GovernmentType::Republic => "共和制",
        }
    }
}

impl fmt::Display for GovernmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GovernmentType {
    type Err = SimError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        GovernmentType::ALL
            .into_iter()
            .find(|kind| kind.key() == needle)
            .ok_or_else(|| SimError::UnknownGovernmentType(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ideology {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoliticalParty {
    pub name: String,
    pub ideology: Ideology,
    pub popularity: f64,
    pub corruption_level: f64,
    pub tax_preference: f64,
    pub welfare_preference: f64,
    pub military_preference: f64,
}

impl PoliticalParty {
    pub fn new(name: &str, ideology: Ideology, popularity: f64, rng: &mut StdRng) -> Self {
        let (tax, welfare, military) = match ideology {
            Ideology::Left => ((0.25, 0.45), (0.20, 0.35), (0.05, 0.15)),
            Ideology::Right => ((0.10, 0.25), (0.05, 0.15), (0.15, 0.25)),
            Ideology::Center => ((0.15, 0.25), (0.10, 0.20), (0.10, 0.20)),
        };
        Self {
            name: name.to_string(),
            ideology,
            popularity,
            corruption_level: rng.gen_range(0.1..=0.3),
            tax_preference: rng.gen_range(tax.0..=tax.1),
            welfare_preference: rng.gen_range(welfare.0..=welfare.1),
            military_preference: rng.gen_range(military.0..=military.1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoliticalEvent {
    CorruptionScandal,
    SuccessfulReform,
    CoupAttempt,
    Protest,
}

/// Result of a completed election, reported back to the caller for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionOutcome {
    pub winner: usize,
    pub changed_hands: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GovernmentModel {
    kind: GovernmentType,
    pub stability: f64,
    pub corruption: f64,
    pub years_in_power: f64,
    pub next_election: f64,
    parties: Vec<PoliticalParty>,
    ruling_party: usize,
    laws: BTreeMap<String, bool>,
    pub bureaucracy_efficiency: f64,
    pub transparency: f64,
}

impl GovernmentModel {
    pub fn new(kind: GovernmentType, rng: &mut StdRng) -> Self {
        let parties = vec![
            PoliticalParty::new("Progressive Party", Ideology::Left, 0.25, rng),
            PoliticalParty::new("Conservative Party", Ideology::Right, 0.25, rng),
            PoliticalParty::new("Centrist Alliance", Ideology::Center, 0.30, rng),
            PoliticalParty::new("Nationalist Party", Ideology::Right, 0.20, rng),
        ];
        let laws = [
            ("freedom_of_press", true),
            ("universal_healthcare", false),
            ("mandatory_education", true),
            ("death_penalty", false),
            ("gun_control", true),
            ("environmental_protection", true),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        let mut government = Self {
            kind,
            stability: 70.0,
            corruption: 20.0,
            years_in_power: 0.0,
            next_election: kind.profile().election_frequency as f64,
            parties,
            ruling_party: 0,
            laws,
            bureaucracy_efficiency: 60.0,
            transparency: 50.0,
        };
        government.ruling_party = government.most_popular_party();
        government
    }

    pub fn kind(&self) -> GovernmentType {
        self.kind
    }

    pub fn parties(&self) -> &[PoliticalParty] {
        &self.parties
    }

    pub fn ruling_party_index(&self) -> usize {
        self.ruling_party
    }

    pub fn ruling_party(&self) -> &PoliticalParty {
        &self.parties[self.ruling_party]
    }

    pub fn laws(&self) -> &BTreeMap<String, bool> {
        &self.laws
    }

    /// Advances one tick; returns the election result if one was held.
    pub fn update_government(
        &mut self,
        approval: f64,
        economic_health: f64,
        rng: &mut StdRng,
    ) -> Option<ElectionOutcome> {
        let profile = self.kind.profile();
        self.years_in_power += TICK_YEARS;
        if profile.election_frequency > 0 {
            self.next_election -= TICK_YEARS;
        }

        let approval_effect = (approval - 50.0) * 0.2;
        self.stability += approval_effect * 0.1;
        self.stability += profile.stability_bonus;

        let corruption_change =
            rng.gen_range(-0.5..=1.0) * (1.0 - profile.corruption_resistance);
        self.corruption = clamp_metric(self.corruption + corruption_change);

        self.stability -= self.corruption * 0.1;
        self.stability = clamp_metric(self.stability);

        self.update_party_popularity(approval, economic_health);

        if self.next_election <= 0.0 && profile.election_frequency > 0 {
            return self.hold_election(rng);
        }
        None
    }

    fn update_party_popularity(&mut self, approval: f64, economic_health: f64) {
        let ruling_performance = (approval + economic_health) / 2.0;
        let performance_change = (ruling_performance - 50.0) * 0.002;
        let ruling = self.ruling_party;
        let ruling_party = &mut self.parties[ruling];
        ruling_party.popularity = (ruling_party.popularity + performance_change).max(0.0);

        if performance_change < 0.0 {
            let share = performance_change.abs() / self.parties.len() as f64;
            for (idx, party) in self.parties.iter_mut().enumerate() {
                if idx != ruling {
                    party.popularity += share;
                }
            }
        }
        self.normalise_popularity();
    }

    fn normalise_popularity(&mut self) {
        let total: f64 = self.parties.iter().map(|party| party.popularity).sum();
        if total > 0.0 {
            for party in self.parties.iter_mut() {
                party.popularity = (party.popularity / total).max(0.0);
            }
        }
    }

    fn most_popular_party(&self) -> usize {
        self.parties
            .iter()
            .enumerate()
            .fold(0, |best, (idx, party)| {
                if party.popularity > self.parties[best].popularity {
                    idx
                } else {
                    best
                }
            })
    }

    pub fn hold_election(&mut self, rng: &mut StdRng) -> Option<ElectionOutcome> {
        let profile = self.kind.profile();
        if profile.election_frequency == 0 {
            return None;
        }

        for party in self.parties.iter_mut() {
            let noise = rng.gen_range(-ELECTION_NOISE..=ELECTION_NOISE);
            party.popularity = (party.popularity + noise).max(0.0);
        }
        self.normalise_popularity();

        let winner = self.most_popular_party();
        let changed_hands = winner != self.ruling_party;
        if changed_hands {
            self.ruling_party = winner;
            self.years_in_power = 0.0;
            self.stability = clamp_metric(self.stability - TRANSITION_PENALTY);
        }
        self.next_election = profile.election_frequency as f64;
        info!(
            winner = %self.parties[winner].name,
            changed_hands,
            "選挙が実施されました"
        );
        Some(ElectionOutcome {
            winner,
            changed_hands,
        })
    }

    pub fn change_government_type(&mut self, new_type: GovernmentType, rng: &mut StdRng) {
        let old_type = self.kind;
        self.kind = new_type;
        self.years_in_power = 0.0;
        self.next_election = new_type.profile().election_frequency as f64;
        if old_type != new_type {
            self.stability = clamp_metric(self.stability - rng.gen_range(10.0..=30.0));
            info!(from = old_type.key(), to = new_type.key(), "政体が変更されました");
        }
    }

    pub fn pass_law(&mut self, name: &str, value: bool, rng: &mut StdRng) -> Result<(), SimError> {
        let slot = self
            .laws
            .get_mut(name)
            .ok_or_else(|| SimError::UnknownLaw(name.to_string()))?;
        let old_value = *slot;
        *slot = value;
        if old_value != value {
            self.stability = clamp_metric(self.stability + rng.gen_range(-2.0..=2.0));
        }
        Ok(())
    }

    pub fn trigger_political_event(&mut self, event: PoliticalEvent, rng: &mut StdRng) {
        match event {
            PoliticalEvent::CorruptionScandal => {
                self.corruption = clamp_metric(self.corruption + rng.gen_range(5.0..=15.0));
                self.stability = clamp_metric(self.stability - rng.gen_range(5.0..=10.0));
                self.parties[self.ruling_party].popularity *= 0.9;
            }
            PoliticalEvent::SuccessfulReform => {
                self.corruption = clamp_metric(self.corruption - rng.gen_range(2.0..=8.0));
                self.stability = clamp_metric(self.stability + rng.gen_range(3.0..=8.0));
                self.bureaucracy_efficiency =
                    clamp_metric(self.bureaucracy_efficiency + rng.gen_range(2.0..=5.0));
            }
            PoliticalEvent::CoupAttempt => {
                if self.stability < COUP_STABILITY_THRESHOLD {
                    if rng.gen_bool(COUP_SUCCESS_PROBABILITY) {
                        self.change_government_type(GovernmentType::Dictatorship, rng);
                        self.stability = 20.0;
                    } else {
                        self.stability = clamp_metric(self.stability - 15.0);
                    }
                } else {
                    self.stability = clamp_metric(self.stability - 5.0);
                }
            }
            PoliticalEvent::Protest => {
                self.stability = clamp_metric(self.stability - rng.gen_range(2.0..=8.0));
            }
        }
    }

    pub fn get_growth_modifier(&self) -> f64 {
        let base_modifier = self.kind.profile().growth_modifier;
        let efficiency_bonus = (self.bureaucracy_efficiency - 50.0) * 0.002;
        let stability_bonus = (self.stability - 50.0) * 0.001;
        let corruption_penalty = self.corruption * 0.001;
        base_modifier + efficiency_bonus + stability_bonus - corruption_penalty
    }

    /// War attrition and other external shocks.
    pub fn adjust_stability(&mut self, delta: f64) {
        self.stability = clamp_metric(self.stability + delta);
    }

    #[cfg(test)]
    pub(crate) fn parties_mut(&mut self) -> &mut [PoliticalParty] {
        &mut self.parties
    }
}
