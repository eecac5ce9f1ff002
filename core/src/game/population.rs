use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{
    BASE_HAPPINESS, BASE_POPULATION_GROWTH, MAX_POPULATION_GROWTH, clamp_metric, clamp_unit,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationEvent {
    Epidemic,
    BabyBoom,
    BrainDrain,
    ImmigrationWave,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Satisfaction {
    pub healthcare: f64,
    pub education: f64,
    pub economic: f64,
    pub security: f64,
}

impl Satisfaction {
    fn mean(&self) -> f64 {
        (self.healthcare + self.education + self.economic + self.security) / 4.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopulationModel {
    pub total: f64,
    pub happiness: f64,
    pub health: f64,
    pub education: f64,
    pub growth_rate: f64,
    pub children: f64,
    pub adults: f64,
    pub elderly: f64,
    pub literacy_rate: f64,
    pub life_expectancy: f64,
    pub birth_rate: f64,
    pub death_rate: f64,
    pub satisfaction: Satisfaction,
}

impl PopulationModel {
    pub fn new(initial_population: f64) -> Self {
        Self {
            total: initial_population,
            happiness: BASE_HAPPINESS,
            health: 70.0,
            education: 60.0,
            growth_rate: BASE_POPULATION_GROWTH,
            children: 0.25,
            adults: 0.65,
            elderly: 0.10,
            literacy_rate: 0.85,
            life_expectancy: 75.0,
            birth_rate: 0.015,
            death_rate: 0.008,
            satisfaction: Satisfaction {
                healthcare: 50.0,
                education: 50.0,
                economic: 50.0,
                security: 50.0,
            },
        }
    }

    /// `stability` is on the government's 0-100 scale.
    pub fn update_population(
        &mut self,
        healthcare_spending: f64,
        education_spending: f64,
        _welfare_spending: f64,
        economic_health: f64,
        stability: f64,
    ) {
        let healthcare_effect = healthcare_spending * 50.0;
        self.health = clamp_metric(self.health + (healthcare_effect - 70.0) * 0.01);
        self.satisfaction.healthcare = clamp_metric(healthcare_spending * 100.0);

        let education_effect = education_spending * 50.0;
        self.education = clamp_metric(self.education + (education_effect - 60.0) * 0.01);
        self.satisfaction.education = clamp_metric(education_spending * 100.0);

        self.satisfaction.economic = clamp_metric(economic_health);
        self.satisfaction.security = clamp_metric(stability);

        self.happiness = clamp_metric(self.satisfaction.mean());

        let base_growth = self.birth_rate - self.death_rate;
        let health_modifier = (self.health - 70.0) / 100.0;
        let happiness_modifier = (self.happiness - 50.0) / 200.0;
        self.growth_rate = (base_growth + health_modifier * 0.005 + happiness_modifier * 0.003)
            .clamp(0.0, MAX_POPULATION_GROWTH);

        self.total *= 1.0 + self.growth_rate;

        self.life_expectancy = 70.0 + (self.health - 70.0) * 0.2;
        self.literacy_rate = (0.5 + self.education * 0.005).min(1.0);
    }

    pub fn get_approval_rating(&self) -> f64 {
        let approval = self.satisfaction.economic * 0.35
            + self.satisfaction.healthcare * 0.25
            + self.satisfaction.education * 0.20
            + self.satisfaction.security * 0.20;
        clamp_metric(approval)
    }

    pub fn trigger_protest_risk(&self) -> f64 {
        let base_risk = (100.0 - self.happiness) / 100.0;
        let security_modifier = (100.0 - self.satisfaction.security) / 200.0;
        clamp_unit(base_risk + security_modifier)
    }

    pub fn workforce(&self) -> u64 {
        (self.total * self.adults).max(0.0) as u64
    }

    pub fn dependency_ratio(&self) -> f64 {
        if self.adults > 0.0 {
            (self.children + self.elderly) / self.adults
        } else {
            0.0
        }
    }

    pub fn adjust_happiness(&mut self, delta: f64) {
        self.happiness = clamp_metric(self.happiness + delta);
    }

    pub fn handle_event(&mut self, event: PopulationEvent, rng: &mut StdRng) {
        match event {
            PopulationEvent::Epidemic => {
                self.health = clamp_metric(self.health - rng.gen_range(5.0..=15.0));
                self.adjust_happiness(-rng.gen_range(10.0..=20.0));
                self.total *= rng.gen_range(0.95..=0.98);
            }
            PopulationEvent::BabyBoom => {
                self.birth_rate += 0.005;
                self.children = clamp_unit(self.children + 0.02);
            }
            PopulationEvent::BrainDrain => {
                self.education = clamp_metric(self.education - rng.gen_range(5.0..=10.0));
                self.total *= rng.gen_range(0.98..=0.995);
            }
            PopulationEvent::ImmigrationWave => {
                self.total *= rng.gen_range(1.02..=1.05);
                self.adults = clamp_unit(self.adults + 0.01);
            }
        }
    }
}
