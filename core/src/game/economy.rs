use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{BASE_GDP_GROWTH, BASE_TAX_RATE, MAX_TAX_RATE, MIN_TAX_RATE, clamp_unit};

const GDP_PER_CAPITA_SCALE: f64 = 500.0;
const MAX_DEBT_PENALTY: f64 = 30.0;
const MIN_UNEMPLOYMENT_AFTER_GROWTH: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomicEvent {
    Boom,
    Recession,
    MarketCrash,
    TechBreakthrough,
}

impl EconomicEvent {
    /// Multiplicative GDP shock and additive unemployment shock.
    fn shock(self) -> (f64, f64) {
        match self {
            EconomicEvent::Boom => (1.05, -0.01),
            EconomicEvent::Recession => (0.95, 0.02),
            EconomicEvent::MarketCrash => (0.90, 0.03),
            EconomicEvent::TechBreakthrough => (1.03, -0.005),
        }
    }
}

/// Partial budget request. Missing fields keep their current share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetShares {
    #[serde(default)]
    pub healthcare: Option<f64>,
    #[serde(default)]
    pub education: Option<f64>,
    #[serde(default)]
    pub military: Option<f64>,
    #[serde(default)]
    pub infrastructure: Option<f64>,
    #[serde(default)]
    pub welfare: Option<f64>,
}

impl BudgetShares {
    pub fn healthcare(mut self, value: f64) -> Self {
        self.healthcare = Some(value);
        self
    }

    pub fn education(mut self, value: f64) -> Self {
        self.education = Some(value);
        self
    }

    pub fn military(mut self, value: f64) -> Self {
        self.military = Some(value);
        self
    }

    pub fn infrastructure(mut self, value: f64) -> Self {
        self.infrastructure = Some(value);
        self
    }

    pub fn welfare(mut self, value: f64) -> Self {
        self.welfare = Some(value);
        self
    }

    pub fn values(&self) -> [Option<f64>; 5] {
        [
            self.healthcare,
            self.education,
            self.military,
            self.infrastructure,
            self.welfare,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpendingShares {
    pub healthcare: f64,
    pub education: f64,
    pub military: f64,
    pub infrastructure: f64,
    pub welfare: f64,
    pub other: f64,
}

impl SpendingShares {
    pub fn allocated_total(&self) -> f64 {
        self.healthcare + self.education + self.military + self.infrastructure + self.welfare
    }

    fn civilian_total(&self) -> f64 {
        self.healthcare + self.education + self.infrastructure + self.welfare
    }

    fn largest_share_mut(&mut self) -> Option<&mut f64> {
        [
            &mut self.healthcare,
            &mut self.education,
            &mut self.military,
            &mut self.infrastructure,
            &mut self.welfare,
        ]
        .into_iter()
        .max_by(|a, b| (**a).total_cmp(&**b))
    }
}

impl Default for SpendingShares {
    fn default() -> Self {
        Self {
            healthcare: 0.15,
            education: 0.20,
            military: 0.10,
            infrastructure: 0.20,
            welfare: 0.15,
            other: 0.20,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EconomyModel {
    pub gdp: f64,
    /// Headcount copied from the population model at the end of each tick.
    pub population: f64,
    tax_rate: f64,
    pub government_budget: f64,
    pub debt: f64,
    pub inflation: f64,
    pub unemployment: f64,
    pub interest_rate: f64,
    pub agriculture_share: f64,
    pub industry_share: f64,
    pub services_share: f64,
    spending: SpendingShares,
    pub trade_balance: f64,
}

impl EconomyModel {
    pub fn new(initial_gdp: f64, initial_population: f64) -> Self {
        Self {
            gdp: initial_gdp,
            population: initial_population,
            tax_rate: BASE_TAX_RATE,
            government_budget: initial_gdp * 0.2,
            debt: 0.0,
            inflation: 0.02,
            unemployment: 0.05,
            interest_rate: 0.03,
            agriculture_share: 0.15,
            industry_share: 0.35,
            services_share: 0.50,
            spending: SpendingShares::default(),
            trade_balance: 0.0,
        }
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn spending(&self) -> SpendingShares {
        self.spending
    }

    pub fn tax_revenue(&self) -> f64 {
        self.gdp * self.tax_rate
    }

    pub fn gdp_per_capita(&self) -> f64 {
        if self.population > 0.0 {
            self.gdp / self.population
        } else {
            0.0
        }
    }

    /// Applies one tick of growth and returns the growth rate that was used.
    pub fn update_gdp(
        &mut self,
        growth_modifier: f64,
        stability_bonus: f64,
        rng: &mut StdRng,
    ) -> f64 {
        let unemployment_penalty = self.unemployment * 0.5;
        let inflation_effect = if self.inflation < 0.02 {
            0.01
        } else if self.inflation < 0.05 {
            0.005
        } else {
            -self.inflation * 0.3
        };
        let education_bonus = self.spending.education * 0.1;
        let infrastructure_bonus = self.spending.infrastructure * 0.08;

        let mut total_growth = (BASE_GDP_GROWTH
            + stability_bonus
            + inflation_effect
            + education_bonus
            + infrastructure_bonus
            - unemployment_penalty)
            * growth_modifier;
        total_growth += rng.gen_range(-0.01..=0.01);

        self.gdp = (self.gdp * (1.0 + total_growth)).max(0.0);
        self.trade_balance = (total_growth - BASE_GDP_GROWTH) * self.gdp * 0.1;
        total_growth
    }

    pub fn update_budget(&mut self) {
        let revenue = self.tax_revenue();
        // Spending tracks revenue, so the debt branches only matter once
        // expenditure is modelled separately.
        let spending = revenue;
        if spending > revenue {
            self.debt += spending - revenue;
        } else if revenue > spending {
            let payment = self.debt.min((revenue - spending) * 0.5);
            self.debt -= payment;
        }
        self.government_budget = revenue;
    }

    pub fn set_tax_rate(&mut self, rate: f64) {
        self.tax_rate = rate.clamp(MIN_TAX_RATE, MAX_TAX_RATE);
    }

    pub fn allocate_budget(&mut self, shares: BudgetShares) {
        let spending = &mut self.spending;
        if let Some(value) = shares.healthcare {
            spending.healthcare = clamp_unit(value);
        }
        if let Some(value) = shares.education {
            spending.education = clamp_unit(value);
        }
        if let Some(value) = shares.military {
            spending.military = clamp_unit(value);
        }
        if let Some(value) = shares.infrastructure {
            spending.infrastructure = clamp_unit(value);
        }
        if let Some(value) = shares.welfare {
            spending.welfare = clamp_unit(value);
        }
        self.normalise_spending();
    }

    /// Shifts the military share by `delta` with a floor. An increase that
    /// would overrun the unit budget is taken from the four civilian shares
    /// in proportion to their size.
    pub fn adjust_military_spending(&mut self, delta: f64, floor: f64) {
        let spending = &mut self.spending;
        spending.military = clamp_unit((spending.military + delta).max(floor));
        let civilian = spending.civilian_total();
        let room = 1.0 - spending.military;
        if civilian > room && civilian > 0.0 {
            let scale = room / civilian;
            spending.healthcare *= scale;
            spending.education *= scale;
            spending.infrastructure *= scale;
            spending.welfare *= scale;
        }
        self.normalise_spending();
    }

    fn normalise_spending(&mut self) {
        let spending = &mut self.spending;
        let total = spending.allocated_total();
        if total > 1.0 {
            let scale = 1.0 / total;
            spending.healthcare *= scale;
            spending.education *= scale;
            spending.military *= scale;
            spending.infrastructure *= scale;
            spending.welfare *= scale;
        }
        // Rounding after the rescale can leave the sum a few ulps above one.
        let mut excess = spending.allocated_total() - 1.0;
        while excess > 0.0 {
            let Some(largest) = spending.largest_share_mut() else {
                break;
            };
            *largest = (*largest - excess.max(f64::EPSILON)).max(0.0);
            excess = spending.allocated_total() - 1.0;
        }
        spending.other = (1.0 - spending.allocated_total()).max(0.0);
    }

    pub fn get_economic_health(&self) -> f64 {
        let base_score = (self.gdp_per_capita() / GDP_PER_CAPITA_SCALE).min(100.0);
        let unemployment_penalty = self.unemployment * 100.0;
        let inflation_bonus = if self.inflation < 0.02 {
            10.0
        } else if self.inflation < 0.05 {
            5.0
        } else {
            -self.inflation * 200.0
        };
        let debt_ratio = if self.gdp > 0.0 {
            self.debt / self.gdp
        } else {
            0.0
        };
        let debt_penalty = (debt_ratio * 50.0).min(MAX_DEBT_PENALTY);

        (base_score - unemployment_penalty + inflation_bonus - debt_penalty).clamp(0.0, 100.0)
    }

    pub fn trigger_economic_event(&mut self, event: EconomicEvent) {
        let (gdp_factor, unemployment_delta) = event.shock();
        self.gdp *= gdp_factor;
        self.unemployment = if unemployment_delta < 0.0 {
            (self.unemployment + unemployment_delta).max(MIN_UNEMPLOYMENT_AFTER_GROWTH)
        } else {
            clamp_unit(self.unemployment + unemployment_delta)
        };
    }

    #[cfg(test)]
    pub(crate) fn spending_mut(&mut self) -> &mut SpendingShares {
        &mut self.spending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sample_economy() -> EconomyModel {
        EconomyModel::new(100_000_000.0, 1_000_000.0)
    }

    #[test]
    fn tax_rate_is_clamped_to_bounds() {
        let mut economy = sample_economy();
        economy.set_tax_rate(-3.0);
        assert_eq!(economy.tax_rate(), MIN_TAX_RATE);
        economy.set_tax_rate(4.2);
        assert_eq!(economy.tax_rate(), MAX_TAX_RATE);
        economy.set_tax_rate(0.3);
        assert!((economy.tax_rate() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn oversubscribed_budget_is_rescaled_to_one() {
        let mut economy = sample_economy();
        economy.allocate_budget(
            BudgetShares::default()
                .healthcare(0.9)
                .education(0.8)
                .military(1.7)
                .infrastructure(0.3)
                .welfare(0.5),
        );
        let spending = economy.spending();
        assert!(spending.allocated_total() <= 1.0);
        assert!((spending.allocated_total() - 1.0).abs() < 1e-9);
        assert!(spending.military <= 1.0);
        assert!(spending.other.abs() < 1e-9);
    }

    #[test]
    fn partial_allocation_keeps_other_shares() {
        let mut economy = sample_economy();
        economy.allocate_budget(BudgetShares::default().healthcare(0.05));
        let spending = economy.spending();
        assert!((spending.healthcare - 0.05).abs() < f64::EPSILON);
        assert!((spending.education - 0.20).abs() < f64::EPSILON);
        assert!((spending.other - 0.30).abs() < 1e-9);
    }

    #[test]
    fn rescaled_budgets_never_exceed_one() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut economy = sample_economy();
        for _ in 0..20_000 {
            economy.allocate_budget(
                BudgetShares::default()
                    .healthcare(rng.gen_range(0.0..1.0))
                    .education(rng.gen_range(0.0..1.0))
                    .military(rng.gen_range(0.0..1.0))
                    .infrastructure(rng.gen_range(0.0..1.0))
                    .welfare(rng.gen_range(0.0..1.0)),
            );
            let spending = economy.spending();
            assert!(spending.allocated_total() <= 1.0, "{spending:?}");
            assert!(spending.other >= 0.0);
        }
    }

    #[test]
    fn military_increase_is_taken_from_civilian_shares() {
        let mut economy = sample_economy();
        economy.allocate_budget(
            BudgetShares::default()
                .healthcare(0.2)
                .education(0.2)
                .military(0.2)
                .infrastructure(0.2)
                .welfare(0.2),
        );
        economy.adjust_military_spending(0.05, 0.0);
        let spending = economy.spending();
        assert!((spending.military - 0.25).abs() < 1e-12);
        assert!((spending.healthcare - 0.1875).abs() < 1e-12);
        assert!((spending.welfare - 0.1875).abs() < 1e-12);
        assert!(spending.allocated_total() <= 1.0);
    }

    #[test]
    fn military_increase_with_headroom_leaves_civilian_shares() {
        let mut economy = sample_economy();
        economy.adjust_military_spending(0.05, 0.0);
        let spending = economy.spending();
        assert!((spending.military - 0.15).abs() < 1e-12);
        assert!((spending.education - 0.20).abs() < f64::EPSILON);
        assert!((spending.other - 0.15).abs() < 1e-9);
    }

    #[test]
    fn military_adjustment_respects_floor() {
        let mut economy = sample_economy();
        economy.adjust_military_spending(-0.5, 0.05);
        assert!((economy.spending().military - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn budget_tracks_revenue_and_leaves_debt() {
        let mut economy = sample_economy();
        economy.debt = 500.0;
        economy.set_tax_rate(0.2);
        economy.update_budget();
        assert!((economy.government_budget - economy.gdp * 0.2).abs() < 1e-6);
        assert!((economy.debt - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn gdp_growth_stays_within_expected_band() {
        let mut economy = sample_economy();
        let mut rng = StdRng::seed_from_u64(3);
        let before = economy.gdp;
        let growth = economy.update_gdp(1.0, 0.0, &mut rng);
        // base 0.02 + 0.005 (inflation tier) + 0.02 + 0.016 - 0.025 = 0.036
        assert!((growth - 0.036).abs() <= 0.0100001);
        assert!((economy.gdp - before * (1.0 + growth)).abs() < 1e-3);
        assert!((economy.trade_balance - (growth - 0.02) * economy.gdp * 0.1).abs() < 1e-6);
    }

    #[test]
    fn economic_health_penalises_debt_up_to_cap() {
        let mut economy = EconomyModel::new(50_000_000_000.0, 1_000_000.0);
        let healthy = economy.get_economic_health();
        assert!((healthy - 100.0).abs() < 1e-9);
        economy.debt = economy.gdp * 10.0;
        let indebted = economy.get_economic_health();
        assert!((healthy - indebted - MAX_DEBT_PENALTY).abs() < 1e-9);
    }

    #[test]
    fn events_apply_fixed_shocks() {
        let mut economy = sample_economy();
        economy.trigger_economic_event(EconomicEvent::MarketCrash);
        assert!((economy.gdp - 90_000_000.0).abs() < 1e-3);
        assert!((economy.unemployment - 0.08).abs() < 1e-12);
        economy.trigger_economic_event(EconomicEvent::Boom);
        assert!((economy.unemployment - 0.07).abs() < 1e-12);
        economy.unemployment = 0.021;
        economy.trigger_economic_event(EconomicEvent::TechBreakthrough);
        assert_eq!(economy.unemployment, MIN_UNEMPLOYMENT_AFTER_GROWTH);
    }
}
