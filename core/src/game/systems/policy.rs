use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::game::country::Country;
use crate::game::economy::BudgetShares;
use crate::game::government::GovernmentType;

const LOW_APPROVAL: f64 = 40.0;
const LOW_ECONOMIC_HEALTH: f64 = 40.0;
const LOW_SOCIAL_METRIC: f64 = 60.0;
const SPENDING_CAP: f64 = 0.25;
const UNREST_APPROVAL: f64 = 30.0;
const UNREST_STABILITY: f64 = 40.0;
const REGIME_CHANGE_PROBABILITY: f64 = 0.01;

/// Policy adjustments for a computer-controlled country.
/// Returns a report when the regime was replaced.
pub(crate) fn make_decisions(country: &mut Country, rng: &mut StdRng) -> Option<String> {
    let approval = country.population.get_approval_rating();
    let economic_health = country.economy.get_economic_health();

    if approval < LOW_APPROVAL {
        let rate = country.economy.tax_rate() * 0.99;
        country.economy.set_tax_rate(rate);
    } else if economic_health < LOW_ECONOMIC_HEALTH {
        let rate = country.economy.tax_rate() * 1.01;
        country.economy.set_tax_rate(rate);
    }

    if country.population.health < LOW_SOCIAL_METRIC {
        let share = (country.economy.spending().healthcare * 1.1).min(SPENDING_CAP);
        country
            .economy
            .allocate_budget(BudgetShares::default().healthcare(share));
    }
    if country.population.education < LOW_SOCIAL_METRIC {
        let share = (country.economy.spending().education * 1.1).min(SPENDING_CAP);
        country
            .economy
            .allocate_budget(BudgetShares::default().education(share));
    }

    if approval < UNREST_APPROVAL
        && country.government.stability < UNREST_STABILITY
        && rng.gen_bool(REGIME_CHANGE_PROBABILITY)
    {
        let new_type = *GovernmentType::ALL.choose(rng)?;
        let old_type = country.government.kind();
        country.government.change_government_type(new_type, rng);
        debug!(
            country = %country.name,
            from = old_type.key(),
            to = new_type.key(),
            "AI による体制変更"
        );
        return Some(format!(
            "{} は社会不安を受けて政体を {} から {} に移行しました。",
            country.name, old_type, new_type
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::game::country::{CountryId, Position, Trait};
    use crate::game::government::GovernmentModel;

    fn sample_country(rng: &mut StdRng) -> Country {
        let government = GovernmentModel::new(GovernmentType::Democracy, rng);
        Country::new(
            CountryId(1),
            "Cypheria",
            Position::new(0.0, 0.0),
            vec![Trait::Efficient],
            1_000_000.0,
            80_000_000.0,
            government,
        )
    }

    #[test]
    fn low_approval_cuts_taxes() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut country = sample_country(&mut rng);
        country.population.satisfaction.economic = 0.0;
        country.population.satisfaction.healthcare = 0.0;
        let before = country.economy.tax_rate();
        make_decisions(&mut country, &mut rng);
        assert!((country.economy.tax_rate() - before * 0.99).abs() < 1e-12);
    }

    #[test]
    fn weak_economy_raises_taxes_when_approval_is_fine() {
        let mut rng = StdRng::seed_from_u64(22);
        let mut country = sample_country(&mut rng);
        // 80 per capita scores well below 40 on economic health.
        assert!(country.economy.get_economic_health() < LOW_ECONOMIC_HEALTH);
        let before = country.economy.tax_rate();
        make_decisions(&mut country, &mut rng);
        assert!((country.economy.tax_rate() - before * 1.01).abs() < 1e-12);
    }

    #[test]
    fn poor_health_raises_healthcare_share_up_to_cap() {
        let mut rng = StdRng::seed_from_u64(23);
        let mut country = sample_country(&mut rng);
        country.population.health = 40.0;
        for _ in 0..20 {
            make_decisions(&mut country, &mut rng);
        }
        assert!((country.economy.spending().healthcare - SPENDING_CAP).abs() < 1e-12);
    }

    fn unrest(country: &mut Country) {
        country.population.satisfaction.economic = 0.0;
        country.population.satisfaction.healthcare = 0.0;
        country.population.satisfaction.education = 0.0;
        country.population.satisfaction.security = 0.0;
    }

    #[test]
    fn sustained_unrest_eventually_replaces_the_regime() {
        let mut rng = StdRng::seed_from_u64(24);
        let mut country = sample_country(&mut rng);
        unrest(&mut country);
        country.government.stability = 20.0;
        country.government.years_in_power = 5.0;

        let mut report = None;
        for _ in 0..3_000 {
            report = make_decisions(&mut country, &mut rng);
            if report.is_some() {
                break;
            }
        }
        let report = report.expect("regime change within 3000 draws");
        assert!(report.starts_with("Cypheria"));
        assert_eq!(country.government.years_in_power, 0.0);
    }

    #[test]
    fn stable_unpopular_regime_survives() {
        let mut rng = StdRng::seed_from_u64(25);
        let mut country = sample_country(&mut rng);
        unrest(&mut country);
        country.government.stability = 80.0;
        for _ in 0..3_000 {
            assert!(make_decisions(&mut country, &mut rng).is_none());
        }
        assert_eq!(country.government.kind(), GovernmentType::Democracy);
    }
}
