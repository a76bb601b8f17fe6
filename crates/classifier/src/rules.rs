//! Behavior rule table.
//!
//! Rules are data: each pairs a label with threshold conditions and a raw
//! confidence formula. The classifier walks them in table order.

use behavior_core::{
    config::{BehaviorConfig, RuleThresholds},
    Behavior, Features,
};

/// Condition on the day's price change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceCondition {
    /// Strictly below the bound.
    Below(f64),
    /// Strictly above the bound.
    Above(f64),
    /// Absolute change strictly below the bound.
    AbsBelow(f64),
}

impl PriceCondition {
    #[inline]
    pub fn holds(&self, change: f64) -> bool {
        match *self {
            PriceCondition::Below(bound) => change < bound,
            PriceCondition::Above(bound) => change > bound,
            PriceCondition::AbsBelow(bound) => change.abs() < bound,
        }
    }
}

/// A single labelling rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorRule {
    /// Label assigned when the rule matches.
    pub behavior: Behavior,
    pub price: PriceCondition,
    /// Volume z-score must exceed this.
    pub min_volume_zscore: f64,
    /// Volatility must exceed this.
    pub min_volatility: f64,
}

impl BehaviorRule {
    fn from_thresholds(behavior: Behavior, price: PriceCondition, t: &RuleThresholds) -> Self {
        Self {
            behavior,
            price,
            min_volume_zscore: t.volume_zscore,
            min_volatility: t.volatility,
        }
    }

    /// Build the rule table in evaluation order: panic, FOMO, overconfidence.
    pub fn table(config: &BehaviorConfig) -> Vec<BehaviorRule> {
        vec![
            Self::from_thresholds(
                Behavior::PanicSelling,
                PriceCondition::Below(config.panic.price_change),
                &config.panic,
            ),
            Self::from_thresholds(
                Behavior::FomoBuying,
                PriceCondition::Above(config.fomo.price_change),
                &config.fomo,
            ),
            Self::from_thresholds(
                Behavior::Overconfidence,
                PriceCondition::AbsBelow(config.overconfidence.price_change),
                &config.overconfidence,
            ),
        ]
    }

    /// Whether the day's features satisfy every condition.
    ///
    /// Days without a defined price change or volatility never match.
    pub fn matches(&self, features: &Features) -> bool {
        let (Some(change), Some(volatility)) = (features.price_change_pct, features.volatility)
        else {
            return false;
        };
        self.price.holds(change)
            && features.volume_zscore > self.min_volume_zscore
            && volatility > self.min_volatility
    }

    /// Raw, unnormalized confidence for a matching day.
    pub fn raw_confidence(&self, features: &Features) -> f64 {
        let change = features.price_change_pct.unwrap_or(0.0);
        let volatility = features.volatility.unwrap_or(0.0);
        let z = features.volume_zscore;
        match self.behavior {
            Behavior::PanicSelling => change.abs() / 10.0 + z / 5.0 + volatility / 10.0,
            Behavior::FomoBuying => change / 10.0 + z / 5.0 + volatility / 10.0,
            Behavior::Overconfidence => z / 5.0 + volatility / 10.0,
            Behavior::Normal => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn features(change: Option<f64>, z: f64, volatility: Option<f64>) -> Features {
        Features {
            price_change_pct: change,
            volume_ma20: 0.0,
            volume_mean: 0.0,
            volume_std: None,
            volume_zscore: z,
            volatility,
            momentum_5d: None,
            daily_range: None,
            price_position: 50.0,
        }
    }

    #[test]
    fn test_table_order() {
        let rules = BehaviorRule::table(&BehaviorConfig::default());
        let labels: Vec<_> = rules.iter().map(|r| r.behavior).collect();
        assert_eq!(
            labels,
            vec![Behavior::PanicSelling, Behavior::FomoBuying, Behavior::Overconfidence]
        );
        assert_eq!(rules[0].price, PriceCondition::Below(-2.5));
        assert_eq!(rules[2].price, PriceCondition::AbsBelow(1.0));
    }

    #[test]
    fn test_panic_rule_and_raw_confidence() {
        let rule = BehaviorRule::table(&BehaviorConfig::default())[0];
        let f = features(Some(-3.0), 2.0, Some(2.5));
        assert!(rule.matches(&f));
        assert_relative_eq!(rule.raw_confidence(&f), 0.95, epsilon = 1e-12);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let rule = BehaviorRule::table(&BehaviorConfig::default())[0];
        assert!(!rule.matches(&features(Some(-2.5), 2.0, Some(2.5))));
        assert!(!rule.matches(&features(Some(-3.0), 1.5, Some(2.5))));
        assert!(!rule.matches(&features(Some(-3.0), 2.0, Some(2.0))));
    }

    #[test]
    fn test_undefined_inputs_never_match() {
        for rule in BehaviorRule::table(&BehaviorConfig::default()) {
            assert!(!rule.matches(&features(None, 5.0, Some(5.0))));
            assert!(!rule.matches(&features(Some(0.5), 5.0, None)));
        }
    }

    #[test]
    fn test_fomo_and_overconfidence_confidence() {
        let rules = BehaviorRule::table(&BehaviorConfig::default());
        let fomo = features(Some(4.0), 2.5, Some(3.0));
        assert!(rules[1].matches(&fomo));
        assert_relative_eq!(rules[1].raw_confidence(&fomo), 0.4 + 0.5 + 0.3, epsilon = 1e-12);

        let over = features(Some(-0.5), 3.0, Some(2.0));
        assert!(rules[2].matches(&over));
        assert_relative_eq!(rules[2].raw_confidence(&over), 0.6 + 0.2, epsilon = 1e-12);
    }
}
