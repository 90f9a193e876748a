//! Fat-linked milk pricing.

use serde::{Deserialize, Serialize};

/// Fat percentage at which `base_rate` applies.
pub const BASE_FAT: f64 = 3.5;
/// Price per liter at `BASE_FAT`.
pub const BASE_RATE: f64 = 30.0;
/// Price change per `FAT_STEP` of fat.
pub const RATE_INCREASE: f64 = 5.0;
/// Fat increment that moves the price by `RATE_INCREASE`.
pub const FAT_STEP: f64 = 0.5;

/// Rounds to two decimals, halves away from zero (`f64::round`).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Linear pricing constants. Stored entries keep the rate they were priced
/// with, so changing the policy only affects new collections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RatePolicy {
    pub base_fat: f64,
    pub base_rate: f64,
    pub rate_increase: f64,
    pub fat_step: f64,
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            base_fat: BASE_FAT,
            base_rate: BASE_RATE,
            rate_increase: RATE_INCREASE,
            fat_step: FAT_STEP,
        }
    }
}

impl RatePolicy {
    /// Price per liter for `fat_percentage`. Out-of-range inputs are not clamped.
    pub fn rate_for(&self, fat_percentage: f64) -> f64 {
        let fat_diff = (fat_percentage - self.base_fat) / self.fat_step;
        round2(self.base_rate + fat_diff * self.rate_increase)
    }

    /// Checks the constants can produce finite prices.
    pub fn is_valid(&self) -> bool {
        self.fat_step.is_finite()
            && self.fat_step > 0.0
            && self.base_fat.is_finite()
            && self.base_rate.is_finite()
            && self.rate_increase.is_finite()
    }
}

/// A computed price for one delivery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub rate: f64,
    pub amount: f64,
}

pub struct RateService;

impl RateService {
    /// Price per liter under the default policy.
    pub fn compute_rate(fat_percentage: f64) -> f64 {
        RatePolicy::default().rate_for(fat_percentage)
    }

    /// `round2(rate * quantity)`.
    pub fn amount_for(rate: f64, quantity_liters: f64) -> f64 {
        round2(rate * quantity_liters)
    }

    pub fn quote(policy: &RatePolicy, fat_percentage: f64, quantity_liters: f64) -> Quote {
        let rate = policy.rate_for(fat_percentage);
        Quote {
            rate,
            amount: Self::amount_for(rate, quantity_liters),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_fat_yields_base_rate() {
        assert_eq!(RateService::compute_rate(3.5), 30.0);
    }

    #[test]
    fn half_percent_steps_move_price_by_five() {
        assert_eq!(RateService::compute_rate(3.0), 25.0);
        assert_eq!(RateService::compute_rate(4.0), 35.0);
        assert_eq!(RateService::compute_rate(4.5), 40.0);
        assert_eq!(RateService::compute_rate(6.0), 55.0);
    }

    #[test]
    fn fractional_fat_rounds_to_two_decimals() {
        assert_eq!(RateService::compute_rate(3.7), 32.0);
        assert_eq!(RateService::compute_rate(3.55), 30.5);
        assert_eq!(RateService::compute_rate(4.123), 36.23);
    }

    #[test]
    fn out_of_range_inputs_are_not_clamped() {
        assert_eq!(RateService::compute_rate(0.0), -5.0);
        assert_eq!(RateService::compute_rate(20.0), 195.0);
    }

    #[test]
    fn round2_rounds_halves_away_from_zero() {
        assert_eq!(round2(1.125), 1.13);
        assert_eq!(round2(-1.125), -1.13);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn quote_multiplies_frozen_rate() {
        let quote = RateService::quote(&RatePolicy::default(), 4.5, 10.0);
        assert_eq!(quote.rate, 40.0);
        assert_eq!(quote.amount, 400.0);
    }

    #[test]
    fn custom_policy_changes_new_prices() {
        let policy = RatePolicy {
            base_rate: 32.0,
            ..RatePolicy::default()
        };
        assert_eq!(policy.rate_for(3.5), 32.0);
        assert!(policy.is_valid());
        let broken = RatePolicy {
            fat_step: 0.0,
            ..RatePolicy::default()
        };
        assert!(!broken.is_valid());
    }
}
