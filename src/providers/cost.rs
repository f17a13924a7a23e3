//! Cost estimation for AI generation requests.
//!
//! Estimates request cost from total token usage and a fixed per-1000-token
//! price table keyed by model name. Estimates feed request logs; nothing in
//! the pipeline bills anyone.

use std::collections::HashMap;

use tracing::debug;

// MARK: - Constants

/// Price per 1000 tokens applied when a model has no table entry.
/// Matches the gpt-4o-mini rate.
const BASELINE_COST_PER_1K: f64 = 0.000_15;

// MARK: - Cost Table

/// Per-1000-token USD prices keyed by model name.
pub struct CostTable {
    per_1k: HashMap<&'static str, f64>,
}

impl CostTable {
    /// Create a cost table with the built-in prices.
    pub fn new() -> Self {
        let mut per_1k = HashMap::new();
        per_1k.insert("gpt-4o", 0.005);
        per_1k.insert("gpt-4o-mini", 0.000_15);
        per_1k.insert("gpt-4-turbo", 0.01);
        per_1k.insert("gpt-3.5-turbo", 0.000_5);
        Self { per_1k }
    }

    /// Check if a price is listed for a model.
    pub fn has_price(&self, model: &str) -> bool {
        self.per_1k.contains_key(model)
    }

    /// Price per 1000 tokens for a model, falling back to the baseline for
    /// anything not in the table.
    fn price_per_1k(&self, model: &str) -> f64 {
        match self.per_1k.get(model) {
            Some(price) => *price,
            None => {
                debug!(model = %model, "No price entry for model, using baseline");
                BASELINE_COST_PER_1K
            }
        }
    }

    /// Estimate the USD cost of a token count under a model's pricing.
    /// Zero tokens is always zero cost.
    pub fn estimate(&self, tokens: u64, model: &str) -> f64 {
        (tokens as f64 / 1000.0) * self.price_per_1k(model)
    }
}

impl Default for CostTable {
    fn default() -> Self {
        Self::new()
    }
}

// MARK: - Tests


// MARK: - Property-Based Tests

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn model_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(vec![
                "gpt-4o".to_string(),
                "gpt-4o-mini".to_string(),
                "gpt-4-turbo".to_string(),
                "gpt-3.5-turbo".to_string(),
            ]),
            "[a-z]{5,15}-[0-9]{1,3}",
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Estimates are non-negative, finite, and zero exactly when the
        /// token count is zero.
        #[test]
        fn prop_estimate_is_well_formed(
            model in model_strategy(),
            tokens in 0u64..10_000_000
        ) {
            let table = CostTable::new();
            let cost = table.estimate(tokens, &model);

            prop_assert!(cost >= 0.0, "cost must be non-negative, got {cost}");
            prop_assert!(cost.is_finite(), "cost must be finite, got {cost}");
            if tokens == 0 {
                prop_assert_eq!(cost, 0.0);
            } else {
                prop_assert!(cost > 0.0, "non-zero tokens must cost something");
            }
        }

        /// Doubling the token count doubles the estimate.
        #[test]
        fn prop_estimate_is_linear_in_tokens(
            model in model_strategy(),
            tokens in 1u64..1_000_000
        ) {
            let table = CostTable::new();
            let single = table.estimate(tokens, &model);
            let double = table.estimate(tokens * 2, &model);

            prop_assert!(
                (double - 2.0 * single).abs() < 1e-9,
                "single {single}, double {double}"
            );
        }

        /// Unlisted models price exactly like the baseline model.
        #[test]
        fn prop_unknown_model_matches_baseline(
            unknown in "[a-z]{5,15}-[0-9]{1,3}",
            tokens in 0u64..1_000_000
        ) {
            let table = CostTable::new();
            if table.has_price(&unknown) {
                return Ok(());
            }

            prop_assert_eq!(
                table.estimate(tokens, &unknown),
                table.estimate(tokens, "gpt-4o-mini")
            );
        }
    }
}
