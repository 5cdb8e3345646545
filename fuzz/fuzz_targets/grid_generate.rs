#![no_main]

extern crate arbitrary;
extern crate libfuzzer_sys;
extern crate trial_grid;

use libfuzzer_sys::fuzz_target;
use trial_grid::grid::{AxisConstraint, GridAxes, SeedPolicy};

#[derive(Debug, Clone, arbitrary::Arbitrary)]
struct GridInput {
    search_budgets: Vec<u16>,
    player_counts: Vec<u8>,
    policy_variants: Vec<u8>,
    deterministic_samples: Vec<u16>,
    repeats: u8,
    product_target: Option<u32>,
    seed: u64,
}

fuzz_target!(|input: GridInput| {
    // Keep the cross product small enough to run quickly
    if input.search_budgets.len() > 8
        || input.player_counts.len() > 8
        || input.policy_variants.len() > 8
        || input.deterministic_samples.len() > 8
        || input.repeats > 8
    {
        return;
    }

    let constraint = input
        .product_target
        .map_or(AxisConstraint::None, |target| AxisConstraint::ProductEquals {
            target: u64::from(target),
        });
    let axes = GridAxes::new()
        .search_budgets(input.search_budgets.iter().map(|&b| u64::from(b)))
        .player_counts(input.player_counts.iter().map(|&p| usize::from(p)))
        .policy_variants(input.policy_variants.iter().copied())
        .deterministic_samples(input.deterministic_samples.iter().map(|&s| u64::from(s)))
        .repeats(usize::from(input.repeats))
        .constraint(constraint);

    let Ok(trials) = axes.generate(&SeedPolicy::Fixed { seed: input.seed }) else {
        assert!(axes.validate().is_err());
        return;
    };

    assert!(trials.len() <= axes.estimated_trials());
    if constraint == AxisConstraint::None {
        assert_eq!(trials.len(), axes.estimated_trials());
    }
    for spec in &trials {
        assert_eq!(spec.seed, Some(input.seed));
        assert!(axes.player_counts.contains(&spec.player_count));
        assert!(axes.search_budgets.contains(&spec.search_budget));
        assert!(constraint.admits(spec.search_budget, spec.deterministic_samples));
    }
});
