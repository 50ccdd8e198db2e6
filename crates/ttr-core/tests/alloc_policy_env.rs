//! `TTR_ALLOC_POLICY` seeds the default, the runtime setter overrides it
//!
//! Kept in its own test binary so the variable is set before anything in the
//! process reads the configuration.

use ttr_core::{
    config::{self, AllocationPolicy, ALLOC_POLICY_ENV},
    RenderParams,
};

#[test]
fn env_seeds_default_and_setter_wins() {
    std::env::set_var(ALLOC_POLICY_ENV, "abort");
    assert_eq!(
        config::default_allocation_policy(),
        AllocationPolicy::AbortRender
    );
    assert_eq!(
        RenderParams::default().allocation_policy,
        AllocationPolicy::AbortRender
    );

    // Read once: later changes to the variable are ignored
    std::env::set_var(ALLOC_POLICY_ENV, "skip");
    assert_eq!(
        config::default_allocation_policy(),
        AllocationPolicy::AbortRender
    );

    config::set_default_allocation_policy(AllocationPolicy::SkipGlyph);
    assert_eq!(
        config::default_allocation_policy(),
        AllocationPolicy::SkipGlyph
    );
    assert_eq!(
        RenderParams::default().allocation_policy,
        AllocationPolicy::SkipGlyph
    );
}
