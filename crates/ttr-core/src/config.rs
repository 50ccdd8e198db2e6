//! Process-wide rendering defaults
//!
//! The only knob today is what to do when a glyph cannot be rendered because
//! its outline or cell grid could not grow. The default is to skip the glyph
//! and keep going; set `TTR_ALLOC_POLICY=abort` to fail the whole render
//! instead.
//!
//! ```
//! use ttr_core::config::{self, AllocationPolicy};
//!
//! config::set_default_allocation_policy(AllocationPolicy::AbortRender);
//! assert_eq!(config::default_allocation_policy(), AllocationPolicy::AbortRender);
//! config::set_default_allocation_policy(AllocationPolicy::SkipGlyph);
//! ```

use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

use crate::error::TtrError;

/// Environment variable consulted once for the default policy
pub const ALLOC_POLICY_ENV: &str = "TTR_ALLOC_POLICY";

/// What the compositor does when one glyph runs out of room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocationPolicy {
    /// Leave the glyph out, log a warning, render the rest
    #[default]
    SkipGlyph,
    /// Stop and return the allocation error to the caller
    AbortRender,
}

impl AllocationPolicy {
    fn to_u8(self) -> u8 {
        match self {
            AllocationPolicy::SkipGlyph => 0,
            AllocationPolicy::AbortRender => 1,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            1 => AllocationPolicy::AbortRender,
            _ => AllocationPolicy::SkipGlyph,
        }
    }
}

impl FromStr for AllocationPolicy {
    type Err = TtrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" | "skip-glyph" => Ok(AllocationPolicy::SkipGlyph),
            "abort" | "abort-render" => Ok(AllocationPolicy::AbortRender),
            other => Err(TtrError::ConfigError(format!(
                "Unknown allocation policy '{}' (expected skip or abort)",
                other
            ))),
        }
    }
}

static DEFAULT_POLICY: AtomicU8 = AtomicU8::new(0);

static ENV_CHECKED: OnceLock<()> = OnceLock::new();

fn check_env() {
    ENV_CHECKED.get_or_init(|| {
        if let Ok(val) = std::env::var(ALLOC_POLICY_ENV) {
            match val.parse::<AllocationPolicy>() {
                Ok(policy) => {
                    DEFAULT_POLICY.store(policy.to_u8(), Ordering::SeqCst);
                    log::info!("Allocation policy {:?} set via {}", policy, ALLOC_POLICY_ENV);
                },
                Err(e) => log::warn!("Ignoring {}: {}", ALLOC_POLICY_ENV, e),
            }
        }
    });
}

/// The policy new [`RenderParams`](crate::RenderParams) start with
pub fn default_allocation_policy() -> AllocationPolicy {
    check_env();
    AllocationPolicy::from_u8(DEFAULT_POLICY.load(Ordering::SeqCst))
}

/// Override the default at runtime; takes precedence over the environment
pub fn set_default_allocation_policy(policy: AllocationPolicy) {
    check_env();
    DEFAULT_POLICY.store(policy.to_u8(), Ordering::SeqCst);
    log::debug!("Default allocation policy set to {:?}", policy);
}
