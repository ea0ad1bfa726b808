//! Ordered fallback chain: tiers tried in order until the first hit, then an
//! infallible synthesizer.

use std::fmt;

use tracing::{debug, info};

/// Outcome of one tier.
#[derive(Debug, Clone, PartialEq)]
pub enum TierResult<R> {
    Hit(R),
    /// Nothing usable; the reason is logged.
    Miss(String),
}

impl<R> TierResult<R> {
    pub fn miss(reason: impl Into<String>) -> Self {
        TierResult::Miss(reason.into())
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, TierResult::Hit(_))
    }

    pub fn hit(self) -> Option<R> {
        match self {
            TierResult::Hit(r) => Some(r),
            TierResult::Miss(_) => None,
        }
    }
}

impl<R, E: fmt::Display> From<Result<R, E>> for TierResult<R> {
    fn from(result: Result<R, E>) -> Self {
        match result {
            Ok(r) => TierResult::Hit(r),
            Err(e) => TierResult::Miss(e.to_string()),
        }
    }
}

/// One ranked source.
pub trait Tier<K: ?Sized, R>: Send + Sync {
    fn name(&self) -> &str;
    fn lookup(&self, key: &K) -> TierResult<R>;
}

/// The last tier. Cannot fail.
pub trait Synthesizer<K: ?Sized, R>: Send + Sync {
    fn synthesize(&self, key: &K) -> R;
}

impl<K: ?Sized, R, F> Synthesizer<K, R> for F
where
    F: Fn(&K) -> R + Send + Sync,
{
    fn synthesize(&self, key: &K) -> R {
        self(key)
    }
}

/// A tier backed by a closure.
pub struct FnTier<F> {
    name: String,
    f: F,
}

impl<F> FnTier<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<K: ?Sized, R, F> Tier<K, R> for FnTier<F>
where
    F: Fn(&K) -> TierResult<R> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, key: &K) -> TierResult<R> {
        (self.f)(key)
    }
}

pub struct FallbackChain<K: ?Sized, R> {
    kind: &'static str,
    tiers: Vec<Box<dyn Tier<K, R>>>,
    synthesizer: Box<dyn Synthesizer<K, R>>,
}

impl<K: ?Sized + fmt::Debug, R> FallbackChain<K, R> {
    /// A chain with only the synthesizer. `kind` labels log lines.
    pub fn new<S>(kind: &'static str, synthesizer: S) -> Self
    where
        S: Synthesizer<K, R> + 'static,
    {
        Self {
            kind,
            tiers: Vec::new(),
            synthesizer: Box::new(synthesizer),
        }
    }

    /// Append a tier after the existing ones.
    pub fn with_tier<T>(mut self, tier: T) -> Self
    where
        T: Tier<K, R> + 'static,
    {
        self.tiers.push(Box::new(tier));
        self
    }

    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    /// First hit wins; the synthesizer answers when every tier misses.
    pub fn resolve(&self, key: &K) -> R {
        for tier in &self.tiers {
            match tier.lookup(key) {
                TierResult::Hit(record) => return record,
                TierResult::Miss(reason) => {
                    debug!(kind = self.kind, tier = tier.name(), ?key, %reason, "tier miss");
                }
            }
        }
        info!(kind = self.kind, ?key, "using synthesized default");
        self.synthesizer.synthesize(key)
    }
}
