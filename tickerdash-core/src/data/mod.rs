//! Data retrieval: providers, fallback tiers and the facade.

pub mod chain;
pub mod circuit_breaker;
pub mod facade;
pub mod fred;
pub mod http;
pub mod live;
pub mod payload;
pub mod provider;
pub mod sample;
pub mod synth;
pub mod yahoo;

pub use chain::{FallbackChain, FnTier, Synthesizer, Tier, TierResult};
pub use circuit_breaker::CircuitBreaker;
pub use facade::{FacadeBuilder, HistoryKey, MacroKey, ResourceKey, ResourceRecord, RetrievalFacade};
pub use payload::{RawNews, RawProfile};
pub use provider::{DataError, MacroDataProvider, MarketDataProvider};
pub use sample::{SampleNews, SampleTable};
