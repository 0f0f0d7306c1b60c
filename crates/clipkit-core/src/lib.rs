//! clipkit-core: shared types, errors, the parameter bag, and configuration.
//!
//! This crate is the foundational dependency for all other clipkit crates,
//! providing the unified error type, the dynamically-typed [`ArgBag`]
//! parameter container, the cooperative [`CancelFlag`], the [`Encoded`]
//! handler output type, and [`EngineConfig`].

pub mod args;
pub mod cancel;
pub mod config;
pub mod error;
pub mod output;

// Re-export the most commonly used items at the crate root.
pub use args::{ArgBag, ArgValue};
pub use cancel::CancelFlag;
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use output::Encoded;
