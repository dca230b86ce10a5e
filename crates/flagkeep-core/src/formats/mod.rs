//! # Formats Module
//!
//! Binary record format for persisted [`FeatureState`](crate::FeatureState)s.
//!
//! This module only handles format conversion (pure transformations).
//! Where the bytes live is a backend concern (see [`crate::storage`]).

mod persistence;

pub use persistence::*;
