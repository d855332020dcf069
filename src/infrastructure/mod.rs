//! Infrastructure layer.
//!
//! Hosts concerns that sit outside the domain but are not persistence
//! adapters, currently hierarchical configuration loading.

pub mod config;
