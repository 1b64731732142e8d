//! Flutter-facing bindings for the CoinFlipr core.

pub mod api;
