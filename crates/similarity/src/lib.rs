//! Token-set similarity for FAQ matching.
//!
//! Every distinct token is assigned a compact [`TokenId`] by a shared
//! [`TokenCatalog`]. A text becomes a [`TokenSet`] (a roaring bitmap of IDs)
//! and two sets are compared with the Dice coefficient.

mod catalog;
mod index;

pub use crate::catalog::{TokenCatalog, TokenId};
pub use crate::index::{dice, round_confidence, SimilarityIndex, TokenSet};
