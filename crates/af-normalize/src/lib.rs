//! af-normalize: maps raw stage payloads onto the canonical report model.
//!
//! Every canonical field is declared once in [`fields`], with its ordered
//! alias chain, unit, default and derived companion. [`normalize`] is a pure
//! function of its input.

pub mod fields;
pub mod model;
pub mod normalize;
pub mod payload;

pub use fields::{FieldDefault, FieldSpec, alias_table};
pub use model::*;
pub use normalize::normalize;
