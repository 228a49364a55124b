//! Kit explosion.
//!
//! Expands a kit into a flat, order-preserving list of breakout rows with
//! quantities propagated down every level, plus grand totals per leaf item.
//!
//! Two call shapes are provided:
//! - [`explode_catalog`]: every catalog root once, multiplier 1
//! - [`explode_order`]: the kits on one order, multiplied by the ordered
//!   quantity, with a totals section
//!
//! Explosion never fails on bad data. Unresolved nested kits are leaves,
//! unparsable quantities are 0, and cancellation is returned as
//! [`Outcome::Cancelled`](crate::scheduler::Outcome::Cancelled).

mod catalog;
mod engine;
mod order;

pub use catalog::{catalog_roots, explode_catalog};
pub use engine::{explode, explode_into, Explosion, ExplosionStats};
pub use order::{explode_order, OrderBreakout};
