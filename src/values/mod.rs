//! Scalar encodings for the API's JSON quirks.

mod date;
mod id;
mod money;
mod numeric_list;
mod relationship;

pub use date::{Date, LegacyDate, Time};
pub use id::{zero_as_none, LegacyNumber};
pub use money::{Currency, Money};
pub use numeric_list::{join_ids, LegacyNumericList};
pub use relationship::Relationship;
