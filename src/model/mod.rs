//! The platform-independent attribute record and its date type.

pub mod attributes;
pub mod date;

pub use attributes::{Attributes, Field};
pub use date::FileDate;
