//! Trip point records, reference data and the enums shared by the model and board layers.

pub mod domain;
pub mod error;
pub mod protocol;
