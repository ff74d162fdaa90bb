//! API schema types for request/response definitions.
//!
//! Request types derive `Deserialize`, response types derive `Serialize`.

pub mod algorithms;
pub mod sessions;
