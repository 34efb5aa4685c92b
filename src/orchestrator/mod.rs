//! Sequential execution of the per-condition probability jobs of one query, with
//! cancellation and a published snapshot of the results.

pub mod error;
pub mod query;
pub mod result;
pub mod settings;
