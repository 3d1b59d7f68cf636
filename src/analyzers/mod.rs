//! Grade aggregation and rule-based insights.
//!
//! [`aggregate`] turns extracted courses into per-semester and total
//! rank-grade averages; [`insights`] derives deterministic observations from
//! a finished record.

pub mod aggregate;
pub mod insights;
pub mod types;
pub mod utility;
