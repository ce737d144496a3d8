//! GDE/UnB structural deterioration grading for bridge inspections.
//!
//! Pipeline: inspection sheet → [`gde::normalize`] → [`gde::evaluate_elements`]
//! → [`gde::evaluate_family`] → [`gde::evaluate_structure`].

pub mod browser;
pub mod config;
pub mod evaluate;
pub mod gde;
pub mod ingest;
pub mod output;
pub mod report;
pub mod stderr_buffer;
