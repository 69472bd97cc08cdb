//! Read-only data quality auditing.

mod auditor;
pub mod checks;
mod config;
mod render;
mod report;

pub use auditor::Auditor;
pub use config::AuditConfig;
pub use render::render;
pub use report::{
    AuditReport, Cardinality, Duplicates, Grade, LowVariance, MissingValues, OutlierSummary, Shape,
    StringProblems, SuspectValues,
};
