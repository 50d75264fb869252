//! Audit trail for evaluation calls.

mod logging;

pub use logging::{AuditRecord, AuditSummary, LoggingWrapper};
