//! Lifecycle orchestration services.

mod orchestrator;

pub use orchestrator::{
    AdminAction, AdminDecision, CompletionSweep, DecisionOutcome, JobLifecycleError,
    JobLifecycleResult, JobLifecycleService, OpenedJob,
};
