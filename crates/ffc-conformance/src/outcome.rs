//! Structured per-case outcomes and the aggregate sweep report.
//!
//! A mismatch is data, not a process abort: every case yields a
//! [`CaseOutcome`] and the sweep aggregates them into a [`SweepSummary`]
//! reported at the end of the run.

use ffc_fft::TransformDescriptor;
use serde::{Deserialize, Serialize};

use crate::SweepConfig;

/// Why a case failed. Mirrors the harness failure taxonomy; allocation
/// failure has no recoverable representation in safe Rust and is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    PlanCreation {
        provider: String,
        detail: String,
    },
    Execution {
        provider: String,
        detail: String,
    },
    ToleranceExceeded {
        index: usize,
        delta: f32,
        tolerance: f32,
    },
    SymmetryViolation {
        index: usize,
        delta: f32,
        tolerance: f32,
    },
}

impl FailureKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlanCreation { .. } => "plan_creation",
            Self::Execution { .. } => "execution",
            Self::ToleranceExceeded { .. } => "tolerance_exceeded",
            Self::SymmetryViolation { .. } => "symmetry_violation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseStatus {
    Pass,
    Fail { failure: FailureKind },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub descriptor: TransformDescriptor,
    #[serde(flatten)]
    pub status: CaseStatus,
    pub tolerance: f32,
    /// Largest elementwise delta observed against the reference, also
    /// recorded for passing cases to support regression triage.
    pub max_delta: f32,
    pub input_fingerprint: String,
    pub duration_us: u128,
}

impl CaseOutcome {
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self.status, CaseStatus::Pass)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub run_id: String,
    pub subject: String,
    pub reference: String,
    pub config: SweepConfig,
    pub total_cases: usize,
    pub passed_cases: usize,
    pub failed_cases: usize,
    pub outcomes: Vec<CaseOutcome>,
}

impl SweepSummary {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_cases == 0
    }

    /// Failing outcomes only, in enumeration order.
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed())
    }
}
