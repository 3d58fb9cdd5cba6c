use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::buffer::SignalBuffer;
use crate::{Direction, PlanFlags, TransformKind};

/// Immutable description of one conformance case: what to transform, which
/// way, and under which provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformDescriptor {
    pub kind: TransformKind,
    pub nx: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ny: Option<usize>,
    pub direction: Direction,
    pub flags: PlanFlags,
}

impl TransformDescriptor {
    #[must_use]
    pub fn c2c_1d(n: usize, direction: Direction, flags: PlanFlags) -> Self {
        Self {
            kind: TransformKind::C2c1d,
            nx: n,
            ny: None,
            direction,
            flags,
        }
    }

    /// Real-input transforms are forward-only in this harness.
    #[must_use]
    pub fn r2c_1d(n: usize, flags: PlanFlags) -> Self {
        Self {
            kind: TransformKind::R2c1d,
            nx: n,
            ny: None,
            direction: Direction::Forward,
            flags,
        }
    }

    #[must_use]
    pub fn c2c_2d(nx: usize, ny: usize, direction: Direction, flags: PlanFlags) -> Self {
        Self {
            kind: TransformKind::C2c2d,
            nx,
            ny: Some(ny),
            direction,
            flags,
        }
    }

    /// Total sample count: N for 1D, Nx×Ny for 2D. Drives tolerance scaling.
    #[must_use]
    pub fn total_samples(&self) -> usize {
        self.nx * self.ny.unwrap_or(1)
    }

    /// Short human-readable form used in logs and failure reports.
    #[must_use]
    pub fn label(&self) -> String {
        match self.ny {
            Some(ny) => format!(
                "{} nx={} ny={} dir={} flags={}",
                self.kind.name(),
                self.nx,
                ny,
                self.direction.name(),
                self.flags.bits()
            ),
            None => format!(
                "{} n={} dir={} flags={}",
                self.kind.name(),
                self.nx,
                self.direction.name(),
                self.flags.bits()
            ),
        }
    }
}

/// Which logical dimension a provider expects first when planning a 2D
/// transform. Width-major providers take the contiguous dimension first
/// (mufft style); height-major providers take the row count first (FFTW
/// style). [`AxisOrder::plan_args`] is the single translation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    WidthMajor,
    HeightMajor,
}

impl AxisOrder {
    /// Normalize logical `(width, height)` into this provider's
    /// `(leading, trailing)` plan-argument order.
    #[must_use]
    pub fn plan_args(self, width: usize, height: usize) -> (usize, usize) {
        match self {
            Self::WidthMajor => (width, height),
            Self::HeightMajor => (height, width),
        }
    }
}

/// How a provider lays out the spectrum of a real-input transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectrumLayout {
    /// All N bins, redundant conjugate half included.
    Full,
    /// First N/2+1 bins only.
    Packed,
}

impl SpectrumLayout {
    #[must_use]
    pub fn r2c_output_len(self, n: usize) -> usize {
        match self {
            Self::Full => n,
            Self::Packed => n / 2 + 1,
        }
    }
}

/// Contract-level failures surfaced by providers and buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FftError {
    UnsupportedSize { n: usize, detail: &'static str },
    LengthMismatch { expected: usize, actual: usize },
    SampleKindMismatch { expected: &'static str },
}

impl Display for FftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedSize { n, detail } => {
                write!(f, "unsupported transform size {n}: {detail}")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "buffer length mismatch: expected {expected}, got {actual}")
            }
            Self::SampleKindMismatch { expected } => {
                write!(f, "sample kind mismatch: expected {expected} samples")
            }
        }
    }
}

impl std::error::Error for FftError {}

/// One side of a conformance comparison. Mirrors the C plan/execute/destroy
/// surface; destruction is `Drop`, so a plan is released on every exit path.
pub trait FftProvider {
    fn name(&self) -> &'static str;

    /// 2D plan-argument order this provider expects.
    fn axis_order(&self) -> AxisOrder;

    /// Real-input spectrum layout this provider produces.
    fn spectrum_layout(&self) -> SpectrumLayout;

    fn create_plan_1d(
        &self,
        n: usize,
        direction: Direction,
        flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError>;

    fn create_plan_1d_real(&self, n: usize, flags: PlanFlags)
    -> Result<Box<dyn FftPlan>, FftError>;

    /// `leading`/`trailing` are in this provider's own [`AxisOrder`]; callers
    /// translate from logical width/height via [`AxisOrder::plan_args`].
    fn create_plan_2d(
        &self,
        leading: usize,
        trailing: usize,
        direction: Direction,
        flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError>;
}

/// A compiled plan, bound to exactly one descriptor shape. Execution is
/// out-of-place; the caller provides distinct input and output buffers.
pub trait FftPlan {
    fn input_len(&self) -> usize;
    fn output_len(&self) -> usize;
    fn execute(&self, input: &SignalBuffer, output: &mut SignalBuffer) -> Result<(), FftError>;
}
