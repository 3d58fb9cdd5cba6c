//! Tolerance-scaled output comparison.

use ffc_fft::{Complex32, complex_conj, complex_delta};

use crate::outcome::FailureKind;

/// Result of scanning one check over a pair of outputs. The whole span is
/// always scanned so `max_delta` is meaningful even on failure; the
/// violation records the first offending index.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub max_delta: f32,
    pub violation: Option<FailureKind>,
}

impl Comparison {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violation.is_none()
    }
}

/// Elementwise check over `span` bins: `|tested[i] - reference[i]| < tolerance`.
#[must_use]
pub fn compare_elementwise(
    tested: &[Complex32],
    reference: &[Complex32],
    span: usize,
    tolerance: f32,
) -> Comparison {
    let mut max_delta = 0.0_f32;
    let mut violation = None;
    for (index, (&lhs, &rhs)) in tested.iter().zip(reference).take(span).enumerate() {
        let delta = complex_delta(lhs, rhs);
        max_delta = max_delta.max(delta);
        if delta >= tolerance && violation.is_none() {
            violation = Some(FailureKind::ToleranceExceeded {
                index,
                delta,
                tolerance,
            });
        }
    }
    Comparison {
        max_delta,
        violation,
    }
}

/// Hermitian self-consistency of a real signal's full-length spectrum: for
/// i in [1, N/2), bin N-i must be the conjugate of bin i, checked per
/// component. Validates the tested output against itself; the packed
/// reference never stores the mirrored half.
#[must_use]
pub fn check_hermitian(output: &[Complex32], tolerance: f32) -> Comparison {
    let n = output.len();
    let mut max_delta = 0.0_f32;
    let mut violation = None;
    for i in 1..n / 2 {
        let expected = complex_conj(output[n - i]);
        let re_delta = (output[i].0 - expected.0).abs();
        let im_delta = (output[i].1 - expected.1).abs();
        let delta = re_delta.max(im_delta);
        max_delta = max_delta.max(delta);
        if (re_delta >= tolerance || im_delta >= tolerance) && violation.is_none() {
            violation = Some(FailureKind::SymmetryViolation {
                index: i,
                delta,
                tolerance,
            });
        }
    }
    Comparison {
        max_delta,
        violation,
    }
}
