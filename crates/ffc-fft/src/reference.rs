//! Trusted reference collaborator.
//!
//! Naive DFT evaluated in f64 and rounded to f32 on output, so reference
//! roundoff stays far below the comparison tolerance at every swept size.
//! Unscaled in both directions; 2D plans take height-major arguments and
//! real-input plans produce the packed N/2+1 spectrum.

use std::f64::consts::PI;

use crate::buffer::SignalBuffer;
use crate::plan::{AxisOrder, FftError, FftPlan, FftProvider, SpectrumLayout};
use crate::{Complex32, Direction, PlanFlags};

type Complex64 = (f64, f64);

/// Reference library stand-in. Configuration flags are accepted and ignored;
/// flag semantics belong to the library under test.
#[derive(Debug, Default)]
pub struct ReferenceDft;

#[derive(Debug, Clone, Copy)]
enum ReferenceKind {
    C2c1d { n: usize },
    R2c1d { n: usize },
    /// `rows` is the leading (height-major) argument, `cols` the contiguous one.
    C2c2d { rows: usize, cols: usize },
}

struct ReferencePlan {
    kind: ReferenceKind,
    direction: Direction,
}

impl FftProvider for ReferenceDft {
    fn name(&self) -> &'static str {
        "reference-dft"
    }

    fn axis_order(&self) -> AxisOrder {
        AxisOrder::HeightMajor
    }

    fn spectrum_layout(&self) -> SpectrumLayout {
        SpectrumLayout::Packed
    }

    fn create_plan_1d(
        &self,
        n: usize,
        direction: Direction,
        _flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError> {
        ensure_size(n)?;
        Ok(Box::new(ReferencePlan {
            kind: ReferenceKind::C2c1d { n },
            direction,
        }))
    }

    fn create_plan_1d_real(
        &self,
        n: usize,
        _flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError> {
        ensure_size(n)?;
        Ok(Box::new(ReferencePlan {
            kind: ReferenceKind::R2c1d { n },
            direction: Direction::Forward,
        }))
    }

    fn create_plan_2d(
        &self,
        leading: usize,
        trailing: usize,
        direction: Direction,
        _flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError> {
        ensure_size(leading)?;
        ensure_size(trailing)?;
        Ok(Box::new(ReferencePlan {
            kind: ReferenceKind::C2c2d {
                rows: leading,
                cols: trailing,
            },
            direction,
        }))
    }
}

impl FftPlan for ReferencePlan {
    fn input_len(&self) -> usize {
        match self.kind {
            ReferenceKind::C2c1d { n } | ReferenceKind::R2c1d { n } => n,
            ReferenceKind::C2c2d { rows, cols } => rows * cols,
        }
    }

    fn output_len(&self) -> usize {
        match self.kind {
            ReferenceKind::C2c1d { n } => n,
            ReferenceKind::R2c1d { n } => SpectrumLayout::Packed.r2c_output_len(n),
            ReferenceKind::C2c2d { rows, cols } => rows * cols,
        }
    }

    fn execute(&self, input: &SignalBuffer, output: &mut SignalBuffer) -> Result<(), FftError> {
        let sign = self.direction.sign();
        match self.kind {
            ReferenceKind::C2c1d { n } => {
                let src = widen_complex(input.try_complex(n)?);
                let spectrum = dft_1d(&src, sign);
                narrow_into(&spectrum, output.try_complex_mut(n)?);
            }
            ReferenceKind::R2c1d { n } => {
                let src = widen_real(input.try_real(n)?);
                let spectrum = dft_1d(&src, sign);
                let packed = SpectrumLayout::Packed.r2c_output_len(n);
                narrow_into(&spectrum[..packed], output.try_complex_mut(packed)?);
            }
            ReferenceKind::C2c2d { rows, cols } => {
                let mut data = widen_complex(input.try_complex(rows * cols)?);
                dft_rows(&mut data, rows, cols, sign);
                dft_columns(&mut data, rows, cols, sign);
                narrow_into(&data, output.try_complex_mut(rows * cols)?);
            }
        }
        Ok(())
    }
}

fn ensure_size(n: usize) -> Result<(), FftError> {
    if n < 2 {
        return Err(FftError::UnsupportedSize {
            n,
            detail: "transform size must be at least 2",
        });
    }
    Ok(())
}

fn widen_complex(samples: &[Complex32]) -> Vec<Complex64> {
    samples
        .iter()
        .map(|&(re, im)| (f64::from(re), f64::from(im)))
        .collect()
}

fn widen_real(samples: &[f32]) -> Vec<Complex64> {
    samples.iter().map(|&re| (f64::from(re), 0.0)).collect()
}

fn narrow_into(spectrum: &[Complex64], output: &mut [Complex32]) {
    for (dst, &(re, im)) in output.iter_mut().zip(spectrum) {
        *dst = (re as f32, im as f32);
    }
}

/// Unscaled DFT, O(N²). Forward for `sign = -1`, inverse for `sign = +1`.
fn dft_1d(input: &[Complex64], sign: f64) -> Vec<Complex64> {
    let n = input.len();
    let mut output = vec![(0.0, 0.0); n];
    for (k, out) in output.iter_mut().enumerate() {
        let mut acc = (0.0, 0.0);
        for (t, &(re, im)) in input.iter().enumerate() {
            let angle = sign * 2.0 * PI * (k as f64) * (t as f64) / (n as f64);
            let (cos, sin) = (angle.cos(), angle.sin());
            acc.0 += re * cos - im * sin;
            acc.1 += re * sin + im * cos;
        }
        *out = acc;
    }
    output
}

fn dft_rows(data: &mut [Complex64], rows: usize, cols: usize, sign: f64) {
    for row in 0..rows {
        let base = row * cols;
        let transformed = dft_1d(&data[base..base + cols], sign);
        data[base..base + cols].copy_from_slice(&transformed);
    }
}

fn dft_columns(data: &mut [Complex64], rows: usize, cols: usize, sign: f64) {
    let mut scratch = vec![(0.0, 0.0); rows];
    for col in 0..cols {
        for (row, slot) in scratch.iter_mut().enumerate() {
            *slot = data[row * cols + col];
        }
        let transformed = dft_1d(&scratch, sign);
        for (row, &value) in transformed.iter().enumerate() {
            data[row * cols + col] = value;
        }
    }
}
