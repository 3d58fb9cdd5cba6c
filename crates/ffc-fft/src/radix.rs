//! Bundled library under test: a radix-2 provider.
//!
//! Stands where a real subject library would sit behind the contract.
//! Power-of-two sizes only, f32 butterflies, twiddle tables built at plan
//! time. The 3-bit flag space selects genuinely distinct, numerically
//! equivalent execution paths so a flag sweep exercises more than one
//! kernel. 2D plans take width-major arguments and real-input plans produce
//! the full-length spectrum, conjugate half included.

use std::f64::consts::PI;

use crate::buffer::SignalBuffer;
use crate::plan::{AxisOrder, FftError, FftPlan, FftProvider, SpectrumLayout};
use crate::{Complex32, Direction, PlanFlags, complex_add, complex_mul};

#[derive(Debug, Default)]
pub struct RadixFft;

impl RadixFft {
    /// Recompute twiddles per stage instead of reading the plan table.
    pub const FLAG_RECOMPUTE_TWIDDLES: u8 = 1 << 0;
    /// Use the recursive decomposition instead of the iterative kernel.
    pub const FLAG_RECURSIVE: u8 = 1 << 1;
}

#[derive(Debug, Clone, Copy)]
enum RadixKind {
    C2c1d { n: usize },
    R2c1d { n: usize },
    /// `cols` is the leading (width-major) argument, the contiguous dimension.
    C2c2d { cols: usize, rows: usize },
}

struct RadixPlan {
    kind: RadixKind,
    direction: Direction,
    flags: PlanFlags,
    /// Table for the 1D length, or the contiguous dimension of a 2D plan.
    twiddles_primary: Option<Vec<Complex32>>,
    /// Table for the strided dimension of a 2D plan.
    twiddles_secondary: Option<Vec<Complex32>>,
}

impl FftProvider for RadixFft {
    fn name(&self) -> &'static str {
        "radix-fft"
    }

    fn axis_order(&self) -> AxisOrder {
        AxisOrder::WidthMajor
    }

    fn spectrum_layout(&self) -> SpectrumLayout {
        SpectrumLayout::Full
    }

    fn create_plan_1d(
        &self,
        n: usize,
        direction: Direction,
        flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError> {
        ensure_radix_size(n)?;
        Ok(Box::new(RadixPlan::new(
            RadixKind::C2c1d { n },
            direction,
            flags,
        )))
    }

    fn create_plan_1d_real(
        &self,
        n: usize,
        flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError> {
        ensure_radix_size(n)?;
        Ok(Box::new(RadixPlan::new(
            RadixKind::R2c1d { n },
            Direction::Forward,
            flags,
        )))
    }

    fn create_plan_2d(
        &self,
        leading: usize,
        trailing: usize,
        direction: Direction,
        flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError> {
        ensure_radix_size(leading)?;
        ensure_radix_size(trailing)?;
        Ok(Box::new(RadixPlan::new(
            RadixKind::C2c2d {
                cols: leading,
                rows: trailing,
            },
            direction,
            flags,
        )))
    }
}

impl RadixPlan {
    fn new(kind: RadixKind, direction: Direction, flags: PlanFlags) -> Self {
        let sign = direction.sign();
        let build_tables = !flags.contains(RadixFft::FLAG_RECOMPUTE_TWIDDLES)
            && !flags.contains(RadixFft::FLAG_RECURSIVE);
        let (twiddles_primary, twiddles_secondary) = if build_tables {
            match kind {
                RadixKind::C2c1d { n } | RadixKind::R2c1d { n } => {
                    (Some(twiddle_table(n, sign)), None)
                }
                RadixKind::C2c2d { cols, rows } => {
                    (Some(twiddle_table(cols, sign)), Some(twiddle_table(rows, sign)))
                }
            }
        } else {
            (None, None)
        };
        Self {
            kind,
            direction,
            flags,
            twiddles_primary,
            twiddles_secondary,
        }
    }

    fn transform_line(&self, data: &mut [Complex32], table: Option<&[Complex32]>) {
        let sign = self.direction.sign();
        if self.flags.contains(RadixFft::FLAG_RECURSIVE) {
            let transformed = fft_recursive(data, sign);
            data.copy_from_slice(&transformed);
        } else {
            fft_iterative(data, sign, table);
        }
    }
}

impl FftPlan for RadixPlan {
    fn input_len(&self) -> usize {
        match self.kind {
            RadixKind::C2c1d { n } | RadixKind::R2c1d { n } => n,
            RadixKind::C2c2d { cols, rows } => cols * rows,
        }
    }

    fn output_len(&self) -> usize {
        match self.kind {
            RadixKind::C2c1d { n } => n,
            RadixKind::R2c1d { n } => SpectrumLayout::Full.r2c_output_len(n),
            RadixKind::C2c2d { cols, rows } => cols * rows,
        }
    }

    fn execute(&self, input: &SignalBuffer, output: &mut SignalBuffer) -> Result<(), FftError> {
        match self.kind {
            RadixKind::C2c1d { n } => {
                let src = input.try_complex(n)?;
                let dst = output.try_complex_mut(n)?;
                dst.copy_from_slice(src);
                self.transform_line(dst, self.twiddles_primary.as_deref());
            }
            RadixKind::R2c1d { n } => {
                let src = input.try_real(n)?;
                let dst = output.try_complex_mut(n)?;
                for (slot, &re) in dst.iter_mut().zip(src) {
                    *slot = (re, 0.0);
                }
                self.transform_line(dst, self.twiddles_primary.as_deref());
            }
            RadixKind::C2c2d { cols, rows } => {
                let src = input.try_complex(cols * rows)?;
                let dst = output.try_complex_mut(cols * rows)?;
                dst.copy_from_slice(src);
                for row in 0..rows {
                    let base = row * cols;
                    self.transform_line(
                        &mut dst[base..base + cols],
                        self.twiddles_primary.as_deref(),
                    );
                }
                let mut scratch = vec![(0.0, 0.0); rows];
                for col in 0..cols {
                    for (row, slot) in scratch.iter_mut().enumerate() {
                        *slot = dst[row * cols + col];
                    }
                    self.transform_line(&mut scratch, self.twiddles_secondary.as_deref());
                    for (row, &value) in scratch.iter().enumerate() {
                        dst[row * cols + col] = value;
                    }
                }
            }
        }
        Ok(())
    }
}

fn ensure_radix_size(n: usize) -> Result<(), FftError> {
    if n < 2 || !n.is_power_of_two() {
        return Err(FftError::UnsupportedSize {
            n,
            detail: "size must be a power of two and at least 2",
        });
    }
    Ok(())
}

/// `table[k] = e^{sign·i·2πk/n}` for `k` in `0..n/2`. Angles evaluated in
/// f64, stored as f32.
fn twiddle_table(n: usize, sign: f64) -> Vec<Complex32> {
    (0..n / 2)
        .map(|k| twiddle(sign, k as f64 / n as f64))
        .collect()
}

fn twiddle(sign: f64, fraction: f64) -> Complex32 {
    let angle = sign * 2.0 * PI * fraction;
    (angle.cos() as f32, angle.sin() as f32)
}

/// Iterative bit-reversed radix-2 decimation in time.
fn fft_iterative(data: &mut [Complex32], sign: f64, table: Option<&[Complex32]>) {
    let n = data.len();
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if i < j {
            data.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let stride = n / len;
        for base in (0..n).step_by(len) {
            for j in 0..half {
                let w = match table {
                    Some(entries) => entries[j * stride],
                    None => twiddle(sign, j as f64 / len as f64),
                };
                let a = data[base + j];
                let b = complex_mul(data[base + j + half], w);
                data[base + j] = complex_add(a, b);
                data[base + j + half] = (a.0 - b.0, a.1 - b.1);
            }
        }
        len <<= 1;
    }
}

/// Recursive even/odd split, twiddles computed on the fly.
fn fft_recursive(data: &[Complex32], sign: f64) -> Vec<Complex32> {
    let n = data.len();
    if n == 1 {
        return data.to_vec();
    }
    let even: Vec<Complex32> = data.iter().step_by(2).copied().collect();
    let odd: Vec<Complex32> = data.iter().skip(1).step_by(2).copied().collect();
    let even = fft_recursive(&even, sign);
    let odd = fft_recursive(&odd, sign);

    let mut output = vec![(0.0, 0.0); n];
    for k in 0..n / 2 {
        let t = complex_mul(odd[k], twiddle(sign, k as f64 / n as f64));
        output[k] = complex_add(even[k], t);
        output[k + n / 2] = (even[k].0 - t.0, even[k].1 - t.1);
    }
    output
}
