use crate::Complex32;
use crate::plan::FftError;

/// Owned sample storage fed to and produced by collaborator plans.
///
/// Allocation and release follow Rust ownership: every buffer created for a
/// case is dropped on every exit path, passing or failing.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalBuffer {
    Real(Vec<f32>),
    Complex(Vec<Complex32>),
}

impl SignalBuffer {
    /// Zero-initialized real buffer of `len` samples.
    #[must_use]
    pub fn real(len: usize) -> Self {
        Self::Real(vec![0.0; len])
    }

    /// Zero-initialized complex buffer of `len` samples.
    #[must_use]
    pub fn complex(len: usize) -> Self {
        Self::Complex(vec![(0.0, 0.0); len])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Real(samples) => samples.len(),
            Self::Complex(samples) => samples.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_real(&self) -> Option<&[f32]> {
        match self {
            Self::Real(samples) => Some(samples),
            Self::Complex(_) => None,
        }
    }

    #[must_use]
    pub fn as_complex(&self) -> Option<&[Complex32]> {
        match self {
            Self::Complex(samples) => Some(samples),
            Self::Real(_) => None,
        }
    }

    pub fn as_real_mut(&mut self) -> Option<&mut [f32]> {
        match self {
            Self::Real(samples) => Some(samples),
            Self::Complex(_) => None,
        }
    }

    pub fn as_complex_mut(&mut self) -> Option<&mut [Complex32]> {
        match self {
            Self::Complex(samples) => Some(samples),
            Self::Real(_) => None,
        }
    }

    /// Complex view checked against the length a plan expects.
    pub fn try_complex(&self, len: usize) -> Result<&[Complex32], FftError> {
        let samples = self
            .as_complex()
            .ok_or(FftError::SampleKindMismatch { expected: "complex" })?;
        check_len(samples.len(), len)?;
        Ok(samples)
    }

    pub fn try_complex_mut(&mut self, len: usize) -> Result<&mut [Complex32], FftError> {
        let samples = self
            .as_complex_mut()
            .ok_or(FftError::SampleKindMismatch { expected: "complex" })?;
        check_len(samples.len(), len)?;
        Ok(samples)
    }

    /// Real view checked against the length a plan expects.
    pub fn try_real(&self, len: usize) -> Result<&[f32], FftError> {
        let samples = self
            .as_real()
            .ok_or(FftError::SampleKindMismatch { expected: "real" })?;
        check_len(samples.len(), len)?;
        Ok(samples)
    }

    /// Verbatim copy from `source`. Both buffers must already have the same
    /// kind and length; the harness relies on this to guarantee both
    /// collaborators see byte-identical input.
    pub fn copy_from(&mut self, source: &Self) -> Result<(), FftError> {
        if self.len() != source.len() {
            return Err(FftError::LengthMismatch {
                expected: self.len(),
                actual: source.len(),
            });
        }
        match (self, source) {
            (Self::Real(dst), Self::Real(src)) => {
                dst.copy_from_slice(src);
                Ok(())
            }
            (Self::Complex(dst), Self::Complex(src)) => {
                dst.copy_from_slice(src);
                Ok(())
            }
            (Self::Real(_), Self::Complex(_)) => {
                Err(FftError::SampleKindMismatch { expected: "real" })
            }
            (Self::Complex(_), Self::Real(_)) => {
                Err(FftError::SampleKindMismatch { expected: "complex" })
            }
        }
    }

    /// Little-endian byte image of the samples. Used by the harness to
    /// fingerprint generated inputs for determinism evidence.
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Self::Real(samples) => samples
                .iter()
                .flat_map(|value| value.to_le_bytes())
                .collect(),
            Self::Complex(samples) => samples
                .iter()
                .flat_map(|&(re, im)| {
                    let mut bytes = [0_u8; 8];
                    bytes[..4].copy_from_slice(&re.to_le_bytes());
                    bytes[4..].copy_from_slice(&im.to_le_bytes());
                    bytes
                })
                .collect(),
        }
    }
}

fn check_len(actual: usize, expected: usize) -> Result<(), FftError> {
    if actual != expected {
        return Err(FftError::LengthMismatch { expected, actual });
    }
    Ok(())
}
