//! Deterministic pseudorandom input generation.
//!
//! A fresh generator value is constructed from the configured seed
//! immediately before each case, so cases carry no hidden state and two
//! runs of the same parameters produce bit-identical buffers.

use ffc_fft::{SignalBuffer, TransformDescriptor, TransformKind};

/// Explicit xorshift64 generator. State is never global; each case owns one.
#[derive(Debug, Clone)]
pub struct SignalRng {
    state: u64,
}

impl SignalRng {
    /// xorshift64 requires nonzero state.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut state = self.state;
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        self.state = state;
        state
    }

    /// Uniform sample in [-0.5, 0.5). Top 24 bits land exactly on the f32
    /// grid, so both the mapping and the shift are exact and the interval
    /// stays half-open even for an all-ones generator word.
    pub fn next_sample(&mut self) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1_u64 << 24) as f32;
        unit - 0.5
    }

    /// Fill a buffer in index order: real buffers take one draw per sample,
    /// complex buffers draw real then imaginary per sample.
    pub fn fill(&mut self, buffer: &mut SignalBuffer) {
        match buffer {
            SignalBuffer::Real(samples) => {
                for slot in samples.iter_mut() {
                    *slot = self.next_sample();
                }
            }
            SignalBuffer::Complex(samples) => {
                for slot in samples.iter_mut() {
                    let re = self.next_sample();
                    let im = self.next_sample();
                    *slot = (re, im);
                }
            }
        }
    }
}

/// Build the input buffer for one case from a freshly seeded generator.
#[must_use]
pub fn generate_input(descriptor: &TransformDescriptor, seed: u64) -> SignalBuffer {
    let total = descriptor.total_samples();
    let mut buffer = match descriptor.kind {
        TransformKind::R2c1d => SignalBuffer::real(total),
        TransformKind::C2c1d | TransformKind::C2c2d => SignalBuffer::complex(total),
    };
    let mut rng = SignalRng::from_seed(seed);
    rng.fill(&mut buffer);
    buffer
}

/// blake3 hex digest of the buffer's little-endian byte image. Recorded per
/// case so input determinism is auditable across runs.
#[must_use]
pub fn input_fingerprint(buffer: &SignalBuffer) -> String {
    blake3::hash(&buffer.to_le_bytes()).to_hex().to_string()
}
