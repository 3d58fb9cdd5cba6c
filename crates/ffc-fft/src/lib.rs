#![forbid(unsafe_code)]

//! Collaborator contract for the FFT conformance harness.
//!
//! Both sides of a conformance comparison — the library under test and the
//! trusted reference — are reached exclusively through the traits in this
//! crate. The harness never sees transform internals, only plans.
//!
//! ## Module layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | `plan`      | [`TransformDescriptor`], [`FftProvider`]/[`FftPlan`] traits |
//! | `buffer`    | [`SignalBuffer`] sample storage                             |
//! | `radix`     | [`RadixFft`], radix-2 provider (subject side)               |
//! | `reference` | [`ReferenceDft`], naive f64 DFT provider (reference side)   |

pub mod buffer;
pub mod plan;
pub mod radix;
pub mod reference;

pub use buffer::SignalBuffer;
pub use plan::{
    AxisOrder, FftError, FftPlan, FftProvider, SpectrumLayout, TransformDescriptor,
};
pub use radix::RadixFft;
pub use reference::ReferenceDft;

use serde::{Deserialize, Serialize};

/// Sample representation shared by both sides of the comparison.
pub type Complex32 = (f32, f32);

/// Transform direction. The wire values match the usual sign convention:
/// forward applies `e^{-i2πkt/N}`, inverse applies `e^{+i2πkt/N}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    pub const BOTH: [Self; 2] = [Self::Forward, Self::Inverse];

    /// Exponent sign: -1 forward, +1 inverse.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => -1.0,
            Self::Inverse => 1.0,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Inverse => "inverse",
        }
    }
}

/// Transform shapes exercised by the harness. The serde wire form matches
/// [`TransformKind::name`] so report consumers see one spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformKind {
    #[serde(rename = "c2c_1d")]
    C2c1d,
    #[serde(rename = "r2c_1d")]
    R2c1d,
    #[serde(rename = "c2c_2d")]
    C2c2d,
}

impl TransformKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::C2c1d => "c2c_1d",
            Self::R2c1d => "r2c_1d",
            Self::C2c2d => "c2c_2d",
        }
    }
}

/// 3-bit provider configuration bitmask. Bit semantics belong to the
/// provider, not the harness; the harness only sweeps the value space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PlanFlags(u8);

impl PlanFlags {
    /// Mask of the configuration bits a provider may interpret.
    pub const VARIANT_MASK: u8 = 0b111;

    #[must_use]
    pub const fn new(bits: u8) -> Self {
        Self(bits & Self::VARIANT_MASK)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    /// Every value in the 3-bit configuration space, ascending.
    pub fn variants() -> impl Iterator<Item = Self> {
        (0..=Self::VARIANT_MASK).map(Self::new)
    }
}

pub(crate) fn complex_add(lhs: Complex32, rhs: Complex32) -> Complex32 {
    (lhs.0 + rhs.0, lhs.1 + rhs.1)
}

pub(crate) fn complex_mul(lhs: Complex32, rhs: Complex32) -> Complex32 {
    (lhs.0 * rhs.0 - lhs.1 * rhs.1, lhs.0 * rhs.1 + lhs.1 * rhs.0)
}

/// Complex difference magnitude, `|lhs - rhs|`.
#[must_use]
pub fn complex_delta(lhs: Complex32, rhs: Complex32) -> f32 {
    let re = lhs.0 - rhs.0;
    let im = lhs.1 - rhs.1;
    re.hypot(im)
}

/// Complex conjugate.
#[must_use]
pub fn complex_conj(value: Complex32) -> Complex32 {
    (value.0, -value.1)
}

#[cfg(test)]
mod tests {
    use super::{Complex32, Direction, PlanFlags, TransformKind, complex_conj, complex_delta};

    #[test]
    fn direction_signs_match_wire_convention() {
        assert_eq!(Direction::Forward.sign(), -1.0);
        assert_eq!(Direction::Inverse.sign(), 1.0);
    }

    #[test]
    fn plan_flags_mask_to_three_bits() {
        assert_eq!(PlanFlags::new(0xFF).bits(), 0b111);
        assert_eq!(PlanFlags::variants().count(), 8);
        assert!(PlanFlags::new(0b101).contains(0b100));
        assert!(!PlanFlags::new(0b101).contains(0b010));
    }

    #[test]
    fn transform_kind_names_are_stable() {
        assert_eq!(TransformKind::C2c1d.name(), "c2c_1d");
        assert_eq!(TransformKind::R2c1d.name(), "r2c_1d");
        assert_eq!(TransformKind::C2c2d.name(), "c2c_2d");
    }

    #[test]
    fn transform_kind_serializes_as_its_name() {
        for kind in [
            TransformKind::C2c1d,
            TransformKind::R2c1d,
            TransformKind::C2c2d,
        ] {
            let json = serde_json::to_value(kind).expect("serialize");
            assert_eq!(json, kind.name());
        }
    }

    #[test]
    fn complex_delta_is_euclidean() {
        let a: Complex32 = (1.0, 2.0);
        let b: Complex32 = (4.0, 6.0);
        assert!((complex_delta(a, b) - 5.0).abs() < 1e-6);
        assert_eq!(complex_conj((1.0, 2.0)), (1.0, -2.0));
    }
}
