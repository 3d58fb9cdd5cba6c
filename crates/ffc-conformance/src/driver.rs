//! Dual execution: one descriptor, two collaborators, two outputs.

use std::time::Instant;

use ffc_fft::{
    FftError, FftPlan, FftProvider, SignalBuffer, SpectrumLayout, TransformDescriptor,
    TransformKind,
};

use crate::comparator::{check_hermitian, compare_elementwise};
use crate::generator::{generate_input, input_fingerprint};
use crate::outcome::{CaseOutcome, CaseStatus, FailureKind};
use crate::{SweepConfig, tolerance};

/// Drives one case end to end: generate input, plan both sides, copy the
/// input verbatim into each, execute sequentially, compare. All buffers and
/// plans are scoped to the call, so they are released on every exit path.
pub struct DualExecutionDriver<'a> {
    subject: &'a dyn FftProvider,
    reference: &'a dyn FftProvider,
}

impl<'a> DualExecutionDriver<'a> {
    #[must_use]
    pub fn new(subject: &'a dyn FftProvider, reference: &'a dyn FftProvider) -> Self {
        Self { subject, reference }
    }

    #[must_use]
    pub fn subject_name(&self) -> &'static str {
        self.subject.name()
    }

    #[must_use]
    pub fn reference_name(&self) -> &'static str {
        self.reference.name()
    }

    /// Execute one conformance case and fold the result into an outcome.
    #[must_use]
    pub fn run_case(&self, descriptor: &TransformDescriptor, config: &SweepConfig) -> CaseOutcome {
        let started = Instant::now();
        let input = generate_input(descriptor, config.seed);
        let fingerprint = input_fingerprint(&input);
        let case_tolerance = tolerance(config.base_epsilon, descriptor.total_samples());

        let (status, max_delta) = match self.execute_both(descriptor, &input) {
            Ok((tested, reference)) => {
                self.compare_outputs(descriptor, &tested, &reference, case_tolerance)
            }
            Err(failure) => (CaseStatus::Fail { failure }, 0.0),
        };

        CaseOutcome {
            descriptor: descriptor.clone(),
            status,
            tolerance: case_tolerance,
            max_delta,
            input_fingerprint: fingerprint,
            duration_us: started.elapsed().as_micros(),
        }
    }

    fn execute_both(
        &self,
        descriptor: &TransformDescriptor,
        input: &SignalBuffer,
    ) -> Result<(SignalBuffer, SignalBuffer), FailureKind> {
        let tested = self.execute_one(self.subject, descriptor, input)?;
        let reference = self.execute_one(self.reference, descriptor, input)?;
        Ok((tested, reference))
    }

    fn execute_one(
        &self,
        provider: &dyn FftProvider,
        descriptor: &TransformDescriptor,
        input: &SignalBuffer,
    ) -> Result<SignalBuffer, FailureKind> {
        let plan = plan_for(provider, descriptor).map_err(|error| FailureKind::PlanCreation {
            provider: provider.name().to_owned(),
            detail: error.to_string(),
        })?;

        // Each collaborator receives its own byte-identical copy of the
        // generated input, never a shared view.
        let mut own_input = match input {
            SignalBuffer::Real(samples) => SignalBuffer::real(samples.len()),
            SignalBuffer::Complex(samples) => SignalBuffer::complex(samples.len()),
        };
        own_input
            .copy_from(input)
            .map_err(|error| execution_failure(provider, &error))?;

        let mut output = SignalBuffer::complex(plan.output_len());
        plan.execute(&own_input, &mut output)
            .map_err(|error| execution_failure(provider, &error))?;
        Ok(output)
    }

    fn compare_outputs(
        &self,
        descriptor: &TransformDescriptor,
        tested: &SignalBuffer,
        reference: &SignalBuffer,
        case_tolerance: f32,
    ) -> (CaseStatus, f32) {
        let tested_bins = tested.as_complex().unwrap_or(&[]);
        let reference_bins = reference.as_complex().unwrap_or(&[]);

        let span = match descriptor.kind {
            TransformKind::C2c1d | TransformKind::C2c2d => descriptor.total_samples(),
            // The packed reference only stores the first N/2+1 bins.
            TransformKind::R2c1d => tested_bins.len().min(reference_bins.len()),
        };

        let elementwise = compare_elementwise(tested_bins, reference_bins, span, case_tolerance);
        if let Some(failure) = elementwise.violation {
            return (CaseStatus::Fail { failure }, elementwise.max_delta);
        }

        if descriptor.kind == TransformKind::R2c1d
            && self.subject.spectrum_layout() == SpectrumLayout::Full
        {
            let symmetry = check_hermitian(tested_bins, case_tolerance);
            if let Some(failure) = symmetry.violation {
                return (CaseStatus::Fail { failure }, elementwise.max_delta);
            }
        }

        (CaseStatus::Pass, elementwise.max_delta)
    }
}

/// Translate the descriptor into the provider's plan call, including the 2D
/// width/height argument order the provider expects.
fn plan_for(
    provider: &dyn FftProvider,
    descriptor: &TransformDescriptor,
) -> Result<Box<dyn FftPlan>, FftError> {
    match descriptor.kind {
        TransformKind::C2c1d => {
            provider.create_plan_1d(descriptor.nx, descriptor.direction, descriptor.flags)
        }
        TransformKind::R2c1d => provider.create_plan_1d_real(descriptor.nx, descriptor.flags),
        TransformKind::C2c2d => {
            let ny = descriptor.ny.unwrap_or(descriptor.nx);
            let (leading, trailing) = provider.axis_order().plan_args(descriptor.nx, ny);
            provider.create_plan_2d(leading, trailing, descriptor.direction, descriptor.flags)
        }
    }
}

fn execution_failure(provider: &dyn FftProvider, error: &FftError) -> FailureKind {
    FailureKind::Execution {
        provider: provider.name().to_owned(),
        detail: error.to_string(),
    }
}
