//! Differential conformance tests: concrete oracle scenarios, reduced full
//! sweeps, injected-defect providers, and run-bundle artifacts.
//!
//! All tests emit structured JSON log lines on stderr.

use std::fs;

use ffc_conformance::{
    CaseStatus, DualExecutionDriver, FailureKind, SweepConfig, run_sweep, run_sweep_with_artifacts,
    tolerance,
};
use ffc_fft::{
    AxisOrder, Direction, FftError, FftPlan, FftProvider, PlanFlags, RadixFft, ReferenceDft,
    SignalBuffer, SpectrumLayout, TransformDescriptor,
};

fn log_case(test_id: &str, case: &str, pass: bool) {
    let line = serde_json::json!({
        "test_id": test_id,
        "module": "ffc_conformance::differential",
        "case": case,
        "result": if pass { "pass" } else { "fail" },
    });
    eprintln!("{line}");
}

fn reduced_config() -> SweepConfig {
    SweepConfig::default().with_size_cap(64)
}

// ── Injected-defect providers ────────────────────────────────────

/// Wraps the radix provider and scales every output bin, so every case
/// exceeds the tolerance.
struct ScaledOutput(RadixFft);

struct ScaledPlan(Box<dyn FftPlan>);

impl FftPlan for ScaledPlan {
    fn input_len(&self) -> usize {
        self.0.input_len()
    }

    fn output_len(&self) -> usize {
        self.0.output_len()
    }

    fn execute(&self, input: &SignalBuffer, output: &mut SignalBuffer) -> Result<(), FftError> {
        self.0.execute(input, output)?;
        if let Some(bins) = output.as_complex_mut() {
            for bin in bins.iter_mut() {
                *bin = (bin.0 * 1.5, bin.1 * 1.5);
            }
        }
        Ok(())
    }
}

impl FftProvider for ScaledOutput {
    fn name(&self) -> &'static str {
        "scaled-radix"
    }

    fn axis_order(&self) -> AxisOrder {
        self.0.axis_order()
    }

    fn spectrum_layout(&self) -> SpectrumLayout {
        self.0.spectrum_layout()
    }

    fn create_plan_1d(
        &self,
        n: usize,
        direction: Direction,
        flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError> {
        Ok(Box::new(ScaledPlan(self.0.create_plan_1d(n, direction, flags)?)))
    }

    fn create_plan_1d_real(
        &self,
        n: usize,
        flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError> {
        Ok(Box::new(ScaledPlan(self.0.create_plan_1d_real(n, flags)?)))
    }

    fn create_plan_2d(
        &self,
        leading: usize,
        trailing: usize,
        direction: Direction,
        flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError> {
        Ok(Box::new(ScaledPlan(
            self.0.create_plan_2d(leading, trailing, direction, flags)?,
        )))
    }
}

/// Corrupts only the mirrored half of real-input spectra: the packed
/// reference never sees those bins, so only the Hermitian check can catch it.
struct BrokenConjugate(RadixFft);

struct BrokenConjugatePlan(Box<dyn FftPlan>);

impl FftPlan for BrokenConjugatePlan {
    fn input_len(&self) -> usize {
        self.0.input_len()
    }

    fn output_len(&self) -> usize {
        self.0.output_len()
    }

    fn execute(&self, input: &SignalBuffer, output: &mut SignalBuffer) -> Result<(), FftError> {
        self.0.execute(input, output)?;
        if let Some(bins) = output.as_complex_mut()
            && let Some(last) = bins.last_mut()
        {
            last.1 += 1.0e-3;
        }
        Ok(())
    }
}

impl FftProvider for BrokenConjugate {
    fn name(&self) -> &'static str {
        "broken-conjugate"
    }

    fn axis_order(&self) -> AxisOrder {
        self.0.axis_order()
    }

    fn spectrum_layout(&self) -> SpectrumLayout {
        self.0.spectrum_layout()
    }

    fn create_plan_1d(
        &self,
        n: usize,
        direction: Direction,
        flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError> {
        self.0.create_plan_1d(n, direction, flags)
    }

    fn create_plan_1d_real(
        &self,
        n: usize,
        flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError> {
        Ok(Box::new(BrokenConjugatePlan(
            self.0.create_plan_1d_real(n, flags)?,
        )))
    }

    fn create_plan_2d(
        &self,
        leading: usize,
        trailing: usize,
        direction: Direction,
        flags: PlanFlags,
    ) -> Result<Box<dyn FftPlan>, FftError> {
        self.0.create_plan_2d(leading, trailing, direction, flags)
    }
}

// ── Concrete oracle scenarios ────────────────────────────────────

#[test]
fn scenario_eight_point_forward_stays_within_scaled_tolerance() {
    let driver = DualExecutionDriver::new(&RadixFft, &ReferenceDft);
    let descriptor = TransformDescriptor::c2c_1d(8, Direction::Forward, PlanFlags::new(0));
    let outcome = driver.run_case(&descriptor, &SweepConfig::default());

    let expected_tolerance = tolerance(1.0e-6, 8);
    assert!((outcome.tolerance - expected_tolerance).abs() < 1e-9);
    assert!((expected_tolerance - 2.828_427e-6).abs() < 1e-9);
    assert!(outcome.passed(), "unexpected failure: {:?}", outcome.status);
    assert!(outcome.max_delta < outcome.tolerance);
    log_case("scenario_a", &descriptor.label(), outcome.passed());
}

#[test]
fn scenario_four_point_real_spectrum_has_real_dc_and_nyquist() {
    let descriptor = TransformDescriptor::r2c_1d(4, PlanFlags::new(0));
    let input = ffc_conformance::generate_input(&descriptor, ffc_conformance::DEFAULT_SEED);
    let plan = RadixFft
        .create_plan_1d_real(4, PlanFlags::new(0))
        .expect("r2c plan");
    let mut output = SignalBuffer::complex(4);
    plan.execute(&input, &mut output).expect("execute");

    let tol = tolerance(1.0e-6, 4);
    let bins = output.as_complex().expect("complex output");
    // DC and Nyquist bins of a real signal's spectrum are purely real.
    assert!(bins[0].1.abs() < tol, "DC imaginary part {}", bins[0].1);
    assert!(bins[2].1.abs() < tol, "Nyquist imaginary part {}", bins[2].1);
    // Mirror bin is the conjugate.
    assert!((bins[3].0 - bins[1].0).abs() < tol);
    assert!((bins[3].1 + bins[1].1).abs() < tol);
    log_case("scenario_b", &descriptor.label(), true);
}

#[test]
fn scenario_four_by_four_inverse_matches_reference() {
    let driver = DualExecutionDriver::new(&RadixFft, &ReferenceDft);
    let descriptor = TransformDescriptor::c2c_2d(4, 4, Direction::Inverse, PlanFlags::new(0));
    let outcome = driver.run_case(&descriptor, &SweepConfig::default());

    assert!((outcome.tolerance - 4.0e-6).abs() < 1e-9);
    assert!(outcome.passed(), "unexpected failure: {:?}", outcome.status);
    log_case("scenario_c", &descriptor.label(), outcome.passed());
}

// ── Reduced full sweeps ──────────────────────────────────────────

#[test]
fn reduced_sweep_passes_every_case() {
    let summary = run_sweep(&RadixFft, &ReferenceDft, &reduced_config());
    // c2c 1d {2..32} ×2×8 + r2c {4..32} ×8 + 2d {2..32}² ×2×8
    assert_eq!(summary.total_cases, 5 * 2 * 8 + 4 * 8 + 25 * 2 * 8);
    assert!(
        summary.all_passed(),
        "failures: {:?}",
        summary.failures().collect::<Vec<_>>()
    );
    log_case("reduced_sweep", "full cross-product at size cap 64", true);
}

#[test]
fn sweep_is_deterministic_across_runs() {
    let config = reduced_config().with_size_cap(16);
    let first = run_sweep(&RadixFft, &ReferenceDft, &config);
    let second = run_sweep(&RadixFft, &ReferenceDft, &config);

    assert_eq!(first.total_cases, second.total_cases);
    for (lhs, rhs) in first.outcomes.iter().zip(&second.outcomes) {
        assert_eq!(lhs.descriptor, rhs.descriptor);
        assert_eq!(lhs.input_fingerprint, rhs.input_fingerprint);
        assert_eq!(lhs.max_delta, rhs.max_delta);
    }
}

// ── Injected defects ─────────────────────────────────────────────

#[test]
fn scaled_output_fails_every_case_with_tolerance_kind() {
    let config = reduced_config().with_size_cap(8);
    let summary = run_sweep(&ScaledOutput(RadixFft), &ReferenceDft, &config);

    assert_eq!(summary.passed_cases, 0);
    assert!(summary.failed_cases > 0);
    for outcome in summary.failures() {
        match &outcome.status {
            CaseStatus::Fail {
                failure: FailureKind::ToleranceExceeded { delta, tolerance, .. },
            } => assert!(delta >= tolerance),
            other => panic!("expected tolerance failure, got {other:?}"),
        }
    }
}

#[test]
fn fail_fast_stops_at_the_first_failing_tuple() {
    let config = reduced_config().with_size_cap(8).with_fail_fast(true);
    let summary = run_sweep(&ScaledOutput(RadixFft), &ReferenceDft, &config);
    assert_eq!(summary.total_cases, 1);
    assert_eq!(summary.failed_cases, 1);
}

#[test]
fn mirror_half_corruption_is_caught_by_the_symmetry_check() {
    let driver = DualExecutionDriver::new(&BrokenConjugate(RadixFft), &ReferenceDft);
    let descriptor = TransformDescriptor::r2c_1d(16, PlanFlags::new(0));
    let outcome = driver.run_case(&descriptor, &SweepConfig::default());

    match outcome.status {
        CaseStatus::Fail {
            failure: FailureKind::SymmetryViolation { index, .. },
        } => assert_eq!(index, 1),
        other => panic!("expected symmetry violation, got {other:?}"),
    }

    // Complex cases are untouched by the defect and still pass.
    let c2c = TransformDescriptor::c2c_1d(16, Direction::Forward, PlanFlags::new(0));
    assert!(driver.run_case(&c2c, &SweepConfig::default()).passed());
}

// ── Run-bundle artifacts ─────────────────────────────────────────

#[test]
fn artifact_bundle_contains_one_event_per_case_and_a_summary() {
    let root = std::env::temp_dir().join(format!("ffc-artifacts-{}", std::process::id()));
    let config = reduced_config().with_size_cap(8);

    let summary = run_sweep_with_artifacts(
        &RadixFft,
        &ReferenceDft,
        &config,
        &root,
        Some(String::from("bundle-test")),
    )
    .expect("artifact sweep should succeed");
    assert_eq!(summary.run_id, "bundle-test");

    let bundle = root.join("bundle-test");
    let events = fs::read_to_string(bundle.join("events.jsonl")).expect("events.jsonl");
    assert_eq!(events.lines().count(), summary.total_cases);
    for line in events.lines() {
        let event: serde_json::Value = serde_json::from_str(line).expect("valid JSON line");
        assert_eq!(event["run_id"], "bundle-test");
        assert_eq!(event["status"], "pass");
        assert!(event["case"].as_str().is_some());
    }

    let summary_json = fs::read_to_string(bundle.join("summary.json")).expect("summary.json");
    let parsed: serde_json::Value = serde_json::from_str(&summary_json).expect("valid JSON");
    assert_eq!(parsed["run_id"], "bundle-test");
    assert_eq!(parsed["failed_cases"], 0);

    fs::remove_dir_all(&root).expect("cleanup");
}
