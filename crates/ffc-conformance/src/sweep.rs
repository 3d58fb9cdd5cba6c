//! Sweep controller: full parameter-space enumeration and aggregation.
//!
//! Enumeration order is kind → size(s) → direction → flags. Every tuple
//! yields exactly one case, executed synchronously; outcomes are aggregated
//! into a [`SweepSummary`] and optionally mirrored to a JSONL run bundle.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use ffc_fft::{Direction, FftProvider, PlanFlags, TransformDescriptor};
use serde::Serialize;

use crate::driver::DualExecutionDriver;
use crate::outcome::{CaseOutcome, SweepSummary};
use crate::{HarnessError, SweepConfig};

/// Every descriptor in the configured parameter space, in sweep order.
#[must_use]
pub fn enumerate_cases(config: &SweepConfig) -> Vec<TransformDescriptor> {
    let flag_bound = config.flag_values.min(8);
    let flags = || (0..flag_bound).map(PlanFlags::new);
    let mut cases = Vec::new();

    let mut n = config.c2c_1d_min.max(2);
    while n < config.c2c_1d_max {
        for direction in Direction::BOTH {
            for flag in flags() {
                cases.push(TransformDescriptor::c2c_1d(n, direction, flag));
            }
        }
        n <<= 1;
    }

    let mut n = config.r2c_1d_min.max(4);
    while n < config.r2c_1d_max {
        for flag in flags() {
            cases.push(TransformDescriptor::r2c_1d(n, flag));
        }
        n <<= 1;
    }

    let mut ny = config.c2c_2d_min.max(2);
    while ny < config.c2c_2d_max {
        let mut nx = config.c2c_2d_min.max(2);
        while nx < config.c2c_2d_max {
            for direction in Direction::BOTH {
                for flag in flags() {
                    cases.push(TransformDescriptor::c2c_2d(nx, ny, direction, flag));
                }
            }
            nx <<= 1;
        }
        ny <<= 1;
    }

    cases
}

/// Run the configured sweep and aggregate every outcome. With `fail_fast`
/// set, enumeration stops after the first failing tuple; the outcomes
/// gathered so far are still summarized.
#[must_use]
pub fn run_sweep(
    subject: &dyn FftProvider,
    reference: &dyn FftProvider,
    config: &SweepConfig,
) -> SweepSummary {
    let driver = DualExecutionDriver::new(subject, reference);
    let cases = enumerate_cases(config);
    let mut outcomes = Vec::with_capacity(cases.len());

    for descriptor in &cases {
        let outcome = driver.run_case(descriptor, config);
        let failed = !outcome.passed();
        outcomes.push(outcome);
        if failed && config.fail_fast {
            break;
        }
    }

    summarize(subject, reference, config, outcomes)
}

/// As [`run_sweep`], additionally writing a run bundle under
/// `artifact_root/<run_id>/`: one JSON line per case in `events.jsonl` and
/// a pretty-printed `summary.json`.
pub fn run_sweep_with_artifacts(
    subject: &dyn FftProvider,
    reference: &dyn FftProvider,
    config: &SweepConfig,
    artifact_root: &Path,
    run_id: Option<String>,
) -> Result<SweepSummary, HarnessError> {
    let run_id = run_id.unwrap_or_else(generate_run_id);
    let bundle_dir = artifact_root.join(&run_id);
    fs::create_dir_all(&bundle_dir).map_err(|source| HarnessError::ArtifactDir {
        path: bundle_dir.clone(),
        source,
    })?;

    let events_path = bundle_dir.join("events.jsonl");
    let events_file = File::create(&events_path).map_err(|source| HarnessError::EventWrite {
        path: events_path.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(events_file);

    let driver = DualExecutionDriver::new(subject, reference);
    let cases = enumerate_cases(config);
    let mut outcomes = Vec::with_capacity(cases.len());

    for (case_index, descriptor) in cases.iter().enumerate() {
        let outcome = driver.run_case(descriptor, config);
        write_case_event(&mut writer, &events_path, &run_id, case_index, &outcome)?;
        let failed = !outcome.passed();
        outcomes.push(outcome);
        if failed && config.fail_fast {
            break;
        }
    }

    writer.flush().map_err(|source| HarnessError::EventWrite {
        path: events_path.clone(),
        source,
    })?;

    let mut summary = summarize(subject, reference, config, outcomes);
    summary.run_id = run_id;

    let summary_path = bundle_dir.join("summary.json");
    let summary_json = serde_json::to_vec_pretty(&summary)?;
    fs::write(&summary_path, summary_json).map_err(|source| HarnessError::SummaryWrite {
        path: summary_path,
        source,
    })?;

    Ok(summary)
}

fn summarize(
    subject: &dyn FftProvider,
    reference: &dyn FftProvider,
    config: &SweepConfig,
    outcomes: Vec<CaseOutcome>,
) -> SweepSummary {
    let total_cases = outcomes.len();
    let passed_cases = outcomes.iter().filter(|outcome| outcome.passed()).count();
    SweepSummary {
        run_id: generate_run_id(),
        subject: subject.name().to_owned(),
        reference: reference.name().to_owned(),
        config: config.clone(),
        total_cases,
        passed_cases,
        failed_cases: total_cases.saturating_sub(passed_cases),
        outcomes,
    }
}

#[derive(Serialize)]
struct CaseEvent<'a> {
    run_id: &'a str,
    case_index: usize,
    case: String,
    #[serde(flatten)]
    outcome: &'a CaseOutcome,
}

fn write_case_event(
    writer: &mut BufWriter<File>,
    events_path: &PathBuf,
    run_id: &str,
    case_index: usize,
    outcome: &CaseOutcome,
) -> Result<(), HarnessError> {
    let event = CaseEvent {
        run_id,
        case_index,
        case: outcome.descriptor.label(),
        outcome,
    };
    serde_json::to_writer(&mut *writer, &event)?;
    writer
        .write_all(b"\n")
        .map_err(|source| HarnessError::EventWrite {
            path: events_path.clone(),
            source,
        })
}

fn generate_run_id() -> String {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis());
    format!("sweep-{now_ms}")
}

#[cfg(test)]
mod tests {
    use super::enumerate_cases;
    use crate::SweepConfig;
    use ffc_fft::{Direction, TransformKind};

    fn reduced_config() -> SweepConfig {
        SweepConfig {
            c2c_1d_max: 16,
            r2c_1d_max: 16,
            c2c_2d_max: 8,
            ..SweepConfig::default()
        }
    }

    #[test]
    fn enumeration_counts_match_the_cross_product() {
        let cases = enumerate_cases(&reduced_config());
        // c2c 1d: sizes {2,4,8} × 2 directions × 8 flags = 48
        // r2c 1d: sizes {4,8} × 8 flags = 16
        // c2c 2d: {2,4}² × 2 directions × 8 flags = 64
        assert_eq!(cases.len(), 48 + 16 + 64);

        let r2c_count = cases
            .iter()
            .filter(|case| case.kind == TransformKind::R2c1d)
            .count();
        assert_eq!(r2c_count, 16);
    }

    #[test]
    fn enumeration_is_kind_then_size_then_direction_then_flags() {
        let cases = enumerate_cases(&reduced_config());
        assert_eq!(cases[0].kind, TransformKind::C2c1d);
        assert_eq!(cases[0].nx, 2);
        assert_eq!(cases[0].direction, Direction::Forward);
        assert_eq!(cases[0].flags.bits(), 0);
        assert_eq!(cases[1].flags.bits(), 1);
        assert_eq!(cases[8].direction, Direction::Inverse);
        assert_eq!(cases[16].nx, 4);
    }

    #[test]
    fn real_input_cases_are_forward_only() {
        let cases = enumerate_cases(&reduced_config());
        assert!(
            cases
                .iter()
                .filter(|case| case.kind == TransformKind::R2c1d)
                .all(|case| case.direction == Direction::Forward)
        );
    }

    #[test]
    fn flag_bound_caps_the_flag_space() {
        let config = SweepConfig {
            flag_values: 2,
            c2c_1d_max: 4,
            r2c_1d_max: 4,
            c2c_2d_max: 2,
            ..SweepConfig::default()
        };
        let cases = enumerate_cases(&config);
        // c2c 1d only: size {2} × 2 directions × 2 flags.
        assert_eq!(cases.len(), 4);
        assert!(cases.iter().all(|case| case.flags.bits() < 2));
    }

    #[test]
    fn minimum_real_size_is_four() {
        let config = SweepConfig {
            r2c_1d_min: 2,
            c2c_1d_max: 2,
            r2c_1d_max: 8,
            c2c_2d_max: 2,
            ..SweepConfig::default()
        };
        let cases = enumerate_cases(&config);
        assert!(cases.iter().all(|case| case.nx >= 4));
    }
}
