#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use ffc_conformance::{SweepConfig, run_sweep, run_sweep_with_artifacts};
use ffc_fft::{RadixFft, ReferenceDft};

#[derive(Debug, Clone)]
struct CliArgs {
    config: SweepConfig,
    artifact_root: Option<PathBuf>,
    run_id: Option<String>,
}

#[derive(Debug, Clone)]
enum CliParseError {
    Help,
    Message(String),
}

fn parse_cli_args(args: &[String]) -> Result<CliArgs, CliParseError> {
    let mut config = SweepConfig::default();
    let mut artifact_root = None;
    let mut run_id = None;

    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Err(CliParseError::Help),
            "--max-1d" => {
                config.c2c_1d_max = parse_value(args, index, "--max-1d")?;
                index += 2;
            }
            "--max-r2c" => {
                config.r2c_1d_max = parse_value(args, index, "--max-r2c")?;
                index += 2;
            }
            "--max-2d" => {
                config.c2c_2d_max = parse_value(args, index, "--max-2d")?;
                index += 2;
            }
            "--max-size" => {
                let max = parse_value(args, index, "--max-size")?;
                config = config.with_size_cap(max);
                index += 2;
            }
            "--flags" => {
                let bound: u8 = parse_value(args, index, "--flags")?;
                if bound == 0 || bound > 8 {
                    return Err(CliParseError::Message(String::from(
                        "--flags must be between 1 and 8",
                    )));
                }
                config.flag_values = bound;
                index += 2;
            }
            "--seed" => {
                config.seed = parse_value(args, index, "--seed")?;
                index += 2;
            }
            "--fail-fast" => {
                config.fail_fast = true;
                index += 1;
            }
            "--artifact-root" => {
                let Some(value) = args.get(index + 1) else {
                    return Err(CliParseError::Message(String::from(
                        "missing value for --artifact-root",
                    )));
                };
                artifact_root = Some(PathBuf::from(value));
                index += 2;
            }
            "--run-id" => {
                let Some(value) = args.get(index + 1) else {
                    return Err(CliParseError::Message(String::from(
                        "missing value for --run-id",
                    )));
                };
                run_id = Some(value.clone());
                index += 2;
            }
            unknown => {
                return Err(CliParseError::Message(format!(
                    "unrecognized argument `{unknown}`"
                )));
            }
        }
    }

    Ok(CliArgs {
        config,
        artifact_root,
        run_id,
    })
}

fn parse_value<T: std::str::FromStr>(
    args: &[String],
    index: usize,
    flag: &str,
) -> Result<T, CliParseError> {
    let Some(value) = args.get(index + 1) else {
        return Err(CliParseError::Message(format!("missing value for {flag}")));
    };
    value
        .parse()
        .map_err(|_| CliParseError::Message(format!("invalid value for {flag}: `{value}`")))
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {program} [--max-1d <n>] [--max-r2c <n>] [--max-2d <n>] [--max-size <n>] [--flags <1..=8>] [--seed <u64>] [--fail-fast] [--artifact-root <path>] [--run-id <id>]"
    );
    eprintln!("  --max-1d <n>            exclusive size bound for 1D complex cases");
    eprintln!("  --max-r2c <n>           exclusive size bound for 1D real-input cases");
    eprintln!("  --max-2d <n>            exclusive per-axis size bound for 2D cases");
    eprintln!("  --max-size <n>          cap every size bound at once");
    eprintln!("  --flags <1..=8>         number of flag values to sweep, from zero up");
    eprintln!("  --seed <u64>            input generator seed");
    eprintln!("  --fail-fast             stop at the first failing case");
    eprintln!("  --artifact-root <path>  write events.jsonl and summary.json under here");
    eprintln!("  --run-id <id>           explicit run id (default uses timestamp)");
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().collect();
    let program = argv
        .first()
        .cloned()
        .unwrap_or_else(|| String::from("fft_sweep"));

    let args = match parse_cli_args(&argv[1..]) {
        Ok(args) => args,
        Err(CliParseError::Help) => {
            print_usage(&program);
            return ExitCode::SUCCESS;
        }
        Err(CliParseError::Message(message)) => {
            eprintln!("{message}");
            print_usage(&program);
            return ExitCode::from(2);
        }
    };

    let subject = RadixFft;
    let reference = ReferenceDft;

    let summary = match args.artifact_root {
        Some(root) => {
            match run_sweep_with_artifacts(&subject, &reference, &args.config, &root, args.run_id) {
                Ok(summary) => summary,
                Err(error) => {
                    eprintln!("harness error: {error}");
                    return ExitCode::from(2);
                }
            }
        }
        None => run_sweep(&subject, &reference, &args.config),
    };

    eprintln!(
        "run_id={} subject={} reference={} total={} passed={} failed={}",
        summary.run_id,
        summary.subject,
        summary.reference,
        summary.total_cases,
        summary.passed_cases,
        summary.failed_cases
    );
    for outcome in summary.failures() {
        eprintln!(
            "FAIL {} max_delta={} tolerance={}",
            outcome.descriptor.label(),
            outcome.max_delta,
            outcome.tolerance
        );
    }

    if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
