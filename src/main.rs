//! `tzshift` entrypoint.
//!
//! Prints the combination plan a unit without overrides would receive, or
//! probes the configured values against this host.

use std::io::Write;

use clap::Parser;
use serde::Serialize;
use tzshift::error::Result;
use tzshift::{
    Cli, Command, CommonArgs, LoadError, PlanArgs, ProbeReport, Settings, TzShiftConfig,
    TzShiftEngine,
};
use tzshift_common::{CombinationPlan, ScopeChain};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Plan(args) => run_plan(args, stdout),
        Command::Probe(args) => run_probe(args, stdout),
    }
}

fn load_settings(args: &CommonArgs) -> Result<Settings> {
    let file = TzShiftConfig::discover(args.config.as_deref())?;
    let settings = Settings::merge(&file, &args.tzshift).map_err(LoadError::from)?;
    Ok(settings)
}

fn run_plan(args: &PlanArgs, stdout: &mut dyn Write) -> Result<()> {
    let settings = load_settings(&args.common)?;
    let engine = TzShiftEngine::new(settings);
    let plan = engine.plan(&ScopeChain::new())?;
    if args.json {
        write_plan_json(&plan, stdout)
    } else {
        write_plan_text(&plan, stdout)
    }
}

fn run_probe(args: &CommonArgs, stdout: &mut dyn Write) -> Result<()> {
    let settings = load_settings(args)?;
    let mut engine = TzShiftEngine::new(settings);
    write_probe_text(&engine.probe_configured(), stdout)
}

#[derive(Serialize)]
struct PlanDocument<'a> {
    disabled: bool,
    truncated: Option<TruncationDocument>,
    combinations: Vec<CombinationDocument<'a>>,
}

#[derive(Serialize)]
struct TruncationDocument {
    kept: usize,
    total: usize,
}

#[derive(Serialize)]
struct CombinationDocument<'a> {
    index: usize,
    id: &'a str,
    values: Vec<ValueDocument<'a>>,
}

#[derive(Serialize)]
struct ValueDocument<'a> {
    dimension: &'a str,
    value: &'a str,
}

fn write_plan_json(plan: &CombinationPlan, stdout: &mut dyn Write) -> Result<()> {
    let document = PlanDocument {
        disabled: plan.is_disabled(),
        truncated: plan.truncation().map(|truncation| TruncationDocument {
            kept: truncation.kept,
            total: truncation.total,
        }),
        combinations: plan
            .combinations()
            .iter()
            .map(|combination| CombinationDocument {
                index: combination.index(),
                id: combination.id().trim_start(),
                values: combination
                    .entries()
                    .map(|(dimension, value)| ValueDocument {
                        dimension,
                        value: value.label(),
                    })
                    .collect(),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *stdout, &document)?;
    writeln!(stdout)?;
    Ok(())
}

fn write_plan_text(plan: &CombinationPlan, stdout: &mut dyn Write) -> Result<()> {
    for id in plan.ids() {
        writeln!(stdout, "{id}")?;
    }
    if plan.is_disabled() {
        writeln!(stdout, "(parametrisation disabled)")?;
    }
    Ok(())
}

fn write_probe_text(reports: &[ProbeReport], stdout: &mut dyn Write) -> Result<()> {
    for report in reports {
        let verdict = match (report.availability.is_usable(), report.availability.reason()) {
            (true, None) => "usable".to_owned(),
            (true, Some(note)) => format!("usable ({note})"),
            (false, reason) => format!("unusable: {}", reason.unwrap_or("unknown reason")),
        };
        writeln!(stdout, "{}\t{}\t{verdict}", report.dimension, report.value)?;
    }
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; nothing else to tell the user.
    }
}
