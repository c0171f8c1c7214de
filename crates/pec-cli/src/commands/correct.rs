use crate::cli::CorrectArgs;
use crate::config;
use crate::error::{CliError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pec_core::core::io::radial::RadialTableFile;
use pec_core::core::io::report::ReportFile;
use pec_core::core::io::traits::RecordFile;
use pec_core::core::models::layout::ExposureLayout;
use pec_core::core::psf::params::PsfParameters;
use pec_core::engine::progress::{Progress, ProgressReporter};
use pec_core::workflows;
use std::time::Duration;
use tracing::info;

pub fn run(args: CorrectArgs) -> Result<()> {
    let run_config = config::load(&args.config)?;
    let psf = resolve_psf(&args, &run_config)?;
    let layout = ExposureLayout::from_patterns(&run_config.patterns);
    info!(
        pattern_count = run_config.patterns.len(),
        feature_count = layout.len(),
        "layout flattened"
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
        Progress::StageStart { name } => spinner.set_message(format!("stage: {name}")),
        Progress::ShotsGenerated { count } => {
            spinner.set_message(format!("generated {count} shots"))
        }
        Progress::Message(text) => spinner.println(text),
        Progress::StageFinish => {}
    }));

    let result = workflows::correct::run(
        &layout,
        &run_config.machine,
        &psf,
        &run_config.correction,
        &reporter,
    )?;
    drop(reporter);
    spinner.finish_and_clear();

    let report = workflows::correct::build_report(&layout, &psf, &run_config.correction, &result);
    ReportFile::write_to_path(&report, &args.output)
        .map_err(|e| CliError::file_writing(&args.output, e))?;

    println!(
        "Corrected {} features ({} shots); report written to {}",
        report.features.len(),
        result.shots.len(),
        args.output.display()
    );
    if let Some(uniformity) = result.uniformity {
        println!(
            "Total dose spread: {:.1}..{:.1} µC/cm² (mean {:.1}, relative spread {:.3})",
            uniformity.min_total_uc_cm2,
            uniformity.max_total_uc_cm2,
            uniformity.mean_total_uc_cm2,
            uniformity.relative_spread
        );
    }
    if result.clock_plan.clamped() {
        println!(
            "⚠ Clock clamped to {:.3e} Hz; achieved base dose {:.1} µC/cm²",
            result.clock_plan.effective_hz, result.clock_plan.achieved_dose_uc_cm2
        );
    }
    if result.table.any_over_exposure_risk() {
        println!("⚠ Some features exceed the development threshold from background dose alone");
    }

    Ok(())
}

fn resolve_psf(args: &CorrectArgs, run_config: &config::RunConfig) -> Result<PsfParameters> {
    if let Some(path) = &args.psf_table {
        let samples = RadialTableFile::read_from_path(path)
            .map_err(|e| CliError::file_parsing(path, e))?;
        let outcome = workflows::fit::run(&samples)?;
        info!(
            goodness = outcome.parameters.goodness,
            "PSF fitted from {}", path.display()
        );
        return Ok(outcome.parameters);
    }
    run_config.psf.ok_or_else(|| {
        CliError::Config(
            "no PSF source: add a [psf] block to the run file or pass --psf-table".to_string(),
        )
    })
}
