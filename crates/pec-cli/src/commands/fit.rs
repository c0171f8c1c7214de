use crate::cli::FitArgs;
use crate::error::{CliError, Result};
use pec_core::core::io::beamer::{BeamerFile, BeamerPsf};
use pec_core::core::io::radial::RadialTableFile;
use pec_core::core::io::traits::RecordFile;
use pec_core::core::psf::params::PsfParameters;
use pec_core::workflows;
use serde::Serialize;
use tracing::info;

/// The fitted parameters as a stand-alone TOML document with a `[psf]` block,
/// ready to paste into a run configuration.
#[derive(Serialize)]
struct PsfDocument {
    psf: PsfParameters,
}

pub fn run(args: FitArgs) -> Result<()> {
    let samples = RadialTableFile::read_from_path(&args.input)
        .map_err(|e| CliError::file_parsing(&args.input, e))?;
    info!(
        sample_count = samples.len(),
        input = %args.input.display(),
        "radial dose table loaded"
    );

    let outcome = workflows::fit::run(&samples)?;
    let params = outcome.parameters;
    println!(
        "Fitted PSF: alpha = {:.4}, beta = {:.4}, sigma_f = {:.1} nm, sigma_b = {:.1} nm (goodness {:.5})",
        params.alpha, params.beta, params.sigma_f_nm, params.sigma_b_nm, params.goodness
    );

    let document = toml::to_string_pretty(&PsfDocument { psf: params })
        .map_err(|e| CliError::Other(e.into()))?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, document).map_err(|e| CliError::file_writing(path, e))?;
            println!("Parameters written to {}", path.display());
        }
        None => print!("{document}"),
    }

    if let Some(path) = &args.beamer {
        BeamerFile::write_to_path(&BeamerPsf::from(&params), path)
            .map_err(|e| CliError::file_writing(path, e))?;
        println!("BEAMER PSF written to {}", path.display());
    }

    Ok(())
}
