use super::traits::RecordFile;
use crate::core::psf::params::PsfParameters;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BeamerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Missing line {0} of the two-line PSF record")]
    MissingLine(usize),
    #[error("Invalid number on line {line} (value: '{value}')")]
    InvalidFloat { line: usize, value: String },
    #[error("Coefficient line must carry 4 fields, found {found}")]
    FieldCount { found: usize },
}

/// The two-Gaussian PSF record understood by BEAMER-style proximity-correction
/// tools.
///
/// Two lines, byte-stable:
///
/// ```text
/// <peakAmplitude>                      six significant digits
/// <alpha> 1.0 <beta> <sigma_b_nm>      six-decimal amplitudes, one-decimal range
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamerPsf {
    /// Peak amplitude of the fitted curve, `density(0)`.
    pub peak_amplitude: f64,
    /// Forward-scatter amplitude.
    pub alpha: f64,
    /// Backscatter amplitude.
    pub beta: f64,
    /// Backscatter range in nm.
    pub sigma_b_nm: f64,
}

impl From<&PsfParameters> for BeamerPsf {
    fn from(params: &PsfParameters) -> Self {
        Self {
            peak_amplitude: params.peak_amplitude(),
            alpha: params.alpha,
            beta: params.beta,
            sigma_b_nm: params.sigma_b_nm,
        }
    }
}

pub struct BeamerFile;

impl RecordFile for BeamerFile {
    type Record = BeamerPsf;
    type Error = BeamerError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Record, Self::Error> {
        let mut lines = reader.lines();
        let header = lines.next().ok_or(BeamerError::MissingLine(1))??;
        let coefficients = lines.next().ok_or(BeamerError::MissingLine(2))??;

        let peak_amplitude = parse_float(header.trim(), 1)?;

        let fields: Vec<&str> = coefficients.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(BeamerError::FieldCount {
                found: fields.len(),
            });
        }
        let alpha = parse_float(fields[0], 2)?;
        let _unity = parse_float(fields[1], 2)?;
        let beta = parse_float(fields[2], 2)?;
        let sigma_b_nm = parse_float(fields[3], 2)?;

        Ok(BeamerPsf {
            peak_amplitude,
            alpha,
            beta,
            sigma_b_nm,
        })
    }

    fn write_to(record: &Self::Record, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{:.5e}", record.peak_amplitude)?;
        writeln!(
            writer,
            "{:.6} 1.0 {:.6} {:.1}",
            record.alpha, record.beta, record.sigma_b_nm
        )?;
        Ok(())
    }
}

fn parse_float(raw: &str, line: usize) -> Result<f64, BeamerError> {
    raw.parse::<f64>().map_err(|_| BeamerError::InvalidFloat {
        line,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    #[test]
    fn serialized_layout_is_byte_stable() {
        let record = BeamerPsf {
            peak_amplitude: 1.25e-4,
            alpha: 0.87,
            beta: 2.61,
            sigma_b_nm: 30_000.0,
        };
        let mut buffer = Vec::new();
        BeamerFile::write_to(&record, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "1.25000e-4\n0.870000 1.0 2.610000 30000.0\n");
    }

    #[test]
    fn write_then_read_round_trips() {
        let record = BeamerPsf {
            peak_amplitude: 1.76894e-4,
            alpha: 1.0,
            beta: 3.0,
            sigma_b_nm: 3000.0,
        };
        let mut buffer = Vec::new();
        BeamerFile::write_to(&record, &mut buffer).unwrap();
        let back = BeamerFile::read_from(&mut BufReader::new(buffer.as_slice())).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn record_from_psf_parameters_uses_the_curve_peak() {
        let params = PsfParameters {
            alpha: 1.0,
            beta: 3.0,
            sigma_f_nm: 30.0,
            sigma_b_nm: 3000.0,
            goodness: 1.0,
        };
        let record = BeamerPsf::from(&params);
        assert_eq!(record.peak_amplitude, params.peak_amplitude());
        assert_eq!(record.sigma_b_nm, 3000.0);
    }

    #[test]
    fn one_line_input_is_a_missing_line_error() {
        let result = BeamerFile::read_from(&mut BufReader::new("1.25000e-4\n".as_bytes()));
        assert!(matches!(result, Err(BeamerError::MissingLine(2))));
    }

    #[test]
    fn short_coefficient_line_is_a_field_count_error() {
        let result =
            BeamerFile::read_from(&mut BufReader::new("1.0e-4\n0.87 1.0 2.61\n".as_bytes()));
        assert!(matches!(result, Err(BeamerError::FieldCount { found: 3 })));
    }
}
