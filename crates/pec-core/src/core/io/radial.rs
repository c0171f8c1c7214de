use super::traits::RecordFile;
use crate::core::psf::sample::RadialDoseSample;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RadialTableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: u64,
        kind: RadialParseErrorKind,
    },
    #[error("Radial table contains no data rows")]
    Empty,
    #[error("Samples must be ordered by radius: line {line} goes backwards")]
    Unordered { line: u64 },
}

#[derive(Debug, Error)]
pub enum RadialParseErrorKind {
    #[error("expected 2 or 3 columns, found {found}")]
    ColumnCount { found: usize },
    #[error("invalid number in column {column} (value: '{value}')")]
    InvalidFloat { column: usize, value: String },
}

/// The simulator's radial energy-deposition table.
///
/// A comma-separated table with `#`-prefixed comment lines and one header row;
/// data rows carry either `(radius, energy)` or `(radius, ignored, energy)`.
/// The radius is always column 0 and the energy density the last column.
pub struct RadialTableFile;

impl RecordFile for RadialTableFile {
    type Record = Vec<RadialDoseSample>;
    type Error = RadialTableError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Record, Self::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut samples: Vec<RadialDoseSample> = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |pos| pos.line());

            if record.is_empty() || (record.len() == 1 && record[0].is_empty()) {
                continue;
            }
            if record.len() < 2 || record.len() > 3 {
                return Err(RadialTableError::Parse {
                    line,
                    kind: RadialParseErrorKind::ColumnCount {
                        found: record.len(),
                    },
                });
            }

            let radius = parse_field(&record, 0, line)?;
            let energy = parse_field(&record, record.len() - 1, line)?;

            if samples.last().is_some_and(|last| radius < last.radius_nm) {
                return Err(RadialTableError::Unordered { line });
            }
            samples.push(RadialDoseSample::new(radius, energy));
        }

        if samples.is_empty() {
            return Err(RadialTableError::Empty);
        }
        Ok(samples)
    }

    fn write_to(record: &Self::Record, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "# radial energy deposition")?;
        writeln!(writer, "radius_nm,energy_density")?;
        for sample in record {
            writeln!(writer, "{},{}", sample.radius_nm, sample.energy_density)?;
        }
        Ok(())
    }
}

fn parse_field(
    record: &csv::StringRecord,
    column: usize,
    line: u64,
) -> Result<f64, RadialTableError> {
    let raw = &record[column];
    raw.parse::<f64>().map_err(|_| RadialTableError::Parse {
        line,
        kind: RadialParseErrorKind::InvalidFloat {
            column,
            value: raw.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn parse(text: &str) -> Result<Vec<RadialDoseSample>, RadialTableError> {
        RadialTableFile::read_from(&mut BufReader::new(text.as_bytes()))
    }

    #[test]
    fn parses_two_column_table_with_comments_and_header() {
        let table = "\
# produced by the transport simulator
# beam energy: 100 keV
radius,energy
0.0,1.76e-4
10.0,1.60e-4
20.0,1.25e-4
";
        let samples = parse(table).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].radius_nm, 0.0);
        assert_eq!(samples[2].energy_density, 1.25e-4);
    }

    #[test]
    fn three_column_table_ignores_the_middle_column() {
        let table = "\
radius,bin_count,energy
5.0,120,2.0e-4
15.0,98,1.1e-4
";
        let samples = parse(table).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].radius_nm, 15.0);
        assert_eq!(samples[1].energy_density, 1.1e-4);
    }

    #[test]
    fn rejects_tables_with_too_many_columns() {
        let result = parse("a,b,c,d\n1.0,2.0,3.0,4.0\n");
        assert!(matches!(
            result,
            Err(RadialTableError::Parse {
                kind: RadialParseErrorKind::ColumnCount { found: 4 },
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_numeric_fields_with_the_offending_line() {
        let result = parse("radius,energy\n0.0,1.0e-4\nnot-a-number,2.0e-4\n");
        match result {
            Err(RadialTableError::Parse {
                line,
                kind: RadialParseErrorKind::InvalidFloat { column: 0, value },
            }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-number");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_radii_that_go_backwards() {
        let result = parse("radius,energy\n10.0,1.0\n5.0,2.0\n");
        assert!(matches!(result, Err(RadialTableError::Unordered { line: 3 })));
    }

    #[test]
    fn empty_table_is_an_error() {
        assert!(matches!(
            parse("# only comments\nradius,energy\n"),
            Err(RadialTableError::Empty)
        ));
    }

    #[test]
    fn write_then_read_round_trips() {
        let samples = vec![
            RadialDoseSample::new(0.0, 1.5e-4),
            RadialDoseSample::new(25.0, 9.0e-5),
        ];
        let mut buffer = Vec::new();
        RadialTableFile::write_to(&samples, &mut buffer).unwrap();
        let back = RadialTableFile::read_from(&mut BufReader::new(buffer.as_slice())).unwrap();
        assert_eq!(back, samples);
    }
}
