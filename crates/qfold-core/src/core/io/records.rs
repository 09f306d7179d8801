//! Plain-text result records: the per-iteration energy log, the sampled probability
//! distribution, the exported Hamiltonian, and the batch timing log.

use crate::core::io::traits::TextFile;
use crate::core::models::distribution::ProbabilityDistribution;
use crate::core::operators::operator::QubitOperator;
use crate::core::operators::pauli::ZString;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

fn parse_error(line: usize, message: impl Into<String>) -> RecordError {
    RecordError::Parse {
        line,
        message: message.into(),
    }
}

/// One energy per line, in optimization-iteration order.
pub struct EnergyLogFile;

impl TextFile for EnergyLogFile {
    type Value = Vec<f64>;
    type Error = RecordError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<f64>, RecordError> {
        let mut energies = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let value = trimmed
                .parse()
                .map_err(|_| parse_error(i + 1, format!("invalid energy '{}'", trimmed)))?;
            energies.push(value);
        }
        Ok(energies)
    }

    fn write_to(energies: &Vec<f64>, writer: &mut impl Write) -> Result<(), RecordError> {
        for e in energies {
            writeln!(writer, "{}", e)?;
        }
        Ok(())
    }
}

/// Lines of the form `<bitstring>: <probability>`.
pub struct ProbabilityFile;

impl TextFile for ProbabilityFile {
    type Value = ProbabilityDistribution;
    type Error = RecordError;

    fn read_from(reader: &mut impl BufRead) -> Result<ProbabilityDistribution, RecordError> {
        let mut dist = ProbabilityDistribution::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let (bitstring, probability) = line
                .split_once(':')
                .ok_or_else(|| parse_error(i + 1, "expected '<bitstring>: <probability>'"))?;
            let probability: f64 = probability.trim().parse().map_err(|_| {
                parse_error(i + 1, format!("invalid probability '{}'", probability.trim()))
            })?;
            dist.insert(bitstring.trim(), probability);
        }
        Ok(dist)
    }

    fn write_to(dist: &ProbabilityDistribution, writer: &mut impl Write) -> Result<(), RecordError> {
        for (bitstring, probability) in dist.iter() {
            writeln!(writer, "{}: {}", bitstring, probability)?;
        }
        Ok(())
    }
}

/// A `# num_qubits <n>` header followed by one `<label> <coefficient>` line per term.
pub struct HamiltonianFile;

const NUM_QUBITS_HEADER: &str = "# num_qubits";

impl TextFile for HamiltonianFile {
    type Value = QubitOperator;
    type Error = RecordError;

    fn read_from(reader: &mut impl BufRead) -> Result<QubitOperator, RecordError> {
        let mut num_qubits = None;
        let mut terms = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix(NUM_QUBITS_HEADER) {
                num_qubits = Some(rest.trim().parse::<usize>().map_err(|_| {
                    parse_error(i + 1, format!("invalid qubit count '{}'", rest.trim()))
                })?);
                continue;
            }
            if trimmed.starts_with('#') {
                continue;
            }
            let (label, coeff) = trimmed
                .split_once(char::is_whitespace)
                .ok_or_else(|| parse_error(i + 1, "expected '<label> <coefficient>'"))?;
            let z = ZString::parse_label(label)
                .ok_or_else(|| parse_error(i + 1, format!("invalid Pauli label '{}'", label)))?;
            let coeff: f64 = coeff
                .trim()
                .parse()
                .map_err(|_| parse_error(i + 1, format!("invalid coefficient '{}'", coeff.trim())))?;
            terms.push((label.len(), z, coeff));
        }

        let num_qubits = num_qubits
            .or_else(|| terms.iter().map(|&(width, _, _)| width).max())
            .unwrap_or(0);
        QubitOperator::from_terms(num_qubits, terms.into_iter().map(|(_, z, c)| (z, c)))
            .map_err(|e| parse_error(0, e.to_string()))
    }

    fn write_to(op: &QubitOperator, writer: &mut impl Write) -> Result<(), RecordError> {
        writeln!(writer, "{} {}", NUM_QUBITS_HEADER, op.num_qubits())?;
        for (z, coeff) in op.terms() {
            writeln!(writer, "{} {}", z.label(op.num_qubits()), coeff)?;
        }
        Ok(())
    }
}

const EXECUTION_TIME_HEADER: &str = "Protein_ID\tExecution_Time(s)";

/// Wall-clock time per batch item: a header line, then `<id>\t<seconds>` rows.
pub struct ExecutionTimeLogFile;

impl TextFile for ExecutionTimeLogFile {
    type Value = Vec<(String, f64)>;
    type Error = RecordError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<(String, f64)>, RecordError> {
        let mut rows = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || (i == 0 && line.trim() == EXECUTION_TIME_HEADER) {
                continue;
            }
            let (id, seconds) = line
                .split_once('\t')
                .ok_or_else(|| parse_error(i + 1, "expected '<id>\t<seconds>'"))?;
            let seconds = seconds.trim().parse().map_err(|_| {
                parse_error(i + 1, format!("invalid execution time '{}'", seconds.trim()))
            })?;
            rows.push((id.to_string(), seconds));
        }
        Ok(rows)
    }

    fn write_to(rows: &Vec<(String, f64)>, writer: &mut impl Write) -> Result<(), RecordError> {
        writeln!(writer, "{}", EXECUTION_TIME_HEADER)?;
        for (id, seconds) in rows {
            writeln!(writer, "{}\t{:.3}", id, seconds)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn energy_log_is_one_value_per_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("energy_list.txt");
        EnergyLogFile::write_to_path(&vec![-1.5, 0.25, 3.0], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "-1.5\n0.25\n3\n");
        assert_eq!(EnergyLogFile::read_from_path(&path).unwrap(), vec![-1.5, 0.25, 3.0]);
    }

    #[test]
    fn energy_log_reports_bad_line_number() {
        let err = EnergyLogFile::read_from(&mut Cursor::new("1.0\n\nabc\n")).unwrap_err();
        assert!(matches!(err, RecordError::Parse { line: 3, .. }));
    }

    #[test]
    fn probability_file_uses_colon_separator() {
        let dist: ProbabilityDistribution = [("101", 0.75), ("000", 0.25)].into_iter().collect();
        let mut out = Vec::new();
        ProbabilityFile::write_to(&dist, &mut out).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert_eq!(text, "000: 0.25\n101: 0.75\n");
        let parsed = ProbabilityFile::read_from(&mut Cursor::new(out)).unwrap();
        assert_eq!(parsed, dist);
    }

    #[test]
    fn probability_file_rejects_malformed_lines() {
        let err = ProbabilityFile::read_from(&mut Cursor::new("0101 0.5\n")).unwrap_err();
        assert!(matches!(err, RecordError::Parse { line: 1, .. }));
    }

    #[test]
    fn hamiltonian_file_preserves_terms_and_width() {
        let op = QubitOperator::from_terms(
            5,
            [
                (ZString::IDENTITY, 12.5),
                (ZString::from_positions([0, 3]), -0.25),
                (ZString::single(4), 1.0),
            ],
        )
        .unwrap();
        let mut out = Vec::new();
        HamiltonianFile::write_to(&op, &mut out).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.starts_with("# num_qubits 5\n"));
        assert!(text.contains("IZIIZ -0.25"));
        let parsed = HamiltonianFile::read_from(&mut Cursor::new(out)).unwrap();
        assert_eq!(parsed, op);
    }

    #[test]
    fn execution_time_log_has_tab_separated_rows() {
        let rows = vec![("1abc".to_string(), 1.25), ("2xyz".to_string(), 0.5)];
        let mut out = Vec::new();
        ExecutionTimeLogFile::write_to(&rows, &mut out).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert_eq!(text, "Protein_ID\tExecution_Time(s)\n1abc\t1.250\n2xyz\t0.500\n");
        assert_eq!(ExecutionTimeLogFile::read_from(&mut Cursor::new(out)).unwrap(), rows);
    }

    #[test]
    fn hamiltonian_file_rejects_non_z_labels() {
        let err = HamiltonianFile::read_from(&mut Cursor::new("IXZ 1.0\n")).unwrap_err();
        assert!(matches!(err, RecordError::Parse { line: 1, .. }));
    }
}
