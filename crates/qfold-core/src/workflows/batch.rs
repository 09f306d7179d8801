use super::fold::{self, OutputPaths};
use crate::core::io::records::ExecutionTimeLogFile;
use crate::core::io::traits::TextFile;
use crate::core::models::peptide::Peptide;
use crate::engine::config::FoldingConfig;
use crate::engine::error::EngineError;
use crate::engine::oracle::Oracle;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, instrument};

/// One peptide of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub id: String,
    pub sequence: String,
    /// One entry per main bead; empty means no side bead.
    pub side_chains: Vec<String>,
}

impl BatchEntry {
    pub fn peptide(&self) -> Result<Peptide, EngineError> {
        Ok(Peptide::new(&self.sequence, &self.side_chains)?)
    }
}

#[derive(Debug, Deserialize)]
struct BatchRecord {
    id: String,
    sequence: String,
    #[serde(default)]
    side_chains: Option<String>,
}

/// Expands a side-chain pattern such as `__K__` into one entry per main bead.
///
/// `_` and `-` mark beads without a side chain. A blank pattern means no side chains at
/// all and expands to `length` empty entries.
pub fn parse_side_chain_pattern(pattern: &str, length: usize) -> Vec<String> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return vec![String::new(); length];
    }
    pattern
        .chars()
        .map(|c| match c {
            '_' | '-' => String::new(),
            c => c.to_string(),
        })
        .collect()
}

impl From<BatchRecord> for BatchEntry {
    fn from(record: BatchRecord) -> Self {
        let side_chains = parse_side_chain_pattern(
            record.side_chains.as_deref().unwrap_or(""),
            record.sequence.chars().count(),
        );
        Self {
            id: record.id,
            sequence: record.sequence,
            side_chains,
        }
    }
}

/// Reads a CSV with an `id,sequence[,side_chains]` header.
///
/// `side_chains` holds one character per main bead, with `_` or `-` for beads without a
/// side chain. Lines starting with `#` are ignored.
pub fn read_batch_file(path: &Path) -> Result<Vec<BatchEntry>, EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(file);

    let entries = reader
        .deserialize::<BatchRecord>()
        .map(|record| {
            record.map(BatchEntry::from).map_err(|e| EngineError::BatchInput {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if entries.is_empty() {
        return Err(EngineError::BatchInput {
            path: path.to_path_buf(),
            reason: "no peptides listed".to_string(),
        });
    }
    Ok(entries)
}

#[derive(Debug)]
pub struct ItemReport {
    pub id: String,
    pub seconds: f64,
    pub outcome: Result<OutputPaths, EngineError>,
}

#[derive(Debug)]
pub struct BatchSummary {
    pub items: Vec<ItemReport>,
    pub timing_log: PathBuf,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}

/// Folds every entry in order and writes `<output_dir>/execution_time_log.txt`.
///
/// A failing entry is logged and recorded in the summary; the batch keeps going.
#[instrument(skip_all, name = "batch_workflow", fields(items = entries.len()))]
pub fn run(
    entries: &[BatchEntry],
    config: &FoldingConfig,
    oracle: &dyn Oracle,
    output_dir: &Path,
    replace: bool,
    reporter: &ProgressReporter,
) -> Result<BatchSummary, EngineError> {
    std::fs::create_dir_all(output_dir).map_err(|source| EngineError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        reporter.report(Progress::ItemStart {
            id: entry.id.clone(),
            index,
            total: entries.len(),
        });
        let started = Instant::now();
        let outcome = entry.peptide().and_then(|peptide| {
            let outcome = fold::run(peptide, config, oracle, reporter)?;
            fold::write_outputs(&outcome, &entry.id, output_dir, replace)
        });
        let seconds = started.elapsed().as_secs_f64();

        match &outcome {
            Ok(paths) => info!(id = %entry.id, seconds, path = %paths.root.display(), "Folded peptide."),
            Err(e) => error!(id = %entry.id, error = %e, "Failed to fold peptide."),
        }
        items.push(ItemReport {
            id: entry.id.clone(),
            seconds,
            outcome,
        });
    }

    let timing_log = output_dir.join("execution_time_log.txt");
    let rows: Vec<(String, f64)> = items
        .iter()
        .map(|item| (item.id.clone(), item.seconds))
        .collect();
    ExecutionTimeLogFile::write_to_path(&rows, &timing_log)?;

    let summary = BatchSummary { items, timing_log };
    info!(
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        "Batch complete."
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{FoldingConfigBuilder, InteractionScheme, PenaltyParameters};
    use crate::engine::exhaustive::ExhaustiveOracle;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_entries_with_and_without_side_chains() {
        let file = write_csv(
            "id,sequence,side_chains\n\
             # comment line\n\
             p1, DWGGM\n\
             p2,APRLG,__K__\n",
        );
        let entries = read_batch_file(file.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "p1");
        assert_eq!(entries[0].sequence, "DWGGM");
        assert_eq!(entries[0].side_chains, vec![""; 5]);
        assert_eq!(entries[1].side_chains, vec!["", "", "K", "", ""]);
        assert!(entries[1].peptide().unwrap().side_bead(2).is_some());
    }

    #[test]
    fn side_chain_patterns_expand_per_bead() {
        assert_eq!(parse_side_chain_pattern("-K_", 3), vec!["", "K", ""]);
        assert_eq!(parse_side_chain_pattern("  ", 2), vec![""; 2]);
    }

    #[test]
    fn empty_or_malformed_files_are_rejected() {
        let empty = write_csv("id,sequence\n");
        assert!(matches!(
            read_batch_file(empty.path()),
            Err(EngineError::BatchInput { .. })
        ));
        let missing_column = write_csv("name,residues\np1,DWGGM\n");
        assert!(matches!(
            read_batch_file(missing_column.path()),
            Err(EngineError::BatchInput { .. })
        ));
        assert!(matches!(
            read_batch_file(Path::new("/nonexistent/batch.csv")),
            Err(EngineError::Io { .. })
        ));
    }

    #[test]
    fn failing_items_do_not_stop_the_batch() {
        let dir = tempdir().unwrap();
        let config = FoldingConfigBuilder::new()
            .penalties(PenaltyParameters::default())
            .interaction(InteractionScheme::MiyazawaJernigan)
            .parameter_schedule(vec![vec![1.0], vec![4.0]])
            .top_k(1)
            .build()
            .unwrap();
        let oracle = ExhaustiveOracle::from_config(&config.sampling);
        let entries: Vec<BatchEntry> = [("good", "DWGGM"), ("bad", "DWJGM"), ("also_good", "APRLR")]
            .into_iter()
            .map(|(id, sequence)| BatchEntry {
                id: id.to_string(),
                sequence: sequence.to_string(),
                side_chains: vec![String::new(); 5],
            })
            .collect();

        let summary = run(
            &entries,
            &config,
            &oracle,
            dir.path(),
            false,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(matches!(summary.items[1].outcome, Err(EngineError::Peptide(_))));
        assert!(dir.path().join("also_good/also_good.xyz").exists());

        let rows = ExecutionTimeLogFile::read_from_path(&summary.timing_log).unwrap();
        let ids: Vec<&str> = rows.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["good", "bad", "also_good"]);
    }
}
