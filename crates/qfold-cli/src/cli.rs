use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "qfold CLI - Coarse-grained protein structure prediction on the tetrahedral lattice through qubit Hamiltonians.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the lattice structure of a single peptide.
    Fold(FoldArgs),
    /// Predict structures for every peptide listed in a CSV file.
    Batch(BatchArgs),
    /// Build the qubit Hamiltonian of a peptide and export it.
    Hamiltonian(HamiltonianArgs),
    /// Decode a measured bitstring into a lattice conformation.
    Decode(DecodeArgs),
}

/// The peptide to work on.
#[derive(Args, Debug, Clone)]
pub struct PeptideArgs {
    /// Main-chain sequence in one-letter residue codes (e.g., 'APRLRFY').
    #[arg(short, long, required = true, value_name = "SEQUENCE")]
    pub sequence: String,

    /// Side-chain residues, one character per main bead; '_' or '-' for none (e.g., '__K__').
    #[arg(long, value_name = "PATTERN")]
    pub side_chains: Option<String>,
}

/// Configuration sources shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Hamiltonian Overrides ---
    /// Override the back-turn penalty strength.
    #[arg(long, value_name = "FLOAT")]
    pub penalty_back: Option<f64>,

    /// Override the main-chain overlap penalty strength.
    #[arg(long, value_name = "FLOAT")]
    pub penalty_overlap: Option<f64>,

    /// Override the side-chain clash penalty strength.
    #[arg(long, value_name = "FLOAT")]
    pub penalty_side_chain: Option<f64>,

    /// Override the contact energy table.
    /// One of 'miyazawa-jernigan', 'random@SEED', 'mixed@SEED:RESIDUES', or a path to a CSV table.
    #[arg(short = 'e', long, value_name = "NAME_OR_PATH")]
    pub interaction: Option<String>,

    // --- Sampling Overrides ---
    /// Override the inverse-temperature schedule (comma-separated, e.g., '0.1,0.5,2').
    #[arg(short, long, value_name = "FLOATS", value_delimiter = ',')]
    pub betas: Option<Vec<f64>>,

    /// Override the widest register the exhaustive oracle will evaluate.
    #[arg(long, value_name = "INT")]
    pub max_qubits: Option<usize>,

    /// Draw this many measurement shots instead of using exact probabilities.
    #[arg(long, value_name = "INT")]
    pub shots: Option<usize>,

    /// Override the random seed used for shot sampling.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    // --- Output Overrides ---
    /// Override the number of top-K structures to write.
    #[arg(short = 'k', long, value_name = "INT")]
    pub top_k: Option<usize>,

    /// Override the Cartesian length of one lattice bond in written structures.
    #[arg(long, value_name = "FLOAT")]
    pub bond_length: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S penalties.back=20
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `fold` subcommand.
#[derive(Args, Debug)]
pub struct FoldArgs {
    #[command(flatten)]
    pub peptide: PeptideArgs,

    /// Identifier used for the result directory and file names. Defaults to the sequence.
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Directory that receives the per-protein result tree.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Overwrite existing structure files.
    #[arg(long)]
    pub replace: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// CSV file with an 'id,sequence[,side_chains]' header.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory that receives one result tree per protein and the timing log.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Overwrite existing structure files.
    #[arg(long)]
    pub replace: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `hamiltonian` subcommand.
#[derive(Args, Debug)]
pub struct HamiltonianArgs {
    #[command(flatten)]
    pub peptide: PeptideArgs,

    /// Output file. Prints to standard output when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Export the operator over the full turn register instead of the compressed one.
    #[arg(long)]
    pub full: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub peptide: PeptideArgs,

    /// Bitstring over the compressed register, highest qubit first.
    #[arg(long, required = true, value_name = "BITS")]
    pub bitstring: String,

    /// Write the decoded structure to this XYZ file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Rescale the written structure to a C-alpha spacing of 3.8 Angstrom.
    #[arg(long, requires = "output")]
    pub rescale: bool,

    /// Overwrite an existing output file.
    #[arg(long)]
    pub replace: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}
