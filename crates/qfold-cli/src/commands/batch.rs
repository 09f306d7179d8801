use crate::cli::BatchArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use qfold::engine::exhaustive::ExhaustiveOracle;
use qfold::engine::progress::ProgressReporter;
use qfold::workflows;
use tracing::{info, warn};

pub async fn run(args: BatchArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(&args.config)?;

    info!("Loading batch input from {:?}", &args.input);
    let entries = workflows::batch::read_batch_file(&args.input)?;
    let oracle = ExhaustiveOracle::from_config(&config.sampling);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Folding {} peptide(s)...", entries.len());
    let summary = tokio::task::block_in_place(|| {
        workflows::batch::run(
            &entries,
            &config,
            &oracle,
            &args.output,
            args.replace,
            &reporter,
        )
    })?;

    for item in &summary.items {
        match &item.outcome {
            Ok(paths) => println!(
                "✓ {} ({:.2}s) written to: {}",
                item.id,
                item.seconds,
                paths.root.display()
            ),
            Err(e) => println!("✗ {} ({:.2}s) failed: {}", item.id, item.seconds, e),
        }
    }
    println!(
        "Batch complete: {} succeeded, {} failed. Timing log: {}",
        summary.succeeded(),
        summary.failed(),
        summary.timing_log.display()
    );
    if summary.failed() > 0 {
        warn!("{} peptide(s) failed to fold.", summary.failed());
    }

    Ok(())
}
