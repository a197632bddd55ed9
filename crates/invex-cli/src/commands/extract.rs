//! Extract command - process one PDF or a directory of PDFs.

use std::path::Path;
use std::time::Instant;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use invex_core::{
    BatchRunner, ChatCompletionClient, DocumentOutcome, LlmInvoiceExtractor, PdfContentSource,
    SqliteStore, discover_documents,
};

use crate::settings;

pub fn run(path: &Path) -> anyhow::Result<()> {
    let start = Instant::now();

    // Nothing is opened or created when there is nothing to process
    let documents = match discover_documents(path) {
        Ok(documents) => documents,
        Err(e) => {
            eprintln!("{} Error: {}", style("✗").red(), e);
            return Ok(());
        }
    };

    let config = settings::load()?;

    println!(
        "{} Found {} PDF files to process",
        style("ℹ").blue(),
        documents.len()
    );

    let store = SqliteStore::open_or_create(&config.store.database)?;
    let client = ChatCompletionClient::from_config(&config.model)?;
    let extractor = LlmInvoiceExtractor::new(client, config.model.name.clone())
        .with_schema_variant(config.model.schema_variant);
    let runner = BatchRunner::new(PdfContentSource, extractor, store);

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let report = runner.run(&documents, |outcome| {
        pb.suspend(|| print_outcome(outcome));
        pb.inc(1);
    });

    pb.finish_and_clear();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.total(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(report.stored.len()).green(),
        style(report.failures.len()).red()
    );

    if !report.failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for failure in &report.failures {
            println!("  - {}: {}", failure.path.display(), failure.error);
        }
    }

    debug!(
        "Stored {} invoices in {}",
        report.stored.len(),
        config.store.database.display()
    );

    Ok(())
}

fn print_outcome(outcome: &DocumentOutcome) {
    match outcome {
        DocumentOutcome::Stored(stored) => {
            println!(
                "{} {} (invoice {}, row {})",
                style("✓").green(),
                stored.path.display(),
                stored.record.invoice_number,
                stored.id
            );
            println!(
                "{}",
                serde_json::to_string_pretty(&stored.record).unwrap_or_default()
            );
        }
        DocumentOutcome::Failed(failure) => {
            println!(
                "{} An error occurred while processing {}: {}",
                style("✗").red(),
                failure.path.display(),
                failure.error
            );
        }
    }
}
