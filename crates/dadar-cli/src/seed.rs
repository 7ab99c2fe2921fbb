//! Seed command handler.

use std::path::Path;

use dadar_core::{AppConfig, SeedFile, StoreConfig};
use dadar_store::FirestoreClient;

/// Per-collection document counts, in file order.
pub(crate) fn summarize(seed: &SeedFile) -> Vec<String> {
    seed.collections
        .iter()
        .map(|c| format!("{}: {} document(s)", c.name, c.documents.len()))
        .collect()
}

/// Load, validate and (unless `dry_run`) commit the seed file.
///
/// # Errors
///
/// Returns an error if the seed file cannot be read or fails validation, or
/// if the commit request fails.
pub(crate) async fn run_seed(config: &AppConfig, path: &Path, dry_run: bool) -> anyhow::Result<()> {
    let seed = dadar_core::load_seed_file(path)?;
    tracing::info!(
        path = %path.display(),
        collections = seed.collections.len(),
        documents = seed.document_count(),
        "seed file loaded"
    );

    if dry_run {
        for line in summarize(&seed) {
            println!("{line}");
        }
        println!("[dry-run] {} document(s) would be written", seed.document_count());
        return Ok(());
    }

    let client = FirestoreClient::new(&StoreConfig::from_app_config(config))?;
    let written = client.commit_seed(&seed).await?;
    println!("seeded {written} document(s)");
    Ok(())
}
