use anyhow::{bail, Context, Result};
use std::{fs, path::Path};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vdemprep::{config, hierarchy, series};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) extract the hierarchy from the codebook outline ──────────
    let outline = Path::new(config::OUTLINE_PATH);
    if !outline.exists() {
        bail!("outline document not found at {}", outline.display());
    }
    let text = fs::read_to_string(outline)
        .with_context(|| format!("reading {}", outline.display()))?;
    let tree = hierarchy::parse_outline(&text)?;
    info!(nodes = tree.count(), "built hierarchy");

    let bytes = hierarchy::write_tree(&tree, config::TREE_PATH)?;
    info!(path = config::TREE_PATH, bytes, "saved hierarchy artifact");

    // ─── 3) aggregate the raw dataset against the tree's columns ─────
    let required = series::required_columns(&tree);
    info!(indicators = required.len(), "collected required columns");

    let aggregated = series::aggregate_file(
        config::RAW_DATA_PATH,
        &required,
        config::ENTITY_COLUMN,
        config::PERIOD_COLUMN,
    )?;
    info!(indicators = aggregated.len(), "aggregated series");

    let bytes = series::write_series(&aggregated, config::DATA_PATH)?;
    info!(
        "saved series artifact to {} ({:.2} MB)",
        config::DATA_PATH,
        bytes as f64 / 1024.0 / 1024.0
    );

    info!("all done");
    Ok(())
}
