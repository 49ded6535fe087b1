use anyhow::Result;
use std::{env, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vdemprep::{config, hierarchy, series};

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();

    // Optional positional overrides for the default paths.
    let args: Vec<String> = env::args().collect();
    if args.len() > 4 {
        eprintln!("Usage: {} [tree.json] [raw.csv] [data.json]", args[0]);
        std::process::exit(1);
    }
    let tree_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::TREE_PATH));
    let raw_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::RAW_DATA_PATH));
    let data_out = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DATA_PATH));

    info!(path = %tree_path.display(), "loading hierarchy artifact");
    let tree = hierarchy::read_tree(&tree_path)?;
    let required = series::required_columns(&tree);
    info!(indicators = required.len(), "collected required columns");

    info!(path = %raw_path.display(), "streaming raw dataset");
    let aggregated = series::aggregate_file(
        &raw_path,
        &required,
        config::ENTITY_COLUMN,
        config::PERIOD_COLUMN,
    )?;
    info!(indicators = aggregated.len(), "aggregated series");

    let bytes = series::write_series(&aggregated, &data_out)?;
    info!(
        "saved series artifact to {} ({:.2} MB)",
        data_out.display(),
        bytes as f64 / 1024.0 / 1024.0
    );

    Ok(())
}
