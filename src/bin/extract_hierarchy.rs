use anyhow::{bail, Context, Result};
use std::{env, fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vdemprep::{config, hierarchy};

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();

    // Optional positional overrides for the default paths.
    let args: Vec<String> = env::args().collect();
    if args.len() > 3 {
        eprintln!("Usage: {} [outline.txt] [tree.json]", args[0]);
        std::process::exit(1);
    }
    let outline = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::OUTLINE_PATH));
    let tree_out = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::TREE_PATH));

    if !outline.exists() {
        bail!("outline document not found at {}", outline.display());
    }

    info!(path = %outline.display(), "parsing outline");
    let text = fs::read_to_string(&outline)
        .with_context(|| format!("reading {}", outline.display()))?;
    let tree = hierarchy::parse_outline(&text)?;
    info!(nodes = tree.count(), "built hierarchy");

    let bytes = hierarchy::write_tree(&tree, &tree_out)?;
    info!(path = %tree_out.display(), bytes, "saved hierarchy artifact");

    Ok(())
}
