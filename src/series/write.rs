use anyhow::{Context, Result};
use std::{collections::HashMap, fs, path::Path};

use super::aggregate::SeriesRecord;

/// Write the aggregated series artifact as compact JSON (machine
/// readers only downstream, so no whitespace). Atomic tmp + rename.
/// Returns the artifact size in bytes.
pub fn write_series<P: AsRef<Path>>(
    series: &HashMap<String, SeriesRecord>,
    path: P,
) -> Result<u64> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let tmp = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    serde_json::to_writer(tmp, series).context("serializing series JSON")?;

    fs::rename(&tmp_path, path).with_context(|| {
        format!("renaming {} -> {}", tmp_path.display(), path.display())
    })?;

    let metadata = fs::metadata(path).context("getting artifact metadata")?;
    Ok(metadata.len())
}
