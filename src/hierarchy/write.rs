use anyhow::{bail, Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use super::node::Node;

/// Write the tree artifact as pretty-printed JSON with a trailing
/// newline. Written atomically: to a tmp file, then renamed over the
/// target. Returns the artifact size in bytes.
pub fn write_tree<P: AsRef<Path>>(tree: &Node, path: P) -> Result<u64> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    let tmp_path: PathBuf = path.with_extension("json.tmp");
    let mut tmp = fs::File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    serde_json::to_writer_pretty(&mut tmp, tree).context("serializing hierarchy JSON")?;
    tmp.write_all(b"\n")?;

    fs::rename(&tmp_path, path).with_context(|| {
        format!("renaming {} -> {}", tmp_path.display(), path.display())
    })?;

    let metadata = fs::metadata(path).context("getting artifact metadata")?;
    Ok(metadata.len())
}

/// Read a previously written tree artifact.
pub fn read_tree<P: AsRef<Path>>(path: P) -> Result<Node> {
    let path = path.as_ref();
    if !path.exists() {
        bail!("hierarchy artifact not found at {}", path.display());
    }
    let file =
        fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("parsing hierarchy artifact {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::parse_outline;
    use tempfile::tempdir;

    #[test]
    fn round_trip_preserves_node_count_and_content() {
        let text = "### **BÖLÜM 3: Seçimler**\n\
                    #### **3.1 Genel**\n\
                    **3.1.1 Detay:**\n\
                    * **a, b, c**\n\
                    * **d:** With description.\n";
        let tree = parse_outline(text).unwrap();
        let expected = tree.count();

        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested/tree.json");
        write_tree(&tree, &path).unwrap();

        let reread = read_tree(&path).unwrap();
        assert_eq!(reread.count(), expected);
        assert_eq!(reread, tree);
    }

    #[test]
    fn artifact_field_names_match_the_published_shape() {
        let tree = parse_outline("### **BÖLÜM 1: Test**\n* **x:** A variable.\n").unwrap();
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["type"], "root");
        assert_eq!(json["children"][0]["type"], "pillar");
        let leaf = &json["children"][0]["children"][0];
        assert_eq!(leaf["type"], "indicator");
        assert_eq!(leaf["columns"][0], "x");
        assert!(leaf.get("children").is_none());
    }

    #[test]
    fn missing_artifact_is_a_fatal_error() {
        let tmp = tempdir().unwrap();
        let err = read_tree(tmp.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}
