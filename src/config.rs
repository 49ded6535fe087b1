//! Fixed default paths and column names for the batch jobs. Each binary
//! accepts positional arguments that override these.

/// Hand-authored codebook outline (input to the extractor).
pub const OUTLINE_PATH: &str = "data/processed/v4/vdem_codebook_structure.txt";

/// Hierarchy artifact (extractor output, aggregator input).
pub const TREE_PATH: &str = "data/processed/v4/vdem_mindmap_structure.json";

/// Raw country-year dataset (input to the aggregator).
pub const RAW_DATA_PATH: &str = "data/raw/V-Dem-CY-Full+Others-v15.csv";

/// Aggregated series artifact (aggregator output).
pub const DATA_PATH: &str = "data/processed/v4/vdem_data.json";

/// Root node constants for the hierarchy artifact.
pub const ROOT_ID: &str = "vdem_root";
pub const ROOT_LABEL: &str = "V-Dem Veri Seti (v15)";

/// Join-key columns in the raw dataset.
pub const ENTITY_COLUMN: &str = "country_text_id";
pub const PERIOD_COLUMN: &str = "year";
