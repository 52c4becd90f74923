use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection a query reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Types,
    Prototypes,
    Nodes,
}

/// Arguments for the analyze command
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to the JSON object graph
    pub input: PathBuf,

    /// Output path for the JSON report (optional)
    pub output: Option<PathBuf>,

    /// Engine configuration file (TOML, optional)
    pub config: Option<PathBuf>,

    /// Number of prototype buckets to keep in the report
    pub top_prototypes: usize,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: Some(PathBuf::from("artifacts/report.json")),
            config: None,
            top_prototypes: 50,
            print_summary: false,
        }
    }
}

/// Arguments for the query command
#[derive(Debug, Clone)]
pub struct QueryArgs {
    /// Path to the JSON object graph
    pub input: PathBuf,

    /// Engine configuration file (TOML, optional)
    pub config: Option<PathBuf>,

    pub view: View,

    /// `field=value`
    pub filter: Option<String>,

    /// `field`, `field:asc` or `field:desc`
    pub order_by: Option<String>,

    pub first: Option<i64>,
}

impl Default for QueryArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            config: None,
            view: View::Types,
            filter: None,
            order_by: None,
            first: None,
        }
    }
}
