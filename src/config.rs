//! Argument discovery and pseudo-argument configuration

use std::env;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default name of the order-by pseudo-argument
pub const DEFAULT_ORDER_BY_ARGUMENT: &str = "OrderBy";

/// Default name of the page pseudo-argument
pub const DEFAULT_PAGE_ARGUMENT: &str = "Page";

/// Default name of the page size pseudo-argument
pub const DEFAULT_PAGE_SIZE_ARGUMENT: &str = "PageSize";

/// Default recursion limit for nested object traversal
pub const DEFAULT_MAX_RECURSION_LEVEL: usize = 2;

/// Configuration for argument discovery and the pseudo-arguments it adds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct QueryArgsConfig {
    /// How many object levels below the root are walked.
    /// 0 keeps only the root type's own scalar fields.
    pub max_recursion_level: usize,

    /// Walk into list-of-object fields (emitting existential filters).
    /// When off, such fields produce no arguments at all.
    pub support_list_graph_type: bool,

    /// Name of the order-by pseudo-argument
    pub order_by_argument: String,

    /// Name of the (zero-based) page pseudo-argument
    pub page_argument: String,

    /// Name of the page size pseudo-argument
    pub page_size_argument: String,
}

impl Default for QueryArgsConfig {
    fn default() -> Self {
        Self {
            max_recursion_level: DEFAULT_MAX_RECURSION_LEVEL,
            support_list_graph_type: false,
            order_by_argument: DEFAULT_ORDER_BY_ARGUMENT.to_string(),
            page_argument: DEFAULT_PAGE_ARGUMENT.to_string(),
            page_size_argument: DEFAULT_PAGE_SIZE_ARGUMENT.to_string(),
        }
    }
}

impl QueryArgsConfig {
    /// Load configuration from environment variables (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            max_recursion_level: match env::var("QUERY_ARGS_MAX_RECURSION_LEVEL") {
                Ok(value) => value
                    .parse()
                    .context("Invalid QUERY_ARGS_MAX_RECURSION_LEVEL")?,
                Err(_) => defaults.max_recursion_level,
            },

            support_list_graph_type: env::var("QUERY_ARGS_SUPPORT_LIST_GRAPH_TYPE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.support_list_graph_type),

            order_by_argument: env::var("QUERY_ARGS_ORDER_BY_ARGUMENT")
                .unwrap_or(defaults.order_by_argument),

            page_argument: env::var("QUERY_ARGS_PAGE_ARGUMENT").unwrap_or(defaults.page_argument),

            page_size_argument: env::var("QUERY_ARGS_PAGE_SIZE_ARGUMENT")
                .unwrap_or(defaults.page_size_argument),
        })
    }

    /// Load configuration from a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Invalid query arguments YAML configuration")
    }

    /// Load configuration from a JSON document. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid query arguments JSON configuration")
    }

    pub fn with_max_recursion_level(mut self, level: usize) -> Self {
        self.max_recursion_level = level;
        self
    }

    pub fn with_list_graph_type_support(mut self, enabled: bool) -> Self {
        self.support_list_graph_type = enabled;
        self
    }
}
