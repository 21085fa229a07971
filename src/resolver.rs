use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::graph::DependencyGraph;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerVersion {
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceContent {
    pub content: String,
}

/// Compiler metadata accumulated for one request: the compiler version and
/// the full source closure of every requested contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub compiler: CompilerVersion,
    pub sources: BTreeMap<String, SourceContent>,
}

impl Metadata {
    pub fn new(compiler_version: impl Into<String>) -> Self {
        Self {
            compiler: CompilerVersion {
                version: compiler_version.into(),
            },
            sources: BTreeMap::new(),
        }
    }
}

pub type Visited = HashMap<String, bool>;

/// Copies the raw content of `source_path` and of everything it imports,
/// transitively, into `metadata`.
///
/// Paths already marked in `visited` are skipped, so import cycles and
/// diamonds are walked once. A path the graph doesn't know about is logged
/// and skipped.
pub fn resolve_dependencies(
    graph: &DependencyGraph,
    source_path: &str,
    metadata: &mut Metadata,
    visited: &mut Visited,
) {
    if visited.get(source_path).copied().unwrap_or(false) {
        return;
    }
    visited.insert(source_path.to_string(), true);

    let Some(file) = graph.get(source_path) else {
        warn!("Source {source_path} is missing from the dependency graph, skipping it");
        return;
    };

    debug!("Adding {source_path} to metadata sources");
    metadata.sources.insert(
        source_path.to_string(),
        SourceContent {
            content: file.content.raw_content.clone(),
        },
    );

    for dependency in &file.imports {
        resolve_dependencies(graph, dependency, metadata, visited);
    }
}
