//! Filesystem build host.
//!
//! Scans a Solidity source tree and follows `import` directives, so the
//! tool works without a build tool feeding it a graph. Imports starting
//! with `./` or `../` are resolved against the importing file, everything
//! else is a source name looked up under the project root and then under
//! `node_modules/`.

use async_trait::async_trait;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::collections::VecDeque;
use walkdir::WalkDir;

use crate::{
    config::PathsConfig,
    graph::{DependencyGraph, HostCompiler, HostError, ResolvedFile},
};

const SOLIDITY_EXT: &str = "sol";
const NODE_MODULES: &str = "node_modules";

fn import_regex() -> Result<&'static Regex, HostError> {
    lazy_static! {
        static ref IMPORT_REGEX: Result<Regex, regex::Error> =
            Regex::new(r#"\bimport\s+(?:[^'";]*?\s+from\s+)?["']([^"']+)["']"#);
    }

    IMPORT_REGEX
        .as_ref()
        .map_err(|err| HostError::Regex(err.clone()))
}

fn comment_regex() -> Result<&'static Regex, HostError> {
    lazy_static! {
        static ref COMMENT_REGEX: Result<Regex, regex::Error> =
            Regex::new(r"(?s)/\*.*?\*/|//[^\n]*");
    }

    COMMENT_REGEX
        .as_ref()
        .map_err(|err| HostError::Regex(err.clone()))
}

#[derive(Debug, Clone)]
pub struct FsHost {
    root: Utf8PathBuf,
    sources: Utf8PathBuf,
}

impl FsHost {
    pub fn new(root: impl Into<Utf8PathBuf>, sources: impl AsRef<Utf8Path>) -> Self {
        let root = root.into();
        let sources = root.join(sources);
        Self { root, sources }
    }

    pub fn from_config(paths: &PathsConfig) -> Self {
        Self::new(paths.root.clone(), &paths.sources)
    }

    fn locate(&self, source_name: &str) -> Option<Utf8PathBuf> {
        let local = self.root.join(source_name);
        if local.is_file() {
            return Some(local);
        }

        let installed = self.root.join(NODE_MODULES).join(source_name);
        installed.is_file().then_some(installed)
    }
}

/// # Errors
///
/// Will return `Err` if the import pattern fails to compile.
pub fn parse_imports(content: &str) -> Result<Vec<String>, HostError> {
    let code = comment_regex()?.replace_all(content, " ");
    Ok(import_regex()?
        .captures_iter(&code)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .collect())
}

pub fn resolve_import(importer: &str, import: &str) -> String {
    if import.starts_with("./") || import.starts_with("../") {
        let parent = Utf8Path::new(importer)
            .parent()
            .unwrap_or_else(|| Utf8Path::new(""));
        normalize(&parent.join(import))
    } else {
        normalize(Utf8Path::new(import))
    }
}

fn normalize(path: &Utf8Path) -> String {
    let mut parts: Vec<&str> = vec![];
    for component in path.components() {
        match component {
            Utf8Component::Normal(part) => parts.push(part),
            Utf8Component::ParentDir => {
                parts.pop();
            }
            Utf8Component::CurDir | Utf8Component::RootDir | Utf8Component::Prefix(_) => {}
        }
    }
    parts.join("/")
}

#[async_trait]
impl HostCompiler for FsHost {
    async fn source_paths(&self) -> Result<Vec<Utf8PathBuf>, HostError> {
        debug!("Collecting Solidity sources under {}", self.sources);

        let mut paths: Vec<Utf8PathBuf> = vec![];
        for entry in WalkDir::new(&self.sources)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|f| f.file_type().is_file())
            .filter(|f| f.path().extension().is_some_and(|ext| ext == SOLIDITY_EXT))
        {
            paths.push(Utf8PathBuf::try_from(entry.into_path())?);
        }
        paths.sort();

        Ok(paths)
    }

    async fn source_names(&self, paths: &[Utf8PathBuf]) -> Result<Vec<String>, HostError> {
        paths
            .iter()
            .map(|path| {
                let relative = path
                    .strip_prefix(&self.root)
                    .map_err(|_| HostError::OutsideRoot {
                        path: path.clone(),
                        root: self.root.clone(),
                    })?;
                Ok(normalize(relative))
            })
            .collect()
    }

    async fn dependency_graph(&self, names: &[String]) -> Result<DependencyGraph, HostError> {
        let mut graph = DependencyGraph::new();
        let mut queue: VecDeque<String> = names.iter().cloned().collect();
        let mut missing: Vec<String> = vec![];

        while let Some(source_name) = queue.pop_front() {
            if graph.contains(&source_name) || missing.contains(&source_name) {
                continue;
            }

            let Some(path) = self.locate(&source_name) else {
                warn!("Couldn't find {source_name} in project or {NODE_MODULES}");
                missing.push(source_name);
                continue;
            };

            let raw_content = tokio::fs::read_to_string(&path).await.map_err(|e| HostError::Io {
                path: path.to_string(),
                error: e.to_string(),
            })?;

            let imports: Vec<String> = parse_imports(&raw_content)?
                .iter()
                .map(|import| resolve_import(&source_name, import))
                .collect();
            debug!("{source_name} imports {imports:?}");

            queue.extend(imports.iter().cloned());
            graph.add_file(ResolvedFile::new(source_name, raw_content, imports));
        }

        Ok(graph)
    }
}
