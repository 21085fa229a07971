use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("[E040] Failed to read source file '{path}': {error}\n\nSuggestions:\n  • Check the file exists and is readable\n  • Verify the sources directory in tenderly.toml")]
    Io { path: String, error: String },

    #[error("[E041] Source path '{path}' is outside of project root '{root}'")]
    OutsideRoot { path: Utf8PathBuf, root: Utf8PathBuf },

    #[error("[E042] Path contains invalid UTF-8 characters\n\nSuggestions:\n  • Use only ASCII characters in file paths\n  • Avoid special characters in directory names")]
    Utf8(#[from] camino::FromPathBufError),

    #[error("[E043] Import pattern error")]
    Regex(#[from] regex::Error),
}

impl HostError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E040",
            Self::OutsideRoot { .. } => "E041",
            Self::Utf8(_) => "E042",
            Self::Regex(_) => "E043",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub raw_content: String,
}

/// A source file as resolved by the host build tool, with its imports
/// already translated to source names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub source_name: String,
    pub content: FileContent,
    pub imports: Vec<String>,
}

impl ResolvedFile {
    pub fn new(
        source_name: impl Into<String>,
        raw_content: impl Into<String>,
        imports: Vec<String>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            content: FileContent {
                raw_content: raw_content.into(),
            },
            imports,
        }
    }

    /// Contract name implied by the file name, `contracts/Token.sol` is `Token`.
    pub fn contract_name(&self) -> &str {
        contract_name(&self.source_name)
    }
}

pub fn contract_name(source_name: &str) -> &str {
    let file = source_name.rsplit('/').next().unwrap_or(source_name);
    file.split('.').next().unwrap_or(file)
}

/// Resolved source files keyed by source name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    files: BTreeMap<String, ResolvedFile>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: ResolvedFile) {
        self.files.insert(file.source_name.clone(), file);
    }

    pub fn get(&self, source_name: &str) -> Option<&ResolvedFile> {
        self.files.get(source_name)
    }

    pub fn contains(&self, source_name: &str) -> bool {
        self.files.contains_key(source_name)
    }

    /// Ordered by source name.
    pub fn resolved_files(&self) -> impl Iterator<Item = &ResolvedFile> {
        self.files.values()
    }

    pub fn dependencies(&self, source_name: &str) -> &[String] {
        self.files
            .get(source_name)
            .map_or(&[], |file| file.imports.as_slice())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<ResolvedFile> for DependencyGraph {
    fn from_iter<T: IntoIterator<Item = ResolvedFile>>(iter: T) -> Self {
        let mut graph = Self::new();
        for file in iter {
            graph.add_file(file);
        }
        graph
    }
}

/// The build tool that owns compilation and import resolution.
#[async_trait]
pub trait HostCompiler: Send + Sync {
    async fn source_paths(&self) -> Result<Vec<Utf8PathBuf>, HostError>;

    async fn source_names(&self, paths: &[Utf8PathBuf]) -> Result<Vec<String>, HostError>;

    async fn dependency_graph(&self, names: &[String]) -> Result<DependencyGraph, HostError>;
}

/// # Errors
///
/// Will return `Err` if any of the host calls fails.
pub async fn resolve_graph<H: HostCompiler + ?Sized>(
    host: &H,
) -> Result<DependencyGraph, HostError> {
    let paths = host.source_paths().await?;
    let names = host.source_names(&paths).await?;
    host.dependency_graph(&names).await
}

/// Host backed by a graph that was resolved elsewhere.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    graph: DependencyGraph,
}

impl StaticHost {
    pub fn new(graph: DependencyGraph) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl HostCompiler for StaticHost {
    async fn source_paths(&self) -> Result<Vec<Utf8PathBuf>, HostError> {
        Ok(self
            .graph
            .resolved_files()
            .map(|file| Utf8PathBuf::from(&file.source_name))
            .collect())
    }

    async fn source_names(&self, paths: &[Utf8PathBuf]) -> Result<Vec<String>, HostError> {
        Ok(paths.iter().map(ToString::to_string).collect())
    }

    async fn dependency_graph(&self, names: &[String]) -> Result<DependencyGraph, HostError> {
        Ok(self
            .graph
            .resolved_files()
            .filter(|file| names.contains(&file.source_name))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_name_from_source_name() {
        assert_eq!(contract_name("contracts/Token.sol"), "Token");
        assert_eq!(contract_name("Token.sol"), "Token");
        assert_eq!(contract_name("@openzeppelin/contracts/token/ERC20/ERC20.sol"), "ERC20");
        assert_eq!(contract_name("contracts/Token"), "Token");
    }

    #[test]
    fn test_resolved_files_are_ordered() {
        let graph: DependencyGraph = vec![
            ResolvedFile::new("contracts/b.sol", "", vec![]),
            ResolvedFile::new("contracts/a.sol", "", vec![]),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = graph
            .resolved_files()
            .map(|f| f.source_name.as_str())
            .collect();
        assert_eq!(names, vec!["contracts/a.sol", "contracts/b.sol"]);
        assert!(graph.dependencies("contracts/missing.sol").is_empty());
    }

    #[tokio::test]
    async fn test_static_host_round_trips_graph() {
        let graph: DependencyGraph = vec![
            ResolvedFile::new("contracts/Token.sol", "contract Token {}", vec![]),
            ResolvedFile::new("contracts/Lib.sol", "library Lib {}", vec![]),
        ]
        .into_iter()
        .collect();
        let host = StaticHost::new(graph.clone());

        let resolved = resolve_graph(&host).await.unwrap();
        assert_eq!(resolved, graph);
    }
}
