use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::model::ImplementorEntry;
use crate::script::{Script, ScriptError, parse_script};

const IMPLEMENTORS_DIR: &str = "implementors";
const SIDEBAR_FILE: &str = "sidebar-items.js";

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },
}

/// Why a script found in the tree was not loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Read(#[from] io::Error),
    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// A data script found in a documentation tree.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// Path relative to the tree root.
    pub path: PathBuf,
    /// The trait (for implementors) or module (for sidebars) the file belongs to.
    pub item_path: String,
    pub script: Script,
}

/// All implementor and sidebar scripts below a rustdoc output directory.
#[derive(Debug)]
pub struct DocTree {
    pub root: PathBuf,
    pub files: Vec<LoadedFile>,
    /// Scripts that were found but could not be read or parsed.
    pub failures: Vec<(PathBuf, LoadError)>,
}

impl DocTree {
    pub fn load(root: impl AsRef<Path>) -> Result<Self, TreeError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(TreeError::NotADirectory { path: root });
        }

        let mut paths = collect_scripts(&root)?;
        paths.sort();

        let mut files = Vec::new();
        let mut failures = Vec::new();
        for rel in paths {
            let Some(item_path) = item_path_for(&rel) else {
                continue;
            };
            match load_file(&root.join(&rel)) {
                Ok(script) => files.push(LoadedFile {
                    path: rel,
                    item_path,
                    script,
                }),
                Err(e) => {
                    tracing::warn!(path = %rel.display(), "skipping script: {e}");
                    failures.push((rel, e));
                }
            }
        }

        tracing::debug!(
            root = %root.display(),
            files = files.len(),
            failures = failures.len(),
            "loaded documentation tree"
        );
        Ok(Self {
            root,
            files,
            failures,
        })
    }

    /// Traits implemented by `type_path`, as `(trait, crate, entry)`.
    pub fn traits_implemented_by<'a>(
        &'a self,
        type_path: &'a str,
    ) -> Vec<(&'a str, &'a str, &'a ImplementorEntry)> {
        self.files
            .iter()
            .filter_map(|file| match &file.script {
                Script::Implementors(table) => Some((file.item_path.as_str(), table)),
                Script::Sidebar(_) => None,
            })
            .flat_map(|(trait_path, table)| {
                table
                    .implementors_of_type(type_path)
                    .map(move |(krate, entry)| (trait_path, krate, entry))
            })
            .collect()
    }
}

fn load_file(path: &Path) -> Result<Script, LoadError> {
    let src = fs::read_to_string(path)?;
    Ok(parse_script(&src)?)
}

/// Data scripts below `root`, relative to it. Symlinks are not followed.
fn collect_scripts(root: &Path) -> Result<Vec<PathBuf>, TreeError> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(TreeError::Io {
                    path: root.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root)
            && is_data_script(rel)
        {
            out.push(rel.to_path_buf());
        }
    }
    Ok(out)
}

fn is_data_script(rel: &Path) -> bool {
    let Some(name) = rel.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name == SIDEBAR_FILE {
        return true;
    }
    rel.starts_with(IMPLEMENTORS_DIR) && name.starts_with("trait.") && name.ends_with(".js")
}

/// `implementors/core/ops/bit/trait.BitAndAssign.js` -> `core::ops::bit::BitAndAssign`,
/// `time/error/sidebar-items.js` -> `time::error`.
fn item_path_for(rel: &Path) -> Option<String> {
    let mut segments: Vec<&str> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();
    let file = segments.pop()?;

    if file == SIDEBAR_FILE {
        return Some(segments.join("::"));
    }

    if segments.first() == Some(&IMPLEMENTORS_DIR) {
        segments.remove(0);
    }
    let name = file.strip_prefix("trait.")?.strip_suffix(".js")?;
    segments.push(name);
    Some(segments.join("::"))
}
