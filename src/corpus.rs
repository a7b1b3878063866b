//! Skill corpus discovery, loading and all-or-nothing rewrites.
//!
//! Skills live at `<shards_root>/<shard>/<id>-<slug>/SKILL.md`. The parent
//! directory name carries the numeric rank and the grouping slug.
use crate::error::PreconditionError;
use crate::util::display_path;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const SKILL_FILE_NAME: &str = "SKILL.md";

/// Where a skill lives and what its directory name encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillLocation {
    pub id: u64,
    pub slug: String,
    /// Skill directory relative to the audit root.
    pub dir: String,
    pub file: PathBuf,
}

impl SkillLocation {
    pub fn from_file(file: &Path, root: &Path) -> Result<Self> {
        let dir = file
            .parent()
            .ok_or_else(|| anyhow!("skill file {} has no parent", file.display()))?;
        let name = dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let (id, slug) = parse_dir_name(&name)?;
        Ok(Self {
            id,
            slug,
            dir: display_path(dir, Some(root)),
            file: file.to_path_buf(),
        })
    }
}

/// Split `<integer-id>-<slug>` at the first `-`.
pub fn parse_dir_name(name: &str) -> Result<(u64, String), PreconditionError> {
    let malformed = || PreconditionError::MalformedLocation(name.to_string());
    let (id, slug) = name.split_once('-').ok_or_else(malformed)?;
    let id = id.parse::<u64>().map_err(|_| malformed())?;
    Ok((id, slug.to_string()))
}

/// One loaded skill document.
#[derive(Debug, Clone)]
pub struct CorpusDocument {
    pub location: SkillLocation,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Corpus {
    pub root: PathBuf,
    pub shards_root: PathBuf,
    pub documents: Vec<CorpusDocument>,
}

impl Corpus {
    /// Discover, size-check and read every skill under `shards_root`.
    ///
    /// Size and naming checks run before any file content is read.
    pub fn load(root: &Path, shards_root: &Path, expected: Option<usize>) -> Result<Self> {
        let files = discover(shards_root)?;
        ensure_expected_count(files.len(), expected, &display_path(shards_root, Some(root)))?;
        let locations = files
            .iter()
            .map(|file| SkillLocation::from_file(file, root))
            .collect::<Result<Vec<_>>>()?;
        let documents = locations
            .into_iter()
            .map(read_document)
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(
            files = documents.len(),
            shards_root = %shards_root.display(),
            "skill corpus loaded"
        );
        Ok(Self {
            root: root.to_path_buf(),
            shards_root: shards_root.to_path_buf(),
            documents,
        })
    }

    /// Re-read every document from disk, keeping the same locations.
    pub fn reload(&self) -> Result<Self> {
        let documents = self
            .documents
            .iter()
            .map(|doc| read_document(doc.location.clone()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            root: self.root.clone(),
            shards_root: self.shards_root.clone(),
            documents,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|doc| doc.text.as_str())
    }
}

fn read_document(location: SkillLocation) -> Result<CorpusDocument> {
    let text = fs::read_to_string(&location.file)
        .with_context(|| format!("read {}", location.file.display()))?;
    Ok(CorpusDocument { location, text })
}

/// Find `<shards_root>/*/*/SKILL.md`, skipping hidden directories, sorted by
/// path text.
pub fn discover(shards_root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !shards_root.is_dir() {
        tracing::warn!(shards_root = %shards_root.display(), "shards root missing");
        return Ok(files);
    }
    let walker = WalkDir::new(shards_root)
        .min_depth(3)
        .max_depth(3)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || entry.depth() == 3 || !is_hidden(entry));
    for entry in walker {
        let entry = entry.with_context(|| format!("walk {}", shards_root.display()))?;
        if entry.file_type().is_file() && entry.file_name() == SKILL_FILE_NAME {
            files.push(entry.into_path());
        }
    }
    files.sort_by_cached_key(|path| path.to_string_lossy().to_string());
    Ok(files)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

pub fn ensure_expected_count(
    found: usize,
    expected: Option<usize>,
    root: &str,
) -> Result<(), PreconditionError> {
    match expected {
        Some(expected) if expected != found => Err(PreconditionError::CorpusSize {
            root: root.to_string(),
            expected,
            found,
        }),
        _ => Ok(()),
    }
}

/// Replace `path` with `text` through a sibling temp file and rename, so a
/// reader sees either the old or the new content.
pub fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    let mut staged = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("stage {}", path.display()))?;
    staged
        .write_all(text.as_bytes())
        .with_context(|| format!("stage {}", path.display()))?;
    // Temp files are created 0600; keep the mode of the file being replaced.
    if let Ok(meta) = fs::metadata(path) {
        staged
            .as_file()
            .set_permissions(meta.permissions())
            .with_context(|| format!("stage {}", path.display()))?;
    }
    staged
        .persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("publish {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "corpus_tests.rs"]
mod tests;
