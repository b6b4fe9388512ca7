//! Where every input and output lives under the docs root.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tour_models::text_of;
use walkdir::WalkDir;

use crate::error::{BuildError, Result};

pub const DEFAULT_DOCS_DIR: &str = "docs";

#[derive(Debug, Clone)]
pub struct SiteLayout {
    docs: PathBuf,
}

impl SiteLayout {
    pub fn new(docs: impl Into<PathBuf>) -> Self {
        SiteLayout { docs: docs.into() }
    }

    pub fn docs(&self) -> &Path {
        &self.docs
    }

    pub fn tracks_dir(&self) -> PathBuf {
        self.docs.join("tracks")
    }

    pub fn overview_path(&self) -> PathBuf {
        self.docs.join("data").join("tours.geojson")
    }

    pub fn detail_dir(&self) -> PathBuf {
        self.docs.join("data").join("tours_detail")
    }

    pub fn detail_path(&self, slug: &str) -> PathBuf {
        self.detail_dir().join(format!("{}.geojson", slug))
    }

    pub fn page_template_path(&self) -> PathBuf {
        self.docs.join("templates").join("tour_page.html")
    }

    pub fn markdown_dir(&self) -> PathBuf {
        self.docs.join("tours_md")
    }

    pub fn markdown_template_path(&self) -> PathBuf {
        self.markdown_dir().join("_template.md")
    }

    pub fn markdown_path(&self, slug: &str) -> PathBuf {
        self.markdown_dir().join(format!("{}.md", slug))
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.docs.join("tours")
    }

    pub fn page_path(&self, slug: &str) -> PathBuf {
        self.pages_dir().join(format!("{}.html", slug))
    }
}

/// Files directly inside `dir` with the given extension, sorted by path.
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(BuildError::MissingDirectory(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dir).to_path_buf();
            BuildError::io(&path, err.into())
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// File name without its extension.
pub fn slug_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| BuildError::io(path, err))
}

pub fn read_json(path: &Path) -> Result<Value> {
    serde_json::from_str(&read_text(path)?).map_err(|err| BuildError::json(path, err))
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
    }
    fs::write(path, text).map_err(|err| BuildError::io(path, err))
}

pub fn to_pretty_json(path: &Path, value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| BuildError::json(path, err))
}

/// Writes `text` unless the file already holds exactly that. Returns whether
/// anything was written.
pub fn write_if_changed(path: &Path, text: &str) -> Result<bool> {
    if path.is_file() && read_text(path)? == text {
        return Ok(false);
    }
    write_text(path, text)?;
    Ok(true)
}

/// Overview properties keyed by slug. A missing or unreadable overview is
/// treated as empty.
pub fn load_overview_by_slug(path: &Path) -> BTreeMap<String, Map<String, Value>> {
    if !path.is_file() {
        return BTreeMap::new();
    }
    let document = match read_json(path) {
        Ok(document) => document,
        Err(err) => {
            log::warn!("Ignoring overview: {}", err);
            return BTreeMap::new();
        }
    };

    let mut by_slug = BTreeMap::new();
    let features = document.get("features").and_then(Value::as_array);
    for feature in features.into_iter().flatten() {
        let Some(properties) = feature.get("properties").and_then(Value::as_object) else {
            continue;
        };
        if let Some(slug) = properties.get("slug").and_then(text_of) {
            by_slug.insert(slug, properties.clone());
        }
    }
    by_slug
}
