// File discovery - walk the tree, keep what's worth quizzing on
use crate::{Error, Result};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Directory names we never descend into.
///
/// Dependency installs, build output, VCS metadata and assorted caches.
/// Nobody wants to guess which line of a vendored bundle they're looking at.
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "bower_components",
    "vendor",
    ".git",
    ".hg",
    ".svn",
    "dist",
    "build",
    "out",
    "target",
    ".next",
    ".nuxt",
    ".svelte-kit",
    ".turbo",
    ".parcel-cache",
    "coverage",
    ".nyc_output",
    ".cache",
    "__pycache__",
    ".venv",
];

/// Exact file names that are never eligible
const EXCLUDED_NAMES: &[&str] = &[
    "package-lock.json",
    "npm-shrinkwrap.json",
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
];

/// File name suffixes that are never eligible (matched case-insensitively)
const EXCLUDED_SUFFIXES: &[&str] = &[
    // lockfiles
    ".lock",
    "-lock.json",
    "-lock.yaml",
    // minified bundles and source maps
    ".min.js",
    ".min.css",
    ".map",
    // images
    ".png",
    ".jpg",
    ".jpeg",
    ".gif",
    ".bmp",
    ".ico",
    ".webp",
    ".svg",
    // archives
    ".zip",
    ".tar",
    ".gz",
    ".tgz",
    ".bz2",
    ".xz",
    ".7z",
    ".rar",
    // binaries, fonts, media
    ".exe",
    ".dll",
    ".so",
    ".dylib",
    ".o",
    ".a",
    ".class",
    ".jar",
    ".wasm",
    ".pdf",
    ".woff",
    ".woff2",
    ".ttf",
    ".otf",
    ".eot",
    ".mp3",
    ".mp4",
    ".mov",
    ".pyc",
];

/// The files a session draws from
///
/// Never empty - `enumerate` refuses to build one otherwise, so sampling can
/// always pick something.
#[derive(Debug, Clone)]
pub struct EligibleFiles {
    paths: Vec<PathBuf>,
}

impl EligibleFiles {
    /// Wrap an already-filtered list. `None` if it's empty.
    pub fn new(paths: Vec<PathBuf>) -> Option<Self> {
        if paths.is_empty() {
            None
        } else {
            Some(Self { paths })
        }
    }

    /// Uniform pick - every file is equally likely, however long it is
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &Path {
        &self.paths[rng.gen_range(0..self.paths.len())]
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

/// Is this directory name on the skip list?
pub fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name)
}

/// Is this file name on the skip list?
pub fn is_excluded_file(name: &str) -> bool {
    if EXCLUDED_NAMES.contains(&name) {
        return true;
    }

    let lower = name.to_lowercase();
    EXCLUDED_SUFFIXES
        .iter()
        .any(|suffix| lower.ends_with(suffix))
}

/// The root itself is never judged by name, so running from inside `~/build/foo` still works
fn is_pruned(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(is_excluded_dir)
}

/// Walk `root` and collect every regular file that passes the filter
///
/// Unreadable directories are skipped quietly (well, at debug level).
/// Traversal order is whatever the filesystem hands us - we pick randomly anyway.
pub fn enumerate(root: &Path) -> Result<EligibleFiles> {
    let mut paths = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let excluded = entry
            .file_name()
            .to_str()
            .map(is_excluded_file)
            .unwrap_or(false);
        if excluded {
            continue;
        }

        paths.push(entry.into_path());
    }

    info!("Found {} eligible files under {}", paths.len(), root.display());

    EligibleFiles::new(paths).ok_or_else(|| Error::NoEligibleFiles {
        root: root.to_path_buf(),
    })
}
