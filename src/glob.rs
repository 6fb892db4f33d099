use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use log::trace;
use walkdir::{DirEntry, WalkDir};

use crate::error::{PagebindError, Result};

/// Expands a pages pattern into the list of candidate files.
pub trait PathGlob {
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// Matches the pattern against the real filesystem.
///
/// The walk starts at the longest wildcard-free prefix of the pattern and only
/// yields regular files. Entries within a directory are visited in file-name
/// order, so the result is stable for a given directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsGlob;

impl PathGlob for FsGlob {
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let matcher = compile(pattern)?;
        let root = literal_root(pattern);
        let walk_root = if root.as_os_str().is_empty() {
            Path::new(".")
        } else {
            root.as_path()
        };

        let mut walker = WalkDir::new(walk_root).sort_by_file_name();
        if !pattern.contains("**") {
            let depth = Path::new(pattern).components().count()
                - root.components().count();
            walker = walker.max_depth(depth);
        }

        let mut matches = Vec::new();
        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            if !is_file(&entry) {
                continue;
            }
            // Relative patterns are matched without the leading `./` of the walk root.
            let candidate = if root.as_os_str().is_empty() {
                entry.path().strip_prefix(".").unwrap_or(entry.path())
            } else {
                entry.path()
            };
            if matcher.is_match(candidate) {
                trace!("glob {pattern} matched {}", candidate.display());
                matches.push(candidate.to_path_buf());
            }
        }

        Ok(matches)
    }
}

/// Regular files, or symlinks that resolve to one.
fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        || (entry.path_is_symlink()
            && std::fs::metadata(entry.path()).is_ok_and(|m| m.is_file()))
}

/// Matches the pattern against a fixed, caller-ordered listing.
///
/// Paths are returned in listing order, which makes enumeration order fully
/// controllable when several files normalize to the same name.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    paths: Vec<PathBuf>,
}

impl Listing {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl PathGlob for Listing {
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let matcher = compile(pattern)?;
        Ok(self
            .paths
            .iter()
            .filter(|p| matcher.is_match(p))
            .cloned()
            .collect())
    }
}

fn compile(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| PagebindError::GlobPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;
    Ok(glob.compile_matcher())
}

/// Leading components of `pattern` that contain no wildcard syntax.
fn literal_root(pattern: &str) -> PathBuf {
    let mut root = PathBuf::new();
    for component in Path::new(pattern).components() {
        if let Component::Normal(part) = component {
            let text = part.to_string_lossy();
            if text.contains(|c: char| matches!(c, '*' | '?' | '[' | '{')) {
                break;
            }
        }
        root.push(component);
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn literal_root_stops_at_first_wildcard() {
        assert_eq!(literal_root("/srv/pages/*.html"), PathBuf::from("/srv/pages"));
        assert_eq!(literal_root("pages/**/x.txt"), PathBuf::from("pages"));
        assert_eq!(literal_root("*.tmpl"), PathBuf::new());
        assert_eq!(literal_root("a/b/c.txt"), PathBuf::from("a/b/c.txt"));
    }

    #[test]
    fn expands_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "two.tmpl");
        touch(dir.path(), "one.tmpl");
        touch(dir.path(), "base.basetmpl");

        let pattern = format!("{}/*.tmpl", dir.path().display());
        let found = FsGlob.expand(&pattern).unwrap();

        assert_eq!(
            found,
            vec![dir.path().join("one.tmpl"), dir.path().join("two.tmpl")]
        );
    }

    #[test]
    fn star_does_not_cross_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "top.tmpl");
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub"), "deep.tmpl");

        let pattern = format!("{}/*.tmpl", dir.path().display());
        let found = FsGlob.expand(&pattern).unwrap();

        assert_eq!(found, vec![dir.path().join("top.tmpl")]);
    }

    #[test]
    fn double_star_descends() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        touch(&dir.path().join("a/b"), "deep.tmpl");

        let pattern = format!("{}/**/*.tmpl", dir.path().display());
        let found = FsGlob.expand(&pattern).unwrap();

        assert_eq!(found, vec![dir.path().join("a/b/deep.tmpl")]);
    }

    #[test]
    fn directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.tmpl")).unwrap();
        touch(dir.path(), "page.tmpl");

        let pattern = format!("{}/*.tmpl", dir.path().display());
        let found = FsGlob.expand(&pattern).unwrap();

        assert_eq!(found, vec![dir.path().join("page.tmpl")]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_pages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("shared")).unwrap();
        touch(&dir.path().join("shared"), "real.txt");
        std::os::unix::fs::symlink(
            dir.path().join("shared/real.txt"),
            dir.path().join("one.tmpl"),
        )
        .unwrap();
        std::os::unix::fs::symlink(dir.path().join("shared"), dir.path().join("linked.tmpl"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("dangling.tmpl"))
            .unwrap();
        touch(dir.path(), "two.tmpl");

        let pattern = format!("{}/*.tmpl", dir.path().display());
        let found = FsGlob.expand(&pattern).unwrap();

        assert_eq!(
            found,
            vec![dir.path().join("one.tmpl"), dir.path().join("two.tmpl")]
        );
    }

    #[test]
    fn missing_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/nowhere/*.tmpl", dir.path().display());
        assert!(FsGlob.expand(&pattern).unwrap().is_empty());
    }

    #[test]
    fn malformed_pattern_errors() {
        let err = FsGlob.expand("pages/[a-").unwrap_err();
        match err {
            PagebindError::GlobPattern { pattern, .. } => assert_eq!(pattern, "pages/[a-"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn listing_keeps_caller_order() {
        let listing = Listing::new(["t/ONE.md", "t/skip.txt", "t/One.TXT", "t/one.tmpl"]);
        let found = listing.expand("t/*.{md,TXT,tmpl}").unwrap();
        assert_eq!(
            found,
            vec![
                PathBuf::from("t/ONE.md"),
                PathBuf::from("t/One.TXT"),
                PathBuf::from("t/one.tmpl"),
            ]
        );
    }
}
