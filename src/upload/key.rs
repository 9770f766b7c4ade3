//! Object key derivation
//!
//! Keys are built with plain string operations on the walked root and the
//! file's directory, not with path relativization. The root is removed from
//! the directory by literal substring replacement (every occurrence, not only
//! the leading one), so a directory name that repeats the root string loses
//! that part too.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use tree_uploadr::upload::key::KeyNamer;
//!
//! let namer = KeyNamer::new("x");
//! assert_eq!(namer.single_file(Path::new("/tmp/report.csv")), "x/report.csv");
//! assert_eq!(
//!     namer.directory(Path::new("/data"), Path::new("/data/sub/b.txt")),
//!     "x/sub/b.txt"
//! );
//! ```

use std::path::Path;

/// Maps local paths to object keys under a bucket prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNamer {
    bucket_prefix: String,
}

impl KeyNamer {
    pub fn new(bucket_prefix: impl Into<String>) -> Self {
        Self {
            bucket_prefix: bucket_prefix.into(),
        }
    }

    /// Key for single-file mode: `{bucket_prefix}/{base name}`
    ///
    /// Where the file lives on disk does not matter.
    pub fn single_file(&self, source: &Path) -> String {
        join_key(&self.bucket_prefix, &base_name(source))
    }

    /// Per-file prefix for directory mode
    ///
    /// `bucket_prefix` followed by the file's directory with `root` removed,
    /// with `\` converted to `/`.
    pub fn directory_prefix(&self, root: &Path, file: &Path) -> String {
        let dir = file
            .parent()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default();
        let root = root.to_string_lossy();

        let relative = if root.is_empty() {
            dir
        } else {
            dir.replace(root.as_ref(), "")
        };

        format!("{}{}", self.bucket_prefix, relative).replace('\\', "/")
    }

    /// Key for directory mode: `{directory_prefix}/{base name}`
    pub fn directory(&self, root: &Path, file: &Path) -> String {
        join_key(&self.directory_prefix(root, file), &base_name(file))
    }
}

fn join_key(prefix: &str, name: &str) -> String {
    format!("{}/{}", prefix, name)
}

/// Last path component, or `.` when the path has none
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_file_key() {
        let namer = KeyNamer::new("docs");
        assert_eq!(namer.single_file(Path::new("/tmp/report.csv")), "docs/report.csv");
        assert_eq!(namer.single_file(Path::new("report.csv")), "docs/report.csv");
        assert_eq!(
            namer.single_file(Path::new("../some/where/else/report.csv")),
            "docs/report.csv"
        );
    }

    #[test]
    fn test_empty_prefix_keeps_leading_slash() {
        let namer = KeyNamer::new("");
        assert_eq!(namer.single_file(Path::new("/tmp/report.csv")), "/report.csv");
        assert_eq!(
            namer.directory(Path::new("/data"), Path::new("/data/a.txt")),
            "/a.txt"
        );
        assert_eq!(
            namer.directory(Path::new("/data"), Path::new("/data/sub/b.txt")),
            "/sub/b.txt"
        );
    }

    #[test]
    fn test_directory_keys() {
        let namer = KeyNamer::new("x");
        let root = Path::new("/data");
        assert_eq!(namer.directory(root, Path::new("/data/a.txt")), "x/a.txt");
        assert_eq!(namer.directory(root, Path::new("/data/sub/b.txt")), "x/sub/b.txt");
        assert_eq!(
            namer.directory(root, Path::new("/data/sub/deeper/c.bin")),
            "x/sub/deeper/c.bin"
        );
    }

    #[test]
    fn test_directory_prefix() {
        let namer = KeyNamer::new("backups/2024");
        assert_eq!(
            namer.directory_prefix(Path::new("/srv/www"), Path::new("/srv/www/img/logo.png")),
            "backups/2024/img"
        );
        assert_eq!(
            namer.directory_prefix(Path::new("/srv/www"), Path::new("/srv/www/index.html")),
            "backups/2024"
        );
    }

    #[test]
    fn test_root_replaced_everywhere_in_directory() {
        let namer = KeyNamer::new("x");
        // "/a" occurs twice in "/a/b/a"; both are removed.
        assert_eq!(
            namer.directory(Path::new("/a"), Path::new("/a/b/a/f.txt")),
            "x/b/f.txt"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_backslashes_become_slashes() {
        let namer = KeyNamer::new(r"win\prefix");
        assert_eq!(
            namer.directory(Path::new("/r"), Path::new(r"/r/a\b/c.txt")),
            "win/prefix/a/b/c.txt"
        );
    }

    #[test]
    fn test_key_is_deterministic() {
        let namer = KeyNamer::new("x");
        let root = Path::new("/data");
        let file = Path::new("/data/sub/b.txt");
        assert_eq!(namer.directory(root, file), namer.directory(root, file));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("/data/sub/b.txt")), "b.txt");
        assert_eq!(base_name(Path::new("b.txt")), "b.txt");
        assert_eq!(base_name(Path::new("/")), ".");
    }
}
