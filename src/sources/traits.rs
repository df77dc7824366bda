/// Abstracts over where a working set's changed files, diffs, and
/// pre/post snapshots come from — local git, a GitHub PR, etc. The core
/// engine never depends on this trait directly; it is the seam a caller
/// uses to feed [`crate::model::DiffFile`]s into `analyze`.
pub trait DiffSource {
    type Error: std::error::Error;

    /// Relative paths of every file changed between `base_ref` and the
    /// working tree.
    fn enumerate_changed_files(&self, base_ref: &str) -> Result<Vec<String>, Self::Error>;

    /// The unified diff for one changed file between `base_ref` and the
    /// working tree, in a format [`crate::diff::parser`] can parse.
    fn diff_for_file(&self, base_ref: &str, relative_path: &str) -> Result<String, Self::Error>;

    /// Materialize the two snapshot directories the Reference-Graph
    /// Builder walks: `base_ref`'s tree, and the current working tree.
    /// Returns owned temp directories so the caller controls their
    /// lifetime.
    fn materialize(
        &self,
        base_ref: &str,
    ) -> Result<(tempfile::TempDir, tempfile::TempDir), Self::Error>;
}
