use super::traits::DiffSource;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocalGitError {
    #[error("git error: {0}")]
    Git(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a git repository")]
    NotARepo,
}

/// Reference `DiffSource` backed by a local git checkout. Shells out to
/// `git` directly, the same way the teacher's diff-source adapter does,
/// rather than linking a git library.
#[derive(Debug)]
pub struct LocalGitSource {
    repo_path: PathBuf,
}

impl LocalGitSource {
    pub fn new(repo_path: PathBuf) -> Result<Self, LocalGitError> {
        if !repo_path.join(".git").exists() {
            return Err(LocalGitError::NotARepo);
        }
        Ok(Self { repo_path })
    }

    fn run_git(&self, args: &[&str]) -> Result<String, LocalGitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(LocalGitError::Git(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ))
        }
    }

    /// Extract `base_ref`'s tree into a fresh temp directory via `git
    /// archive`, piped straight into `tar`.
    fn materialize_ref(&self, base_ref: &str) -> Result<tempfile::TempDir, LocalGitError> {
        let dir = tempfile::tempdir()?;
        let archive = Command::new("git")
            .args(["archive", base_ref])
            .current_dir(&self.repo_path)
            .output()?;
        if !archive.status.success() {
            return Err(LocalGitError::Git(
                String::from_utf8_lossy(&archive.stderr).to_string(),
            ));
        }

        let mut tar = Command::new("tar")
            .args(["-x", "-C"])
            .arg(dir.path())
            .stdin(std::process::Stdio::piped())
            .spawn()?;
        {
            use std::io::Write;
            tar.stdin
                .as_mut()
                .expect("tar stdin was piped")
                .write_all(&archive.stdout)?;
        }
        let status = tar.wait()?;
        if !status.success() {
            return Err(LocalGitError::Git("tar extraction failed".to_owned()));
        }

        Ok(dir)
    }

    /// Copy the working tree's tracked + untracked (non-ignored) files
    /// into a fresh temp directory.
    fn materialize_working_tree(&self) -> Result<tempfile::TempDir, LocalGitError> {
        let dir = tempfile::tempdir()?;
        let tracked = self.run_git(&["ls-files", "--cached", "--others", "--exclude-standard"])?;

        for relative in tracked.lines().filter(|l| !l.is_empty()) {
            let src = self.repo_path.join(relative);
            if !src.is_file() {
                continue;
            }
            let dst = dir.path().join(relative);
            if let Some(parent) = dst.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(&src, &dst)?;
        }

        Ok(dir)
    }
}

impl DiffSource for LocalGitSource {
    type Error = LocalGitError;

    fn enumerate_changed_files(&self, base_ref: &str) -> Result<Vec<String>, Self::Error> {
        let mut files = Vec::new();

        let committed = self.run_git(&["diff", "--name-only", base_ref])?;
        files.extend(committed.lines().map(str::to_owned));

        let untracked = self.run_git(&["ls-files", "--others", "--exclude-standard"])?;
        files.extend(untracked.lines().map(str::to_owned));

        files.sort();
        files.dedup();
        Ok(files)
    }

    fn diff_for_file(&self, base_ref: &str, relative_path: &str) -> Result<String, Self::Error> {
        let tracked = self.run_git(&[
            "diff",
            "--src-prefix=a/",
            "--dst-prefix=b/",
            base_ref,
            "--",
            relative_path,
        ])?;
        if !tracked.is_empty() {
            return Ok(tracked);
        }

        // Untracked file: synthesize a diff against /dev/null so the
        // parser sees a pure addition, the same shape a tracked addition
        // produces.
        let is_untracked = self
            .run_git(&["ls-files", "--others", "--exclude-standard", "--", relative_path])?
            .lines()
            .any(|l| l == relative_path);
        if !is_untracked {
            return Ok(String::new());
        }
        self.run_git(&[
            "diff",
            "--src-prefix=a/",
            "--dst-prefix=b/",
            "--no-index",
            "/dev/null",
            relative_path,
        ])
        .or_else(|_| {
            // `git diff --no-index` exits 1 on a real diff, which
            // `run_git` treats as an error; recover by reading stdout
            // directly.
            let output = Command::new("git")
                .args([
                    "diff",
                    "--src-prefix=a/",
                    "--dst-prefix=b/",
                    "--no-index",
                    "/dev/null",
                    relative_path,
                ])
                .current_dir(&self.repo_path)
                .output()?;
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        })
    }

    fn materialize(
        &self,
        base_ref: &str,
    ) -> Result<(tempfile::TempDir, tempfile::TempDir), Self::Error> {
        let base = self.materialize_ref(base_ref)?;
        let current = self.materialize_working_tree()?;
        Ok((base, current))
    }
}

/// Read a file's full contents at `git_ref`, or `None` if it doesn't
/// exist there — used to populate [`crate::model::DiffFile::base_content`]
/// and `current_content` when a caller wants the whole file rather than
/// just a materialized directory.
pub fn read_file_at_ref(
    repo_path: &Path,
    git_ref: &str,
    relative_path: &str,
) -> Result<Option<String>, LocalGitError> {
    let ref_spec = format!("{git_ref}:{relative_path}");
    let output = Command::new("git")
        .args(["show", &ref_spec])
        .current_dir(repo_path)
        .output()?;
    if output.status.success() {
        Ok(Some(String::from_utf8_lossy(&output.stdout).to_string()))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_repo(dir: &Path) {
        let run = |args: &[&str]| {
            Command::new("git")
                .args(args)
                .current_dir(dir)
                .output()
                .expect("git available in test environment")
        };
        run(&["init", "-q"]);
        run(&["config", "user.email", "test@example.com"]);
        run(&["config", "user.name", "test"]);
    }

    #[test]
    fn rejects_non_repo_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            LocalGitSource::new(dir.path().to_path_buf()),
            Err(LocalGitError::NotARepo)
        ));
    }

    #[test]
    fn enumerates_untracked_and_modified_files() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        std::fs::write(dir.path().join("a.rs"), "fn a() {}\n").unwrap();
        Command::new("git")
            .args(["add", "a.rs"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        Command::new("git")
            .args(["commit", "-q", "-m", "init"])
            .current_dir(dir.path())
            .output()
            .unwrap();

        std::fs::write(dir.path().join("a.rs"), "fn a() { 1 }\n").unwrap();
        std::fs::write(dir.path().join("b.rs"), "fn b() {}\n").unwrap();

        let source = LocalGitSource::new(dir.path().to_path_buf()).unwrap();
        let mut files = source.enumerate_changed_files("HEAD").unwrap();
        files.sort();
        assert_eq!(files, vec!["a.rs".to_owned(), "b.rs".to_owned()]);
    }
}
