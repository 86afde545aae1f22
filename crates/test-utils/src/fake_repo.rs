use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A throwaway lab checkout: `<root>/code/<project>` directories plus
/// whatever files a test drops in.
pub struct FakeRepo {
    dir: TempDir,
}

impl FakeRepo {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        fs::create_dir(dir.path().join("code"))?;
        Ok(Self { dir })
    }

    /// Repo with the usual lab projects.
    pub fn with_lab_projects() -> std::io::Result<Self> {
        let repo = Self::new()?;
        repo.add_project("kernel")?;
        repo.add_project("kernel_lab2")?;
        Ok(repo)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn make_root(&self) -> PathBuf {
        self.root().join("code")
    }

    pub fn add_project(&self, name: &str) -> std::io::Result<()> {
        fs::create_dir_all(self.make_root().join(name))
    }

    pub fn write_file(&self, rel: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }
}
