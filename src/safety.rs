use std::path::{Path, PathBuf};
use thiserror::Error;

/// Site safety checks to prevent rewriting files outside the target site root.
#[derive(Debug, Clone)]
pub struct SiteGuard {
    /// Absolute path to the site root
    site_root: PathBuf,
    /// Canonical paths to forbidden directories
    forbidden_paths: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("Path is outside site root: {path} (site: {site})")]
    OutsideSite { path: PathBuf, site: PathBuf },

    #[error("Path is in forbidden directory: {path} (forbidden: {forbidden})")]
    ForbiddenPath { path: PathBuf, forbidden: PathBuf },

    #[error("Failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

impl SiteGuard {
    /// Create a new site guard with the given root.
    ///
    /// The site root will be canonicalized to handle symlinks correctly.
    pub fn new(site_root: impl AsRef<Path>) -> Result<Self, SafetyError> {
        let site_root = site_root.as_ref().canonicalize()?;

        // Directories the patcher must never rewrite, even though they live
        // under the site root
        let mut forbidden_paths = Vec::new();
        for name in [".git", ".svn", "node_modules"] {
            if let Ok(dir) = site_root.join(name).canonicalize() {
                forbidden_paths.push(dir);
            }
        }

        Ok(Self {
            site_root,
            forbidden_paths,
        })
    }

    /// Check if a path is safe to rewrite.
    ///
    /// Returns the canonicalized absolute path if safe.
    ///
    /// Note: This performs canonicalization at validation time. For maximum
    /// TOCTOU safety, callers should re-validate immediately before write
    /// operations in adversarial environments.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SafetyError> {
        let path = path.as_ref();

        // Resolve relative paths against the site root
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.site_root.join(path)
        };

        // Canonicalize to resolve symlinks and .. components
        let canonical = absolute.canonicalize()?;

        self.check_canonical(&canonical)?;

        Ok(canonical)
    }

    /// Re-validate a previously-validated canonical path.
    ///
    /// Call this immediately before write to close the TOCTOU window:
    /// the path is re-canonicalized and re-checked against the site root
    /// and forbidden boundaries.
    pub fn revalidate(&self, path: &Path) -> Result<PathBuf, SafetyError> {
        let canonical = path.canonicalize()?;
        self.check_canonical(&canonical)?;
        Ok(canonical)
    }

    fn check_canonical(&self, canonical: &Path) -> Result<(), SafetyError> {
        // Check if inside the site root
        if !canonical.starts_with(&self.site_root) {
            return Err(SafetyError::OutsideSite {
                path: canonical.to_path_buf(),
                site: self.site_root.clone(),
            });
        }

        // Check against forbidden paths
        for forbidden in &self.forbidden_paths {
            if canonical.starts_with(forbidden) {
                return Err(SafetyError::ForbiddenPath {
                    path: canonical.to_path_buf(),
                    forbidden: forbidden.clone(),
                });
            }
        }

        Ok(())
    }

    /// Get the site root.
    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    /// Create a guard with custom forbidden paths (for testing).
    #[cfg(test)]
    pub fn with_forbidden(
        site_root: impl AsRef<Path>,
        forbidden: Vec<PathBuf>,
    ) -> Result<Self, SafetyError> {
        let site_root = site_root.as_ref().canonicalize()?;
        Ok(Self {
            site_root,
            forbidden_paths: forbidden,
        })
    }
}
