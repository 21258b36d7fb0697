use super::Version;
use crate::common::{APP_VERSION_ENV, CARGO_VERSION_ENV};
use crate::errors::{ErrorKind, MilestoneError, MilestoneResult};
use cargo_toml::Manifest;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Supplies the version the running application is currently at.
///
/// The manager calls this once per `run_migration` decision. Any closure with
/// the signature `Fn() -> MilestoneResult<String>` is a provider, which makes
/// pinning a version in tests a one-liner.
pub trait VersionProvider: Send + Sync {
    fn current_version(&self) -> MilestoneResult<String>;
}

impl<F> VersionProvider for F
where
    F: Send + Sync + Fn() -> MilestoneResult<String>,
{
    fn current_version(&self) -> MilestoneResult<String> {
        self()
    }
}

/// Shared handle to a `VersionProvider` implementation.
///
/// Cloning is cheap; all clones ask the same provider.
#[derive(Clone)]
pub struct VersionSource {
    inner: Arc<dyn VersionProvider>,
}

impl VersionSource {
    pub fn new<T: VersionProvider + 'static>(inner: T) -> Self {
        VersionSource {
            inner: Arc::new(inner),
        }
    }
}

impl Default for VersionSource {
    fn default() -> Self {
        VersionSource::new(EnvVersionProvider::default())
    }
}

impl Deref for VersionSource {
    type Target = Arc<dyn VersionProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Debug for VersionSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionSource").finish()
    }
}

/// Reads the current version from environment variables.
///
/// The default lookup order is `MILESTONE_APP_VERSION` and then
/// `CARGO_PKG_VERSION`. The first variable that is present wins. Cargo only
/// sets `CARGO_PKG_VERSION` for processes it launches, so a deployed binary
/// needs either `MILESTONE_APP_VERSION` or a fallback, see
/// [`with_fallback`](Self::with_fallback) and the `migration_manager!` macro.
#[derive(Debug, Clone)]
pub struct EnvVersionProvider {
    variables: Vec<String>,
    fallback: Option<String>,
}

impl EnvVersionProvider {
    /// Looks up only the given variable.
    pub fn with_variable(name: &str) -> Self {
        EnvVersionProvider {
            variables: vec![name.to_string()],
            fallback: None,
        }
    }

    /// Reports `version` when none of the variables is set.
    pub fn with_fallback(mut self, version: &str) -> Self {
        self.fallback = Some(version.to_string());
        self
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }
}

impl Default for EnvVersionProvider {
    fn default() -> Self {
        EnvVersionProvider {
            variables: vec![APP_VERSION_ENV.to_string(), CARGO_VERSION_ENV.to_string()],
            fallback: None,
        }
    }
}

impl VersionProvider for EnvVersionProvider {
    fn current_version(&self) -> MilestoneResult<String> {
        for name in &self.variables {
            if let Ok(value) = std::env::var(name) {
                return Ok(value);
            }
        }

        if let Some(fallback) = &self.fallback {
            return Ok(fallback.clone());
        }

        Err(MilestoneError::new(
            &format!(
                "Current application version is unknown, none of [{}] is set",
                self.variables.join(", ")
            ),
            ErrorKind::ValidationError,
        ))
    }
}

/// Always reports the same, pre-validated version.
#[derive(Debug, Clone)]
pub struct FixedVersionProvider {
    version: Version,
}

impl FixedVersionProvider {
    pub fn new(version: &str) -> MilestoneResult<Self> {
        Ok(FixedVersionProvider {
            version: Version::parse(version)?,
        })
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

impl VersionProvider for FixedVersionProvider {
    fn current_version(&self) -> MilestoneResult<String> {
        Ok(self.version.as_str().to_string())
    }
}

/// Reads `package.version` from a Cargo manifest.
///
/// A manifest given as text is parsed once. A manifest given as a path is
/// re-read on every call so a rebuilt application picks up its new version.
#[derive(Debug, Clone)]
pub struct ManifestVersionProvider {
    source: ManifestSource,
}

#[derive(Debug, Clone)]
enum ManifestSource {
    Resolved(String),
    File(PathBuf),
}

impl ManifestVersionProvider {
    /// Parses manifest text, typically `include_str!("../Cargo.toml")`.
    pub fn from_manifest_str(manifest: &str) -> MilestoneResult<Self> {
        let version = manifest_version(manifest)?;
        Ok(ManifestVersionProvider {
            source: ManifestSource::Resolved(version),
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        ManifestVersionProvider {
            source: ManifestSource::File(path.as_ref().to_path_buf()),
        }
    }
}

impl VersionProvider for ManifestVersionProvider {
    fn current_version(&self) -> MilestoneResult<String> {
        match &self.source {
            ManifestSource::Resolved(version) => Ok(version.clone()),
            ManifestSource::File(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    MilestoneError::new_with_cause(
                        &format!("Failed to read manifest {}", path.display()),
                        ErrorKind::IOError,
                        MilestoneError::from(e),
                    )
                })?;
                manifest_version(&content)
            }
        }
    }
}

fn manifest_version(manifest: &str) -> MilestoneResult<String> {
    let manifest = Manifest::from_str(manifest).map_err(|e| {
        MilestoneError::new(
            &format!("Failed to parse Cargo manifest: {}", e),
            ErrorKind::ValidationError,
        )
    })?;

    let package = manifest.package.as_ref().ok_or_else(|| {
        MilestoneError::new(
            "Cargo manifest has no [package] section",
            ErrorKind::ValidationError,
        )
    })?;

    package.version.get().map(|v| v.to_string()).map_err(|e| {
        MilestoneError::new(
            &format!("Cargo manifest version is not set explicitly: {}", e),
            ErrorKind::ValidationError,
        )
    })
}

/// Builds a [`FixedVersionProvider`] from the calling crate's
/// `CARGO_PKG_VERSION`, captured at compile time.
///
/// ```rust
/// let provider = milestone::host_version!().unwrap();
/// assert_eq!(provider.version().as_str(), env!("CARGO_PKG_VERSION"));
/// ```
#[macro_export]
macro_rules! host_version {
    () => {
        $crate::version::FixedVersionProvider::new(env!("CARGO_PKG_VERSION"))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_provider() {
        let source = VersionSource::new(|| -> MilestoneResult<String> { Ok("4.9".to_string()) });
        assert_eq!(source.current_version().unwrap(), "4.9");
    }

    #[test]
    fn test_fixed_provider_validates() {
        let provider = FixedVersionProvider::new("2.1").unwrap();
        assert_eq!(provider.current_version().unwrap(), "2.1");

        let err = FixedVersionProvider::new("2.x").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidVersionFormat);
    }

    #[test]
    fn test_env_provider_missing_variable() {
        let provider = EnvVersionProvider::with_variable("MILESTONE_TEST_SURELY_UNSET_VAR");
        let err = provider.current_version().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
        assert!(err.message().contains("MILESTONE_TEST_SURELY_UNSET_VAR"));
    }

    #[test]
    fn test_env_provider_reads_variable() {
        std::env::set_var("MILESTONE_TEST_PROVIDER_VERSION", "3.4.1");
        let provider = EnvVersionProvider::with_variable("MILESTONE_TEST_PROVIDER_VERSION")
            .with_fallback("0.1");
        assert_eq!(provider.current_version().unwrap(), "3.4.1");
        std::env::remove_var("MILESTONE_TEST_PROVIDER_VERSION");
    }

    #[test]
    fn test_env_provider_fallback() {
        let provider = EnvVersionProvider::with_variable("MILESTONE_TEST_UNSET_WITH_FALLBACK")
            .with_fallback("2.7.0");
        assert_eq!(provider.fallback(), Some("2.7.0"));
        assert_eq!(provider.current_version().unwrap(), "2.7.0");
    }

    #[test]
    fn test_env_provider_default_lookup_order() {
        let provider = EnvVersionProvider::default();
        assert_eq!(provider.variables(), &[APP_VERSION_ENV, CARGO_VERSION_ENV]);
    }

    #[test]
    fn test_manifest_provider_from_str() {
        let manifest = r#"
        [package]
        name = "host_app"
        version = "3.2.1"
        edition = "2021"
        "#;

        let provider = ManifestVersionProvider::from_manifest_str(manifest).unwrap();
        assert_eq!(provider.current_version().unwrap(), "3.2.1");
    }

    #[test]
    fn test_manifest_provider_without_package() {
        let manifest = r#"
        [workspace]
        members = ["a"]
        "#;

        let err = ManifestVersionProvider::from_manifest_str(manifest).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_manifest_provider_own_manifest() {
        let provider = ManifestVersionProvider::from_path(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/Cargo.toml"
        ));
        assert_eq!(provider.current_version().unwrap(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_manifest_provider_missing_file() {
        let provider = ManifestVersionProvider::from_path("/definitely/not/here/Cargo.toml");
        let err = provider.current_version().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IOError);
    }

    #[test]
    fn test_host_version_macro() {
        let provider = crate::host_version!().unwrap();
        assert_eq!(provider.current_version().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
