use crate::constants;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReaperConfig {
    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub reports: ReportConfig,
}

/// Thresholds and naming conventions used when deciding what to delete.
#[derive(Debug, Deserialize, Clone)]
pub struct PolicyConfig {
    /// Images and disks older than this many whole days are expired.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,

    /// Added to a disk's creation timestamp before its age is computed.
    #[serde(default = "default_disk_clock_skew_hours")]
    pub disk_clock_skew_hours: i64,

    /// Days past an explicit expire tag before a virtual machine is deleted.
    #[serde(default = "default_expire_grace_days")]
    pub expire_grace_days: i64,

    #[serde(default = "default_protection_marker")]
    pub protection_marker: String,

    /// Disks without a non-empty tag of this name are ignored. Empty disables the filter.
    #[serde(default = "default_disk_required_tag")]
    pub disk_required_tag: String,

    #[serde(default = "default_virtual_machine_type")]
    pub virtual_machine_type: String,

    #[serde(default = "default_delete_api_version")]
    pub delete_api_version: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_report_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_with_expire_file")]
    pub with_expire_file: String,

    #[serde(default = "default_without_expire_file")]
    pub without_expire_file: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            disk_clock_skew_hours: default_disk_clock_skew_hours(),
            expire_grace_days: default_expire_grace_days(),
            protection_marker: default_protection_marker(),
            disk_required_tag: default_disk_required_tag(),
            virtual_machine_type: default_virtual_machine_type(),
            delete_api_version: default_delete_api_version(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: default_report_dir(),
            with_expire_file: default_with_expire_file(),
            without_expire_file: default_without_expire_file(),
        }
    }
}

impl ReportConfig {
    pub fn with_expire_path(&self) -> PathBuf {
        self.dir.join(&self.with_expire_file)
    }

    pub fn without_expire_path(&self) -> PathBuf {
        self.dir.join(&self.without_expire_file)
    }
}

fn default_retention_days() -> i64 {
    constants::RETENTION_DAYS
}

fn default_disk_clock_skew_hours() -> i64 {
    constants::DISK_CLOCK_SKEW_HOURS
}

fn default_expire_grace_days() -> i64 {
    constants::EXPIRE_GRACE_DAYS
}

fn default_protection_marker() -> String {
    constants::PROTECTION_MARKER.to_string()
}

fn default_disk_required_tag() -> String {
    constants::DISK_REQUIRED_TAG.to_string()
}

fn default_virtual_machine_type() -> String {
    constants::VIRTUAL_MACHINE_TYPE_FRAGMENT.to_string()
}

fn default_delete_api_version() -> String {
    constants::DELETE_API_VERSION.to_string()
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_with_expire_file() -> String {
    constants::WITH_EXPIRE_REPORT.to_string()
}

fn default_without_expire_file() -> String {
    constants::WITHOUT_EXPIRE_REPORT.to_string()
}

/// Loads the policy file, falling back to built-in defaults when it does not exist.
pub async fn load_config(path: &Path) -> std::io::Result<ReaperConfig> {
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return Ok(ReaperConfig::default());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: ReaperConfig = toml::from_str(&content)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: ReaperConfig = toml::from_str("").unwrap();
        assert_eq!(config.policy.retention_days, 5);
        assert_eq!(config.policy.disk_clock_skew_hours, 24);
        assert_eq!(config.policy.expire_grace_days, 1);
        assert_eq!(config.policy.protection_marker, "DO_NOT_CLEANUP");
        assert_eq!(config.policy.disk_required_tag, "product");
        assert_eq!(config.policy.delete_api_version, "2019-07-01");
        assert_eq!(config.reports.with_expire_file, "with_tags.csv");
        assert_eq!(config.reports.without_expire_file, "without_tags.csv");
    }

    #[test]
    fn test_parse_policy_overrides() {
        let toml_str = r#"
[policy]
retention_days = 14
disk_required_tag = ""
protection_marker = "KEEP"
"#;
        let config: ReaperConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.policy.retention_days, 14);
        assert_eq!(config.policy.disk_required_tag, "");
        assert_eq!(config.policy.protection_marker, "KEEP");
        assert_eq!(config.policy.expire_grace_days, 1);
    }

    #[test]
    fn test_report_paths() {
        let toml_str = r#"
[reports]
dir = "/var/lib/reaper"
with_expire_file = "tagged.csv"
"#;
        let config: ReaperConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.reports.with_expire_path(),
            PathBuf::from("/var/lib/reaper/tagged.csv")
        );
        assert_eq!(
            config.reports.without_expire_path(),
            PathBuf::from("/var/lib/reaper/without_tags.csv")
        );
    }

    #[tokio::test]
    async fn test_load_missing_file_uses_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = load_config(&temp_dir.path().join("absent.toml"))
            .await
            .unwrap();
        assert_eq!(config.policy.retention_days, 5);
    }

    #[tokio::test]
    async fn test_load_invalid_file_is_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("reaper.toml");
        std::fs::write(&path, "[policy\nretention_days = ").unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
