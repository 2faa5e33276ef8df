use anyhow::Context;
use reaper_config::ReaperConfig;
use std::path::{Path, PathBuf};

pub async fn resolve_config(
    config_path: &Path,
    report_dir: Option<PathBuf>,
) -> anyhow::Result<ReaperConfig> {
    let mut config = reaper_config::load_config(config_path)
        .await
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(dir) = report_dir {
        config.reports.dir = dir;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_report_dir_override() {
        let config = resolve_config(
            Path::new("/nonexistent/reaper.toml"),
            Some(PathBuf::from("/tmp/reports")),
        )
        .await
        .unwrap();

        assert_eq!(config.reports.dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.policy.retention_days, 5);
    }
}
