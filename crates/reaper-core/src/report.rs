use crate::{ReaperError, Result};
use reaper_config::{ReportConfig, constants};
use reaper_provider::{Resource, Tags};
use std::path::Path;
use tracing::info;

/// One line of a cleanup report: name, tag snapshot and expiration value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub name: String,
    pub tags: Option<Tags>,
    pub expire: Option<String>,
}

impl ReportRow {
    pub fn new(resource: &Resource, expire: Option<&str>) -> Self {
        Self {
            name: resource.name.clone(),
            tags: resource.tags.clone(),
            expire: expire.map(str::to_string),
        }
    }

    fn to_record(&self) -> Result<[String; 3]> {
        let tags = match &self.tags {
            Some(tags) => serde_json::to_string(tags)?,
            None => constants::REPORT_NIL.to_string(),
        };
        let expire = self
            .expire
            .clone()
            .unwrap_or_else(|| constants::REPORT_NIL.to_string());

        Ok([self.name.clone(), tags, expire])
    }
}

/// Virtual machines partitioned by whether they carry a usable expire tag.
#[derive(Debug, Default, Clone)]
pub struct CleanupReport {
    pub with_expire: Vec<ReportRow>,
    pub without_expire: Vec<ReportRow>,
}

/// Writes the header and one record per row, replacing any existing file.
pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let report_error = |source: csv::Error| ReaperError::Report {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(report_error)?;
    writer
        .write_record(constants::REPORT_HEADER)
        .map_err(report_error)?;

    for row in rows {
        writer.write_record(row.to_record()?).map_err(report_error)?;
    }

    writer.flush().map_err(|e| report_error(e.into()))?;
    Ok(())
}

pub fn write_reports(config: &ReportConfig, report: &CleanupReport) -> Result<()> {
    std::fs::create_dir_all(&config.dir)?;

    let with_path = config.with_expire_path();
    write_report(&with_path, &report.with_expire)?;
    info!(
        "Wrote {} resource(s) with expiration to {}",
        report.with_expire.len(),
        with_path.display()
    );

    let without_path = config.without_expire_path();
    write_report(&without_path, &report.without_expire)?;
    info!(
        "Wrote {} resource(s) without expiration to {}",
        report.without_expire.len(),
        without_path.display()
    );

    Ok(())
}
