use crate::evaluate::{self, Verdict};
use crate::report::{CleanupReport, ReportRow};
use crate::tags;
use crate::{ReaperError, Result};
use chrono::{DateTime, Duration, Utc};
use reaper_config::PolicyConfig;
use reaper_provider::{InventoryProvider, Resource, ResourceKind};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Counters for a single list-and-delete pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub scanned: usize,
    pub protected: usize,
    pub expired: usize,
    pub deleted: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub images: PassSummary,
    pub disks: PassSummary,
    pub virtual_machines: PassSummary,
    pub report: CleanupReport,
}

/// Runs the image, disk and virtual machine passes against one provider.
///
/// `now` is fixed at construction so every pass of a run evaluates against
/// the same instant. Each resource gets one evaluation and at most one
/// delete call; a failure on one resource is logged and the pass moves on.
pub struct Reaper {
    provider: Arc<dyn InventoryProvider>,
    policy: PolicyConfig,
    now: DateTime<Utc>,
    dry_run: bool,
}

impl Reaper {
    pub fn new(
        provider: Arc<dyn InventoryProvider>,
        policy: PolicyConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            provider,
            policy,
            now,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let images = self.delete_expired_images().await?;
        let disks = self.delete_expired_disks().await?;
        let (virtual_machines, report) = self.delete_expired_virtual_machines().await?;

        Ok(RunSummary {
            images,
            disks,
            virtual_machines,
            report,
        })
    }

    fn is_protected(&self, resource: &Resource) -> bool {
        resource.name.contains(&self.policy.protection_marker)
    }

    async fn remove(&self, resource: &Resource, summary: &mut PassSummary) {
        summary.expired += 1;

        if self.dry_run {
            info!("Dry run: would delete {} {}", resource.kind, resource.name);
            return;
        }

        match self
            .provider
            .delete(resource, &self.policy.delete_api_version)
            .await
        {
            Ok(()) => summary.deleted += 1,
            Err(e) => {
                error!(
                    "Failed to delete {} {}: {}",
                    resource.kind, resource.name, e
                );
                summary.failed += 1;
            }
        }
    }

    pub async fn delete_expired_images(&self) -> Result<PassSummary> {
        let mut summary = PassSummary::default();

        info!("Scanning images");

        for image in self.provider.list(ResourceKind::Image).await? {
            summary.scanned += 1;

            if self.is_protected(&image) {
                info!("Skipping protected image {}", image.name);
                summary.protected += 1;
                continue;
            }

            let created = match tags::find_created_date(image.tags.as_ref()) {
                Some(Ok(date)) => Some(date),
                Some(Err(e)) => {
                    warn!("Skipping image {}: {}", image.name, e);
                    summary.skipped += 1;
                    continue;
                }
                None => image.created_at.map(|t| t.date_naive()),
            };

            let verdict = match created {
                Some(date) => {
                    evaluate::evaluate_created_date(date, self.now, self.policy.retention_days)
                }
                None => Verdict::NoSignal,
            };

            match verdict {
                Verdict::Expired { age_days } => {
                    info!(
                        "Deleting image {} days diff {} product {}",
                        image.name,
                        age_days,
                        image.tag("product").unwrap_or("-")
                    );
                    self.remove(&image, &mut summary).await;
                }
                Verdict::NotExpired { age_days } => {
                    debug!("Keeping image {} ({} days old)", image.name, age_days);
                }
                Verdict::NoSignal => {
                    warn!("Skipping image {}: no creation date", image.name);
                    summary.skipped += 1;
                }
            }
        }

        Ok(summary)
    }

    pub async fn delete_expired_disks(&self) -> Result<PassSummary> {
        let mut summary = PassSummary::default();
        let skew = Duration::try_hours(self.policy.disk_clock_skew_hours).ok_or_else(|| {
            ReaperError::InvalidPolicy(format!(
                "disk_clock_skew_hours {} is out of range",
                self.policy.disk_clock_skew_hours
            ))
        })?;
        let required_tag = self.policy.disk_required_tag.as_str();

        info!("Scanning disks");

        for disk in self.provider.list(ResourceKind::Disk).await? {
            if !required_tag.is_empty() && disk.tag(required_tag).is_none_or(str::is_empty) {
                debug!("Ignoring disk {} without a {} tag", disk.name, required_tag);
                continue;
            }

            summary.scanned += 1;

            if self.is_protected(&disk) {
                info!("Skipping protected disk {}", disk.name);
                summary.protected += 1;
                continue;
            }

            let verdict = match disk.created_at {
                Some(created_at) => evaluate::evaluate_timestamp(
                    created_at,
                    self.now,
                    self.policy.retention_days,
                    skew,
                ),
                None => Verdict::NoSignal,
            };

            match verdict {
                Verdict::Expired { age_days } => {
                    info!(
                        "Deleting disk {} days diff {} {} {}",
                        disk.name,
                        age_days,
                        required_tag,
                        disk.tag(required_tag).unwrap_or("-")
                    );
                    self.remove(&disk, &mut summary).await;
                }
                Verdict::NotExpired { age_days } => {
                    debug!("Keeping disk {} ({} days old)", disk.name, age_days);
                }
                Verdict::NoSignal => {
                    warn!("Skipping disk {}: no usable creation timestamp", disk.name);
                    summary.skipped += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Deletes virtual machines whose expire tag has passed and sorts every
    /// virtual machine into the with/without expiration report buckets.
    pub async fn delete_expired_virtual_machines(&self) -> Result<(PassSummary, CleanupReport)> {
        let mut summary = PassSummary::default();
        let mut report = CleanupReport::default();

        info!("Scanning virtual machines");

        let resources = self.provider.list(ResourceKind::Generic).await?;
        let machines = resources
            .iter()
            .filter(|r| r.resource_type.contains(&self.policy.virtual_machine_type));

        for vm in machines {
            summary.scanned += 1;

            let protected = self.is_protected(vm);
            if protected {
                summary.protected += 1;
            }

            let Some(expire_value) = tags::find_expiration_key(vm.tags.as_ref()) else {
                info!("Virtual machine {} has no expire tag", vm.name);
                report.without_expire.push(ReportRow::new(vm, None));
                continue;
            };

            let verdict = match evaluate::evaluate_by_tag(
                expire_value,
                self.now,
                self.policy.expire_grace_days,
            ) {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!("Skipping virtual machine {}: {}", vm.name, e);
                    summary.skipped += 1;
                    report
                        .without_expire
                        .push(ReportRow::new(vm, Some(expire_value)));
                    continue;
                }
            };

            report
                .with_expire
                .push(ReportRow::new(vm, Some(expire_value)));

            if !verdict.is_expired() {
                continue;
            }

            if protected {
                info!(
                    "Not deleting protected virtual machine {} (expired {})",
                    vm.name, expire_value
                );
                continue;
            }

            info!("Deleting {} Expire date is {}", vm.name, expire_value);
            self.remove(vm, &mut summary).await;
        }

        Ok((summary, report))
    }
}
