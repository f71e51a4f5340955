//! The delivery pipeline.
//!
//! Stages run strictly in sequence: index, validate, plan, validate paths,
//! stage manifests and descriptor, copy products, archive, clean up. Every
//! validation completes before the first filesystem write, so a doomed run
//! leaves no partial output.

use crate::config::PackagerConfig;
use crate::error::{Error, Result};
use crate::plan::plan_paths;
use crate::report::{CheckEntry, CheckReport, RunSummary};
use crate::validate::{check_archive_paths, check_products, ValidationError};
use aipack_common::{DeliveryName, DEFAULT_RECIPIENT};
use aipack_label::{index_products, ProductRecord};
use aipack_package::{
    write_archive, write_checksum_manifest, write_descriptor, write_transfer_manifest,
    DescriptorSpec, ManifestInfo, PackageError, PlannedProduct, Staging,
};
use chrono::{DateTime, Utc};
use tracing::info;

/// Identity of one delivery run.
#[derive(Debug)]
struct Delivery {
    name: DeliveryName,
    bundle: String,
    mission: String,
    timestamp: DateTime<Utc>,
}

impl Delivery {
    /// Derive the delivery identity from the (single) validated bundle.
    fn derive(config: &PackagerConfig, first: &ProductRecord) -> Delivery {
        let bundle = first.bundle_id.clone();
        let mission = first.lid.mission().to_string();
        let timestamp = Utc::now();
        let sendfrom = config.sendfrom.clone().unwrap_or_else(|| mission.clone());
        let sendto = config
            .sendto
            .clone()
            .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string());
        let name = DeliveryName::new(&sendfrom, &sendto, &bundle, timestamp);
        Delivery {
            name,
            bundle,
            mission,
            timestamp,
        }
    }
}

/// Builds delivery packages from a directory of PDS4 labels.
pub struct Packager {
    config: PackagerConfig,
}

impl Packager {
    pub fn new(config: PackagerConfig) -> Result<Self> {
        config.validate().map_err(Error::Config)?;
        Ok(Packager { config })
    }

    pub fn config(&self) -> &PackagerConfig {
        &self.config
    }

    /// Index and validate without writing anything.
    pub fn check(&self) -> Result<CheckReport> {
        let (skipped, planned) = self.index_and_validate()?;
        let first = &planned[0].record;
        let entries = planned
            .iter()
            .map(|p| CheckEntry {
                lidvid: p.record.lidvid().to_string(),
                archive_path: p.archive_path.clone(),
            })
            .collect();
        Ok(CheckReport {
            bundle: first.bundle_id.clone(),
            mission: first.lid.mission().to_string(),
            products: planned.len(),
            data_files: count_data_files(&planned),
            skipped,
            entries,
        })
    }

    /// Run the full pipeline and write the delivery archive.
    pub fn run(&self) -> Result<RunSummary> {
        let config = &self.config;
        let (skipped, planned) = self.index_and_validate()?;

        // A missing template override must abort before anything is staged.
        if let Some(template) = &config.template {
            if !template.is_file() {
                return Err(PackageError::TemplateNotFound {
                    path: template.clone(),
                }
                .into());
            }
        }

        let delivery = Delivery::derive(config, &planned[0].record);
        info!(
            delivery = %delivery.name,
            bundle = %delivery.bundle,
            products = planned.len(),
            "building delivery package"
        );

        let staging = Staging::create(&config.output_dir, &delivery.name)?;

        let transfer_path = staging.file(&delivery.name.transfer_manifest_file());
        let (fields, transfer_records) = write_transfer_manifest(&transfer_path, &planned)?;
        let transfer = ManifestInfo::collect(&transfer_path, transfer_records, delivery.timestamp)?;

        let checksum_path = staging.file(&delivery.name.checksum_manifest_file());
        let checksum_records = write_checksum_manifest(&checksum_path, &planned)?;
        let checksum = ManifestInfo::collect(&checksum_path, checksum_records, delivery.timestamp)?;

        let spec = DescriptorSpec {
            delivery: &delivery.name,
            mission: &delivery.mission,
            bundle: &delivery.bundle,
            transfer: &transfer,
            checksum: &checksum,
            fields,
        };
        write_descriptor(staging.root(), config.template.as_deref(), &spec)?;

        for product in &planned {
            staging.stage_product(product)?;
        }

        let archive = write_archive(&staging, &config.output_dir, &delivery.name)?;

        let data_files = count_data_files(&planned);
        let staging_root = staging.root().to_path_buf();
        let staging_dir = if config.clean {
            staging.remove()?;
            None
        } else {
            Some(staging_root)
        };

        Ok(RunSummary {
            delivery: delivery.name.to_string(),
            bundle: delivery.bundle,
            mission: delivery.mission,
            products: planned.len(),
            data_files,
            skipped,
            transfer_records,
            checksum_records,
            archive,
            staging_dir,
        })
    }

    /// Shared front half of `check` and `run`: index, validate, plan,
    /// validate paths. Nothing is written; returns the skipped count and
    /// the planned products.
    fn index_and_validate(&self) -> Result<(usize, Vec<PlannedProduct>)> {
        let config = &self.config;
        let report = index_products(&config.input_dir, &config.pattern, config.recursive)?;
        if report.products.is_empty() {
            return Err(ValidationError::EmptyIndex {
                dir: config.input_dir.clone(),
            }
            .into());
        }
        check_products(&report.products)?;
        let planned = plan_paths(report.products, &config.input_dir, config.layout);
        check_archive_paths(&planned)?;
        Ok((report.skipped, planned))
    }
}

fn count_data_files(planned: &[PlannedProduct]) -> usize {
    planned
        .iter()
        .map(|p| p.record.referenced_files.len())
        .sum()
}
