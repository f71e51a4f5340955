//! End-to-end pipeline tests over real directories.
//!
//! These exercise the full build: index, validate, manifests, descriptor,
//! staging, archive, cleanup — and the no-output guarantee of failed runs.

use aipack_core::config::{LayoutPolicy, PackagerConfig};
use aipack_core::pipeline::Packager;
use aipack_core::{Error, ValidationError};
use aipack_package::md5_bytes;
use flate2::read::GzDecoder;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

fn write_label(dir: &Path, name: &str, lid: &str, vid: &str, data_files: &[&str]) {
    let files: String = data_files
        .iter()
        .map(|f| format!("<File><file_name>{f}</file_name></File>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Product_Observational xmlns="http://pds.nasa.gov/pds4/pds/v1">
  <Identification_Area>
    <logical_identifier>{lid}</logical_identifier>
    <version_id>{vid}</version_id>
  </Identification_Area>
  <File_Area_Observational>{files}</File_Area_Observational>
</Product_Observational>
"#
    );
    fs::write(dir.join(name), xml).unwrap();
}

/// Two products, three data files, all present.
fn valid_input() -> TempDir {
    let input = TempDir::new().unwrap();
    write_label(
        input.path(),
        "prod_a.xml",
        "urn:esa:psa:em16_tgo_frd:data_raw:prod_a",
        "1.0",
        &["prod_a.dat", "prod_a.hdr"],
    );
    write_label(
        input.path(),
        "prod_b.xml",
        "urn:esa:psa:em16_tgo_frd:data_raw:prod_b",
        "1.0",
        &["prod_b.dat"],
    );
    fs::write(input.path().join("prod_a.dat"), "payload a").unwrap();
    fs::write(input.path().join("prod_a.hdr"), "header a").unwrap();
    fs::write(input.path().join("prod_b.dat"), "payload b").unwrap();
    input
}

fn read_archive(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut archive = tar::Archive::new(GzDecoder::new(fs::File::open(path).unwrap()));
    let mut contents = BTreeMap::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let name = entry.path().unwrap().to_string_lossy().into_owned();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        contents.insert(name, bytes);
    }
    contents
}

/// Text of the first `<tag>` inside `area`.
fn tag_text<'a>(area: &'a str, tag: &str) -> &'a str {
    let open = format!("<{tag}");
    let rest = area.split(&open).nth(1).unwrap();
    let rest = rest.split('>').nth(1).unwrap();
    rest.split('<').next().unwrap()
}

fn area<'a>(xml: &'a str, tag: &str) -> &'a str {
    xml.split(&format!("<{tag}>"))
        .nth(1)
        .and_then(|s| s.split(&format!("</{tag}>")).next())
        .unwrap()
}

#[test]
fn full_build_produces_consistent_package() {
    let input = valid_input();
    let output = TempDir::new().unwrap();

    let config = PackagerConfig::new(input.path())
        .with_output_dir(output.path())
        .with_clean(false);
    let summary = Packager::new(config).unwrap().run().unwrap();

    assert_eq!(summary.products, 2);
    assert_eq!(summary.data_files, 3);
    assert_eq!(summary.transfer_records, 2);
    // N labels + M data files.
    assert_eq!(summary.checksum_records, 5);
    assert!(summary.archive.is_file());

    let staging = summary.staging_dir.as_ref().unwrap();
    assert!(staging.is_dir());

    // Transfer manifest: N records of identical byte length.
    let transfer = fs::read_to_string(
        staging.join(format!("{}-transfer_manifest.tab", summary.delivery)),
    )
    .unwrap();
    let records: Vec<&str> = transfer.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(records.len(), 2);
    let lid_len = "urn:esa:psa:em16_tgo_frd:data_raw:prod_a".len();
    let path_len = "em16_tgo_frd/data_raw/prod_a.xml".len();
    for record in &records {
        assert_eq!(record.len(), lid_len + 1 + path_len);
    }

    // Checksum manifest rows match independently computed hashes.
    let checksum = fs::read_to_string(
        staging.join(format!("{}-checksum_manifest.tab", summary.delivery)),
    )
    .unwrap();
    let expected_row = format!(
        "{}\tem16_tgo_frd/data_raw/prod_a.dat",
        md5_bytes(b"payload a")
    );
    assert!(checksum.contains(&expected_row));
    // Label row comes before its data-file rows.
    let label_pos = checksum.find("prod_a.xml").unwrap();
    let data_pos = checksum.find("prod_a.dat").unwrap();
    assert!(label_pos < data_pos);

    // Descriptor repeats the manifest geometry and statistics exactly.
    let descriptor =
        fs::read_to_string(staging.join(format!("{}.xml", summary.delivery))).unwrap();
    let transfer_area = area(&descriptor, "File_Area_Transfer_Manifest");
    let transfer_bytes = fs::metadata(
        staging.join(format!("{}-transfer_manifest.tab", summary.delivery)),
    )
    .unwrap()
    .len();
    assert_eq!(tag_text(transfer_area, "file_size"), transfer_bytes.to_string());
    assert_eq!(tag_text(transfer_area, "records"), "2");
    let record_char = area(&descriptor, "Record_Character");
    assert_eq!(
        tag_text(record_char, "record_length"),
        (lid_len + 1 + path_len + 2).to_string()
    );

    let checksum_area = area(&descriptor, "File_Area_Checksum_Manifest");
    assert_eq!(tag_text(checksum_area, "records"), "5");

    // The archive mirrors the staging tree under the delivery name.
    let contents = read_archive(&summary.archive);
    let root = &summary.delivery;
    assert!(contents.contains_key(&format!("{root}/em16_tgo_frd/data_raw/prod_a.xml")));
    assert!(contents.contains_key(&format!("{root}/em16_tgo_frd/data_raw/prod_b.dat")));
    assert_eq!(
        contents[&format!("{root}/em16_tgo_frd/data_raw/prod_a.dat")],
        b"payload a"
    );
}

#[test]
fn round_trip_descriptor_matches_packed_manifests() {
    let input = valid_input();
    let output = TempDir::new().unwrap();

    let config = PackagerConfig::new(input.path()).with_output_dir(output.path());
    let summary = Packager::new(config).unwrap().run().unwrap();

    let contents = read_archive(&summary.archive);
    let root = &summary.delivery;
    let descriptor =
        String::from_utf8(contents[&format!("{root}/{root}.xml")].clone()).unwrap();
    let transfer = &contents[&format!("{root}/{root}-transfer_manifest.tab")];
    let checksum = &contents[&format!("{root}/{root}-checksum_manifest.tab")];

    let transfer_area = area(&descriptor, "File_Area_Transfer_Manifest");
    assert_eq!(
        tag_text(transfer_area, "file_size"),
        transfer.len().to_string()
    );
    assert_eq!(tag_text(transfer_area, "md5_checksum"), md5_bytes(transfer));
    let transfer_rows = transfer.split(|&b| b == b'\n').filter(|l| !l.is_empty()).count();
    assert_eq!(tag_text(transfer_area, "records"), transfer_rows.to_string());

    let checksum_area = area(&descriptor, "File_Area_Checksum_Manifest");
    assert_eq!(
        tag_text(checksum_area, "file_size"),
        checksum.len().to_string()
    );
    assert_eq!(tag_text(checksum_area, "md5_checksum"), md5_bytes(checksum));
}

#[test]
fn clean_run_removes_staging() {
    let input = valid_input();
    let output = TempDir::new().unwrap();

    let config = PackagerConfig::new(input.path()).with_output_dir(output.path());
    let summary = Packager::new(config).unwrap().run().unwrap();

    assert!(summary.staging_dir.is_none());
    assert!(summary.archive.is_file());
    let leftovers: Vec<_> = fs::read_dir(output.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(leftovers, vec![summary.archive.file_name().unwrap().to_string_lossy().into_owned()]);
}

#[test]
fn duplicate_lidvid_aborts_with_no_output() {
    let input = TempDir::new().unwrap();
    write_label(
        input.path(),
        "one.xml",
        "urn:esa:psa:em16_tgo_frd:data_raw:same",
        "1.0",
        &[],
    );
    write_label(
        input.path(),
        "two.xml",
        "urn:esa:psa:em16_tgo_frd:data_raw:same",
        "1.0",
        &[],
    );
    let output = TempDir::new().unwrap();

    let config = PackagerConfig::new(input.path()).with_output_dir(output.path());
    let err = Packager::new(config).unwrap().run().unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::DuplicateProduct { .. })
    ));
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn missing_data_file_aborts_before_any_write() {
    let input = TempDir::new().unwrap();
    write_label(
        input.path(),
        "prod.xml",
        "urn:esa:psa:em16_tgo_frd:data_raw:prod",
        "1.0",
        &["not_there.dat"],
    );
    let output = TempDir::new().unwrap();

    let config = PackagerConfig::new(input.path()).with_output_dir(output.path());
    let err = Packager::new(config).unwrap().run().unwrap_err();
    match err {
        Error::Validation(ValidationError::MissingDataFile { file, .. }) => {
            assert_eq!(file, "not_there.dat");
        }
        other => panic!("expected MissingDataFile, got {other}"),
    }
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn multi_bundle_aborts_with_no_output() {
    let input = TempDir::new().unwrap();
    write_label(
        input.path(),
        "one.xml",
        "urn:esa:psa:em16_tgo_frd:data_raw:a",
        "1.0",
        &[],
    );
    write_label(
        input.path(),
        "two.xml",
        "urn:esa:psa:bc_mtm_mcam:data_raw:b",
        "1.0",
        &[],
    );
    let output = TempDir::new().unwrap();

    let config = PackagerConfig::new(input.path()).with_output_dir(output.path());
    let err = Packager::new(config).unwrap().run().unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::MultiBundle { .. })
    ));
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn preserve_layout_keeps_directory_structure() {
    let input = TempDir::new().unwrap();
    let nested = input.path().join("data_raw").join("2016");
    fs::create_dir_all(&nested).unwrap();
    write_label(
        &nested,
        "prod.xml",
        "urn:esa:psa:em16_tgo_frd:data_raw:prod",
        "1.0",
        &[],
    );
    let output = TempDir::new().unwrap();

    let config = PackagerConfig::new(input.path())
        .with_output_dir(output.path())
        .with_layout(LayoutPolicy::Preserve);
    let summary = Packager::new(config).unwrap().run().unwrap();

    let contents = read_archive(&summary.archive);
    let root = &summary.delivery;
    assert!(contents
        .contains_key(&format!("{root}/em16_tgo_frd/data_raw/2016/prod.xml")));
}

#[test]
fn invalid_products_are_skipped_not_fatal() {
    let input = valid_input();
    fs::write(input.path().join("junk.xml"), "not a label").unwrap();
    let output = TempDir::new().unwrap();

    let config = PackagerConfig::new(input.path()).with_output_dir(output.path());
    let summary = Packager::new(config).unwrap().run().unwrap();
    assert_eq!(summary.products, 2);
    assert_eq!(summary.skipped, 1);
}

#[test]
fn check_writes_nothing() {
    let input = valid_input();
    let output = TempDir::new().unwrap();

    let config = PackagerConfig::new(input.path()).with_output_dir(output.path());
    let report = Packager::new(config).unwrap().check().unwrap();
    assert_eq!(report.products, 2);
    assert_eq!(report.data_files, 3);
    assert_eq!(report.bundle, "em16_tgo_frd");
    assert_eq!(report.entries.len(), 2);
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn missing_template_override_aborts_before_staging() {
    let input = valid_input();
    let output = TempDir::new().unwrap();

    let config = PackagerConfig::new(input.path())
        .with_output_dir(output.path())
        .with_template("/no/such/template.xml");
    let err = Packager::new(config).unwrap().run().unwrap_err();
    assert!(err.to_string().contains("template"));
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn sender_recipient_codes_shape_delivery_name() {
    let input = valid_input();
    let output = TempDir::new().unwrap();

    let config = PackagerConfig::new(input.path())
        .with_output_dir(output.path())
        .with_sender("mib")
        .with_recipient("nasa");
    let summary = Packager::new(config).unwrap().run().unwrap();
    assert!(summary.delivery.starts_with("mibnasa-pds4-PI-01-em16_tgo_frd-"));
}
