use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::tempdir;
use xcdeps_plist::{from_path, from_str, Format};

const SAMPLE: &str = include_str!("../../graph/tests/fixtures/Sample.xcodeproj/project.pbxproj");

#[test]
fn reads_real_project_layout() {
    let value = from_str(SAMPLE, Format::Auto).expect("sample project parses");

    assert_eq!(value["archiveVersion"], "1");
    assert_eq!(value["rootObject"], "4C0A11112B00000000000001");

    let objects = value["objects"].as_object().expect("objects map");
    assert_eq!(objects.len(), 34);

    let proxy = &objects["4C0A11112B00000000000601"];
    assert_eq!(proxy["isa"], "PBXContainerItemProxy");
    assert_eq!(proxy["remoteGlobalIDString"], "4C0A11112B00000000000504");

    let group = &objects["4C0A11112B00000000000701"];
    assert_eq!(group["sourceTree"], "<group>");

    let debug = &objects["4C0A11112B00000000000801"]["buildSettings"];
    assert_eq!(
        debug["GCC_PREPROCESSOR_DEFINITIONS"],
        json!(["DEBUG=1", "$(inherited)"])
    );
}

#[test]
fn objects_keep_file_order() {
    let value = from_str(SAMPLE, Format::OpenStep).unwrap();
    let first: Vec<&str> = value["objects"]
        .as_object()
        .unwrap()
        .keys()
        .take(3)
        .map(String::as_str)
        .collect();

    assert_eq!(
        first,
        vec![
            "4C0A11112B00000000000101",
            "4C0A11112B00000000000102",
            "4C0A11112B00000000000103",
        ]
    );
}

#[test]
fn json_and_openstep_agree() {
    let openstep = from_str(SAMPLE, Format::OpenStep).unwrap();
    let as_json = serde_json::to_string(&openstep).unwrap();
    let reread = from_str(&as_json, Format::Auto).unwrap();
    assert_eq!(openstep, reread);
}

#[test]
fn reads_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("project.pbxproj");
    fs::write(&path, SAMPLE).unwrap();

    let value = from_path(&path, Format::Auto).unwrap();
    assert_eq!(value["objectVersion"], "56");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = from_path(dir.path().join("absent.pbxproj"), Format::Auto).unwrap_err();
    assert!(matches!(err, xcdeps_plist::PlistError::Io(_)));
}
