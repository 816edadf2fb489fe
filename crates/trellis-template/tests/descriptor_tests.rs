use super::*;
use std::io::Write;

#[test]
fn test_parse_package() {
    let descriptor = parse_descriptor(r#"{ "package": "app.templates" }"#).unwrap();
    assert_eq!(descriptor.package().to_string(), "app.templates");
}

#[test]
fn test_package_defaults_to_root_and_unknown_keys_are_ignored() {
    let descriptor = parse_descriptor(r#"{ "mode": "dev" }"#).unwrap();
    assert!(descriptor.package().is_root());
    assert_eq!(descriptor, TemplatesDescriptor::default());
}

#[test]
fn test_invalid_package_is_rejected() {
    let err = parse_descriptor(r#"{ "package": "app..templates" }"#).unwrap_err();
    assert!(format!("{err:#}").contains("empty segment"), "{err:#}");

    let err = TemplatesDescriptor::from_json(&serde_json::json!({ "package": 42 })).unwrap_err();
    assert!(format!("{err:#}").contains("invalid template plugin configuration"));
}

#[test]
fn test_stub_id_with_package() {
    let descriptor = TemplatesDescriptor::new(QualifiedName::parse("app.templates").unwrap());
    let path = TemplatePath::parse("admin/list.gtmpl").unwrap();
    assert_eq!(descriptor.stub_id(&path), "app.templates.admin.list_");
}

#[test]
fn test_stub_id_without_package() {
    let descriptor = TemplatesDescriptor::default();
    let path = TemplatePath::parse("index").unwrap();
    assert_eq!(descriptor.stub_id(&path), "index_");
}

#[test]
fn test_load_descriptor_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "package": "com.example.views" }}"#).unwrap();

    let descriptor = load_descriptor(file.path()).unwrap();
    assert_eq!(descriptor.package().to_string(), "com.example.views");
}

#[test]
fn test_load_descriptor_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("templates.json");
    let err = load_descriptor(&missing).unwrap_err();
    assert!(err.to_string().contains("templates.json"), "{err}");
}
