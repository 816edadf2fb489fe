use super::*;

#[test]
fn test_parse_with_extension() {
    let path = TemplatePath::parse("admin/users/list.gtmpl").unwrap();
    assert_eq!(
        path.segments().collect::<Vec<_>>(),
        vec!["admin", "users", "list"]
    );
    assert_eq!(path.dirs(), ["admin".to_string(), "users".to_string()]);
    assert_eq!(path.name(), "list");
    assert_eq!(path.extension(), Some("gtmpl"));
    assert_eq!(path.to_string(), "admin/users/list.gtmpl");
}

#[test]
fn test_parse_without_extension() {
    let path = TemplatePath::parse("a/b").unwrap();
    assert_eq!(path.name(), "b");
    assert_eq!(path.extension(), None);
    assert!(path.dirs() == ["a".to_string()]);
}

#[test]
fn test_equality_is_by_segments() {
    let a = TemplatePath::parse("a/b").unwrap();
    assert_eq!(a, "a/b".parse::<TemplatePath>().unwrap());
    assert_ne!(a, TemplatePath::parse("a/c").unwrap());
    assert_ne!(a, TemplatePath::parse("a/b.gtmpl").unwrap());
    assert_ne!(a, TemplatePath::parse("b/a").unwrap());
}

#[test]
fn test_without_extension_keeps_segments() {
    let path = TemplatePath::parse("a/b.gtmpl").unwrap();
    let bare = path.without_extension();
    assert_eq!(bare, TemplatePath::parse("a/b").unwrap());
    assert_eq!(bare.extension(), None);
    assert_eq!(bare.without_extension(), bare);
}

#[test]
fn test_rejects_malformed_paths() {
    assert_eq!(TemplatePath::parse(""), Err(TemplatePathError::Empty));
    assert!(matches!(
        TemplatePath::parse("a//b"),
        Err(TemplatePathError::EmptySegment { position: 1, .. })
    ));
    assert!(matches!(
        TemplatePath::parse("/a"),
        Err(TemplatePathError::EmptySegment { position: 0, .. })
    ));
    assert!(matches!(
        TemplatePath::parse("a.b/c"),
        Err(TemplatePathError::DottedSegment { .. })
    ));
    assert!(matches!(
        TemplatePath::parse("a/.gtmpl"),
        Err(TemplatePathError::MalformedName { .. })
    ));
    assert!(matches!(
        TemplatePath::parse("a/b."),
        Err(TemplatePathError::MalformedName { .. })
    ));
}
