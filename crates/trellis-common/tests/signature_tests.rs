use super::*;

#[test]
fn test_display_form() {
    let sig = MethodSignature::new(
        "com.x.Foo",
        "bar",
        vec!["java.lang.String".to_string(), "int".to_string()],
    );
    assert_eq!(sig.to_string(), "com.x.Foo#bar(java.lang.String,int)");
    assert_eq!(sig.arity(), 2);
}

#[test]
fn test_parse_display_form() {
    let sig: MethodSignature = "com.x.Foo#bar(java.lang.String,int)".parse().unwrap();
    assert_eq!(sig.type_name, "com.x.Foo");
    assert_eq!(sig.name, "bar");
    assert_eq!(sig.parameter_types, vec!["java.lang.String", "int"]);
}

#[test]
fn test_parse_no_parameters() {
    let sig: MethodSignature = "A#index()".parse().unwrap();
    assert!(sig.parameter_types.is_empty());
}

#[test]
fn test_generic_commas_do_not_split() {
    let sig: MethodSignature = "A#m(java.util.Map<K, V>, int)".parse().unwrap();
    assert_eq!(sig.parameter_types, vec!["java.util.Map<K, V>", "int"]);
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        "A.m()".parse::<MethodSignature>(),
        Err(MethodSignatureError::MissingSeparator(_))
    ));
    assert!(matches!(
        "A#m(int".parse::<MethodSignature>(),
        Err(MethodSignatureError::UnbalancedParameters(_))
    ));
    assert!(matches!(
        "A#m(Map<K,V)".parse::<MethodSignature>(),
        Err(MethodSignatureError::UnbalancedParameters(_))
    ));
    assert!(matches!(
        "#m()".parse::<MethodSignature>(),
        Err(MethodSignatureError::EmptyName(_))
    ));
}
