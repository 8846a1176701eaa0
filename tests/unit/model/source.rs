use super::*;

#[test]
fn defaults_fill_namespace_and_api_version() {
    let src = SourceDef::from_json_str(
        r#"{
            "class_name": "Spinner",
            "variants": [{"root": 0, "objects": [{"type": "container_visual"}]}]
        }"#,
    )
    .unwrap();
    assert_eq!(src.namespace, "AnimatedVisuals");
    assert_eq!(src.variants.len(), 1);
    assert_eq!(src.variants[0].api_version, 7);
    assert_eq!(src.variants[0].document.objects.len(), 1);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = SourceDef::from_json_str("{\"class_name\": 3}").unwrap_err();
    assert!(matches!(err, CodegenError::Serde(_)));
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let err = SourceDef::from_path(Path::new("does/not/exist.json")).unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"));
}

#[test]
fn target_names() {
    let t: Target = serde_json::from_str("\"csharp\"").unwrap();
    assert_eq!(t, Target::CSharp);
    let t: Target = serde_json::from_str("\"cppwinrt\"").unwrap();
    assert_eq!(t, Target::Cppwinrt);
}

#[test]
fn opts_default_to_parallel_csharp() {
    let opts = CodegenOpts::default();
    assert_eq!(opts.target, Target::CSharp);
    assert!(opts.parallel);
    assert!(!opts.ignore_comments);
    assert!(!opts.disable_field_optimization);

    let opts: CodegenOpts = serde_json::from_str("{\"ignore_comments\": true}").unwrap();
    assert!(opts.ignore_comments);
    assert!(opts.parallel);
}
