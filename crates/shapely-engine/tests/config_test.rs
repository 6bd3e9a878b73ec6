//! Loading `shapely.toml` and applying it to a decoration run

use std::fs;

use shapely_engine::{
    AnalyzerConfig, CallArgs, CheckError, ClassBuilder, ConfigError, Constant, Dataclass, Field, Vm,
    WarningCode,
};

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("shapely.toml");
    fs::write(&path, contents).unwrap();
    (temp, path)
}

// A field whose `init` keyword is not a constant
fn decorate_with_dynamic_init(vm: &mut Vm) {
    let int = vm.types.int_type();
    let bool_ty = vm.types.bool_type();
    let dynamic = vm.instance(bool_ty);
    let field = Field::new()
        .call(vm, &CallArgs::empty().keyword("init", dynamic))
        .unwrap();
    let cls = ClassBuilder::new("A").declare("x", int, field).build(vm).unwrap();
    Dataclass::new().decorate(vm, cls).unwrap();
}

#[test]
fn test_load_from_file() {
    let (_temp, path) = write_config(
        r#"
[warnings]
enable = ["duplicate-annotation"]
disable = ["non-constant-keyword"]
"#,
    );

    let config = AnalyzerConfig::from_file(&path).unwrap();
    assert_eq!(config.warnings.enable, vec!["duplicate-annotation"]);

    let warnings = config.warning_config().unwrap();
    assert!(warnings.is_enabled(WarningCode::DuplicateAnnotation));
    assert!(!warnings.is_enabled(WarningCode::NonConstantKeyword));
    assert!(!warnings.is_enabled(WarningCode::RequiredAfterDefault));
}

#[test]
fn test_missing_file() {
    let temp = tempfile::tempdir().unwrap();
    let err = AnalyzerConfig::from_file(&temp.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::IoError(_)));
}

#[test]
fn test_non_constant_keyword_warns_by_default() {
    let mut vm = Vm::new();
    decorate_with_dynamic_init(&mut vm);

    assert_eq!(vm.errorlog.warnings().len(), 1);
    assert_eq!(vm.errorlog.warnings()[0].code(), WarningCode::NonConstantKeyword);
    assert_eq!(
        vm.errorlog.warnings()[0].message(),
        "Keyword argument 'init' is not a constant; assuming True"
    );
}

#[test]
fn test_disabled_warning_is_dropped() {
    let config = AnalyzerConfig::from_str("[warnings]\ndisable = [\"non-constant-keyword\"]\n").unwrap();
    let mut vm = Vm::with_config(config.warning_config().unwrap());
    decorate_with_dynamic_init(&mut vm);

    assert!(vm.errorlog.is_empty());
    // The fallback still applies
    let class = vm.classes.by_name("A").unwrap();
    let attrs = class.metadata.dataclass_fields.as_ref().unwrap();
    assert!(attrs[0].init);
}

#[test]
fn test_denied_warning_becomes_error() {
    let config = AnalyzerConfig::from_str("[warnings]\ndeny = [\"non-constant-keyword\"]\n").unwrap();
    let mut vm = Vm::with_config(config.warning_config().unwrap());
    decorate_with_dynamic_init(&mut vm);

    assert!(vm.errorlog.warnings().is_empty());
    assert!(matches!(
        vm.errorlog.errors(),
        [CheckError::DeniedWarning {
            code: WarningCode::NonConstantKeyword,
            ..
        }]
    ));
}

#[test]
fn test_strict_mode_denies_opt_in_warnings() {
    let config = AnalyzerConfig::from_str("[warnings]\nstrict = true\n").unwrap();
    let mut vm = Vm::with_config(config.warning_config().unwrap());

    let int = vm.types.int_type();
    let one = vm.constant(Constant::Int(1));
    let cls = ClassBuilder::new("A")
        .declare("a", int, one)
        .annotate("b", int)
        .build(&mut vm)
        .unwrap();
    Dataclass::new().decorate(&mut vm, cls).unwrap();

    assert!(matches!(
        vm.errorlog.errors(),
        [CheckError::DeniedWarning {
            code: WarningCode::RequiredAfterDefault,
            ..
        }]
    ));
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = AnalyzerConfig::from_str("[warnings]\ndeny = [\"duplicate-annotation\"]\nstrict = false\n").unwrap();
    let text = toml::to_string(&config).unwrap();
    assert_eq!(AnalyzerConfig::from_str(&text).unwrap(), config);
}
