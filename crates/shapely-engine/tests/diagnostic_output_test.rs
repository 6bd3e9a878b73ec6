//! Rendering of decoration errors and warnings
//!
//! Run with `cargo test --test diagnostic_output_test -- --nocapture` to see
//! the terminal output.

use shapely_engine::checker::{create_files, JsonDiagnostic};
use shapely_engine::{
    CallArgs, ClassBuilder, Constant, Dataclass, Diagnostic, Field, Span, WarningConfig, Vm,
};
use termcolor::NoColor;

const SOURCE: &str = "@dataclass\nclass A:\n    x: int = \"hello\"\n    x: str\n";

// Byte ranges of the two annotations in SOURCE
const FIRST_X: Span = Span {
    start: 24,
    end: 40,
    line: 3,
    column: 5,
};
const SECOND_X: Span = Span {
    start: 45,
    end: 51,
    line: 4,
    column: 5,
};

fn render(diag: &Diagnostic, files: &shapely_engine::checker::SimpleFiles<String, String>) -> String {
    let mut out = NoColor::new(Vec::new());
    diag.emit_to(&mut out, files).unwrap();
    String::from_utf8(out.into_inner()).unwrap()
}

fn decorate_source(config: WarningConfig) -> Vm {
    let mut vm = Vm::with_config(config);
    let int = vm.types.int_type();
    let str_ty = vm.types.str_type();
    let hello = vm.constant(Constant::Str("hello".to_string()));

    let cls = ClassBuilder::new("A")
        .at(Span::new(11, 19, 2, 1))
        .annotate_at("x", int, FIRST_X)
        .assign("x", hello)
        .annotate_at("x", str_ty, SECOND_X)
        .build(&mut vm)
        .unwrap();
    Dataclass::new().decorate(&mut vm, cls).unwrap();
    vm
}

#[test]
fn test_mismatch_rendering() {
    // The last annotation wins, so use a source where it is the only one
    let mut vm = Vm::new();
    let int = vm.types.int_type();
    let hello = vm.constant(Constant::Str("hello".to_string()));
    let cls = ClassBuilder::new("A")
        .annotate_at("x", int, FIRST_X)
        .assign("x", hello)
        .build(&mut vm)
        .unwrap();
    Dataclass::new().decorate(&mut vm, cls).unwrap();

    let files = create_files("model.py", SOURCE);
    let errors = vm.errorlog.errors();
    assert_eq!(errors.len(), 1);

    let diag = Diagnostic::from_check_error(&errors[0], 0);
    let _ = diag.emit(&files);

    let text = render(&diag, &files);
    assert!(text.contains("error[E4001]"));
    assert!(text.contains("Type annotation for x does not match type of assignment"));
    assert!(text.contains("model.py:3:5"));
    assert!(text.contains("Assignment: str (value 'hello')"));
}

#[test]
fn test_mismatch_json() {
    let mut vm = Vm::new();
    let int = vm.types.int_type();
    let hello = vm.constant(Constant::Str("hello".to_string()));
    let cls = ClassBuilder::new("A")
        .annotate_at("x", int, FIRST_X)
        .assign("x", hello)
        .build(&mut vm)
        .unwrap();
    Dataclass::new().decorate(&mut vm, cls).unwrap();

    let files = create_files("model.py", SOURCE);
    let diag = Diagnostic::from_check_error(&vm.errorlog.errors()[0], 0);
    let json = diag.to_json(&files).unwrap();
    let parsed: JsonDiagnostic = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.code.as_deref(), Some("E4001"));
    assert_eq!(parsed.severity, "error");
    assert_eq!(parsed.labels.len(), 1);
    assert_eq!(parsed.labels[0].file, "model.py");
    assert_eq!(parsed.labels[0].start_line, 3);
    assert_eq!(parsed.labels[0].start_column, 5);
    assert_eq!(parsed.labels[0].style, "primary");
    assert_eq!(parsed.notes, vec!["Annotation: int", "Assignment: str (value 'hello')"]);
}

#[test]
fn test_duplicate_annotation_rendering() {
    let vm = decorate_source(WarningConfig::all());
    let files = create_files("model.py", SOURCE);

    let warnings = vm.errorlog.warnings();
    assert_eq!(warnings.len(), 1);
    let diag = Diagnostic::from_warning(&warnings[0], 0);
    let _ = diag.emit(&files);

    let text = render(&diag, &files);
    assert!(text.contains("warning[W2001]"));
    assert!(text.contains("annotated again here"));
    assert!(text.contains("first annotation here"));

    let json: JsonDiagnostic = serde_json::from_str(&diag.to_json(&files).unwrap()).unwrap();
    let styles: Vec<&str> = json.labels.iter().map(|l| l.style.as_str()).collect();
    assert_eq!(styles, vec!["primary", "secondary"]);
    assert_eq!(json.labels[0].start_line, 4);
    assert_eq!(json.labels[1].start_line, 3);
}

#[test]
fn test_duplicate_annotation_silent_by_default() {
    let vm = decorate_source(WarningConfig::default());
    assert!(vm.errorlog.warnings().is_empty());
    // The default is checked against the last annotation, str
    assert!(vm.errorlog.errors().is_empty());
}

#[test]
fn test_denied_warning_rendering() {
    let mut config = WarningConfig::all();
    config.deny.insert(shapely_engine::WarningCode::DuplicateAnnotation);
    let vm = decorate_source(config);
    let files = create_files("model.py", SOURCE);

    assert!(vm.errorlog.warnings().is_empty());
    let errors = vm.errorlog.errors();
    assert_eq!(errors.len(), 1);

    let diag = Diagnostic::from_check_error(&errors[0], 0);
    let text = render(&diag, &files);
    assert!(text.contains("error[W2001]"));
    assert!(text.contains("warning denied by configuration"));
}

#[test]
fn test_decorate_error_rendering() {
    let source = "x: int = field(default=0, default_factory=int)\n";
    let files = create_files("model.py", source);

    let mut vm = Vm::new();
    let zero = vm.constant(Constant::Int(0));
    let int = vm.builtin("int").unwrap();
    let args = CallArgs::empty()
        .keyword("default", zero)
        .keyword("default_factory", int)
        .at(Span::new(9, 46, 1, 10));
    let err = Field::new().call(&mut vm, &args).unwrap_err();

    let diag = Diagnostic::from_decorate_error(&err, 0);
    let _ = diag.emit(&files);

    let text = render(&diag, &files);
    assert!(text.contains("error[E4002]"));
    assert!(text.contains("Duplicate keyword argument 'default' in call to dataclasses.field"));
    assert!(text.contains("conflicting keyword arguments"));
}
