//! End-to-end test suite for goenum-core.

use crate::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_temp_project() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("goenum_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn rewrite(src: &str) -> String {
    rewrite_source(Path::new("x.go"), src, &ApplyMode::clean())
        .unwrap()
        .rewritten
        .expect("file should change")
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

const KIND: &str = r#"package job

type Kind string //#enum

const (
	KindA Kind = "a"
	KindB Kind = "b"
)
"#;

const KIND_EXPECTED: &str = r#"package job

import (
	"fmt"
)

type Kind string //#enum

const (
	KindA Kind = "a"
	KindB Kind = "b"
)

// Valid indicates if k is any of the valid values for Kind
func (k Kind) Valid() bool {
	switch k {
	case
		KindA,
		KindB:
		return true
	}
	return false
}

// Validate returns an error if k is none of the valid values for Kind
func (k Kind) Validate() error {
	if !k.Valid() {
		return fmt.Errorf("invalid value %#v for type job.Kind", k)
	}
	return nil
}

// Enums returns all valid values for Kind
func (Kind) Enums() []Kind {
	return []Kind{
		KindA,
		KindB,
	}
}

// EnumStrings returns all valid values for Kind as strings
func (Kind) EnumStrings() []string {
	return []string{
		"a",
		"b",
	}
}

// String implements the fmt.Stringer interface for Kind
func (k Kind) String() string {
	return string(k)
}
"#;

const STATUS: &str = r#"package job

import "errors"

var ErrStatus = errors.New("status")

type Status string //#enum,jsonschema

const (
	StatusUndefined Status = "" //#null
	StatusActive    Status = "active"
	StatusDone      Status = "done"
)
"#;

const COLOR: &str = r#"package paint

type Color int //#enum,jsonschema

const (
	Red   Color = 0
	Green Color = 1
	Blue  Color = 2
)
"#;

// Core Test 1: a plain string enum produces the exact expected file
#[test]
fn test_non_nullable_string_enum_golden() {
    assert_eq!(rewrite(KIND), KIND_EXPECTED);
}

// Core Test 2: running on generated output is a no-op
#[test]
fn test_idempotence() {
    for src in [KIND, STATUS, COLOR] {
        let once = rewrite(src);
        let outcome = rewrite_source(Path::new("x.go"), &once, &ApplyMode::clean()).unwrap();
        assert!(!outcome.changed, "second run changed:\n{once}");
        assert!(outcome.rewritten.is_none());
        assert!(outcome.ops > 0);
    }
}

#[test]
fn test_member_order_preserved() {
    let src = "package p\n\ntype Letter int //#enum\n\nconst (\n\tA Letter = 1\n\tB Letter = 2\n\tC Letter = 3\n)\n";
    let out = rewrite(src);
    assert!(out.contains("\tcase\n\t\tA,\n\t\tB,\n\t\tC:\n"));
    assert!(out.contains("\treturn []Letter{\n\t\tA,\n\t\tB,\n\t\tC,\n\t}"));
    assert!(out.contains("\treturn []string{\n\t\t\"1\",\n\t\t\"2\",\n\t\t\"3\",\n\t}"));
}

#[test]
fn test_authoring_errors_abort_file() {
    let duplicate = "package p\n\ntype S string //#enum\n\nconst (\n\tA S = \"\" //#null\n\tB S = \"b\" //#null\n)\n";
    let multi = "package p\n\ntype S string //#enum\n\nconst X, Y S = \"x\", \"y\" //#null\n";
    let empty = "package p\n\ntype S string //#enum\n";

    let mode = ApplyMode::clean();
    let err = rewrite_source(Path::new("d.go"), duplicate, &mode).unwrap_err();
    assert!(matches!(err, GoenumError::DuplicateNullMarker { .. }));
    let err = rewrite_source(Path::new("m.go"), multi, &mode).unwrap_err();
    assert!(matches!(err, GoenumError::MultiNameNullMarker { .. }));
    let err = rewrite_source(Path::new("e.go"), empty, &mode).unwrap_err();
    assert!(err.is_authoring_error());
    assert_eq!(
        err.to_string(),
        "enum type p.S in e.go:3 has no typed const enum values"
    );
}

#[test]
fn test_unknown_modifier_is_ignored() {
    let src = KIND.replace("//#enum", "//#enum,yaml");
    let out = rewrite(&src);
    assert!(out.contains("func (k Kind) Valid() bool"));
    assert!(!out.contains("JSONSchema"));
}

#[test]
fn test_three_known_methods_leave_one_copy() {
    let src = r#"package paint

import "fmt"

type Color int //#enum

// Valid is hand written
func (c Color) Valid() bool {
	return c >= 0
}

func (c Color) Custom() string { return fmt.Sprint(int(c)) }

// Enums lists colors
func (Color) Enums() []Color { return nil }

func (col Color) Validate() error { return nil }

const (
	Red   Color = 0
	Green Color = 1
)
"#;
    let out = rewrite(src);
    assert_eq!(count(&out, "Valid() bool"), 1);
    assert_eq!(count(&out, "Validate() error"), 1);
    assert_eq!(count(&out, "Enums() []Color"), 1);
    assert!(!out.contains("hand written"));
    assert!(!out.contains("Enums lists colors"));
    assert!(out.contains("func (c Color) Custom() string"));

    // the block sits where the first known method was
    let valid = out.find("// Valid indicates").unwrap();
    let custom = out.find("func (c Color) Custom()").unwrap();
    assert!(valid < custom);
    assert!(out.find("type Color int").unwrap() < valid);

    // no blank-line runs left where methods were removed
    assert!(!out.contains("\n\n\n"));
    assert_eq!(count(&out, "import"), 1);
}

#[test]
fn test_insertion_after_last_const_group() {
    let src = r#"package p

const (
	First Level = 1
)

type Level int //#enum

func helper() {}

const Second Level = 2

var trailing = 0
"#;
    let out = rewrite(src);
    let second = out.find("const Second Level = 2").unwrap();
    let block = out.find("// Valid indicates").unwrap();
    let trailing = out.find("var trailing").unwrap();
    assert!(second < block && block < trailing);
    assert!(out.contains("const Second Level = 2\n\n// Valid indicates if l is any"));
    assert!(out.contains("\tcase\n\t\tFirst,\n\t\tSecond:\n"));
}

#[test]
fn test_color_schema() {
    let out = rewrite(COLOR);
    assert!(out.contains(
        r#"// JSONSchema implements the jsonschema.Schema interface for Color
func (Color) JSONSchema() jsonschema.Schema {
	return jsonschema.Schema{
		Type: "number",
		Enum: []any{
			0,
			1,
			2,
		},
	}
}
"#
    ));
    assert!(!out.contains("OneOf"));
    assert!(!out.contains("IsNull"));
    assert!(out.contains("import (\n\t\"fmt\"\n\n\t\"github.com/invopop/jsonschema\"\n)"));
}

#[test]
fn test_status_nullable_schema_and_persistence() {
    let out = rewrite(STATUS);
    assert!(out.contains(
        r#"	return jsonschema.Schema{
		OneOf: []*jsonschema.Schema{
			{
				Type: "string",
				Enum: []any{
					"active",
					"done",
				},
			},
			{Type: "null"},
		},
		Default: StatusUndefined,
	}"#
    ));
    assert!(out.contains("func (s Status) IsNull() bool {\n\treturn s == StatusUndefined\n}"));
    assert!(out.contains("func (s *Status) Scan(value any) error {"));
    assert!(out.contains("func (s Status) Value() (driver.Value, error) {\n\tif s == StatusUndefined {\n\t\treturn nil, nil\n\t}\n\treturn string(s), nil\n}"));
    assert!(out.starts_with(
        "package job\n\nimport (\n\t\"bytes\"\n\t\"database/sql/driver\"\n\t\"encoding/json\"\n\t\"errors\"\n\t\"fmt\"\n\n\t\"github.com/invopop/jsonschema\"\n)\n"
    ));
}

#[test]
fn test_nullable_float_replaces_stale_scan() {
    let src = r#"package p

type Ratio float64 //#enum

const (
	RatioNone Ratio = 0 //#null
	Half      Ratio = 0.5
)

func (r *Ratio) Scan(v any) error { return nil }
"#;
    let out = rewrite(src);
    assert!(!out.contains("Scan("));
    assert!(out.contains("func (r Ratio) IsNull() bool"));
    assert!(out.contains("return json.Unmarshal(j, (*float64)(r))"));
}

#[test]
fn test_null_marker_on_anchor_survives() {
    let src = "package job\n\ntype Status string //#enum\n\nconst StatusOn Status = \"on\"\n\nconst StatusNone Status = \"\" //#null\n";
    let out = rewrite(src);
    assert!(out.contains("const StatusNone Status = \"\" //#null\n\n// Valid indicates"));
    assert!(!out.contains("} //#null"));
    assert!(out.contains("func (s Status) IsNull() bool"));

    let file = parse_source(Path::new("x.go"), &out).unwrap();
    let enums = find_enums(&file).unwrap();
    assert_eq!(enums[0].null_member.as_deref(), Some("StatusNone"));

    let outcome = rewrite_source(Path::new("x.go"), &out, &ApplyMode::clean()).unwrap();
    assert!(!outcome.changed);
}

#[test]
fn test_trailing_comment_stays_on_its_constant() {
    let src = "package job\n\ntype Status string //#enum\n\nconst StatusActive Status = \"active\" // the only one\n";
    let out = rewrite(src);
    assert!(out.contains("const StatusActive Status = \"active\" // the only one\n\n// Valid"));
    assert_eq!(count(&out, "// the only one"), 1);
    assert!(out.ends_with("return string(s)\n}\n"));
}

#[test]
fn test_known_method_trailing_comment_removed_with_it() {
    let src = r#"package paint

type Color int //#enum

func (c Color) Valid() bool { return true } // old valid

func (c Color) Enums() []Color { return nil } // old enums

const Red Color = 0
"#;
    let out = rewrite(src);
    assert!(!out.contains("// old valid"));
    assert!(!out.contains("// old enums"));
    assert_eq!(count(&out, "Valid() bool"), 1);
    assert_eq!(count(&out, "Enums() []Color"), 1);
    assert!(!out.contains("\n\n\n"));
}

#[test]
fn test_null_marker_on_blank_constant_is_rejected() {
    let src = "package job\n\ntype Status string //#enum\n\nconst (\n\t_ Status = \"\" //#null\n\tStatusOn Status = \"on\"\n)\n";
    let err = rewrite_source(Path::new("b.go"), src, &ApplyMode::clean()).unwrap_err();
    assert!(matches!(err, GoenumError::BlankNullMarker { .. }));
    assert!(err.is_authoring_error());
}

#[test]
fn test_debug_mode_annotates() {
    let out = rewrite_source(Path::new("x.go"), KIND, &ApplyMode::Debug)
        .unwrap()
        .rewritten
        .unwrap();
    assert!(out.contains(")\n\n// goenum: begin Replacement for Kind\n// Valid indicates"));
    assert!(out.ends_with("}\n// goenum: end Replacement for Kind\n"));
    assert!(!out.contains("import"));
}

#[test]
fn test_syntax_error_is_reported() {
    let err = rewrite_source(Path::new("bad.go"), "package p\n\nfunc (\n", &ApplyMode::clean())
        .unwrap_err();
    assert!(matches!(err, GoenumError::Parse { line: Some(_), .. }));
}

// Driver tests

#[test]
fn test_rewrite_paths_writes_and_is_stable() {
    let root = setup_temp_project();
    write_file(&root.join("kind.go"), KIND);
    write_file(&root.join("plain.go"), "package job\n\nfunc f() {}\n");
    write_file(&root.join("sub/color.go"), COLOR);

    let summary = Goenum::new(format!("{}/...", root.display()))
        .ignore_config(true)
        .jobs(2)
        .run()
        .unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.files_scanned, 3);
    assert_eq!(summary.enums_found, 2);
    assert_eq!(summary.files_changed, 2);
    assert!(summary.written);
    assert_eq!(fs::read_to_string(root.join("kind.go")).unwrap(), KIND_EXPECTED);

    let again = Goenum::new(format!("{}/...", root.display()))
        .ignore_config(true)
        .run()
        .unwrap();
    assert_eq!(again.files_changed, 0);
    assert!(!again.written);

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_rewrite_paths_non_recursive() {
    let root = setup_temp_project();
    write_file(&root.join("kind.go"), KIND);
    write_file(&root.join("sub/color.go"), COLOR);

    let summary = Goenum::new(root.display().to_string())
        .ignore_config(true)
        .run()
        .unwrap();
    assert_eq!(summary.files_scanned, 1);
    assert_eq!(fs::read_to_string(root.join("sub/color.go")).unwrap(), COLOR);

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_failure_writes_nothing() {
    let root = setup_temp_project();
    write_file(&root.join("kind.go"), KIND);
    write_file(&root.join("broken.go"), "package job\n\ntype Lonely int //#enum\n");

    let summary = Goenum::new(root.display().to_string())
        .ignore_config(true)
        .run()
        .unwrap();
    assert!(!summary.is_success());
    assert!(!summary.written);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].authoring);
    assert!(summary.failures[0].path.ends_with("broken.go"));
    assert_eq!(fs::read_to_string(root.join("kind.go")).unwrap(), KIND);

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_print_mode_leaves_files() {
    let root = setup_temp_project();
    write_file(&root.join("kind.go"), KIND);

    let summary = Goenum::new(root.join("kind.go").display().to_string())
        .ignore_config(true)
        .print(true)
        .run()
        .unwrap();
    assert_eq!(summary.files_changed, 1);
    assert!(!summary.written);
    assert_eq!(fs::read_to_string(root.join("kind.go")).unwrap(), KIND);

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_config_excludes_directories() {
    let root = setup_temp_project();
    write_file(&root.join("goenum.toml"), "exclude = [\"gen\"]\n");
    write_file(&root.join("gen/kind.go"), KIND);
    write_file(&root.join("color.go"), COLOR);

    let summary = Goenum::new(format!("{}/...", root.display())).run().unwrap();
    assert_eq!(summary.files_scanned, 1);
    assert_eq!(fs::read_to_string(root.join("gen/kind.go")).unwrap(), KIND);

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_summary_serializes() {
    let outcome = rewrite_source(Path::new("k.go"), KIND, &ApplyMode::clean()).unwrap();
    let summary = RewriteSummary {
        files_scanned: 1,
        enums_found: 1,
        files_changed: 1,
        written: false,
        outcomes: vec![outcome],
        failures: Vec::new(),
    };
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["outcomes"][0]["enums"][0], "Kind");
    assert_eq!(json["outcomes"][0]["changed"], true);
    assert!(json["outcomes"][0].get("rewritten").is_none());
}
