//! Error handling: reserved words, placeholders, recovery, and the
//! diagnostic wire shape.

use manifest_core::*;

#[test]
fn reserved_entity_name_one_error_and_placeholder() {
    let result = parse("entity entity {}");
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("Reserved word"));
    assert_eq!(result.errors[0].severity, DiagnosticSeverity::Error);
    assert_eq!(result.program.entities.len(), 1);
}

#[test]
fn reserved_property_name_reports_and_keeps_entity() {
    let result = parse("entity User {\n  property command: string\n}");
    assert!(!result.errors.is_empty());
    assert!(result
        .errors
        .iter()
        .any(|e| e.message.contains("Reserved word")));
    assert_eq!(result.program.entities.len(), 1);
    assert_eq!(result.program.entities[0].properties.len(), 1);
}

#[test]
fn reserved_command_name_one_error_and_placeholder() {
    let result = parse("command entity() {}");
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("Reserved word"));
    assert_eq!(result.program.commands.len(), 1);
}

#[test]
fn each_reserved_occurrence_reports_separately() {
    let result = parse("entity User {\n  property command: string\n  property event: string\n}");
    let reserved = result
        .errors
        .iter()
        .filter(|e| e.message.contains("Reserved word"))
        .count();
    assert_eq!(reserved, 2);
    assert_eq!(result.program.entities[0].properties.len(), 2);
}

#[test]
fn keywords_as_object_keys_are_legal() {
    let result = parse(r#"command test() { compute { entity: "User", command: "test" } }"#);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn keywords_as_member_properties_are_legal() {
    let result = parse("command test() { compute obj.entity }");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn placeholder_preserves_collection_ordinals() {
    let result = parse("entity entity {}\nentity User {}");
    assert_eq!(result.program.entities.len(), 2);
    assert_eq!(result.program.entities[0].name, "entity");
    assert_eq!(result.program.entities[1].name, "User");
}

#[test]
fn diagnostics_carry_locations() {
    let result = parse("entity entity {}");
    let location = result.errors[0].location.expect("location expected");
    assert_eq!(location.line, 1);
    assert_eq!(location.column, 8);
}

// ── Recovery ─────────────────────────────────────────────────────────

#[test]
fn one_bad_declaration_between_two_good_ones() {
    let src = r#"
        entity Good {}
        entity Broken {
          property name
        }
        command greet() {}
    "#;
    let result = parse(src);
    assert!(!result.errors.is_empty());
    assert_eq!(result.program.entities.len(), 1);
    assert_eq!(result.program.entities[0].name, "Good");
    assert_eq!(result.program.commands.len(), 1);
}

#[test]
fn unknown_top_level_keyword_is_skipped() {
    let result = parse("widget Thing {}\nentity User {}");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.program.entities.len(), 1);
}

#[test]
fn lexer_diagnostics_are_part_of_the_batch() {
    let result = parse("entity User {\n  property name: string = \"unterminated\n}");
    assert!(result
        .errors
        .iter()
        .any(|e| e.message.contains("Unterminated string")));
}

#[test]
fn parse_never_fails_on_garbage() {
    for src in [
        "{}{}{}",
        "entity",
        "entity {",
        "@@@@",
        "command ()",
        "}}}}",
        "compose compose compose",
        "\"\"\"",
    ] {
        let result = parse(src);
        // Total function: a program always comes back
        assert!(result.errors.len() <= src.len() + 1, "runaway on {}", src);
    }
}

// ── Wire shape ───────────────────────────────────────────────────────

#[test]
fn diagnostic_wire_shape() {
    let result = parse("entity entity {}");
    let value = serde_json::to_value(&result.errors[0]).unwrap();
    assert_eq!(value["severity"], "error");
    assert_eq!(value["location"]["line"], 1);
    assert_eq!(value["location"]["column"], 8);
    assert!(value["message"]
        .as_str()
        .unwrap()
        .contains("Reserved word"));
}

#[test]
fn program_wire_shape_uses_camel_case() {
    let result = parse(
        r#"
        entity Post {
          property required title: string = "x"
          computed slug: string = title
          belongsTo author: User with authorId
        }
        expose Post as rest server
        "#,
    );
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let value = serde_json::to_value(&result.program).unwrap();
    let post = &value["entities"][0];
    assert_eq!(post["properties"][0]["dataType"]["name"], "string");
    assert_eq!(post["properties"][0]["modifiers"][0], "required");
    assert_eq!(post["properties"][0]["defaultValue"]["type"], "Literal");
    assert!(post["computedProperties"][0]["dependencies"].is_array());
    assert_eq!(post["relationships"][0]["kind"], "belongsTo");
    assert_eq!(post["relationships"][0]["foreignKey"], "authorId");
    assert_eq!(value["exposures"][0]["generateServer"], true);
    assert_eq!(value["exposures"][0]["protocol"], "rest");
}

#[test]
fn severity_spellings() {
    let result = parse(
        r#"
        entity A {
          constraint a:ok self.x > 0
          constraint b:warn self.x > 0
          constraint c: self.x > 0
        }
        "#,
    );
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let value = serde_json::to_value(&result.program).unwrap();
    let constraints = &value["entities"][0]["constraints"];
    assert_eq!(constraints[0]["severity"], "ok");
    assert_eq!(constraints[1]["severity"], "warn");
    assert_eq!(constraints[2]["severity"], "block");
}
