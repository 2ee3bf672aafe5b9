use schemars::schema_for;
use tabmask_core::{ColumnRule, FieldType, FieldTypeConfig, RuleSet};

#[test]
fn decodes_rules_with_defaults() {
    let toml_src = r#"
[Name]
selected = true
field_type = "Full Name"

[Age]
selected = true
field_type = "Number"
blank_percent = 0.25
config = { min = 20, max = 60, is_integer = true }

[Notes]
field_type = "Custom List"
"#;

    let rules: RuleSet = toml::from_str(toml_src).expect("decode rules");
    assert_eq!(rules.len(), 3);

    let name = rules.get("Name").expect("name rule");
    assert!(name.selected);
    assert_eq!(name.blank_percent, 0.0);
    assert!(name.config.is_empty());
    assert_eq!(name.field_type.resolve(), Some(FieldType::FullName));

    let age = rules.get("Age").expect("age rule");
    assert_eq!(age.blank_percent, 0.25);
    assert_eq!(age.config.get("max"), Some(&serde_json::json!(60)));

    let notes = rules.get("Notes").expect("notes rule");
    assert!(!notes.selected);
}

#[test]
fn unknown_field_type_survives_decoding() {
    let rules: RuleSet = serde_json::from_str(
        r#"{"Ssn": {"selected": true, "field_type": "Social Security"}}"#,
    )
    .expect("decode rules");
    let rule = rules.get("Ssn").expect("ssn rule");
    assert_eq!(rule.field_type.as_str(), "Social Security");
    assert_eq!(rule.field_type.resolve(), None);
}

#[test]
fn serializes_rules_deterministically() {
    let rules = RuleSet::new()
        .with("b", ColumnRule::skipped(FieldType::Email))
        .with(
            "a",
            ColumnRule::masked(FieldType::Number)
                .with_config(FieldTypeConfig::new().with("min", 1).with("max", 5)),
        );

    let json = serde_json::to_string(&rules).expect("serialize rules");
    let expected = concat!(
        r#"{"a":{"selected":true,"field_type":"Number","blank_percent":0.0,"config":{"max":5,"min":1}},"#,
        r#""b":{"selected":false,"field_type":"Email","blank_percent":0.0}}"#
    );
    assert_eq!(json, expected);
}

#[test]
fn json_schema_describes_rule_fields() {
    let schema = schema_for!(RuleSet);
    let json = serde_json::to_string(&schema).expect("serialize json schema");
    assert!(json.contains("field_type"));
    assert!(json.contains("blank_percent"));
    assert!(json.contains("selected"));
}
