//! Message rendering: template tiers, labels and placeholder substitution.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use tessera_validator::prelude::*;

fn min_error(field: &str) -> ValidationError {
    ValidationError::new(field, "min").with_param("min", "18")
}

#[rstest]
#[case(&[("age.min", "A"), ("age", "B"), ("min", "C"), ("default", "D")], "A")]
#[case(&[("age", "B"), ("min", "C"), ("default", "D")], "B")]
#[case(&[("min", "C"), ("default", "D")], "C")]
#[case(&[("default", "D")], "D")]
#[case(&[], "The age does not pass the validation.")]
fn templates_resolve_most_specific_first(
    #[case] templates: &[(&str, &str)],
    #[case] expected: &str,
) {
    let translator = Translator::new().with_templates(templates.iter().copied());
    assert_eq!(translator.translate(&min_error("age")), expected);
}

#[test]
fn labels_rename_attributes_and_parameters() {
    let translator = Translator::new()
        .with_labels([("password_confirm", "confirmation"), ("password", "password field")])
        .with_templates([("equals", "The :attribute must match the :other.")]);

    let error = ValidationError::new("password_confirm", "equals").with_param("other", "password");
    assert_eq!(
        translator.translate(&error),
        "The confirmation must match the password field."
    );
}

#[test]
fn longest_placeholder_wins() {
    let translator = Translator::new().with_templates([("size", "Max :sizeKB, got :sizes")]);
    let error = ValidationError::new("doc", "size")
        .with_param("size", "64")
        .with_param("sizes", "many");

    assert_eq!(translator.translate(&error), "Max 64KB, got many");
}

#[test]
fn unknown_tokens_stay_verbatim() {
    let translator =
        Translator::new().with_templates([("regex", "At 10:30 :attribute fails :pattern :nope")]);
    let error = ValidationError::new("code", "regex").with_param("pattern", "/^x$/");

    assert_eq!(translator.translate(&error), "At 10:30 code fails /^x$/ :nope");
}

#[test]
fn substituted_text_is_not_rescanned() {
    let translator = Translator::new()
        .with_labels([("name", "the :other name")])
        .with_templates([("different", ":attribute vs :other")]);
    let error = ValidationError::new("name", "different").with_param("other", "alias");

    assert_eq!(translator.translate(&error), "the :other name vs alias");
}

#[test]
fn field_template_collapses_to_one_message() {
    let translator = Translator::new().with_templates([
        ("age", "The :attribute must be an adult age, at least :min."),
        ("integer", "not used"),
    ]);
    let errors = [min_error("age"), ValidationError::new("age", "integer")];

    assert_eq!(
        translator.messages("age", &errors),
        ["The age must be an adult age, at least 18."]
    );
    assert!(translator.messages("age", &[]).is_empty());
}

#[test]
fn with_methods_merge_and_keep_the_original() {
    let base = Translator::new()
        .with_labels([("a", "Alpha"), ("b", "Bravo")])
        .with_templates([("min", "old")]);
    let changed = base
        .with_labels([("b", "Beta")])
        .with_templates([("min", "new")]);

    assert_eq!(base.label("b"), "Bravo");
    assert_eq!(changed.label("b"), "Beta");
    assert_eq!(changed.label("a"), "Alpha");
    assert_eq!(changed.label("c"), "c");
    assert_eq!(base.template("min"), Some("old"));
    assert_eq!(changed.template("min"), Some("new"));
}

#[test]
fn config_loads_from_json() {
    let config: TranslatorConfig = serde_json::from_value(json!({
        "labels": {"age": "Your age"},
        "templates": {"age.min": ":attribute must be :min or more"}
    }))
    .unwrap();

    let translator = Translator::from_config(config);
    assert_eq!(translator.translate(&min_error("age")), "Your age must be 18 or more");

    let partial: TranslatorConfig = serde_json::from_value(json!({"labels": {}})).unwrap();
    assert!(partial.templates.is_empty());
}

#[test]
fn results_render_lazily_with_their_translator() {
    let validator = ValidatorFactory::create("en")
        .unwrap()
        .validator(rules([("age", "min:18")]));
    let result = validator.validate_json(&json!({"age": 3})).unwrap();

    assert_eq!(result.messages(), ["The age must be greater than 18."]);

    let relabelled = validator.with_labels([("age", "Age")]);
    let result = relabelled.validate_json(&json!({"age": 3})).unwrap();
    assert_eq!(
        result.messages_by_field().get("age").map(Vec::as_slice),
        Some(&["The Age must be greater than 18.".to_owned()][..])
    );
}
