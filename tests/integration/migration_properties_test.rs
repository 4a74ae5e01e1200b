//! Behavioural properties of the 1.1 to 1.2 migration

use vpzconv::conversion::{ConversionConfig, ConversionEngine, ConversionOutcome, MigratedValues};
use vpzconv::document::doctype::{VLE_1_2_SYSTEM_ID, VLE_PUBLIC_ID};
use vpzconv::error::{ConversionError, ConversionErrorKind};
use vpzconv::parser::parse_document;
use pretty_assertions::assert_eq;

fn compact_engine() -> ConversionEngine {
    ConversionEngine::new(ConversionConfig::default().with_pretty(false))
}

fn engine() -> ConversionEngine {
    ConversionEngine::new(ConversionConfig::default())
}

#[test]
fn test_end_to_end_minimal_project() {
    let input = r#"<vle_project><experiment begin="0" duration="100"/><conditions/></vle_project>"#;
    let output = compact_engine().convert_str(input).unwrap().content.unwrap();

    assert!(output.contains(
        r#"<conditions><condition name="simulation_engine"><port name="begin"><double>0</double></port><port name="duration"><double>100</double></port></condition></conditions>"#
    ));
    assert!(output.contains("<experiment/>"));
}

#[test]
fn test_documents_without_project_or_experiment_are_skipped() {
    for input in [
        r#"<project><experiment begin="0" duration="1"/><conditions/></project>"#,
        r#"<vle_project><conditions/></vle_project>"#,
        r#"<?xml version="1.0"?><other/>"#,
    ] {
        let data = engine().convert_str(input).unwrap();
        assert_eq!(data.outcome, ConversionOutcome::NotMatchingFormat, "{}", input);
        assert!(data.content.is_none());
    }
}

#[test]
fn test_second_pass_is_a_no_op() {
    let input = r#"<?xml version="1.0" encoding="UTF-8"?>
<vle_project>
  <experiment name="exp" begin="0" duration="100" seed="1">
    <conditions>
      <condition name="c"><port name="p"><double>2</double></port></condition>
    </conditions>
  </experiment>
</vle_project>
"#;
    let first = engine().convert_str(input).unwrap().content.unwrap();
    let second = engine().convert_str(&first).unwrap();

    assert_eq!(second.outcome, ConversionOutcome::AlreadyConverted);
    assert!(second.content.is_none());
    assert_eq!(
        parse_document(&first)
            .unwrap()
            .elements_by_tag_name("condition")
            .len(),
        2
    );
}

#[test]
fn test_attribute_strings_are_kept_verbatim() {
    let input = r#"<vle_project><experiment begin="0.0" duration="1e3"/><conditions/></vle_project>"#;
    let data = engine().convert_str(input).unwrap();
    assert_eq!(
        data.outcome,
        ConversionOutcome::Converted(MigratedValues {
            begin: "0.0".to_string(),
            duration: "1e3".to_string(),
        })
    );

    let doc = parse_document(&data.content.unwrap()).unwrap();
    let doubles: Vec<String> = doc
        .elements_by_tag_name("double")
        .into_iter()
        .map(|e| e.text())
        .collect();
    assert_eq!(doubles, vec!["0.0", "1e3"]);
}

#[test]
fn test_condition_goes_into_first_conditions_only() {
    let input = r#"<vle_project><experiment begin="0" duration="100"><conditions><condition name="a"/></conditions></experiment><classes><class><conditions/></class></classes></vle_project>"#;
    let output = engine().convert_str(input).unwrap().content.unwrap();
    let doc = parse_document(&output).unwrap();

    let all = doc.elements_by_tag_name("conditions");
    assert_eq!(all.len(), 2);

    let first: Vec<_> = all[0]
        .child_elements()
        .filter_map(|e| e.attribute("name"))
        .collect();
    assert_eq!(first, vec!["a", "simulation_engine"]);
    assert_eq!(all[1].child_elements().count(), 0);

    let engine_condition = all[0].child_elements().last().unwrap();
    let ports: Vec<_> = engine_condition
        .child_elements()
        .filter_map(|p| p.attribute("name"))
        .collect();
    assert_eq!(ports, vec!["begin", "duration"]);
    for port in engine_condition.child_elements() {
        assert_eq!(port.child_elements().count(), 1);
    }
}

#[test]
fn test_doctype_is_rewritten() {
    let input = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE vle_project PUBLIC "-//VLE TEAM//DTD Strict//EN" "http://www.vle-project.org/vle-1.1.0.dtd">
<vle_project><experiment begin="0" duration="100"/><conditions/></vle_project>"#;
    let output = engine().convert_str(input).unwrap().content.unwrap();
    let doctype = parse_document(&output).unwrap().doctype.unwrap();

    assert_eq!(doctype.name, "vle_project");
    assert_eq!(doctype.public_id.as_deref(), Some(VLE_PUBLIC_ID));
    assert_eq!(doctype.system_id.as_deref(), Some(VLE_1_2_SYSTEM_ID));
    assert!(!output.contains("vle-1.1.0.dtd"));
}

#[test]
fn test_doctype_is_added_when_absent() {
    let input = r#"<vle_project><experiment begin="0" duration="100"/><conditions/></vle_project>"#;
    let output = engine().convert_str(input).unwrap().content.unwrap();
    let doctype = parse_document(&output).unwrap().doctype.unwrap();
    assert_eq!(doctype.system_id.as_deref(), Some(VLE_1_2_SYSTEM_ID));
}

#[test]
fn test_missing_conditions_is_reported() {
    let input = r#"<vle_project><experiment begin="0" duration="100"/></vle_project>"#;
    let err = engine().convert_str(input).unwrap_err();
    assert!(matches!(
        err,
        ConversionError::Conversion {
            kind: ConversionErrorKind::Structural { .. },
            ..
        }
    ));
    assert!(err.user_message().contains("conditions"));
}

#[test]
fn test_output_is_pretty_printed_utf8() {
    let input = r#"<?xml version="1.0" encoding="ISO-8859-1"?><vle_project><experiment begin="0" duration="100"/><conditions/></vle_project>"#;
    let output = engine().convert_str(input).unwrap().content.unwrap();

    assert!(output.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(output.contains("\n  <experiment/>"));
    assert!(output.ends_with('\n'));
}
