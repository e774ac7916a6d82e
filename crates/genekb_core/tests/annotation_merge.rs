use genekb_core::{merge, parse_node, MergeError, Node};

fn node(text: &str) -> Node {
    parse_node(text).expect("valid input").expect("one node")
}

#[test]
fn external_summary_overrides_record_summary() {
    let annotated = merge(&node(
        "((G1 protein_coding 1 100 200 BRCA1 (brca1 brca) (own summary)) (S))",
    ))
    .expect("well-formed pairing");

    assert_eq!(annotated.summary, "S");
    assert_eq!(annotated.record.summary.to_string(), "(own summary)");

    let statements = annotated.to_relations();
    let summary = statements.last().expect("summary statement");
    assert_eq!(summary.relation(), "summary");
    assert_eq!(summary.value(), Some(&Node::leaf("S")));
}

#[test]
fn seven_and_eight_field_records_serialize_identically() {
    let seven = merge(&node("((G1 t 1 1 2 N (x y)) (S))")).expect("seven fields");
    let eight = merge(&node("((G1 t 1 1 2 N (x y) old) (S))")).expect("eight fields");
    assert_eq!(seven.to_relations(), eight.to_relations());
}

#[test]
fn structural_errors_are_values() {
    let cases = [
        ("(G1 t 1 1 2 N () s)", "parts"),
        ("((G1 t 1 1 2 N () s) ())", "no text"),
        ("((G1) (S))", "malformed record"),
    ];
    for (text, needle) in cases {
        let err: MergeError = merge(&node(text)).expect_err("structural mismatch");
        assert!(err.to_string().contains(needle), "{text}: {err}");
    }
}
