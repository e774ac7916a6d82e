use genekb_core::{
    extract, parse_node, render_statements, to_relations, GeneRecord, Node, RelationStatement,
    STATEMENTS_PER_RECORD,
};

fn record(text: &str) -> GeneRecord {
    let node = parse_node(text).expect("valid input").expect("one node");
    extract(&node).expect("well-formed record")
}

#[test]
fn brca1_serializes_to_expected_statements() {
    let statements = to_relations(
        &record("(G1 protein_coding 1 100 200 BRCA1 (brca1 brca) (a b))"),
        None,
    );
    let rendered: Vec<String> = statements.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "(gene G1)",
            "(gene_type (gene G1) protein_coding)",
            "(gene_type (gene G1) protein_coding)",
            "(chr (gene G1) 1)",
            "(start (gene G1) 100)",
            "(end (gene G1) 200)",
            "(gene_name (gene G1) BRCA1)",
            "(synonyms (gene G1) (brca1 brca))",
            "(summary (gene G1) (a b))",
        ]
    );
}

#[test]
fn statement_nodes_match_rendered_text() {
    let statements = to_relations(
        &record("(G1 protein_coding 1 100 200 BRCA1 (brca1 brca) (a b))"),
        None,
    );
    for statement in &statements {
        assert_eq!(statement.to_node().to_string(), statement.to_string());
        assert_eq!(
            RelationStatement::from_node(&statement.to_node()).as_ref(),
            Some(statement)
        );
    }
}

#[test]
fn override_replaces_record_summary() {
    let statements = to_relations(&record("(G1 t 1 1 2 N () (own text))"), Some("S"));
    assert_eq!(statements.len(), STATEMENTS_PER_RECORD);
    assert_eq!(statements[8].value(), Some(&Node::leaf("S")));
    assert_eq!(statements[8].to_string(), "(summary (gene G1) S)");
}

#[test]
fn empty_synonyms_serialize_as_empty_list() {
    let text = render_statements(&to_relations(&record("(G4 t X 1 2 N () s)"), None));
    assert!(text.contains("(synonyms (gene G4) ())\n"));
}
