//! Relation statement serialization and knowledge file reading.
//!
//! # Responsibility
//! - Turn a gene record into the ordered relation statements persisted in
//!   knowledge files.
//! - Read persisted statements back and regroup them into records.
//!
//! # Invariants
//! - Statement order is fixed: identity, `gene_type` (twice), `chr`, `start`,
//!   `end`, `gene_name`, `synonyms`, `summary`.
//! - Values are written in their string forms. Free text that would not
//!   re-read as one leaf is written as a quoted string literal, so every
//!   rendered block parses on its own.

use crate::model::expr::{parse_nodes, Node, ParseError};
use crate::model::gene::GeneRecord;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub const REL_GENE: &str = "gene";
pub const REL_GENE_TYPE: &str = "gene_type";
pub const REL_CHR: &str = "chr";
pub const REL_START: &str = "start";
pub const REL_END: &str = "end";
pub const REL_GENE_NAME: &str = "gene_name";
pub const REL_SYNONYMS: &str = "synonyms";
pub const REL_SUMMARY: &str = "summary";

/// Statements produced per record, including the duplicated `gene_type`.
pub const STATEMENTS_PER_RECORD: usize = 9;

/// One persisted assertion about a gene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationStatement {
    /// `(gene <id>)`
    Identity { id: Node },
    /// `(<attribute> (gene <id>) <value>)`
    Attribute {
        attribute: String,
        id: Node,
        value: Node,
    },
}

impl RelationStatement {
    fn attribute(attribute: &str, id: &Node, value: Node) -> Self {
        Self::Attribute {
            attribute: attribute.to_string(),
            id: id.clone(),
            value,
        }
    }

    /// Subject gene identifier.
    pub fn id(&self) -> &Node {
        match self {
            Self::Identity { id } | Self::Attribute { id, .. } => id,
        }
    }

    /// Relation name; `gene` for identity statements.
    pub fn relation(&self) -> &str {
        match self {
            Self::Identity { .. } => REL_GENE,
            Self::Attribute { attribute, .. } => attribute.as_str(),
        }
    }

    /// Attribute value, or `None` for identity statements.
    pub fn value(&self) -> Option<&Node> {
        match self {
            Self::Identity { .. } => None,
            Self::Attribute { value, .. } => Some(value),
        }
    }

    /// Expression form of this statement, as handed back to the host.
    pub fn to_node(&self) -> Node {
        let subject = Node::composite([Node::leaf(REL_GENE), self.id().clone()]);
        match self {
            Self::Identity { .. } => subject,
            Self::Attribute {
                attribute, value, ..
            } => Node::composite([Node::leaf(attribute.as_str()), subject, value.clone()]),
        }
    }

    /// Reads one statement expression; returns `None` for other shapes.
    pub fn from_node(node: &Node) -> Option<Self> {
        match node.children()? {
            [head, id] if head.as_leaf() == Some(REL_GENE) => {
                Some(Self::Identity { id: id.clone() })
            }
            [head, subject, value] => {
                let attribute = head.as_leaf()?;
                match subject.children()? {
                    [gene, id] if gene.as_leaf() == Some(REL_GENE) => {
                        Some(Self::attribute(attribute, id, value.clone()))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl Display for RelationStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity { id } => {
                write!(f, "({REL_GENE} ")?;
                write_value(f, id)?;
                f.write_str(")")
            }
            Self::Attribute {
                attribute,
                id,
                value,
            } => {
                write!(f, "({attribute} ({REL_GENE} ")?;
                write_value(f, id)?;
                f.write_str(") ")?;
                write_value(f, value)?;
                f.write_str(")")
            }
        }
    }
}

/// Writes a value in its string form. A leaf that would not re-read as
/// itself is written as a quoted string literal instead.
fn write_value(f: &mut Formatter<'_>, value: &Node) -> std::fmt::Result {
    match value {
        Node::Leaf(text) if reads_back_as_leaf(text) => f.write_str(text),
        Node::Leaf(text) => f.write_str(&quote_text(text)),
        Node::Composite(children) => {
            f.write_str("(")?;
            for (index, child) in children.iter().enumerate() {
                if index > 0 {
                    f.write_str(" ")?;
                }
                write_value(f, child)?;
            }
            f.write_str(")")
        }
    }
}

fn reads_back_as_leaf(text: &str) -> bool {
    matches!(parse_nodes(text).as_deref(), Ok([Node::Leaf(parsed)]) if parsed == text)
}

/// Quoted literal for free text; the result stays on one line.
fn quote_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Serializes a record into its ordered relation statements.
///
/// `summary_override` replaces the record's own summary when present.
pub fn to_relations(record: &GeneRecord, summary_override: Option<&str>) -> Vec<RelationStatement> {
    let id = &record.id;
    let synonyms = Node::composite(record.synonym_list().into_iter().map(Node::Leaf));
    let summary = match summary_override {
        Some(text) => Node::leaf(text),
        None => record.summary.clone(),
    };

    vec![
        RelationStatement::Identity { id: id.clone() },
        RelationStatement::attribute(REL_GENE_TYPE, id, record.gene_type.clone()),
        RelationStatement::attribute(REL_GENE_TYPE, id, record.gene_type.clone()),
        RelationStatement::attribute(REL_CHR, id, record.chromosome.clone()),
        RelationStatement::attribute(REL_START, id, record.start.clone()),
        RelationStatement::attribute(REL_END, id, record.end.clone()),
        RelationStatement::attribute(REL_GENE_NAME, id, record.name.clone()),
        RelationStatement::attribute(REL_SYNONYMS, id, synonyms),
        RelationStatement::attribute(REL_SUMMARY, id, summary),
    ]
}

/// Renders statements one per line, terminated by a blank separator line.
pub fn render_statements(statements: &[RelationStatement]) -> String {
    let mut out = String::new();
    for statement in statements {
        out.push_str(&statement.to_string());
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Reads every relation statement in knowledge file text.
///
/// Expressions that are not relation statements are skipped.
pub fn parse_statements(text: &str) -> Result<Vec<RelationStatement>, ParseError> {
    Ok(parse_nodes(text)?
        .iter()
        .filter_map(RelationStatement::from_node)
        .collect())
}

/// Regroups statements into complete records, in first-seen id order.
///
/// Ids lacking any of the seven attributes are skipped. When an attribute
/// repeats, the last value wins.
pub fn collect_records(statements: &[RelationStatement]) -> Vec<GeneRecord> {
    let mut order: Vec<&Node> = Vec::new();
    let mut attributes: BTreeMap<String, BTreeMap<&str, &Node>> = BTreeMap::new();

    for statement in statements {
        let key = statement.id().to_string();
        let entry = attributes.entry(key).or_insert_with(|| {
            order.push(statement.id());
            BTreeMap::new()
        });
        if let Some(value) = statement.value() {
            entry.insert(statement.relation(), value);
        }
    }

    order
        .into_iter()
        .filter_map(|id| {
            let fields = attributes.get(&id.to_string())?;
            let field = |name: &str| fields.get(name).map(|value| (*value).clone());
            Some(GeneRecord {
                id: id.clone(),
                gene_type: field(REL_GENE_TYPE)?,
                chromosome: field(REL_CHR)?,
                start: field(REL_START)?,
                end: field(REL_END)?,
                name: field(REL_GENE_NAME)?,
                synonyms: field(REL_SYNONYMS)?,
                summary: field(REL_SUMMARY)?,
            })
        })
        .collect()
}
