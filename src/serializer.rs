//! Serializer for writing ARM and EER models in notation form.

use crate::arm::ArmModel;
use crate::eer::{Constraint, EerEntity, EerModel};
use crate::lexer::is_identifier;
use crate::model::{Attribute, Entity};

/// Serialize an ARM model; the output loads back through the parser.
pub fn serialize_arm(model: &ArmModel) -> String {
    let mut output = String::new();

    for (i, entity) in model.entities().iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("entity {} {{\n", quote(entity.name())));
        serialize_attributes(&mut output, entity);
        output.push_str("}\n");
    }

    output
}

/// Serialize an EER model with its identifier and inheritance constraints.
pub fn serialize_eer(model: &EerModel) -> String {
    let mut output = String::new();

    for (i, entity) in model.entities().iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        serialize_eer_entity(&mut output, entity);
    }

    output
}

fn serialize_eer_entity(output: &mut String, entity: &EerEntity) {
    output.push_str(&format!("entity {} {{\n", quote(entity.name())));
    serialize_attributes(output, entity.entity());

    for constraint in entity.constraints() {
        serialize_constraint(output, constraint);
    }

    output.push_str("}\n");
}

/// Single-attribute keys go inline as `pk`; anything else becomes a
/// `primary_key(...)` line so order and repeats survive.
fn serialize_attributes(output: &mut String, entity: &Entity) {
    let key = entity.primary_key();
    let inline_key = key.len() == 1;

    for attr in entity.attributes() {
        serialize_attribute(output, attr);
        if inline_key && key[0] == attr.name() {
            output.push_str(" pk");
        }
        output.push('\n');
    }

    if key.len() > 1 {
        output.push_str(&format!("    primary_key({})\n", quote_all(key)));
    }
}

fn serialize_attribute(output: &mut String, attr: &Attribute) {
    output.push_str(&format!(
        "    {}: {}",
        quote_path(attr.name()),
        quote(attr.data_type())
    ));
}

fn serialize_constraint(output: &mut String, constraint: &Constraint) {
    match constraint {
        Constraint::Identifier { identifier } => {
            output.push_str(&format!("    identifier({})\n", quote_all(identifier)));
        }
        Constraint::Inheritance {
            parent,
            disjoint,
            covering,
        } => {
            let disjointness = if *disjoint { "disjoint" } else { "overlapping" };
            let completeness = if *covering { "total" } else { "partial" };
            output.push_str(&format!(
                "    isa {} [{}, {}]\n",
                quote(parent),
                disjointness,
                completeness
            ));
        }
    }
}

/// Names that would not lex back as one identifier are written quoted.
fn quote(text: &str) -> String {
    if is_identifier(text) {
        text.to_string()
    } else {
        let escaped = text
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\t', "\\t");
        format!("\"{}\"", escaped)
    }
}

/// Dotted attribute names stay bare when every segment is an identifier.
fn quote_path(name: &str) -> String {
    if name.split('.').all(is_identifier) {
        name.to_string()
    } else {
        quote(name)
    }
}

fn quote_all(names: &[String]) -> String {
    names
        .iter()
        .map(|n| quote_path(n))
        .collect::<Vec<_>>()
        .join(", ")
}
