//! Grouping of composite attribute components and multi-valued type names.

use crate::model::Attribute;

/// Data type of a folded multi-valued attribute.
pub fn multi_valued_type(inner: &str) -> String {
    format!("multi({})", inner)
}

fn split_component(attr: &Attribute, sep: char) -> Option<(String, String)> {
    attr.name()
        .split_once(sep)
        .filter(|(prefix, rest)| !prefix.is_empty() && !rest.is_empty())
        .map(|(prefix, rest)| (prefix.to_string(), rest.to_string()))
}

/// Groups `prefix<sep>component` attributes into one composite attribute
/// per prefix, placed where its first component appeared.
///
/// Prefixes that collide with a plain attribute name, or with one of the
/// `reserved` names already placed on the entity, stay ungrouped.
pub fn group_composites(
    attributes: Vec<Attribute>,
    reserved: &[&str],
    separator: Option<char>,
) -> Vec<Attribute> {
    let Some(sep) = separator else {
        return attributes;
    };

    let plain: Vec<&str> = attributes
        .iter()
        .filter(|a| split_component(a, sep).is_none())
        .map(|a| a.name())
        .chain(reserved.iter().copied())
        .collect();

    // (prefix, components) in order of first appearance
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for attr in &attributes {
        if let Some((prefix, rest)) = split_component(attr, sep) {
            if plain.contains(&prefix.as_str()) {
                continue;
            }
            let component = format!("{} {}", rest, attr.data_type());
            match groups.iter_mut().find(|(p, _)| *p == prefix) {
                Some((_, components)) => components.push(component),
                None => groups.push((prefix, vec![component])),
            }
        }
    }

    let mut out = Vec::with_capacity(attributes.len());
    let mut emitted: Vec<String> = Vec::new();
    for attr in attributes.iter() {
        let grouped = split_component(attr, sep).and_then(|(prefix, _)| {
            groups
                .iter()
                .find(|(p, _)| *p == prefix)
                .map(|(p, components)| (p.clone(), components))
        });
        match grouped {
            Some((prefix, _)) if emitted.contains(&prefix) => {}
            Some((prefix, components)) => {
                out.push(Attribute::with_type(
                    prefix.clone(),
                    format!("composite({})", components.join(", ")),
                ));
                emitted.push(prefix);
            }
            None => out.push(attr.clone()),
        }
    }
    out
}
