//! EER (Enhanced Entity-Relationship) model: the transformation output.

use crate::error::ModelError;
use crate::model::{Attribute, Entity};
use std::fmt;

/// Semantic annotation attached to an EER entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Names that identify the entity: its own key attributes, or the
    /// owning entities followed by its partial key.
    Identifier { identifier: Vec<String> },
    /// The entity specializes `parent`.
    Inheritance {
        parent: String,
        disjoint: bool,
        covering: bool,
    },
}

impl Constraint {
    pub fn identifier<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::Identifier {
            identifier: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn inheritance(parent: impl Into<String>, disjoint: bool, covering: bool) -> Self {
        Constraint::Inheritance {
            parent: parent.into(),
            disjoint,
            covering,
        }
    }
}

fn py_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// Quoted list element, `'name'`; double quotes when the name holds a `'`.
fn py_str(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        format!("\"{}\"", s)
    } else {
        format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Identifier { identifier } => {
                let names: Vec<String> = identifier.iter().map(|n| py_str(n)).collect();
                write!(f, "Identifier: [{}]", names.join(", "))
            }
            Constraint::Inheritance {
                parent,
                disjoint,
                covering,
            } => write!(
                f,
                "Inheritance Constraint: [parent = {}] [disjoint = {}] [covering = {}]",
                parent,
                py_bool(*disjoint),
                py_bool(*covering)
            ),
        }
    }
}

/// An entity plus the constraints derived for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EerEntity {
    entity: Entity,
    constraints: Vec<Constraint>,
}

impl EerEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            entity: Entity::new(name),
            constraints: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.entity.name()
    }

    pub fn attributes(&self) -> &[Attribute] {
        self.entity.attributes()
    }

    pub fn primary_key(&self) -> &[String] {
        self.entity.primary_key()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn add_attribute(&mut self, attribute: Attribute) -> Result<(), ModelError> {
        self.entity.add_attribute(attribute)
    }

    pub fn add_primary_key(&mut self, name: impl Into<String>) -> Result<(), ModelError> {
        self.entity.add_primary_key(name)
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn identifier(&self) -> Option<&[String]> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Identifier { identifier } => Some(identifier.as_slice()),
            Constraint::Inheritance { .. } => None,
        })
    }

    /// Parents named by inheritance constraints, in attachment order.
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().filter_map(|c| match c {
            Constraint::Inheritance { parent, .. } => Some(parent.as_str()),
            Constraint::Identifier { .. } => None,
        })
    }
}

impl fmt::Display for EerEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entity)?;
        for constraint in &self.constraints {
            write!(f, "\n    {}", constraint)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EerModel {
    entities: Vec<EerEntity>,
}

impl EerModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_eer_entity(&mut self, entity: EerEntity) -> Result<(), ModelError> {
        if self.entity(entity.name()).is_some() {
            return Err(ModelError::DuplicateEntity(entity.name().to_string()));
        }
        self.entities.push(entity);
        Ok(())
    }

    pub fn entities(&self) -> &[EerEntity] {
        &self.entities
    }

    pub fn entity(&self, name: &str) -> Option<&EerEntity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl fmt::Display for EerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = "EER Model:";
        writeln!(f, "{}", header)?;
        writeln!(f, "{}", "-".repeat(header.len()))?;
        let blocks: Vec<String> = self.entities.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", blocks.join("\n"))
    }
}
