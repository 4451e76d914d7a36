//! ARM (Attribute Relationship Model): the transformation input.

use crate::error::ModelError;
use crate::model::Entity;
use std::fmt;

pub type ArmEntity = Entity;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArmModel {
    entities: Vec<ArmEntity>,
}

impl ArmModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entity; names must be unique within the model.
    pub fn add_arm_entity(&mut self, entity: ArmEntity) -> Result<(), ModelError> {
        if self.entity(entity.name()).is_some() {
            return Err(ModelError::DuplicateEntity(entity.name().to_string()));
        }
        self.entities.push(entity);
        Ok(())
    }

    pub fn entities(&self) -> &[ArmEntity] {
        &self.entities
    }

    pub fn entity(&self, name: &str) -> Option<&ArmEntity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl fmt::Display for ArmModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = "ARM Model:";
        writeln!(f, "{}", header)?;
        writeln!(f, "{}", "-".repeat(header.len()))?;
        let lines: Vec<String> = self.entities.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", lines.join("\n"))
    }
}
