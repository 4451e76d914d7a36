//! Attribute and entity shapes shared by ARM and EER models.

use crate::error::ModelError;
use std::fmt;

/// Data type given to attributes declared without one.
pub const DEFAULT_DATA_TYPE: &str = "anyType";

/// A named, typed field of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    data_type: String,
}

impl Attribute {
    /// Attribute typed as [`DEFAULT_DATA_TYPE`].
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_type(name, DEFAULT_DATA_TYPE)
    }

    pub fn with_type(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)
    }
}

/// A relation: ordered attributes plus the names forming its primary key.
///
/// Every primary key entry names an attribute that was added earlier, so
/// attributes must be added before they can be marked as key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    name: String,
    attributes: Vec<Attribute>,
    primary_key: Vec<String>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            primary_key: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn is_key(&self, name: &str) -> bool {
        self.primary_key.iter().any(|k| k == name)
    }

    /// Attributes that are not part of the primary key, in declaration order.
    pub fn non_key_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| !self.is_key(&a.name))
    }

    pub fn add_attribute(&mut self, attribute: Attribute) -> Result<(), ModelError> {
        if self.attribute(&attribute.name).is_some() {
            return Err(ModelError::DuplicateAttribute {
                entity: self.name.clone(),
                attribute: attribute.name,
            });
        }
        self.attributes.push(attribute);
        Ok(())
    }

    /// Marks an existing attribute as part of the primary key.
    ///
    /// Repeated calls with the same name append repeated entries.
    pub fn add_primary_key(&mut self, name: impl Into<String>) -> Result<(), ModelError> {
        let name = name.into();
        if self.attribute(&name).is_none() {
            return Err(ModelError::ConstraintViolation {
                entity: self.name.clone(),
                attribute: name,
            });
        }
        self.primary_key.push(name);
        Ok(())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = self
            .attributes
            .iter()
            .filter(|a| self.is_key(&a.name))
            .map(|a| format!("__{}__ ({})", a.name, a.data_type));
        let others = self
            .non_key_attributes()
            .map(|a| format!("{} ({})", a.name, a.data_type));
        let parts: Vec<String> = keys.chain(others).collect();
        write!(f, "{}({})", self.name, parts.join(", "))
    }
}
