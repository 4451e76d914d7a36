//! Transformer core: classify ARM entities, then emit EER entities.

use crate::arm::{ArmEntity, ArmModel};
use crate::eer::{Constraint, EerEntity, EerModel};
use crate::error::ModelError;
use crate::model::Attribute;
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::analysis::{EntityKind, classify, key_set};
use super::composite::{group_composites, multi_valued_type};
use super::config::TransformConfig;

/// ARM to EER transformer. A pure function of its input and configuration.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    pub(crate) config: TransformConfig,
}

impl Transformer {
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Transform the whole model. Fails on the first construction error,
    /// never returning a partial EER model.
    pub fn transform(&self, arm: &ArmModel) -> Result<EerModel, ModelError> {
        let entities = arm.entities();

        // Phase 1: key-structure classification
        let kinds = classify(arm, self.config.fold_multivalued);

        // Phase 2: multi-valued attributes collected per owner
        let mut folded: Vec<Vec<Attribute>> = vec![Vec::new(); entities.len()];
        for kind in &kinds {
            if let EntityKind::MultiValued {
                owner,
                attribute,
                data_type,
            } = kind
            {
                folded[*owner].push(Attribute::with_type(
                    attribute.clone(),
                    multi_valued_type(data_type),
                ));
            }
        }

        // Phase 3: emission in model order
        let mut eer = EerModel::new();
        for (idx, (entity, kind)) in entities.iter().zip(&kinds).enumerate() {
            debug!(entity = entity.name(), kind = kind.label(), "classified");
            let shape = match kind {
                EntityKind::Strong => Shape::Strong,
                EntityKind::Subtype { parent } => Shape::Subtype(*parent),
                EntityKind::Weak {
                    owners,
                    partial_key,
                } => Shape::Owned {
                    owners,
                    partial_key,
                },
                EntityKind::Associative { owners } => Shape::Owned {
                    owners,
                    partial_key: &[],
                },
                EntityKind::MultiValued { .. } => continue,
            };
            let out = self.emit(arm, entity, shape, std::mem::take(&mut folded[idx]))?;
            eer.add_eer_entity(out)?;
        }

        info!(
            arm_entities = arm.len(),
            eer_entities = eer.len(),
            "transformed ARM model"
        );
        Ok(eer)
    }

    fn emit(
        &self,
        arm: &ArmModel,
        entity: &ArmEntity,
        shape: Shape<'_>,
        multi_valued: Vec<Attribute>,
    ) -> Result<EerEntity, ModelError> {
        let entities = arm.entities();
        let own_keys = key_set(entity);

        // Key attributes carried over from owners or the parent.
        let inherited: BTreeSet<&str> = match shape {
            Shape::Strong => BTreeSet::new(),
            Shape::Subtype(_) => own_keys.clone(),
            Shape::Owned { owners, .. } => owners
                .iter()
                .flat_map(|&o| entities[o].primary_key().iter().map(|k| k.as_str()))
                .collect(),
        };

        let key: Vec<&str> = match shape {
            Shape::Strong => dedup(entity.primary_key().iter().map(|k| k.as_str())),
            Shape::Subtype(_) => Vec::new(),
            Shape::Owned { partial_key, .. } => partial_key.iter().map(|k| k.as_str()).collect(),
        };

        let mut out = EerEntity::new(entity.name());

        let (key_attrs, other_attrs): (Vec<&Attribute>, Vec<&Attribute>) = entity
            .attributes()
            .iter()
            .filter(|a| !inherited.contains(a.name()))
            .partition(|a| own_keys.contains(a.name()));
        let placed: Vec<&str> = key_attrs.iter().map(|a| a.name()).collect();
        for attr in &key_attrs {
            out.add_attribute((*attr).clone())?;
        }
        let others: Vec<Attribute> = other_attrs.into_iter().cloned().chain(multi_valued).collect();
        for attr in group_composites(others, &placed, self.config.composite_separator) {
            out.add_attribute(attr)?;
        }
        for k in &key {
            out.add_primary_key(*k)?;
        }

        match shape {
            Shape::Strong => {
                if !key.is_empty() {
                    out.add_constraint(Constraint::identifier(key.iter().copied()));
                }
            }
            Shape::Subtype(parent) => {
                let parent = &entities[parent];
                let covering = self.config.covering_abstract_supertypes
                    && parent.non_key_attributes().next().is_none();
                out.add_constraint(Constraint::inheritance(
                    parent.name(),
                    self.config.disjoint_subtypes,
                    covering,
                ));
            }
            Shape::Owned {
                owners,
                partial_key,
            } => {
                let identifier = owners
                    .iter()
                    .map(|&o| entities[o].name().to_string())
                    .chain(partial_key.iter().cloned());
                out.add_constraint(Constraint::identifier(identifier));
            }
        }

        Ok(out)
    }
}

/// What an emitted entity looks like. Weak and associative entities share
/// one shape; an associative entity just has no partial key.
#[derive(Clone, Copy)]
enum Shape<'k> {
    Strong,
    Subtype(usize),
    Owned {
        owners: &'k [usize],
        partial_key: &'k [String],
    },
}

fn dedup<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entity(name: &str, keys: &[&str], others: &[(&str, &str)]) -> ArmEntity {
        let mut e = ArmEntity::new(name);
        for k in keys {
            e.add_attribute(Attribute::new(*k)).unwrap();
            e.add_primary_key(*k).unwrap();
        }
        for (a, t) in others {
            e.add_attribute(Attribute::with_type(*a, *t)).unwrap();
        }
        e
    }

    fn model(entities: Vec<ArmEntity>) -> ArmModel {
        let mut m = ArmModel::new();
        for e in entities {
            m.add_arm_entity(e).unwrap();
        }
        m
    }

    fn movie_db() -> ArmModel {
        model(vec![
            entity("Person", &["PersonID"], &[]),
            entity("Actor", &["PersonID"], &[("Agent", "string")]),
            entity("Movie", &["MovieID"], &[("Name", "string"), ("Director", "anyType")]),
            entity("MovieGenre", &["MovieID", "Genre"], &[]),
            entity("Cast", &["PersonID", "MovieID"], &[("Role", "string")]),
            entity("Scene", &["MovieID", "SceneNo"], &[("Location.City", "string"), ("Location.Studio", "string")]),
        ])
    }

    #[test]
    fn test_strong_entity() {
        let m = model(vec![entity("Movie", &["MovieID"], &[("Name", "string")])]);
        let eer = Transformer::default().transform(&m).unwrap();
        let movie = eer.entity("Movie").unwrap();
        assert_eq!(movie.to_string(), "Movie(__MovieID__ (anyType), Name (string))\n    Identifier: ['MovieID']");
    }

    #[test]
    fn test_movie_database() {
        let eer = Transformer::default().transform(&movie_db()).unwrap();
        let expected = "EER Model:\n\
                        ----------\n\
                        Person(__PersonID__ (anyType))\n    \
                        Identifier: ['PersonID']\n\
                        Actor(Agent (string))\n    \
                        Inheritance Constraint: [parent = Person] [disjoint = True] [covering = True]\n\
                        Movie(__MovieID__ (anyType), Name (string), Director (anyType), Genre (multi(anyType)))\n    \
                        Identifier: ['MovieID']\n\
                        Cast(Role (string))\n    \
                        Identifier: ['Person', 'Movie']\n\
                        Scene(__SceneNo__ (anyType), Location (composite(City string, Studio string)))\n    \
                        Identifier: ['Movie', 'SceneNo']";
        assert_eq!(eer.to_string(), expected);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let arm = movie_db();
        let transformer = Transformer::default();
        assert_eq!(
            transformer.transform(&arm).unwrap(),
            transformer.transform(&arm).unwrap()
        );
    }

    #[test]
    fn test_concrete_supertype_is_not_covering() {
        let m = model(vec![
            entity("Person", &["PersonID"], &[("Name", "string")]),
            entity("Actor", &["PersonID"], &[]),
        ]);
        let eer = Transformer::default().transform(&m).unwrap();
        assert_eq!(
            eer.entity("Actor").unwrap().constraints(),
            [Constraint::inheritance("Person", true, false)]
        );
    }

    #[test]
    fn test_config_controls_flags() {
        let m = model(vec![
            entity("Person", &["PersonID"], &[]),
            entity("Actor", &["PersonID"], &[]),
        ]);
        let config = TransformConfig {
            disjoint_subtypes: false,
            covering_abstract_supertypes: false,
            ..TransformConfig::default()
        };
        let eer = Transformer::new(config).transform(&m).unwrap();
        assert_eq!(
            eer.entity("Actor").unwrap().constraints(),
            [Constraint::inheritance("Person", false, false)]
        );
    }

    #[test]
    fn test_multivalued_kept_as_weak_entity() {
        let config = TransformConfig {
            fold_multivalued: false,
            ..TransformConfig::default()
        };
        let eer = Transformer::new(config).transform(&movie_db()).unwrap();
        let genre = eer.entity("MovieGenre").unwrap();
        assert_eq!(genre.primary_key(), ["Genre"]);
        assert_eq!(genre.identifier(), Some(&["Movie".to_string(), "Genre".to_string()][..]));
        assert_eq!(eer.entity("Movie").unwrap().attributes().len(), 3);
    }

    #[test]
    fn test_multivalued_type_follows_value_attribute() {
        let m = model(vec![
            entity("Movie", &["MovieID"], &[]),
            entity("MovieLanguage", &["MovieID"], &[]),
        ]);
        // identical keys: specialization, not a multi-valued attribute
        let eer = Transformer::default().transform(&m).unwrap();
        assert_eq!(eer.len(), 2);

        let mut tags = ArmEntity::new("MovieTag");
        tags.add_attribute(Attribute::new("MovieID")).unwrap();
        tags.add_attribute(Attribute::with_type("Tag", "string")).unwrap();
        tags.add_primary_key("MovieID").unwrap();
        tags.add_primary_key("Tag").unwrap();
        let m = model(vec![entity("Movie", &["MovieID"], &[]), tags]);
        let eer = Transformer::default().transform(&m).unwrap();
        assert_eq!(eer.len(), 1);
        assert_eq!(
            eer.entity("Movie").unwrap().to_string(),
            "Movie(__MovieID__ (anyType), Tag (multi(string)))\n    Identifier: ['MovieID']"
        );
    }

    #[test]
    fn test_duplicate_key_entries_collapse() {
        let mut e = entity("Movie", &["MovieID"], &[]);
        e.add_primary_key("MovieID").unwrap();
        let eer = Transformer::default().transform(&model(vec![e])).unwrap();
        assert_eq!(eer.entity("Movie").unwrap().primary_key(), ["MovieID"]);
    }

    #[test]
    fn test_keyless_entity() {
        let m = model(vec![entity("Log", &[], &[("Line", "string")])]);
        let eer = Transformer::default().transform(&m).unwrap();
        let log = eer.entity("Log").unwrap();
        assert!(log.constraints().is_empty());
        assert_eq!(log.to_string(), "Log(Line (string))");
    }

    #[test]
    fn test_value_named_like_owner_attribute_stays_weak() {
        let m = model(vec![
            entity("Movie", &["MovieID"], &[("Genre", "string")]),
            entity("MovieGenre", &["MovieID", "Genre"], &[]),
        ]);
        let eer = Transformer::default().transform(&m).unwrap();
        assert_eq!(
            eer.entity("Movie").unwrap().to_string(),
            "Movie(__MovieID__ (anyType), Genre (string))\n    Identifier: ['MovieID']"
        );
        assert_eq!(
            eer.entity("MovieGenre").unwrap().to_string(),
            "MovieGenre(__Genre__ (anyType))\n    Identifier: ['Movie', 'Genre']"
        );
    }

    #[test]
    fn test_component_prefix_taken_by_key() {
        let m = model(vec![entity(
            "Site",
            &["Address"],
            &[("Address.City", "string"), ("Address.Zip", "string")],
        )]);
        let eer = Transformer::default().transform(&m).unwrap();
        assert_eq!(
            eer.entity("Site").unwrap().to_string(),
            "Site(__Address__ (anyType), Address.City (string), Address.Zip (string))\n    \
             Identifier: ['Address']"
        );
    }
}
