//! Key-structure analysis: decides what every ARM entity becomes in EER.

use crate::arm::{ArmEntity, ArmModel};
use std::collections::BTreeSet;

/// Role of an ARM entity, derived from how its key relates to other keys.
/// Entity references are indices into the model's entity list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    /// Identified by its own key (or by nothing, when it has no key).
    Strong,
    /// Shares its whole key with an earlier entity, which it specializes.
    Subtype { parent: usize },
    /// Identified by the owners' keys plus a partial key of its own.
    Weak {
        owners: Vec<usize>,
        partial_key: Vec<String>,
    },
    /// Key is exactly the union of two or more owners' keys.
    Associative { owners: Vec<usize> },
    /// `owner key + one value` with nothing else: a multi-valued attribute
    /// of the owner, typed like the value.
    MultiValued {
        owner: usize,
        attribute: String,
        data_type: String,
    },
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Strong => "strong",
            EntityKind::Subtype { .. } => "subtype",
            EntityKind::Weak { .. } => "weak",
            EntityKind::Associative { .. } => "associative",
            EntityKind::MultiValued { .. } => "multi-valued",
        }
    }
}

/// Distinct primary key names of an entity.
pub fn key_set(entity: &ArmEntity) -> BTreeSet<&str> {
    entity.primary_key().iter().map(|k| k.as_str()).collect()
}

/// Earliest declared entity with the same key set as `idx`.
fn key_root(keys: &[BTreeSet<&str>], idx: usize) -> usize {
    (0..keys.len()).find(|&j| keys[j] == keys[idx]).unwrap_or(idx)
}

/// Maximal entities whose key is a strict subset of the key of `idx`.
fn find_owners(keys: &[BTreeSet<&str>], idx: usize) -> Vec<usize> {
    let key = &keys[idx];
    let candidates: Vec<usize> = (0..keys.len())
        .filter(|&j| j != idx && !keys[j].is_empty())
        .filter(|&j| keys[j].len() < key.len() && keys[j].is_subset(key))
        .filter(|&j| key_root(keys, j) == j)
        .collect();

    // Candidates are key roots, so equal key sets never meet here.
    candidates
        .iter()
        .copied()
        .filter(|&j| {
            !candidates
                .iter()
                .any(|&other| other != j && keys[j].is_subset(&keys[other]))
        })
        .collect()
}

enum Draft {
    Strong,
    Subtype(usize),
    Owned {
        owners: Vec<usize>,
        partial_key: Vec<String>,
    },
}

/// Classify every entity of `model`, in model order.
pub fn classify(model: &ArmModel, fold_multivalued: bool) -> Vec<EntityKind> {
    let entities = model.entities();
    let keys: Vec<BTreeSet<&str>> = entities.iter().map(key_set).collect();

    let drafts: Vec<Draft> = (0..entities.len())
        .map(|idx| {
            if keys[idx].is_empty() {
                return Draft::Strong;
            }
            let root = key_root(&keys, idx);
            if root != idx {
                return Draft::Subtype(root);
            }
            let owners = find_owners(&keys, idx);
            if owners.is_empty() {
                return Draft::Strong;
            }
            let covered: BTreeSet<&str> = owners
                .iter()
                .flat_map(|&o| keys[o].iter().copied())
                .collect();
            let mut partial_key: Vec<String> = Vec::new();
            for k in entities[idx].primary_key() {
                if !covered.contains(k.as_str()) && !partial_key.contains(k) {
                    partial_key.push(k.clone());
                }
            }
            Draft::Owned {
                owners,
                partial_key,
            }
        })
        .collect();

    let mut referenced = vec![false; entities.len()];
    for draft in &drafts {
        match draft {
            Draft::Strong => {}
            Draft::Subtype(parent) => referenced[*parent] = true,
            Draft::Owned { owners, .. } => {
                for &o in owners {
                    referenced[o] = true;
                }
            }
        }
    }

    // Names each owner already carries, plus what has been folded into it.
    let mut taken: Vec<Vec<&str>> = entities
        .iter()
        .map(|e| e.attributes().iter().map(|a| a.name()).collect())
        .collect();

    let mut kinds = Vec::with_capacity(entities.len());
    for (idx, draft) in drafts.into_iter().enumerate() {
        let kind = match draft {
            Draft::Strong => EntityKind::Strong,
            Draft::Subtype(parent) => EntityKind::Subtype { parent },
            Draft::Owned {
                owners,
                partial_key,
            } => {
                let entity = &entities[idx];
                let foldable = fold_multivalued
                    && entity.non_key_attributes().next().is_none()
                    && !referenced[idx]
                    && owners.len() == 1
                    && partial_key.len() == 1
                    && !taken[owners[0]].contains(&partial_key[0].as_str());
                if foldable {
                    let owner = owners[0];
                    let value = entity
                        .attributes()
                        .iter()
                        .find(|a| a.name() == partial_key[0]);
                    match value {
                        Some(value) => {
                            taken[owner].push(value.name());
                            EntityKind::MultiValued {
                                owner,
                                attribute: value.name().to_string(),
                                data_type: value.data_type().to_string(),
                            }
                        }
                        None => EntityKind::Weak {
                            owners,
                            partial_key,
                        },
                    }
                } else if partial_key.is_empty() {
                    EntityKind::Associative { owners }
                } else {
                    EntityKind::Weak {
                        owners,
                        partial_key,
                    }
                }
            }
        };
        kinds.push(kind);
    }
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attribute;

    fn entity(name: &str, keys: &[&str], others: &[&str]) -> ArmEntity {
        let mut e = ArmEntity::new(name);
        for k in keys {
            e.add_attribute(Attribute::new(*k)).unwrap();
            e.add_primary_key(*k).unwrap();
        }
        for a in others {
            e.add_attribute(Attribute::new(*a)).unwrap();
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

    #[test]
    fn test_strong_entities() {
        let m = model(vec![
            entity("Movie", &["MovieID"], &["Name"]),
            entity("Log", &[], &["Line"]),
        ]);
        assert_eq!(classify(&m, true), vec![EntityKind::Strong, EntityKind::Strong]);
    }

    #[test]
    fn test_subtype_points_at_earliest_entity() {
        let m = model(vec![
            entity("Person", &["PersonID"], &["Name"]),
            entity("Actor", &["PersonID"], &["Agent"]),
            entity("Director", &["PersonID"], &["Style"]),
        ]);
        assert_eq!(
            classify(&m, true),
            vec![
                EntityKind::Strong,
                EntityKind::Subtype { parent: 0 },
                EntityKind::Subtype { parent: 0 },
            ]
        );
    }

    #[test]
    fn test_weak_entity() {
        let m = model(vec![
            entity("Series", &["SeriesID"], &["Title"]),
            entity("Episode", &["SeriesID", "EpisodeNo"], &["Aired"]),
        ]);
        assert_eq!(
            classify(&m, true)[1],
            EntityKind::Weak {
                owners: vec![0],
                partial_key: vec!["EpisodeNo".into()],
            }
        );
    }

    #[test]
    fn test_associative_entity() {
        let m = model(vec![
            entity("Movie", &["MovieID"], &[]),
            entity("Cast", &["ActorID", "MovieID"], &["Role"]),
            entity("Actor", &["ActorID"], &[]),
        ]);
        assert_eq!(
            classify(&m, true)[1],
            EntityKind::Associative {
                owners: vec![0, 2]
            }
        );
    }

    #[test]
    fn test_multivalued_attribute() {
        let m = model(vec![
            entity("Movie", &["MovieID"], &["Name"]),
            entity("MovieGenre", &["MovieID", "Genre"], &[]),
        ]);
        assert_eq!(
            classify(&m, true)[1],
            EntityKind::MultiValued {
                owner: 0,
                attribute: "Genre".into(),
                data_type: "anyType".into(),
            }
        );
        assert_eq!(
            classify(&m, false)[1],
            EntityKind::Weak {
                owners: vec![0],
                partial_key: vec!["Genre".into()],
            }
        );
    }

    #[test]
    fn test_referenced_relation_is_not_folded() {
        let m = model(vec![
            entity("Movie", &["MovieID"], &[]),
            entity("MovieGenre", &["MovieID", "Genre"], &[]),
            entity("GenreVote", &["MovieID", "Genre", "UserID"], &["Score"]),
        ]);
        let kinds = classify(&m, true);
        assert_eq!(kinds[1].label(), "weak");
        assert_eq!(
            kinds[2],
            EntityKind::Weak {
                owners: vec![1],
                partial_key: vec!["UserID".into()],
            }
        );
    }

    #[test]
    fn test_owner_subsumed_by_larger_owner() {
        let m = model(vec![
            entity("Series", &["SeriesID"], &[]),
            entity("Season", &["SeriesID", "SeasonNo"], &["Year"]),
            entity("Episode", &["SeriesID", "SeasonNo", "EpisodeNo"], &["Title"]),
        ]);
        assert_eq!(
            classify(&m, true)[2],
            EntityKind::Weak {
                owners: vec![1],
                partial_key: vec!["EpisodeNo".into()],
            }
        );
    }

    #[test]
    fn test_folding_never_shadows_owner_attribute() {
        let m = model(vec![
            entity("Movie", &["MovieID"], &["Genre"]),
            entity("MovieGenre", &["MovieID", "Genre"], &[]),
            entity("MovieLanguage", &["MovieID", "Language"], &[]),
        ]);
        let kinds = classify(&m, true);
        assert_eq!(
            kinds[1],
            EntityKind::Weak {
                owners: vec![0],
                partial_key: vec!["Genre".into()],
            }
        );
        assert_eq!(kinds[2].label(), "multi-valued");
    }
}
