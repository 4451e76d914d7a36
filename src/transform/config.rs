//! Tunable heuristics for the ARM to EER transformation.

/// Knobs for the judgements the key structure alone cannot settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    /// Disjoint flag given to every derived inheritance constraint.
    pub disjoint_subtypes: bool,
    /// Mark specializations of a supertype that declares nothing besides
    /// its key as covering.
    pub covering_abstract_supertypes: bool,
    /// Fold `owner key + one value` relations into a multi-valued
    /// attribute of the owner instead of emitting a weak entity.
    pub fold_multivalued: bool,
    /// Separator marking composite attribute components (`Address.Street`).
    /// `None` keeps such attributes as they are.
    pub composite_separator: Option<char>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            disjoint_subtypes: true,
            covering_abstract_supertypes: true,
            fold_multivalued: true,
            composite_separator: Some('.'),
        }
    }
}
