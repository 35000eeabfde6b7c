//! Type families
//!
//! A family owns a group of related descriptors and answers aggregation
//! questions the explicit tables leave open. Each family supplies up to four
//! fallback rules; a missing rule means the family has no opinion.

use crate::descriptor::TypeId;
use crate::registry::TypeRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Stable index of a family in its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(u32);

impl FamilyId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

/// Fallback rule: given two operand types, the aggregated type or no opinion
pub type AggregateFn = Arc<dyn Fn(&TypeRegistry, TypeId, TypeId) -> Option<TypeId> + Send + Sync>;

/// Which of a family's four fallbacks applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackKind {
    Result,
    Comparison,
    MinMax,
    NumOp,
}

/// A family of related types and its fallback rules
#[derive(Clone)]
pub struct TypeFamily {
    pub(crate) id: FamilyId,
    name: String,
    result: Option<AggregateFn>,
    comparison: Option<AggregateFn>,
    min_max: Option<AggregateFn>,
    num_op: Option<AggregateFn>,
    /// Alias name to canonical type name, both lowercase
    aliases: IndexMap<String, String>,
}

impl TypeFamily {
    /// Create a family with no rules; the registry assigns its id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FamilyId::from_index(0),
            name: name.into().to_ascii_lowercase(),
            result: None,
            comparison: None,
            min_max: None,
            num_op: None,
            aliases: IndexMap::new(),
        }
    }

    pub fn with_result<F>(mut self, rule: F) -> Self
    where
        F: Fn(&TypeRegistry, TypeId, TypeId) -> Option<TypeId> + Send + Sync + 'static,
    {
        self.result = Some(Arc::new(rule));
        self
    }

    pub fn with_comparison<F>(mut self, rule: F) -> Self
    where
        F: Fn(&TypeRegistry, TypeId, TypeId) -> Option<TypeId> + Send + Sync + 'static,
    {
        self.comparison = Some(Arc::new(rule));
        self
    }

    pub fn with_min_max<F>(mut self, rule: F) -> Self
    where
        F: Fn(&TypeRegistry, TypeId, TypeId) -> Option<TypeId> + Send + Sync + 'static,
    {
        self.min_max = Some(Arc::new(rule));
        self
    }

    pub fn with_num_op<F>(mut self, rule: F) -> Self
    where
        F: Fn(&TypeRegistry, TypeId, TypeId) -> Option<TypeId> + Send + Sync + 'static,
    {
        self.num_op = Some(Arc::new(rule));
        self
    }

    /// Make `alias` resolve to the type named `target`
    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(
            alias.into().to_ascii_lowercase(),
            target.into().to_ascii_lowercase(),
        );
        self
    }

    pub fn id(&self) -> FamilyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(alias, target)| (alias.as_str(), target.as_str()))
    }

    pub(crate) fn resolve_alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn rule(&self, kind: FallbackKind) -> Option<&AggregateFn> {
        match kind {
            FallbackKind::Result => self.result.as_ref(),
            FallbackKind::Comparison => self.comparison.as_ref(),
            FallbackKind::MinMax => self.min_max.as_ref(),
            FallbackKind::NumOp => self.num_op.as_ref(),
        }
    }

    /// Run the fallback of `kind`; `None` when the family has no such rule or no opinion
    pub fn apply(&self, kind: FallbackKind, registry: &TypeRegistry, left: TypeId, right: TypeId) -> Option<TypeId> {
        self.rule(kind).and_then(|rule| rule(registry, left, right))
    }
}

impl fmt::Debug for TypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeFamily")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("result", &self.result.is_some())
            .field("comparison", &self.comparison.is_some())
            .field("min_max", &self.min_max.is_some())
            .field("num_op", &self.num_op.is_some())
            .field("aliases", &self.aliases)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_without_rules_has_no_opinion() {
        let family = TypeFamily::new("Row");
        assert_eq!(family.name(), "row");
        assert!(family.rule(FallbackKind::Result).is_none());
        let registry = TypeRegistry::builtin();
        assert_eq!(
            family.apply(FallbackKind::NumOp, &registry, TypeId::from_index(2), TypeId::from_index(3)),
            None
        );
    }

    #[test]
    fn test_aliases_are_lowercase() {
        let family = TypeFamily::new("numeric").with_alias("INTEGER", "Int");
        assert_eq!(family.resolve_alias("integer"), Some("int"));
        assert_eq!(family.aliases().count(), 1);
    }
}
