//! The type registry
//!
//! A [`TypeRegistryBuilder`] collects families, descriptors and explicit
//! aggregation entries, then freezes them into an immutable
//! [`TypeRegistry`] shared as `Arc<TypeRegistry>`. The built-in types are
//! always registered first, so their ids are fixed (see
//! [`BuiltinType::id`]).
//!
//! One snapshot is published process-wide; [`install`] swaps it and
//! [`global`] hands out clones.

use crate::aggregation::{AggregationContext, AggregationPurpose, AggregationSource};
use crate::builtin;
use crate::descriptor::{
    BuiltinType, Capabilities, ExternalBehavior, ProtocolKind, ResultCategory, TypeDescriptor, TypeId, TypeKind,
};
use crate::family::{FamilyId, TypeFamily};
use crate::hybrid::HybridTypeSlot;
use crate::{inet6, timestamp_tz};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use sqlscalar_diagnostics::{Result, ScalarError};
use std::fmt;
use std::sync::Arc;

/// Lowercase with single spaces: `"BIGINT  Unsigned"` -> `"bigint unsigned"`
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

/// Immutable snapshot of every registered type
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
    by_name: IndexMap<String, TypeId>,
    families: Vec<TypeFamily>,
    family_by_name: IndexMap<String, FamilyId>,
    context: AggregationContext,
}

impl TypeRegistry {
    fn empty() -> Self {
        Self {
            types: Vec::new(),
            by_name: IndexMap::new(),
            families: Vec::new(),
            family_by_name: IndexMap::new(),
            context: AggregationContext::new(),
        }
    }

    /// Builder preloaded with the built-in families, types and tables
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Registry with only the built-in types
    pub fn builtin() -> Arc<Self> {
        Self::builder().build()
    }

    /// Built-in types plus the bundled INET6 and TIMESTAMP WITH TIME ZONE
    pub fn with_extensions() -> Result<Arc<Self>> {
        let mut builder = Self::builder();
        inet6::register(&mut builder)?;
        timestamp_tz::register(&mut builder)?;
        Ok(builder.build())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolve a type name or alias, ignoring case
    pub fn lookup(&self, name: &str) -> Result<TypeRef<'_>> {
        self.id_of(name)
            .map(|id| TypeRef { registry: self, id })
            .ok_or_else(|| ScalarError::unknown_type(name))
    }

    pub fn id_of(&self, name: &str) -> Option<TypeId> {
        let name = normalize_name(name);
        if let Some(id) = self.by_name.get(&name) {
            return Some(*id);
        }
        self.families
            .iter()
            .find_map(|family| family.resolve_alias(&name))
            .and_then(|target| self.by_name.get(target).copied())
    }

    pub fn get(&self, id: TypeId) -> Option<TypeRef<'_>> {
        (id.index() < self.types.len()).then_some(TypeRef { registry: self, id })
    }

    pub fn builtin_ref(&self, ty: BuiltinType) -> TypeRef<'_> {
        TypeRef {
            registry: self,
            id: ty.id(),
        }
    }

    pub fn descriptor(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.types.get(id.index())
    }

    /// Built-in kind of a registered type
    pub fn builtin_of(&self, id: TypeId) -> Option<BuiltinType> {
        self.descriptor(id).and_then(TypeDescriptor::builtin)
    }

    pub fn family(&self, id: FamilyId) -> Option<&TypeFamily> {
        self.families.get(id.index())
    }

    pub fn family_named(&self, name: &str) -> Result<&TypeFamily> {
        self.family_by_name
            .get(&normalize_name(name))
            .and_then(|id| self.family(*id))
            .ok_or_else(|| ScalarError::UnknownFamily { name: name.to_string() })
    }

    pub fn types(&self) -> impl Iterator<Item = TypeRef<'_>> {
        (0..self.types.len()).map(move |index| TypeRef {
            registry: self,
            id: TypeId::from_index(index),
        })
    }

    pub fn families(&self) -> impl Iterator<Item = &TypeFamily> {
        self.families.iter()
    }

    pub fn context(&self) -> &AggregationContext {
        &self.context
    }

    /// Aggregate two operand types for a purpose
    ///
    /// Identity, then the purpose's table, then the left operand's family,
    /// then the right operand's family. `IncompatibleTypes` when nothing
    /// answers.
    pub fn aggregate(&self, purpose: AggregationPurpose, left: TypeId, right: TypeId) -> Result<TypeId> {
        self.aggregate_with_source(purpose, left, right).map(|(id, _)| id)
    }

    /// Like [`aggregate`](Self::aggregate), also reporting which step answered
    pub fn aggregate_with_source(
        &self,
        purpose: AggregationPurpose,
        left: TypeId,
        right: TypeId,
    ) -> Result<(TypeId, AggregationSource)> {
        let left_desc = self.known(left)?;
        let right_desc = self.known(right)?;

        let answer = if left == right {
            Some((left, AggregationSource::Identity))
        } else if let Some(id) = self.context.find(purpose, left, right) {
            Some((id, AggregationSource::Table))
        } else {
            let kind = purpose.fallback();
            let from_left = self
                .family(left_desc.family)
                .and_then(|family| family.apply(kind, self, left, right))
                .map(|id| (id, AggregationSource::LeftFamily));
            from_left.or_else(|| {
                if left_desc.family == right_desc.family {
                    return None;
                }
                self.family(right_desc.family)
                    .and_then(|family| family.apply(kind, self, left, right))
                    .map(|id| (id, AggregationSource::RightFamily))
            })
        };

        match answer {
            Some((id, source)) => {
                log::trace!(
                    "{purpose}({}, {}) -> {} via {source}",
                    left_desc.name,
                    right_desc.name,
                    self.name_of(id)
                );
                Ok((id, source))
            }
            None => {
                log::trace!("{purpose}({}, {}) has no answer", left_desc.name, right_desc.name);
                Err(ScalarError::incompatible(
                    purpose.operation(),
                    left_desc.name.as_str(),
                    right_desc.name.as_str(),
                ))
            }
        }
    }

    /// Aggregate two types given by name
    pub fn aggregate_names(&self, purpose: AggregationPurpose, left: &str, right: &str) -> Result<TypeRef<'_>> {
        let left = self.lookup(left)?;
        let right = self.lookup(right)?;
        let id = self.aggregate(purpose, left.id, right.id)?;
        Ok(TypeRef { registry: self, id })
    }

    /// Fold one or more operand types left to right
    pub fn fold<I>(&self, purpose: AggregationPurpose, operands: I) -> Result<TypeRef<'_>>
    where
        I: IntoIterator<Item = TypeId>,
    {
        HybridTypeSlot::fold(self, purpose, operands)
    }

    fn known(&self, id: TypeId) -> Result<&TypeDescriptor> {
        self.descriptor(id)
            .ok_or_else(|| ScalarError::unknown_type(id.to_string()))
    }

    fn name_of(&self, id: TypeId) -> &str {
        self.descriptor(id).map(TypeDescriptor::name).unwrap_or("?")
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.by_name.keys().collect::<Vec<_>>())
            .field("families", &self.family_by_name.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A descriptor together with the registry it belongs to
#[derive(Clone, Copy)]
pub struct TypeRef<'r> {
    registry: &'r TypeRegistry,
    id: TypeId,
}

impl<'r> TypeRef<'r> {
    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    pub fn descriptor(&self) -> &'r TypeDescriptor {
        &self.registry.types[self.id.index()]
    }

    pub fn name(&self) -> &'r str {
        self.descriptor().name()
    }

    pub fn family(&self) -> &'r TypeFamily {
        &self.registry.families[self.descriptor().family.index()]
    }

    pub fn builtin(&self) -> Option<BuiltinType> {
        self.descriptor().builtin()
    }

    pub fn result_category(&self) -> ResultCategory {
        self.descriptor().result_category()
    }

    pub fn comparison_category(&self) -> ResultCategory {
        self.descriptor().comparison_category()
    }

    pub fn protocol_kind(&self) -> ProtocolKind {
        self.descriptor().protocol_kind()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.descriptor().capabilities()
    }

    pub fn validate_literal(&self, literal: &str) -> Result<()> {
        self.descriptor().validate_literal(literal)
    }

    /// Whether UNION of the two types has a result type
    pub fn is_compatible_for_union(&self, other: TypeRef<'_>) -> bool {
        self.registry
            .aggregate(AggregationPurpose::Result, self.id, other.id)
            .is_ok()
    }

    pub fn aggregate_for_result(&self, other: TypeRef<'_>) -> Option<TypeRef<'r>> {
        self.fallback(crate::family::FallbackKind::Result, other)
    }

    pub fn aggregate_for_comparison(&self, other: TypeRef<'_>) -> Option<TypeRef<'r>> {
        self.fallback(crate::family::FallbackKind::Comparison, other)
    }

    pub fn aggregate_for_min_max(&self, other: TypeRef<'_>) -> Option<TypeRef<'r>> {
        self.fallback(crate::family::FallbackKind::MinMax, other)
    }

    pub fn aggregate_for_num_op(&self, other: TypeRef<'_>) -> Option<TypeRef<'r>> {
        self.fallback(crate::family::FallbackKind::NumOp, other)
    }

    fn fallback(&self, kind: crate::family::FallbackKind, other: TypeRef<'_>) -> Option<TypeRef<'r>> {
        self.family()
            .apply(kind, self.registry, self.id, other.id)
            .and_then(|id| self.registry.get(id))
    }
}

impl PartialEq for TypeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.registry, other.registry) && self.id == other.id
    }
}

impl Eq for TypeRef<'_> {}

impl fmt::Debug for TypeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({} {})", self.id, self.name())
    }
}

impl fmt::Display for TypeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Collects types and rules, then freezes them
pub struct TypeRegistryBuilder {
    inner: TypeRegistry,
}

impl Default for TypeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistryBuilder {
    /// Builder with the built-in types already registered
    pub fn new() -> Self {
        let mut builder = Self {
            inner: TypeRegistry::empty(),
        };
        builtin::register(&mut builder);
        builder
    }

    /// Register a family of externally supplied types
    pub fn add_family(&mut self, family: TypeFamily) -> Result<FamilyId> {
        if self.inner.family_by_name.contains_key(family.name()) {
            return Err(ScalarError::DuplicateFamily {
                name: family.name().to_string(),
            });
        }
        Ok(self.push_family(family))
    }

    /// Register a type in an existing family
    pub fn add_type(&mut self, name: &str, family: &str, kind: TypeKind) -> Result<TypeId> {
        let family_id = *self
            .inner
            .family_by_name
            .get(&normalize_name(family))
            .ok_or_else(|| ScalarError::UnknownFamily { name: family.to_string() })?;
        let name = normalize_name(name);
        if self.inner.id_of(&name).is_some() {
            return Err(ScalarError::DuplicateType { name });
        }
        Ok(self.push_type(&name, family_id, kind))
    }

    pub fn add_external(&mut self, name: &str, family: &str, behavior: ExternalBehavior) -> Result<TypeId> {
        self.add_type(name, family, TypeKind::External(behavior))
    }

    /// Append an explicit table entry; `Ok(false)` when an earlier entry shadows it
    pub fn add_rule(
        &mut self,
        purpose: AggregationPurpose,
        left: TypeId,
        right: TypeId,
        result: TypeId,
    ) -> Result<bool> {
        for id in [left, right, result] {
            self.inner.known(id)?;
        }
        Ok(self.push_rule(purpose, left, right, result))
    }

    pub fn add_rule_by_name(
        &mut self,
        purpose: AggregationPurpose,
        left: &str,
        right: &str,
        result: &str,
    ) -> Result<bool> {
        let resolve = |name: &str| {
            self.inner
                .id_of(name)
                .ok_or_else(|| ScalarError::unknown_type(name))
        };
        let (left, right, result) = (resolve(left)?, resolve(right)?, resolve(result)?);
        Ok(self.push_rule(purpose, left, right, result))
    }

    pub fn id_of(&self, name: &str) -> Option<TypeId> {
        self.inner.id_of(name)
    }

    /// Freeze into a shareable snapshot
    pub fn build(self) -> Arc<TypeRegistry> {
        log::debug!(
            "built type registry with {} types in {} families",
            self.inner.types.len(),
            self.inner.families.len()
        );
        Arc::new(self.inner)
    }

    pub(crate) fn push_family(&mut self, mut family: TypeFamily) -> FamilyId {
        let id = FamilyId::from_index(self.inner.families.len());
        family.id = id;
        log::debug!("registered type family '{}'", family.name());
        self.inner.family_by_name.insert(family.name().to_string(), id);
        self.inner.families.push(family);
        id
    }

    pub(crate) fn push_type(&mut self, name: &str, family: FamilyId, kind: TypeKind) -> TypeId {
        let id = TypeId::from_index(self.inner.types.len());
        log::debug!("registered type '{name}' as {id}");
        self.inner.by_name.insert(name.to_string(), id);
        self.inner.types.push(TypeDescriptor {
            id,
            name: name.to_string(),
            family,
            kind,
        });
        id
    }

    pub(crate) fn push_rule(&mut self, purpose: AggregationPurpose, left: TypeId, right: TypeId, result: TypeId) -> bool {
        self.inner.context.table_mut(purpose).add(left, right, result)
    }
}

static GLOBAL: Lazy<RwLock<Arc<TypeRegistry>>> = Lazy::new(|| RwLock::new(TypeRegistry::builtin()));

/// The published registry snapshot
pub fn global() -> Arc<TypeRegistry> {
    GLOBAL.read().clone()
}

/// Publish a new snapshot, returning the previous one
pub fn install(registry: Arc<TypeRegistry>) -> Arc<TypeRegistry> {
    log::debug!("installing type registry with {} types", registry.len());
    std::mem::replace(&mut *GLOBAL.write(), registry)
}
