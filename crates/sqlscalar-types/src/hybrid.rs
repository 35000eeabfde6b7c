//! Folding many operand types into one

use crate::aggregation::AggregationPurpose;
use crate::descriptor::TypeId;
use crate::registry::{TypeRef, TypeRegistry};
use smallvec::SmallVec;
use sqlscalar_diagnostics::{Result, ScalarError};

/// Running aggregate of operand types for one purpose
///
/// Starts empty; the first operand becomes the current type and every
/// further operand is aggregated into it. The first failed step poisons the
/// slot: it is returned again by every later [`push`](Self::push) and by
/// [`finish`](Self::finish), and no partial result is exposed.
#[derive(Debug, Clone)]
pub struct HybridTypeSlot<'r> {
    registry: &'r TypeRegistry,
    purpose: AggregationPurpose,
    current: Option<TypeId>,
    operands: SmallVec<[TypeId; 4]>,
    failed: Option<ScalarError>,
}

impl<'r> HybridTypeSlot<'r> {
    pub fn new(registry: &'r TypeRegistry, purpose: AggregationPurpose) -> Self {
        Self {
            registry,
            purpose,
            current: None,
            operands: SmallVec::new(),
            failed: None,
        }
    }

    /// Fold `operands` left to right, stopping at the first failure
    pub fn fold<I>(registry: &'r TypeRegistry, purpose: AggregationPurpose, operands: I) -> Result<TypeRef<'r>>
    where
        I: IntoIterator<Item = TypeId>,
    {
        let mut slot = Self::new(registry, purpose);
        for id in operands {
            slot.push(id)?;
        }
        slot.finish()
    }

    pub fn purpose(&self) -> AggregationPurpose {
        self.purpose
    }

    /// Operands accepted so far
    pub fn operands(&self) -> &[TypeId] {
        &self.operands
    }

    /// The type aggregated so far; `None` when empty or failed
    pub fn current(&self) -> Option<TypeRef<'r>> {
        if self.failed.is_some() {
            return None;
        }
        self.current.and_then(|id| self.registry.get(id))
    }

    /// The first failure, if any
    pub fn error(&self) -> Option<&ScalarError> {
        self.failed.as_ref()
    }

    /// Aggregate one more operand into the current type
    pub fn push(&mut self, id: TypeId) -> Result<TypeId> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        let next = match self.current {
            None => self
                .registry
                .get(id)
                .map(|ty| ty.id())
                .ok_or_else(|| ScalarError::unknown_type(id.to_string())),
            Some(current) => self.registry.aggregate(self.purpose, current, id),
        };
        match next {
            Ok(next) => {
                self.current = Some(next);
                self.operands.push(id);
                Ok(next)
            }
            Err(err) => {
                self.failed = Some(err.clone());
                Err(err)
            }
        }
    }

    /// The aggregated type
    ///
    /// Fails with the first step's error, or when no operand was pushed.
    pub fn finish(self) -> Result<TypeRef<'r>> {
        if let Some(err) = self.failed {
            return Err(err);
        }
        self.current().ok_or_else(|| ScalarError::EmptyOperands {
            operation: self.purpose.operation().to_string(),
        })
    }
}
