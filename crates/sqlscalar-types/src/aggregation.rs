//! Pairwise type aggregation tables
//!
//! Each [`AggregationPurpose`] has its own [`PairAggregationTable`] of
//! explicit `(left, right) -> result` entries. Tables are consulted before
//! any family fallback, so they are where cross-family pairings live.

use crate::descriptor::TypeId;
use crate::family::FallbackKind;
use serde::{Deserialize, Serialize};
use sqlscalar_diagnostics::{ScalarError, SQL0101};
use std::fmt;
use std::str::FromStr;

/// What the aggregated type is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPurpose {
    /// Result of UNION, CASE, COALESCE and friends
    Result,
    Comparison,
    /// LEAST, GREATEST, MIN, MAX
    MinMax,
    /// Any numeric operator
    NumOp,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl AggregationPurpose {
    pub const ALL: [AggregationPurpose; 9] = [
        AggregationPurpose::Result,
        AggregationPurpose::Comparison,
        AggregationPurpose::MinMax,
        AggregationPurpose::NumOp,
        AggregationPurpose::Add,
        AggregationPurpose::Subtract,
        AggregationPurpose::Multiply,
        AggregationPurpose::Divide,
        AggregationPurpose::Modulo,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            AggregationPurpose::Result => "result",
            AggregationPurpose::Comparison => "comparison",
            AggregationPurpose::MinMax => "min_max",
            AggregationPurpose::NumOp => "num_op",
            AggregationPurpose::Add => "add",
            AggregationPurpose::Subtract => "subtract",
            AggregationPurpose::Multiply => "multiply",
            AggregationPurpose::Divide => "divide",
            AggregationPurpose::Modulo => "modulo",
        }
    }

    /// Operation name used in error messages
    pub const fn operation(self) -> &'static str {
        match self {
            AggregationPurpose::Result => "case",
            AggregationPurpose::Comparison => "=",
            AggregationPurpose::MinMax => "least",
            AggregationPurpose::NumOp => "numeric operator",
            AggregationPurpose::Add => "+",
            AggregationPurpose::Subtract => "-",
            AggregationPurpose::Multiply => "*",
            AggregationPurpose::Divide => "/",
            AggregationPurpose::Modulo => "%",
        }
    }

    /// Whether operand order is irrelevant
    pub const fn is_commutative(self) -> bool {
        !matches!(
            self,
            AggregationPurpose::Subtract | AggregationPurpose::Divide | AggregationPurpose::Modulo
        )
    }

    /// Family fallback consulted for this purpose
    pub const fn fallback(self) -> FallbackKind {
        match self {
            AggregationPurpose::Result => FallbackKind::Result,
            AggregationPurpose::Comparison => FallbackKind::Comparison,
            AggregationPurpose::MinMax => FallbackKind::MinMax,
            _ => FallbackKind::NumOp,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AggregationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregationPurpose {
    type Err = ScalarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|purpose| purpose.name() == normalized)
            .ok_or_else(|| ScalarError::Configuration {
                code: SQL0101,
                message: format!("unknown aggregation purpose '{s}'"),
            })
    }
}

/// One explicit table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairRule {
    pub left: TypeId,
    pub right: TypeId,
    pub result: TypeId,
}

/// Ordered `(left, right) -> result` entries; first match wins
#[derive(Debug, Clone, Default)]
pub struct PairAggregationTable {
    entries: Vec<PairRule>,
    commutative: bool,
}

impl PairAggregationTable {
    pub fn new(commutative: bool) -> Self {
        Self {
            entries: Vec::new(),
            commutative,
        }
    }

    pub fn is_commutative(&self) -> bool {
        self.commutative
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PairRule] {
        &self.entries
    }

    /// Append an entry; returns `false` when an earlier entry has the same ordered pair
    ///
    /// A shadowed entry is still stored but can never be returned.
    pub fn add(&mut self, left: TypeId, right: TypeId, result: TypeId) -> bool {
        let shadowed = self
            .entries
            .iter()
            .any(|rule| rule.left == left && rule.right == right);
        if shadowed {
            log::warn!("aggregation entry ({left}, {right}) -> {result} is shadowed by an earlier entry");
        }
        self.entries.push(PairRule { left, right, result });
        !shadowed
    }

    /// Exact order first, then the swapped pair when commutative
    pub fn find(&self, left: TypeId, right: TypeId) -> Option<TypeId> {
        let exact = self
            .entries
            .iter()
            .find(|rule| rule.left == left && rule.right == right);
        let found = match exact {
            Some(rule) => Some(rule),
            None if self.commutative => self
                .entries
                .iter()
                .find(|rule| rule.left == right && rule.right == left),
            None => None,
        };
        found.map(|rule| rule.result)
    }
}

/// One table per purpose; read-only once the registry is built
#[derive(Debug, Clone)]
pub struct AggregationContext {
    tables: [PairAggregationTable; 9],
}

impl Default for AggregationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregationContext {
    pub fn new() -> Self {
        Self {
            tables: AggregationPurpose::ALL.map(|purpose| PairAggregationTable::new(purpose.is_commutative())),
        }
    }

    pub fn table(&self, purpose: AggregationPurpose) -> &PairAggregationTable {
        &self.tables[purpose.index()]
    }

    pub(crate) fn table_mut(&mut self, purpose: AggregationPurpose) -> &mut PairAggregationTable {
        &mut self.tables[purpose.index()]
    }

    pub fn find(&self, purpose: AggregationPurpose, left: TypeId, right: TypeId) -> Option<TypeId> {
        self.table(purpose).find(left, right)
    }
}

/// Which step of the algorithm produced an aggregation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationSource {
    Identity,
    Table,
    LeftFamily,
    RightFamily,
}

impl fmt::Display for AggregationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregationSource::Identity => "identity",
            AggregationSource::Table => "table",
            AggregationSource::LeftFamily => "left family",
            AggregationSource::RightFamily => "right family",
        };
        f.write_str(name)
    }
}
