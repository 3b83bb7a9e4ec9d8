// Copyright 2026 The Rulegraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{Error, ErrorCode, ErrorKind, Result};

/// A bound table schema: a name plus an ordered list of column names.
/// Immutable once constructed; a rule references at most two of these
/// (which may be the same table, for self-join rules).
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    columns: Vec<String>,
}

impl Table {
    pub fn new(name: &str, columns: Vec<String>) -> Result<Table> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(columns.len());
        for column in columns.iter() {
            if !seen.insert(column.as_str()) {
                return Err(Error::new(
                    ErrorKind::Schema,
                    ErrorCode::DuplicateColumn,
                    Some(format!("{}.{}", name, column)),
                ));
            }
        }

        Ok(Table {
            name: name.to_owned(),
            columns,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|s| s.as_str())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Which of the two table boxes a pin belongs to.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum TableSide {
    Left,
    Right,
}

/// One addressable column slot of one of the two rule tables. Pins are
/// value objects; `column_index` is positional in the bound table's
/// column list at the time the pin was created.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Pin {
    pub side: TableSide,
    pub column_index: usize,
    pub column_name: String,
}

impl Pin {
    pub fn new(side: TableSide, column_index: usize, column_name: &str) -> Pin {
        Pin {
            side,
            column_index,
            column_name: column_name.to_owned(),
        }
    }

    /// `table.column`, the display form used in predicate lines.
    pub fn display_name(&self, table: &Table) -> String {
        format!("{}.{}", table.name, self.column_name)
    }
}

/// The similarity/equality function applied to the two referenced column
/// values. The numeric meaning of each is defined by the backend rule
/// engine; this crate only round-trips the symbol.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum SimilarityOp {
    Eq,
    Ed,
    Ls,
    Qg,
    Sd,
}

impl SimilarityOp {
    pub fn as_str(self) -> &'static str {
        match self {
            SimilarityOp::Eq => "EQ",
            SimilarityOp::Ed => "ED",
            SimilarityOp::Ls => "LS",
            SimilarityOp::Qg => "QG",
            SimilarityOp::Sd => "SD",
        }
    }

    pub fn from_str(s: &str) -> Option<SimilarityOp> {
        match s {
            "EQ" => Some(SimilarityOp::Eq),
            "ED" => Some(SimilarityOp::Ed),
            "LS" => Some(SimilarityOp::Ls),
            "QG" => Some(SimilarityOp::Qg),
            "SD" => Some(SimilarityOp::Sd),
            _ => None,
        }
    }

    /// The small-integer coding used in the editor's property tables.
    pub fn index(self) -> usize {
        match self {
            SimilarityOp::Eq => 0,
            SimilarityOp::Ed => 1,
            SimilarityOp::Ls => 2,
            SimilarityOp::Qg => 3,
            SimilarityOp::Sd => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<SimilarityOp> {
        match i {
            0 => Some(SimilarityOp::Eq),
            1 => Some(SimilarityOp::Ed),
            2 => Some(SimilarityOp::Ls),
            3 => Some(SimilarityOp::Qg),
            4 => Some(SimilarityOp::Sd),
            _ => None,
        }
    }
}

impl fmt::Display for SimilarityOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The relational symbol applied to the operator's numeric output
/// against the operand.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Comparator {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
    Neq,
}

impl Comparator {
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Gt => ">",
            Comparator::Lt => "<",
            Comparator::Gte => ">=",
            Comparator::Lte => "<=",
            Comparator::Neq => "!=",
        }
    }

    pub fn from_str(s: &str) -> Option<Comparator> {
        match s {
            "=" => Some(Comparator::Eq),
            ">" => Some(Comparator::Gt),
            "<" => Some(Comparator::Lt),
            ">=" => Some(Comparator::Gte),
            "<=" => Some(Comparator::Lte),
            "!=" => Some(Comparator::Neq),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Comparator::Eq => 0,
            Comparator::Gt => 1,
            Comparator::Lt => 2,
            Comparator::Gte => 3,
            Comparator::Lte => 4,
            Comparator::Neq => 5,
        }
    }

    pub fn from_index(i: usize) -> Option<Comparator> {
        match i {
            0 => Some(Comparator::Eq),
            1 => Some(Comparator::Gt),
            2 => Some(Comparator::Lt),
            3 => Some(Comparator::Gte),
            4 => Some(Comparator::Lte),
            5 => Some(Comparator::Neq),
            _ => None,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The editable properties of a connection. The operand is carried
/// verbatim as a decimal string; renormalizing it through a float would
/// break round-trip fidelity with the backend parser.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PredicateProps {
    pub op: SimilarityOp,
    pub cmp: Comparator,
    pub operand: String,
}

impl Default for PredicateProps {
    fn default() -> Self {
        PredicateProps {
            op: SimilarityOp::Eq,
            cmp: Comparator::Eq,
            operand: "1".to_string(),
        }
    }
}

/// A typed edge between two pins on opposite table sides, plus its
/// predicate properties. One connection corresponds to one line of the
/// predicate program; the left/right order is the order the pins were
/// bound in and is preserved through serialization.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Connection {
    pub left: Pin,
    pub right: Pin,
    pub props: PredicateProps,
}

impl Connection {
    pub fn new(left: Pin, right: Pin, props: PredicateProps) -> Connection {
        Connection { left, right, props }
    }

    /// Stable redraw key, `l{left index}r{right index}`.
    pub fn key(&self) -> String {
        format!("l{}r{}", self.left.column_index, self.right.column_index)
    }

    /// True if `other` references the same ordered (left, right) pin pair.
    pub fn same_pins(&self, other: &Connection) -> bool {
        self.left.side == other.left.side
            && self.left.column_index == other.left.column_index
            && self.right.side == other.right.side
            && self.right.column_index == other.right.column_index
    }
}

/// Which editor variant a rule uses. Only `Er` (and graph-shaped
/// variants built on the same codec) is backed by the pin graph; the
/// rest carry free-form code.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum RuleType {
    #[serde(rename = "ER")]
    Er,
    #[serde(rename = "FD")]
    Fd,
    #[serde(rename = "DC")]
    Dc,
    #[serde(rename = "UDF")]
    Udf,
}

impl RuleType {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::Er => "ER",
            RuleType::Fd => "FD",
            RuleType::Dc => "DC",
            RuleType::Udf => "UDF",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The backend payload for rule creation/generation/verification.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub code: String,
    pub table1: String,
    pub table2: Option<String>,
}
