// Copyright 2026 The Rulegraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The pin graph model: two bound tables, their columns addressable as
//! pins, and the ordered set of connections (predicates) between them.
//! Each open editor owns exactly one `RuleGraph`; there is no shared
//! module state, so two editors never see each other's pending pin.

use crate::codec;
use crate::common::{LineResult, Result};
use crate::datamodel::{Connection, Pin, PredicateProps, Table, TableSide};
use crate::graph_err;

#[derive(Debug)]
pub struct RuleGraph {
    table1: Table,
    table2: Table,
    conns: Vec<Connection>,
    pending: Option<Pin>,
}

impl RuleGraph {
    pub fn new(table1: Table, table2: Table) -> RuleGraph {
        RuleGraph {
            table1,
            table2,
            conns: Vec::new(),
            pending: None,
        }
    }

    /// Build a graph pre-populated from an existing predicate program.
    /// A malformed program is surfaced, never silently truncated.
    pub fn from_program(table1: Table, table2: Table, program: &str) -> LineResult<RuleGraph> {
        let conns = codec::parse(program, &table1, &table2)?;
        let mut graph = RuleGraph::new(table1, table2);
        graph.conns = conns;
        Ok(graph)
    }

    pub fn table1(&self) -> &Table {
        &self.table1
    }

    pub fn table2(&self) -> &Table {
        &self.table2
    }

    pub fn table(&self, side: TableSide) -> &Table {
        match side {
            TableSide::Left => &self.table1,
            TableSide::Right => &self.table2,
        }
    }

    /// Construct a pin for a column of one of the bound tables,
    /// validating the index against the table's current schema.
    pub fn pin(&self, side: TableSide, column_index: usize) -> Result<Pin> {
        let table = self.table(side);
        match table.column(column_index) {
            Some(name) => Ok(Pin::new(side, column_index, name)),
            None => graph_err!(
                PinOutOfRange,
                format!("{}[{}]", table.name, column_index)
            ),
        }
    }

    fn check_pin(&self, pin: &Pin) -> Result<()> {
        let table = self.table(pin.side);
        if pin.column_index >= table.len() {
            return graph_err!(
                PinOutOfRange,
                format!("{}[{}]", table.name, pin.column_index)
            );
        }
        Ok(())
    }

    /// Append a connection, returning a copy of what was stored. The two
    /// pins must come from different table sides, reference in-range
    /// columns, and not duplicate an existing ordered (left, right) pair;
    /// on rejection the graph is unchanged.
    pub fn add_connection(
        &mut self,
        left: Pin,
        right: Pin,
        props: PredicateProps,
    ) -> Result<Connection> {
        if left.side == right.side {
            return graph_err!(
                SameSidePins,
                format!("{} and {}", left.column_name, right.column_name)
            );
        }
        self.check_pin(&left)?;
        self.check_pin(&right)?;

        let conn = Connection::new(left, right, props);
        if self.conns.iter().any(|c| c.same_pins(&conn)) {
            return graph_err!(DuplicateConnection, conn.key());
        }

        self.conns.push(conn.clone());
        Ok(conn)
    }

    /// Remove the connection with the given redraw key; false if no
    /// such connection exists.
    pub fn remove_connection(&mut self, key: &str) -> bool {
        let before = self.conns.len();
        self.conns.retain(|c| c.key() != key);
        before != self.conns.len()
    }

    pub fn update_connection<F>(&mut self, key: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut PredicateProps),
    {
        match self.conns.iter_mut().find(|c| c.key() == key) {
            Some(conn) => {
                f(&mut conn.props);
                Ok(())
            }
            None => graph_err!(DoesNotExist, key.to_string()),
        }
    }

    /// A defensive copy of the connection list, in insertion order.
    /// Mutation goes through the graph, never through this copy.
    pub fn connections(&self) -> Vec<Connection> {
        self.conns.clone()
    }

    /// Replace the connection list wholesale (e.g. after a row deletion
    /// in the property table), re-running the add-time validations.
    pub fn set_connections(&mut self, conns: Vec<Connection>) -> Result<()> {
        let old = std::mem::take(&mut self.conns);
        for conn in conns {
            if let Err(err) = self.add_connection(conn.left, conn.right, conn.props) {
                self.conns = old;
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    pub fn pending_pin(&self) -> Option<&Pin> {
        self.pending.as_ref()
    }

    pub(crate) fn set_pending(&mut self, pin: Pin) {
        self.pending = Some(pin);
    }

    pub(crate) fn take_pending(&mut self) -> Option<Pin> {
        self.pending.take()
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Serialize the graph to predicate program text.
    pub fn encode(&self) -> String {
        codec::serialize(&self.conns, &self.table1, &self.table2)
    }

    /// Replace the connection set by decoding a predicate program
    /// against the bound tables.
    pub fn set_program(&mut self, program: &str) -> LineResult<()> {
        self.conns = codec::parse(program, &self.table1, &self.table2)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;
    use crate::datamodel::{Comparator, SimilarityOp};

    fn graph() -> RuleGraph {
        let t1 = Table::new(
            "orders",
            vec!["id".to_string(), "total".to_string(), "customer".to_string()],
        )
        .unwrap();
        let t2 = Table::new(
            "customers",
            vec!["id".to_string(), "name".to_string(), "email".to_string()],
        )
        .unwrap();
        RuleGraph::new(t1, t2)
    }

    #[test]
    fn test_pin_construction() {
        let g = graph();
        let pin = g.pin(TableSide::Left, 2).unwrap();
        assert_eq!(pin.column_name, "customer");

        let err = g.pin(TableSide::Right, 3).unwrap_err();
        assert_eq!(err.code, ErrorCode::PinOutOfRange);
        assert_eq!(err.get_details().unwrap(), "customers[3]");
    }

    #[test]
    fn test_add_and_key() {
        let mut g = graph();
        let left = g.pin(TableSide::Left, 2).unwrap();
        let right = g.pin(TableSide::Right, 1).unwrap();
        let key = g
            .add_connection(left, right, PredicateProps::default())
            .unwrap()
            .key();
        assert_eq!(key, "l2r1");
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_duplicate_rejected_graph_untouched() {
        let mut g = graph();
        let left = g.pin(TableSide::Left, 0).unwrap();
        let right = g.pin(TableSide::Right, 0).unwrap();
        g.add_connection(left.clone(), right.clone(), PredicateProps::default())
            .unwrap();

        let mut props = PredicateProps::default();
        props.op = SimilarityOp::Ed;
        let err = g.add_connection(left, right, props).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateConnection);
        assert_eq!(g.len(), 1);
        // the original's props survive the rejected attempt
        assert_eq!(g.connections()[0].props.op, SimilarityOp::Eq);
    }

    #[test]
    fn test_same_side_rejected() {
        let mut g = graph();
        let a = g.pin(TableSide::Left, 0).unwrap();
        let b = g.pin(TableSide::Left, 1).unwrap();
        let err = g.add_connection(a, b, PredicateProps::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::SameSidePins);
        assert!(g.is_empty());
    }

    #[test]
    fn test_out_of_range_pin_rejected() {
        let mut g = graph();
        let stale = Pin::new(TableSide::Left, 9, "ghost");
        let right = g.pin(TableSide::Right, 0).unwrap();
        let err = g
            .add_connection(stale, right, PredicateProps::default())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PinOutOfRange);
    }

    #[test]
    fn test_remove_connection() {
        let mut g = graph();
        let left = g.pin(TableSide::Left, 1).unwrap();
        let right = g.pin(TableSide::Right, 2).unwrap();
        g.add_connection(left, right, PredicateProps::default())
            .unwrap();

        assert!(g.remove_connection("l1r2"));
        assert!(!g.remove_connection("l1r2"));
        assert!(g.is_empty());
    }

    #[test]
    fn test_update_connection() {
        let mut g = graph();
        let left = g.pin(TableSide::Left, 1).unwrap();
        let right = g.pin(TableSide::Right, 2).unwrap();
        g.add_connection(left, right, PredicateProps::default())
            .unwrap();

        g.update_connection("l1r2", |props| {
            props.cmp = Comparator::Gte;
            props.operand = "0.75".to_string();
        })
        .unwrap();
        assert_eq!(g.connections()[0].props.cmp, Comparator::Gte);

        let err = g.update_connection("l9r9", |_| {}).unwrap_err();
        assert_eq!(err.code, ErrorCode::DoesNotExist);
    }

    #[test]
    fn test_connections_is_a_defensive_copy() {
        let mut g = graph();
        let left = g.pin(TableSide::Left, 0).unwrap();
        let right = g.pin(TableSide::Right, 0).unwrap();
        g.add_connection(left, right, PredicateProps::default())
            .unwrap();

        let mut copy = g.connections();
        copy.clear();
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_set_connections_validates() {
        let mut g = graph();
        let left = g.pin(TableSide::Left, 0).unwrap();
        let right = g.pin(TableSide::Right, 0).unwrap();
        let conn = Connection::new(left, right, PredicateProps::default());

        g.set_connections(vec![conn.clone()]).unwrap();
        assert_eq!(g.len(), 1);

        // a duplicate in the replacement list rolls the graph back
        let err = g.set_connections(vec![conn.clone(), conn]).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateConnection);
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_encode_decode() {
        let mut g = graph();
        let left = g.pin(TableSide::Left, 2).unwrap();
        let right = g.pin(TableSide::Right, 1).unwrap();
        g.add_connection(left, right, PredicateProps::default())
            .unwrap();

        let program = g.encode();
        assert_eq!(program, "EQ(orders.customer,customers.name)=1\n");

        let mut g2 = graph();
        g2.set_program(&program).unwrap();
        assert_eq!(g2.connections(), g.connections());
    }

    #[test]
    fn test_from_program_rejects_bad_code() {
        let t1 = Table::new("a", vec!["x".to_string()]).unwrap();
        let t2 = Table::new("b", vec!["y".to_string()]).unwrap();
        let err = RuleGraph::from_program(t1, t2, "garbage here\n").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_from_program_rejects_repeated_pin_pair() {
        let program =
            "EQ(orders.customer,customers.name)=1\nED(orders.customer,customers.name)<2\n";
        let g = graph();
        let err = RuleGraph::from_program(g.table1.clone(), g.table2.clone(), program)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateConnection);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_set_program_rejects_repeated_pin_pair() {
        let mut g = graph();
        let left = g.pin(TableSide::Left, 0).unwrap();
        let right = g.pin(TableSide::Right, 0).unwrap();
        g.add_connection(left, right, PredicateProps::default())
            .unwrap();

        let err = g
            .set_program(
                "EQ(orders.customer,customers.name)=1\nED(orders.customer,customers.name)<2\n",
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateConnection);
        // the rejected program leaves the existing connections in place
        assert_eq!(g.len(), 1);

        // after a clean load, the shared key removes exactly one connection
        g.set_program("EQ(orders.customer,customers.name)=1\nED(orders.id,customers.id)<2\n")
            .unwrap();
        assert_eq!(g.len(), 2);
        assert!(g.remove_connection("l2r1"));
        assert_eq!(g.len(), 1);
    }
}
