// Copyright 2026 The Rulegraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The interaction state machine: two pointer clicks on pins become one
//! typed connection. The machine is an explicit object driven through
//! `on_pin_click`/`on_pointer_move`/`reset`, decoupled from any actual
//! pointer-event source so it can be exercised without a rendering
//! surface. One controller per editor instance; arming state lives on
//! the editor's own graph, never in shared module state.

use crate::common::{Error, Result};
use crate::datamodel::{Connection, Pin, PredicateProps, TableSide};
use crate::diagram::common::Point;
use crate::diagram::layout::EditorLayout;
use crate::graph::RuleGraph;

/// What a pin click did. `Rejected` outcomes are recoverable notices
/// (the machine is back in the idle state); nothing here is fatal.
#[derive(Debug)]
pub enum ClickOutcome {
    /// First endpoint chosen; awaiting a pin on the other table.
    Armed,
    /// The armed pin was clicked again; arming withdrawn.
    Canceled,
    /// The connection was created; carries its redraw key.
    Connected(String),
    /// Same-side pair, duplicate, or stale pin; carries the notice.
    Rejected(Error),
}

type PropsFactory = Box<dyn Fn() -> PredicateProps>;
type AddedHandler = Box<dyn FnMut(&Connection)>;

pub struct InteractionController {
    pointer: Option<Point>,
    default_props: PropsFactory,
    on_added: Vec<AddedHandler>,
}

impl Default for InteractionController {
    fn default() -> Self {
        InteractionController {
            pointer: None,
            default_props: Box::new(PredicateProps::default),
            on_added: Vec::new(),
        }
    }
}

impl InteractionController {
    pub fn new() -> InteractionController {
        Default::default()
    }

    /// Override the properties newly created connections start with
    /// (the stock default is `EQ`, `=`, operand `"1"`).
    pub fn with_default_props<F>(factory: F) -> InteractionController
    where
        F: Fn() -> PredicateProps + 'static,
    {
        InteractionController {
            pointer: None,
            default_props: Box::new(factory),
            on_added: Vec::new(),
        }
    }

    pub fn on_connection_added<F>(&mut self, handler: F)
    where
        F: FnMut(&Connection) + 'static,
    {
        self.on_added.push(Box::new(handler));
    }

    pub fn is_armed(&self, graph: &RuleGraph) -> bool {
        graph.pending_pin().is_some()
    }

    /// Feed one pin click through the state machine.
    pub fn on_pin_click(&mut self, graph: &mut RuleGraph, pin: Pin) -> ClickOutcome {
        match graph.take_pending() {
            None => {
                // validate before arming so a stale pin can't sit in
                // the pending slot
                if let Err(err) = self.check_pin(graph, &pin) {
                    return ClickOutcome::Rejected(err);
                }
                graph.set_pending(pin);
                ClickOutcome::Armed
            }
            Some(armed) => {
                if armed == pin {
                    return ClickOutcome::Canceled;
                }
                if armed.side == pin.side {
                    let err = Error::new(
                        crate::common::ErrorKind::Graph,
                        crate::common::ErrorCode::SameSidePins,
                        Some("cannot pick a second pin from the same table".to_string()),
                    );
                    return ClickOutcome::Rejected(err);
                }

                let (left, right) = if armed.side == TableSide::Left {
                    (armed, pin)
                } else {
                    (pin, armed)
                };

                let conn = match graph.add_connection(left, right, (self.default_props)()) {
                    Ok(conn) => conn,
                    Err(err) => return ClickOutcome::Rejected(err),
                };
                for handler in self.on_added.iter_mut() {
                    handler(&conn);
                }
                ClickOutcome::Connected(conn.key())
            }
        }
    }

    /// Track the live pointer position for trace rendering.
    pub fn on_pointer_move(&mut self, pos: Point) {
        self.pointer = Some(pos);
    }

    /// External cancel: back to idle without creating anything.
    pub fn reset(&mut self, graph: &mut RuleGraph) {
        graph.clear_pending();
        self.pointer = None;
    }

    /// The transient trace segment from the armed pin's anchor to the
    /// live pointer position; `None` while idle.
    pub fn trace(&self, graph: &RuleGraph, layout: &EditorLayout) -> Option<[Point; 2]> {
        let pin = graph.pending_pin()?;
        let pos = self.pointer?;
        Some([layout.anchor(pin), pos])
    }

    fn check_pin(&self, graph: &RuleGraph, pin: &Pin) -> Result<()> {
        graph.pin(pin.side, pin.column_index).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;
    use crate::datamodel::{Comparator, SimilarityOp, Table};
    use std::cell::RefCell;
    use std::rc::Rc;

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
    fn test_two_clicks_make_a_connection() {
        let mut g = graph();
        let mut ctrl = InteractionController::new();

        let left = g.pin(TableSide::Left, 2).unwrap();
        let right = g.pin(TableSide::Right, 1).unwrap();

        assert!(matches!(
            ctrl.on_pin_click(&mut g, left),
            ClickOutcome::Armed
        ));
        assert!(ctrl.is_armed(&g));

        match ctrl.on_pin_click(&mut g, right) {
            ClickOutcome::Connected(key) => assert_eq!(key, "l2r1"),
            outcome => panic!("expected Connected, got {outcome:?}"),
        }
        assert!(!ctrl.is_armed(&g));

        let conns = g.connections();
        assert_eq!(conns.len(), 1);
        assert_eq!(conns[0].props.op, SimilarityOp::Eq);
        assert_eq!(conns[0].props.operand, "1");
    }

    #[test]
    fn test_either_side_may_start() {
        let mut g = graph();
        let mut ctrl = InteractionController::new();

        let right = g.pin(TableSide::Right, 0).unwrap();
        let left = g.pin(TableSide::Left, 1).unwrap();

        ctrl.on_pin_click(&mut g, right);
        match ctrl.on_pin_click(&mut g, left) {
            ClickOutcome::Connected(key) => assert_eq!(key, "l1r0"),
            outcome => panic!("expected Connected, got {outcome:?}"),
        }

        // left/right assignment follows table side, not click order
        let conn = &g.connections()[0];
        assert_eq!(conn.left.side, TableSide::Left);
        assert_eq!(conn.right.side, TableSide::Right);
    }

    #[test]
    fn test_same_side_rejected_back_to_idle() {
        let mut g = graph();
        let mut ctrl = InteractionController::new();

        let a = g.pin(TableSide::Left, 0).unwrap();
        let b = g.pin(TableSide::Left, 1).unwrap();

        ctrl.on_pin_click(&mut g, a);
        match ctrl.on_pin_click(&mut g, b) {
            ClickOutcome::Rejected(err) => assert_eq!(err.code, ErrorCode::SameSidePins),
            outcome => panic!("expected Rejected, got {outcome:?}"),
        }
        assert!(!ctrl.is_armed(&g));
        assert!(g.is_empty());
    }

    #[test]
    fn test_reclick_cancels() {
        let mut g = graph();
        let mut ctrl = InteractionController::new();

        let pin = g.pin(TableSide::Right, 2).unwrap();
        ctrl.on_pin_click(&mut g, pin.clone());
        assert!(matches!(
            ctrl.on_pin_click(&mut g, pin),
            ClickOutcome::Canceled
        ));
        assert!(!ctrl.is_armed(&g));
        assert!(g.is_empty());
    }

    #[test]
    fn test_duplicate_rejected_back_to_idle() {
        let mut g = graph();
        let mut ctrl = InteractionController::new();

        let left = g.pin(TableSide::Left, 0).unwrap();
        let right = g.pin(TableSide::Right, 0).unwrap();

        ctrl.on_pin_click(&mut g, left.clone());
        ctrl.on_pin_click(&mut g, right.clone());

        ctrl.on_pin_click(&mut g, left);
        match ctrl.on_pin_click(&mut g, right) {
            ClickOutcome::Rejected(err) => {
                assert_eq!(err.code, ErrorCode::DuplicateConnection)
            }
            outcome => panic!("expected Rejected, got {outcome:?}"),
        }
        assert_eq!(g.len(), 1);
        assert!(!ctrl.is_armed(&g));
    }

    #[test]
    fn test_default_props_factory() {
        let mut g = graph();
        let mut ctrl = InteractionController::with_default_props(|| PredicateProps {
            op: SimilarityOp::Ls,
            cmp: Comparator::Gte,
            operand: "0.8".to_string(),
        });

        let left = g.pin(TableSide::Left, 0).unwrap();
        let right = g.pin(TableSide::Right, 0).unwrap();
        ctrl.on_pin_click(&mut g, left);
        ctrl.on_pin_click(&mut g, right);

        let conn = &g.connections()[0];
        assert_eq!(conn.props.op, SimilarityOp::Ls);
        assert_eq!(conn.props.cmp, Comparator::Gte);
        assert_eq!(conn.props.operand, "0.8");
    }

    #[test]
    fn test_added_subscriber_notified() {
        let mut g = graph();
        let mut ctrl = InteractionController::new();

        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        ctrl.on_connection_added(move |conn| sink.borrow_mut().push(conn.key()));

        let left = g.pin(TableSide::Left, 1).unwrap();
        let right = g.pin(TableSide::Right, 2).unwrap();
        ctrl.on_pin_click(&mut g, left.clone());
        ctrl.on_pin_click(&mut g, right);

        // rejected attempts notify no one
        let other = g.pin(TableSide::Left, 2).unwrap();
        ctrl.on_pin_click(&mut g, other);
        ctrl.on_pin_click(&mut g, left);

        assert_eq!(*seen.borrow(), vec!["l1r2".to_string()]);
    }

    #[test]
    fn test_stale_pin_never_arms() {
        let mut g = graph();
        let mut ctrl = InteractionController::new();

        let stale = Pin::new(TableSide::Left, 9, "ghost");
        match ctrl.on_pin_click(&mut g, stale) {
            ClickOutcome::Rejected(err) => assert_eq!(err.code, ErrorCode::PinOutOfRange),
            outcome => panic!("expected Rejected, got {outcome:?}"),
        }
        assert!(!ctrl.is_armed(&g));
    }

    #[test]
    fn test_trace_only_while_armed() {
        let mut g = graph();
        let mut ctrl = InteractionController::new();
        let layout = EditorLayout::new(800.0, 600.0);

        ctrl.on_pointer_move(Point { x: 250.0, y: 120.0 });
        assert!(ctrl.trace(&g, &layout).is_none());

        let pin = g.pin(TableSide::Left, 0).unwrap();
        ctrl.on_pin_click(&mut g, pin.clone());
        ctrl.on_pointer_move(Point { x: 260.0, y: 130.0 });
        let [from, to] = ctrl.trace(&g, &layout).unwrap();
        assert_eq!(from, layout.anchor(&pin));
        assert_eq!(to, Point { x: 260.0, y: 130.0 });

        ctrl.reset(&mut g);
        assert!(ctrl.trace(&g, &layout).is_none());
    }

    #[test]
    fn test_two_editors_do_not_share_arming_state() {
        let mut g1 = graph();
        let mut g2 = graph();
        let mut ctrl1 = InteractionController::new();
        let mut ctrl2 = InteractionController::new();

        let pin = g1.pin(TableSide::Left, 0).unwrap();
        ctrl1.on_pin_click(&mut g1, pin);

        assert!(ctrl1.is_armed(&g1));
        assert!(!ctrl2.is_armed(&g2));

        // completing in one editor leaves the other untouched
        let right = g1.pin(TableSide::Right, 0).unwrap();
        ctrl1.on_pin_click(&mut g1, right);
        assert_eq!(g1.len(), 1);
        assert!(g2.is_empty());
    }

    #[test]
    fn test_controller_side_invariant() {
        let mut g = graph();
        let mut ctrl = InteractionController::new();

        for (l, r) in [(0usize, 1usize), (1, 0), (2, 2)] {
            let a = g.pin(TableSide::Right, r).unwrap();
            let b = g.pin(TableSide::Left, l).unwrap();
            ctrl.on_pin_click(&mut g, a);
            ctrl.on_pin_click(&mut g, b);
        }

        for conn in g.connections() {
            assert_ne!(conn.left.side, conn.right.side);
        }
    }
}
