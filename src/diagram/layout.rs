// Copyright 2026 The Rulegraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Pure geometry for the two-table canvas: where each table box sits,
//! where each column's pin anchor is, and the four control points of
//! each connection curve. No drawing happens here; `render` turns the
//! computed positions into SVG.

use smallvec::{SmallVec, smallvec};

use crate::datamodel::{Connection, Pin, TableSide};
use crate::diagram::common::Point;
use crate::diagram::constants::{
    BOX_HEIGHT, BOX_WIDTH, CTRL_BEND, CTRL_OFFSET, PIN_OFFSET, TABLE1_ORIGIN, TABLE2_ORIGIN,
};

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TableBox {
    pub x: f64,
    pub y: f64,
    pub box_width: f64,
    pub box_height: f64,
}

impl TableBox {
    pub fn new(x: f64, y: f64) -> TableBox {
        TableBox {
            x,
            y,
            box_width: BOX_WIDTH,
            box_height: BOX_HEIGHT,
        }
    }

    /// The pin anchor for column row `index`. Row 0 is the table's
    /// title bar, so column `i` occupies row `i + 1`; left-table pins
    /// hang off the box's right edge, right-table pins off its left.
    pub fn pin_anchor(&self, index: usize, side: TableSide) -> Point {
        let x = match side {
            TableSide::Left => self.x + self.box_width + PIN_OFFSET,
            TableSide::Right => self.x - PIN_OFFSET,
        };
        let y = self.y + self.box_height * (index as f64 + 1.0) + self.box_height * 0.5;
        Point { x, y }
    }
}

/// One connection's renderable curve: the redraw key plus the four
/// control points of its cubic, left anchor to right anchor.
#[derive(Clone, PartialEq, Debug)]
pub struct ConnectionPath {
    pub key: String,
    pub points: SmallVec<[Point; 4]>,
}

pub struct EditorLayout {
    pub width: f64,
    pub height: f64,
    left: TableBox,
    right: TableBox,
}

impl EditorLayout {
    pub fn new(width: f64, height: f64) -> EditorLayout {
        EditorLayout {
            width,
            height,
            left: TableBox::new(TABLE1_ORIGIN.0, TABLE1_ORIGIN.1),
            right: TableBox::new(TABLE2_ORIGIN.0, TABLE2_ORIGIN.1),
        }
    }

    pub fn table_box(&self, side: TableSide) -> &TableBox {
        match side {
            TableSide::Left => &self.left,
            TableSide::Right => &self.right,
        }
    }

    pub fn anchor(&self, pin: &Pin) -> Point {
        self.table_box(pin.side).pin_anchor(pin.column_index, pin.side)
    }

    /// Move a table box to an absolute position, clamped so the whole
    /// box stays on the canvas.
    pub fn drag_to(&mut self, side: TableSide, x: f64, y: f64) {
        let tbox = match side {
            TableSide::Left => &mut self.left,
            TableSide::Right => &mut self.right,
        };
        tbox.x = x.max(0.0).min(self.width - tbox.box_width);
        tbox.y = y.max(0.0).min(self.height - tbox.box_height);
    }

    /// Curve geometry for one connection. Endpoints are chosen by table
    /// side, not by the connection's stored pin order, so a predicate
    /// written table2-first still draws left-to-right.
    pub fn connection_path(&self, conn: &Connection) -> ConnectionPath {
        let (lpin, rpin) = if conn.left.side == TableSide::Left {
            (&conn.left, &conn.right)
        } else {
            (&conn.right, &conn.left)
        };

        let p0 = self.anchor(lpin);
        let p3 = self.anchor(rpin);
        let bend = if p3.y > p0.y { CTRL_BEND } else { -CTRL_BEND };
        let p1 = Point {
            x: p0.x + CTRL_OFFSET,
            y: p0.y + bend,
        };
        let p2 = Point {
            x: p3.x - CTRL_OFFSET,
            y: p3.y - bend,
        };

        ConnectionPath {
            key: conn.key(),
            points: smallvec![p0, p1, p2, p3],
        }
    }

    pub fn connection_paths(&self, conns: &[Connection]) -> Vec<ConnectionPath> {
        conns.iter().map(|c| self.connection_path(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel::PredicateProps;

    #[test]
    fn test_pin_anchor() {
        let layout = EditorLayout::new(800.0, 600.0);

        // left table pin 0: right edge of the box, one row below title
        let pin = Pin::new(TableSide::Left, 0, "id");
        assert_eq!(
            layout.anchor(&pin),
            Point {
                x: 10.0 + 180.0 + 10.0,
                y: 10.0 + 30.0 + 15.0
            }
        );

        // right table pin 2: left edge, three rows below title
        let pin = Pin::new(TableSide::Right, 2, "email");
        assert_eq!(
            layout.anchor(&pin),
            Point {
                x: 300.0 - 10.0,
                y: 10.0 + 90.0 + 15.0
            }
        );
    }

    #[test]
    fn test_connection_path_bends_toward_the_lower_pin() {
        let layout = EditorLayout::new(800.0, 600.0);
        let conn = Connection::new(
            Pin::new(TableSide::Left, 0, "id"),
            Pin::new(TableSide::Right, 2, "email"),
            PredicateProps::default(),
        );

        let path = layout.connection_path(&conn);
        assert_eq!(path.key, "l0r2");
        let [p0, p1, p2, p3] = [
            path.points[0],
            path.points[1],
            path.points[2],
            path.points[3],
        ];
        assert_eq!(p0, layout.anchor(&conn.left));
        assert_eq!(p3, layout.anchor(&conn.right));
        // descending curve: out of p0 downward, into p3 from above
        assert_eq!(p1, Point { x: p0.x + 15.0, y: p0.y + 23.0 });
        assert_eq!(p2, Point { x: p3.x - 15.0, y: p3.y - 23.0 });

        // reversed heights flip the bend
        let conn = Connection::new(
            Pin::new(TableSide::Left, 2, "customer"),
            Pin::new(TableSide::Right, 0, "id"),
            PredicateProps::default(),
        );
        let path = layout.connection_path(&conn);
        assert_eq!(path.points[1].y, path.points[0].y - 23.0);
        assert_eq!(path.points[2].y, path.points[3].y + 23.0);
    }

    #[test]
    fn test_path_geometry_ignores_pin_storage_order() {
        let layout = EditorLayout::new(800.0, 600.0);
        // a predicate written table2-first stores the right-side pin in
        // the left slot
        let conn = Connection::new(
            Pin::new(TableSide::Right, 1, "name"),
            Pin::new(TableSide::Left, 0, "id"),
            PredicateProps::default(),
        );

        let path = layout.connection_path(&conn);
        assert_eq!(path.points[0], layout.anchor(&conn.right));
        assert_eq!(path.points[3], layout.anchor(&conn.left));
        assert!(path.points[0].x < path.points[3].x);
    }

    #[test]
    fn test_drag_clamped_to_canvas() {
        let mut layout = EditorLayout::new(800.0, 600.0);

        layout.drag_to(TableSide::Left, -50.0, -50.0);
        let tbox = layout.table_box(TableSide::Left);
        assert_eq!((tbox.x, tbox.y), (0.0, 0.0));

        layout.drag_to(TableSide::Left, 10_000.0, 10_000.0);
        let tbox = layout.table_box(TableSide::Left);
        assert_eq!((tbox.x, tbox.y), (800.0 - 180.0, 600.0 - 30.0));
    }

    #[test]
    fn test_anchors_follow_a_drag() {
        let mut layout = EditorLayout::new(800.0, 600.0);
        let pin = Pin::new(TableSide::Right, 0, "id");
        let before = layout.anchor(&pin);

        layout.drag_to(TableSide::Right, 400.0, 100.0);
        let after = layout.anchor(&pin);
        assert_eq!(after, Point { x: 390.0, y: 145.0 });
        assert_ne!(before, after);
    }
}
