// Copyright 2026 The Rulegraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::datamodel::{Table, TableSide};
use crate::diagram::common::{Point, escape_xml_text, format_coord};
use crate::diagram::constants::*;
use crate::diagram::layout::{ConnectionPath, EditorLayout};
use crate::graph::RuleGraph;

const RENDER_STYLES: &str = r#"
.rulegraph-canvas text {
  font-size: 18px;
  fill: #000000;
}

.rulegraph-table .rulegraph-title rect {
  fill: GoldenRod;
  fill-opacity: .4;
  stroke: #777;
}

.rulegraph-table .rulegraph-title text {
  font-family: monospace;
}

.rulegraph-table .rulegraph-row rect {
  fill: steelblue;
  fill-opacity: .4;
  stroke: #777;
  stroke-width: 1px;
}

.rulegraph-table .rulegraph-row circle {
  fill: none;
  stroke: #777;
  stroke-width: 1px;
}

.rulegraph-conn {
  fill: none;
  stroke-width: 2px;
}

.rulegraph-trace {
  fill: none;
  stroke-width: 2px;
}
"#;

fn line_color(index: usize) -> &'static str {
    LINE_PALETTE[index % LINE_PALETTE.len()]
}

fn render_table(layout: &EditorLayout, table: &Table, side: TableSide) -> String {
    let tbox = layout.table_box(side);
    let w = tbox.box_width;
    let h = tbox.box_height;
    let row_prefix = match side {
        TableSide::Left => 'l',
        TableSide::Right => 'r',
    };
    let pin_cx = match side {
        TableSide::Left => w + PIN_OFFSET,
        TableSide::Right => -PIN_OFFSET,
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<g class=\"rulegraph-table\" transform=\"translate({},{})\">",
        format_coord(tbox.x),
        format_coord(tbox.y)
    ));

    svg.push_str("<g class=\"rulegraph-title\">");
    svg.push_str(&format!(
        "<rect width=\"{}\" height=\"{}\"></rect>",
        format_coord(w),
        format_coord(h)
    ));
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\">{}</text>",
        format_coord(FONT_OFFSET_X),
        format_coord(FONT_SIZE),
        escape_xml_text(&table.name)
    ));
    svg.push_str("</g>");

    for (i, column) in table.columns().iter().enumerate() {
        svg.push_str(&format!(
            "<g class=\"rulegraph-row\" id=\"{}{}\" transform=\"translate(0,{})\">",
            row_prefix,
            i,
            format_coord((i as f64 + 1.0) * h)
        ));
        svg.push_str(&format!(
            "<rect width=\"{}\" height=\"{}\"></rect>",
            format_coord(w),
            format_coord(h)
        ));
        svg.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"></circle>",
            format_coord(pin_cx),
            format_coord(h * 0.5),
            format_coord(PIN_RADIUS)
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\">{}</text>",
            format_coord(FONT_OFFSET_X),
            format_coord(FONT_SIZE),
            escape_xml_text(column)
        ));
        svg.push_str("</g>");
    }

    svg.push_str("</g>");
    svg
}

fn curve_d(points: &[Point]) -> String {
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        format_coord(points[0].x),
        format_coord(points[0].y),
        format_coord(points[1].x),
        format_coord(points[1].y),
        format_coord(points[2].x),
        format_coord(points[2].y),
        format_coord(points[3].x),
        format_coord(points[3].y)
    )
}

fn render_connection(path: &ConnectionPath, index: usize) -> String {
    format!(
        "<path class=\"rulegraph-conn\" id=\"{}\" stroke=\"{}\" d=\"{}\"></path>",
        path.key,
        line_color(index),
        curve_d(&path.points)
    )
}

fn render_trace(segment: &[Point; 2], conn_count: usize) -> String {
    format!(
        "<g id=\"trace\"><line class=\"rulegraph-trace\" stroke=\"{}\" \
         x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"></line></g>",
        line_color(conn_count),
        format_coord(segment[0].x),
        format_coord(segment[0].y),
        format_coord(segment[1].x),
        format_coord(segment[1].y)
    )
}

/// Render the whole editor surface as a standalone SVG document: both
/// table boxes, every connection curve, and (while a pin is armed) the
/// transient trace segment.
pub fn render_svg(
    layout: &EditorLayout,
    graph: &RuleGraph,
    trace: Option<[Point; 2]>,
) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"rulegraph-canvas\" \
         width=\"{}\" height=\"{}\">",
        format_coord(layout.width),
        format_coord(layout.height)
    ));
    svg.push_str(&format!("<style>{RENDER_STYLES}</style>"));

    svg.push_str(&render_table(layout, graph.table1(), TableSide::Left));
    svg.push_str(&render_table(layout, graph.table2(), TableSide::Right));

    let conns = graph.connections();
    for (i, path) in layout.connection_paths(&conns).iter().enumerate() {
        svg.push_str(&render_connection(path, i));
    }

    if let Some(ref segment) = trace {
        svg.push_str(&render_trace(segment, conns.len()));
    }

    svg.push_str("</svg>");
    svg
}
