// Copyright 2026 The Rulegraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

pub const BOX_WIDTH: f64 = 180.0;
pub const BOX_HEIGHT: f64 = 30.0;
pub const PIN_OFFSET: f64 = 10.0;
pub const PIN_RADIUS: f64 = 2.0;
pub const CTRL_OFFSET: f64 = 15.0;
pub const CTRL_BEND: f64 = 23.0;
pub const FONT_SIZE: f64 = 18.0;
pub const FONT_OFFSET_X: f64 = 10.0;

pub const TABLE1_ORIGIN: (f64, f64) = (10.0, 10.0);
pub const TABLE2_ORIGIN: (f64, f64) = (300.0, 10.0);

// cycled by connection index, so line colors are stable under redraw
pub const LINE_PALETTE: [&str; 6] = [
    "#00008B",
    "#8B0000",
    "#FF8C00",
    "BlueViolet",
    "Black",
    "#0000CD",
];
