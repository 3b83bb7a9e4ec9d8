// Copyright 2026 The Rulegraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

pub mod common;
pub mod constants;
pub mod layout;
mod render;

pub use render::render_svg;
