// Copyright 2026 The Rulegraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

pub mod codec;
pub mod common;
pub mod controller;
pub mod datamodel;
pub mod diagram;
pub mod editor;
pub mod graph;
pub mod schema;
mod token;

pub use self::common::{Error, ErrorCode, ErrorKind, LineError, Result};
pub use self::controller::{ClickOutcome, InteractionController};
pub use self::datamodel::{
    Comparator, Connection, Pin, PredicateProps, Rule, RuleType, SimilarityOp, Table, TableSide,
};
pub use self::editor::{ErEditor, Requester, RuleEditor, TextEditor, build_rule, editor_for, verify};
pub use self::graph::RuleGraph;
pub use self::schema::{SchemaBinding, SchemaSource, bind_pair};
