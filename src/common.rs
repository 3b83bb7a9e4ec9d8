// Copyright 2026 The Rulegraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError,      // will never be produced
    DoesNotExist, // the named entity doesn't exist
    Generic,
    // lexing/parsing
    UnrecognizedToken,
    UnexpectedToken,
    UnexpectedEof,
    ExpectedOperator,
    ExpectedComparator,
    ExpectedNumber,
    ExpectedIdent,
    ExtraToken,
    UnknownTable,
    UnknownColumn,
    // schema binding
    DuplicateColumn,
    SchemaFetch,
    StaleSchema,
    TableUnbound,
    // graph mutation
    DuplicateConnection,
    SameSidePins,
    PinOutOfRange,
    // editor
    EmptyRuleName,
    NoTableSelected,
    EmptyCode,
    NotUdfRule,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            DoesNotExist => "does_not_exist",
            Generic => "generic",
            UnrecognizedToken => "unrecognized_token",
            UnexpectedToken => "unexpected_token",
            UnexpectedEof => "unexpected_eof",
            ExpectedOperator => "expected_operator",
            ExpectedComparator => "expected_comparator",
            ExpectedNumber => "expected_number",
            ExpectedIdent => "expected_ident",
            ExtraToken => "extra_token",
            UnknownTable => "unknown_table",
            UnknownColumn => "unknown_column",
            DuplicateColumn => "duplicate_column",
            SchemaFetch => "schema_fetch",
            StaleSchema => "stale_schema",
            TableUnbound => "table_unbound",
            DuplicateConnection => "duplicate_connection",
            SameSidePins => "same_side_pins",
            PinOutOfRange => "pin_out_of_range",
            EmptyRuleName => "empty_rule_name",
            NoTableSelected => "no_table_selected",
            EmptyCode => "empty_code",
            NotUdfRule => "not_udf_rule",
        };

        write!(f, "{name}")
    }
}

/// An error attributed to a span of a single predicate line,
/// before we know which line of the program it came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpanError {
    pub start: u16,
    pub end: u16,
    pub code: ErrorCode,
}

impl SpanError {
    pub fn new(code: ErrorCode, start: usize, end: usize) -> Self {
        SpanError {
            start: start as u16,
            end: end as u16,
            code,
        }
    }
}

impl fmt::Display for SpanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.end, self.code)
    }
}

/// A parse failure pinned to a 1-based line of a predicate program.
/// `details` carries the offending line's text for user display.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LineError {
    pub line: u32,
    pub start: u16,
    pub end: u16,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl LineError {
    pub fn new(line: u32, err: SpanError, details: Option<String>) -> Self {
        LineError {
            line,
            start: err.start,
            end: err.end,
            code: err.code,
            details,
        }
    }
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.details {
            Some(ref details) => write!(
                f,
                "line {}:{}:{}: {} in '{}'",
                self.line, self.start, self.end, self.code, details
            ),
            None => write!(
                f,
                "line {}:{}:{}: {}",
                self.line, self.start, self.end, self.code
            ),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Schema,
    Graph,
    Editor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl From<LineError> for Error {
    fn from(err: LineError) -> Self {
        let details = match err.details {
            Some(ref line) => format!("line {}: '{}'", err.line, line),
            None => format!("line {}", err.line),
        };
        Error {
            kind: ErrorKind::Parse,
            code: err.code,
            details: Some(details),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Parse => "ParseError",
            ErrorKind::Schema => "SchemaError",
            ErrorKind::Graph => "GraphError",
            ErrorKind::Editor => "EditorError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;
pub type LineResult<T> = result::Result<T, LineError>;

#[macro_export]
macro_rules! graph_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Graph, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Graph, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! schema_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Schema, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Schema, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! editor_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Editor, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Editor, ErrorCode::$code, None))
    }};
}
