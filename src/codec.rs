// Copyright 2026 The Rulegraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The predicate program codec: the line-oriented DSL exchanged with the
//! backend rule engine. One predicate per line,
//! `OP(T1.C1,T2.C2)CMP VALUE` with no space before the operand, e.g.
//! `EQ(source.name,target.title)=1`. Decoding is strict: a malformed
//! non-empty line fails the whole parse with its 1-based line number
//! rather than being silently dropped.

use crate::common::ErrorCode::*;
use crate::common::{LineError, LineResult, SpanError};
use crate::datamodel::{Comparator, Connection, Pin, PredicateProps, SimilarityOp, Table, TableSide};
use crate::token::{Lexer, Spanned, Token};

/// Parse a newline-delimited predicate program against a bound pair of
/// tables. Empty lines are skipped; they neither error nor produce a
/// predicate. A line repeating an earlier line's ordered (left, right)
/// pin pair fails the parse: the pair's redraw key must stay unique or
/// keyed removal/update would touch the wrong connections.
pub fn parse(program: &str, table1: &Table, table2: &Table) -> LineResult<Vec<Connection>> {
    let mut conns: Vec<Connection> = Vec::new();
    for (i, line) in program.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let conn = parse_line(line, table1, table2)
            .map_err(|err| LineError::new(i as u32 + 1, err, Some(line.to_string())))?;
        if conns.iter().any(|c| c.same_pins(&conn)) {
            return Err(LineError::new(
                i as u32 + 1,
                SpanError::new(DuplicateConnection, 0, line.len()),
                Some(line.to_string()),
            ));
        }
        conns.push(conn);
    }
    Ok(conns)
}

/// Serialize connections in insertion order, preserving the left/right
/// convention each connection was created with. An empty slice yields
/// an empty string.
pub fn serialize(conns: &[Connection], table1: &Table, table2: &Table) -> String {
    let table_for = |side: TableSide| match side {
        TableSide::Left => table1,
        TableSide::Right => table2,
    };

    let mut out = String::new();
    for conn in conns {
        out.push_str(conn.props.op.as_str());
        out.push('(');
        out.push_str(&table_for(conn.left.side).name);
        out.push('.');
        out.push_str(&conn.left.column_name);
        out.push(',');
        out.push_str(&table_for(conn.right.side).name);
        out.push('.');
        out.push_str(&conn.right.column_name);
        out.push(')');
        out.push_str(conn.props.cmp.as_str());
        out.push_str(&conn.props.operand);
        out.push('\n');
    }
    out
}

struct LineParser<'input> {
    toks: Vec<Spanned<Token<'input>>>,
    pos: usize,
    len: usize,
}

impl<'input> LineParser<'input> {
    fn new(line: &'input str) -> Result<Self, SpanError> {
        let toks = Lexer::new(line).collect::<Result<Vec<_>, SpanError>>()?;
        Ok(LineParser {
            toks,
            pos: 0,
            len: line.len(),
        })
    }

    fn next(&mut self) -> Option<Spanned<Token<'input>>> {
        let tok = self.toks.get(self.pos).copied();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eof(&self) -> SpanError {
        SpanError::new(UnexpectedEof, self.len, self.len)
    }

    fn operator(&mut self) -> Result<SimilarityOp, SpanError> {
        match self.next() {
            Some((_, Token::Op(op), _)) => Ok(op),
            Some((start, _, end)) => Err(SpanError::new(ExpectedOperator, start, end)),
            None => Err(self.eof()),
        }
    }

    fn comparator(&mut self) -> Result<Comparator, SpanError> {
        match self.next() {
            Some((_, Token::Cmp(cmp), _)) => Ok(cmp),
            Some((start, _, end)) => Err(SpanError::new(ExpectedComparator, start, end)),
            None => Err(self.eof()),
        }
    }

    fn operand(&mut self) -> Result<&'input str, SpanError> {
        match self.next() {
            Some((_, Token::Num(n), _)) => Ok(n),
            Some((start, _, end)) => Err(SpanError::new(ExpectedNumber, start, end)),
            None => Err(self.eof()),
        }
    }

    // an operator literal in name position is an ordinary identifier
    // (nothing stops a table from having a column called EQ)
    fn ident(&mut self) -> Result<Spanned<&'input str>, SpanError> {
        match self.next() {
            Some((start, Token::Ident(id), end)) => Ok((start, id, end)),
            Some((start, Token::Op(op), end)) => Ok((start, op.as_str(), end)),
            Some((start, _, end)) => Err(SpanError::new(ExpectedIdent, start, end)),
            None => Err(self.eof()),
        }
    }

    fn punct(&mut self, expected: Token) -> Result<(), SpanError> {
        match self.next() {
            Some((_, tok, _)) if tok == expected => Ok(()),
            Some((start, _, end)) => Err(SpanError::new(UnexpectedToken, start, end)),
            None => Err(self.eof()),
        }
    }

    fn finish(&mut self) -> Result<(), SpanError> {
        match self.next() {
            None => Ok(()),
            Some((start, _, end)) => Err(SpanError::new(ExtraToken, start, end)),
        }
    }
}

fn parse_line(line: &str, table1: &Table, table2: &Table) -> Result<Connection, SpanError> {
    let mut p = LineParser::new(line)?;

    let op = p.operator()?;
    p.punct(Token::LParen)?;
    let first_table = p.ident()?;
    p.punct(Token::Dot)?;
    let first_column = p.ident()?;
    p.punct(Token::Comma)?;
    let second_table = p.ident()?;
    p.punct(Token::Dot)?;
    let second_column = p.ident()?;
    p.punct(Token::RParen)?;
    let cmp = p.comparator()?;
    let operand = p.operand()?;
    p.finish()?;

    // sides are assigned by which bound table the line actually names,
    // not by textual position; a name matching neither table is a hard
    // error (no silent fallback to table2)
    let (first_side, second_side) = if first_table.1 == table1.name {
        (TableSide::Left, TableSide::Right)
    } else if first_table.1 == table2.name {
        (TableSide::Right, TableSide::Left)
    } else {
        return Err(SpanError::new(UnknownTable, first_table.0, first_table.2));
    };

    let expected_second = match second_side {
        TableSide::Left => &table1.name,
        TableSide::Right => &table2.name,
    };
    if second_table.1 != *expected_second {
        return Err(SpanError::new(UnknownTable, second_table.0, second_table.2));
    }

    let left = resolve_pin(first_side, first_column, table1, table2)?;
    let right = resolve_pin(second_side, second_column, table1, table2)?;

    Ok(Connection::new(
        left,
        right,
        PredicateProps {
            op,
            cmp,
            operand: operand.to_string(),
        },
    ))
}

fn resolve_pin(
    side: TableSide,
    column: Spanned<&str>,
    table1: &Table,
    table2: &Table,
) -> Result<Pin, SpanError> {
    let table = match side {
        TableSide::Left => table1,
        TableSide::Right => table2,
    };
    match table.column_index(column.1) {
        Some(index) => Ok(Pin::new(side, index, column.1)),
        None => Err(SpanError::new(UnknownColumn, column.0, column.2)),
    }
}
