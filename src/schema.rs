// Copyright 2026 The Rulegraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::Deserialize;

use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::datamodel::Table;
use crate::schema_err;

/// The schema-lookup collaborator: one request per table name, answered
/// by the backend with an ordered column list.
pub trait SchemaSource {
    fn get_table_schema(&self, table: &str) -> Result<Vec<String>>;
}

/// The backend's schema response body, `{"schema": ["col", ...]}`.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
pub struct SchemaResponse {
    pub schema: Vec<String>,
}

pub fn parse_schema_response(body: &str) -> Result<Vec<String>> {
    let resp: SchemaResponse = serde_json::from_str(body).map_err(|err| {
        Error::new(
            ErrorKind::Schema,
            ErrorCode::SchemaFetch,
            Some(err.to_string()),
        )
    })?;
    Ok(resp.schema)
}

/// Resolve both table schemas, then construct the pair: neither table is
/// bound until both lookups have succeeded, so a graph is never built
/// over a half-resolved schema. A missing second name (or one equal to
/// the first) is a self-join and binds both sides to the same schema.
pub fn bind_pair(
    source: &dyn SchemaSource,
    name1: &str,
    name2: Option<&str>,
) -> Result<(Table, Table)> {
    if name1.is_empty() {
        return schema_err!(NoTableSelected);
    }

    let name2 = match name2 {
        Some(n) if !n.is_empty() && n != name1 => n,
        _ => name1,
    };

    let columns1 = fetch(source, name1)?;
    let columns2 = if name2 == name1 {
        columns1.clone()
    } else {
        fetch(source, name2)?
    };

    let table1 = Table::new(name1, columns1)?;
    let table2 = Table::new(name2, columns2)?;
    Ok((table1, table2))
}

fn fetch(source: &dyn SchemaSource, name: &str) -> Result<Vec<String>> {
    source.get_table_schema(name).map_err(|err| {
        Error::new(
            ErrorKind::Schema,
            ErrorCode::SchemaFetch,
            Some(format!("{}: {}", name, err)),
        )
    })
}

/// Holder for the bound table pair of one open editor, with a stale
/// response guard: each (re)bind attempt gets an epoch, and results
/// delivered for a superseded epoch are dropped. Closing the editor
/// invalidates the current epoch, so late schema responses are no-ops.
#[derive(Default)]
pub struct SchemaBinding {
    epoch: u64,
    tables: Option<(Table, Table)>,
}

impl SchemaBinding {
    pub fn new() -> SchemaBinding {
        Default::default()
    }

    /// Start a new bind attempt, invalidating any outstanding one.
    pub fn begin(&mut self) -> u64 {
        self.epoch += 1;
        self.tables = None;
        self.epoch
    }

    /// Deliver the result of a bind attempt. Returns `StaleSchema` if
    /// the attempt has been superseded or the editor was closed.
    pub fn complete(&mut self, epoch: u64, tables: (Table, Table)) -> Result<()> {
        if epoch != self.epoch {
            return schema_err!(StaleSchema);
        }
        self.tables = Some(tables);
        Ok(())
    }

    /// Discard any bound tables and outstanding attempts.
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        self.tables = None;
    }

    pub fn is_bound(&self) -> bool {
        self.tables.is_some()
    }

    pub fn tables(&self) -> Result<&(Table, Table)> {
        match self.tables {
            Some(ref pair) => Ok(pair),
            None => schema_err!(TableUnbound),
        }
    }
}
