// Copyright 2026 The Rulegraph Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Rule-type dispatch: each `RuleType` gets an editor that can produce
//! the rule's code text on save. Only ER rules are graph-backed; the
//! other types pass their code through verbatim.

use crate::common::Result;
use crate::datamodel::{Rule, RuleType};
use crate::editor_err;
use crate::graph::RuleGraph;
use crate::schema::{SchemaSource, bind_pair};

pub trait RuleEditor {
    /// The code text this editor would save, or `None` when it holds
    /// nothing worth saving (e.g. an ER editor with no predicates).
    fn value(&self) -> Option<String>;
    fn rule_type(&self) -> RuleType;
}

/// The graph-backed entity-resolution editor. Binding resolves both
/// table schemas up front; stored code is decoded into the graph, and
/// malformed stored code is surfaced rather than silently dropped.
#[derive(Debug)]
pub struct ErEditor {
    graph: RuleGraph,
}

impl ErEditor {
    pub fn new(source: &dyn SchemaSource, rule: &Rule) -> Result<ErEditor> {
        let (table1, table2) = bind_pair(source, &rule.table1, rule.table2.as_deref())?;
        let graph = if rule.code.is_empty() {
            RuleGraph::new(table1, table2)
        } else {
            RuleGraph::from_program(table1, table2, &rule.code)?
        };
        Ok(ErEditor { graph })
    }

    pub fn graph(&self) -> &RuleGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut RuleGraph {
        &mut self.graph
    }
}

impl RuleEditor for ErEditor {
    fn value(&self) -> Option<String> {
        if self.graph.is_empty() {
            None
        } else {
            Some(self.graph.encode())
        }
    }

    fn rule_type(&self) -> RuleType {
        RuleType::Er
    }
}

/// Free-text passthrough editor for FD, DC and UDF rules.
pub struct TextEditor {
    rule_type: RuleType,
    code: String,
}

impl TextEditor {
    pub fn new(rule_type: RuleType, code: &str) -> TextEditor {
        TextEditor {
            rule_type,
            code: code.to_string(),
        }
    }

    pub fn set_code(&mut self, code: &str) {
        self.code = code.to_string();
    }
}

impl RuleEditor for TextEditor {
    fn value(&self) -> Option<String> {
        if self.code.trim().is_empty() {
            None
        } else {
            Some(self.code.clone())
        }
    }

    fn rule_type(&self) -> RuleType {
        self.rule_type
    }
}

/// Construct the editor matching a rule's type.
pub fn editor_for(source: &dyn SchemaSource, rule: &Rule) -> Result<Box<dyn RuleEditor>> {
    match rule.rule_type {
        RuleType::Er => Ok(Box::new(ErEditor::new(source, rule)?)),
        ty => Ok(Box::new(TextEditor::new(ty, &rule.code))),
    }
}

/// The backend contract beyond schema lookup: persist a rule, have the
/// server generate its source, or verify a UDF's code.
pub trait Requester: SchemaSource {
    fn create_rule(&self, rule: &Rule) -> Result<()>;
    fn do_generate(&self, rule: &Rule) -> Result<String>;
    fn do_verify(&self, rule: &Rule) -> Result<()>;
}

/// Validate the form fields and assemble a `Rule` for submission. A
/// second table equal to the first (or blank) collapses to `None`.
pub fn build_rule(
    name: &str,
    rule_type: RuleType,
    table1: &str,
    table2: Option<&str>,
    code: &str,
) -> Result<Rule> {
    let name = name.trim();
    if name.is_empty() {
        return editor_err!(EmptyRuleName);
    }
    if table1.is_empty() {
        return editor_err!(NoTableSelected);
    }
    if code.trim().is_empty() {
        return editor_err!(EmptyCode);
    }

    let table2 = match table2 {
        Some(t) if !t.is_empty() && t != table1 => Some(t.to_string()),
        _ => None,
    };

    Ok(Rule {
        name: name.to_string(),
        rule_type,
        code: code.to_string(),
        table1: table1.to_string(),
        table2,
    })
}

/// Verification only applies to UDF rules, and only with code present.
pub fn verify(requester: &dyn Requester, rule: &Rule) -> Result<()> {
    if rule.rule_type != RuleType::Udf {
        return editor_err!(NotUdfRule, rule.name.clone());
    }
    if rule.code.trim().is_empty() {
        return editor_err!(EmptyCode, rule.name.clone());
    }
    requester.do_verify(rule)
}
