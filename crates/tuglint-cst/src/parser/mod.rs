// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

mod errors;
mod expression;
mod grammar;

pub use errors::{prettify_error, ParserError, SyntaxError};

use std::sync::Arc;

use crate::nodes::{Module, Node};
use crate::positions::{number_tree, PositionTable};
use crate::tokenizer::{tokenize, TokType};
use grammar::Parser;

/// A parsed module together with the source span of every node.
#[derive(Debug, Clone)]
pub struct ParsedModule {
    pub module: Module,
    pub positions: PositionTable,
}

/// Parse a whole file. Every node gets a [`NodeId`](crate::nodes::NodeId).
pub fn parse_module(text: &str) -> Result<Module, ParserError> {
    parse_module_with_positions(text).map(|parsed| parsed.module)
}

/// Parse a whole file and record node positions.
pub fn parse_module_with_positions(text: &str) -> Result<ParsedModule, ParserError> {
    let tokens = tokenize(text)?;
    tracing::trace!("tokenized {} tokens", tokens.len());
    let mut parser = Parser::new(text, tokens);
    let module = parser.module()?;
    let (module, positions) = number_tree(&module);
    Ok(ParsedModule { module, positions })
}

/// Parse a single statement, for building replacement nodes. The result has
/// no ids.
pub fn parse_statement(text: &str) -> Result<Arc<Node>, ParserError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser::new(text, tokens);
    let statement = parser.statement()?;
    parser.expect_kind(TokType::EndMarker)?;
    Ok(Arc::new(statement))
}

/// Parse a single expression (a bare tuple is allowed), for building
/// replacement nodes. The result has no ids.
pub fn parse_expression(text: &str) -> Result<Arc<Node>, ParserError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser::new(text, tokens);
    let expression = parser.star_expressions()?;
    parser.expect_kind(TokType::Newline)?;
    parser.expect_kind(TokType::EndMarker)?;
    Ok(Arc::new(expression))
}
