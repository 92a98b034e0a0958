// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A lossless Concrete Syntax Tree for Python source.
//!
//! Every byte of the input, whitespace and comments included, is attached to
//! a token in the tree, so rendering an unmodified tree reproduces the input
//! exactly. Edited trees render with only the touched regions changed.
//!
//! # Overview
//!
//! - **Parsing**: [`parse_module`] and [`parse_module_with_positions`] for
//!   whole files; [`parse_statement`] and [`parse_expression`] for building
//!   replacement fragments.
//! - **Code Generation**: the [`Codegen`] trait renders any node.
//! - **Traversal**: [`visitor::walk`] drives a [`Visitor`] with per-node and
//!   per-slot hooks.
//! - **Matching**: [`matcher`] evaluates declarative [`Pattern`]s.
//! - **Editing**: [`TreeEditor`] applies node replacements and removals.
//!
//! # Quick Start
//!
//! ```
//! use tuglint_cst::{parse_module, Codegen};
//!
//! let source = "def hello(): print('world')\n";
//! let module = parse_module(source).expect("parse error");
//! assert_eq!(module.to_source(), source);
//! ```

pub mod edit;
pub mod matcher;
pub mod nodes;
pub mod parser;
pub mod positions;
pub mod tokenizer;
pub mod visitor;

pub use edit::{EditError, EditOutcome, Replacement, TreeEditor};
pub use matcher::{m, Pattern};
pub use nodes::{
    Arity, Child, Codegen, CodegenState, Module, Node, NodeId, NodeKind, Part, Presence,
    PunctRole, SeqPos, Slot, Token,
};
pub use parser::{
    parse_expression, parse_module, parse_module_with_positions, parse_statement,
    prettify_error, ParsedModule, ParserError, SyntaxError,
};
pub use positions::PositionTable;
pub use tokenizer::{tokenize, LexError, TokType};
pub use visitor::{VisitResult, Visitor};
