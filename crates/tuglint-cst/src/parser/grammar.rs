// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recursive-descent statement grammar.
//!
//! The parser consumes the token stream left to right with one token of
//! lookahead (two for keyword arguments and decorators). Every token lands in
//! exactly one node's parts, so rendering the result reproduces the input.

use std::sync::Arc;

use tuglint_core::text::byte_offset_to_position;

use crate::nodes::{Child, Node, NodeKind, Part, Presence, PunctRole, Slot, Token};
use crate::parser::errors::SyntaxError;
use crate::tokenizer::{LexToken, TokType};

pub(crate) type Result<T> = std::result::Result<T, SyntaxError>;

/// Reserved words that cannot be used as names.
pub(crate) const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

pub(crate) const AUGMENTED_ASSIGN: &[&str] = &[
    "+=", "-=", "*=", "/=", "//=", "%=", "@=", "&=", "|=", "^=", ">>=", "<<=", "**=",
];

pub(crate) fn tok(token: Token) -> Part {
    Part::Token(token)
}

pub(crate) fn one(slot: Slot, node: Node) -> Part {
    Part::Slot(slot, Child::One(Arc::new(node)))
}

pub(crate) fn opt(slot: Slot, node: Option<Node>) -> Part {
    Part::Slot(slot, Child::Opt(node.map(Arc::new)))
}

pub(crate) fn seq(slot: Slot, nodes: Vec<Node>) -> Part {
    Part::Slot(slot, Child::Seq(nodes.into_iter().map(Arc::new).collect()))
}

pub(crate) fn punct(role: PunctRole, token: Option<Token>) -> Part {
    Part::Punct(
        role,
        token.map(Presence::Present).unwrap_or(Presence::Absent),
    )
}

pub(crate) struct Parser<'t> {
    source: &'t str,
    tokens: Vec<LexToken>,
    pos: usize,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(source: &'t str, tokens: Vec<LexToken>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    pub(crate) fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// The token `n` places ahead. The stream always ends with `EndMarker`,
    /// which is returned for any look past the end.
    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        let index = (self.pos + n).min(self.tokens.len().saturating_sub(1));
        &self.tokens[index].token
    }

    pub(crate) fn at_kind(&self, kind: TokType) -> bool {
        self.peek().kind == kind
    }

    /// Whether the next token is the operator or keyword `text`.
    pub(crate) fn at(&self, text: &str) -> bool {
        let token = self.peek();
        matches!(token.kind, TokType::Op | TokType::Name) && token.text == text
    }

    pub(crate) fn at_any(&self, texts: &[&str]) -> bool {
        texts.iter().any(|text| self.at(text))
    }

    pub(crate) fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn eat(&mut self, text: &str) -> Option<Token> {
        self.at(text).then(|| self.bump())
    }

    pub(crate) fn expect(&mut self, text: &str) -> Result<Token> {
        if self.at(text) {
            Ok(self.bump())
        } else {
            Err(self.error(format!("'{}'", text)))
        }
    }

    pub(crate) fn expect_kind(&mut self, kind: TokType) -> Result<Token> {
        if self.at_kind(kind) {
            Ok(self.bump())
        } else {
            Err(self.error(kind.to_string()))
        }
    }

    pub(crate) fn error(&self, expected: impl Into<String>) -> SyntaxError {
        let index = self.pos.min(self.tokens.len().saturating_sub(1));
        let (found, offset) = match self.tokens.get(index) {
            Some(lex) if lex.token.text.is_empty() || is_structural(lex.token.kind) => {
                (lex.token.kind.to_string(), lex.start)
            }
            Some(lex) => (format!("'{}'", lex.token.text), lex.start),
            None => (TokType::EndMarker.to_string(), self.source.len()),
        };
        let (line, col) = byte_offset_to_position(self.source, offset);
        SyntaxError {
            expected: expected.into(),
            found,
            offset,
            line,
            col,
        }
    }

    /// A name that is not a reserved word.
    pub(crate) fn at_identifier(&self) -> bool {
        let token = self.peek();
        token.kind == TokType::Name && !KEYWORDS.contains(&token.text.as_str())
    }

    pub(crate) fn name(&mut self) -> Result<Node> {
        if self.at_identifier() {
            Ok(Node::leaf(NodeKind::Name, self.bump()))
        } else {
            Err(self.error("identifier"))
        }
    }

    /// An optional separating comma, as a punctuation part.
    pub(crate) fn comma(&mut self) -> Part {
        punct(PunctRole::Comma, self.eat(","))
    }

    pub(crate) fn at_end_of_line(&self) -> bool {
        self.at_kind(TokType::Newline) || self.at_kind(TokType::EndMarker) || self.at(";")
    }

    // ------------------------------------------------------------------
    // Module and blocks
    // ------------------------------------------------------------------

    pub(crate) fn module(&mut self) -> Result<Node> {
        let mut body = Vec::new();
        while !self.at_kind(TokType::EndMarker) {
            body.push(self.statement()?);
        }
        let end = self.expect_kind(TokType::EndMarker)?;
        Ok(Node::new(
            NodeKind::Module,
            vec![seq(Slot::Body, body), tok(end)],
        ))
    }

    pub(crate) fn statement(&mut self) -> Result<Node> {
        if self.at("@") {
            return self.decorated();
        }
        if self.at_compound_keyword() {
            return self.compound_statement(Vec::new());
        }
        self.simple_statement_line()
    }

    fn at_compound_keyword(&self) -> bool {
        self.at_any(&["if", "while", "for", "try", "with", "def", "class"])
            || (self.at("async") && matches!(self.peek_nth(1).text.as_str(), "def" | "for" | "with"))
    }

    fn compound_statement(&mut self, decorators: Vec<Node>) -> Result<Node> {
        let async_token = self.eat("async");
        if self.at("def") {
            return self.function_def(decorators, async_token);
        }
        if !decorators.is_empty() {
            if async_token.is_some() {
                return Err(self.error("'def'"));
            }
            return self.class_def(decorators);
        }
        let keyword = self.peek().text.clone();
        match keyword.as_str() {
            "for" => self.for_stmt(async_token),
            "with" => self.with_stmt(async_token),
            _ if async_token.is_some() => Err(self.error("'def', 'for' or 'with'")),
            "if" => self.if_stmt(),
            "while" => self.while_stmt(),
            "try" => self.try_stmt(),
            "class" => self.class_def(decorators),
            _ => Err(self.error("compound statement")),
        }
    }

    /// A statement body after `:`: an indented block or statements on the
    /// same line.
    pub(crate) fn block(&mut self) -> Result<Node> {
        if !self.at_kind(TokType::Newline) {
            let (body, newline) = self.small_statements()?;
            return Ok(Node::new(
                NodeKind::SimpleStatementSuite,
                vec![seq(Slot::Body, body), tok(newline)],
            ));
        }
        let newline = self.bump();
        let indent = self.expect_kind(TokType::Indent)?;
        let mut body = Vec::new();
        while !self.at_kind(TokType::Dedent) {
            if self.at_kind(TokType::EndMarker) {
                return Err(self.error(TokType::Dedent.to_string()));
            }
            body.push(self.statement()?);
        }
        let dedent = self.bump();
        Ok(Node::new(
            NodeKind::IndentedBlock,
            vec![tok(newline), tok(indent), seq(Slot::Body, body), tok(dedent)],
        ))
    }

    // ------------------------------------------------------------------
    // Simple statements
    // ------------------------------------------------------------------

    fn simple_statement_line(&mut self) -> Result<Node> {
        let (body, newline) = self.small_statements()?;
        Ok(Node::new(
            NodeKind::SimpleStatementLine,
            vec![seq(Slot::Body, body), tok(newline)],
        ))
    }

    /// `;`-separated small statements up to and including the line's
    /// `Newline`.
    fn small_statements(&mut self) -> Result<(Vec<Node>, Token)> {
        let mut body = Vec::new();
        loop {
            let mut stmt = self.small_statement()?;
            let semicolon = self.eat(";");
            let more = semicolon.is_some() && !self.at_kind(TokType::Newline);
            stmt.parts.push(punct(PunctRole::Semicolon, semicolon));
            body.push(stmt);
            if !more {
                break;
            }
        }
        let newline = self.expect_kind(TokType::Newline)?;
        Ok((body, newline))
    }

    fn small_statement(&mut self) -> Result<Node> {
        let keyword = self.peek().text.clone();
        if self.at_kind(TokType::Name) {
            match keyword.as_str() {
                "pass" => return Ok(self.keyword_statement(NodeKind::Pass)),
                "break" => return Ok(self.keyword_statement(NodeKind::Break)),
                "continue" => return Ok(self.keyword_statement(NodeKind::Continue)),
                "return" => return self.return_stmt(),
                "raise" => return self.raise_stmt(),
                "global" => return self.names_stmt(NodeKind::Global),
                "nonlocal" => return self.names_stmt(NodeKind::Nonlocal),
                "del" => return self.del_stmt(),
                "import" => return self.import_stmt(),
                "from" => return self.import_from_stmt(),
                "assert" => return self.assert_stmt(),
                _ => {}
            }
        }
        self.expression_statement()
    }

    fn keyword_statement(&mut self, kind: NodeKind) -> Node {
        Node::new(kind, vec![tok(self.bump())])
    }

    fn return_stmt(&mut self) -> Result<Node> {
        let keyword = self.bump();
        let value = if self.at_end_of_line() {
            None
        } else {
            Some(self.star_expressions()?)
        };
        Ok(Node::new(
            NodeKind::Return,
            vec![tok(keyword), opt(Slot::Value, value)],
        ))
    }

    fn raise_stmt(&mut self) -> Result<Node> {
        let keyword = self.bump();
        let mut exc = None;
        let mut cause = None;
        if !self.at_end_of_line() {
            exc = Some(self.expression()?);
            if self.at("from") {
                let from = self.bump();
                let item = self.expression()?;
                cause = Some(Node::new(NodeKind::From, vec![tok(from), one(Slot::Item, item)]));
            }
        }
        Ok(Node::new(
            NodeKind::Raise,
            vec![tok(keyword), opt(Slot::Exc, exc), opt(Slot::Cause, cause)],
        ))
    }

    fn names_stmt(&mut self, kind: NodeKind) -> Result<Node> {
        let keyword = self.bump();
        let mut names = Vec::new();
        loop {
            let name = self.name()?;
            let comma = self.comma();
            let done = matches!(comma, Part::Punct(_, Presence::Absent));
            names.push(Node::new(NodeKind::NameItem, vec![one(Slot::Name, name), comma]));
            if done {
                break;
            }
        }
        Ok(Node::new(kind, vec![tok(keyword), seq(Slot::Names, names)]))
    }

    fn del_stmt(&mut self) -> Result<Node> {
        let keyword = self.bump();
        let target = self.expression_list(Self::bitwise_or, false)?;
        Ok(Node::new(
            NodeKind::Del,
            vec![tok(keyword), one(Slot::Target, target)],
        ))
    }

    fn assert_stmt(&mut self) -> Result<Node> {
        let keyword = self.bump();
        let test = self.expression()?;
        let comma = self.eat(",");
        let msg = if comma.is_some() {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(Node::new(
            NodeKind::Assert,
            vec![
                tok(keyword),
                one(Slot::Test, test),
                punct(PunctRole::Comma, comma),
                opt(Slot::Msg, msg),
            ],
        ))
    }

    /// `a.b.c` as nested attributes.
    fn dotted_name(&mut self) -> Result<Node> {
        let mut node = self.name()?;
        while self.at(".") {
            let dot = self.bump();
            let attr = self.name()?;
            node = Node::new(
                NodeKind::Attribute,
                vec![one(Slot::Value, node), tok(dot), one(Slot::Attr, attr)],
            );
        }
        Ok(node)
    }

    fn as_name(&mut self, target: fn(&mut Self) -> Result<Node>) -> Result<Option<Node>> {
        let Some(keyword) = self.eat("as") else {
            return Ok(None);
        };
        let name = target(self)?;
        Ok(Some(Node::new(
            NodeKind::AsName,
            vec![tok(keyword), one(Slot::Name, name)],
        )))
    }

    fn import_alias(&mut self, dotted: bool) -> Result<Node> {
        let name = if dotted {
            self.dotted_name()?
        } else {
            self.name()?
        };
        let as_name = self.as_name(Self::name)?;
        let comma = self.comma();
        Ok(Node::new(
            NodeKind::ImportAlias,
            vec![one(Slot::Name, name), opt(Slot::AsName, as_name), comma],
        ))
    }

    fn import_stmt(&mut self) -> Result<Node> {
        let keyword = self.bump();
        let mut names = vec![self.import_alias(true)?];
        while has_comma(names.last()) {
            names.push(self.import_alias(true)?);
        }
        Ok(Node::new(
            NodeKind::Import,
            vec![tok(keyword), seq(Slot::Names, names)],
        ))
    }

    fn import_from_stmt(&mut self) -> Result<Node> {
        let mut parts = vec![tok(self.bump())];
        let mut relative = false;
        while self.at_any(&[".", "..."]) {
            parts.push(tok(self.bump()));
            relative = true;
        }
        let module = if self.at("import") && relative {
            None
        } else {
            Some(self.dotted_name()?)
        };
        parts.push(opt(Slot::Module, module));
        parts.push(tok(self.expect("import")?));

        if let Some(star) = self.eat("*") {
            parts.push(punct(PunctRole::LeftParen, None));
            parts.push(seq(
                Slot::Names,
                vec![Node::new(NodeKind::ImportStar, vec![tok(star)])],
            ));
            parts.push(punct(PunctRole::RightParen, None));
        } else {
            let lpar = self.eat("(");
            let mut names = vec![self.import_alias(false)?];
            while has_comma(names.last()) && !(lpar.is_some() && self.at(")")) {
                names.push(self.import_alias(false)?);
            }
            if lpar.is_none() && has_comma(names.last()) {
                return Err(self.error("import name"));
            }
            let rpar = match lpar {
                Some(_) => Some(self.expect(")")?),
                None => None,
            };
            parts.push(punct(PunctRole::LeftParen, lpar));
            parts.push(seq(Slot::Names, names));
            parts.push(punct(PunctRole::RightParen, rpar));
        }
        Ok(Node::new(NodeKind::ImportFrom, parts))
    }

    /// Expression statements and every form of assignment.
    fn expression_statement(&mut self) -> Result<Node> {
        let first = if self.at("yield") {
            self.yield_expr()?
        } else {
            self.star_expressions()?
        };

        if self.at("=") {
            let mut targets = Vec::new();
            let mut current = first;
            while self.at("=") {
                let equal = self.bump();
                targets.push(Node::new(
                    NodeKind::AssignTarget,
                    vec![one(Slot::Target, current), tok(equal)],
                ));
                current = self.assignment_value()?;
            }
            return Ok(Node::new(
                NodeKind::Assign,
                vec![seq(Slot::Targets, targets), one(Slot::Value, current)],
            ));
        }

        if self.at_any(AUGMENTED_ASSIGN) {
            let operator = Node::leaf(NodeKind::Operator, self.bump());
            let value = self.assignment_value()?;
            return Ok(Node::new(
                NodeKind::AugAssign,
                vec![
                    one(Slot::Target, first),
                    one(Slot::Operator, operator),
                    one(Slot::Value, value),
                ],
            ));
        }

        if self.at(":") {
            let colon = self.bump();
            let annotation = self.expression()?;
            let equal = self.eat("=");
            let value = if equal.is_some() {
                Some(self.assignment_value()?)
            } else {
                None
            };
            return Ok(Node::new(
                NodeKind::AnnAssign,
                vec![
                    one(Slot::Target, first),
                    one(
                        Slot::Annotation,
                        Node::new(
                            NodeKind::Annotation,
                            vec![tok(colon), one(Slot::Annotation, annotation)],
                        ),
                    ),
                    punct(PunctRole::Equal, equal),
                    opt(Slot::Value, value),
                ],
            ));
        }

        Ok(Node::new(NodeKind::Expr, vec![one(Slot::Value, first)]))
    }

    fn assignment_value(&mut self) -> Result<Node> {
        if self.at("yield") {
            self.yield_expr()
        } else {
            self.star_expressions()
        }
    }

    // ------------------------------------------------------------------
    // Compound statements
    // ------------------------------------------------------------------

    fn decorated(&mut self) -> Result<Node> {
        let mut decorators = Vec::new();
        while self.at("@") {
            let at = self.bump();
            let expr = self.named_expression()?;
            let newline = self.expect_kind(TokType::Newline)?;
            decorators.push(Node::new(
                NodeKind::Decorator,
                vec![tok(at), one(Slot::Decorator, expr), tok(newline)],
            ));
        }
        if !(self.at_any(&["def", "class"]) || (self.at("async") && self.peek_nth(1).text == "def"))
        {
            return Err(self.error("'def' or 'class'"));
        }
        self.compound_statement(decorators)
    }

    fn or_else(&mut self) -> Result<Option<Node>> {
        let Some(keyword) = self.eat("else") else {
            return Ok(None);
        };
        let colon = self.expect(":")?;
        let body = self.block()?;
        Ok(Some(Node::new(
            NodeKind::Else,
            vec![tok(keyword), tok(colon), one(Slot::Body, body)],
        )))
    }

    fn if_stmt(&mut self) -> Result<Node> {
        let keyword = self.bump();
        let test = self.named_expression()?;
        let colon = self.expect(":")?;
        let body = self.block()?;
        let or_else = if self.at("elif") {
            Some(self.if_stmt()?)
        } else {
            self.or_else()?
        };
        Ok(Node::new(
            NodeKind::If,
            vec![
                tok(keyword),
                one(Slot::Test, test),
                tok(colon),
                one(Slot::Body, body),
                opt(Slot::OrElse, or_else),
            ],
        ))
    }

    fn while_stmt(&mut self) -> Result<Node> {
        let keyword = self.bump();
        let test = self.named_expression()?;
        let colon = self.expect(":")?;
        let body = self.block()?;
        let or_else = self.or_else()?;
        Ok(Node::new(
            NodeKind::While,
            vec![
                tok(keyword),
                one(Slot::Test, test),
                tok(colon),
                one(Slot::Body, body),
                opt(Slot::OrElse, or_else),
            ],
        ))
    }

    fn for_stmt(&mut self, async_token: Option<Token>) -> Result<Node> {
        let mut parts: Vec<Part> = async_token.into_iter().map(tok).collect();
        parts.push(tok(self.expect("for")?));
        parts.push(one(Slot::Target, self.star_targets()?));
        parts.push(tok(self.expect("in")?));
        parts.push(one(Slot::Iter, self.star_expressions()?));
        parts.push(tok(self.expect(":")?));
        parts.push(one(Slot::Body, self.block()?));
        parts.push(opt(Slot::OrElse, self.or_else()?));
        Ok(Node::new(NodeKind::For, parts))
    }

    fn with_stmt(&mut self, async_token: Option<Token>) -> Result<Node> {
        let mut parts: Vec<Part> = async_token.into_iter().map(tok).collect();
        parts.push(tok(self.expect("with")?));
        let mut items = Vec::new();
        loop {
            let item = self.expression()?;
            let as_name = self.as_name(Self::star_target)?;
            let comma = self.comma();
            let done = matches!(comma, Part::Punct(_, Presence::Absent));
            items.push(Node::new(
                NodeKind::WithItem,
                vec![one(Slot::Item, item), opt(Slot::AsName, as_name), comma],
            ));
            if done {
                break;
            }
        }
        parts.push(seq(Slot::Items, items));
        parts.push(tok(self.expect(":")?));
        parts.push(one(Slot::Body, self.block()?));
        Ok(Node::new(NodeKind::With, parts))
    }

    fn try_stmt(&mut self) -> Result<Node> {
        let keyword = self.bump();
        let colon = self.expect(":")?;
        let body = self.block()?;

        let mut handlers = Vec::new();
        while self.at("except") {
            let except = self.bump();
            let (exc, as_name) = if self.at(":") {
                (None, None)
            } else {
                let exc = self.expression()?;
                (Some(exc), self.as_name(Self::name)?)
            };
            let colon = self.expect(":")?;
            let body = self.block()?;
            handlers.push(Node::new(
                NodeKind::ExceptHandler,
                vec![
                    tok(except),
                    opt(Slot::Exc, exc),
                    opt(Slot::AsName, as_name),
                    tok(colon),
                    one(Slot::Body, body),
                ],
            ));
        }
        let or_else = if handlers.is_empty() {
            None
        } else {
            self.or_else()?
        };
        let final_body = match self.eat("finally") {
            Some(finally) => {
                let colon = self.expect(":")?;
                let body = self.block()?;
                Some(Node::new(
                    NodeKind::Finally,
                    vec![tok(finally), tok(colon), one(Slot::Body, body)],
                ))
            }
            None => None,
        };
        if handlers.is_empty() && final_body.is_none() {
            return Err(self.error("'except' or 'finally'"));
        }
        Ok(Node::new(
            NodeKind::Try,
            vec![
                tok(keyword),
                tok(colon),
                one(Slot::Body, body),
                seq(Slot::Handlers, handlers),
                opt(Slot::OrElse, or_else),
                opt(Slot::FinalBody, final_body),
            ],
        ))
    }

    fn function_def(&mut self, decorators: Vec<Node>, async_token: Option<Token>) -> Result<Node> {
        let mut parts = vec![seq(Slot::Decorators, decorators)];
        parts.extend(async_token.map(tok));
        parts.push(tok(self.expect("def")?));
        parts.push(one(Slot::Name, self.name()?));
        parts.push(tok(self.expect("(")?));
        parts.push(one(Slot::Params, self.parameters(")", true)?));
        parts.push(tok(self.expect(")")?));
        let returns = match self.eat("->") {
            Some(arrow) => {
                let annotation = self.expression()?;
                Some(Node::new(
                    NodeKind::Annotation,
                    vec![tok(arrow), one(Slot::Annotation, annotation)],
                ))
            }
            None => None,
        };
        parts.push(opt(Slot::Returns, returns));
        parts.push(tok(self.expect(":")?));
        parts.push(one(Slot::Body, self.block()?));
        Ok(Node::new(NodeKind::FunctionDef, parts))
    }

    fn class_def(&mut self, decorators: Vec<Node>) -> Result<Node> {
        let mut parts = vec![seq(Slot::Decorators, decorators)];
        parts.push(tok(self.expect("class")?));
        parts.push(one(Slot::Name, self.name()?));

        let lpar = self.eat("(");
        let (bases, keywords, rpar) = match lpar {
            Some(_) => {
                let args = self.call_args()?;
                let rpar = self.expect(")")?;
                let split = args.iter().position(is_keyword_arg).unwrap_or(args.len());
                let mut bases = args;
                let keywords = bases.split_off(split);
                (bases, keywords, Some(rpar))
            }
            None => (Vec::new(), Vec::new(), None),
        };
        parts.push(punct(PunctRole::LeftParen, lpar));
        parts.push(seq(Slot::Bases, bases));
        parts.push(seq(Slot::Keywords, keywords));
        parts.push(punct(PunctRole::RightParen, rpar));
        parts.push(tok(self.expect(":")?));
        parts.push(one(Slot::Body, self.block()?));
        Ok(Node::new(NodeKind::ClassDef, parts))
    }

    /// Parameters up to (not including) `closing`.
    pub(crate) fn parameters(&mut self, closing: &str, annotations: bool) -> Result<Node> {
        let mut params = Vec::new();
        while !self.at(closing) {
            let param = if let Some(slash) = self.eat("/") {
                Node::new(NodeKind::ParamSlash, vec![tok(slash), self.comma()])
            } else if self.at("*")
                && (self.peek_nth(1).text == "," || self.peek_nth(1).text == closing)
            {
                let star = self.bump();
                Node::new(NodeKind::ParamStar, vec![tok(star), self.comma()])
            } else {
                self.param(annotations)?
            };
            let done = matches!(param.separator(), Some((_, Presence::Absent)));
            params.push(param);
            if done {
                break;
            }
        }
        Ok(Node::new(NodeKind::Parameters, vec![seq(Slot::Params, params)]))
    }

    fn param(&mut self, annotations: bool) -> Result<Node> {
        let star = if self.at_any(&["*", "**"]) {
            Some(self.bump())
        } else {
            None
        };
        let mut parts: Vec<Part> = star.into_iter().map(tok).collect();
        parts.push(one(Slot::Name, self.name()?));

        let annotation = if annotations && self.at(":") {
            let colon = self.bump();
            let expr = self.expression()?;
            Some(Node::new(
                NodeKind::Annotation,
                vec![tok(colon), one(Slot::Annotation, expr)],
            ))
        } else {
            None
        };
        parts.push(opt(Slot::Annotation, annotation));

        let equal = self.eat("=");
        let default = if equal.is_some() {
            Some(self.expression()?)
        } else {
            None
        };
        parts.push(punct(PunctRole::Equal, equal));
        parts.push(opt(Slot::Default, default));
        parts.push(self.comma());
        Ok(Node::new(NodeKind::Param, parts))
    }
}

/// Whether a comma-separated element ended with a comma.
pub(crate) fn has_comma(node: Option<&Node>) -> bool {
    matches!(
        node.and_then(Node::separator),
        Some((_, Presence::Present(_)))
    )
}

fn is_structural(kind: TokType) -> bool {
    matches!(
        kind,
        TokType::Newline | TokType::Indent | TokType::Dedent | TokType::EndMarker
    )
}

/// Keyword arguments and `**` unpacking start a class's keyword list.
fn is_keyword_arg(arg: &Node) -> bool {
    arg.has(Slot::Keyword) || arg.tokens().any(|t| t.text == "**")
}
