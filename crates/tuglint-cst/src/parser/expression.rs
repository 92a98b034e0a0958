// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression grammar, from lowest to highest precedence.

use crate::nodes::{Node, NodeKind, Part, Presence, PunctRole, Slot, Token};
use crate::parser::grammar::{has_comma, one, opt, punct, seq, tok, Parser, Result, KEYWORDS};
use crate::tokenizer::TokType;

/// Keywords that may begin an expression.
const EXPRESSION_KEYWORDS: &[&str] = &["not", "lambda", "await"];

const COMPARISON_OPERATORS: &[&str] = &["==", "!=", "<", "<=", ">", ">=", "in", "is"];

type Rule<'t> = fn(&mut Parser<'t>) -> Result<Node>;

impl<'t> Parser<'t> {
    /// Whether the next token can start an expression.
    pub(crate) fn at_expression_start(&self) -> bool {
        let token = self.peek();
        match token.kind {
            TokType::Name => {
                !KEYWORDS.contains(&token.text.as_str())
                    || EXPRESSION_KEYWORDS.contains(&token.text.as_str())
            }
            TokType::Number | TokType::String => true,
            TokType::Op => matches!(
                token.text.as_str(),
                "(" | "[" | "{" | "-" | "+" | "~" | "*" | "..."
            ),
            _ => false,
        }
    }

    /// A comma-separated list of `item`s, optionally starred. A single item
    /// without a comma is returned as is; anything else is a bare tuple.
    pub(crate) fn expression_list(&mut self, item: Rule<'t>, starred: bool) -> Result<Node> {
        let first_is_star = starred && self.at("*");
        let first = self.list_item(item, starred)?;
        if !self.at(",") && !first_is_star {
            return Ok(first);
        }
        let mut elements = vec![self.finish_element(first, first_is_star)];
        while has_comma(elements.last()) && self.at_expression_start() {
            let is_star = starred && self.at("*");
            let value = self.list_item(item, starred)?;
            elements.push(self.finish_element(value, is_star));
        }
        if elements.len() == 1 && !has_comma(elements.last()) {
            return Err(self.error("','"));
        }
        Ok(Node::new(NodeKind::Tuple, vec![seq(Slot::Elements, elements)]))
    }

    /// One list item: a starred element (without its comma) or `item`.
    fn list_item(&mut self, item: Rule<'t>, starred: bool) -> Result<Node> {
        if starred && self.at("*") {
            let star = self.bump();
            let value = self.bitwise_or()?;
            return Ok(Node::new(
                NodeKind::StarredElement,
                vec![tok(star), one(Slot::Value, value)],
            ));
        }
        item(self)
    }

    /// Wrap a list item as an `Element` (or finish a `StarredElement`) and
    /// attach the comma that follows it.
    fn finish_element(&mut self, value: Node, is_star: bool) -> Node {
        let comma = self.comma();
        if is_star {
            let mut node = value;
            node.parts.push(comma);
            node
        } else {
            Node::new(NodeKind::Element, vec![one(Slot::Value, value), comma])
        }
    }

    pub(crate) fn star_expressions(&mut self) -> Result<Node> {
        self.expression_list(Self::expression, true)
    }

    pub(crate) fn star_targets(&mut self) -> Result<Node> {
        self.expression_list(Self::bitwise_or, true)
    }

    pub(crate) fn star_target(&mut self) -> Result<Node> {
        if self.at("(") || self.at("[") {
            return self.atom_with_trailers();
        }
        self.bitwise_or()
    }

    pub(crate) fn named_expression(&mut self) -> Result<Node> {
        if self.at_identifier() && self.peek_nth(1).text == ":=" {
            let target = self.name()?;
            let walrus = self.bump();
            let value = self.expression()?;
            return Ok(Node::new(
                NodeKind::NamedExpr,
                vec![one(Slot::Target, target), tok(walrus), one(Slot::Value, value)],
            ));
        }
        self.expression()
    }

    pub(crate) fn expression(&mut self) -> Result<Node> {
        if self.at("lambda") {
            return self.lambda();
        }
        let body = self.disjunction()?;
        if !self.at("if") {
            return Ok(body);
        }
        let if_token = self.bump();
        let test = self.disjunction()?;
        let else_token = self.expect("else")?;
        let or_else = self.expression()?;
        Ok(Node::new(
            NodeKind::IfExp,
            vec![
                one(Slot::Body, body),
                tok(if_token),
                one(Slot::Test, test),
                tok(else_token),
                one(Slot::OrElse, or_else),
            ],
        ))
    }

    fn lambda(&mut self) -> Result<Node> {
        let keyword = self.bump();
        let params = self.parameters(":", false)?;
        let colon = self.expect(":")?;
        let body = self.expression()?;
        Ok(Node::new(
            NodeKind::Lambda,
            vec![
                tok(keyword),
                one(Slot::Params, params),
                tok(colon),
                one(Slot::Body, body),
            ],
        ))
    }

    pub(crate) fn yield_expr(&mut self) -> Result<Node> {
        let keyword = self.bump();
        let value = if let Some(from) = self.eat("from") {
            let item = self.expression()?;
            Some(Node::new(NodeKind::From, vec![tok(from), one(Slot::Item, item)]))
        } else if self.at_expression_start() {
            Some(self.star_expressions()?)
        } else {
            None
        };
        Ok(Node::new(
            NodeKind::Yield,
            vec![tok(keyword), opt(Slot::Value, value)],
        ))
    }

    // ------------------------------------------------------------------
    // Boolean logic and comparisons
    // ------------------------------------------------------------------

    fn boolean_chain(&mut self, keyword: &str, operand: Rule<'t>) -> Result<Node> {
        let mut left = operand(self)?;
        while self.at(keyword) {
            let operator = Node::leaf(NodeKind::Operator, self.bump());
            let right = operand(self)?;
            left = Node::new(
                NodeKind::BooleanOperation,
                vec![
                    one(Slot::Left, left),
                    one(Slot::Operator, operator),
                    one(Slot::Right, right),
                ],
            );
        }
        Ok(left)
    }

    fn disjunction(&mut self) -> Result<Node> {
        self.boolean_chain("or", Self::conjunction)
    }

    fn conjunction(&mut self) -> Result<Node> {
        self.boolean_chain("and", Self::inversion)
    }

    fn inversion(&mut self) -> Result<Node> {
        if !self.at("not") {
            return self.comparison();
        }
        let operator = Node::leaf(NodeKind::Operator, self.bump());
        let operand = self.inversion()?;
        Ok(Node::new(
            NodeKind::UnaryOperation,
            vec![one(Slot::Operator, operator), one(Slot::Expression, operand)],
        ))
    }

    fn comparison_operator(&mut self) -> Option<Node> {
        let parts = if self.at("not") && self.peek_nth(1).text == "in" {
            vec![tok(self.bump()), tok(self.bump())]
        } else if self.at("is") {
            let is = self.bump();
            match self.eat("not") {
                Some(not) => vec![tok(is), tok(not)],
                None => vec![tok(is)],
            }
        } else if self.at_any(COMPARISON_OPERATORS) {
            vec![tok(self.bump())]
        } else {
            return None;
        };
        Some(Node::new(NodeKind::Operator, parts))
    }

    fn comparison(&mut self) -> Result<Node> {
        let left = self.bitwise_or()?;
        let mut comparisons = Vec::new();
        while let Some(operator) = self.comparison_operator() {
            let comparator = self.bitwise_or()?;
            comparisons.push(Node::new(
                NodeKind::ComparisonTarget,
                vec![one(Slot::Operator, operator), one(Slot::Comparator, comparator)],
            ));
        }
        if comparisons.is_empty() {
            return Ok(left);
        }
        Ok(Node::new(
            NodeKind::Comparison,
            vec![one(Slot::Left, left), seq(Slot::Comparisons, comparisons)],
        ))
    }

    // ------------------------------------------------------------------
    // Arithmetic
    // ------------------------------------------------------------------

    fn binary_chain(&mut self, operators: &[&str], operand: Rule<'t>) -> Result<Node> {
        let mut left = operand(self)?;
        while self.at_any(operators) {
            let operator = Node::leaf(NodeKind::Operator, self.bump());
            let right = operand(self)?;
            left = Node::new(
                NodeKind::BinaryOperation,
                vec![
                    one(Slot::Left, left),
                    one(Slot::Operator, operator),
                    one(Slot::Right, right),
                ],
            );
        }
        Ok(left)
    }

    pub(crate) fn bitwise_or(&mut self) -> Result<Node> {
        self.binary_chain(&["|"], Self::bitwise_xor)
    }

    fn bitwise_xor(&mut self) -> Result<Node> {
        self.binary_chain(&["^"], Self::bitwise_and)
    }

    fn bitwise_and(&mut self) -> Result<Node> {
        self.binary_chain(&["&"], Self::shift_expr)
    }

    fn shift_expr(&mut self) -> Result<Node> {
        self.binary_chain(&["<<", ">>"], Self::sum)
    }

    fn sum(&mut self) -> Result<Node> {
        self.binary_chain(&["+", "-"], Self::term)
    }

    fn term(&mut self) -> Result<Node> {
        self.binary_chain(&["*", "/", "//", "%", "@"], Self::factor)
    }

    fn factor(&mut self) -> Result<Node> {
        if !self.at_any(&["+", "-", "~"]) {
            return self.power();
        }
        let operator = Node::leaf(NodeKind::Operator, self.bump());
        let operand = self.factor()?;
        Ok(Node::new(
            NodeKind::UnaryOperation,
            vec![one(Slot::Operator, operator), one(Slot::Expression, operand)],
        ))
    }

    fn power(&mut self) -> Result<Node> {
        let base = self.await_primary()?;
        if !self.at("**") {
            return Ok(base);
        }
        let operator = Node::leaf(NodeKind::Operator, self.bump());
        let exponent = self.factor()?;
        Ok(Node::new(
            NodeKind::BinaryOperation,
            vec![
                one(Slot::Left, base),
                one(Slot::Operator, operator),
                one(Slot::Right, exponent),
            ],
        ))
    }

    fn await_primary(&mut self) -> Result<Node> {
        let Some(keyword) = self.eat("await") else {
            return self.atom_with_trailers();
        };
        let operand = self.atom_with_trailers()?;
        Ok(Node::new(
            NodeKind::Await,
            vec![tok(keyword), one(Slot::Expression, operand)],
        ))
    }

    // ------------------------------------------------------------------
    // Primaries
    // ------------------------------------------------------------------

    fn atom_with_trailers(&mut self) -> Result<Node> {
        let mut node = self.atom()?;
        loop {
            if self.at(".") {
                let dot = self.bump();
                let attr = self.name()?;
                node = Node::new(
                    NodeKind::Attribute,
                    vec![one(Slot::Value, node), tok(dot), one(Slot::Attr, attr)],
                );
            } else if self.at("(") {
                let lpar = self.bump();
                let args = self.call_args()?;
                let rpar = self.expect(")")?;
                node = Node::new(
                    NodeKind::Call,
                    vec![one(Slot::Func, node), tok(lpar), seq(Slot::Args, args), tok(rpar)],
                );
            } else if self.at("[") {
                let lbracket = self.bump();
                let slices = self.subscript_elements()?;
                let rbracket = self.expect("]")?;
                node = Node::new(
                    NodeKind::Subscript,
                    vec![
                        one(Slot::Value, node),
                        tok(lbracket),
                        seq(Slot::Slice, slices),
                        tok(rbracket),
                    ],
                );
            } else {
                return Ok(node);
            }
        }
    }

    /// Arguments of a call or class definition, up to the closing `)`.
    pub(crate) fn call_args(&mut self) -> Result<Vec<Node>> {
        let mut args: Vec<Node> = Vec::new();
        while !self.at(")") {
            if !args.is_empty() && !has_comma(args.last()) {
                return Err(self.error("',' or ')'"));
            }
            let mut parts = Vec::new();
            if self.at_any(&["*", "**"]) {
                parts.push(tok(self.bump()));
                parts.push(opt(Slot::Keyword, None));
                parts.push(punct(PunctRole::Equal, None));
                parts.push(one(Slot::Value, self.expression()?));
            } else if self.at_identifier() && self.peek_nth(1).text == "=" {
                let keyword = self.name()?;
                let equal = self.bump();
                parts.push(opt(Slot::Keyword, Some(keyword)));
                parts.push(punct(PunctRole::Equal, Some(equal)));
                parts.push(one(Slot::Value, self.expression()?));
            } else {
                let value = self.named_expression()?;
                let value = if self.at_any(&["for", "async"]) {
                    let for_in = self.comp_for()?;
                    Node::new(
                        NodeKind::GeneratorExp,
                        vec![one(Slot::Elt, value), one(Slot::ForIn, for_in)],
                    )
                } else {
                    value
                };
                parts.push(opt(Slot::Keyword, None));
                parts.push(punct(PunctRole::Equal, None));
                parts.push(one(Slot::Value, value));
            }
            parts.push(self.comma());
            args.push(Node::new(NodeKind::Arg, parts));
        }
        Ok(args)
    }

    fn subscript_elements(&mut self) -> Result<Vec<Node>> {
        let mut elements: Vec<Node> = Vec::new();
        loop {
            let slice = self.slice()?;
            let comma = self.comma();
            let more = matches!(comma, Part::Punct(_, Presence::Present(_))) && !self.at("]");
            elements.push(Node::new(
                NodeKind::SubscriptElement,
                vec![one(Slot::Slice, slice), comma],
            ));
            if !more {
                return Ok(elements);
            }
        }
    }

    fn slice(&mut self) -> Result<Node> {
        let lower = if self.at(":") {
            None
        } else {
            let expr = self.named_expression()?;
            if !self.at(":") {
                return Ok(expr);
            }
            Some(expr)
        };
        let first_colon = self.bump();
        let upper = if self.at_any(&[":", "]", ","]) {
            None
        } else {
            Some(self.expression()?)
        };
        let mut parts = vec![opt(Slot::Lower, lower), tok(first_colon), opt(Slot::Upper, upper)];
        let mut step = None;
        if let Some(second_colon) = self.eat(":") {
            parts.push(tok(second_colon));
            if !self.at_any(&["]", ","]) {
                step = Some(self.expression()?);
            }
        }
        parts.push(opt(Slot::Step, step));
        Ok(Node::new(NodeKind::Slice, parts))
    }

    fn atom(&mut self) -> Result<Node> {
        let kind = self.peek().kind;
        let text = self.peek().text.clone();
        match kind {
            TokType::Name if self.at_identifier() || is_constant(&text) => {
                Ok(Node::leaf(NodeKind::Name, self.bump()))
            }
            TokType::Number => Ok(Node::leaf(number_kind(&text), self.bump())),
            TokType::String => self.strings(),
            TokType::Op => match text.as_str() {
                "..." => Ok(Node::leaf(NodeKind::Ellipsis, self.bump())),
                "(" => self.parenthesized(),
                "[" => self.list_or_comp(),
                "{" => self.brace_atom(),
                _ => Err(self.error("expression")),
            },
            _ => Err(self.error("expression")),
        }
    }

    /// One string, or adjacent strings as a `ConcatenatedString`.
    fn strings(&mut self) -> Result<Node> {
        let mut strings = vec![Node::leaf(NodeKind::SimpleString, self.bump())];
        while self.at_kind(TokType::String) {
            strings.push(Node::leaf(NodeKind::SimpleString, self.bump()));
        }
        if strings.len() == 1 {
            return Ok(strings.remove(0));
        }
        Ok(Node::new(
            NodeKind::ConcatenatedString,
            vec![seq(Slot::Strings, strings)],
        ))
    }

    fn parenthesized(&mut self) -> Result<Node> {
        let lpar = self.bump();
        if let Some(rpar) = self.eat(")") {
            let empty = Node::new(NodeKind::Tuple, vec![seq(Slot::Elements, Vec::new())]);
            return Ok(with_parens(empty, lpar, rpar));
        }
        if self.at("yield") {
            let inner = self.yield_expr()?;
            let rpar = self.expect(")")?;
            return Ok(with_parens(inner, lpar, rpar));
        }

        let first_is_star = self.at("*");
        let first = self.list_item(Self::named_expression, true)?;
        if !first_is_star && self.at_any(&["for", "async"]) {
            let for_in = self.comp_for()?;
            let rpar = self.expect(")")?;
            let generator = Node::new(
                NodeKind::GeneratorExp,
                vec![one(Slot::Elt, first), one(Slot::ForIn, for_in)],
            );
            return Ok(with_parens(generator, lpar, rpar));
        }
        if !first_is_star && self.at(")") {
            let rpar = self.bump();
            return Ok(with_parens(first, lpar, rpar));
        }

        let elements = self.elements_after(first, first_is_star, ")")?;
        let rpar = self.expect(")")?;
        let tuple = Node::new(NodeKind::Tuple, vec![seq(Slot::Elements, elements)]);
        Ok(with_parens(tuple, lpar, rpar))
    }

    /// Remaining comma-separated elements of a display whose first item has
    /// been parsed.
    fn elements_after(&mut self, first: Node, first_is_star: bool, closing: &str) -> Result<Vec<Node>> {
        let mut elements = vec![self.finish_element(first, first_is_star)];
        while !self.at(closing) {
            if !has_comma(elements.last()) {
                return Err(self.error(format!("',' or '{}'", closing)));
            }
            let is_star = self.at("*");
            let value = self.list_item(Self::named_expression, true)?;
            elements.push(self.finish_element(value, is_star));
        }
        Ok(elements)
    }

    fn list_or_comp(&mut self) -> Result<Node> {
        let lbracket = self.bump();
        if let Some(rbracket) = self.eat("]") {
            return Ok(Node::new(
                NodeKind::List,
                vec![tok(lbracket), seq(Slot::Elements, Vec::new()), tok(rbracket)],
            ));
        }
        let first_is_star = self.at("*");
        let first = self.list_item(Self::named_expression, true)?;
        if !first_is_star && self.at_any(&["for", "async"]) {
            let for_in = self.comp_for()?;
            let rbracket = self.expect("]")?;
            return Ok(Node::new(
                NodeKind::ListComp,
                vec![
                    tok(lbracket),
                    one(Slot::Elt, first),
                    one(Slot::ForIn, for_in),
                    tok(rbracket),
                ],
            ));
        }
        let elements = self.elements_after(first, first_is_star, "]")?;
        let rbracket = self.expect("]")?;
        Ok(Node::new(
            NodeKind::List,
            vec![tok(lbracket), seq(Slot::Elements, elements), tok(rbracket)],
        ))
    }

    fn brace_atom(&mut self) -> Result<Node> {
        let lbrace = self.bump();
        if let Some(rbrace) = self.eat("}") {
            return Ok(Node::new(
                NodeKind::Dict,
                vec![tok(lbrace), seq(Slot::Elements, Vec::new()), tok(rbrace)],
            ));
        }

        if self.at("**") {
            let first = self.starred_dict_element()?;
            return self.dict_rest(lbrace, first);
        }

        let first_is_star = self.at("*");
        let first = self.list_item(Self::named_expression, true)?;
        if !first_is_star && self.at(":") {
            let colon = self.bump();
            let value = self.expression()?;
            if self.at_any(&["for", "async"]) {
                let for_in = self.comp_for()?;
                let rbrace = self.expect("}")?;
                return Ok(Node::new(
                    NodeKind::DictComp,
                    vec![
                        tok(lbrace),
                        one(Slot::Key, first),
                        tok(colon),
                        one(Slot::Value, value),
                        one(Slot::ForIn, for_in),
                        tok(rbrace),
                    ],
                ));
            }
            let comma = self.comma();
            let element = Node::new(
                NodeKind::DictElement,
                vec![one(Slot::Key, first), tok(colon), one(Slot::Value, value), comma],
            );
            return self.dict_rest(lbrace, element);
        }

        if !first_is_star && self.at_any(&["for", "async"]) {
            let for_in = self.comp_for()?;
            let rbrace = self.expect("}")?;
            return Ok(Node::new(
                NodeKind::SetComp,
                vec![
                    tok(lbrace),
                    one(Slot::Elt, first),
                    one(Slot::ForIn, for_in),
                    tok(rbrace),
                ],
            ));
        }
        let elements = self.elements_after(first, first_is_star, "}")?;
        let rbrace = self.expect("}")?;
        Ok(Node::new(
            NodeKind::Set,
            vec![tok(lbrace), seq(Slot::Elements, elements), tok(rbrace)],
        ))
    }

    fn starred_dict_element(&mut self) -> Result<Node> {
        let stars = self.bump();
        let value = self.bitwise_or()?;
        let comma = self.comma();
        Ok(Node::new(
            NodeKind::StarredDictElement,
            vec![tok(stars), one(Slot::Value, value), comma],
        ))
    }

    fn dict_rest(&mut self, lbrace: Token, first: Node) -> Result<Node> {
        let mut elements = vec![first];
        while !self.at("}") {
            if !has_comma(elements.last()) {
                return Err(self.error("',' or '}'"));
            }
            if self.at("**") {
                elements.push(self.starred_dict_element()?);
                continue;
            }
            let key = self.expression()?;
            let colon = self.expect(":")?;
            let value = self.expression()?;
            let comma = self.comma();
            elements.push(Node::new(
                NodeKind::DictElement,
                vec![one(Slot::Key, key), tok(colon), one(Slot::Value, value), comma],
            ));
        }
        let rbrace = self.bump();
        Ok(Node::new(
            NodeKind::Dict,
            vec![tok(lbrace), seq(Slot::Elements, elements), tok(rbrace)],
        ))
    }

    /// `[async] for target in iter [if cond]* [for ...]`
    pub(crate) fn comp_for(&mut self) -> Result<Node> {
        let mut parts: Vec<Part> = self.eat("async").into_iter().map(tok).collect();
        parts.push(tok(self.expect("for")?));
        parts.push(one(Slot::Target, self.star_targets()?));
        parts.push(tok(self.expect("in")?));
        parts.push(one(Slot::Iter, self.disjunction()?));

        let mut ifs = Vec::new();
        while let Some(keyword) = self.eat("if") {
            let test = self.disjunction()?;
            ifs.push(Node::new(NodeKind::CompIf, vec![tok(keyword), one(Slot::Test, test)]));
        }
        parts.push(seq(Slot::Ifs, ifs));

        let inner = if self.at_any(&["for", "async"]) {
            Some(self.comp_for()?)
        } else {
            None
        };
        parts.push(opt(Slot::InnerForIn, inner));
        Ok(Node::new(NodeKind::CompFor, parts))
    }
}

/// Surround an expression with grouping parentheses.
pub(crate) fn with_parens(mut node: Node, lpar: Token, rpar: Token) -> Node {
    node.parts
        .insert(0, Part::Punct(PunctRole::LeftParen, Presence::Present(lpar)));
    node.parts
        .push(Part::Punct(PunctRole::RightParen, Presence::Present(rpar)));
    node
}

fn is_constant(text: &str) -> bool {
    matches!(text, "None" | "True" | "False")
}

fn number_kind(text: &str) -> NodeKind {
    let lower = text.to_ascii_lowercase();
    if lower.ends_with('j') {
        NodeKind::Imaginary
    } else if lower.starts_with("0x") || lower.starts_with("0o") || lower.starts_with("0b") {
        NodeKind::Integer
    } else if lower.contains('.') || lower.contains('e') {
        NodeKind::Float
    } else {
        NodeKind::Integer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_kinds() {
        assert_eq!(number_kind("10"), NodeKind::Integer);
        assert_eq!(number_kind("0xEF"), NodeKind::Integer);
        assert_eq!(number_kind("1e3"), NodeKind::Float);
        assert_eq!(number_kind(".5"), NodeKind::Float);
        assert_eq!(number_kind("2J"), NodeKind::Imaginary);
    }
}
