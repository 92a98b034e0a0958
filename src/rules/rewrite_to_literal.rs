//! `rewrite-to-literal`: empty builtin constructor calls become literals.
//!
//! `list()` becomes `[]`, `dict()` becomes `{}` and `tuple()` becomes `()`.
//! Calls with arguments are left alone.

use std::sync::Arc;

use tuglint_cst::{
    Child, Codegen, Node, NodeKind, Part, Presence, PunctRole, Replacement, Slot, Token,
};

use crate::rule::{Hook, Rule, RuleContext, RuleDefinition};

pub const NAME: &str = "rewrite-to-literal";

pub fn definition() -> RuleDefinition {
    RuleDefinition::new(NAME, "empty constructor call instead of a literal", || {
        Box::new(RewriteToLiteral) as Box<dyn Rule>
    })
}

struct RewriteToLiteral;

impl Rule for RewriteToLiteral {
    fn name(&self) -> &str {
        NAME
    }

    fn hooks(&self) -> Vec<Hook> {
        vec![Hook::Visit(NodeKind::Call)]
    }

    fn visit(&mut self, node: &Arc<Node>, ctx: &mut RuleContext<'_>) {
        if !node.children(Slot::Args).is_empty() {
            return;
        }
        let Some(func) = node.child(Slot::Func) else {
            return;
        };
        if func.kind() != NodeKind::Name {
            return;
        }
        let constructor = func.value();
        let Some(literal) = empty_literal(&constructor) else {
            return;
        };
        let literal = keep_parentheses(node, literal);
        ctx.report_with_fix(
            node,
            format!("use `{}` instead of `{}()`", literal.to_source(), constructor),
            Replacement::Replace(Arc::new(literal)),
        );
    }
}

fn empty_literal(constructor: &str) -> Option<Node> {
    let elements = Part::Slot(Slot::Elements, Child::Seq(Vec::new()));
    let node = match constructor {
        "list" => Node::new(
            NodeKind::List,
            vec![Part::Token(Token::op("[")), elements, Part::Token(Token::op("]"))],
        ),
        "dict" => Node::new(
            NodeKind::Dict,
            vec![Part::Token(Token::op("{")), elements, Part::Token(Token::op("}"))],
        ),
        "tuple" => Node::new(
            NodeKind::Tuple,
            vec![
                Part::Punct(PunctRole::LeftParen, Presence::Present(Token::op("("))),
                elements,
                Part::Punct(PunctRole::RightParen, Presence::Present(Token::op(")"))),
            ],
        ),
        _ => return None,
    };
    Some(node)
}

/// `(list())` keeps its own parentheses around the literal.
fn keep_parentheses(original: &Node, mut literal: Node) -> Node {
    let (Some(first), Some(last)) = (original.parts.first(), original.parts.last()) else {
        return literal;
    };
    if matches!(first, Part::Punct(PunctRole::LeftParen, Presence::Present(_)))
        && matches!(last, Part::Punct(PunctRole::RightParen, Presence::Present(_)))
    {
        literal.parts.insert(0, first.clone());
        literal.parts.push(last.clone());
    }
    literal
}
