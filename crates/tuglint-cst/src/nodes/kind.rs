// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node kinds and their slot tables.
//!
//! The whole shape of the tree is declared once, in [`for_each_node_kind!`].
//! Each entry names a kind, the builder function the matcher exposes for it,
//! and the kind's ordered child slots with their arity. Leaf kinds (whose
//! value is their token text) carry a `#[leaf]` marker.
//!
//! Other modules expand the table through a callback macro, so adding a kind
//! here updates the enum, the slot tables and the matcher builders together.

use std::fmt;

macro_rules! for_each_node_kind {
    ($callback:ident) => {
        $callback! {
            Module module { Body: Seq },

            // Statement containers
            SimpleStatementLine simple_statement_line { Body: Seq },
            SimpleStatementSuite simple_statement_suite { Body: Seq },
            IndentedBlock indented_block { Body: Seq },

            // Small statements
            Expr expr { Value: One },
            Assign assign { Targets: Seq, Value: One },
            AssignTarget assign_target { Target: One },
            AugAssign aug_assign { Target: One, Operator: One, Value: One },
            AnnAssign ann_assign { Target: One, Annotation: One, Value: Opt },
            Annotation annotation { Annotation: One },
            Return return_stmt { Value: Opt },
            Pass pass_stmt {},
            Break break_stmt {},
            Continue continue_stmt {},
            Raise raise { Exc: Opt, Cause: Opt },
            From from { Item: One },
            Del del { Target: One },
            Global global { Names: Seq },
            Nonlocal nonlocal { Names: Seq },
            NameItem name_item { Name: One },
            Import import { Names: Seq },
            ImportFrom import_from { Module: Opt, Names: Seq },
            ImportAlias import_alias { Name: One, AsName: Opt },
            ImportStar import_star {},
            AsName as_name { Name: One },
            Assert assert { Test: One, Msg: Opt },

            // Compound statements
            If if_stmt { Test: One, Body: One, OrElse: Opt },
            Else else_clause { Body: One },
            While while_stmt { Test: One, Body: One, OrElse: Opt },
            For for_stmt { Target: One, Iter: One, Body: One, OrElse: Opt },
            With with_stmt { Items: Seq, Body: One },
            WithItem with_item { Item: One, AsName: Opt },
            Try try_stmt { Body: One, Handlers: Seq, OrElse: Opt, FinalBody: Opt },
            ExceptHandler except_handler { Exc: Opt, AsName: Opt, Body: One },
            Finally finally { Body: One },
            FunctionDef function_def {
                Decorators: Seq, Name: One, Params: One, Returns: Opt, Body: One
            },
            ClassDef class_def { Decorators: Seq, Name: One, Bases: Seq, Keywords: Seq, Body: One },
            Decorator decorator { Decorator: One },
            Parameters parameters { Params: Seq },
            Param param { Name: One, Annotation: Opt, Default: Opt },
            ParamStar param_star {},
            ParamSlash param_slash {},

            // Leaves
            #[leaf] Name name {},
            #[leaf] Integer integer {},
            #[leaf] Float float {},
            #[leaf] Imaginary imaginary {},
            #[leaf] SimpleString simple_string {},
            #[leaf] Ellipsis ellipsis {},
            #[leaf] Operator operator {},

            // Expressions
            ConcatenatedString concatenated_string { Strings: Seq },
            Attribute attribute { Value: One, Attr: One },
            Call call { Func: One, Args: Seq },
            Arg arg { Keyword: Opt, Value: One },
            Subscript subscript { Value: One, Slice: Seq },
            SubscriptElement subscript_element { Slice: One },
            Slice slice { Lower: Opt, Upper: Opt, Step: Opt },
            BinaryOperation binary_operation { Left: One, Operator: One, Right: One },
            BooleanOperation boolean_operation { Left: One, Operator: One, Right: One },
            UnaryOperation unary_operation { Operator: One, Expression: One },
            Comparison comparison { Left: One, Comparisons: Seq },
            ComparisonTarget comparison_target { Operator: One, Comparator: One },
            IfExp if_exp { Body: One, Test: One, OrElse: One },
            Lambda lambda { Params: One, Body: One },
            NamedExpr named_expr { Target: One, Value: One },
            Await await_expr { Expression: One },
            Yield yield_expr { Value: Opt },

            // Collections
            Tuple tuple { Elements: Seq },
            List list { Elements: Seq },
            Set set { Elements: Seq },
            Dict dict { Elements: Seq },
            Element element { Value: One },
            StarredElement starred_element { Value: One },
            DictElement dict_element { Key: One, Value: One },
            StarredDictElement starred_dict_element { Value: One },

            // Comprehensions
            ListComp list_comp { Elt: One, ForIn: One },
            SetComp set_comp { Elt: One, ForIn: One },
            GeneratorExp generator_exp { Elt: One, ForIn: One },
            DictComp dict_comp { Key: One, Value: One, ForIn: One },
            CompFor comp_for { Target: One, Iter: One, Ifs: Seq, InnerForIn: Opt },
            CompIf comp_if { Test: One },
        }
    };
}
pub(crate) use for_each_node_kind;

macro_rules! for_each_slot {
    ($callback:ident) => {
        $callback! {
            Annotation, Args, AsName, Attr, Bases, Body, Cause, Comparator, Comparisons,
            Decorator, Decorators, Default, Elements, Elt, Exc, Expression, FinalBody, ForIn,
            Func, Handlers, Ifs, InnerForIn, Item, Items, Iter, Key, Keyword, Keywords, Left,
            Lower, Module, Msg, Name, Names, Operator, OrElse, Params, Returns, Right, Slice,
            Step, Strings, Target, Targets, Test, Upper, Value,
        }
    };
}
pub(crate) use for_each_slot;

macro_rules! leaf_flag {
    () => {
        false
    };
    ($leaf:ident) => {
        true
    };
}

macro_rules! define_node_kinds {
    ($(
        $(#[$leaf:ident])? $kind:ident $builder:ident { $($slot:ident : $arity:ident),* $(,)? }
    ),* $(,)?) => {
        /// The kind tag of a [`Node`](crate::nodes::Node).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $($kind,)*
        }

        impl NodeKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind),)*
                }
            }

            /// The kind's child slots in source order.
            pub fn slots(self) -> &'static [(Slot, Arity)] {
                match self {
                    $(NodeKind::$kind => &[$((Slot::$slot, Arity::$arity),)*],)*
                }
            }

            /// Leaves have no slots; their value is their token text.
            pub fn is_leaf(self) -> bool {
                match self {
                    $(NodeKind::$kind => leaf_flag!($($leaf)?),)*
                }
            }
        }
    };
}

macro_rules! define_slots {
    ($($slot:ident),* $(,)?) => {
        /// A named child position of a node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Slot {
            $($slot,)*
        }

        impl Slot {
            pub const ALL: &'static [Slot] = &[$(Slot::$slot,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(Slot::$slot => stringify!($slot),)*
                }
            }
        }
    };
}

for_each_node_kind!(define_node_kinds);
for_each_slot!(define_slots);

impl NodeKind {
    /// Arity of `slot` on this kind, or `None` if the kind has no such slot.
    pub fn arity(self, slot: Slot) -> Option<Arity> {
        self.slots()
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, arity)| *arity)
    }

    /// Whether the kind is a statement that may appear in a block body.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::SimpleStatementLine
                | NodeKind::If
                | NodeKind::While
                | NodeKind::For
                | NodeKind::With
                | NodeKind::Try
                | NodeKind::FunctionDef
                | NodeKind::ClassDef
        )
    }

    /// A one-element sequence in this kind renders its separator even though
    /// it is last (`(1,)`).
    pub(crate) fn forces_trailing_separator(self) -> bool {
        self == NodeKind::Tuple
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many children a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly one child.
    One,
    /// Zero or one child.
    Opt,
    /// An ordered list of children.
    Seq,
}

/// Punctuation whose presence can be decided at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctRole {
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Equal,
}

impl PunctRole {
    /// Whether this role separates elements of a parent sequence.
    pub fn is_separator(self) -> bool {
        matches!(self, PunctRole::Comma | PunctRole::Semicolon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_tables_have_no_duplicates() {
        for kind in NodeKind::ALL {
            let slots = kind.slots();
            for (i, (slot, _)) in slots.iter().enumerate() {
                assert!(
                    !slots[i + 1..].iter().any(|(s, _)| s == slot),
                    "{} declares {} twice",
                    kind,
                    slot
                );
            }
        }
    }

    #[test]
    fn leaves_have_no_slots() {
        for kind in NodeKind::ALL.iter().filter(|k| k.is_leaf()) {
            assert!(kind.slots().is_empty(), "{}", kind);
        }
        assert!(NodeKind::Name.is_leaf());
        assert!(!NodeKind::Pass.is_leaf());
    }

    #[test]
    fn class_def_slots() {
        assert_eq!(NodeKind::ClassDef.arity(Slot::Bases), Some(Arity::Seq));
        assert_eq!(NodeKind::ClassDef.arity(Slot::Body), Some(Arity::One));
        assert_eq!(NodeKind::ClassDef.arity(Slot::Value), None);
        assert_eq!(NodeKind::ClassDef.to_string(), "ClassDef");
    }
}
