//! `no-inherit-from-object`: every class already inherits from `object`.
//!
//! ```python
//! class C(object):      # flagged
//!     pass
//! class C:              # after the fix
//!     pass
//! ```
//!
//! The base is matched with a pattern compiled once per definition and
//! shared by every file's rule instance.

use std::sync::Arc;

use tuglint_cst::matcher::extract;
use tuglint_cst::{m, Node, NodeKind, Pattern, Replacement};

use crate::rule::{Hook, Rule, RuleContext, RuleDefinition};

pub const NAME: &str = "no-inherit-from-object";

pub fn definition() -> RuleDefinition {
    let pattern = Arc::new(object_base_pattern());
    RuleDefinition::new(NAME, "explicit `object` base class", move || {
        Box::new(NoInheritFromObject {
            pattern: Arc::clone(&pattern),
        }) as Box<dyn Rule>
    })
}

/// `class C(..., object, ...)` with `object` captured as `base`.
fn object_base_pattern() -> Pattern {
    m::class_def()
        .bases([
            m::zero_or_more(m::any()),
            m::one(m::capture(
                "base",
                m::arg().keyword(m::absent()).value(m::name("object")),
            )),
            m::zero_or_more(m::any()),
        ])
        .into()
}

struct NoInheritFromObject {
    pattern: Arc<Pattern>,
}

impl Rule for NoInheritFromObject {
    fn name(&self) -> &str {
        NAME
    }

    fn hooks(&self) -> Vec<Hook> {
        vec![Hook::Visit(NodeKind::ClassDef)]
    }

    fn visit(&mut self, node: &Arc<Node>, ctx: &mut RuleContext<'_>) {
        let Some(captures) = extract(node, &self.pattern) else {
            return;
        };
        let Some(base) = captures.get("base") else {
            return;
        };
        // `*object` is an unpacked argument, not the base class.
        if base.tokens().next().is_some() {
            return;
        }
        ctx.report_with_fix(
            base,
            "class inherits from `object` explicitly; remove the base",
            Replacement::Remove,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{fixed, lint};

    fn check(source: &str, expected: &str) {
        let report = lint(definition(), source);
        assert_eq!(report.violations.len(), 1, "{:?}", report.violations);
        assert_eq!(fixed(&report, source), expected);
    }

    #[test]
    fn test_pattern_is_valid() {
        object_base_pattern().validate().unwrap();
    }

    #[test]
    fn test_sole_base_removes_parentheses() {
        check("class C(object):\n    pass\n", "class C:\n    pass\n");
    }

    #[test]
    fn test_other_bases_are_kept() {
        check(
            "class C(Base, object):\n    pass\n",
            "class C(Base):\n    pass\n",
        );
        check(
            "class C(object, Base):\n    pass\n",
            "class C(Base):\n    pass\n",
        );
    }

    #[test]
    fn test_keywords_keep_parentheses() {
        check(
            "class C(object, metaclass=M):\n    pass\n",
            "class C(metaclass=M):\n    pass\n",
        );
    }

    #[test]
    fn test_nested_class() {
        check(
            "def f():\n    class Inner(object):\n        x = 1\n    return Inner\n",
            "def f():\n    class Inner:\n        x = 1\n    return Inner\n",
        );
    }

    #[test]
    fn test_clean_classes() {
        for source in [
            "class C:\n    pass\n",
            "class C(Base):\n    pass\n",
            "class C(metaclass=object):\n    pass\n",
            "class C(*object):\n    pass\n",
            "x = object\n",
        ] {
            let report = lint(definition(), source);
            assert!(report.violations.is_empty(), "{}", source);
            assert!(report.fixed_source.is_none());
        }
    }

    #[test]
    fn test_report_points_at_the_base() {
        let report = lint(definition(), "class C(object):\n    pass\n");
        let violation = &report.violations[0];
        assert_eq!((violation.line, violation.col), (1, 9));
        assert_eq!(violation.rule, NAME);
    }
}
