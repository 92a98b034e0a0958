//! Built-in rules.
//!
//! | name | fix |
//! |------|-----|
//! | `no-inherit-from-object` | removes the `object` base |
//! | `compare-singleton-by-is` | `== None` to `is None` |
//! | `rewrite-to-literal` | `list()` to `[]` |
//! | `no-mutable-default-args` | none |
//! | `no-print-calls` | removes bare `print(...)` statements |

pub mod compare_singleton_by_is;
pub mod no_inherit_from_object;
pub mod no_mutable_default_args;
pub mod no_print_calls;
pub mod rewrite_to_literal;

use crate::rule::RuleSet;

/// Every shipped rule, in the order their hooks run.
pub fn builtin_rules() -> RuleSet {
    [
        no_inherit_from_object::definition(),
        compare_singleton_by_is::definition(),
        rewrite_to_literal::definition(),
        no_mutable_default_args::definition(),
        no_print_calls::definition(),
    ]
    .into_iter()
    .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_are_unique() {
        let rules = builtin_rules();
        let mut names: Vec<_> = rules.names().collect();
        assert_eq!(names.len(), 5);
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn instances_report_their_definition_name() {
        for definition in builtin_rules().iter() {
            assert_eq!(definition.instantiate().name(), definition.name);
        }
    }
}
