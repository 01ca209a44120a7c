//! Domain/range expressions: a single class, or a union/intersection of
//! classes, independent of storage.
//!
//! Expressions are immutable value types. Arity is validated at build
//! time; class references are resolved lazily against the identifier
//! registry when the expression is evaluated.

use serde::{Deserialize, Serialize};

use crate::error::ExpressionError;
use crate::registry::{normalize_name, ClassRef, NameRegistry};

/// How the referenced classes combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    /// Exactly one class.
    Single,
    /// Union of two or more classes.
    Union,
    /// Intersection of two or more classes.
    Intersection,
}

impl std::fmt::Display for Combinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Combinator::Single => write!(f, "single"),
            Combinator::Union => write!(f, "union"),
            Combinator::Intersection => write!(f, "intersection"),
        }
    }
}

/// A class expression used as a domain or range specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    /// Whether the expression was asserted to exist in the payload.
    pub existence: bool,
    /// How the entities combine.
    pub combinator: Combinator,
    /// Canonical class names, in payload order, deduplicated.
    pub entities: Vec<String>,
}

impl Expression {
    /// Build an expression, validating arity for the combinator.
    ///
    /// `single` requires exactly one entity; `union` and `intersection`
    /// require two or more. Entity names are normalized and deduplicated
    /// preserving first-occurrence order before the arity check.
    pub fn build(
        existence: bool,
        combinator: Combinator,
        entities: &[String],
    ) -> Result<Self, ExpressionError> {
        let mut canonical: Vec<String> = Vec::with_capacity(entities.len());
        for raw in entities {
            if let Some(name) = normalize_name(raw) {
                if !canonical.contains(&name) {
                    canonical.push(name);
                }
            }
        }

        let count = canonical.len();
        let arity_ok = match combinator {
            Combinator::Single => count == 1,
            Combinator::Union | Combinator::Intersection => count >= 2,
        };
        if !arity_ok {
            return Err(ExpressionError::InvalidArity { combinator, count });
        }

        Ok(Self {
            existence,
            combinator,
            entities: canonical,
        })
    }

    /// Convenience constructor for a single-class expression.
    pub fn single(entity: &str) -> Result<Self, ExpressionError> {
        Self::build(true, Combinator::Single, &[entity.to_string()])
    }

    /// Resolve every referenced class against the registry.
    ///
    /// Fails fast with `UnknownEntity` naming the first unresolved
    /// reference; no partial resolution is returned.
    pub fn evaluate(&self, registry: &NameRegistry) -> Result<Vec<ClassRef>, ExpressionError> {
        let mut resolved = Vec::with_capacity(self.entities.len());
        for name in &self.entities {
            match registry.resolve(name) {
                Some(class_ref) => resolved.push(class_ref),
                None => return Err(ExpressionError::UnknownEntity(name.clone())),
            }
        }
        Ok(resolved)
    }

    /// Short display form, e.g. `union(acid, base)`.
    pub fn describe(&self) -> String {
        match self.combinator {
            Combinator::Single => self.entities.join(""),
            _ => format!("{}({})", self.combinator, self.entities.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(names: &[&str]) -> NameRegistry {
        let mut registry = NameRegistry::new();
        for name in names {
            registry.register(name).unwrap();
        }
        registry
    }

    #[test]
    fn test_single_requires_exactly_one_entity() {
        let err = Expression::build(
            true,
            Combinator::Single,
            &["acid".to_string(), "base".to_string()],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ExpressionError::InvalidArity {
                combinator: Combinator::Single,
                count: 2
            }
        );

        let err = Expression::build(true, Combinator::Single, &[]).unwrap_err();
        assert!(matches!(err, ExpressionError::InvalidArity { count: 0, .. }));
    }

    #[test]
    fn test_union_requires_two_or_more() {
        let err =
            Expression::build(true, Combinator::Union, &["acid".to_string()]).unwrap_err();
        assert!(matches!(err, ExpressionError::InvalidArity { count: 1, .. }));

        let expr = Expression::build(
            true,
            Combinator::Union,
            &["acid".to_string(), "base".to_string()],
        )
        .unwrap();
        assert_eq!(expr.entities, vec!["acid", "base"]);
    }

    #[test]
    fn test_build_normalizes_and_dedupes() {
        let expr = Expression::build(
            true,
            Combinator::Intersection,
            &[
                " benzene ring".to_string(),
                "acid".to_string(),
                "benzene_ring".to_string(),
            ],
        )
        .unwrap();
        assert_eq!(expr.entities, vec!["benzene_ring", "acid"]);
    }

    #[test]
    fn test_evaluate_fails_fast_on_unknown() {
        let registry = registry_with(&["acid"]);
        let expr = Expression::build(
            true,
            Combinator::Union,
            &["acid".to_string(), "base".to_string()],
        )
        .unwrap();
        let err = expr.evaluate(&registry).unwrap_err();
        assert_eq!(err, ExpressionError::UnknownEntity("base".to_string()));
    }

    #[test]
    fn test_evaluate_resolves_all() {
        let registry = registry_with(&["acid", "base"]);
        let expr = Expression::build(
            true,
            Combinator::Union,
            &["acid".to_string(), "base".to_string()],
        )
        .unwrap();
        let refs = expr.evaluate(&registry).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].as_str(), "acid");
    }

    #[test]
    fn test_describe() {
        let expr = Expression::single("acid").unwrap();
        assert_eq!(expr.describe(), "acid");

        let expr = Expression::build(
            true,
            Combinator::Union,
            &["acid".to_string(), "base".to_string()],
        )
        .unwrap();
        assert_eq!(expr.describe(), "union(acid, base)");
    }
}
