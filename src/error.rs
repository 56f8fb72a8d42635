//! The error taxonomy of §7.
//!
//! The teacher's own `InferError` is a bare `{ msg: String }` struct; this
//! crate upgrades it to a structured `thiserror` enum (the convention the
//! rest of this retrieval pack's compiler-shaped crates use for
//! diagnostics) while keeping the same propagation shape: one error type
//! threaded through every `Result` the engine returns.

use crate::ast::Span;
use crate::ty::Type;
use thiserror::Error;

/// Raised by the unifier when no substitution reconciles two types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("type mismatch: expected {want}, got {got}")]
pub struct TypeMismatch {
    pub want: Type,
    pub got: Type,
}

/// The full error taxonomy the engine can raise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferError {
    /// A `Var` or `Assign` refers to a name absent from the environment.
    #[error("unbound variable: {0}")]
    Unbound(String),

    /// Raised directly by the unifier, before any location is known.
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),

    /// A `TypeMismatch` re-raised with the source location of the
    /// expression that caused it. The only form the LSP interface sees.
    #[error("{mismatch} at {loc}")]
    Located { mismatch: TypeMismatch, loc: Span },

    /// The occurs check failed: binding `var` to `ty` would create a cyclic
    /// type outside a `Union`.
    #[error("type contains a reference to itself: {var} occurs in {ty}")]
    SelfReference { var: crate::ty::TypeVar, ty: Type },

    /// An operator or construct this engine does not assign a typing rule
    /// to (operators other than `+`/`===`, or `Assign` to a `Forall`).
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl InferError {
    /// Re-tag a `TypeMismatch` with a location, as `Call` and `Assign` do at
    /// their boundaries (§7 propagation policy).
    pub fn locate(self, loc: Span) -> InferError {
        match self {
            InferError::TypeMismatch(mismatch) => InferError::Located { mismatch, loc },
            other => other,
        }
    }
}

pub type InferResult<T> = Result<T, InferError>;

/// The shape consumed by the (out of scope) language-server collaborator:
/// `(message, loc)`, plus the two types for a `TypeMismatch` (§6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub loc: Span,
    pub want_got: Option<(Type, Type)>,
}

impl InferError {
    /// Convert to the LSP-facing diagnostic shape. Returns `None` for error
    /// variants that never carry a location (they are not supposed to reach
    /// this boundary — see §7's propagation policy).
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            InferError::Located { mismatch, loc } => Some(Diagnostic {
                message: self.to_string(),
                loc: *loc,
                want_got: Some((mismatch.want.clone(), mismatch.got.clone())),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;
    use crate::ty::TypeVar;
    use insta::assert_snapshot;

    #[test]
    fn unbound_message() {
        let err = InferError::Unbound("x".into());
        assert_snapshot!(err.to_string(), @"unbound variable: x");
    }

    #[test]
    fn type_mismatch_message() {
        let err: InferError = TypeMismatch {
            want: Type::string(),
            got: Type::number(),
        }
        .into();
        assert_snapshot!(err.to_string(), @"type mismatch: expected string, got number");
    }

    #[test]
    fn located_message_carries_the_span() {
        let loc = Span::new(Position::new(1, 0), Position::new(1, 10));
        let err = InferError::Located {
            mismatch: TypeMismatch {
                want: Type::string(),
                got: Type::number(),
            },
            loc,
        };
        assert_snapshot!(err.to_string(), @"type mismatch: expected string, got number at 1:0-1:10");
    }

    #[test]
    fn self_reference_message() {
        let var = TypeVar(0);
        let ty = Type::Function(vec![Type::Var(var)], Box::new(Type::number()));
        let err = InferError::SelfReference { var, ty };
        assert_snapshot!(
            err.to_string(),
            @"type contains a reference to itself: T0 occurs in (T0) => number"
        );
    }

    #[test]
    fn unsupported_message() {
        let err = InferError::Unsupported("assigning through a polymorphic binding `x`".into());
        assert_snapshot!(
            err.to_string(),
            @"unsupported: assigning through a polymorphic binding `x`"
        );
    }

    #[test]
    fn located_to_diagnostic_carries_want_got_and_loc() {
        let loc = Span::new(Position::new(2, 4), Position::new(2, 9));
        let err = InferError::Located {
            mismatch: TypeMismatch {
                want: Type::number(),
                got: Type::string(),
            },
            loc,
        };
        let diag = err.to_diagnostic().expect("Located always converts to a Diagnostic");
        assert_eq!(diag.loc, loc);
        assert_eq!(diag.want_got, Some((Type::number(), Type::string())));
        assert_snapshot!(diag.message, @"type mismatch: expected number, got string at 2:4-2:9");
    }

    #[test]
    fn non_located_variants_have_no_diagnostic() {
        assert!(InferError::Unbound("x".into()).to_diagnostic().is_none());
    }
}
