//! Monotypes and type schemes (§3, §4.1).

use crate::subst::Subst;
use derive_more::Display;
use indexmap::IndexSet;

/// Opaque, monotonically-allocated type variable names, rendered `T0`, `T1`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVar(pub u32);

impl std::fmt::Display for TypeVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// A monotype: a nominal primitive, a type variable, a function shape, or a
/// (deliberately non-normalised) union of alternatives.
#[derive(Debug, Clone, Display)]
pub enum Type {
    #[display(fmt = "{}", _0)]
    Named(String),

    #[display(fmt = "{}", _0)]
    Var(TypeVar),

    #[display(fmt = "{}", "display_fn(_0, _1)")]
    Function(Vec<Type>, Box<Type>),

    #[display(fmt = "{}", "display_union(_0)")]
    Union(Vec<Type>),
}

/// Unions are ordered by construction (not normalised, see §3) but
/// *compared* as multisets up to element equality: `Union([A, B])` and
/// `Union([B, A])` are the same type, while a duplicate member must be
/// matched by a duplicate on the other side. Every other shape compares
/// structurally, order-sensitively (parameter order is significant for
/// `Function`).
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Named(a), Type::Named(b)) => a == b,
            (Type::Var(a), Type::Var(b)) => a == b,
            (Type::Function(pa, ta), Type::Function(pb, tb)) => pa == pb && ta == tb,
            (Type::Union(a), Type::Union(b)) => multiset_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Type {}

fn multiset_eq(a: &[Type], b: &[Type]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|x| {
        b.iter().enumerate().any(|(i, y)| {
            if used[i] || x != y {
                false
            } else {
                used[i] = true;
                true
            }
        })
    })
}

fn display_fn(params: &[Type], to: &Type) -> String {
    let params = params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("({}) => {}", params, to)
}

fn display_union(tys: &[Type]) -> String {
    tys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Convenience constructors for the builtin nominal primitives named by §3.
impl Type {
    pub fn number() -> Self {
        Type::Named("number".into())
    }
    pub fn string() -> Self {
        Type::Named("string".into())
    }
    pub fn boolean() -> Self {
        Type::Named("boolean".into())
    }
    pub fn null() -> Self {
        Type::Named("null".into())
    }
    pub fn undefined() -> Self {
        Type::Named("undefined".into())
    }

    /// Whether this type transitively contains `var` (used by the occurs
    /// check in `varBind`, §4.2).
    pub fn contains_var(&self, var: &TypeVar) -> bool {
        match self {
            Type::Named(_) => false,
            Type::Var(v) => v == var,
            Type::Function(params, to) => {
                params.iter().any(|p| p.contains_var(var)) || to.contains_var(var)
            }
            Type::Union(tys) => tys.iter().any(|t| t.contains_var(var)),
        }
    }
}

/// A type scheme: a bare [`Type`], or a `Forall` quantifying over some of
/// its variables. Only `let`-bound names carry `Forall` (§4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheme {
    Mono(Type),
    Forall(IndexSet<TypeVar>, Type),
}

impl Scheme {
    pub fn mono(ty: Type) -> Self {
        Scheme::Mono(ty)
    }

    /// The bare type this scheme carries, ignoring quantifiers. Used where
    /// the spec requires "the scheme must be a bare Type" (e.g. `Assign`).
    pub fn as_mono(&self) -> Option<&Type> {
        match self {
            Scheme::Mono(t) => Some(t),
            Scheme::Forall(..) => None,
        }
    }

    pub fn ty(&self) -> &Type {
        match self {
            Scheme::Mono(t) | Scheme::Forall(_, t) => t,
        }
    }
}

/// Types whose free type variables can be computed and which a substitution
/// can be applied to.
pub trait FreeVars {
    fn free_vars(&self) -> IndexSet<TypeVar>;
}

impl FreeVars for Type {
    fn free_vars(&self) -> IndexSet<TypeVar> {
        match self {
            Type::Named(_) => IndexSet::new(),
            Type::Var(v) => IndexSet::from_iter([*v]),
            Type::Function(params, to) => {
                let mut vars = to.free_vars();
                for p in params {
                    vars.extend(p.free_vars());
                }
                vars
            }
            Type::Union(tys) => tys.iter().flat_map(FreeVars::free_vars).collect(),
        }
    }
}

impl FreeVars for Scheme {
    /// `freeVars(Forall(Q, t)) = freeVars(t) \ Q` (§4.1).
    fn free_vars(&self) -> IndexSet<TypeVar> {
        match self {
            Scheme::Mono(t) => t.free_vars(),
            Scheme::Forall(quantifiers, t) => {
                t.free_vars().difference(quantifiers).copied().collect()
            }
        }
    }
}

/// Structural rewrite of every free occurrence of a variable bound by `s`.
pub trait Apply {
    fn apply(&self, s: &Subst) -> Self;
}

impl Apply for Type {
    fn apply(&self, s: &Subst) -> Self {
        match self {
            Type::Named(_) => self.clone(),
            Type::Var(v) => s.get(v).cloned().unwrap_or_else(|| self.clone()),
            Type::Function(params, to) => Type::Function(
                params.iter().map(|p| p.apply(s)).collect(),
                Box::new(to.apply(s)),
            ),
            Type::Union(tys) => Type::Union(tys.iter().map(|t| t.apply(s)).collect()),
        }
    }
}

impl Apply for Scheme {
    /// Apply under quantifier shadowing: the quantified variables of this
    /// scheme are removed from a local copy of `s` before applying (§4.1).
    fn apply(&self, s: &Subst) -> Self {
        match self {
            Scheme::Mono(t) => Scheme::Mono(t.apply(s)),
            Scheme::Forall(quantifiers, t) => {
                let shadowed = s.without(quantifiers);
                Scheme::Forall(quantifiers.clone(), t.apply(&shadowed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_equality_ignores_member_order() {
        let a = Type::Union(vec![Type::number(), Type::string()]);
        let b = Type::Union(vec![Type::string(), Type::number()]);
        assert_eq!(a, b);
    }

    #[test]
    fn union_equality_respects_duplicate_counts() {
        let a = Type::Union(vec![Type::number(), Type::number(), Type::string()]);
        let b = Type::Union(vec![Type::number(), Type::string()]);
        assert_ne!(a, b, "a duplicate member is not absorbed into a set");
    }

    #[test]
    fn function_equality_is_order_sensitive_on_params() {
        let a = Type::Function(vec![Type::number(), Type::string()], Box::new(Type::boolean()));
        let b = Type::Function(vec![Type::string(), Type::number()], Box::new(Type::boolean()));
        assert_ne!(a, b);
    }

    #[test]
    fn occurs_check_reaches_into_union_members() {
        let var = TypeVar(0);
        let inner = Type::Function(vec![Type::Var(var)], Box::new(Type::number()));
        let union = Type::Union(vec![Type::number(), inner]);
        assert!(union.contains_var(&var));
    }
}
