//! The unifier (§4.2): an asymmetric, directional unification over
//! `Type`, extended with union-type rules.
//!
//! `unify(required, provided)` returns a substitution `s` such that
//! `apply(s, required)` accommodates `apply(s, provided)`. `required` is the
//! declarative side (a parameter type, an assignment target); `provided` is
//! the observed side (an argument, an RHS). The direction only matters for
//! the `Union` rules below.

use crate::error::{InferResult, TypeMismatch};
use crate::subst::Subst;
use crate::ty::{Apply, Type, TypeVar};
use tracing::trace;

pub fn unify(required: &Type, provided: &Type) -> InferResult<Subst> {
    trace!(%required, %provided, "unify");
    match (required, provided) {
        // Rule 1: Named === Named.
        (Type::Named(a), Type::Named(b)) if a == b => Ok(Subst::new()),

        // Rules 2 & 3: a type variable on either side binds.
        (Type::Var(n), t) => var_bind(n, t),
        (t, Type::Var(n)) => var_bind(n, t),

        // Rule 4: Function x Function. Truncate the required parameter list
        // to the provided arity (extra formals are checked against
        // `undefined` at the call site, not here), unify pairwise, then the
        // results, composing left to right.
        (Type::Function(req_params, req_to), Type::Function(prov_params, prov_to)) => {
            let truncated = &req_params[..req_params.len().min(prov_params.len())];
            let mut subst = Subst::new();
            for (r, p) in truncated.iter().zip(prov_params) {
                let s = unify(&r.apply(&subst), &p.apply(&subst))?;
                subst = s.compose(&subst);
            }
            let s = unify(&req_to.apply(&subst), &prov_to.apply(&subst))?;
            Ok(s.compose(&subst))
        }

        // Rule 5: Union(L) x Union(R), |R| <= |L|. Every member of R must
        // unify against the whole of L; substitutions compose in order.
        (Type::Union(l), Type::Union(r)) => {
            if r.len() > l.len() {
                return Err(mismatch(required, provided));
            }
            let mut subst = Subst::new();
            for member in r {
                let s = unify_union_left(&l.apply(&subst), &member.apply(&subst))?;
                subst = s.compose(&subst);
            }
            Ok(subst)
        }

        // Rule 6: Union(L) x T (T not a union). Succeeds if some member of L
        // unifies with T; the first success is used.
        (Type::Union(l), t) => unify_union_left(l, t),

        // Rule 7: T x Union(R) (T not a union). Succeeds only if every
        // member of R unifies with T; all substitutions compose.
        (t, Type::Union(r)) => {
            let mut subst = Subst::new();
            for member in r {
                let s = unify(&t.apply(&subst), &member.apply(&subst))?;
                subst = s.compose(&subst);
            }
            Ok(subst)
        }

        // Rule 8: anything else fails.
        _ => Err(mismatch(required, provided)),
    }
}

fn unify_union_left(l: &[Type], t: &Type) -> InferResult<Subst> {
    for member in l {
        if let Ok(s) = unify(member, t) {
            return Ok(s);
        }
    }
    Err(mismatch(&Type::Union(l.to_vec()), t))
}

fn mismatch(want: &Type, got: &Type) -> crate::error::InferError {
    TypeMismatch {
        want: want.clone(),
        got: got.clone(),
    }
    .into()
}

/// `varBind(n, t)` (§4.2).
fn var_bind(n: &TypeVar, t: &Type) -> InferResult<Subst> {
    if let Type::Var(m) = t {
        if m == n {
            return Ok(Subst::new());
        }
    }

    if let Type::Union(members) = t {
        // Pragmatic looseness: a self-reference beneath a Union is allowed
        // to pass without binding, rather than failing the occurs check.
        if members.iter().any(|m| m.contains_var(n)) {
            return Ok(Subst::new());
        }
    }

    if t.contains_var(n) {
        return Err(crate::error::InferError::SelfReference {
            var: *n,
            ty: t.clone(),
        });
    }

    Ok(Subst::singleton(*n, t.clone()))
}
