//! Environments, contexts, and let-polymorphism (§4.3).

use crate::subst::Subst;
use crate::ty::{Apply, FreeVars, Scheme, Type, TypeVar};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// An ordered, immutable-snapshot name→scheme mapping. Every "update"
/// returns a new environment that shadows only the affected bindings, so
/// sibling branches of an `if` never observe each other's bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment(IndexMap<String, Scheme>);

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Scheme> {
        self.0.get(name)
    }

    /// Return a new environment that shadows (or adds) `name -> scheme`.
    pub fn extend(&self, name: impl Into<String>, scheme: Scheme) -> Self {
        let mut env = self.clone();
        env.0.insert(name.into(), scheme);
        env
    }
}

impl FreeVars for Environment {
    fn free_vars(&self) -> IndexSet<TypeVar> {
        self.0.values().flat_map(FreeVars::free_vars).collect()
    }
}

impl Apply for Environment {
    fn apply(&self, s: &Subst) -> Self {
        Environment(self.0.iter().map(|(k, v)| (k.clone(), v.apply(s))).collect())
    }
}

/// Bundles the fresh-variable counter (the only genuinely mutable state in
/// inference) and the current environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    next_var: u32,
    pub env: Environment,
}

impl Context {
    pub fn new(env: Environment) -> Self {
        Self { next_var: 0, env }
    }

    /// Allocate a fresh type variable, rendered `T0`, `T1`, ... in order of
    /// allocation.
    pub fn fresh(&mut self) -> TypeVar {
        let v = TypeVar(self.next_var);
        self.next_var += 1;
        v
    }

    /// Return a copy of this context with the environment replaced.
    pub fn with_env(&self, env: Environment) -> Self {
        Self {
            next_var: self.next_var,
            env,
        }
    }

    /// Apply a substitution to the environment, keeping the same counter.
    pub fn apply_subst(&self, s: &Subst) -> Self {
        self.with_env(self.env.apply(s))
    }

    /// Pull the fresh-variable counter forward from a context that was
    /// cloned from `self` and then advanced independently (e.g. while
    /// inferring a branch or an argument in an isolated environment). Env
    /// isolation must never also isolate the counter, or sibling branches
    /// could allocate colliding variable names.
    pub fn next_var_from(&mut self, other: &Context) {
        self.next_var = self.next_var.max(other.next_var);
    }
}

/// Instantiate a `Forall` scheme: allocate one fresh variable per
/// quantifier and substitute it into the inner type. Produces a fresh
/// monotype each time a polymorphic name is referenced.
pub fn instantiate(ctx: &mut Context, scheme: &Scheme) -> Type {
    match scheme {
        Scheme::Mono(t) => t.clone(),
        Scheme::Forall(quantifiers, t) => {
            let mut s = Subst::new();
            for q in quantifiers {
                s.insert(*q, Type::Var(ctx.fresh()));
            }
            t.apply(&s)
        }
    }
}

/// Generalise a type against an environment: quantify over the variables
/// free in `ty` but not in `env`. Only `Let` calls this — function
/// parameters and `Assign` targets are never generalised, which is what
/// implements "a variable's type is fixed once declared" (§3 invariant 4).
pub fn generalise(env: &Environment, ty: &Type) -> Scheme {
    let quantifiers: IndexSet<TypeVar> = ty
        .free_vars()
        .difference(&env.free_vars())
        .copied()
        .collect();
    if quantifiers.is_empty() {
        debug!(%ty, "generalise: no free quantifiers, staying monomorphic");
        Scheme::Mono(ty.clone())
    } else {
        debug!(%ty, n = quantifiers.len(), "generalise: quantifying over free variables");
        Scheme::Forall(quantifiers, ty.clone())
    }
}
