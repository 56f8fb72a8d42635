//! Substitutions: finite var-name → `Type` mappings, composed the way the
//! teacher composes `Subst` in its unifier (§4.1).

use crate::ty::{Apply, Type, TypeVar};
use indexmap::{IndexMap, IndexSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subst(IndexMap<TypeVar, Type>);

impl Subst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(var: TypeVar, ty: Type) -> Self {
        let mut s = Self::new();
        s.0.insert(var, ty);
        s
    }

    pub fn get(&self, var: &TypeVar) -> Option<&Type> {
        self.0.get(var)
    }

    pub fn insert(&mut self, var: TypeVar, ty: Type) {
        self.0.insert(var, ty);
    }

    /// A copy of this substitution with the given variables removed from its
    /// domain. Used to implement quantifier shadowing when applying to a
    /// `Forall`.
    pub fn without(&self, vars: &IndexSet<TypeVar>) -> Self {
        Subst(
            self.0
                .iter()
                .filter(|(k, _)| !vars.contains(*k))
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
        )
    }

    /// `compose(s1, s2)`: apply `s1` to every type in `s2`, then union with
    /// `s1` (keys in `s1` win on collision) — §4.1.
    pub fn compose(&self, other: &Subst) -> Subst {
        let mut result: IndexMap<TypeVar, Type> = other
            .0
            .iter()
            .map(|(k, v)| (*k, v.apply(self)))
            .collect();
        for (k, v) in &self.0 {
            result.insert(*k, v.clone());
        }
        Subst(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::Apply;

    #[test]
    fn compose_applies_left_to_right_and_left_wins() {
        let mut s1 = Subst::new();
        s1.insert(TypeVar(2), Type::number());

        let mut s2 = Subst::new();
        s2.insert(TypeVar(1), Type::Var(TypeVar(2)));
        s2.insert(TypeVar(2), Type::boolean());

        let composed = s1.compose(&s2);
        // s1 wins on the TypeVar(2) collision.
        assert_eq!(composed.get(&TypeVar(2)), Some(&Type::number()));
        // s2's binding of T1 -> T2 gets s1 applied to it.
        assert_eq!(composed.get(&TypeVar(1)), Some(&Type::number()));
    }

    #[test]
    fn compose_matches_sequential_application() {
        let mut s1 = Subst::new();
        s1.insert(TypeVar(0), Type::number());

        let mut s2 = Subst::new();
        s2.insert(TypeVar(1), Type::Var(TypeVar(0)));

        let t = Type::Var(TypeVar(1));
        let composed = s1.compose(&s2);
        assert_eq!(t.apply(&composed), t.apply(&s2).apply(&s1));
    }
}
