//! Construction of a caller-supplied initial environment (§6).
//!
//! The engine injects no names itself — `Builtins` is a small builder a
//! caller uses to seed an [`Environment`] with whatever nominal primitives
//! and built-in function signatures their host embedding wants, the way the
//! teacher's own `TypeEnv::default()` seeds `add`/`sub`/`mul`.

use crate::env::Environment;
use crate::ty::{Scheme, Type, TypeVar};
use indexmap::IndexSet;

#[derive(Debug, Clone, Default)]
pub struct Builtins {
    env: Environment,
}

impl Builtins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, scheme: Scheme) -> Self {
        self.env = self.env.extend(name, scheme);
        self
    }

    pub fn into_environment(self) -> Environment {
        self.env
    }

    /// The seed environment used throughout §8's end-to-end scenarios:
    /// `ambig: () => number|undefined`, `parseInt: (string, number|undefined)
    /// => number`, and the polymorphic identity `∀x. (x) => x`.
    pub fn example() -> Self {
        let x = TypeVar(0);
        Builtins::new()
            .with(
                "ambig",
                Scheme::mono(Type::Function(
                    vec![],
                    Box::new(Type::Union(vec![Type::number(), Type::undefined()])),
                )),
            )
            .with(
                "parseInt",
                Scheme::mono(Type::Function(
                    vec![
                        Type::string(),
                        Type::Union(vec![Type::number(), Type::undefined()]),
                    ],
                    Box::new(Type::number()),
                )),
            )
            .with(
                "identity",
                Scheme::Forall(IndexSet::from_iter([x]), Type::Function(vec![Type::Var(x)], Box::new(Type::Var(x)))),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_seeds_three_names() {
        let env = Builtins::example().into_environment();
        assert!(env.get("ambig").is_some());
        assert!(env.get("parseInt").is_some());
        assert!(env.get("identity").is_some());
    }
}
