//! Hindley-Milner type inference for a small, untyped scripting language.
//!
//! Given an [`ast::Expr`] tree (built by an out-of-scope parser
//! collaborator, or by the [`ast::build`] helpers used in this crate's own
//! tests), [`infer::infer`] assigns a principal [`ty::Type`] to it or fails
//! with a location-tagged [`error::InferError`]. The algorithm is ordinary
//! Algorithm W, extended with union types (with a deliberately asymmetric
//! unification rule, see [`unify`]), parameter default-value inference, and
//! a flow-sensitive treatment of `if` branches (see [`block`]).
//!
//! This crate does not parse source text, does not generate code, and does
//! not talk to an editor over the Language Server Protocol — it is the
//! inference core those collaborators sit around.

#![warn(clippy::all)]

pub mod ast;
pub mod block;
pub mod builtins;
pub mod env;
pub mod error;
pub mod infer;
pub mod pp;
pub mod subst;
pub mod ty;
pub mod unify;

pub use error::{InferError, InferResult};
pub use infer::infer;
pub use pp::type_to_string;
pub use ty::Type;
