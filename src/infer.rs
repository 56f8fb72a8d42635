//! The expression inferencer (§4.4): `infer(ctx, expr) -> (type, subst,
//! ctx')`, dispatching on node kind.
//!
//! `Block`, `If`, `Return`, and `Throw` are delegated to [`crate::block`],
//! which implements §4.5; every other node kind is handled here.

use crate::ast::{BinOp, Expr, FnBody, Param, Span};
use crate::block;
use crate::env::{generalise, instantiate, Context};
use crate::error::{InferError, InferResult, TypeMismatch};
use crate::subst::Subst;
use crate::ty::{Apply, Scheme, Type};
use crate::unify::unify;
use tracing::{instrument, trace};

/// Recursively infer the type of `expr`, threading `ctx` forward. `ctx.env`
/// is mutated in place for the one construct that extends it (`Let`);
/// everywhere else the caller is responsible for applying the returned
/// substitution to `ctx.env` before continuing to a sibling expression, as
/// §5's ordering guarantee requires.
#[instrument(skip(ctx, expr), level = "trace")]
pub fn infer(ctx: &mut Context, expr: &Expr) -> InferResult<(Type, Subst)> {
    let result = match expr {
        Expr::Number(..) => Ok((Type::number(), Subst::new())),
        Expr::String(..) => Ok((Type::string(), Subst::new())),
        Expr::Boolean(..) => Ok((Type::boolean(), Subst::new())),
        Expr::Null(..) => Ok((Type::null(), Subst::new())),
        Expr::Undefined(..) => Ok((Type::undefined(), Subst::new())),

        Expr::Var(name, _) => infer_var(ctx, name),

        Expr::Binary { op, lhs, rhs, .. } => infer_binary(ctx, *op, lhs, rhs),

        Expr::Let { name, rhs, .. } => infer_let(ctx, name, rhs),

        Expr::Assign { name, rhs, span } => infer_assign(ctx, name, rhs, *span),

        Expr::Function { params, body, .. } => infer_function(ctx, params, body),

        Expr::Call { func, args, span } => infer_call(ctx, func, args, *span),

        // Delegated to the block/if inferencer (§4.5). These can still
        // appear as a standalone top-level expression, not only nested
        // inside a Block.
        Expr::Block(block, _) => {
            let result = block::infer_block(ctx, block)?;
            Ok((result.ty, result.subst))
        }
        Expr::If {
            cond,
            then_branch,
            else_branch,
            ..
        } => {
            let (_, ty, subst) =
                block::infer_if(ctx, cond, then_branch, else_branch.as_ref())?;
            Ok((ty, subst))
        }
        Expr::Return { rhs, .. } => infer(ctx, rhs),
        Expr::Throw { .. } => Ok((Type::undefined(), Subst::new())),
    };
    if let Ok((ty, _)) = &result {
        trace!(%ty, "inferred");
    }
    result
}

fn infer_var(ctx: &mut Context, name: &str) -> InferResult<(Type, Subst)> {
    let scheme = ctx
        .env
        .get(name)
        .cloned()
        .ok_or_else(|| InferError::Unbound(name.to_string()))?;
    let ty = instantiate(ctx, &scheme);
    Ok((ty, Subst::new()))
}

fn infer_binary(ctx: &mut Context, op: BinOp, lhs: &Expr, rhs: &Expr) -> InferResult<(Type, Subst)> {
    let (lty, ls) = infer(ctx, lhs)?;
    ctx.env = ctx.env.apply(&ls);
    let (rty, rs) = infer(ctx, rhs)?;
    let subst = rs.compose(&ls);

    let ty = match op {
        // The host language's overloaded `+`: numeric addition narrows to
        // numeric, anything else coerces to string. This is a structural
        // equality check against `number`, not a unification attempt (§9):
        // two variables that could both turn out to be `number` still
        // yield `string`.
        BinOp::Add => {
            let lty = lty.apply(&subst);
            let rty = rty.apply(&subst);
            if lty == Type::number() && rty == Type::number() {
                Type::number()
            } else {
                Type::string()
            }
        }
        BinOp::StrictEq => Type::boolean(),
    };
    Ok((ty, subst))
}

fn infer_let(ctx: &mut Context, name: &str, rhs: &Expr) -> InferResult<(Type, Subst)> {
    let (rty, subst) = infer(ctx, rhs)?;
    ctx.env = ctx.env.apply(&subst);
    let scheme = generalise(&ctx.env, &rty);
    ctx.env = ctx.env.extend(name, scheme);
    // A `let` is a statement; its own type is `undefined`.
    Ok((Type::undefined(), subst))
}

fn infer_assign(
    ctx: &mut Context,
    name: &str,
    rhs: &Expr,
    span: Option<Span>,
) -> InferResult<(Type, Subst)> {
    let scheme = ctx
        .env
        .get(name)
        .cloned()
        .ok_or_else(|| InferError::Unbound(name.to_string()))?;
    let bound_ty = scheme
        .as_mono()
        .cloned()
        .ok_or_else(|| InferError::Unsupported(format!("assigning through a polymorphic binding `{name}`")))?;

    let (rty, rs) = infer(ctx, rhs)?;
    ctx.env = ctx.env.apply(&rs);
    let bound_ty_here = bound_ty.apply(&rs);

    let unify_subst = unify(&bound_ty_here, &rty).map_err(|e| match span {
        Some(loc) => e.locate(loc),
        None => e,
    })?;
    ctx.env = ctx.env.apply(&unify_subst);

    // The Assign expression's type is the bound type itself, unchanged.
    Ok((bound_ty, unify_subst.compose(&rs)))
}

fn infer_function(ctx: &mut Context, params: &[Param], body: &FnBody) -> InferResult<(Type, Subst)> {
    let outer_env = ctx.env.clone();
    let mut param_types = Vec::with_capacity(params.len());

    for param in params {
        match param {
            Param::Name(name) => {
                let var = ctx.fresh();
                param_types.push(Type::Var(var));
                ctx.env = ctx.env.extend(name.clone(), Scheme::mono(Type::Var(var)));
            }
            Param::Default(name, default_expr) => {
                // The default is inferred against the environment as it
                // stood on entry to the function, not against sibling
                // parameters (documented open-question decision, see
                // DESIGN.md).
                let mut default_ctx = ctx.with_env(outer_env.clone());
                let (default_ty, _) = infer(&mut default_ctx, default_expr)?;
                ctx.next_var_from(&default_ctx);
                param_types.push(default_ty.clone());
                ctx.env = ctx.env.extend(name.clone(), Scheme::mono(default_ty));
            }
        }
    }

    let (body_ty, body_subst) = match body {
        FnBody::Expr(e) => infer(ctx, e)?,
        FnBody::Block(b) => {
            let result = block::infer_block(ctx, b)?;
            (result.ty, result.subst)
        }
    };

    let param_types = param_types.iter().map(|t| t.apply(&body_subst)).collect();
    // The surrounding context is returned unchanged — function bodies
    // introduce only a nested scope.
    ctx.env = outer_env;

    Ok((Type::Function(param_types, Box::new(body_ty)), body_subst))
}

fn infer_call(
    ctx: &mut Context,
    func: &Expr,
    args: &[Expr],
    span: Option<Span>,
) -> InferResult<(Type, Subst)> {
    let (func_ty, s_func) = infer(ctx, func)?;
    ctx.env = ctx.env.apply(&s_func);

    // Each argument is inferred independently against the post-func
    // context: env changes don't chain between arguments, but the
    // fresh-variable counter still advances monotonically so sibling
    // arguments never collide on a variable name.
    let mut counter_ctx = ctx.clone();
    let mut arg_types = Vec::with_capacity(args.len());
    let mut s_args = Subst::new();
    for arg in args {
        let mut arg_ctx = counter_ctx.clone();
        let (at, asub) = infer(&mut arg_ctx, arg)?;
        counter_ctx.next_var_from(&arg_ctx);
        s_args = asub.compose(&s_args);
        arg_types.push(at);
    }
    ctx.next_var_from(&counter_ctx);

    let ret_var = ctx.fresh();
    let candidate_fn = Type::Function(
        arg_types.iter().map(|t| t.apply(&s_args)).collect(),
        Box::new(Type::Var(ret_var)),
    );
    let s3 = unify(&func_ty.apply(&s_args), &candidate_fn).map_err(|e| match span {
        Some(loc) => e.locate(loc),
        None => e,
    })?;

    let func_ty_resolved = func_ty.apply(&s_args).apply(&s3);
    let Type::Function(declared_params, _) = &func_ty_resolved else {
        return Err(locate_opt(
            TypeMismatch {
                want: func_ty_resolved,
                got: Type::Named("function".into()),
            }
            .into(),
            span,
        ));
    };

    let mut s4 = Subst::new();
    for (i, declared) in declared_params.iter().enumerate() {
        // Undersupplied trailing parameters are checked against `undefined`.
        let provided = arg_types
            .get(i)
            .cloned()
            .unwrap_or_else(Type::undefined);
        let s = unify(&declared.apply(&s4), &provided.apply(&s4))
            .map_err(|e| locate_opt(e, span))?;
        s4 = s.compose(&s4);
    }

    let total = s4.compose(&s3.compose(&s_args.compose(&s_func)));
    Ok((Type::Var(ret_var).apply(&total), total))
}

fn locate_opt(err: InferError, span: Option<Span>) -> InferError {
    match span {
        Some(loc) => err.locate(loc),
        None => err,
    }
}
