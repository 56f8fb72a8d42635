//! Pretty-printing of `Type` for diagnostic messages (§6).
//!
//! Grammar: `Named`/`Var` render as their name; `Union` renders as
//! `A | B | C`; `Function` renders as `(A, B) => R`.

use crate::ty::Type;
use pretty::RcDoc;

const WIDTH: usize = 60;

impl Type {
    pub fn to_doc(&self) -> RcDoc<'_, ()> {
        match self {
            Type::Named(name) => RcDoc::text(name.clone()),
            Type::Var(v) => RcDoc::text(v.to_string()),
            Type::Function(params, to) => {
                let params = RcDoc::intersperse(
                    params.iter().map(Type::to_doc),
                    RcDoc::text(",").append(RcDoc::space()),
                );
                RcDoc::text("(")
                    .append(params)
                    .append(RcDoc::text(")"))
                    .append(RcDoc::space())
                    .append(RcDoc::text("=>"))
                    .append(RcDoc::space())
                    .append(to.to_doc())
                    .group()
            }
            Type::Union(tys) => RcDoc::intersperse(
                tys.iter().map(Type::to_doc),
                RcDoc::space().append(RcDoc::text("|")).append(RcDoc::space()),
            )
            .group(),
        }
    }
}

/// `typeToString(type) -> string` (§6).
pub fn type_to_string(ty: &Type) -> String {
    let mut buf = Vec::new();
    ty.to_doc().render(WIDTH, &mut buf).expect("rendering to a Vec<u8> cannot fail");
    String::from_utf8(buf).expect("doc renders only ASCII/UTF-8 text")
}
