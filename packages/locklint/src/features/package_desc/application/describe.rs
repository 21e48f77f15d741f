//! Builds a [`PackageDesc`] from the parsed files of one package.

use crate::features::annotations::parse_annotations;
use crate::features::package_desc::domain::{
    FieldDesc, FuncDesc, MethodDesc, PackageDesc, TypeDesc, VarDesc,
};
use crate::features::syntax::{Decl, Expr, GoFile};

/// Collect declarations from every file of a package into one
/// description. Files must belong to the same package; the package
/// name is taken from the first file.
pub fn describe(files: &[GoFile], tag: &str) -> PackageDesc {
    let name = files
        .first()
        .map(|f| f.package.clone())
        .unwrap_or_default();
    let mut desc = PackageDesc::new(name);

    for file in files {
        for decl in &file.decls {
            match decl {
                Decl::Type(type_decl) => {
                    let entry = desc
                        .types
                        .entry(type_decl.name.name.clone())
                        .or_insert_with(|| TypeDesc::new(type_decl.name.name.clone()));
                    for field in &type_decl.fields {
                        let guards = parse_annotations(&field.doc, tag);
                        for ident in &field.names {
                            entry.fields.insert(
                                ident.name.clone(),
                                FieldDesc {
                                    type_text: field.type_text.clone(),
                                    guards: guards.clone(),
                                },
                            );
                        }
                    }
                }
                Decl::Func(func) => {
                    let annotations = parse_annotations(&func.doc, tag);
                    match &func.receiver {
                        Some(recv) => {
                            // Methods may show up before (or without)
                            // their type declaration.
                            let entry = desc
                                .types
                                .entry(recv.type_name.clone())
                                .or_insert_with(|| TypeDesc::new(recv.type_name.clone()));
                            let result_type = match func.results.as_slice() {
                                [only] => Some(only.type_text.clone()),
                                _ => None,
                            };
                            entry.methods.insert(
                                func.name.name.clone(),
                                MethodDesc {
                                    name: func.name.name.clone(),
                                    recv_name: recv.name.as_ref().map(|i| i.name.clone()),
                                    annotations,
                                    result_type,
                                },
                            );
                        }
                        None => {
                            desc.functions.insert(
                                func.name.name.clone(),
                                FuncDesc {
                                    name: func.name.name.clone(),
                                    annotations,
                                },
                            );
                        }
                    }
                }
                Decl::Var(var) => {
                    let guards = parse_annotations(&var.doc, tag);
                    let aligned = var.values.len() == var.names.len();
                    for (i, ident) in var.names.iter().enumerate() {
                        let value = var.values.get(if aligned { i } else { 0 });
                        let type_text = var.type_text.clone().or_else(|| value_type(value));
                        desc.vars.insert(
                            ident.name.clone(),
                            VarDesc {
                                name: ident.name.clone(),
                                type_text,
                                guards: guards.clone(),
                            },
                        );
                    }
                }
            }
        }
    }

    desc
}

/// Declared type of an initializer, as far as syntax alone can tell:
/// `T{...}` and `&T{...}` name their type, everything else does not.
fn value_type(value: Option<&Expr>) -> Option<String> {
    match value? {
        Expr::Composite(c) => c.type_text.clone(),
        Expr::Unary(u) if u.op == "&" => match u.x.as_ref() {
            Expr::Composite(c) => c.type_text.clone(),
            _ => None,
        },
        _ => None,
    }
}
