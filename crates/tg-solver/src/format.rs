//! Type display for diagnostics and traces.

use crate::intern::TypeDatabase;
use crate::types::{LiteralValue, TypeData, TypeId};

/// Render a type the way diagnostics print it, e.g. `{ a: number }`,
/// `<T>(T, T) => T`, `"key"`, `number | string`.
pub fn format_type(db: &dyn TypeDatabase, type_id: TypeId) -> String {
    let Some(data) = db.lookup(type_id) else {
        return format!("<unknown type {}>", type_id.0);
    };
    match data {
        TypeData::Intrinsic(kind) => kind.name().to_string(),
        TypeData::Literal(LiteralValue::Number(n)) => format_number(n.0),
        TypeData::Literal(LiteralValue::String(atom)) => format!("\"{}\"", db.resolve_atom(atom)),
        TypeData::Literal(LiteralValue::Boolean(b)) => b.to_string(),
        TypeData::Object(shape) => {
            if shape.properties.is_empty() {
                return "{ }".to_string();
            }
            let props: Vec<String> = shape
                .properties
                .iter()
                .map(|p| format!("{}: {}", db.resolve_atom(p.name), format_type(db, p.type_id)))
                .collect();
            format!("{{ {} }}", props.join(", "))
        }
        TypeData::Function(shape) => {
            let params: Vec<String> = shape
                .params
                .iter()
                .map(|p| {
                    let ty = format_type(db, p.type_id);
                    if p.optional { format!("{ty}?") } else { ty }
                })
                .collect();
            format!("({}) => {}", params.join(", "), format_type(db, shape.return_type))
        }
        TypeData::Generic(generic) => {
            let params: Vec<String> = generic
                .type_params
                .iter()
                .map(|&p| format_type_param_decl(db, p))
                .collect();
            format!("<{}>{}", params.join(", "), format_type(db, generic.subordinate))
        }
        TypeData::TypeParameter(info) => db.resolve_atom(info.name).to_string(),
        TypeData::Union(members) => members
            .iter()
            .map(|&m| format_type(db, m))
            .collect::<Vec<_>>()
            .join(" | "),
        TypeData::IndexedAccess { object, index } => {
            format!("{}[{}]", format_type(db, object), format_type(db, index))
        }
    }
}

fn format_type_param_decl(db: &dyn TypeDatabase, param: TypeId) -> String {
    match db.lookup(param) {
        Some(TypeData::TypeParameter(info)) => match info.constraint {
            Some(constraint) => format!(
                "{}: {}",
                db.resolve_atom(info.name),
                format_type(db, constraint)
            ),
            None => db.resolve_atom(info.name).to_string(),
        },
        _ => format_type(db, param),
    }
}

pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
