//! Syntactic type lookup
//!
//! Folds an access path over declared field and result types, one
//! segment at a time, with no real type inference behind it: types are
//! whatever the source spells. That is enough to decide whether the
//! tail of a path lands on a declared lock type.

use crate::features::package_desc::domain::PackageDesc;

pub struct TypeCatalog<'a> {
    desc: &'a PackageDesc,
    lock_types: &'a [String],
}

impl<'a> TypeCatalog<'a> {
    pub fn new(desc: &'a PackageDesc, lock_types: &'a [String]) -> Self {
        Self { desc, lock_types }
    }

    pub fn desc(&self) -> &PackageDesc {
        self.desc
    }

    /// Whether `type_text` names one of the configured lock types.
    pub fn is_lock_type(&self, type_text: &str) -> bool {
        let name = type_text.trim_start_matches('*');
        self.lock_types.iter().any(|t| t == name)
    }

    pub fn field_type(&self, type_name: &str, field: &str) -> Option<&str> {
        Some(self.desc.type_desc(type_name)?.field(field)?.type_text.as_str())
    }

    pub fn method_result(&self, type_name: &str, method: &str) -> Option<&str> {
        self.desc
            .type_desc(type_name)?
            .method(method)?
            .result_type
            .as_deref()
    }

    /// Type at the end of a path that starts from a value of
    /// `root_type`. Segments come in three spellings: a field name, a
    /// getter call `name()`, or an indexed field `name[expr]` whose
    /// type is the element type of the field.
    pub fn path_type(&self, root_type: &str, segments: &[String]) -> Option<String> {
        let mut current = root_type.trim_start_matches('*').to_string();
        for segment in segments {
            let next = if let Some(method) = segment.strip_suffix("()") {
                self.method_result(&current, method)?.to_string()
            } else if let Some(open) = segment.find('[') {
                let field_text = self.field_type(&current, &segment[..open])?;
                element_type(field_text)?
            } else {
                self.field_type(&current, segment)?.to_string()
            };
            current = next.trim_start_matches('*').to_string();
        }
        Some(current)
    }
}

/// Element type of a slice, array or map type text, or `None` for
/// anything else.
pub fn element_type(type_text: &str) -> Option<String> {
    let t = type_text.trim_start_matches('*');
    let t = t.strip_prefix("map").unwrap_or(t);
    if !t.starts_with('[') {
        return None;
    }
    let mut depth = 0usize;
    for (i, ch) in t.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    let elem = &t[i + 1..];
                    return (!elem.is_empty()).then(|| elem.to_string());
                }
            }
            _ => {}
        }
    }
    None
}
