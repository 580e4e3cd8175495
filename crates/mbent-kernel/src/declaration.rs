//! Static declarations of entity shapes.
//!
//! Every entity type owns exactly one [`Declaration`]: its name, grammar
//! tag, documentation and an explicitly ordered field table. The same table
//! drives validation in [`crate::entity`], header/payload emission in
//! [`crate::drive`] and structure export in [`crate::schema`].
//!
//! Field order is part of the declaration. A field without a default may
//! never follow a field with one, and members of a [`Family`] must restate
//! every shared field at the position they want it. Built-in tables assert
//! the ordering rule in a `const` item, so a mis-ordered built-in does not
//! compile; [`Declaration::validate`] performs the full check at runtime.

use crate::entity::Entity;
use crate::error::DeclarationError;
use crate::kind::ValueKind;
use crate::reference::NamedReference;
use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeSet;

/// A named keyword with attached documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Constant {
    pub name: &'static str,
    pub doc: &'static str,
}

/// One alternative a field admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    /// A literal whose kind promotes to the given kind.
    Literal(ValueKind),
    /// A [`NamedReference`](crate::NamedReference) whose kind promotes to
    /// the given kind.
    Reference(ValueKind),
    /// Exactly one of a fixed set of keywords.
    Keyword(&'static [Constant]),
}

/// Frequently used accept lists.
pub mod accepts {
    use super::Accept;
    use crate::kind::ValueKind;

    /// `NamedReference | integer | real`
    pub const NUMBER: &[Accept] = &[
        Accept::Reference(ValueKind::Real),
        Accept::Literal(ValueKind::Integer),
        Accept::Literal(ValueKind::Real),
    ];

    /// `NamedReference | integer`
    pub const INTEGER: &[Accept] = &[
        Accept::Reference(ValueKind::Integer),
        Accept::Literal(ValueKind::Integer),
    ];

    pub const TEXT: &[Accept] = &[Accept::Literal(ValueKind::Text)];
}

impl Accept {
    /// Human-readable form used in kind errors.
    pub fn describe(&self) -> String {
        match self {
            Self::Literal(kind) => kind.name().to_string(),
            Self::Reference(kind) => format!("reference<{kind}>"),
            Self::Keyword(constants) => {
                let names: Vec<&str> = constants.iter().map(|c| c.name).collect();
                format!("one of [{}]", names.join(", "))
            }
        }
    }
}

/// Default of a field. `Absent` marks an optional field with no value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Absent,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(&'static str),
    Keyword(&'static str),
}

impl FieldDefault {
    /// The value a missing field takes, or `None` if it stays absent.
    pub fn to_value(self) -> Option<Value> {
        match self {
            Self::Absent => None,
            Self::Bool(b) => Some(Value::Bool(b)),
            Self::Integer(i) => Some(Value::Integer(i)),
            Self::Real(r) => Some(Value::Real(r)),
            Self::Text(s) => Some(Value::Text(s.to_string())),
            Self::Keyword(k) => Some(Value::Text(k.to_string())),
        }
    }
}

/// Declaration of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub doc: &'static str,
    pub accepts: &'static [Accept],
    /// `None` makes the field required.
    pub default: Option<FieldDefault>,
}

impl FieldDecl {
    pub const fn required(name: &'static str, doc: &'static str, accepts: &'static [Accept]) -> Self {
        Self {
            name,
            doc,
            accepts,
            default: None,
        }
    }

    pub const fn optional(name: &'static str, doc: &'static str, accepts: &'static [Accept]) -> Self {
        Self {
            name,
            doc,
            accepts,
            default: Some(FieldDefault::Absent),
        }
    }

    pub const fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }

    pub const fn is_optional(&self) -> bool {
        matches!(self.default, Some(FieldDefault::Absent))
    }

    /// `expected` text for kind errors on this field.
    pub fn expected(&self) -> String {
        let alternatives: Vec<String> = self.accepts.iter().map(Accept::describe).collect();
        let mut expected = alternatives.join(" | ");
        if self.is_optional() {
            expected.push_str(" | null");
        }
        expected
    }

    /// Admit `value` into this field.
    ///
    /// On success returns the stored form: keywords are interned, literals
    /// are promoted to the narrowest accepted kind, a mapping on a field that
    /// accepts references is built into a [`NamedReference`], and an explicit
    /// null on an optional field becomes `None`. On failure the value is
    /// handed back for error reporting.
    pub fn admit(&self, value: Value) -> Result<Option<Value>, Value> {
        match value {
            Value::Null if self.is_optional() => Ok(None),
            Value::Reference(reference) => {
                let admitted = self.accepts.iter().any(|accept| {
                    matches!(accept, Accept::Reference(kind) if reference.kind().promotes_to(*kind))
                });
                if admitted {
                    Ok(Some(Value::Reference(reference)))
                } else {
                    Err(Value::Reference(reference))
                }
            }
            Value::Nested(serde_json::Value::Object(data)) if self.accepts_references() => {
                match NamedReference::from_mapping(&data) {
                    Ok(reference) => self.admit(Value::Reference(reference)),
                    Err(err) => {
                        tracing::debug!(field = self.name, error = %err, "nested reference rejected");
                        Err(Value::Nested(serde_json::Value::Object(data)))
                    }
                }
            }
            Value::Keyword(name) => self.admit(Value::Text(name.to_string())),
            Value::Text(text) if self.keyword(&text).is_some() => {
                Ok(self.keyword(&text).map(Value::Keyword))
            }
            literal => {
                let Some(kind) = literal.literal_kind() else {
                    return Err(literal);
                };
                let targets = self.accepts.iter().filter_map(|accept| match accept {
                    Accept::Literal(target) => Some(*target),
                    _ => None,
                });
                match kind.narrowest_target(targets) {
                    Some(target) => literal.clone().promote(target).map(Some).ok_or(literal),
                    None => Err(literal),
                }
            }
        }
    }

    fn accepts_references(&self) -> bool {
        self.accepts.iter().any(|accept| matches!(accept, Accept::Reference(_)))
    }

    fn keyword(&self, text: &str) -> Option<&'static str> {
        self.accepts.iter().find_map(|accept| match accept {
            Accept::Keyword(constants) => constants.iter().find(|c| c.name == text).map(|c| c.name),
            _ => None,
        })
    }
}

/// A family of variants sharing fields and derived behaviour.
#[derive(Debug)]
pub struct Family {
    pub name: &'static str,
    pub doc: &'static str,
    /// Fields every member must redeclare, unchanged.
    pub shared: &'static [FieldDecl],
}

/// The complete static shape of an entity type.
#[derive(Debug)]
pub struct Declaration {
    pub type_name: &'static str,
    /// Grammar keyword of the variant. Empty for untagged entities.
    pub type_tag: &'static str,
    pub doc: &'static str,
    pub family: Option<&'static Family>,
    /// Effective field order.
    pub fields: &'static [FieldDecl],
}

impl Declaration {
    pub fn field(&self, name: &str) -> Option<&'static FieldDecl> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldDecl> {
        self.fields.iter().filter(|field| field.is_required())
    }

    /// Full shape check. Every construction path runs it before producing
    /// an instance, and registries run it on registration.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        let entity = self.type_name;

        if self.family.is_some() {
            if self.type_tag.trim().is_empty() {
                return Err(DeclarationError::MissingTypeTag { entity });
            }
            if self.type_tag.contains([',', ';', ':']) {
                return Err(DeclarationError::InvalidTypeTag {
                    entity,
                    tag: self.type_tag,
                });
            }
        }

        let mut seen = BTreeSet::new();
        for field in self.fields {
            if !seen.insert(field.name) {
                return Err(DeclarationError::DuplicateField {
                    entity,
                    field: field.name,
                });
            }
            if field.accepts.is_empty() {
                return Err(DeclarationError::EmptyAccepts {
                    entity,
                    field: field.name,
                });
            }
        }

        if let Some((defaulted, required)) = first_misordered(self.fields) {
            return Err(DeclarationError::RequiredAfterDefault {
                entity,
                required: self.fields[required].name,
                defaulted: self.fields[defaulted].name,
            });
        }

        for field in self.fields {
            let Some(value) = field.default.and_then(FieldDefault::to_value) else {
                continue;
            };
            if field.admit(value).is_err() {
                return Err(DeclarationError::InvalidDefault {
                    entity,
                    field: field.name,
                });
            }
        }

        if let Some(family) = self.family {
            for shared in family.shared {
                match self.field(shared.name) {
                    None => {
                        return Err(DeclarationError::MissingSharedField {
                            entity,
                            family: family.name,
                            field: shared.name,
                        });
                    }
                    Some(redeclared) if redeclared != shared => {
                        return Err(DeclarationError::SharedFieldMismatch {
                            entity,
                            family: family.name,
                            field: shared.name,
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }
}

/// Find the first required field that follows a defaulted one.
///
/// Returns `(defaulted, required)` indices.
pub const fn first_misordered(fields: &[FieldDecl]) -> Option<(usize, usize)> {
    let mut first_default: Option<usize> = None;
    let mut i = 0;
    while i < fields.len() {
        if fields[i].default.is_some() {
            if first_default.is_none() {
                first_default = Some(i);
            }
        } else if let Some(defaulted) = first_default {
            return Some((defaulted, i));
        }
        i += 1;
    }
    None
}

/// Compile-time form of the ordering rule, for use in `const _: () = ...`.
pub const fn assert_well_ordered(fields: &[FieldDecl]) {
    if first_misordered(fields).is_some() {
        panic!("required field declared after a defaulted field");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::NamedReference;

    const CYCLES: &[Constant] = &[
        Constant {
            name: "forever",
            doc: "never stop",
        },
        Constant {
            name: "once",
            doc: "stop after one",
        },
    ];

    const COUNT: FieldDecl = FieldDecl::required(
        "count",
        "",
        &[Accept::Literal(ValueKind::Integer), Accept::Keyword(CYCLES)],
    );

    #[test]
    fn literals_are_promoted_to_the_narrowest_accepted_kind() {
        let number = FieldDecl::required("n", "", accepts::NUMBER);
        assert_eq!(number.admit(Value::Bool(true)), Ok(Some(Value::Integer(1))));
        assert_eq!(number.admit(Value::Integer(4)), Ok(Some(Value::Integer(4))));
        assert_eq!(number.admit(Value::Real(0.5)), Ok(Some(Value::Real(0.5))));
        assert!(number.admit(Value::Text("a".into())).is_err());
    }

    #[test]
    fn references_do_not_cross_into_literals() {
        let integer = FieldDecl::required("i", "", accepts::INTEGER);
        let real_ref = NamedReference::new("x", ValueKind::Real, "1.5").unwrap();
        let int_ref = NamedReference::new("n", ValueKind::Integer, "2").unwrap();
        assert!(integer.admit(Value::Reference(real_ref)).is_err());
        assert!(integer.admit(Value::Reference(int_ref)).is_ok());

        let text_only = FieldDecl::required("t", "", accepts::TEXT);
        let text_ref = NamedReference::new("s", ValueKind::Text, "\"a\"").unwrap();
        assert!(text_only.admit(Value::Reference(text_ref)).is_err());
    }

    #[test]
    fn mappings_become_references_one_level_deep() {
        let real = FieldDecl::required("r", "", accepts::NUMBER);
        let mapping = serde_json::json!({"name": "LOAD", "kind": "real", "expression": "1.0"});
        let expected = NamedReference::new("LOAD", ValueKind::Real, "1.0").unwrap();
        assert_eq!(
            real.admit(Value::Nested(mapping)),
            Ok(Some(Value::Reference(expected)))
        );

        let wrong_kind = serde_json::json!({"name": "S", "kind": "string", "expression": "\"a\""});
        assert!(matches!(
            real.admit(Value::Nested(wrong_kind)),
            Err(Value::Reference(_))
        ));

        let bad_name = serde_json::json!({"name": "X, 99", "kind": "real", "expression": "1.0"});
        assert!(matches!(real.admit(Value::Nested(bad_name)), Err(Value::Nested(_))));

        let sequence = serde_json::json!([1.0]);
        assert!(real.admit(Value::Nested(sequence)).is_err());

        let text_only = FieldDecl::required("t", "", accepts::TEXT);
        let mapping = serde_json::json!({"name": "S", "kind": "string", "expression": "\"a\""});
        assert!(matches!(text_only.admit(Value::Nested(mapping)), Err(Value::Nested(_))));
    }

    #[test]
    fn keywords_are_interned() {
        assert_eq!(
            COUNT.admit(Value::Text("forever".into())),
            Ok(Some(Value::Keyword("forever")))
        );
        assert_eq!(COUNT.admit(Value::Integer(3)), Ok(Some(Value::Integer(3))));
        assert!(COUNT.admit(Value::Text("twice".into())).is_err());
    }

    #[test]
    fn null_is_only_admitted_by_optional_fields() {
        let optional = FieldDecl::optional("o", "", accepts::INTEGER);
        assert_eq!(optional.admit(Value::Null), Ok(None));
        assert_eq!(COUNT.admit(Value::Null), Err(Value::Null));
        assert!(optional.expected().ends_with("| null"));
    }

    #[test]
    fn misordering_is_located() {
        let fields = [
            FieldDecl::required("a", "", accepts::NUMBER),
            FieldDecl::optional("b", "", accepts::NUMBER),
            FieldDecl::required("c", "", accepts::NUMBER),
        ];
        assert_eq!(first_misordered(&fields), Some((1, 2)));
        assert_eq!(first_misordered(&fields[..2]), None);
    }

    #[test]
    fn invalid_defaults_are_rejected() {
        static DECL: Declaration = Declaration {
            type_name: "BadDefault",
            type_tag: "",
            doc: "",
            family: None,
            fields: &[FieldDecl::required("r", "", accepts::INTEGER).with_default(FieldDefault::Real(0.5))],
        };
        assert_eq!(
            DECL.validate(),
            Err(DeclarationError::InvalidDefault {
                entity: "BadDefault",
                field: "r",
            })
        );
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        static DECL: Declaration = Declaration {
            type_name: "Twice",
            type_tag: "",
            doc: "",
            family: None,
            fields: &[COUNT, COUNT],
        };
        assert!(matches!(
            DECL.validate(),
            Err(DeclarationError::DuplicateField { field: "count", .. })
        ));
    }

    #[test]
    fn fields_that_accept_nothing_are_rejected() {
        static DECL: Declaration = Declaration {
            type_name: "Mute",
            type_tag: "",
            doc: "",
            family: None,
            fields: &[FieldDecl::required("x", "", &[])],
        };
        assert!(matches!(
            DECL.validate(),
            Err(DeclarationError::EmptyAccepts { field: "x", .. })
        ));
    }
}
