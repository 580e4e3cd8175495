//! The entity contract and its construction pipeline.
//!
//! Every entry point funnels into [`construct`]:
//!
//! ```text
//! from_named(args)        ─┐
//! from_positional(values) ─┼─> construct ─> Declaration::validate
//! from_mapping(data)      ─┘                Fields::check       (all issues)
//!                                           Entity::from_fields (typed payload)
//! ```
//!
//! Construction is all-or-nothing: every issue found in the input is
//! reported together and no instance is produced.

use crate::declaration::Declaration;
use crate::error::{ConstructionError, ShapeError};
use crate::value::{FromValue, Mapping, Value};

/// A declarable, validated, serializable MBDyn entity.
pub trait Entity {
    /// The single static declaration of this entity type.
    fn declaration() -> &'static Declaration
    where
        Self: Sized;

    /// Build the typed entity from fields that already passed validation.
    fn from_fields(fields: &mut Fields) -> Result<Self, ShapeError>
    where
        Self: Sized;

    /// The exact grammar fragment for this entity.
    fn serialize(&self) -> String;

    /// Build from a generic mapping; every key is forwarded as a named
    /// argument.
    fn from_mapping(data: &Mapping) -> Result<Self, ConstructionError>
    where
        Self: Sized,
    {
        let args = data
            .iter()
            .map(|(key, value)| (key.clone(), Value::from_json(value)))
            .collect();
        construct(args, Vec::new())
    }

    /// Build from `(field name, value)` pairs.
    fn from_named<I, K, V>(args: I) -> Result<Self, ConstructionError>
    where
        Self: Sized,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let args = args
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        construct(args, Vec::new())
    }

    /// Build from values given in declared field order.
    fn from_positional<I, V>(values: I) -> Result<Self, ConstructionError>
    where
        Self: Sized,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let fields = Self::declaration().fields;
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let mut issues = Vec::new();
        if values.len() > fields.len() {
            issues.push(ShapeError::TooManyValues {
                expected: fields.len(),
                received: values.len(),
            });
        }
        let args = fields
            .iter()
            .map(|field| field.name.to_string())
            .zip(values)
            .collect();
        construct(args, issues)
    }
}

/// Shared pipeline behind every entry point. `issues` carries violations
/// found before field matching (positional overflow).
fn construct<T: Entity>(
    args: Vec<(String, Value)>,
    mut issues: Vec<ShapeError>,
) -> Result<T, ConstructionError> {
    let declaration = T::declaration();
    declaration.validate()?;
    let entity = declaration.type_name;

    let checked = Fields::check(declaration, args);
    let mut fields = match checked {
        Ok(fields) if issues.is_empty() => fields,
        Ok(_) => return Err(rejected(entity, issues)),
        Err(found) => {
            issues.extend(found);
            return Err(rejected(entity, issues));
        }
    };
    T::from_fields(&mut fields).map_err(|issue| rejected(entity, vec![issue]))
}

fn rejected(entity: &'static str, issues: Vec<ShapeError>) -> ConstructionError {
    tracing::debug!(entity, issues = issues.len(), "construction rejected");
    ConstructionError::Shape { entity, issues }
}

/// Validated field values of one construction, in declared order, with
/// defaults applied.
#[derive(Debug, Clone)]
pub struct Fields {
    declaration: &'static Declaration,
    values: Vec<Option<Value>>,
}

impl Fields {
    /// Match `args` against `declaration`, admitting each value into its
    /// field. Collects every issue in input order, then missing fields in
    /// declared order.
    pub fn check(
        declaration: &'static Declaration,
        args: Vec<(String, Value)>,
    ) -> Result<Self, Vec<ShapeError>> {
        let count = declaration.fields.len();
        let mut supplied = vec![false; count];
        let mut values: Vec<Option<Value>> = vec![None; count];
        let mut issues = Vec::new();

        for (name, value) in args {
            let Some(position) = declaration.position(&name) else {
                issues.push(ShapeError::UnknownField { field: name });
                continue;
            };
            if supplied[position] {
                issues.push(ShapeError::DuplicateField { field: name });
                continue;
            }
            supplied[position] = true;

            let field = &declaration.fields[position];
            match field.admit(value) {
                Ok(admitted) => values[position] = admitted,
                Err(rejected) => issues.push(ShapeError::Kind {
                    field: name,
                    expected: field.expected(),
                    received: rejected.describe(),
                }),
            }
        }

        for (position, field) in declaration.fields.iter().enumerate() {
            if supplied[position] {
                continue;
            }
            match field.default {
                None => issues.push(ShapeError::MissingField { field: field.name }),
                Some(default) => {
                    values[position] = default
                        .to_value()
                        .and_then(|value| field.admit(value).ok().flatten());
                }
            }
        }

        if issues.is_empty() {
            Ok(Self {
                declaration,
                values,
            })
        } else {
            Err(issues)
        }
    }

    /// Take a required field's value.
    pub fn required<T: FromValue>(&mut self, name: &str) -> Result<T, ShapeError> {
        match self.optional(name)? {
            Some(value) => Ok(value),
            None => Err(ShapeError::MissingField {
                field: self.field_name(name),
            }),
        }
    }

    /// Take an optional field's value; `None` when absent.
    pub fn optional<T: FromValue>(&mut self, name: &str) -> Result<Option<T>, ShapeError> {
        let Some(position) = self.declaration.position(name) else {
            return Err(ShapeError::UnknownField {
                field: name.to_string(),
            });
        };
        let Some(value) = self.values[position].take() else {
            return Ok(None);
        };
        let received = value.describe();
        T::from_value(value).map(Some).ok_or_else(|| ShapeError::Kind {
            field: name.to_string(),
            expected: self.declaration.fields[position].expected(),
            received,
        })
    }

    fn field_name(&self, name: &str) -> &'static str {
        self.declaration
            .field(name)
            .map_or("<undeclared>", |field| field.name)
    }
}
