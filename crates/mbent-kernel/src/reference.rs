//! Named references to math-parser variables.
//!
//! Every time a numeric value is expected, MBDyn accepts a variable of the
//! math parser instead. Variables are strongly typed; a reference may stand
//! in for any literal kind its own kind promotes to. Binding the expression
//! to the name happens elsewhere in the input file, so a reference prints
//! only its name.

use crate::declaration::{Accept, Declaration, FieldDecl, accepts};
use crate::entity::{Entity, Fields};
use crate::error::ShapeError;
use crate::kind::{VALUE_KIND_CONSTANTS, ValueKind};
use std::fmt;

pub static NAMED_REFERENCE: Declaration = Declaration {
    type_name: "NamedReference",
    type_tag: "",
    doc: "A math-parser variable usable wherever a literal of a kind it promotes to is expected",
    family: None,
    fields: FIELDS,
};

const FIELDS: &[FieldDecl] = &[
    FieldDecl::required("name", "Name of the variable", accepts::TEXT),
    FieldDecl::required(
        "kind",
        "Kind of the variable as declared to the math parser",
        &[Accept::Keyword(VALUE_KIND_CONSTANTS)],
    ),
    FieldDecl::required(
        "expression",
        "Expression bound to the variable, kept verbatim",
        accepts::TEXT,
    ),
];

const _: () = crate::declaration::assert_well_ordered(FIELDS);

/// A symbolic stand-in for a literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedReference {
    name: String,
    kind: ValueKind,
    expression: String,
}

impl NamedReference {
    /// Fails when `name` is not an identifier.
    pub fn new(
        name: impl Into<String>,
        kind: ValueKind,
        expression: impl Into<String>,
    ) -> Result<Self, ShapeError> {
        let name = name.into();
        check_name(&name)?;
        Ok(Self {
            name,
            kind,
            expression: expression.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

/// [`is_identifier`] as a regular expression, for schema export.
pub const IDENTIFIER_PATTERN: &str = "^[A-Za-z_][A-Za-z0-9_]*$";

/// A reference prints as a single grammar token: an ASCII letter or `_`
/// followed by ASCII letters, digits or `_`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_name(name: &str) -> Result<(), ShapeError> {
    if is_identifier(name) {
        return Ok(());
    }
    Err(ShapeError::Kind {
        field: "name".to_string(),
        expected: "identifier".to_string(),
        received: format!("{name:?}"),
    })
}

impl fmt::Display for NamedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Entity for NamedReference {
    fn declaration() -> &'static Declaration {
        &NAMED_REFERENCE
    }

    fn from_fields(fields: &mut Fields) -> Result<Self, ShapeError> {
        let name: String = fields.required("name")?;
        check_name(&name)?;
        Ok(Self {
            name,
            kind: fields.required("kind")?,
            expression: fields.required("expression")?,
        })
    }

    fn serialize(&self) -> String {
        self.name.clone()
    }
}
