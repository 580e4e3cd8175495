//! Error types for declaration, construction and decoding.

/// A declaration is statically invalid. Fatal: no instance of the entity
/// can be constructed while its declaration is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    #[error("{entity}: a family member must declare a type tag")]
    MissingTypeTag { entity: &'static str },

    #[error("{entity}: type tag `{tag}` must not contain `,`, `;` or `:`")]
    InvalidTypeTag {
        entity: &'static str,
        tag: &'static str,
    },

    #[error("{entity}: field `{field}` is declared more than once")]
    DuplicateField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity}: field `{field}` accepts no value")]
    EmptyAccepts {
        entity: &'static str,
        field: &'static str,
    },

    /// Positional construction requires every required field to come first.
    #[error(
        "{entity}: required field `{required}` is declared after defaulted field `{defaulted}`"
    )]
    RequiredAfterDefault {
        entity: &'static str,
        required: &'static str,
        defaulted: &'static str,
    },

    #[error("{entity}: {family} field `{field}` is not redeclared")]
    MissingSharedField {
        entity: &'static str,
        family: &'static str,
        field: &'static str,
    },

    #[error("{entity}: {family} field `{field}` is redeclared with a different shape")]
    SharedFieldMismatch {
        entity: &'static str,
        family: &'static str,
        field: &'static str,
    },

    #[error("{entity}: default of field `{field}` is rejected by its own declaration")]
    InvalidDefault {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity} is not a member of the {family} family")]
    ForeignFamily {
        entity: &'static str,
        family: &'static str,
    },

    #[error("type tag `{tag}` is declared by both {first} and {second}")]
    DuplicateTypeTag {
        tag: &'static str,
        first: &'static str,
        second: &'static str,
    },
}

/// One shape violation found while validating construction input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    /// Includes attempts to set derived attributes such as the type tag.
    #[error("unknown field `{field}`")]
    UnknownField { field: String },

    #[error("field `{field}` expects {expected}, got {received}")]
    Kind {
        field: String,
        expected: String,
        received: String,
    },

    #[error("field `{field}` is given more than once")]
    DuplicateField { field: String },

    #[error("expected at most {expected} positional values, got {received}")]
    TooManyValues { expected: usize, received: usize },
}

impl ShapeError {
    /// The field this issue is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field } => Some(*field),
            Self::UnknownField { field }
            | Self::Kind { field, .. }
            | Self::DuplicateField { field } => Some(field.as_str()),
            Self::TooManyValues { .. } => None,
        }
    }
}

/// Construction failed. No partially initialised entity exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error("invalid {entity}: {}", join_issues(.issues))]
    Shape {
        entity: &'static str,
        issues: Vec<ShapeError>,
    },
}

impl ConstructionError {
    /// Shape issues, in input order. Empty for declaration errors.
    pub fn issues(&self) -> &[ShapeError] {
        match self {
            Self::Shape { issues, .. } => issues,
            Self::Declaration(_) => &[],
        }
    }
}

fn join_issues(issues: &[ShapeError]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure decoding a tagged drive mapping or a drive document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed drive document: {0}")]
    Document(String),

    #[error("drive mapping has no `type` key")]
    MissingDiscriminator,

    #[error("drive `type` must be a string, got {received}")]
    InvalidDiscriminator { received: String },

    #[error("unknown drive type `{tag}` (known: {})", .known.join(", "))]
    UnknownVariant {
        tag: String,
        known: Vec<&'static str>,
    },

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("drives[{position}]: {source}")]
    Entry {
        position: usize,
        source: Box<DecodeError>,
    },
}
