//! Primitive value kinds of the MBDyn math parser.
//!
//! The parser knows four kinds, ordered by implicit promotion:
//!
//! - **bool** promotes to `integer` (0 or 1), `real` or `string`
//! - **integer** promotes to `real` or `string`
//! - **real** promotes to `string`
//! - **string** promotes to nothing
//!
//! Promotion is never applied in reverse.

use crate::declaration::Constant;

/// A built-in value kind of the input grammar.
///
/// Variant order is promotion order, so the derived `Ord` answers the
/// promotion question directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum ValueKind {
    /// Boolean number.
    #[serde(rename = "bool")]
    Boolean,

    /// Integer number.
    #[serde(rename = "integer")]
    Integer,

    /// Real number.
    #[serde(rename = "real")]
    Real,

    /// Text string.
    #[serde(rename = "string")]
    Text,
}

/// Every kind as an enumerated constant set, in promotion order.
pub const VALUE_KIND_CONSTANTS: &[Constant] = &[
    Constant {
        name: "bool",
        doc: "Boolean number; promoted to `integer`, `real` or `string` as 0 or 1 when required",
    },
    Constant {
        name: "integer",
        doc: "Integer number; promoted to `real` or `string` when required",
    },
    Constant {
        name: "real",
        doc: "Real number; promoted to `string` when required",
    },
    Constant {
        name: "string",
        doc: "Text string",
    },
];

impl ValueKind {
    pub const ALL: [ValueKind; 4] = [
        ValueKind::Boolean,
        ValueKind::Integer,
        ValueKind::Real,
        ValueKind::Text,
    ];

    /// The keyword MBDyn uses for this kind in variable declarations.
    pub const fn name(self) -> &'static str {
        VALUE_KIND_CONSTANTS[self as usize].name
    }

    pub const fn doc(self) -> &'static str {
        VALUE_KIND_CONSTANTS[self as usize].doc
    }

    /// Returns true if a value of kind `self` may stand in where `expected`
    /// is required.
    pub fn promotes_to(self, expected: Self) -> bool {
        self <= expected
    }

    /// The narrowest of `candidates` that `self` promotes to.
    pub fn narrowest_target<I>(self, candidates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        candidates
            .into_iter()
            .filter(|candidate| self.promotes_to(*candidate))
            .min()
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bool" | "boolean" => Ok(Self::Boolean),
            "integer" | "int" => Ok(Self::Integer),
            "real" | "float" => Ok(Self::Real),
            "string" | "text" => Ok(Self::Text),
            _ => Err(format!("unknown value kind: {s}")),
        }
    }
}
