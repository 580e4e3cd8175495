//! Field values, as supplied by callers and as stored in entities.
//!
//! [`Value`] is the loosely-typed currency of the construction pipeline:
//! typed callers produce it through `From` conversions, generic mappings
//! produce it through [`Value::from_json`]. Once a value has passed its
//! field's declaration it is converted into one of the strongly-typed
//! payload types below ([`Scalar`], [`Integral`]) via [`FromValue`].

use crate::kind::ValueKind;
use crate::reference::NamedReference;
use std::fmt;

/// Generic mapping input: field name → decoded value.
pub type Mapping = serde_json::Map<String, serde_json::Value>;

/// A value offered to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit "no value"; only optional fields admit it.
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    /// One of a field's enumerated keywords. Produced by admission only.
    Keyword(&'static str),
    Reference(NamedReference),
    /// Nested mapping or sequence from generic input. A field that accepts
    /// references builds a mapping into a [`NamedReference`]; anything
    /// deeper is left unconstructed.
    Nested(serde_json::Value),
}

impl Value {
    /// Convert a decoded JSON/TOML value. Numbers that fit `i64` become
    /// integers, every other number becomes a real.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Text(s.clone()),
            nested => Self::Nested(nested.clone()),
        }
    }

    /// The literal kind of this value, if it is a representable literal.
    pub fn literal_kind(&self) -> Option<ValueKind> {
        match self {
            Self::Bool(_) => Some(ValueKind::Boolean),
            Self::Integer(_) => Some(ValueKind::Integer),
            Self::Real(r) if r.is_finite() => Some(ValueKind::Real),
            Self::Text(_) => Some(ValueKind::Text),
            _ => None,
        }
    }

    /// Short description used in kind errors.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Real(r) if !r.is_finite() => "non-finite real".to_string(),
            Self::Keyword(k) => format!("keyword `{k}`"),
            Self::Reference(r) => format!("reference<{}>", r.kind()),
            Self::Nested(serde_json::Value::Array(_)) => "sequence".to_string(),
            Self::Nested(_) => "mapping".to_string(),
            literal => literal
                .literal_kind()
                .map(|kind| kind.name().to_string())
                .unwrap_or_else(|| "value".to_string()),
        }
    }

    /// Promote a literal to `target`. Returns `None` when promotion is not
    /// allowed.
    pub fn promote(self, target: ValueKind) -> Option<Self> {
        let kind = self.literal_kind()?;
        if !kind.promotes_to(target) {
            return None;
        }
        let promoted = match (self, target) {
            (same, _) if kind == target => same,
            (Self::Bool(b), ValueKind::Integer) => Self::Integer(i64::from(b)),
            (Self::Bool(b), ValueKind::Real) => Self::Real(if b { 1.0 } else { 0.0 }),
            (Self::Bool(b), ValueKind::Text) => Self::Text(i64::from(b).to_string()),
            (Self::Integer(i), ValueKind::Real) => Self::Real(i as f64),
            (Self::Integer(i), ValueKind::Text) => Self::Text(i.to_string()),
            (Self::Real(r), ValueKind::Text) => Self::Text(format_real(r)),
            _ => return None,
        };
        Some(promoted)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NamedReference> for Value {
    fn from(value: NamedReference) -> Self {
        Self::Reference(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", i64::from(*b)),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => f.write_str(&format_real(*r)),
            Self::Text(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Self::Keyword(k) => f.write_str(k),
            Self::Reference(r) => write!(f, "{r}"),
            Self::Nested(v) => write!(f, "{v}"),
        }
    }
}

/// Render a real so the grammar reads it back as a real: always with a
/// decimal point or an exponent.
pub fn format_real(value: f64) -> String {
    format!("{value:?}")
}

/// Conversion from an admitted [`Value`] into a payload type.
///
/// Returns `None` when the value's shape does not fit the target type;
/// the pipeline reports that as a kind error on the field.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Real(r) => Some(r),
            Value::Integer(i) => Some(i as f64),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for ValueKind {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Keyword(k) => k.parse().ok(),
            _ => None,
        }
    }
}

impl FromValue for NamedReference {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Reference(r) => Some(r),
            _ => None,
        }
    }
}

/// A numeric payload: a literal number or a reference standing in for one.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Integer(i64),
    Real(f64),
    Reference(NamedReference),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => f.write_str(&format_real(*r)),
            Self::Reference(r) => write!(f, "{r}"),
        }
    }
}

impl FromValue for Scalar {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(Self::Integer(i)),
            Value::Real(r) => Some(Self::Real(r)),
            Value::Reference(r) => Some(Self::Reference(r)),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Integer(i) => Value::Integer(i),
            Scalar::Real(r) => Value::Real(r),
            Scalar::Reference(r) => Value::Reference(r),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<NamedReference> for Scalar {
    fn from(value: NamedReference) -> Self {
        Self::Reference(value)
    }
}

/// An integer payload: a literal integer or a reference standing in for one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Integral {
    Literal(i64),
    Reference(NamedReference),
}

/// Index of a drive caller, for reuse by reference elsewhere in a model.
pub type Index = Integral;

impl fmt::Display for Integral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(i) => write!(f, "{i}"),
            Self::Reference(r) => write!(f, "{r}"),
        }
    }
}

impl FromValue for Integral {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(Self::Literal(i)),
            Value::Reference(r) => Some(Self::Reference(r)),
            _ => None,
        }
    }
}

impl From<Integral> for Value {
    fn from(value: Integral) -> Self {
        match value {
            Integral::Literal(i) => Value::Integer(i),
            Integral::Reference(r) => Value::Reference(r),
        }
    }
}

impl From<i64> for Integral {
    fn from(value: i64) -> Self {
        Self::Literal(value)
    }
}

impl From<i32> for Integral {
    fn from(value: i32) -> Self {
        Self::Literal(i64::from(value))
    }
}

impl From<u32> for Integral {
    fn from(value: u32) -> Self {
        Self::Literal(i64::from(value))
    }
}

impl From<NamedReference> for Integral {
    fn from(value: NamedReference) -> Self {
        Self::Reference(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers_keep_integer_and_real_apart() {
        assert_eq!(Value::from_json(&json!(42)), Value::Integer(42));
        assert_eq!(Value::from_json(&json!(42.0)), Value::Real(42.0));
        assert_eq!(Value::from_json(&json!(u64::MAX)), Value::Real(u64::MAX as f64));
    }

    #[test]
    fn json_containers_stay_nested() {
        let nested = Value::from_json(&json!({"name": "x"}));
        assert_eq!(nested.describe(), "mapping");
        assert_eq!(Value::from_json(&json!([1, 2])).describe(), "sequence");
        assert_eq!(Value::from_json(&json!(null)), Value::Null);
    }

    #[test]
    fn promotion_converts_representation() {
        assert_eq!(
            Value::Bool(true).promote(ValueKind::Integer),
            Some(Value::Integer(1))
        );
        assert_eq!(
            Value::Integer(3).promote(ValueKind::Real),
            Some(Value::Real(3.0))
        );
        assert_eq!(
            Value::Real(0.5).promote(ValueKind::Text),
            Some(Value::Text("0.5".to_string()))
        );
        assert_eq!(Value::Real(1.5).promote(ValueKind::Integer), None);
        assert_eq!(Value::Text("a".into()).promote(ValueKind::Real), None);
    }

    #[test]
    fn non_finite_reals_are_not_literals() {
        assert_eq!(Value::Real(f64::NAN).literal_kind(), None);
        assert_eq!(Value::Real(f64::INFINITY).describe(), "non-finite real");
        assert_eq!(Value::Real(f64::INFINITY).promote(ValueKind::Real), None);
    }

    #[test]
    fn reals_render_with_a_decimal_point() {
        assert_eq!(format_real(42.0), "42.0");
        assert_eq!(format_real(0.25), "0.25");
        assert_eq!(format_real(-3.5), "-3.5");
        assert_eq!(Scalar::from(2.0).to_string(), "2.0");
        assert_eq!(Scalar::from(2).to_string(), "2");
    }

    #[test]
    fn text_renders_quoted() {
        assert_eq!(Value::from("say \"hi\"").to_string(), "\"say \\\"hi\\\"\"");
        assert_eq!(Value::Keyword("forever").to_string(), "forever");
    }
}
