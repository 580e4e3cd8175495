use super::{DRIVE_CALLER, Drive, INDEX, render};
use crate::declaration::{Accept, Constant, Declaration, FieldDecl, accepts, assert_well_ordered};
use crate::entity::{Entity, Fields};
use crate::error::ShapeError;
use crate::kind::ValueKind;
use crate::reference::NamedReference;
use crate::value::{FromValue, Index, Scalar, Value};
use std::fmt;

pub static RAMP_DRIVE_CALLER: Declaration = Declaration {
    type_name: "RampDriveCaller",
    type_tag: "ramp",
    doc: "A drive caller that starts at `initial_value` and grows with `slope` \
          between `initial_time` and `final_time`",
    family: Some(&DRIVE_CALLER),
    fields: FIELDS,
};

const RAMP_END: &[Constant] = &[Constant {
    name: "forever",
    doc: "The ramp never stops growing",
}];

const FINAL_TIME: &[Accept] = &[
    Accept::Reference(ValueKind::Real),
    Accept::Literal(ValueKind::Integer),
    Accept::Literal(ValueKind::Real),
    Accept::Keyword(RAMP_END),
];

const FIELDS: &[FieldDecl] = &[
    FieldDecl::required("slope", "Rate of growth while the ramp is active", accepts::NUMBER),
    FieldDecl::required("initial_time", "Time the ramp starts", accepts::NUMBER),
    FieldDecl::required("final_time", "Time the ramp stops, or `forever`", FINAL_TIME),
    FieldDecl::required(
        "initial_value",
        "Value before the ramp starts",
        accepts::NUMBER,
    ),
    INDEX,
];

const _: () = assert_well_ordered(FIELDS);

/// End of a ramp.
#[derive(Debug, Clone, PartialEq)]
pub enum FinalTime {
    At(Scalar),
    Forever,
}

impl fmt::Display for FinalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(time) => write!(f, "{time}"),
            Self::Forever => f.write_str("forever"),
        }
    }
}

impl FromValue for FinalTime {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Keyword("forever") => Some(Self::Forever),
            other => Scalar::from_value(other).map(Self::At),
        }
    }
}

impl From<Scalar> for FinalTime {
    fn from(value: Scalar) -> Self {
        Self::At(value)
    }
}

impl From<i32> for FinalTime {
    fn from(value: i32) -> Self {
        Self::At(value.into())
    }
}

impl From<i64> for FinalTime {
    fn from(value: i64) -> Self {
        Self::At(value.into())
    }
}

impl From<f64> for FinalTime {
    fn from(value: f64) -> Self {
        Self::At(value.into())
    }
}

impl From<NamedReference> for FinalTime {
    fn from(value: NamedReference) -> Self {
        Self::At(value.into())
    }
}

/// `ramp, <slope>, <initial_time>, <final_time>, <initial_value>`
#[derive(Debug, Clone, PartialEq)]
pub struct RampDriveCaller {
    slope: Scalar,
    initial_time: Scalar,
    final_time: FinalTime,
    initial_value: Scalar,
    index: Option<Index>,
}

impl RampDriveCaller {
    pub fn new(
        slope: impl Into<Scalar>,
        initial_time: impl Into<Scalar>,
        final_time: impl Into<FinalTime>,
        initial_value: impl Into<Scalar>,
    ) -> Self {
        Self {
            slope: slope.into(),
            initial_time: initial_time.into(),
            final_time: final_time.into(),
            initial_value: initial_value.into(),
            index: None,
        }
    }

    pub fn with_index(mut self, index: impl Into<Index>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn final_time(&self) -> &FinalTime {
        &self.final_time
    }
}

impl Entity for RampDriveCaller {
    fn declaration() -> &'static Declaration {
        &RAMP_DRIVE_CALLER
    }

    fn from_fields(fields: &mut Fields) -> Result<Self, ShapeError> {
        Ok(Self {
            slope: fields.required("slope")?,
            initial_time: fields.required("initial_time")?,
            final_time: fields.required("final_time")?,
            initial_value: fields.required("initial_value")?,
            index: fields.optional("index")?,
        })
    }

    fn serialize(&self) -> String {
        render(self)
    }
}

impl Drive for RampDriveCaller {
    fn variant(&self) -> &'static Declaration {
        &RAMP_DRIVE_CALLER
    }

    fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    fn payload(&self) -> Vec<String> {
        vec![
            self.slope.to_string(),
            self.initial_time.to_string(),
            self.final_time.to_string(),
            self.initial_value.to_string(),
        ]
    }
}
