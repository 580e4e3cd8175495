use super::{DRIVE_CALLER, Drive, INDEX, render};
use crate::declaration::{Accept, Constant, Declaration, FieldDecl, accepts, assert_well_ordered};
use crate::entity::{Entity, Fields};
use crate::error::ShapeError;
use crate::kind::ValueKind;
use crate::reference::NamedReference;
use crate::value::{FromValue, Index, Integral, Scalar, Value};
use std::fmt;

pub static SINE_DRIVE_CALLER: Declaration = Declaration {
    type_name: "SineDriveCaller",
    type_tag: "sine",
    doc: "A drive caller returning `initial_value + amplitude * sin(omega * (t - initial_time))` \
          after `initial_time`, for the requested number of cycles",
    family: Some(&DRIVE_CALLER),
    fields: FIELDS,
};

const CYCLE_KEYWORDS: &[Constant] = &[
    Constant {
        name: "forever",
        doc: "The oscillation never ends",
    },
    Constant {
        name: "one",
        doc: "A single full cycle, after which the drive holds its initial value",
    },
    Constant {
        name: "half",
        doc: "Half a cycle, after which the drive holds its initial value",
    },
];

const NUMBER_OF_CYCLES: &[Accept] = &[
    Accept::Reference(ValueKind::Integer),
    Accept::Literal(ValueKind::Integer),
    Accept::Keyword(CYCLE_KEYWORDS),
];

const FIELDS: &[FieldDecl] = &[
    FieldDecl::required("initial_time", "Time the oscillation starts", accepts::NUMBER),
    FieldDecl::required("omega", "Angular frequency", accepts::NUMBER),
    FieldDecl::required("amplitude", "Amplitude of the oscillation", accepts::NUMBER),
    FieldDecl::required(
        "number_of_cycles",
        "How many cycles to run; a positive count holds the final value afterwards",
        NUMBER_OF_CYCLES,
    ),
    FieldDecl::required(
        "initial_value",
        "Value before the oscillation starts",
        accepts::NUMBER,
    ),
    INDEX,
];

const _: () = assert_well_ordered(FIELDS);

/// Duration of a sine drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycles {
    Count(Integral),
    Forever,
    One,
    Half,
}

impl fmt::Display for Cycles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(count) => write!(f, "{count}"),
            Self::Forever => f.write_str("forever"),
            Self::One => f.write_str("one"),
            Self::Half => f.write_str("half"),
        }
    }
}

impl FromValue for Cycles {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Keyword("forever") => Some(Self::Forever),
            Value::Keyword("one") => Some(Self::One),
            Value::Keyword("half") => Some(Self::Half),
            other => Integral::from_value(other).map(Self::Count),
        }
    }
}

impl From<Integral> for Cycles {
    fn from(value: Integral) -> Self {
        Self::Count(value)
    }
}

impl From<i64> for Cycles {
    fn from(value: i64) -> Self {
        Self::Count(value.into())
    }
}

impl From<i32> for Cycles {
    fn from(value: i32) -> Self {
        Self::Count(value.into())
    }
}

impl From<NamedReference> for Cycles {
    fn from(value: NamedReference) -> Self {
        Self::Count(value.into())
    }
}

/// `sine, <initial_time>, <omega>, <amplitude>, <number_of_cycles>, <initial_value>`
#[derive(Debug, Clone, PartialEq)]
pub struct SineDriveCaller {
    initial_time: Scalar,
    omega: Scalar,
    amplitude: Scalar,
    number_of_cycles: Cycles,
    initial_value: Scalar,
    index: Option<Index>,
}

impl SineDriveCaller {
    pub fn new(
        initial_time: impl Into<Scalar>,
        omega: impl Into<Scalar>,
        amplitude: impl Into<Scalar>,
        number_of_cycles: Cycles,
        initial_value: impl Into<Scalar>,
    ) -> Self {
        Self {
            initial_time: initial_time.into(),
            omega: omega.into(),
            amplitude: amplitude.into(),
            number_of_cycles,
            initial_value: initial_value.into(),
            index: None,
        }
    }

    pub fn with_index(mut self, index: impl Into<Index>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn number_of_cycles(&self) -> &Cycles {
        &self.number_of_cycles
    }
}

impl Entity for SineDriveCaller {
    fn declaration() -> &'static Declaration {
        &SINE_DRIVE_CALLER
    }

    fn from_fields(fields: &mut Fields) -> Result<Self, ShapeError> {
        Ok(Self {
            initial_time: fields.required("initial_time")?,
            omega: fields.required("omega")?,
            amplitude: fields.required("amplitude")?,
            number_of_cycles: fields.required("number_of_cycles")?,
            initial_value: fields.required("initial_value")?,
            index: fields.optional("index")?,
        })
    }

    fn serialize(&self) -> String {
        render(self)
    }
}

impl Drive for SineDriveCaller {
    fn variant(&self) -> &'static Declaration {
        &SINE_DRIVE_CALLER
    }

    fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    fn payload(&self) -> Vec<String> {
        vec![
            self.initial_time.to_string(),
            self.omega.to_string(),
            self.amplitude.to_string(),
            self.number_of_cycles.to_string(),
            self.initial_value.to_string(),
        ]
    }
}
