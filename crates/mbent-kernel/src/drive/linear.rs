use super::{DRIVE_CALLER, Drive, INDEX, render};
use crate::declaration::{Declaration, FieldDecl, accepts, assert_well_ordered};
use crate::entity::{Entity, Fields};
use crate::error::ShapeError;
use crate::value::{Index, Scalar};

pub static LINEAR_DRIVE_CALLER: Declaration = Declaration {
    type_name: "LinearDriveCaller",
    type_tag: "linear",
    doc: "A drive caller returning `const_coef + slope_coef * t`",
    family: Some(&DRIVE_CALLER),
    fields: FIELDS,
};

const FIELDS: &[FieldDecl] = &[
    FieldDecl::required("const_coef", "Value at time zero", accepts::NUMBER),
    FieldDecl::required("slope_coef", "Rate of change over time", accepts::NUMBER),
    INDEX,
];

const _: () = assert_well_ordered(FIELDS);

/// `linear, <const_coef>, <slope_coef>`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearDriveCaller {
    const_coef: Scalar,
    slope_coef: Scalar,
    index: Option<Index>,
}

impl LinearDriveCaller {
    pub fn new(const_coef: impl Into<Scalar>, slope_coef: impl Into<Scalar>) -> Self {
        Self {
            const_coef: const_coef.into(),
            slope_coef: slope_coef.into(),
            index: None,
        }
    }

    pub fn with_index(mut self, index: impl Into<Index>) -> Self {
        self.index = Some(index.into());
        self
    }
}

impl Entity for LinearDriveCaller {
    fn declaration() -> &'static Declaration {
        &LINEAR_DRIVE_CALLER
    }

    fn from_fields(fields: &mut Fields) -> Result<Self, ShapeError> {
        Ok(Self {
            const_coef: fields.required("const_coef")?,
            slope_coef: fields.required("slope_coef")?,
            index: fields.optional("index")?,
        })
    }

    fn serialize(&self) -> String {
        render(self)
    }
}

impl Drive for LinearDriveCaller {
    fn variant(&self) -> &'static Declaration {
        &LINEAR_DRIVE_CALLER
    }

    fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    fn payload(&self) -> Vec<String> {
        vec![self.const_coef.to_string(), self.slope_coef.to_string()]
    }
}
