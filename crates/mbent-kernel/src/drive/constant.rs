use super::{DRIVE_CALLER, Drive, INDEX, render};
use crate::declaration::{Declaration, FieldDecl, accepts, assert_well_ordered};
use crate::entity::{Entity, Fields};
use crate::error::ShapeError;
use crate::value::{Index, Scalar};

pub static CONST_DRIVE_CALLER: Declaration = Declaration {
    type_name: "ConstDriveCaller",
    type_tag: "const",
    doc: "A drive caller that always returns the same constant value",
    family: Some(&DRIVE_CALLER),
    fields: FIELDS,
};

// `index` goes last: it has a default, `const_value` does not.
const FIELDS: &[FieldDecl] = &[
    FieldDecl::required(
        "const_value",
        "Value that will be output by the drive",
        accepts::NUMBER,
    ),
    INDEX,
];

const _: () = assert_well_ordered(FIELDS);

/// `const, <const_value>`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDriveCaller {
    const_value: Scalar,
    index: Option<Index>,
}

impl ConstDriveCaller {
    pub fn new(const_value: impl Into<Scalar>) -> Self {
        Self {
            const_value: const_value.into(),
            index: None,
        }
    }

    pub fn with_index(mut self, index: impl Into<Index>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn const_value(&self) -> &Scalar {
        &self.const_value
    }
}

impl Entity for ConstDriveCaller {
    fn declaration() -> &'static Declaration {
        &CONST_DRIVE_CALLER
    }

    fn from_fields(fields: &mut Fields) -> Result<Self, ShapeError> {
        Ok(Self {
            const_value: fields.required("const_value")?,
            index: fields.optional("index")?,
        })
    }

    fn serialize(&self) -> String {
        render(self)
    }
}

impl Drive for ConstDriveCaller {
    fn variant(&self) -> &'static Declaration {
        &CONST_DRIVE_CALLER
    }

    fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    fn payload(&self) -> Vec<String> {
        vec![self.const_value.to_string()]
    }
}
