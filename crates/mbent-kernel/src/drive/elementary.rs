//! Payload-free drive callers: `null` and `one`.

use super::{DRIVE_CALLER, Drive, INDEX, render};
use crate::declaration::{Declaration, FieldDecl};
use crate::entity::{Entity, Fields};
use crate::error::ShapeError;
use crate::value::Index;

const FIELDS: &[FieldDecl] = &[INDEX];

pub static NULL_DRIVE_CALLER: Declaration = Declaration {
    type_name: "NullDriveCaller",
    type_tag: "null",
    doc: "A drive caller that always returns zero",
    family: Some(&DRIVE_CALLER),
    fields: FIELDS,
};

pub static ONE_DRIVE_CALLER: Declaration = Declaration {
    type_name: "OneDriveCaller",
    type_tag: "one",
    doc: "A drive caller that always returns one",
    family: Some(&DRIVE_CALLER),
    fields: FIELDS,
};

/// `null`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NullDriveCaller {
    index: Option<Index>,
}

/// `one`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OneDriveCaller {
    index: Option<Index>,
}

impl NullDriveCaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, index: impl Into<Index>) -> Self {
        self.index = Some(index.into());
        self
    }
}

impl OneDriveCaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, index: impl Into<Index>) -> Self {
        self.index = Some(index.into());
        self
    }
}

impl Entity for NullDriveCaller {
    fn declaration() -> &'static Declaration {
        &NULL_DRIVE_CALLER
    }

    fn from_fields(fields: &mut Fields) -> Result<Self, ShapeError> {
        Ok(Self {
            index: fields.optional("index")?,
        })
    }

    fn serialize(&self) -> String {
        render(self)
    }
}

impl Drive for NullDriveCaller {
    fn variant(&self) -> &'static Declaration {
        &NULL_DRIVE_CALLER
    }

    fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    fn payload(&self) -> Vec<String> {
        Vec::new()
    }
}

impl Entity for OneDriveCaller {
    fn declaration() -> &'static Declaration {
        &ONE_DRIVE_CALLER
    }

    fn from_fields(fields: &mut Fields) -> Result<Self, ShapeError> {
        Ok(Self {
            index: fields.optional("index")?,
        })
    }

    fn serialize(&self) -> String {
        render(self)
    }
}

impl Drive for OneDriveCaller {
    fn variant(&self) -> &'static Declaration {
        &ONE_DRIVE_CALLER
    }

    fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    fn payload(&self) -> Vec<String> {
        Vec::new()
    }
}
