//! The drive caller family.
//!
//! Every time some entity can be driven, i.e. a value can be expressed as
//! dependent on some external input, MBDyn uses a drive caller: a scalar
//! function whose value usually changes over time.
//!
//! All variants share one field, `index`, and one derived fragment, the
//! header. The header is computed once, by [`header`], from the index and
//! the variant's type tag; variants only contribute payload tokens.
//!
//! ```text
//! header    = "driver: " index ", " type_tag    (index present)
//!           | type_tag                          (index absent)
//! serialize = header { ", " payload_token }
//! ```

mod constant;
mod elementary;
mod linear;
mod ramp;
mod sine;

pub use constant::{CONST_DRIVE_CALLER, ConstDriveCaller};
pub use elementary::{NULL_DRIVE_CALLER, NullDriveCaller, ONE_DRIVE_CALLER, OneDriveCaller};
pub use linear::{LINEAR_DRIVE_CALLER, LinearDriveCaller};
pub use ramp::{FinalTime, RAMP_DRIVE_CALLER, RampDriveCaller};
pub use sine::{Cycles, SINE_DRIVE_CALLER, SineDriveCaller};

use crate::declaration::{Declaration, Family, FieldDecl, accepts};
use crate::entity::Entity;
use crate::value::Index;

/// The shared `index` field. Variants redeclare it after their required
/// fields.
pub const INDEX: FieldDecl = FieldDecl::optional(
    "index",
    "Index of this drive, to reuse it by reference",
    accepts::INTEGER,
);

pub static DRIVE_CALLER: Family = Family {
    name: "DriveCaller",
    doc: "A scalar function, usually of time, used wherever an entity can be driven",
    shared: &[INDEX],
};

/// Leading fragment common to every drive caller.
pub fn header(index: Option<&Index>, type_tag: &str) -> String {
    match index {
        Some(index) => format!("driver: {index}, {type_tag}"),
        None => type_tag.to_string(),
    }
}

/// A member of the drive caller family.
pub trait Drive: Entity + std::fmt::Debug + Send + Sync {
    /// The declaration of this value's variant.
    fn variant(&self) -> &'static Declaration;

    fn index(&self) -> Option<&Index>;

    /// Payload tokens, in grammar order, after the header.
    fn payload(&self) -> Vec<String>;

    fn type_tag(&self) -> &'static str {
        self.variant().type_tag
    }

    fn drive_header(&self) -> String {
        header(self.index(), self.type_tag())
    }
}

/// Serialize a drive: its header followed by its payload tokens.
pub fn render<D: Drive + ?Sized>(drive: &D) -> String {
    let mut line = drive.drive_header();
    for token in drive.payload() {
        line.push_str(", ");
        line.push_str(&token);
    }
    line
}
