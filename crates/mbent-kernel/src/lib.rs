//! # mbent Kernel
//!
//! Declared, validated and serializable entities of the MBDyn input
//! grammar.
//!
//! Each entity type owns one static declaration. The declaration is the
//! only source of truth: construction validates against it, serialization
//! walks it, and the schema exporter describes it.
//!
//! ## Architecture
//!
//! ```text
//! ValueKind             ← bool < integer < real < string
//!     │
//! NamedReference        ← math-parser variable standing in for a literal
//!     │
//! Declaration           ← ordered field table, type tag, docs
//!     │
//! Entity                ← from_named / from_positional / from_mapping → serialize
//!     │
//! Drive                 ← family header "driver: <index>, <tag>" + payload
//!     │
//! Registry              ← tag → variant, decode tagged mappings and documents
//!     │
//! schema                ← JSON Schema export of registered declarations
//! ```

pub mod declaration;
pub mod drive;
pub mod entity;
pub mod error;
pub mod kind;
pub mod reference;
pub mod registry;
pub mod schema;
pub mod value;

pub use declaration::{Accept, Constant, Declaration, Family, FieldDecl, FieldDefault, accepts};
pub use drive::{
    CONST_DRIVE_CALLER, ConstDriveCaller, Cycles, DRIVE_CALLER, Drive, FinalTime, INDEX,
    LINEAR_DRIVE_CALLER, LinearDriveCaller, NULL_DRIVE_CALLER, NullDriveCaller, ONE_DRIVE_CALLER,
    OneDriveCaller, RAMP_DRIVE_CALLER, RampDriveCaller, SINE_DRIVE_CALLER, SineDriveCaller,
    header, render,
};
pub use entity::{Entity, Fields};
pub use error::{ConstructionError, DeclarationError, DecodeError, ShapeError};
pub use kind::{VALUE_KIND_CONSTANTS, ValueKind};
pub use reference::{IDENTIFIER_PATTERN, NAMED_REFERENCE, NamedReference, is_identifier};
pub use registry::{
    DISCRIMINATOR, Registry, RegistryBuilder, VariantEntry, install, registry,
};
pub use schema::{EntitySchema, FieldSchema, SchemaOptions, describe, json_schema_document};
pub use value::{FromValue, Index, Integral, Mapping, Scalar, Value, format_real};
