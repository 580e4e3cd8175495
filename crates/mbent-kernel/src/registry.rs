//! Registry of drive caller variants, keyed by type tag.
//!
//! The process-wide registry is built once, on first use or through
//! [`install`], and is read-only afterwards. Every declaration is checked
//! when it is registered, so a registry never holds a variant that cannot
//! be constructed.
//!
//! Generic input selects a variant through the [`DISCRIMINATOR`] key:
//!
//! ```text
//! {"type": "const", "const_value": 42, "index": 1}
//!   └─ lookup("const") ─> ConstDriveCaller::from_mapping({"const_value": 42, "index": 1})
//! ```

use crate::declaration::Declaration;
use crate::drive::{
    ConstDriveCaller, DRIVE_CALLER, Drive, LinearDriveCaller, NullDriveCaller, OneDriveCaller,
    RampDriveCaller, SineDriveCaller,
};
use crate::error::{ConstructionError, DeclarationError, DecodeError};
use crate::value::{Mapping, Value};
use std::sync::OnceLock;

/// Mapping key that selects the variant. Never forwarded to the variant.
pub const DISCRIMINATOR: &str = "type";

/// Root key carrying the schema marker in drive documents.
pub const SCHEMA_KEY: &str = "$schema";

/// Root key carrying the drive list in drive documents.
pub const DRIVES_KEY: &str = "drives";

pub type DecodeFn = fn(&Mapping) -> Result<Box<dyn Drive>, ConstructionError>;

/// One registered variant.
#[derive(Debug, Clone, Copy)]
pub struct VariantEntry {
    pub declaration: &'static Declaration,
    decode: DecodeFn,
}

impl VariantEntry {
    pub fn of<T: Drive + 'static>() -> Self {
        Self {
            declaration: T::declaration(),
            decode: decode_as::<T>,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.declaration.type_tag
    }

    /// Construct this variant from a mapping without the discriminator.
    pub fn decode(&self, data: &Mapping) -> Result<Box<dyn Drive>, ConstructionError> {
        (self.decode)(data)
    }
}

fn decode_as<T: Drive + 'static>(data: &Mapping) -> Result<Box<dyn Drive>, ConstructionError> {
    let drive = T::from_mapping(data)?;
    Ok(Box::new(drive))
}

/// Collects variants, checking each declaration as it arrives.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    variants: Vec<VariantEntry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder preloaded with every built-in variant.
    pub fn builtin() -> Result<Self, DeclarationError> {
        Self::new()
            .register::<NullDriveCaller>()?
            .register::<OneDriveCaller>()?
            .register::<ConstDriveCaller>()?
            .register::<LinearDriveCaller>()?
            .register::<RampDriveCaller>()?
            .register::<SineDriveCaller>()
    }

    pub fn register<T: Drive + 'static>(self) -> Result<Self, DeclarationError> {
        self.register_entry(VariantEntry::of::<T>())
    }

    pub fn register_entry(mut self, entry: VariantEntry) -> Result<Self, DeclarationError> {
        let declaration = entry.declaration;
        if let Err(err) = check_member(declaration, &self.variants) {
            tracing::warn!(entity = declaration.type_name, error = %err, "variant rejected");
            return Err(err);
        }
        tracing::debug!(
            entity = declaration.type_name,
            tag = declaration.type_tag,
            "variant registered"
        );
        self.variants.push(entry);
        Ok(self)
    }

    pub fn build(self) -> Registry {
        Registry {
            variants: self.variants,
        }
    }
}

fn check_member(
    declaration: &'static Declaration,
    registered: &[VariantEntry],
) -> Result<(), DeclarationError> {
    let in_family = declaration
        .family
        .is_some_and(|family| std::ptr::eq(family, &DRIVE_CALLER));
    if !in_family {
        return Err(DeclarationError::ForeignFamily {
            entity: declaration.type_name,
            family: DRIVE_CALLER.name,
        });
    }
    declaration.validate()?;
    if let Some(first) = registered
        .iter()
        .find(|entry| entry.tag() == declaration.type_tag)
    {
        return Err(DeclarationError::DuplicateTypeTag {
            tag: declaration.type_tag,
            first: first.declaration.type_name,
            second: declaration.type_name,
        });
    }
    Ok(())
}

/// Validated drive variants, in registration order.
#[derive(Debug)]
pub struct Registry {
    variants: Vec<VariantEntry>,
}

impl Registry {
    pub fn lookup(&self, tag: &str) -> Option<&VariantEntry> {
        self.variants.iter().find(|entry| entry.tag() == tag)
    }

    pub fn declarations(&self) -> impl Iterator<Item = &'static Declaration> + '_ {
        self.variants.iter().map(|entry| entry.declaration)
    }

    pub fn tags(&self) -> Vec<&'static str> {
        self.variants.iter().map(VariantEntry::tag).collect()
    }

    /// Decode one tagged drive mapping.
    pub fn decode(&self, data: &Mapping) -> Result<Box<dyn Drive>, DecodeError> {
        let tag = match data.get(DISCRIMINATOR) {
            None => return Err(DecodeError::MissingDiscriminator),
            Some(serde_json::Value::String(tag)) => tag,
            Some(other) => {
                return Err(DecodeError::InvalidDiscriminator {
                    received: Value::from_json(other).describe(),
                });
            }
        };
        let Some(entry) = self.lookup(tag) else {
            return Err(DecodeError::UnknownVariant {
                tag: tag.clone(),
                known: self.tags(),
            });
        };
        let mut fields = data.clone();
        fields.remove(DISCRIMINATOR);
        Ok(entry.decode(&fields)?)
    }

    /// Decode a `{"$schema"?, "drives": [...]}` document.
    ///
    /// A malformed document fails as a whole. Otherwise every entry is
    /// decoded independently and its outcome returned in document order.
    pub fn decode_document(
        &self,
        document: &serde_json::Value,
    ) -> Result<Vec<Result<Box<dyn Drive>, DecodeError>>, DecodeError> {
        let serde_json::Value::Object(root) = document else {
            return Err(DecodeError::Document(
                "the document root must be a mapping".to_string(),
            ));
        };
        if let Some(key) = root
            .keys()
            .find(|key| key.as_str() != SCHEMA_KEY && key.as_str() != DRIVES_KEY)
        {
            return Err(DecodeError::Document(format!("unknown root key `{key}`")));
        }
        if let Some(marker) = root.get(SCHEMA_KEY) {
            if !marker.is_string() {
                return Err(DecodeError::Document(format!(
                    "`{SCHEMA_KEY}` must be a string"
                )));
            }
        }
        let drives = match root.get(DRIVES_KEY) {
            Some(serde_json::Value::Array(drives)) => drives,
            Some(_) => {
                return Err(DecodeError::Document(format!(
                    "`{DRIVES_KEY}` must be a sequence"
                )));
            }
            None => {
                return Err(DecodeError::Document(format!(
                    "missing `{DRIVES_KEY}` sequence"
                )));
            }
        };

        let decoded = drives
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                let result = match entry {
                    serde_json::Value::Object(data) => self.decode(data),
                    _ => Err(DecodeError::Document(
                        "a drive entry must be a mapping".to_string(),
                    )),
                };
                result.map_err(|source| DecodeError::Entry {
                    position,
                    source: Box::new(source),
                })
            })
            .collect::<Vec<_>>();
        tracing::debug!(
            drives = decoded.len(),
            failed = decoded.iter().filter(|r| r.is_err()).count(),
            "drive document decoded"
        );
        Ok(decoded)
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry. Built from the built-in variants unless
/// another registry was installed first.
pub fn registry() -> Result<&'static Registry, DeclarationError> {
    if let Some(registry) = REGISTRY.get() {
        return Ok(registry);
    }
    let built = RegistryBuilder::builtin()?.build();
    tracing::debug!(variants = built.variants.len(), "drive registry initialised");
    Ok(REGISTRY.get_or_init(|| built))
}

/// Install `registry` as the process-wide registry. Fails, handing the
/// registry back, once one is in place.
pub fn install(registry: Registry) -> Result<(), Registry> {
    let variants = registry.variants.len();
    REGISTRY.set(registry)?;
    tracing::debug!(variants, "drive registry installed");
    Ok(())
}
