//! Structure export, derived from the same declaration tables used for
//! validation and serialization.

use crate::declaration::{Accept, Constant, Declaration, FieldDecl, FieldDefault};
use crate::kind::{VALUE_KIND_CONSTANTS, ValueKind};
use crate::reference::{IDENTIFIER_PATTERN, NAMED_REFERENCE};
use crate::registry::{DISCRIMINATOR, DRIVES_KEY, Registry, SCHEMA_KEY};
use serde::Serialize;
use serde_json::{Map, Value, json};

pub const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySchema {
    pub type_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<&'static str>,
    pub doc: &'static str,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub name: &'static str,
    pub required: bool,
    pub accepts: Vec<AcceptSchema>,
    /// Absent for required fields; `null` for optional fields without a value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub doc: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "accept", rename_all = "camelCase")]
pub enum AcceptSchema {
    Literal { kind: ValueKind },
    Reference { kind: ValueKind },
    Keyword { constants: Vec<Constant> },
}

impl From<&Accept> for AcceptSchema {
    fn from(accept: &Accept) -> Self {
        match accept {
            Accept::Literal(kind) => Self::Literal { kind: *kind },
            Accept::Reference(kind) => Self::Reference { kind: *kind },
            Accept::Keyword(constants) => Self::Keyword {
                constants: constants.to_vec(),
            },
        }
    }
}

/// Describe one declaration.
pub fn describe(declaration: &Declaration) -> EntitySchema {
    EntitySchema {
        type_name: declaration.type_name,
        type_tag: (!declaration.type_tag.is_empty()).then_some(declaration.type_tag),
        family: declaration.family.map(|family| family.name),
        doc: declaration.doc,
        fields: declaration.fields.iter().map(describe_field).collect(),
    }
}

fn describe_field(field: &FieldDecl) -> FieldSchema {
    FieldSchema {
        name: field.name,
        required: field.is_required(),
        accepts: field.accepts.iter().map(AcceptSchema::from).collect(),
        default: field.default.map(default_json),
        doc: field.doc,
    }
}

fn default_json(default: FieldDefault) -> Value {
    match default {
        FieldDefault::Absent => Value::Null,
        FieldDefault::Bool(b) => json!(b),
        FieldDefault::Integer(i) => json!(i),
        FieldDefault::Real(r) => json!(r),
        FieldDefault::Text(s) | FieldDefault::Keyword(s) => json!(s),
    }
}

/// Options for [`json_schema_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    pub title: String,
    /// URI drive documents put under `$schema`; becomes the schema's `$id`.
    pub marker: Option<String>,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            title: "MBDyn drive document".to_string(),
            marker: None,
        }
    }
}

/// A JSON Schema document accepting `{"$schema"?, "drives": [...]}` where
/// every entry is a tagged mapping of a registered variant.
pub fn json_schema_document(registry: &Registry, options: &SchemaOptions) -> Value {
    let mut defs = Map::new();
    let mut variants = Vec::new();
    for declaration in registry.declarations() {
        variants.push(json!({ "$ref": def_ref(declaration.type_name) }));
        defs.insert(declaration.type_name.to_string(), entity_def(declaration));
    }
    let mut reference = entity_def(&NAMED_REFERENCE);
    reference["properties"]["name"]["pattern"] = json!(IDENTIFIER_PATTERN);
    defs.insert(NAMED_REFERENCE.type_name.to_string(), reference);
    defs.insert("ValueKind".to_string(), keyword_def(VALUE_KIND_CONSTANTS));

    let mut marker = json!({
        "type": "string",
        "description": "Schema this document conforms to",
    });
    let mut document = json!({
        "$schema": JSON_SCHEMA_DIALECT,
        "title": options.title,
        "type": "object",
        "required": [DRIVES_KEY],
        "additionalProperties": false,
    });
    if let Some(uri) = &options.marker {
        marker["default"] = json!(uri);
        document["$id"] = json!(uri);
    }
    let mut properties = Map::new();
    properties.insert(SCHEMA_KEY.to_string(), marker);
    properties.insert(
        DRIVES_KEY.to_string(),
        json!({
            "type": "array",
            "items": { "oneOf": variants },
        }),
    );
    document["properties"] = Value::Object(properties);
    document["$defs"] = Value::Object(defs);
    document
}

fn def_ref(name: &str) -> String {
    format!("#/$defs/{name}")
}

fn entity_def(declaration: &Declaration) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    if !declaration.type_tag.is_empty() {
        properties.insert(
            DISCRIMINATOR.to_string(),
            json!({ "const": declaration.type_tag }),
        );
        required.push(DISCRIMINATOR);
    }
    for field in declaration.fields {
        properties.insert(field.name.to_string(), field_def(field));
        if field.is_required() {
            required.push(field.name);
        }
    }
    json!({
        "title": declaration.type_name,
        "description": declaration.doc,
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn field_def(field: &FieldDecl) -> Value {
    let mut alternatives: Vec<Value> = field.accepts.iter().map(accept_def).collect();
    if field.is_optional() {
        alternatives.push(json!({ "type": "null" }));
    }
    let mut def = json!({
        "description": field.doc,
        "anyOf": alternatives,
    });
    if let Some(default) = field.default {
        def["default"] = default_json(default);
    }
    def
}

fn accept_def(accept: &Accept) -> Value {
    match accept {
        Accept::Literal(kind) => json!({ "type": json_types(*kind) }),
        Accept::Reference(kind) => {
            let kinds: Vec<&str> = ValueKind::ALL
                .iter()
                .filter(|candidate| candidate.promotes_to(*kind))
                .map(|candidate| candidate.name())
                .collect();
            json!({
                "allOf": [
                    { "$ref": def_ref(NAMED_REFERENCE.type_name) },
                    { "properties": { "kind": { "enum": kinds } } },
                ],
            })
        }
        Accept::Keyword(constants) if *constants == VALUE_KIND_CONSTANTS => {
            json!({ "$ref": def_ref("ValueKind") })
        }
        Accept::Keyword(constants) => keyword_def(constants),
    }
}

fn keyword_def(constants: &[Constant]) -> Value {
    let options: Vec<Value> = constants
        .iter()
        .map(|constant| json!({ "const": constant.name, "description": constant.doc }))
        .collect();
    json!({ "oneOf": options })
}

/// JSON types of every literal that promotes to `kind`.
fn json_types(kind: ValueKind) -> Vec<&'static str> {
    ValueKind::ALL
        .iter()
        .filter(|candidate| candidate.promotes_to(kind))
        .map(|candidate| match candidate {
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Real => "number",
            ValueKind::Text => "string",
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{CONST_DRIVE_CALLER, SINE_DRIVE_CALLER};
    use crate::entity::Entity;
    use crate::registry::RegistryBuilder;

    fn document() -> Value {
        let registry = RegistryBuilder::builtin().unwrap().build();
        json_schema_document(&registry, &SchemaOptions::default())
    }

    #[test]
    fn describes_fields_in_declared_order() {
        let schema = describe(&CONST_DRIVE_CALLER);
        assert_eq!(schema.type_tag, Some("const"));
        assert_eq!(schema.family, Some("DriveCaller"));
        let names: Vec<&str> = schema.fields.iter().map(|field| field.name).collect();
        assert_eq!(names, ["const_value", "index"]);
        assert!(schema.fields[0].required);
        assert_eq!(schema.fields[0].default, None);
        assert_eq!(schema.fields[1].default, Some(Value::Null));
        assert_eq!(
            serde_json::to_value(&schema.fields[0].accepts).unwrap(),
            json!([
                {"accept": "reference", "kind": "real"},
                {"accept": "literal", "kind": "integer"},
                {"accept": "literal", "kind": "real"},
            ])
        );
    }

    #[test]
    fn keyword_constants_carry_their_docs() {
        let schema = describe(&SINE_DRIVE_CALLER);
        let cycles = schema
            .fields
            .iter()
            .find(|field| field.name == "number_of_cycles")
            .unwrap();
        let Some(AcceptSchema::Keyword { constants }) = cycles.accepts.last() else {
            panic!("number_of_cycles should accept keywords");
        };
        let names: Vec<&str> = constants.iter().map(|c| c.name).collect();
        assert_eq!(names, ["forever", "one", "half"]);
        assert!(constants.iter().all(|c| !c.doc.is_empty()));
    }

    #[test]
    fn untagged_entities_have_no_tag() {
        let schema = describe(&NAMED_REFERENCE);
        assert_eq!(schema.type_tag, None);
        assert_eq!(schema.family, None);
        assert!(
            !serde_json::to_value(&schema)
                .unwrap()
                .as_object()
                .unwrap()
                .contains_key("typeTag")
        );
    }

    #[test]
    fn document_root_accepts_marker_and_drives() {
        let doc = document();
        assert_eq!(doc["$schema"], JSON_SCHEMA_DIALECT);
        assert_eq!(doc["required"], json!(["drives"]));
        assert_eq!(doc["properties"]["$schema"]["type"], "string");
        let variants = doc["properties"]["drives"]["items"]["oneOf"]
            .as_array()
            .unwrap();
        assert_eq!(variants.len(), 6);
        assert_eq!(variants[2], json!({"$ref": "#/$defs/ConstDriveCaller"}));
        assert!(doc["$defs"]["NamedReference"].is_object());
        assert!(doc["$defs"]["ValueKind"]["oneOf"].is_array());
    }

    #[test]
    fn variant_defs_pin_the_discriminator() {
        let doc = document();
        let def = &doc["$defs"]["ConstDriveCaller"];
        assert_eq!(def["properties"]["type"], json!({"const": "const"}));
        assert_eq!(def["required"], json!(["type", "const_value"]));
        assert_eq!(def["additionalProperties"], false);
        assert_eq!(
            def["properties"]["index"]["anyOf"],
            json!([
                {
                    "allOf": [
                        {"$ref": "#/$defs/NamedReference"},
                        {"properties": {"kind": {"enum": ["bool", "integer"]}}},
                    ]
                },
                {"type": ["boolean", "integer"]},
                {"type": "null"},
            ])
        );
    }

    #[test]
    fn advertised_reference_mappings_decode() {
        let doc = document();
        let const_value = &doc["$defs"]["ConstDriveCaller"]["properties"]["const_value"];
        assert_eq!(
            const_value["anyOf"][0]["allOf"][0],
            json!({"$ref": "#/$defs/NamedReference"})
        );
        assert_eq!(
            doc["$defs"]["NamedReference"]["properties"]["name"]["pattern"],
            IDENTIFIER_PATTERN
        );

        let registry = RegistryBuilder::builtin().unwrap().build();
        let entry = json!({
            "type": "const",
            "const_value": {"name": "LOAD", "kind": "real", "expression": "1.0"}
        });
        let drive = registry.decode(entry.as_object().unwrap()).unwrap();
        assert_eq!(drive.serialize(), "const, LOAD");
    }

    #[test]
    fn value_kind_keywords_point_at_the_shared_def() {
        let doc = document();
        assert_eq!(
            doc["$defs"]["NamedReference"]["properties"]["kind"]["anyOf"],
            json!([{"$ref": "#/$defs/ValueKind"}])
        );
    }

    #[test]
    fn marker_becomes_the_schema_id() {
        let registry = RegistryBuilder::builtin().unwrap().build();
        let options = SchemaOptions {
            title: "drives".to_string(),
            marker: Some("https://example.org/drives.json".to_string()),
        };
        let doc = json_schema_document(&registry, &options);
        assert_eq!(doc["$id"], "https://example.org/drives.json");
        assert_eq!(
            doc["properties"]["$schema"]["default"],
            "https://example.org/drives.json"
        );
        assert_eq!(doc["title"], "drives");
    }
}
