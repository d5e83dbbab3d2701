//! Declarative description of the Drug JSON shape.
//!
//! One static tree serves three purposes: it is rendered into the Gemini
//! `responseSchema` dialect, into JSON Schema for Ollama's `format`, and it
//! drives the decoder's structural check. Any field added to
//! [`super::types::Drug`] must be mirrored here.

use serde_json::{json, Map, Value};

/// Shape of a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    String,
    StringArray,
    /// String restricted to the listed values.
    Enum(&'static [&'static str]),
    Object(&'static [FieldSpec]),
    ObjectArray(&'static [FieldSpec]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Reject an empty (after trim) string value.
    pub non_empty: bool,
    /// One-line hint steering the completion service.
    pub description: Option<&'static str>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            non_empty: false,
            description: None,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            non_empty: false,
            description: None,
        }
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub const fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }
}

/// Named root object of an extraction contract.
#[derive(Debug)]
pub struct SchemaDescriptor {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

use FieldKind::{Enum, Object, ObjectArray, StringArray};

const IDENTIFIER_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("rxCui", FieldKind::String)
        .describe("RxNorm Concept Unique Identifier."),
    FieldSpec::optional("atc", StringArray)
        .describe("Anatomical Therapeutic Chemical codes."),
    FieldSpec::optional("cas", StringArray).describe("CAS Registry Numbers."),
    FieldSpec::optional("emaId", FieldKind::String)
        .describe("European Medicines Agency identifier."),
    FieldSpec::optional("sfdaRegNo", FieldKind::String)
        .describe("Saudi Food and Drug Authority registration number."),
];

const ADVERSE_EFFECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("common", StringArray).describe("Frequent, usually mild effects."),
    FieldSpec::required("serious", StringArray).describe("Prefix each item with the '⚠️ ' emoji."),
];

const INTERACTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("severe", StringArray).describe("Combinations to avoid."),
    FieldSpec::required("moderate", StringArray).describe("Combinations needing monitoring."),
    FieldSpec::required("minor", StringArray).describe("Low-impact interactions."),
    FieldSpec::optional("food", StringArray).describe("Food interactions, if any."),
    FieldSpec::optional("alcohol", StringArray).describe("Alcohol interactions, if any."),
];

const THERAPEUTIC_ALTERNATIVE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldKind::String).non_empty(),
    FieldSpec::required("difference", FieldKind::String)
        .describe("Key difference from the searched drug."),
];

const ALTERNATIVE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("generic_equivalents", StringArray)
        .describe("Same active ingredient under other names."),
    FieldSpec::required("therapeutic_alternatives", ObjectArray(THERAPEUTIC_ALTERNATIVE_FIELDS))
        .describe("Drugs from the same ATC class."),
];

const REFERENCE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("source", FieldKind::String).non_empty(),
    FieldSpec::optional("url", FieldKind::String),
    FieldSpec::optional("date_accessed", FieldKind::String),
];

/// Wire values of [`super::types::Availability`].
pub const AVAILABILITY_VALUES: &[&str] = &["Rx", "OTC"];

const DRUG_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("id", FieldKind::String).describe("A unique ID for the drug entry."),
    FieldSpec::optional("region", StringArray)
        .describe("Region codes the entry applies to (global, US, EU, UK, SA)."),
    FieldSpec::optional("identifiers", Object(IDENTIFIER_FIELDS))
        .describe("External registry cross-references."),
    FieldSpec::required("generic_name", FieldKind::String)
        .non_empty()
        .describe("The official generic name of the drug."),
    FieldSpec::required("brand_names", StringArray).describe("Common brand names."),
    FieldSpec::required("class", StringArray).describe("Pharmacological class or ATC class."),
    FieldSpec::required("mechanism_of_action", FieldKind::String)
        .describe("A simplified 2-4 line explanation."),
    FieldSpec::required("indications", StringArray).describe("Approved medical uses."),
    FieldSpec::required("dosing_adult", StringArray)
        .describe("Brief, standard adult dosing points."),
    FieldSpec::optional("dosing_pediatric", StringArray)
        .describe("Brief, standard pediatric dosing points."),
    FieldSpec::required("contraindications", StringArray)
        .describe("Situations where the drug must not be used."),
    FieldSpec::required("warnings", StringArray).describe("Precautions for safe use."),
    FieldSpec::required("adverse_effects", Object(ADVERSE_EFFECT_FIELDS)),
    FieldSpec::required("interactions", Object(INTERACTION_FIELDS)),
    FieldSpec::required("pregnancy_lactation", FieldKind::String)
        .describe("Brief text with a clear warning tone."),
    FieldSpec::optional("renal_hepatic_adjustment", FieldKind::String)
        .describe("Dose changes for kidney or liver impairment."),
    FieldSpec::required("alternatives", Object(ALTERNATIVE_FIELDS)),
    FieldSpec::required("references", ObjectArray(REFERENCE_FIELDS))
        .describe("Primary sources used."),
    FieldSpec::required("quick_warnings", StringArray).describe("Top 3 most critical risks."),
    FieldSpec::optional("boxed_warning", FieldKind::String)
        .describe("The 'Black Box Warning' text, if it exists."),
    FieldSpec::required("availability", Enum(AVAILABILITY_VALUES))
        .describe("Either 'Rx' for prescription or 'OTC' for over-the-counter."),
];

/// The extraction contract for [`super::types::Drug`].
pub static DRUG_SCHEMA: SchemaDescriptor = SchemaDescriptor {
    name: "Drug",
    fields: DRUG_FIELDS,
};

/// Output dialect of a rendered schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    /// Gemini `responseSchema` (OpenAPI subset, uppercase type names).
    Gemini,
    /// Draft JSON Schema, as accepted by Ollama's `format`.
    JsonSchema,
}

impl Dialect {
    fn type_name(self, json_type: &'static str) -> String {
        match self {
            Dialect::Gemini => json_type.to_ascii_uppercase(),
            Dialect::JsonSchema => json_type.to_string(),
        }
    }
}

impl SchemaDescriptor {
    /// Render for Gemini's `generationConfig.responseSchema`.
    pub fn to_gemini_schema(&self) -> Value {
        render_object(self.fields, Dialect::Gemini)
    }

    /// Render as JSON Schema.
    pub fn to_json_schema(&self) -> Value {
        let mut schema = render_object(self.fields, Dialect::JsonSchema);
        if let Some(obj) = schema.as_object_mut() {
            obj.insert("title".into(), Value::String(self.name.to_string()));
        }
        schema
    }

    /// Names of the top-level required fields, in declaration order.
    pub fn required_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn render_object(fields: &[FieldSpec], dialect: Dialect) -> Value {
    let mut properties = Map::new();
    for field in fields {
        properties.insert(field.name.to_string(), render_field(field, dialect));
    }

    let mut obj = Map::new();
    obj.insert("type".into(), Value::String(dialect.type_name("object")));
    obj.insert("properties".into(), Value::Object(properties));

    let required: Vec<Value> = fields
        .iter()
        .filter(|f| f.required)
        .map(|f| Value::String(f.name.to_string()))
        .collect();
    if !required.is_empty() {
        obj.insert("required".into(), Value::Array(required));
    }

    if dialect == Dialect::Gemini {
        let ordering: Vec<Value> = fields
            .iter()
            .map(|f| Value::String(f.name.to_string()))
            .collect();
        obj.insert("propertyOrdering".into(), Value::Array(ordering));
    }

    Value::Object(obj)
}

fn render_field(field: &FieldSpec, dialect: Dialect) -> Value {
    let mut value = match field.kind {
        FieldKind::String => json!({ "type": dialect.type_name("string") }),
        FieldKind::StringArray => json!({
            "type": dialect.type_name("array"),
            "items": { "type": dialect.type_name("string") },
        }),
        FieldKind::Enum(values) => match dialect {
            Dialect::Gemini => json!({
                "type": dialect.type_name("string"),
                "format": "enum",
                "enum": values,
            }),
            Dialect::JsonSchema => json!({
                "type": dialect.type_name("string"),
                "enum": values,
            }),
        },
        FieldKind::Object(sub) => render_object(sub, dialect),
        FieldKind::ObjectArray(sub) => json!({
            "type": dialect.type_name("array"),
            "items": render_object(sub, dialect),
        }),
    };

    if let (Some(text), Some(obj)) = (field.description, value.as_object_mut()) {
        obj.insert("description".into(), Value::String(text.to_string()));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::types::Drug;

    #[test]
    fn required_fields_match_contract() {
        assert_eq!(
            DRUG_SCHEMA.required_fields(),
            vec![
                "id",
                "generic_name",
                "brand_names",
                "class",
                "mechanism_of_action",
                "indications",
                "dosing_adult",
                "contraindications",
                "warnings",
                "adverse_effects",
                "interactions",
                "pregnancy_lactation",
                "alternatives",
                "references",
                "quick_warnings",
                "availability",
            ]
        );
    }

    #[test]
    fn descriptor_covers_every_model_field() {
        // A fully populated Drug serializes every key; each must be described.
        let drug: Drug =
            serde_json::from_value(crate::test_support::sample_drug_json()).unwrap();
        let mut full = drug;
        full.boxed_warning = Some("text".into());
        full.identifiers.as_mut().unwrap().ema_id = Some("EMEA/H/C/000".into());
        full.identifiers.as_mut().unwrap().sfda_reg_no = Some("123".into());
        full.interactions.food = Some(vec![]);
        let value = serde_json::to_value(&full).unwrap();

        for key in value.as_object().unwrap().keys() {
            assert!(DRUG_SCHEMA.field(key).is_some(), "undescribed field {key}");
        }
        for field in DRUG_SCHEMA.fields {
            assert!(
                value.get(field.name).is_some(),
                "descriptor field {} missing from model",
                field.name
            );
        }

        let ids = value["identifiers"].as_object().unwrap();
        assert_eq!(ids.len(), IDENTIFIER_FIELDS.len());
        for spec in IDENTIFIER_FIELDS {
            assert!(ids.contains_key(spec.name));
        }
    }

    #[test]
    fn gemini_rendering_uses_uppercase_types() {
        let schema = DRUG_SCHEMA.to_gemini_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["brand_names"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["brand_names"]["items"]["type"], "STRING");
        assert_eq!(
            schema["properties"]["generic_name"]["description"],
            "The official generic name of the drug."
        );
        assert_eq!(schema["properties"]["availability"]["format"], "enum");
        assert_eq!(
            schema["properties"]["references"]["items"]["required"],
            json!(["source"])
        );
        assert!(schema["propertyOrdering"].as_array().unwrap().len() == DRUG_FIELDS.len());
    }

    #[test]
    fn json_schema_rendering_uses_lowercase_types() {
        let schema = DRUG_SCHEMA.to_json_schema();
        assert_eq!(schema["title"], "Drug");
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["adverse_effects"]["type"], "object");
        assert_eq!(
            schema["properties"]["adverse_effects"]["required"],
            json!(["common", "serious"])
        );
        assert_eq!(
            schema["properties"]["availability"]["enum"],
            json!(["Rx", "OTC"])
        );
        assert!(schema.get("propertyOrdering").is_none());
    }

    #[test]
    fn identifiers_object_has_no_required_list() {
        let schema = DRUG_SCHEMA.to_json_schema();
        assert!(schema["properties"]["identifiers"].get("required").is_none());
    }
}
