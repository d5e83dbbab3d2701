use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::schema::{FieldKind, FieldSpec, SchemaDescriptor, DRUG_SCHEMA};
use super::types::Drug;
use super::LookupError;

/// Decode a raw completion response into a [`Drug`].
///
/// Parse failures yield `MalformedResponse`. A parsed object is then checked
/// against [`DRUG_SCHEMA`]: required fields must be present and non-null and
/// every present field must have the described primitive shape.
pub fn decode_drug_response(raw: &str) -> Result<Drug, LookupError> {
    decode_with_schema(raw, &DRUG_SCHEMA)
}

/// Decode `raw` into `T` after validating it against `schema`.
pub fn decode_with_schema<T: DeserializeOwned>(
    raw: &str,
    schema: &SchemaDescriptor,
) -> Result<T, LookupError> {
    let payload = extract_json_payload(raw);
    if payload.is_empty() {
        return Err(LookupError::MalformedResponse("empty response".into()));
    }

    let mut value: Value = serde_json::from_str(payload)
        .map_err(|e| LookupError::MalformedResponse(e.to_string()))?;

    let obj = value.as_object_mut().ok_or_else(|| {
        LookupError::MalformedResponse("expected a single JSON object".into())
    })?;
    validate_object(obj, schema.fields, "")?;

    serde_json::from_value(value).map_err(|e| LookupError::MalformedResponse(e.to_string()))
}

/// Trim the response and unwrap a surrounding ```json fence if present.
fn extract_json_payload(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the end of the opening fence line.
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest.trim_start_matches("json"),
    };
    body.trim_end().trim_end_matches("```").trim()
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

/// Check `obj` against `fields`. Optional fields that are `null` are removed
/// so they deserialize as absent.
fn validate_object(
    obj: &mut Map<String, Value>,
    fields: &[FieldSpec],
    parent: &str,
) -> Result<(), LookupError> {
    for field in fields {
        let path = join_path(parent, field.name);
        match obj.get(field.name) {
            None | Some(Value::Null) if field.required => {
                return Err(LookupError::MissingField(path));
            }
            Some(Value::Null) => {
                obj.remove(field.name);
                continue;
            }
            None => continue,
            Some(_) => {}
        }
        if let Some(value) = obj.get_mut(field.name) {
            validate_value(value, field, &path)?;
        }
    }
    Ok(())
}

fn validate_value(value: &mut Value, field: &FieldSpec, path: &str) -> Result<(), LookupError> {
    match field.kind {
        FieldKind::String => {
            let text = value.as_str().ok_or_else(|| wrong_type(path, "a string"))?;
            if field.non_empty && text.trim().is_empty() {
                return Err(LookupError::MissingField(path.to_string()));
            }
        }
        FieldKind::Enum(allowed) => {
            let text = value.as_str().ok_or_else(|| wrong_type(path, "a string"))?;
            if !allowed.contains(&text) {
                return Err(LookupError::InvalidValue {
                    path: path.to_string(),
                    value: text.to_string(),
                });
            }
        }
        FieldKind::StringArray => {
            let items = value
                .as_array()
                .ok_or_else(|| wrong_type(path, "an array of strings"))?;
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    return Err(wrong_type(&format!("{path}[{i}]"), "a string"));
                }
            }
        }
        FieldKind::Object(sub) => {
            let obj = value
                .as_object_mut()
                .ok_or_else(|| wrong_type(path, "an object"))?;
            validate_object(obj, sub, path)?;
        }
        FieldKind::ObjectArray(sub) => {
            let items = value
                .as_array_mut()
                .ok_or_else(|| wrong_type(path, "an array of objects"))?;
            for (i, item) in items.iter_mut().enumerate() {
                let item_path = format!("{path}[{i}]");
                let obj = item
                    .as_object_mut()
                    .ok_or_else(|| wrong_type(&item_path, "an object"))?;
                validate_object(obj, sub, &item_path)?;
            }
        }
    }
    Ok(())
}

fn wrong_type(path: &str, expected: &'static str) -> LookupError {
    LookupError::WrongType {
        path: path.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::types::Availability;
    use crate::test_support::{sample_drug_json, sample_drug_without};

    #[test]
    fn decodes_conforming_response() {
        let raw = sample_drug_json().to_string();
        let drug = decode_drug_response(&raw).unwrap();
        assert_eq!(drug.generic_name, "Aspirin");
        assert_eq!(drug.brand_names, vec!["Bayer".to_string()]);
        assert_eq!(drug.availability, Availability::Otc);
    }

    #[test]
    fn decoded_value_reencodes_to_input() {
        let input = sample_drug_json();
        let drug = decode_drug_response(&input.to_string()).unwrap();
        assert_eq!(serde_json::to_value(&drug).unwrap(), input);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let raw = format!("\n\n   {}  \n", sample_drug_json());
        assert!(decode_drug_response(&raw).is_ok());
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let raw = format!("```json\n{}\n```", sample_drug_json());
        assert_eq!(decode_drug_response(&raw).unwrap().generic_name, "Aspirin");

        let bare = format!("```\n{}\n```", sample_drug_json());
        assert!(decode_drug_response(&bare).is_ok());
    }

    #[test]
    fn non_json_is_malformed() {
        for raw in ["", "   ", "Sorry, I cannot help with that.", "{\"id\": ", "[1, 2]", "42"] {
            let err = decode_drug_response(raw).unwrap_err();
            assert!(
                matches!(err, LookupError::MalformedResponse(_)),
                "{raw:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn missing_indications_is_named() {
        let err = decode_drug_response(&sample_drug_without("indications")).unwrap_err();
        assert!(matches!(err, LookupError::MissingField(ref f) if f == "indications"));
    }

    #[test]
    fn null_required_field_is_missing() {
        let mut value = sample_drug_json();
        value["pregnancy_lactation"] = Value::Null;
        let err = decode_drug_response(&value.to_string()).unwrap_err();
        assert!(matches!(err, LookupError::MissingField(ref f) if f == "pregnancy_lactation"));
    }

    #[test]
    fn missing_nested_required_field_has_path() {
        let mut value = sample_drug_json();
        value["interactions"].as_object_mut().unwrap().remove("minor");
        let err = decode_drug_response(&value.to_string()).unwrap_err();
        assert!(matches!(err, LookupError::MissingField(ref f) if f == "interactions.minor"));

        let mut value = sample_drug_json();
        value["references"][0].as_object_mut().unwrap().remove("source");
        let err = decode_drug_response(&value.to_string()).unwrap_err();
        assert!(matches!(err, LookupError::MissingField(ref f) if f == "references[0].source"));
    }

    #[test]
    fn empty_generic_name_is_rejected() {
        let mut value = sample_drug_json();
        value["generic_name"] = Value::String("  ".into());
        let err = decode_drug_response(&value.to_string()).unwrap_err();
        assert!(matches!(err, LookupError::MissingField(ref f) if f == "generic_name"));
    }

    #[test]
    fn wrong_primitive_type_is_rejected() {
        let mut value = sample_drug_json();
        value["brand_names"] = Value::String("Bayer".into());
        let err = decode_drug_response(&value.to_string()).unwrap_err();
        assert!(matches!(err, LookupError::WrongType { ref path, .. } if path == "brand_names"));

        let mut value = sample_drug_json();
        value["warnings"] = serde_json::json!(["ok", 3]);
        let err = decode_drug_response(&value.to_string()).unwrap_err();
        assert!(matches!(err, LookupError::WrongType { ref path, .. } if path == "warnings[1]"));
    }

    #[test]
    fn unknown_availability_is_invalid_value() {
        let mut value = sample_drug_json();
        value["availability"] = Value::String("Pharmacy".into());
        let err = decode_drug_response(&value.to_string()).unwrap_err();
        assert!(
            matches!(err, LookupError::InvalidValue { ref path, ref value } if path == "availability" && value == "Pharmacy")
        );
    }

    #[test]
    fn optional_fields_may_be_absent_or_null() {
        let mut value = sample_drug_json();
        let obj = value.as_object_mut().unwrap();
        obj.remove("region");
        obj.remove("identifiers");
        obj.remove("dosing_pediatric");
        obj.insert("boxed_warning".into(), Value::Null);
        obj.insert("renal_hepatic_adjustment".into(), Value::Null);
        value["interactions"]["food"] = Value::Null;

        let drug = decode_drug_response(&value.to_string()).unwrap();
        assert!(drug.region.is_empty());
        assert!(drug.identifiers.is_none());
        assert!(drug.dosing_pediatric.is_none());
        assert!(drug.boxed_warning.is_none());
        assert!(drug.interactions.food.is_none());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let mut value = sample_drug_json();
        value["confidence"] = serde_json::json!(0.9);
        assert!(decode_drug_response(&value.to_string()).is_ok());
    }
}
