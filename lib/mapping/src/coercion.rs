use crate::error::MappingError;
use crate::policy::{MappingPolicy, UriHandling};
use crate::resolver::UriResolver;
use rdf_lpg_model::vocab::{lpg, rdf, xsd};
use rdf_lpg_model::{
    Boolean, Date, DateTime, Double, ElementKind, LiteralRef, NamedNodeRef, TypedValue,
};
use std::num::IntErrorKind;
use std::str::FromStr;
use tracing::warn;

/// Datatypes mapped to a 64-bit integer.
const INTEGER_TYPES: &[NamedNodeRef<'static>] = &[
    xsd::INTEGER,
    xsd::LONG,
    xsd::INT,
    xsd::SHORT,
    xsd::BYTE,
    xsd::NON_NEGATIVE_INTEGER,
    xsd::POSITIVE_INTEGER,
    xsd::UNSIGNED_LONG,
    xsd::UNSIGNED_INT,
    xsd::UNSIGNED_SHORT,
    xsd::UNSIGNED_BYTE,
    xsd::NON_POSITIVE_INTEGER,
    xsd::NEGATIVE_INTEGER,
];

/// Datatypes mapped to a double.
const FLOAT_TYPES: &[NamedNodeRef<'static>] = &[xsd::DECIMAL, xsd::DOUBLE, xsd::FLOAT];

/// Coerces the object `literal` of a triple with predicate `property` into a property value.
///
/// Returns `Ok(None)` if the literal is filtered out by the language filter. Malformed dates fall
/// back to their lexical form; malformed numbers and booleans are an error.
pub fn coerce_literal(
    policy: &MappingPolicy,
    resolver: &mut UriResolver,
    property: NamedNodeRef<'_>,
    literal: LiteralRef<'_>,
) -> Result<Option<TypedValue>, MappingError> {
    let datatype = literal.datatype();
    let value = literal.value();

    if datatype == xsd::STRING || datatype == rdf::LANG_STRING {
        return Ok(coerce_string(policy, value, literal.language()));
    }

    if INTEGER_TYPES.iter().any(|t| *t == datatype) {
        return coerce_integer(value, datatype).map(Some);
    }

    if FLOAT_TYPES.iter().any(|t| *t == datatype) {
        let parsed = Double::from_str(value.trim())
            .map_err(|_| invalid_literal(value, datatype))?;
        return Ok(Some(TypedValue::Float(f64::from(parsed))));
    }

    if datatype == xsd::BOOLEAN {
        let parsed = Boolean::from_str(value.trim())
            .map_err(|_| invalid_literal(value, datatype))?;
        return Ok(Some(TypedValue::Boolean(bool::from(parsed))));
    }

    if datatype == xsd::DATE_TIME {
        return Ok(Some(DateTime::from_str(value).map_or_else(
            |_| TypedValue::String(value.to_owned()),
            TypedValue::DateTime,
        )));
    }

    if datatype == xsd::DATE {
        return Ok(Some(Date::from_str(value).map_or_else(
            |_| TypedValue::String(value.to_owned()),
            TypedValue::Date,
        )));
    }

    if policy.keeps_custom_datatype(property.as_str()) {
        let datatype_name = if policy.uri_handling == UriHandling::Shorten {
            resolver.resolve(datatype, ElementKind::Datatype)?
        } else {
            datatype.as_str().to_owned()
        };
        return Ok(Some(TypedValue::String(format!(
            "{value}{}{datatype_name}",
            lpg::CUSTOM_DATA_TYPE_SEPARATOR
        ))));
    }

    Ok(Some(TypedValue::String(value.to_owned())))
}

fn coerce_string(
    policy: &MappingPolicy,
    value: &str,
    language: Option<&str>,
) -> Option<TypedValue> {
    if let Some(filter) = &policy.language_filter {
        if language.map_or(true, |language| !language.eq_ignore_ascii_case(filter)) {
            return None;
        }
    }
    Some(TypedValue::String(match language {
        Some(language) if policy.keep_language_tag => format!("{value}@{language}"),
        _ => value.to_owned(),
    }))
}

fn coerce_integer(value: &str, datatype: NamedNodeRef<'_>) -> Result<TypedValue, MappingError> {
    match i64::from_str(value.trim()) {
        Ok(parsed) => Ok(TypedValue::Integer(parsed)),
        Err(error)
            if matches!(
                error.kind(),
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
            ) =>
        {
            warn!("The integer {value} does not fit into 64 bits and is kept as a string");
            Ok(TypedValue::String(value.to_owned()))
        }
        Err(_) => Err(invalid_literal(value, datatype)),
    }
}

fn invalid_literal(value: &str, datatype: NamedNodeRef<'_>) -> MappingError {
    MappingError::InvalidLiteral {
        value: value.to_owned(),
        datatype: datatype.as_str().to_owned(),
    }
}
