//! Predicate-map filtering, field sorting, and patch merging over the
//! serialized form of stored records.
//!
//! The gateway contract is untyped at the query surface (field names and
//! JSON values), so both backends funnel through these helpers to keep the
//! semantics identical.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::{Entity, Result, StoreError};

/// Field-name → expected-value map; a record matches when every entry
/// equals the corresponding top-level field of its serialized form.
pub type Predicate = Map<String, Value>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Order records by one top-level field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }
}

/// Applies predicate, sort, and limit to a snapshot of the collection.
pub(super) fn apply_query<E: Entity>(
    records: Vec<E>,
    predicate: Option<&Predicate>,
    sort: Option<&SortSpec>,
    limit: Option<usize>,
) -> Result<Vec<E>> {
    let mut rows = records
        .into_iter()
        .map(|record| Ok((serde_json::to_value(&record)?, record)))
        .collect::<Result<Vec<(Value, E)>>>()?;

    if let Some(predicate) = predicate {
        rows.retain(|(value, _)| matches(value, predicate));
    }

    if let Some(spec) = sort {
        rows.sort_by(|(a, _), (b, _)| {
            let field_a = a.get(&spec.field).unwrap_or(&Value::Null);
            let field_b = b.get(&spec.field).unwrap_or(&Value::Null);
            let ordering = cmp_values(field_a, field_b);
            match spec.order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
    }

    let mut out: Vec<E> = rows.into_iter().map(|(_, record)| record).collect();
    if let Some(limit) = limit {
        out.truncate(limit);
    }
    Ok(out)
}

fn matches(record: &Value, predicate: &Predicate) -> bool {
    predicate
        .iter()
        .all(|(field, expected)| record.get(field) == Some(expected))
}

/// Total order over JSON values: null < booleans < numbers < strings;
/// composites compare equal (sorting on them is not meaningful).
fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Bool(_), _) => Ordering::Less,
        (_, Value::Bool(_)) => Ordering::Greater,
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

/// Merges a partial JSON object into the stored record's serialized form
/// and deserializes the result back.
///
/// `id` and `created_at` are store-owned metadata and are skipped even if
/// the patch names them.
pub(super) fn merge_patch<E: Entity>(record: &E, patch: &Value) -> Result<E> {
    let Value::Object(patch) = patch else {
        return Err(StoreError::InvalidPatch(format!(
            "expected a JSON object, got {patch}"
        )));
    };

    let mut value = serde_json::to_value(record)?;
    let Some(fields) = value.as_object_mut() else {
        return Err(StoreError::InvalidPatch(format!(
            "{} records do not serialize to objects",
            E::COLLECTION
        )));
    };

    for (field, new_value) in patch {
        if field == "id" || field == "created_at" {
            continue;
        }
        fields.insert(field.clone(), new_value.clone());
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn value_order_is_null_bool_number_string() {
        assert_eq!(cmp_values(&Value::Null, &json!(false)), Ordering::Less);
        assert_eq!(cmp_values(&json!(true), &json!(0)), Ordering::Less);
        assert_eq!(cmp_values(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(cmp_values(&json!(7), &json!("a")), Ordering::Less);
        assert_eq!(cmp_values(&json!("a"), &json!("b")), Ordering::Less);
    }

    #[test]
    fn predicate_matches_on_every_entry() {
        let record = json!({"kind": "steal", "period": 2});
        let mut predicate = Predicate::new();
        predicate.insert("kind".into(), json!("steal"));
        assert!(matches(&record, &predicate));

        predicate.insert("period".into(), json!(3));
        assert!(!matches(&record, &predicate));
    }
}
