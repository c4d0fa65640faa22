//! Helpers over raw provider spec documents
//!
//! Platform implementations keep the payload as an untyped JSON document so
//! fields they do not interpret survive re-serialization in their original
//! order. These helpers parse the typed view, write placement fields in
//! place, and compute the drift between two documents.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use cpms_common::crd::PlatformType;
use cpms_common::{Error, Result};

/// A field excluded from drift comparison
///
/// Paths are dot-separated object keys relative to the payload root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoredField {
    /// Never compared
    Always(&'static str),
    /// Not compared when any of `sources` is set on both sides; the field is
    /// then derived from that source by a controller
    ResolvedFrom {
        /// Ignored field
        path: &'static str,
        /// Fields the ignored field is resolved from
        sources: &'static [&'static str],
    },
}

/// Parse the typed view of a payload, checking its `kind`
///
/// A missing `kind` is accepted; a different one is malformed.
pub(crate) fn parse_typed<T: DeserializeOwned>(
    platform: PlatformType,
    kind: &str,
    document: &Value,
) -> Result<T> {
    let object = document.as_object().ok_or_else(|| {
        Error::malformed_for(platform, format!("{kind} payload must be a JSON object"))
    })?;

    match object.get("kind") {
        None => {}
        Some(Value::String(found)) if found == kind => {}
        Some(found) => {
            return Err(Error::malformed_for_field(
                platform,
                "kind",
                format!("expected kind {kind}, found {found}"),
            ))
        }
    }

    serde_json::from_value(document.clone())
        .map_err(|e| Error::malformed_for(platform, format!("failed to parse {kind}: {e}")))
}

/// Set `value` at `path`, creating intermediate objects
///
/// Existing keys keep their position in the document.
pub(crate) fn set_path(document: &mut Value, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *document = value;
        return;
    };

    let mut current = document;
    for key in parents {
        current = object_mut(current)
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    object_mut(current).insert(last.to_string(), value);
}

fn object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

fn get_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, key| current.as_object()?.get(key))
}

fn remove_path(document: &mut Value, path: &str) {
    let mut keys: Vec<&str> = path.split('.').collect();
    let Some(last) = keys.pop() else { return };

    let mut current = document;
    for key in keys {
        match current.as_object_mut().and_then(|map| map.get_mut(key)) {
            Some(next) => current = next,
            None => return,
        }
    }
    if let Some(map) = current.as_object_mut() {
        map.shift_remove(last);
    }
}

/// Drop members the wire format treats as unset: nulls, empty objects and
/// empty arrays. Array elements that normalize away become null so indices
/// still line up.
fn normalize(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let out: Map<String, Value> = map
                .iter()
                .filter_map(|(k, v)| normalize(v).map(|v| (k.clone(), v)))
                .collect();
            (!out.is_empty()).then_some(Value::Object(out))
        }
        Value::Array(items) => {
            if items.is_empty() {
                return None;
            }
            Some(Value::Array(
                items
                    .iter()
                    .map(|item| normalize(item).unwrap_or(Value::Null))
                    .collect(),
            ))
        }
        scalar => Some(scalar.clone()),
    }
}

/// Differences between two documents after normalization and ignore-lists
///
/// Each entry reads `path: left != right`, with `<unset>` for absent values.
/// An empty result means the documents are semantically equal.
pub(crate) fn diff(left: &Value, right: &Value, ignored: &[IgnoredField]) -> Vec<String> {
    let mut left = normalize(left).unwrap_or(Value::Null);
    let mut right = normalize(right).unwrap_or(Value::Null);

    for field in ignored {
        match field {
            IgnoredField::Always(path) => {
                remove_path(&mut left, path);
                remove_path(&mut right, path);
            }
            IgnoredField::ResolvedFrom { path, sources } => {
                let resolvable = sources.iter().any(|source| {
                    get_path(&left, source).is_some() && get_path(&right, source).is_some()
                });
                if resolvable {
                    remove_path(&mut left, path);
                    remove_path(&mut right, path);
                }
            }
        }
    }

    // removals can leave empty parents behind
    let left = normalize(&left);
    let right = normalize(&right);

    let mut out = Vec::new();
    diff_values("", left.as_ref(), right.as_ref(), &mut out);
    out
}

fn diff_values(path: &str, left: Option<&Value>, right: Option<&Value>, out: &mut Vec<String>) {
    match (left, right) {
        (Some(Value::Object(l)), Some(Value::Object(r))) => {
            let right_only = r.keys().filter(|k| !l.contains_key(*k));
            for key in l.keys().chain(right_only) {
                diff_values(&join(path, key), l.get(key), r.get(key), out);
            }
        }
        (Some(Value::Array(l)), Some(Value::Array(r))) => {
            for i in 0..l.len().max(r.len()) {
                diff_values(&format!("{path}[{i}]"), l.get(i), r.get(i), out);
            }
        }
        (l, r) if l != r => {
            let path = if path.is_empty() { "<root>" } else { path };
            out.push(format!("{path}: {} != {}", render(l), render(r)));
        }
        _ => {}
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "<unset>".to_string(),
        Some(v) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NONE: &[IgnoredField] = &[];

    #[test]
    fn set_path_replaces_in_place_and_keeps_order() {
        let mut doc = json!({
            "kind": "AWSMachineProviderConfig",
            "placement": { "region": "us-east-1", "availabilityZone": "us-east-1a" },
            "subnet": { "id": "subnet-123" }
        });
        set_path(&mut doc, &["placement", "availabilityZone"], json!("us-east-1b"));

        let serialized = serde_json::to_string(&doc).expect("serialize");
        assert_eq!(
            serialized,
            r#"{"kind":"AWSMachineProviderConfig","placement":{"region":"us-east-1","availabilityZone":"us-east-1b"},"subnet":{"id":"subnet-123"}}"#
        );
    }

    #[test]
    fn set_path_creates_missing_parents() {
        let mut doc = json!({ "kind": "GCPMachineProviderSpec" });
        set_path(&mut doc, &["placement", "availabilityZone"], json!("a"));
        assert_eq!(doc["placement"]["availabilityZone"], "a");
    }

    #[test]
    fn identical_documents_have_no_diff() {
        let doc = json!({ "instanceType": "m6i.xlarge", "tags": [{ "name": "a", "value": "b" }] });
        assert!(diff(&doc, &doc.clone(), NONE).is_empty());
    }

    #[test]
    fn nulls_and_empty_values_count_as_unset() {
        let left = json!({
            "instanceType": "m6i.xlarge",
            "metadata": { "creationTimestamp": null },
            "securityGroups": [],
            "userDataSecret": {}
        });
        let right = json!({ "instanceType": "m6i.xlarge" });
        assert!(diff(&left, &right, NONE).is_empty());
    }

    #[test]
    fn reports_changed_added_and_removed_paths() {
        let left = json!({
            "instanceType": "m6i.xlarge",
            "placement": { "availabilityZone": "us-east-1a" },
            "keyName": "ops"
        });
        let right = json!({
            "instanceType": "m6i.2xlarge",
            "placement": { "availabilityZone": "us-east-1a", "tenancy": "dedicated" }
        });
        let d = diff(&left, &right, NONE);
        assert_eq!(
            d,
            vec![
                r#"instanceType: "m6i.xlarge" != "m6i.2xlarge""#.to_string(),
                r#"placement.tenancy: <unset> != "dedicated""#.to_string(),
                r#"keyName: "ops" != <unset>"#.to_string(),
            ]
        );
    }

    #[test]
    fn arrays_compare_by_index() {
        let left = json!({ "securityGroups": [{ "id": "sg-1" }, { "id": "sg-2" }] });
        let right = json!({ "securityGroups": [{ "id": "sg-1" }] });
        let d = diff(&left, &right, NONE);
        assert_eq!(d, vec![r#"securityGroups[1]: {"id":"sg-2"} != <unset>"#.to_string()]);
    }

    #[test]
    fn always_ignored_fields_are_skipped() {
        let ignored = &[IgnoredField::Always("metadata.uid")];
        let left = json!({ "metadata": { "uid": "1" }, "instanceType": "a" });
        let right = json!({ "metadata": { "uid": "2" }, "instanceType": "a" });
        assert!(diff(&left, &right, ignored).is_empty());
    }

    #[test]
    fn resolved_fields_are_ignored_only_when_source_is_set_on_both_sides() {
        let ignored = &[IgnoredField::ResolvedFrom {
            path: "profile.id",
            sources: &["profile.arn"],
        }];

        let left = json!({ "profile": { "arn": "arn:p", "id": "AIPA1" } });
        let right = json!({ "profile": { "arn": "arn:p", "id": "AIPA2" } });
        assert!(diff(&left, &right, ignored).is_empty());

        let left = json!({ "profile": { "id": "AIPA1" } });
        let right = json!({ "profile": { "id": "AIPA2" } });
        assert_eq!(diff(&left, &right, ignored).len(), 1);
    }

    #[test]
    fn parse_typed_rejects_foreign_kind() {
        #[derive(serde::Deserialize)]
        struct Anything {}

        let doc = json!({ "kind": "AzureMachineProviderSpec" });
        let err = parse_typed::<Anything>(PlatformType::Aws, "AWSMachineProviderConfig", &doc)
            .err()
            .expect("foreign kind should be rejected");
        assert_eq!(err.reason(), "MalformedTemplate");
        assert_eq!(err.field(), Some("kind"));

        let err = parse_typed::<Anything>(PlatformType::Aws, "AWSMachineProviderConfig", &json!([]))
            .err()
            .expect("non-object payload should be rejected");
        assert_eq!(err.reason(), "MalformedTemplate");
    }
}
