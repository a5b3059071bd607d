//! Outcome comparison
//!
//! Structural equality on normalized bodies: object key order is ignored,
//! numbers compare by value, arrays compare element-wise in order.

use dsw_domain::value_objects::{ComparisonResult, ProviderResponse};
use serde_json::Value;

/// Compare two successful responses
pub fn compare_responses(legacy: &ProviderResponse, new: &ProviderResponse) -> ComparisonResult {
    let differences = structural_diff(&legacy.body, &new.body);
    ComparisonResult {
        status_match: status_equivalent(legacy.status_code, new.status_code),
        external_id_match: legacy.external_id == new.external_id,
        data_match: differences.is_empty(),
        differences,
    }
}

/// Equal codes, or both in the 2xx class
fn status_equivalent(a: u16, b: u16) -> bool {
    a == b || ((200..300).contains(&a) && (200..300).contains(&b))
}

/// JSON paths (rooted at `$`) where two values differ
pub fn structural_diff(a: &Value, b: &Value) -> Vec<String> {
    let mut differences = Vec::new();
    diff_into("$", a, b, &mut differences);
    differences
}

fn diff_into(path: &str, a: &Value, b: &Value, out: &mut Vec<String>) {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            let mut keys: Vec<&String> = left.keys().chain(right.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                let child = format!("{path}.{key}");
                match (left.get(key), right.get(key)) {
                    (Some(l), Some(r)) => diff_into(&child, l, r, out),
                    _ => out.push(child),
                }
            }
        }
        (Value::Array(left), Value::Array(right)) => {
            if left.len() != right.len() {
                out.push(path.to_string());
                return;
            }
            for (idx, (l, r)) in left.iter().zip(right).enumerate() {
                diff_into(&format!("{path}[{idx}]"), l, r, out);
            }
        }
        (Value::Number(left), Value::Number(right)) => {
            if left != right && left.as_f64() != right.as_f64() {
                out.push(path.to_string());
            }
        }
        _ => {
            if a != b {
                out.push(path.to_string());
            }
        }
    }
}
