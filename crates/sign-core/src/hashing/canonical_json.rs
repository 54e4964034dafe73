//! JSON canónico: claves ordenadas y sin espacios.
//!
//! Se usa para el sobre `SC-CLIENT-CONTEXT`; el digest de cada header usa
//! `extract_value`, no esta forma.

use serde_json::Value;
use std::collections::BTreeMap;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // `Display` de `Value` escapa igual que `serde_json::to_string` y no falla.
        Value::String(_) => value.to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let tree: BTreeMap<&String, String> = map.iter().map(|(k, v)| (k, to_canonical_json(v))).collect();
            let items: Vec<String> = tree.into_iter()
                                         .map(|(k, v)| format!("{}:{}", Value::from(k.as_str()), v))
                                         .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::to_canonical_json;
    use serde_json::json;

    #[test]
    fn test_primitives() {
        assert_eq!(to_canonical_json(&json!(null)), "null");
        assert_eq!(to_canonical_json(&json!(false)), "false");
        assert_eq!(to_canonical_json(&json!(42)), "42");
        assert_eq!(to_canonical_json(&json!("uid\"1")), "\"uid\\\"1\"");
    }

    #[test]
    fn test_envelope_sorted_keys() {
        let val = json!({ "verify_otp": "ab", "sessionUid": "u1", "application": "cd" });
        assert_eq!(to_canonical_json(&val),
                   "{\"application\":\"cd\",\"sessionUid\":\"u1\",\"verify_otp\":\"ab\"}");
    }

    #[test]
    fn test_nested() {
        let val = json!({ "z": [ { "y": "yes" }, null ], "a": { "x": 10 } });
        assert_eq!(to_canonical_json(&val), "{\"a\":{\"x\":10},\"z\":[{\"y\":\"yes\"},null]}");
    }
}
