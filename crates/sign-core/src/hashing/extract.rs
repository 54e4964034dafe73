//! Serializador canónico de campos (`extract_value`).
//!
//! Aplana un mapa de campos en una sola cadena: los valores se concatenan en
//! orden ascendente de clave. El resultado no depende del orden de inserción,
//! lo que permite al servidor recalcular el mismo digest.
//!
//! Reglas de conversión de cada valor:
//! - string: tal cual
//! - número: forma de `String(n)` en JS (`10.0` → `10`, `1e-7` → `1e-7`,
//!   `1e21` → `1e+21`)
//! - bool: `true` / `false`
//! - null: `null`
//! - array: elementos unidos con `,` (un null dentro del array queda vacío)
//! - objeto: el marcador fijo `[object Object]`

use serde_json::{Map, Number, Value};

use crate::constants::OBJECT_PLACEHOLDER;
use crate::errors::SignError;

/// Serializa un objeto JSON. Falla con `InvalidArgument` si `value` es null o
/// no es un objeto.
pub fn extract_value(value: &Value) -> Result<String, SignError> {
    match value {
        Value::Object(map) => Ok(extract_map(map)),
        Value::Null => Err(SignError::InvalidArgument("expected an object of fields, found null".into())),
        other => Err(SignError::InvalidArgument(format!("expected an object of fields, found {}", kind_of(other)))),
    }
}

/// Variante infalible para mapas ya tipados.
pub fn extract_map(map: &Map<String, Value>) -> String {
    // serde_json puede preservar orden de inserción según features; ordenamos siempre.
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys.into_iter().map(|k| coerce(&map[k])).collect()
}

/// Conversión "natural" de un valor a string.
pub fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_to_string(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items.iter().map(coerce_element).collect::<Vec<_>>().join(","),
        Value::Object(_) => OBJECT_PLACEHOLDER.to_string(),
    }
}

fn coerce_element(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => coerce(other),
    }
}

fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) => float_to_string(f),
        None => n.to_string(),
    }
}

/// Dígitos más cortos que recuperan `f`, en notación decimal si el exponente
/// decimal cae en `[-7, 21)` y en notación científica (`1.5e-7`, `1e+21`)
/// fuera de ese rango.
fn float_to_string(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let sci = format!("{:e}", f.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // posición del punto decimal respecto al primer dígito
    let n = exp.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(n.unsigned_abs() as usize))
    } else {
        let e = n - 1;
        let sign = if e < 0 { '-' } else { '+' };
        match digits.split_at(1) {
            (head, "") => format!("{head}e{sign}{}", e.unsigned_abs()),
            (head, tail) => format!("{head}.{tail}e{sign}{}", e.unsigned_abs()),
        }
    };
    if f < 0.0 {
        format!("-{body}")
    } else {
        body
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
