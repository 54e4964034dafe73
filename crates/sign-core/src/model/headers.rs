use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Bolsa de headers: nombre → valor, conservando el orden de inserción.
///
/// Los nombres son literales sensibles a mayúsculas. Un header ausente se
/// elimina de la bolsa; nunca se deja con valor vacío.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderBag {
    inner: IndexMap<String, String>,
}

impl HeaderBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Inserta o reemplaza; devuelve el valor anterior.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.inner.insert(name.into(), value.into())
    }

    /// Elimina conservando el orden del resto.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.inner.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for HeaderBag {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { inner: iter.into_iter().collect() }
    }
}
