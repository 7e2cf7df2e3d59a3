//! Manifest stubs
//!
//! Only `apiVersion`, `kind`, `metadata.name`, `metadata.namespace` and `items` are read from a
//! manifest; everything else is ignored.

use serde::Deserialize;

use crate::error::{CoreError, Result};

/// Minimal view of a Kubernetes object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stub {
    pub kind: String,
    pub api_version: String,
    pub name: String,
    pub namespace: Option<String>,
    pub items: Vec<Stub>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStub {
    kind: Option<String>,
    api_version: Option<String>,
    metadata: Option<RawMetadata>,
    items: Option<Vec<RawStub>>,
}

#[derive(Deserialize)]
struct RawMetadata {
    name: Option<String>,
    namespace: Option<String>,
}

impl From<RawStub> for Stub {
    fn from(raw: RawStub) -> Self {
        let (name, namespace) = match raw.metadata {
            Some(meta) => (
                meta.name.unwrap_or_default(),
                meta.namespace.filter(|ns| !ns.is_empty()),
            ),
            None => (String::new(), None),
        };
        Self {
            kind: raw.kind.unwrap_or_default(),
            api_version: raw.api_version.unwrap_or_default(),
            name,
            namespace,
            items: raw
                .items
                .unwrap_or_default()
                .into_iter()
                .map(Stub::from)
                .collect(),
        }
    }
}

impl Stub {
    /// Expand nested `items` into a flat list.
    ///
    /// A `List` wrapper is replaced by its items; any other object that carries items is kept
    /// alongside them.
    pub fn flatten(self) -> Vec<Stub> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(mut self, out: &mut Vec<Stub>) {
        let items = std::mem::take(&mut self.items);
        if self.kind != "List" {
            out.push(self);
        }
        for item in items {
            item.flatten_into(out);
        }
    }
}

/// Decode every object in a JSON document or a YAML multi-document stream.
///
/// Documents that fail to decode are skipped; the call only fails when nothing could be
/// decoded at all.
pub fn decode_stubs(data: &[u8]) -> Result<Vec<Stub>> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Err(CoreError::NoManifests);
    }

    if let Ok(raw) = serde_json::from_slice::<RawStub>(data) {
        return Ok(vec![raw.into()]);
    }

    let mut stubs = Vec::new();
    let mut errors = Vec::new();
    let mut documents = 0usize;

    for document in serde_yaml::Deserializer::from_slice(data) {
        documents += 1;
        let value = match serde_yaml::Value::deserialize(document) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(document = documents, error = %e, "skipping unparseable document");
                errors.push(e.to_string());
                continue;
            }
        };
        if value.is_null() {
            continue;
        }
        match serde_yaml::from_value::<RawStub>(value) {
            Ok(raw) => stubs.push(raw.into()),
            Err(e) => {
                tracing::debug!(document = documents, error = %e, "skipping undecodable document");
                errors.push(e.to_string());
            }
        }
    }

    if stubs.is_empty() && !errors.is_empty() {
        return Err(CoreError::Decode(errors));
    }
    if documents == 0 {
        return Err(CoreError::NoManifests);
    }
    Ok(stubs)
}
