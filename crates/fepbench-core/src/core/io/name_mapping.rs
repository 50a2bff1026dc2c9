use super::diagnostics::Parsed;
use super::traits::DataFile;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Read};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NameMappingError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid name mapping JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Names '{first}' and '{second}' are both mapped to '{target}'")]
    DuplicateTarget {
        target: String,
        first: String,
        second: String,
    },
}

/// A private-name → blinded-name mapping.
///
/// Keys are unique and the mapping is injective: no two private names share a blinded
/// name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameMapping {
    names: HashMap<String, String>,
}

impl NameMapping {
    /// Builds a mapping from pairs, rejecting duplicate targets.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, NameMappingError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mapping = Self {
            names: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        };
        mapping.check_injective()?;
        Ok(mapping)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn check_injective(&self) -> Result<(), NameMappingError> {
        let mut seen: HashMap<&str, &str> = HashMap::with_capacity(self.names.len());
        let mut keys: Vec<&String> = self.names.keys().collect();
        keys.sort();
        for key in keys {
            let target = self.names[key].as_str();
            if let Some(first) = seen.insert(target, key.as_str()) {
                return Err(NameMappingError::DuplicateTarget {
                    target: target.to_string(),
                    first: first.to_string(),
                    second: key.clone(),
                });
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for NameMapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = HashMap<String, String>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping ligand names to blinded names")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut names = HashMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    if names.contains_key(&key) {
                        return Err(de::Error::custom(format!(
                            "duplicate ligand name '{}'",
                            key
                        )));
                    }
                    names.insert(key, value);
                }
                Ok(names)
            }
        }

        let names = deserializer.deserialize_map(MappingVisitor)?;
        Ok(Self { names })
    }
}

/// Reader for the JSON object produced when ligand names were blinded.
pub struct NameMappingFile;

impl DataFile for NameMappingFile {
    type Data = NameMapping;
    type Error = NameMappingError;

    fn read_from(reader: impl Read) -> Result<Parsed<Self::Data>, Self::Error> {
        let mapping: NameMapping = serde_json::from_reader(reader)?;
        mapping.check_injective()?;
        Ok(Parsed::new(mapping, Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_object_of_strings() {
        let json = r#"{"LigA": "CCD-0001", "LigB": "CCD-0002"}"#;
        let mapping = NameMappingFile::read_from(json.as_bytes()).unwrap().data;
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("LigA"), Some("CCD-0001"));
        assert_eq!(mapping.get("LigC"), None);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let json = r#"{"LigA": "CCD-0001", "LigA": "CCD-0002"}"#;
        let result = NameMappingFile::read_from(json.as_bytes());
        match result {
            Err(NameMappingError::Json(e)) => {
                assert!(e.to_string().contains("duplicate ligand name 'LigA'"))
            }
            other => panic!("expected Json error, got {:?}", other),
        }
    }

    #[test]
    fn non_injective_mapping_is_rejected() {
        let json = r#"{"LigA": "CCD-0001", "LigB": "CCD-0001"}"#;
        let result = NameMappingFile::read_from(json.as_bytes());
        match result {
            Err(NameMappingError::DuplicateTarget {
                target,
                first,
                second,
            }) => {
                assert_eq!(target, "CCD-0001");
                assert_eq!(first, "LigA");
                assert_eq!(second, "LigB");
            }
            other => panic!("expected DuplicateTarget, got {:?}", other),
        }
    }

    #[test]
    fn non_string_values_are_rejected() {
        let json = r#"{"LigA": 1}"#;
        assert!(matches!(
            NameMappingFile::read_from(json.as_bytes()),
            Err(NameMappingError::Json(_))
        ));
    }

    #[test]
    fn from_pairs_checks_injectivity() {
        assert!(NameMapping::from_pairs([("a", "x"), ("b", "y")]).is_ok());
        assert!(matches!(
            NameMapping::from_pairs([("a", "x"), ("b", "x")]),
            Err(NameMappingError::DuplicateTarget { .. })
        ));
    }
}
