use std::collections::BTreeMap;
use std::str::FromStr;

use super::ConfigError;

/// Ordered `key -> value` string pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamDictionary {
    entries: BTreeMap<String, String>,
}

impl ParamDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses `key` with `parse` when present.
    ///
    /// `Ok(None)` means the key is absent.
    pub fn try_parse<T>(
        &self,
        key: &str,
        parse: impl FnOnce(&str) -> Result<T, ConfigError>,
    ) -> Result<Option<T>, ConfigError> {
        self.get(key).map(parse).transpose()
    }

    /// Parses `key` when present, logging and returning `None` on failure.
    ///
    /// Builders use this so a bad value falls back to the default instead of
    /// aborting the whole description.
    pub fn parse_or_log<T>(
        &self,
        key: &str,
        parse: impl FnOnce(&str) -> Result<T, ConfigError>,
    ) -> Option<T> {
        match self.try_parse(key, parse) {
            Ok(v) => v,
            Err(err) => {
                log::error!("parameter {key}: {err}");
                None
            }
        }
    }

    pub fn require<T>(
        &self,
        key: &str,
        parse: impl FnOnce(&str) -> Result<T, ConfigError>,
    ) -> Result<T, ConfigError> {
        self.try_parse(key, parse)?
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl Extend<(String, String)> for ParamDictionary {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

/// Parses `key=value` pairs separated by `;` or newlines.
impl FromStr for ParamDictionary {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut dict = ParamDictionary::new();
        for pair in s.split([';', '\n']).map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| ConfigError::Missing(format!("'=' in {pair:?}")))?;
            dict.insert(key.trim(), value.trim());
        }
        Ok(dict)
    }
}
