//! Submitted form data.
//!
//! [`FormData`] is an ordered multi-value mapping of field name to the raw
//! strings submitted for it, as produced by an urlencoded form body.

use indexmap::IndexMap;

/// Raw, unvalidated form input.
///
/// # Examples
///
/// ```
/// use dataform_forms::FormData;
///
/// let data = FormData::parse("name=Ada+Lovelace&tag=a&tag=b");
/// assert_eq!(data.get("name"), Some("Ada Lovelace"));
/// assert_eq!(data.get("tag"), Some("b"));
/// assert_eq!(data.get_list("tag").map(<[String]>::len), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    data: IndexMap<String, Vec<String>>,
}

impl FormData {
    /// Creates an empty `FormData`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` string.
    pub fn parse(encoded: &str) -> Self {
        let mut data = Self::new();
        for pair in encoded.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .find('=')
                .map_or((pair, ""), |eq_pos| (&pair[..eq_pos], &pair[eq_pos + 1..]));
            data.append(percent_decode(key), percent_decode(value));
        }
        data
    }

    /// Appends a value for `key`, keeping earlier values.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces all values for `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), vec![value.into()]);
    }

    /// Returns the last value submitted for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns every value submitted for `key`.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.data.get(key).map(Vec::as_slice)
    }

    /// Returns `true` if `key` was submitted.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the submitted keys in submission order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (key, value) in iter {
            data.append(key, value);
        }
        data
    }
}

fn percent_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}
