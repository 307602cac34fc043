use serde_json::{json, Value};

/// A single Appwrite list query, serialized as the JSON string the REST API
/// expects in `queries[]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn equal(attribute: &str, value: impl Into<Value>) -> Self {
        Self::build(json!({
            "method": "equal",
            "attribute": attribute,
            "values": [value.into()],
        }))
    }

    pub fn order_desc(attribute: &str) -> Self {
        Self::build(json!({
            "method": "orderDesc",
            "attribute": attribute,
        }))
    }

    pub fn limit(limit: u32) -> Self {
        Self::build(json!({
            "method": "limit",
            "values": [limit],
        }))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn build(value: Value) -> Self {
        Self(value.to_string())
    }
}

/// Matches one `queries[]` pair in the raw query string
///
/// Mockito decodes query strings into a map, so repeated keys can only be
/// checked against the encoded text.
#[cfg(test)]
pub(crate) fn query_param_matcher(query: &Query) -> mockito::Matcher {
    mockito::Matcher::Regex(format!("(^|&){}(&|$)", escape_regex(&encoded_pair(query))))
}

#[cfg(test)]
fn encoded_pair(query: &Query) -> String {
    let mut url = reqwest::Url::parse("http://localhost/").unwrap();
    url.query_pairs_mut().append_pair("queries[]", query.as_str());
    url.query().unwrap_or_default().to_string()
}

#[cfg(test)]
fn escape_regex(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
