//! Form-encoding of payloads into URL query strings
//!
//! Nested maps and lists flatten to bracketed keys (`user[name]=a`,
//! `ids[0]=1`), booleans become `1`/`0` and nulls are dropped.

use crate::options::Payload;
use serde_json::Value;
use url::form_urlencoded::Serializer;

/// Encode a payload as an `application/x-www-form-urlencoded` string.
pub fn build_query(payload: &Payload) -> String {
    let mut serializer = Serializer::new(String::new());
    for (key, value) in payload.entries() {
        append_value(&mut serializer, &key, value);
    }
    serializer.finish()
}

fn append_value(serializer: &mut Serializer<'_, String>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            serializer.append_pair(key, if *b { "1" } else { "0" });
        }
        Value::Number(n) => {
            serializer.append_pair(key, &n.to_string());
        }
        Value::String(s) => {
            serializer.append_pair(key, s);
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                append_value(serializer, &format!("{}[{}]", key, i), item);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                append_value(serializer, &format!("{}[{}]", key, k), v);
            }
        }
    }
}

/// Append an encoded query to `url`, keeping any existing query and fragment.
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }

    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };
    let separator = if !base.contains('?') {
        "?"
    } else if base.ends_with('?') || base.ends_with('&') {
        ""
    } else {
        "&"
    };

    let mut out = format!("{}{}{}", base, separator, query);
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        Payload::try_from(value).unwrap()
    }

    #[test]
    fn test_flat_fields() {
        assert_eq!(build_query(&payload(json!({"a": "1", "b": "2"}))), "a=1&b=2");
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let query = build_query(&payload(json!({"q": "rust lang&more", "tag": "a/b"})));
        assert_eq!(query, "q=rust+lang%26more&tag=a%2Fb");
    }

    #[test]
    fn test_nested_values_use_brackets() {
        let query = build_query(&payload(json!({"ids": [1, 2], "user": {"name": "ali"}})));
        assert_eq!(query, "ids%5B0%5D=1&ids%5B1%5D=2&user%5Bname%5D=ali");
    }

    #[test]
    fn test_scalars_and_nulls() {
        let query = build_query(&payload(json!({"on": true, "off": false, "gone": null, "n": 2.5})));
        assert_eq!(query, "on=1&off=0&n=2.5");
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let mut fields = serde_json::Map::new();
        fields.insert("b".to_string(), json!(2));
        fields.insert("a".to_string(), json!(1));
        fields.insert("c".to_string(), json!({"z": 1, "y": 2}));

        assert_eq!(
            build_query(&Payload::Fields(fields)),
            "b=2&a=1&c%5Bz%5D=1&c%5By%5D=2"
        );
    }

    #[test]
    fn test_pairs_keep_duplicates() {
        let query = build_query(&Payload::from(vec![("tag", "x"), ("tag", "y")]));
        assert_eq!(query, "tag=x&tag=y");
    }

    #[test]
    fn test_append_query() {
        assert_eq!(append_query("http://x", "a=1"), "http://x?a=1");
        assert_eq!(append_query("http://x?page=2", "a=1"), "http://x?page=2&a=1");
        assert_eq!(append_query("http://x?", "a=1"), "http://x?a=1");
        assert_eq!(append_query("http://x/p#top", "a=1"), "http://x/p?a=1#top");
        assert_eq!(append_query("http://x", ""), "http://x");
    }
}
