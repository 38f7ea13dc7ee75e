use std::fmt;

use serde::{
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
    Deserializer, Serializer,
};

pub fn serialize<S>(data: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(*data)
}

/// Accepts a millisecond timestamp as a number or numeric string. `null`,
/// empty strings, objects and anything non-numeric become `0`. Arrays are
/// stringified first, so a single-element array reads as its element.
pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientMillisVisitor)
}

struct LenientMillisVisitor;

impl<'de> Visitor<'de> for LenientMillisVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a millisecond timestamp")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(i64::try_from(v).unwrap_or(i64::MAX))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(if v.is_finite() { v as i64 } else { 0 })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let v = v.trim();
        Ok(v.parse::<i64>()
            .ok()
            .or_else(|| v.parse::<f64>().ok().filter(|x| x.is_finite()).map(|x| x as i64))
            .unwrap_or(0))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(v.into())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(0)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
        let joined = super::lenient_string::LenientStringVisitor.visit_seq(seq)?;
        self.visit_str(&joined)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[test]
    fn parse_millis() {
        for (input, expected) in [
            (serde_json::json!(1700000000000_i64), 1700000000000),
            (serde_json::json!("1700000000000"), 1700000000000),
            (serde_json::json!(1700000000000.7), 1700000000000),
            (serde_json::json!(""), 0),
            (serde_json::json!("soon"), 0),
            (serde_json::json!(null), 0),
            (serde_json::json!([1700000000000_i64]), 1700000000000),
            (serde_json::json!([]), 0),
            (serde_json::json!([1, 2]), 0),
            (serde_json::json!({"at": 1700000000000_i64}), 0),
        ] {
            let output = serde_json::from_value::<Data>(input).unwrap();
            assert_eq!(output.0, expected);
        }
    }

    #[derive(Debug, Deserialize)]
    struct Data(#[serde(with = "super")] i64);
}
