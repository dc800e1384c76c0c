


use serde::{Deserialize, Deserializer};

pub mod transactions;


/*
    relayers and frontends send amounts and heights either as
    json numbers or as decimal strings, both are accepted
*/

pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where D: Deserializer<'de>{

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw{
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(
        match Raw::deserialize(deserializer)?{
            Raw::Text(text) => text,
            Raw::Signed(number) => number.to_string(),
            Raw::Unsigned(number) => number.to_string(),
        }
    )
}

pub fn number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where D: Deserializer<'de>{

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw{
        Signed(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)?{
        Raw::Signed(number) => Ok(number),
        Raw::Text(text) if text.is_empty() => Ok(0),
        Raw::Text(text) => text.parse::<i64>().map_err(serde::de::Error::custom),
    }
}
