use serde::{de, Deserialize, Deserializer};

/// Query string of the collection listings
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Also return deprecated entries
    #[serde(default, deserialize_with = "flag")]
    pub deprecated: bool,
}

/// Query string of the item DELETE endpoints
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    /// Remove the entry instead of deprecating it (cannot be undone)
    #[serde(default, deserialize_with = "flag")]
    pub complete: bool,
}

/// Lenient boolean as sent by browsers and scripts: `True`, `1`, `yes`, ...
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("'{}' is not a boolean", raw)))
}
