//! Price tier mapping between the API enum names and 0-4 tiers.

pub const MAX_PRICE_LEVEL: u8 = 4;

/// API enum name for a price tier.
pub fn price_level_to_enum(level: u8) -> Option<&'static str> {
    match level {
        0 => Some("PRICE_LEVEL_FREE"),
        1 => Some("PRICE_LEVEL_INEXPENSIVE"),
        2 => Some("PRICE_LEVEL_MODERATE"),
        3 => Some("PRICE_LEVEL_EXPENSIVE"),
        4 => Some("PRICE_LEVEL_VERY_EXPENSIVE"),
        _ => None,
    }
}

/// Price tier for an API enum name. Unknown and unspecified values map to `None`.
pub fn enum_to_price_level(value: &str) -> Option<u8> {
    match value {
        "PRICE_LEVEL_FREE" => Some(0),
        "PRICE_LEVEL_INEXPENSIVE" => Some(1),
        "PRICE_LEVEL_MODERATE" => Some(2),
        "PRICE_LEVEL_EXPENSIVE" => Some(3),
        "PRICE_LEVEL_VERY_EXPENSIVE" => Some(4),
        _ => None,
    }
}
