// Lane roles and map sides.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five lane roles, in roster slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

impl Role {
    /// All roles in slot order (TOP, JUNGLE, MID, ADC, SUPPORT).
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    /// Parse a role string.
    ///
    /// Accepts the short wire codes as well as the long names:
    /// - "TOP"
    /// - "JGL" / "JUNGLE"
    /// - "MID" / "MIDDLE"
    /// - "ADC" / "BOT"
    /// - "SUP" / "SUPPORT"
    pub fn from_str_role(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TOP" => Some(Role::Top),
            "JGL" | "JUNGLE" => Some(Role::Jungle),
            "MID" | "MIDDLE" => Some(Role::Mid),
            "ADC" | "BOT" => Some(Role::Adc),
            "SUP" | "SUPPORT" => Some(Role::Support),
            _ => None,
        }
    }

    /// Wire code sent to the analysis service.
    pub fn code(&self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JGL",
            Role::Mid => "MID",
            Role::Adc => "ADC",
            Role::Support => "SUP",
        }
    }

    /// Slot index within a roster.
    pub fn slot_index(&self) -> usize {
        match self {
            Role::Top => 0,
            Role::Jungle => 1,
            Role::Mid => 2,
            Role::Adc => 3,
            Role::Support => 4,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which side of the map a team plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn from_str_side(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "blue" => Some(Side::Blue),
            "red" => Some(Side::Red),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Side::Blue => "blue",
            Side::Red => "red",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_role_names() {
        assert_eq!(Role::from_str_role("JGL"), Some(Role::Jungle));
        assert_eq!(Role::from_str_role("jungle"), Some(Role::Jungle));
        assert_eq!(Role::from_str_role(" sup "), Some(Role::Support));
        assert_eq!(Role::from_str_role("SUPPORT"), Some(Role::Support));
        assert_eq!(Role::from_str_role("carry"), None);
    }

    #[test]
    fn slot_order_matches_all() {
        for (i, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.slot_index(), i);
        }
    }

    #[test]
    fn wire_codes_round_trip_through_parser() {
        for role in Role::ALL {
            assert_eq!(Role::from_str_role(role.code()), Some(role));
        }
    }

    #[test]
    fn side_parsing_is_case_insensitive() {
        assert_eq!(Side::from_str_side("Blue"), Some(Side::Blue));
        assert_eq!(Side::from_str_side("RED"), Some(Side::Red));
        assert_eq!(Side::from_str_side("purple"), None);
        assert_eq!(Side::Red.to_string(), "red");
    }
}
