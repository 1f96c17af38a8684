use serde::{Deserialize, Serialize};

/// Color representation.
///
/// Serialized as a CSS hex string: `#RRGGBB` for opaque colors and `#RRGGBBAA` otherwise.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from_hex(&value).ok_or_else(|| format!("invalid color `{value}`"))
    }
}

impl From<Color> for String {
    fn from(val: Color) -> Self {
        val.to_hex()
    }
}

impl Color {
    /// White color: `#FFFFFF`
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    /// Black color: `#000000`
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// Medium gray used for the route line: `#888888`
    pub const ROUTE_GRAY: Color = Color::rgba(136, 136, 136, 255);
    /// Fill of a marker that has no photo: `#3FB1CE`
    pub const MARKER_BLUE: Color = Color::rgba(63, 177, 206, 255);

    /// Constructs color from its RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Converts the color into u8 array (RGBA).
    pub fn to_u8_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts the color into a CSS hex string.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Parses a color from the hex string. Accepted forms are `#RGB`, `#RRGGBB` and `#RRGGBBAA`.
    pub fn try_from_hex(hex_string: &str) -> Option<Self> {
        let digits = hex_string.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }

        match digits.len() {
            3 => {
                let mut channels = digits
                    .chars()
                    .map(|c| c.to_digit(16).map(|v| (v * 17) as u8));
                Some(Self::rgba(
                    channels.next()??,
                    channels.next()??,
                    channels.next()??,
                    255,
                ))
            }
            6 | 8 => {
                let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
                let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
                let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
                let a = if digits.len() == 8 {
                    u8::from_str_radix(&digits[6..8], 16).ok()?
                } else {
                    255
                };

                Some(Self { r, g, b, a })
            }
            _ => None,
        }
    }

    /// Returns a new color instance, copied from the base one but with the given alpha channel.
    pub fn with_alpha(&self, a: u8) -> Self {
        Self { a, ..*self }
    }

    /// Red component of the color in RGBA space.
    pub fn r(&self) -> u8 {
        self.r
    }

    /// Green component of the color in RGBA space.
    pub fn g(&self) -> u8 {
        self.g
    }

    /// Blue component of the color in RGBA space.
    pub fn b(&self) -> u8 {
        self.b
    }

    /// Opacity component of the color.
    pub fn a(&self) -> u8 {
        self.a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_serialization() {
        let hex = "#FF1000AA";
        let color = Color::try_from_hex(hex).unwrap();
        assert_eq!(&color.to_hex(), hex);
        assert_eq!(Color::try_from_hex("#ff1000aa"), Some(color));
    }

    #[test]
    fn short_form() {
        assert_eq!(Color::try_from_hex("#888"), Some(Color::ROUTE_GRAY));
        assert_eq!(Color::ROUTE_GRAY.to_hex(), "#888888");
    }

    #[test]
    fn invalid_strings() {
        assert_eq!(Color::try_from_hex("888888"), None);
        assert_eq!(Color::try_from_hex("#88"), None);
        assert_eq!(Color::try_from_hex("#GG0000"), None);
        assert_eq!(Color::try_from_hex("#ä00"), None);
    }

    #[test]
    fn deserializes_from_json_string() {
        let color: Color = serde_json::from_str("\"#3FB1CE\"").unwrap();
        assert_eq!(color, Color::MARKER_BLUE);
        assert!(serde_json::from_str::<Color>("\"blue\"").is_err());
    }
}
