//! Metro line and line colour types.

use std::fmt;

/// Error returned when building a colour from invalid components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid colour: {reason}")]
pub struct InvalidColor {
    reason: &'static str,
}

/// An RGB display colour.
///
/// Colour has no bearing on routing; it is carried through for whoever draws
/// the network. The default is black, which is also what the loader falls back
/// to when a record has a missing or malformed colour.
///
/// # Examples
///
/// ```
/// use metro_server::domain::Rgb;
///
/// let red = Rgb::from_components(&[220, 20, 60]).unwrap();
/// assert_eq!(red.to_string(), "#dc143c");
///
/// // Out of range and wrong arity are rejected
/// assert!(Rgb::from_components(&[256, 0, 0]).is_err());
/// assert!(Rgb::from_components(&[1, 2]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Black, the fallback colour.
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Create a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from exactly three integer components in `0..=255`.
    pub fn from_components(components: &[i64]) -> Result<Self, InvalidColor> {
        let [r, g, b] = components else {
            return Err(InvalidColor {
                reason: "must have exactly 3 components",
            });
        };

        let channel = |v: i64| {
            u8::try_from(v).map_err(|_| InvalidColor {
                reason: "components must be within 0-255",
            })
        };

        Ok(Self::new(channel(*r)?, channel(*g)?, channel(*b)?))
    }

    /// Returns the colour as an `[r, g, b]` array.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A named metro line.
///
/// Lines are identified by name. Once added to a graph a line is never
/// modified or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Unique line name (e.g., "Line 2")
    pub name: String,
    /// Display colour
    pub color: Rgb,
}

impl Line {
    /// Creates a new line.
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}
