use std::fmt;
use std::str::FromStr;

/// Class label attached to a raster.
///
/// Labels are compared as text after canonicalization: surrounding
/// whitespace is dropped and integral numbers lose their fractional part,
/// so `"2"`, `" 2 "` and `"2.0"` are the same label. Anything else is kept
/// verbatim.
///
/// # Examples
///
/// ```
/// use rasterprep_image::Label;
///
/// assert_eq!(Label::new("3.0"), Label::from(3));
/// assert_eq!(Label::new(" seven ").as_str(), "seven");
/// assert_ne!(Label::new("2.5"), Label::from(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    /// Create a label from raw text.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                Label((v as i64).to_string())
            }
            _ => Label(trimmed.to_string()),
        }
    }

    /// The canonical text of the label.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the label has no text.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Label {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Label::new(s))
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::new(s)
    }
}

impl From<i64> for Label {
    fn from(v: i64) -> Self {
        Label(v.to_string())
    }
}

impl From<i32> for Label {
    fn from(v: i32) -> Self {
        Label(v.to_string())
    }
}
