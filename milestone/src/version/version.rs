use crate::common::VERSION_SEPARATOR;
use crate::errors::{ErrorKind, MilestoneError, MilestoneResult};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A parsed dotted-numeric version identifier such as `1.4.2`.
///
/// Components are compared left to right as integers, with missing trailing
/// components treated as zero. `1.4` and `1.4.0` are therefore equal (and hash
/// equally) even though they keep their original text for display.
///
/// # Examples
///
/// ```rust
/// use milestone::version::Version;
///
/// let short: Version = "1.4".parse().unwrap();
/// let long: Version = "1.4.0".parse().unwrap();
/// assert_eq!(short, long);
/// assert!("1.9".parse::<Version>().unwrap() < "1.10".parse::<Version>().unwrap());
/// assert_eq!(long.to_string(), "1.4.0");
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    text: String,
    components: Vec<u64>,
}

impl Version {
    /// Parses a version identifier.
    ///
    /// Fails with `InvalidVersionFormat` for an empty string, an empty
    /// component (`1..2`, `1.`) or any component that is not made only of
    /// ASCII digits. Signs and whitespace are rejected as well.
    pub fn parse(text: &str) -> MilestoneResult<Version> {
        if text.is_empty() {
            return Err(MilestoneError::new(
                "Version identifier must not be empty",
                ErrorKind::InvalidVersionFormat,
            ));
        }

        let mut components = Vec::new();
        for component in text.split(VERSION_SEPARATOR) {
            if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(MilestoneError::new(
                    &format!(
                        "Invalid version '{}': component '{}' is not a non-negative integer",
                        text, component
                    ),
                    ErrorKind::InvalidVersionFormat,
                ));
            }

            let value = component.parse::<u64>().map_err(|e| {
                MilestoneError::new_with_cause(
                    &format!("Invalid version '{}': component '{}' is out of range", text, component),
                    ErrorKind::InvalidVersionFormat,
                    MilestoneError::from(e),
                )
            })?;
            components.push(value);
        }

        Ok(Version {
            text: text.to_string(),
            components,
        })
    }

    /// The identifier exactly as it was supplied.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The numeric components, without zero padding.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Components with trailing zeros removed, the canonical form used for
    /// equality and hashing.
    fn significant(&self) -> &[u64] {
        let len = self
            .components
            .iter()
            .rposition(|c| *c != 0)
            .map_or(0, |pos| pos + 1);
        &self.components[..len]
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let left = self.components.get(i).copied().unwrap_or(0);
            let right = other.components.get(i).copied().unwrap_or(0);
            match left.cmp(&right) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl FromStr for Version {
    type Err = MilestoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl TryFrom<&str> for Version {
    type Error = MilestoneError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Version::parse(value)
    }
}

impl TryFrom<String> for Version {
    type Error = MilestoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Version::parse(&value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Version::parse(&text).map_err(serde::de::Error::custom)
    }
}
