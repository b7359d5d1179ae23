//! Validated primitives shared by the Carelytics crates.
//!
//! Form input arrives as free text and the server speaks JSON numbers, so the
//! two newtypes here sit on both sides of that boundary:
//! - [`NonEmptyText`] for required string fields
//! - [`FiniteNumber`] for the numeric measurements (age, height, weight, BMI)

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when creating a [`FiniteNumber`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NumberError {
    /// The input text was empty or contained only whitespace
    #[error("number cannot be empty")]
    Empty,
    /// The input text is not a decimal number
    #[error("not a number: {0}")]
    Invalid(String),
    /// The value is NaN or infinite
    #[error("number must be finite")]
    NotFinite,
}

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A finite `f64` measurement.
///
/// Integral values serialise as JSON integers and display without a fractional
/// part (`30`, not `30.0`), so a value read from the server and written back
/// into a form field round-trips as the user typed it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FiniteNumber(f64);

impl FiniteNumber {
    /// Wraps `value`, rejecting NaN and infinities.
    pub fn new(value: f64) -> Result<Self, NumberError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(NumberError::NotFinite)
        }
    }

    /// Parses user-entered text.
    ///
    /// Surrounding whitespace is ignored. Blank input is [`NumberError::Empty`] rather
    /// than zero, so an untouched form field never counts as a value.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, NumberError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(NumberError::Empty);
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| NumberError::Invalid(trimmed.to_owned()))?;
        Self::new(value)
    }

    pub fn get(self) -> f64 {
        self.0
    }

    fn as_integer(self) -> Option<i64> {
        if self.0.fract() == 0.0 && self.0.abs() <= MAX_SAFE_INTEGER {
            Some(self.0 as i64)
        } else {
            None
        }
    }
}

impl std::fmt::Display for FiniteNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_integer() {
            Some(n) => write!(f, "{}", n),
            None => write!(f, "{}", self.0),
        }
    }
}

impl serde::Serialize for FiniteNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.as_integer() {
            Some(n) => serializer.serialize_i64(n),
            None => serializer.serialize_f64(self.0),
        }
    }
}

impl<'de> serde::Deserialize<'de> for FiniteNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        FiniteNumber::new(value).map_err(serde::de::Error::custom)
    }
}
