//! Immutable values carried on topics.
//!
//! A [`Message`] is built once from text, bytes, or a number and exposes three
//! views that are derived at construction and never change afterwards:
//!
//! | View | Type | Derivation |
//! |------|------|------------|
//! | raw | `Bytes` | UTF-8 encoding of the text |
//! | text | `str` | the source text |
//! | number | `f64` | parse of the text, NaN when it is not a number |

use crate::error::{Result, RivuletError};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::fmt;

/// A value published on a topic.
#[derive(Debug, Clone)]
pub struct Message {
    data: Bytes,
    text: String,
    number: f64,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Create a message from text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let number = parse_number(&text);
        Self {
            data: Bytes::from(text.clone().into_bytes()),
            text,
            number,
            created_at: Utc::now(),
        }
    }

    /// Create a message from text that may be absent.
    ///
    /// # Errors
    /// Returns [`RivuletError::InvalidArgument`] when `text` is `None`.
    pub fn try_from_text(text: Option<&str>) -> Result<Self> {
        text.map(Self::from_text)
            .ok_or_else(|| RivuletError::invalid_argument("message text is absent"))
    }

    /// Create a message from raw bytes.
    ///
    /// The bytes are decoded as UTF-8 first; invalid sequences are replaced
    /// with U+FFFD, so the stored raw view is the re-encoded text.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self::from_text(String::from_utf8_lossy(bytes.as_ref()).into_owned())
    }

    /// Create a message from a number.
    ///
    /// The number is formatted to text and the numeric view is parsed back
    /// from that text, so `as_number` reflects what a subscriber reading the
    /// text would see.
    pub fn from_number(value: f64) -> Self {
        Self::from_text(format_number(value))
    }

    /// Raw byte view.
    pub fn as_bytes(&self) -> &Bytes {
        &self.data
    }

    /// Text view.
    pub fn as_text(&self) -> &str {
        &self.text
    }

    /// Numeric view; NaN when the text is not a number.
    pub fn as_number(&self) -> f64 {
        self.number
    }

    /// Whether the numeric view holds a real number.
    pub fn is_numeric(&self) -> bool {
        !self.number.is_nan()
    }

    /// When this message was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::from_text(text)
    }
}

impl From<f64> for Message {
    fn from(value: f64) -> Self {
        Self::from_number(value)
    }
}

/// Parse the numeric view of a text, falling back to NaN.
fn parse_number(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Format a number so that integral values keep a decimal point ("4.0").
fn format_number(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_message_views() {
        let msg = Message::from_text("42.5");
        assert_eq!(msg.as_text(), "42.5");
        assert_eq!(msg.as_bytes().as_ref(), b"42.5");
        assert_eq!(msg.as_number(), 42.5);
        assert!(msg.is_numeric());
    }

    #[test]
    fn non_numeric_text_is_nan() {
        let msg = Message::from_text("hello");
        assert!(msg.as_number().is_nan());
        assert!(!msg.is_numeric());
        assert_eq!(msg.as_text(), "hello");
    }

    #[test]
    fn surrounding_whitespace_is_ignored_for_numbers() {
        let msg = Message::from_text(" 7 \n");
        assert_eq!(msg.as_number(), 7.0);
        assert_eq!(msg.as_text(), " 7 \n");
    }

    #[test]
    fn absent_text_is_rejected() {
        let err = Message::try_from_text(None).unwrap_err();
        assert_eq!(err.code(), "E001");

        let msg = Message::try_from_text(Some("1")).unwrap();
        assert_eq!(msg.as_number(), 1.0);
    }

    #[test]
    fn bytes_are_decoded_to_text() {
        let msg = Message::from_bytes(b"-3");
        assert_eq!(msg.as_text(), "-3");
        assert_eq!(msg.as_number(), -3.0);

        let lossy = Message::from_bytes([0x31, 0xff]);
        assert!(lossy.as_text().starts_with('1'));
        assert!(lossy.as_number().is_nan());
    }

    #[test]
    fn number_round_trips_through_text() {
        let msg = Message::from_number(4.0);
        assert_eq!(msg.as_text(), "4.0");
        assert_eq!(msg.as_number(), 4.0);

        let msg = Message::from_number(-0.25);
        assert_eq!(msg.as_text(), "-0.25");
        assert_eq!(msg.as_number(), -0.25);
    }

    #[test]
    fn nan_number_stays_nan() {
        let msg = Message::from_number(f64::NAN);
        assert_eq!(msg.as_text(), "NaN");
        assert!(msg.as_number().is_nan());
    }

    #[test]
    fn infinite_number_round_trips() {
        let msg = Message::from_number(f64::INFINITY);
        assert_eq!(msg.as_number(), f64::INFINITY);
    }
}
