//! Enumerations that go hand in hand with strings.
//!
//! Each member of a `StringEnum` is bound to a fixed text. Members compare
//! equal to, hash like, and render as that text, so they can be used
//! wherever a plain string is expected. Usually implemented with
//! `#[derive(StringEnum)]`:
//!
//! ```
//! use tagjson::StringEnum;
//!
//! #[derive(Debug, Clone, Copy, StringEnum)]
//! #[string_enum(rename_all = "lowercase")]
//! enum Three {
//!     One,
//!     Two,
//!     Three,
//! }
//!
//! assert_eq!(Three::Two, "two");
//! assert_eq!("two", Three::Two);
//! assert_eq!(Three::from_text("three").unwrap(), Three::Three);
//! assert!(Three::from_text("four").is_err());
//! assert_eq!(Three::allowed_values(), "one, two, three");
//! assert_eq!(format!("{}!", Three::One), "one!");
//! ```
//!
//! The derive also provides `PartialEq`, `Eq` and `Hash`, so those must not
//! be derived alongside it.


use crate::error::{
    Error,
    Result,
};
use serde::{
    de::Error as _,
    Deserialize,
    Deserializer,
    Serializer,
};


/// A closed set of members, each bound to an immutable text.
pub trait StringEnum: Copy + 'static {
    /// Every member, in declaration order.
    const MEMBERS: &'static [Self];

    /// The text this member is bound to.
    fn as_str(&self) -> &'static str;

    fn members() -> &'static [Self] {
        Self::MEMBERS
    }

    /// Look up the member bound to `text`.
    fn from_text(text: &str) -> Result<Self> {
        Self::MEMBERS
            .iter()
            .copied()
            .find(|member| member.as_str() == text)
            .ok_or_else(|| Error::UnknownMember {
                value: text.to_owned(),
                allowed: Self::allowed_values(),
            })
    }

    /// The allowed texts, comma separated.
    fn allowed_values() -> String {
        Self::MEMBERS
            .iter()
            .map(|member| member.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Serialize a member as its text. Used by the derive.
#[doc(hidden)]
pub fn serialize_member<E, S>(member: &E, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    E: StringEnum,
    S: Serializer,
{
    serializer.serialize_str(member.as_str())
}

/// Deserialize a member from its text. Used by the derive.
#[doc(hidden)]
pub fn deserialize_member<'de, E, D>(deserializer: D) -> std::result::Result<E, D::Error>
where
    E: StringEnum,
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    E::from_text(&text).map_err(D::Error::custom)
}
