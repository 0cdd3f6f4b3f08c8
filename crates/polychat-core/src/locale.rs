//! Locale phrase tables used to render notifications.
//!
//! A [`Locale`] is plain data: six phrase fragments plus the pronoun a
//! participant uses to address itself. New locales are added by building a
//! table (or deserializing one from configuration), not by adding types.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Grammatical person used when rendering a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Person {
    /// The viewer is the subject of the event ("you joined").
    Second,
    /// The viewer observes someone else's event ("Ana joined").
    Third,
}

/// Phrase table for one regional rendering of chat events.
///
/// Every slot is required when deserializing; a table missing a slot
/// fails to load rather than rendering a partial line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Short locale tag, e.g. `"es-MX"`.
    pub name: Cow<'static, str>,
    /// Predicate for "you have joined".
    pub joined_second: Cow<'static, str>,
    /// Predicate for "he/she has joined".
    pub joined_third: Cow<'static, str>,
    /// Predicate for "you have left".
    pub left_second: Cow<'static, str>,
    /// Predicate for "he/she has left".
    pub left_third: Cow<'static, str>,
    /// Second-person simple past of "to say".
    pub say_second: Cow<'static, str>,
    /// Third-person simple past of "to say".
    pub say_third: Cow<'static, str>,
    /// The pronoun "you" as used at the start of a sentence.
    pub pronoun: Cow<'static, str>,
}

impl Locale {
    /// Spanish as spoken in Mexico.
    pub const fn mexican() -> Self {
        Self {
            name: Cow::Borrowed("es-MX"),
            joined_second: Cow::Borrowed("le caiste al chat."),
            joined_third: Cow::Borrowed("le cayó al chat."),
            left_second: Cow::Borrowed("te pelaste del chat, mijo."),
            left_third: Cow::Borrowed("se peló del chat."),
            say_second: Cow::Borrowed("dijiste"),
            say_third: Cow::Borrowed("dijo"),
            pronoun: Cow::Borrowed("Tú"),
        }
    }

    /// Spanish as spoken in Spain.
    pub const fn spanish() -> Self {
        Self {
            name: Cow::Borrowed("es-ES"),
            joined_second: Cow::Borrowed("vos habéis unido al chat."),
            joined_third: Cow::Borrowed("ha arrivado al chat."),
            left_second: Cow::Borrowed("habéis abandonado el chat, tio."),
            left_third: Cow::Borrowed("ha abandonado el chat."),
            say_second: Cow::Borrowed("habéis dicho"),
            say_third: Cow::Borrowed("ha dicho"),
            pronoun: Cow::Borrowed("Vos"),
        }
    }

    /// British English.
    pub const fn british() -> Self {
        Self {
            name: Cow::Borrowed("en-GB"),
            joined_second: Cow::Borrowed("have joined the chat."),
            joined_third: Cow::Borrowed("has joined the chat."),
            left_second: Cow::Borrowed("you have left the chat."),
            left_third: Cow::Borrowed("has left the chat."),
            say_second: Cow::Borrowed("said"),
            say_third: Cow::Borrowed("said"),
            pronoun: Cow::Borrowed("You"),
        }
    }

    /// Looks up a built-in locale by tag or by its common name.
    ///
    /// Matching is case-insensitive: `"es-MX"`, `"mexican"`, `"es-ES"`,
    /// `"spanish"`, `"en-GB"` and `"british"` are recognised.
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "es-mx" | "mexican" => Some(Self::mexican()),
            "es-es" | "spanish" => Some(Self::spanish()),
            "en-gb" | "british" => Some(Self::british()),
            _ => None,
        }
    }

    pub fn joined(&self, person: Person) -> &str {
        match person {
            Person::Second => &self.joined_second,
            Person::Third => &self.joined_third,
        }
    }

    pub fn left(&self, person: Person) -> &str {
        match person {
            Person::Second => &self.left_second,
            Person::Third => &self.left_third,
        }
    }

    pub fn said(&self, person: Person) -> &str {
        match person {
            Person::Second => &self.say_second,
            Person::Third => &self.say_third,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
