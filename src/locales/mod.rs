//! Embedded translation tables.
//!
//! Keys are dot-separated paths into a JSON document per language, with
//! `{name}` placeholders substituted at lookup time. A missing translation
//! falls back to English, then to the key itself, so a typo shows up in the
//! chat instead of panicking.

use serde_json::Value;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    En,
    Ru,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::En, Lang::Ru];

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ru => "ru",
        }
    }

    pub fn try_from_code(code: &str) -> Option<Lang> {
        Lang::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Unknown codes read as English, mirroring the storage default.
    pub fn from_code(code: &str) -> Lang {
        Lang::try_from_code(code).unwrap_or(Lang::En)
    }
}

static EN: LazyLock<Value> =
    LazyLock::new(|| serde_json::from_str(include_str!("en.json")).expect("invalid en.json"));
static RU: LazyLock<Value> =
    LazyLock::new(|| serde_json::from_str(include_str!("ru.json")).expect("invalid ru.json"));

fn table(lang: Lang) -> &'static Value {
    match lang {
        Lang::En => &EN,
        Lang::Ru => &RU,
    }
}

fn lookup(lang: Lang, key: &str) -> Option<&'static str> {
    let mut value = table(lang);
    for part in key.split('.') {
        value = value.get(part)?;
    }
    value.as_str()
}

pub fn text(lang: Lang, key: &str) -> String {
    lookup(lang, key)
        .or_else(|| lookup(Lang::En, key))
        .unwrap_or(key)
        .to_owned()
}

pub fn text_with(lang: Lang, key: &str, args: &[(&str, String)]) -> String {
    let mut out = text(lang, key);
    for (name, value) in args {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
