use std::fmt;
use std::str::FromStr;

/// Language of the labels the listing handlers add to titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub fn archived_suffix(&self) -> &'static str {
        match self {
            Locale::En => " (archived)",
            Locale::Ru => " (в архиве)",
        }
    }

    pub fn copy_suffix(&self) -> &'static str {
        match self {
            Locale::En => " (copy)",
            Locale::Ru => " (копия)",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            "ru" | "ru-ru" | "ru_ru" => Ok(Locale::Ru),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        })
    }
}
