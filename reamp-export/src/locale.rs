//! Десятичный разделитель по идентификатору локали.
//!
//! Принимаются POSIX (`de_DE.UTF-8`), BCP-47 (`de-DE`) и Windows
//! (`German_Germany.1252`, `German`) имена. Группировка разрядов не
//! используется, поэтому от локали нужен только разделитель.

use crate::{ExportError, ExportResult};

/// Языки с десятичной запятой (код ISO 639-1 и английское имя Windows).
const COMMA_LANGUAGES: &[(&str, &str)] = &[
    ("de", "german"),
    ("fr", "french"),
    ("es", "spanish"),
    ("it", "italian"),
    ("nl", "dutch"),
    ("pt", "portuguese"),
    ("ru", "russian"),
    ("pl", "polish"),
    ("cs", "czech"),
    ("sv", "swedish"),
    ("da", "danish"),
    ("fi", "finnish"),
    ("nb", "norwegian"),
    ("no", "norwegian"),
    ("tr", "turkish"),
    ("el", "greek"),
    ("hu", "hungarian"),
    ("ro", "romanian"),
    ("uk", "ukrainian"),
    ("bg", "bulgarian"),
    ("hr", "croatian"),
    ("sk", "slovak"),
    ("sl", "slovenian"),
    ("id", "indonesian"),
];

/// Языки с десятичной точкой.
const PERIOD_LANGUAGES: &[(&str, &str)] = &[
    ("en", "english"),
    ("ja", "japanese"),
    ("zh", "chinese"),
    ("ko", "korean"),
    ("he", "hebrew"),
    ("th", "thai"),
    ("hi", "hindi"),
];

/// Регионы, где язык с десятичной запятой пишет точку (как в glibc).
///
/// Ключ — код языка; регион задаётся кодом ISO 3166 или английским именем
/// Windows. Швейцария обрабатывается отдельно для всех языков.
const PERIOD_REGIONS: &[(&str, &[&str])] = &[
    (
        "es",
        &[
            "mx",
            "mexico",
            "us",
            "united states",
            "do",
            "dominican republic",
            "gt",
            "guatemala",
            "hn",
            "honduras",
            "ni",
            "nicaragua",
            "pa",
            "panama",
            "pr",
            "puerto rico",
            "sv",
            "el salvador",
        ],
    ),
    ("de", &["li", "liechtenstein"]),
];

/// Правила форматирования чисел выбранной локали.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLocale {
    name: String,
    decimal_separator: char,
}

impl NumberLocale {
    /// Локаль `C`: десятичная точка.
    pub fn c() -> Self {
        Self {
            name: "C".to_string(),
            decimal_separator: '.',
        }
    }

    /// Определяет десятичный разделитель по идентификатору локали.
    pub fn resolve(id: &str) -> ExportResult<Self> {
        let trimmed = id.trim();
        let lower = trimmed.to_lowercase();

        // Кодировка и модификатор на разделитель не влияют
        let base = lower
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .trim();

        if base.is_empty() || base == "c" || base == "posix" {
            return Ok(Self {
                name: trimmed.to_string(),
                decimal_separator: '.',
            });
        }

        let (language, region) = match base.split_once(['_', '-']) {
            Some((l, r)) => (l.trim(), r.trim()),
            None => (base, ""),
        };

        let lookup = |table: &'static [(&'static str, &'static str)]| {
            table
                .iter()
                .find(|(code, name)| language == *code || language == *name)
                .map(|(code, _)| *code)
        };

        let decimal_separator = if let Some(code) = lookup(COMMA_LANGUAGES) {
            if is_period_region(code, region) {
                '.'
            } else {
                ','
            }
        } else if lookup(PERIOD_LANGUAGES).is_some() {
            '.'
        } else {
            return Err(ExportError::Config(format!("Unsupported locale '{id}'")));
        };

        Ok(Self {
            name: trimmed.to_string(),
            decimal_separator,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// Фиксированная запись с шестью знаками после разделителя (как `%f`).
    pub fn format_fixed(
        &self,
        value: f64,
    ) -> String {
        if value.is_nan() {
            return "nan".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "inf" } else { "-inf" }.to_string();
        }

        let s = format!("{value:.6}");
        if self.decimal_separator == '.' {
            s
        } else {
            s.replace('.', &self.decimal_separator.to_string())
        }
    }
}

/// `true`, если в регионе `region` язык `language` пишет десятичную точку.
fn is_period_region(
    language: &str,
    region: &str,
) -> bool {
    // В Швейцарии немецкий, французский и итальянский пишут точку
    if region == "ch" || region.starts_with("switzerland") {
        return true;
    }

    PERIOD_REGIONS
        .iter()
        .filter(|(lang, _)| *lang == language)
        .any(|(_, regions)| regions.iter().any(|r| *r == region))
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::c()
    }
}
