use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Locales supported for number and date rendering in transcripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Locale {
    #[default]
    EnUs,
    EnGb,
    DeDe,
    FrFr,
    EsEs,
}

impl Locale {
    pub const ALL: [Locale; 5] = [
        Locale::EnUs,
        Locale::EnGb,
        Locale::DeDe,
        Locale::FrFr,
        Locale::EsEs,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::EnGb => "en-GB",
            Locale::DeDe => "de-DE",
            Locale::FrFr => "fr-FR",
            Locale::EsEs => "es-ES",
        }
    }

    fn group_separator(&self) -> &'static str {
        match self {
            Locale::EnUs | Locale::EnGb => ",",
            Locale::DeDe | Locale::EsEs => ".",
            Locale::FrFr => "\u{202f}",
        }
    }

    /// Spanish leaves four-digit numbers ungrouped
    fn min_grouping_digits(&self) -> usize {
        match self {
            Locale::EsEs => 5,
            _ => 4,
        }
    }

    /// Render an integer count with thousands separators.
    ///
    /// Leading digits are parsed the way the YouTube statistics strings are
    /// read by browsers; input without any leading digits renders as `NaN`.
    pub fn format_count(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return "NaN".to_string();
        };

        let trimmed = raw.trim_start();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        let digits = digits.trim_start_matches('0');
        if rest.chars().next().map_or(true, |c| !c.is_ascii_digit()) {
            return "NaN".to_string();
        }
        let digits = if digits.is_empty() { "0" } else { digits };

        let grouped = if digits.len() < self.min_grouping_digits() {
            digits.to_string()
        } else {
            let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
            for (i, c) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    out.push_str(self.group_separator());
                }
                out.push(c);
            }
            out
        };

        if negative && grouped != "0" {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }

    /// Render an RFC 3339 timestamp as a short numeric date (UTC calendar day)
    pub fn format_date(&self, raw: &str) -> String {
        let Ok(parsed) = DateTime::parse_from_rfc3339(raw) else {
            return "Invalid Date".to_string();
        };
        let date = parsed.with_timezone(&Utc).date_naive();
        let (day, month, year) = (date.day(), date.month(), date.year());

        match self {
            Locale::EnUs => format!("{}/{}/{}", month, day, year),
            Locale::EnGb | Locale::FrFr => format!("{:02}/{:02}/{}", day, month, year),
            Locale::DeDe => format!("{}.{}.{}", day, month, year),
            Locale::EsEs => format!("{}/{}/{}", day, month, year),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(tag: &str) -> anyhow::Result<Self> {
        let normalized = tag.trim().replace('_', "-").to_lowercase();
        Locale::ALL
            .into_iter()
            .find(|locale| locale.tag().to_lowercase() == normalized)
            .ok_or_else(|| anyhow::anyhow!("Unsupported locale: {}", tag))
    }
}

impl TryFrom<String> for Locale {
    type Error = anyhow::Error;

    fn try_from(tag: String) -> anyhow::Result<Self> {
        tag.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag().to_string()
    }
}
