use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// HSK proficiency level; only used to partition the vocabulary.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HskLevel {
    #[default]
    Hsk1,
    Hsk2,
    Hsk3,
    Hsk4,
    Hsk5,
    Hsk6,
}

impl HskLevel {
    pub const ALL: [HskLevel; 6] = [
        HskLevel::Hsk1,
        HskLevel::Hsk2,
        HskLevel::Hsk3,
        HskLevel::Hsk4,
        HskLevel::Hsk5,
        HskLevel::Hsk6,
    ];

    pub fn number(self) -> u8 {
        match self {
            HskLevel::Hsk1 => 1,
            HskLevel::Hsk2 => 2,
            HskLevel::Hsk3 => 3,
            HskLevel::Hsk4 => 4,
            HskLevel::Hsk5 => 5,
            HskLevel::Hsk6 => 6,
        }
    }

    /// Next level, wrapping from HSK 6 back to HSK 1
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous level, wrapping from HSK 1 to HSK 6
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn file_name(self) -> String {
        format!("{self}.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(HskLevel::Hsk1.to_string(), "hsk1");
        assert_eq!(HskLevel::Hsk6.to_string(), "hsk6");
        assert_eq!(HskLevel::Hsk3.file_name(), "hsk3.json");
    }

    #[test]
    fn test_next_and_prev_wrap() {
        assert_eq!(HskLevel::Hsk1.next(), HskLevel::Hsk2);
        assert_eq!(HskLevel::Hsk6.next(), HskLevel::Hsk1);
        assert_eq!(HskLevel::Hsk1.prev(), HskLevel::Hsk6);
        assert_eq!(HskLevel::Hsk4.prev(), HskLevel::Hsk3);
    }

    #[test]
    fn test_serializes_as_map_key() {
        let mut map = BTreeMap::new();
        map.insert(HskLevel::Hsk2, 7u32);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"hsk2":7}"#);

        let back: BTreeMap<HskLevel, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&HskLevel::Hsk2), Some(&7));
    }

    #[test]
    fn test_value_enum_parses_cli_names() {
        let level = HskLevel::from_str("hsk5", true).unwrap();
        assert_eq!(level, HskLevel::Hsk5);
    }
}
