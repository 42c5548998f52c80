use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::level::HskLevel;
use crate::error::{Error, Result};

static VOCAB_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/vocab");

/// One word of the bundled vocabulary. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub character: String,
    pub pinyin: String,
    pub meaning: String,
    #[serde(default)]
    pub breakdown: String,
}

impl VocabularyEntry {
    pub fn new(character: &str, pinyin: &str, meaning: &str) -> Self {
        let mut entry = Self {
            character: character.to_string(),
            pinyin: pinyin.to_string(),
            meaning: meaning.to_string(),
            breakdown: String::new(),
        };
        entry.fill_breakdown();
        entry
    }

    fn fill_breakdown(&mut self) {
        if self.breakdown.is_empty() {
            self.breakdown = format!("{} ({}): {}", self.character, self.pinyin, self.meaning);
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
struct LevelFile {
    #[allow(dead_code)]
    name: String,
    #[allow(dead_code)]
    size: u32,
    words: Vec<VocabularyEntry>,
}

/// Read-only vocabulary grouped by level
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    levels: BTreeMap<HskLevel, Vec<VocabularyEntry>>,
}

impl Vocabulary {
    /// Load every level compiled into the binary
    pub fn bundled() -> Result<Self> {
        let mut levels = BTreeMap::new();
        for level in HskLevel::ALL {
            levels.insert(level, read_level_from_file(&level.file_name())?);
        }
        Ok(Self { levels })
    }

    pub fn from_levels<I>(levels: I) -> Self
    where
        I: IntoIterator<Item = (HskLevel, Vec<VocabularyEntry>)>,
    {
        let levels = levels
            .into_iter()
            .map(|(level, mut words)| {
                words.iter_mut().for_each(VocabularyEntry::fill_breakdown);
                (level, words)
            })
            .collect();
        Self { levels }
    }

    pub fn words(&self, level: HskLevel) -> &[VocabularyEntry] {
        self.levels.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, level: HskLevel) -> usize {
        self.words(level).len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.values().all(Vec::is_empty)
    }

    pub fn find(&self, level: HskLevel, character: &str) -> Option<&VocabularyEntry> {
        self.words(level).iter().find(|w| w.character == character)
    }

    pub fn sizes(&self) -> BTreeMap<HskLevel, usize> {
        self.levels
            .iter()
            .map(|(level, words)| (*level, words.len()))
            .collect()
    }
}

fn read_level_from_file(file_name: &str) -> Result<Vec<VocabularyEntry>> {
    let file = VOCAB_DIR
        .get_file(file_name)
        .ok_or_else(|| Error::MissingVocabulary(file_name.to_string()))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| Error::MissingVocabulary(file_name.to_string()))?;

    let mut parsed: LevelFile =
        serde_json::from_str(contents).map_err(|source| Error::Vocabulary {
            file: file_name.to_string(),
            source,
        })?;
    parsed
        .words
        .iter_mut()
        .for_each(VocabularyEntry::fill_breakdown);

    Ok(parsed.words)
}
