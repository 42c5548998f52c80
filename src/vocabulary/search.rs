use super::core::VocabularyEntry;

/// Fold a tone-marked pinyin vowel onto its plain ASCII letter
fn fold_tone(c: char) -> char {
    match c {
        'ā' | 'á' | 'ǎ' | 'à' => 'a',
        'ē' | 'é' | 'ě' | 'è' => 'e',
        'ī' | 'í' | 'ǐ' | 'ì' => 'i',
        'ō' | 'ó' | 'ǒ' | 'ò' => 'o',
        'ū' | 'ú' | 'ǔ' | 'ù' => 'u',
        'ǖ' | 'ǘ' | 'ǚ' | 'ǜ' | 'ü' => 'v',
        other => other,
    }
}

/// Lowercase, drop tone marks, and remove spacing/apostrophes/hyphens so that
/// "nü'er", "Nǚ'ér" and "nver" all compare equal.
pub fn normalize_pinyin(pinyin: &str) -> String {
    pinyin
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_tone)
        .filter(|c| !matches!(c, ' ' | '\'' | '-' | '’'))
        .collect()
}

/// Whether an entry matches a free-text query on any of its three fields
pub fn matches_query(entry: &VocabularyEntry, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    if entry.character.contains(query) {
        return true;
    }

    let lowered = query.to_lowercase();
    if entry.meaning.to_lowercase().contains(&lowered) {
        return true;
    }

    let folded = normalize_pinyin(query);
    !folded.is_empty() && normalize_pinyin(&entry.pinyin).contains(&folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pinyin() {
        assert_eq!(normalize_pinyin("Běijīng"), "beijing");
        assert_eq!(normalize_pinyin("nǚ'ér"), "nver");
        assert_eq!(normalize_pinyin("dǎ diànhuà"), "dadianhua");
        assert_eq!(normalize_pinyin("dì-yī"), "diyi");
    }

    #[test]
    fn test_matches_character_meaning_and_pinyin() {
        let entry = VocabularyEntry::new("北京", "Běijīng", "Beijing");
        assert!(matches_query(&entry, "北"));
        assert!(matches_query(&entry, "beij"));
        assert!(matches_query(&entry, "BEIJING"));
        assert!(matches_query(&entry, "běi"));
        assert!(!matches_query(&entry, "shanghai"));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let entry = VocabularyEntry::new("猫", "māo", "cat");
        assert!(matches_query(&entry, ""));
        assert!(matches_query(&entry, "   "));
    }
}
