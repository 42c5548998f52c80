//! Game-balance constants. Values are tuning knobs, not derived quantities.

/// XP needed for one level-up
pub const XP_PER_LEVEL: u32 = 100;

/// Flat reward for moving to the next flashcard, graded or not
pub const FLASHCARD_ADVANCE_XP: u32 = 1;
pub const FLASHCARD_ADVANCE_POINTS: u32 = 1;

/// One-time reward for the first transition of a word into `Known`
pub const KNOWN_BONUS_XP: u32 = 5;
pub const KNOWN_BONUS_POINTS: u32 = 5;

/// Marking a word as studied in the Learn view
pub const STUDY_XP: u32 = 2;
pub const STUDY_POINTS: u32 = 1;

/// Listening to a word's pronunciation
pub const LISTEN_XP: u32 = 1;

/// Awarded for answering a quiz question, right or wrong
pub const QUIZ_ANSWER_XP: u32 = 1;
pub const QUIZ_ANSWER_POINTS: u32 = 1;
/// Extra XP for a correct answer
pub const QUIZ_CORRECT_XP: u32 = 2;
/// Quiz score per correct answer
pub const QUIZ_CORRECT_SCORE: u32 = 10;
/// Points per question granted when a quiz finishes
pub const QUIZ_FINISH_POINTS_PER_QUESTION: u32 = 5;

/// XP bonus on quiz completion: `round(accuracy/100 * n * 3) + n * 2`
pub fn quiz_finish_xp(accuracy_percent: f64, question_count: u32) -> u32 {
    let scaled = (accuracy_percent / 100.0 * f64::from(question_count) * 3.0).round();
    scaled.max(0.0) as u32 + question_count * 2
}

/// Points on quiz completion: `n * 5`
pub fn quiz_finish_points(question_count: u32) -> u32 {
    question_count * QUIZ_FINISH_POINTS_PER_QUESTION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_finish_xp() {
        assert_eq!(quiz_finish_xp(100.0, 10), 50);
        assert_eq!(quiz_finish_xp(0.0, 10), 20);
        assert_eq!(quiz_finish_xp(50.0, 15), 53); // round(22.5) = 23
    }

    #[test]
    fn test_quiz_finish_points() {
        assert_eq!(quiz_finish_points(10), 50);
        assert_eq!(quiz_finish_points(30), 150);
    }
}
