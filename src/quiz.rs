//! The round loop vocabulary shared by the three games.
//!
//! A round moves `NotStarted -> AwaitingInput -> Answered* -> (reset)`.
//! Answers are token lists compared positionally against the canonical
//! form of the prompt, no partial credit.

/// Where the current round is in its life cycle.
/// Transitions are strictly forward, reset only by regenerating or
/// explicitly clearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundState {
    #[default]
    NotStarted,
    AwaitingInput,
    AnsweredCorrect,
    AnsweredIncorrect,
}

impl RoundState {
    pub fn answered(&self) -> bool {
        matches!(self, Self::AnsweredCorrect | Self::AnsweredIncorrect)
    }
}

/// Running tally for the interval game. Process lifetime only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}

impl Score {
    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        self.correct += correct as u32;
    }
}

/// Outcome of comparing an answer against the prompt.
/// `mismatch` is the first index where the two sides differ (the shorter
/// length when one side runs out), so the view can highlight the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect { mismatch: usize },
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Exact positional comparison, case insensitive.
pub fn compare<E: AsRef<str>, G: AsRef<str>>(expected: &[E], given: &[G]) -> Verdict {
    for (i, token) in expected.iter().enumerate() {
        match given.get(i) {
            Some(answer) if token.as_ref().eq_ignore_ascii_case(answer.as_ref()) => {}
            _ => return Verdict::Incorrect { mismatch: i },
        }
    }

    if given.len() > expected.len() {
        return Verdict::Incorrect {
            mismatch: expected.len(),
        };
    }

    Verdict::Correct
}

/// Split a free text answer into comparison tokens: uppercase, commas
/// become spaces, empty tokens are dropped.
pub fn parse_answer(text: &str) -> Vec<String> {
    text.to_uppercase()
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Discrete selection collector with a hard length cap.
#[derive(Debug, Clone)]
pub struct AnswerPad {
    tokens: Vec<String>,
    limit: usize,
}

impl Default for AnswerPad {
    /// An empty pad that accepts nothing. Real limits come from the
    /// prompt length at round start.
    fn default() -> Self {
        Self::new(0)
    }
}

impl AnswerPad {
    pub fn new(limit: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(limit),
            limit,
        }
    }

    /// Append a token. Returns false (and does nothing) once full.
    pub fn push(&mut self, token: impl Into<String>) -> bool {
        if self.tokens.len() >= self.limit {
            return false;
        }

        self.tokens.push(token.into());
        true
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tokens.len() == self.limit
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn get(&self, i: usize) -> Option<&str> {
        self.tokens.get(i).map(String::as_str)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::theory::Pitch;

    fn canonical(notes: &[&str]) -> Vec<&'static str> {
        notes
            .iter()
            .map(|x| Pitch::parse(x).unwrap().solfege())
            .collect()
    }

    #[test]
    fn test_compare_reflexive() {
        let solfege = canonical(&["C4", "E4", "G4", "C5"]);
        assert_eq!(compare(&solfege, &solfege), Verdict::Correct);
    }

    #[test]
    fn test_compare_case_insensitive() {
        assert_eq!(
            compare(&["Do", "Mi", "Sol", "Do"], &["DO", "MI", "SOL", "DO"]),
            Verdict::Correct
        );
    }

    #[test]
    fn test_compare_length_mismatch() {
        let expected = ["Do", "Mi", "Sol", "Do"];
        assert_eq!(
            compare(&expected, &["Do", "Mi", "Sol"]),
            Verdict::Incorrect { mismatch: 3 }
        );
        assert_eq!(
            compare(&expected, &["Do", "Mi", "Sol", "Do", "Re"]),
            Verdict::Incorrect { mismatch: 4 }
        );
        assert_eq!(
            compare(&expected, &[] as &[&str]),
            Verdict::Incorrect { mismatch: 0 }
        );
    }

    #[test]
    fn test_compare_one_position_off() {
        let expected = ["Do", "Mi", "Sol", "Do"];
        for i in 0..expected.len() {
            let mut given = expected.to_vec();
            given[i] = "Re";
            assert_eq!(compare(&expected, &given), Verdict::Incorrect { mismatch: i });
        }
    }

    #[test]
    fn test_free_text_scenario() {
        // "do, mi sol do" against C4 E4 G4 C5
        let solfege = canonical(&["C4", "E4", "G4", "C5"]);
        let answer = parse_answer("do, mi sol do");
        assert_eq!(answer, ["DO", "MI", "SOL", "DO"]);
        assert_eq!(compare(&solfege, &answer), Verdict::Correct);
    }

    #[test]
    fn test_free_text_scenario_incorrect() {
        let solfege = canonical(&["C4", "E4", "G4", "C5"]);
        let answer = parse_answer("do re sol do");
        assert_eq!(compare(&solfege, &answer), Verdict::Incorrect { mismatch: 1 });
        assert_eq!(solfege.join(" "), "Do Mi Sol Do");
    }

    #[test]
    fn test_parse_answer_drops_empty_tokens() {
        assert_eq!(parse_answer("  do ,, re   mi , "), ["DO", "RE", "MI"]);
        assert!(parse_answer(" , , ").is_empty());
    }

    #[test]
    fn test_pad_never_exceeds_limit() {
        let mut pad = AnswerPad::new(4);
        for i in 0..1000 {
            let accepted = pad.push("C4");
            assert_eq!(accepted, i < 4);
            assert!(pad.len() <= 4);
        }
        assert!(pad.is_full());

        pad.clear();
        assert!(pad.is_empty());
        assert!(pad.push("D4"));
    }

    #[test]
    fn test_score() {
        let mut score = Score::default();
        score.record(true);
        score.record(false);
        assert_eq!(score.correct, 1);
        assert_eq!(score.total, 2);
    }

    #[test]
    fn test_round_state() {
        assert!(!RoundState::NotStarted.answered());
        assert!(!RoundState::AwaitingInput.answered());
        assert!(RoundState::AnsweredCorrect.answered());
        assert!(RoundState::AnsweredIncorrect.answered());
    }
}
