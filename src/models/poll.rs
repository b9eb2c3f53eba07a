use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    pub votes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub question: String,
    pub options: Vec<PollOption>,
}

impl Poll {
    /// The standalone poll shown in the sidebar.
    pub fn sidebar() -> Self {
        let option = |text: &str, votes| PollOption {
            text: text.to_string(),
            votes,
        };
        Self {
            question: "Which tech trend are you most excited about?".to_string(),
            options: vec![
                option("AI Assistants", 42),
                option("Quantum Computing", 18),
                option("AR/VR Metaverse", 25),
                option("Decentralized Web", 15),
            ],
        }
    }

    pub fn total_votes(&self) -> u32 {
        self.options.iter().map(|o| o.votes).sum()
    }
}

/// Rounded share of `votes` in `total`; 0 when nobody has voted.
pub fn percentage(votes: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(votes) / f64::from(total) * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResult {
    pub text: String,
    pub votes: u32,
    pub percentage: u32,
    pub chosen: bool,
}

/// A poll plus the locally persisted choice for it.
#[derive(Debug, Clone)]
pub struct PollState {
    key: String,
    poll: Poll,
    voted: Option<String>,
}

impl PollState {
    pub fn new(key: impl Into<String>, poll: Poll, voted: Option<String>) -> Self {
        Self {
            key: key.into(),
            poll,
            voted,
        }
    }

    /// Store key holding the chosen option for an article's poll.
    pub fn store_key(poll_id: &str) -> String {
        format!("poll-vote-{}", poll_id)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn poll(&self) -> &Poll {
        &self.poll
    }

    pub fn voted(&self) -> Option<&str> {
        self.voted.as_deref()
    }

    pub fn has_voted(&self) -> bool {
        self.voted.is_some()
    }

    /// Record a vote. Returns false, leaving the counts alone, if a vote was
    /// already cast or the option does not exist.
    pub fn vote(&mut self, option_text: &str) -> bool {
        if self.voted.is_some() {
            return false;
        }
        let Some(option) = self.poll.options.iter_mut().find(|o| o.text == option_text) else {
            tracing::debug!("Ignoring vote for unknown option {:?}", option_text);
            return false;
        };
        option.votes += 1;
        self.voted = Some(option_text.to_string());
        true
    }

    /// Vote by position, as the UI's number keys do.
    pub fn vote_index(&mut self, index: usize) -> bool {
        match self.poll.options.get(index).map(|o| o.text.clone()) {
            Some(text) => self.vote(&text),
            None => false,
        }
    }

    pub fn results(&self) -> Vec<PollResult> {
        let total = self.poll.total_votes();
        self.poll
            .options
            .iter()
            .map(|o| PollResult {
                text: o.text.clone(),
                votes: o.votes,
                percentage: percentage(o.votes, total),
                chosen: self.voted.as_deref() == Some(o.text.as_str()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_option_poll() -> Poll {
        Poll {
            question: "X or Y?".to_string(),
            options: vec![
                PollOption {
                    text: "X".to_string(),
                    votes: 0,
                },
                PollOption {
                    text: "Y".to_string(),
                    votes: 0,
                },
            ],
        }
    }

    fn summary(state: &PollState) -> Vec<(String, u32, u32)> {
        state
            .results()
            .into_iter()
            .map(|r| (r.text, r.votes, r.percentage))
            .collect()
    }

    #[test]
    fn test_first_vote_counts_once() {
        let mut state = PollState::new("poll-vote-1", two_option_poll(), None);

        assert!(state.vote("X"));

        assert_eq!(
            summary(&state),
            vec![("X".to_string(), 1, 100), ("Y".to_string(), 0, 0)]
        );
        assert_eq!(state.voted(), Some("X"));
    }

    #[test]
    fn test_second_vote_is_noop() {
        let mut state = PollState::new("poll-vote-1", two_option_poll(), None);
        state.vote("X");

        assert!(!state.vote("Y"));
        assert!(!state.vote("X"));

        assert_eq!(
            summary(&state),
            vec![("X".to_string(), 1, 100), ("Y".to_string(), 0, 0)]
        );
    }

    #[test]
    fn test_previously_persisted_vote_freezes_poll() {
        let mut state = PollState::new("poll-vote-1", two_option_poll(), Some("Y".to_string()));

        assert!(state.has_voted());
        assert!(!state.vote("X"));
        assert_eq!(state.poll().total_votes(), 0);
        assert!(state.results()[1].chosen);
    }

    #[test]
    fn test_unknown_option_is_ignored() {
        let mut state = PollState::new("poll-vote-1", two_option_poll(), None);

        assert!(!state.vote("Z"));
        assert!(!state.vote_index(5));
        assert!(!state.has_voted());
    }

    #[test]
    fn test_vote_index() {
        let mut state = PollState::new("poll-vote-1", two_option_poll(), None);
        assert!(state.vote_index(1));
        assert_eq!(state.voted(), Some("Y"));
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
    }

    #[test]
    fn test_sidebar_poll_totals() {
        let poll = Poll::sidebar();
        assert_eq!(poll.options.len(), 4);
        assert_eq!(poll.total_votes(), 100);
    }

    #[test]
    fn test_store_key() {
        assert_eq!(PollState::store_key("42"), "poll-vote-42");
    }
}
