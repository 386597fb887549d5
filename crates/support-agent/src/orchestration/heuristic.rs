//! Deterministic keyword-cue policy

use async_trait::async_trait;

use crate::error::Result;
use crate::generation::prompt::CLARIFICATION_REQUEST;
use crate::responders::{faq, small_talk, ResponderInfo};

use super::policy::{Action, DecisionPolicy};
use super::state::OrchestrationState;

/// Greetings and pleasantries
pub const SMALL_TALK_TRIGGERS: &[&str] = &[
    "hi", "hello", "hey", "good morning", "good afternoon", "good evening",
    "how are you", "what's up", "sup", "salam", "assalam", "thanks", "thank you",
];

/// Topics the FAQ document covers
pub const FAQ_CUES: &[&str] = &[
    "refund", "return", "shipping", "delivery", "warranty", "replacement",
    "order status", "track", "payment", "billing", "price", "discount",
    "hours", "open", "close", "support", "policy", "policies", "exchange",
    "cancel", "cancellation", "international", "customs", "duty", "tax",
];

/// Routes by cue words without a controller call.
///
/// - an accepted, informative candidate is finalized;
/// - otherwise the first untried responder in the query's preferred order is
///   invoked (FAQ cues → FAQ; greetings without FAQ cues → small talk, then
///   FAQ; anything else → FAQ), followed by any other registered responders;
/// - once every candidate responder has been tried, the user is asked for
///   clarification.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Responder names to try for `query`, in order
    pub fn preferred_order(query: &str, catalog: &[ResponderInfo]) -> Vec<String> {
        let text = normalize(query);
        let has_faq_cue = FAQ_CUES.iter().any(|c| contains_cue(&text, c));
        let has_small_talk = SMALL_TALK_TRIGGERS.iter().any(|c| contains_cue(&text, c));

        let mut order: Vec<String> = if !has_faq_cue && has_small_talk {
            vec![small_talk::NAME.to_string(), faq::NAME.to_string()]
        } else {
            vec![faq::NAME.to_string()]
        };

        // Custom responders come after the built-in ones
        for info in catalog {
            if info.name != small_talk::NAME && info.name != faq::NAME {
                order.push(info.name.clone());
            }
        }

        order.retain(|name| catalog.iter().any(|r| &r.name == name));
        order
    }
}

/// Lowercase words separated by single spaces, padded with a space on each side
fn normalize(text: &str) -> String {
    let lower = text.to_lowercase().replace('\u{2019}', "'");
    let words: Vec<&str> = lower
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect();
    format!(" {} ", words.join(" "))
}

/// Whole-word (or whole-phrase) match; plural `s` is allowed on the last word
fn contains_cue(normalized: &str, cue: &str) -> bool {
    normalized.contains(&format!(" {} ", cue)) || normalized.contains(&format!(" {}s ", cue))
}

#[async_trait]
impl DecisionPolicy for HeuristicPolicy {
    async fn decide(
        &self,
        state: &OrchestrationState,
        catalog: &[ResponderInfo],
    ) -> Result<Action> {
        if let Some(last) = state.last_attempt() {
            if last.is_informative() && !last.is_rejected() {
                return Ok(Action::finalize(last.answer.clone()));
            }
        }

        let next = Self::preferred_order(state.query(), catalog)
            .into_iter()
            .find(|name| !state.has_tried(name));

        Ok(match next {
            Some(name) => Action::invoke(name, state.query()),
            None => Action::ask_user(CLARIFICATION_REQUEST),
        })
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::NO_INFORMATION_ANSWER;

    fn catalog() -> Vec<ResponderInfo> {
        vec![
            ResponderInfo::new(small_talk::NAME, "greetings"),
            ResponderInfo::new(faq::NAME, "policy questions"),
        ]
    }

    #[test]
    fn test_cue_matching_is_whole_word() {
        let text = normalize("This is about my Refunds, thanks!");
        assert!(contains_cue(&text, "refund"));
        assert!(contains_cue(&text, "thanks"));
        // "hi" must not match inside "this"
        assert!(!contains_cue(&text, "hi"));
        assert!(contains_cue(&normalize("What's up?"), "what's up"));
    }

    #[test]
    fn test_preferred_order() {
        let order = |query: &str| HeuristicPolicy::preferred_order(query, &catalog());
        assert_eq!(order("hi there"), vec!["small_talk", "faq"]);
        assert_eq!(order("hello, what is your refund policy?"), vec!["faq"]);
        assert_eq!(order("do you sell telescopes"), vec!["faq"]);

        let mut extended = catalog();
        extended.push(ResponderInfo::new("orders", "order lookups"));
        assert_eq!(
            HeuristicPolicy::preferred_order("where is my parcel", &extended),
            vec!["faq", "orders"]
        );
    }

    #[tokio::test]
    async fn test_greeting_goes_to_small_talk_then_finalizes() {
        let policy = HeuristicPolicy::new();
        let mut state = OrchestrationState::new("hi there");

        assert_eq!(
            policy.decide(&state, &catalog()).await.unwrap(),
            Action::invoke("small_talk", "hi there")
        );

        state.record_attempt("small_talk", "hi there", "Hello! How can I help today?");
        assert_eq!(
            policy.decide(&state, &catalog()).await.unwrap(),
            Action::finalize("Hello! How can I help today?")
        );
    }

    #[tokio::test]
    async fn test_no_information_leads_to_clarification() {
        let policy = HeuristicPolicy::new();
        let mut state = OrchestrationState::new("do you sell telescopes");
        state.record_attempt("faq", "do you sell telescopes", NO_INFORMATION_ANSWER);

        assert_eq!(
            policy.decide(&state, &catalog()).await.unwrap(),
            Action::ask_user(CLARIFICATION_REQUEST)
        );
    }

    #[tokio::test]
    async fn test_rejected_answer_moves_to_next_responder() {
        let policy = HeuristicPolicy::new();
        let mut state = OrchestrationState::new("hey");
        state.record_attempt("small_talk", "hey", "Hey!");
        state.reject_last("Not helpful.");

        assert_eq!(
            policy.decide(&state, &catalog()).await.unwrap(),
            Action::invoke("faq", "hey")
        );
    }
}
