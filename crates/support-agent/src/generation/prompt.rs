//! Prompt templates for responders, the verifier and the controller

use crate::orchestration::OrchestrationState;
use crate::responders::ResponderInfo;
use crate::types::RankedSnippet;

/// Fixed answer the FAQ responder gives when the data has no answer
pub const NO_INFORMATION_ANSWER: &str = "I'm sorry, I don't have that information.";

/// Answer used when the step budget runs out with nothing usable
pub const ESCALATION_MESSAGE: &str = "I wasn't able to find a complete answer to your question. \
I've passed it on to a customer support specialist who will follow up with you.";

/// Question the heuristic policy asks once every responder has been tried
pub const CLARIFICATION_REQUEST: &str = "Could you share a few more details about what you need help with? \
If this is about an order, please include your order number.";

/// Persona for the small-talk responder
pub const SMALL_TALK_SYSTEM: &str = "You are a friendly, concise customer support greeter. \
Respond in one or two sentences maximum. \
Be warm, helpful, and professional. \
If the user asks for support beyond greetings, invite them to share details.";

/// System prompt for the FAQ responder
pub const FAQ_SYSTEM: &str = "You are a customer support assistant. Answer ONLY using the provided DATA. \
If the DATA does not contain the answer, say you don't have enough information. \
Be concise and actionable.";

/// System prompt for the verifier
pub const VERIFIER_SYSTEM: &str = r#"You are a strict verifier. Decide whether the candidate answer correctly and fully answers the user's question.
Respond with a single JSON object and nothing else.
If YES: {"decision": "finalize", "answer": "<the candidate answer as is>"}
If NO: {"decision": "continue", "reason": "<one sentence on what is missing or unclear>"}"#;

/// System prompt for the controller
pub const CONTROLLER_SYSTEM: &str = r#"You are a tool-using customer support agent that decides the next action for ONE user message.
Protocol:
1) If no candidate answer exists yet, invoke exactly ONE responder (for example the small talk responder for greetings, the FAQ responder for policy questions).
2) If the latest candidate answer fully addresses the user's question, finalize with that answer.
3) If the candidate is incomplete, unclear or irrelevant, invoke the responder most likely to improve it, or ask the user for clarification if that is absolutely required.
4) If the question is beyond your capabilities, ask the user for input so a support employee can take over.
Rules:
- NEVER invent extra user messages or simulate a conversation with yourself.
- Keep responder calls minimal; finalize as soon as you have a solid answer.
- Prefer short, clear, helpful answers.
Respond with a single JSON object and nothing else, in one of these forms:
{"action": "invoke", "responder": "<responder name>", "input": "<text to send to the responder>"}
{"action": "finalize", "answer": "<final answer for the user>"}
{"action": "ask_user", "question": "<clarifying question for the user>"}"#;

/// Prompt builder for every backend call site
pub struct PromptBuilder;

impl PromptBuilder {
    /// Label snippets by 1-based position in the selection
    pub fn build_faq_context(snippets: &[RankedSnippet<'_>]) -> String {
        snippets
            .iter()
            .enumerate()
            .map(|(i, s)| format!("[Snippet {}]\n{}", i + 1, s.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// User payload for the FAQ responder
    pub fn build_faq_prompt(question: &str, context: &str) -> String {
        format!(
            "DATA:\n{context}\n\n\
             QUESTION:\n{question}\n\n\
             INSTRUCTIONS:\n\
             - Answer ONLY using DATA.\n\
             - If not in DATA, say: '{no_info}'\n\
             - Keep it concise (2-5 sentences).",
            context = context,
            question = question,
            no_info = NO_INFORMATION_ANSWER,
        )
    }

    /// User payload for the verifier
    pub fn build_verify_prompt(question: &str, candidate_answer: &str) -> String {
        format!(
            "QUESTION:\n{}\n\nCANDIDATE_ANSWER:\n{}\n\n\
             Does CANDIDATE_ANSWER fully answer QUESTION?",
            question, candidate_answer
        )
    }

    /// User payload for the controller: responders, history and budget
    pub fn build_controller_prompt(
        state: &OrchestrationState,
        catalog: &[ResponderInfo],
        max_steps: usize,
    ) -> String {
        let responders = catalog
            .iter()
            .map(|r| format!("- {}: {}", r.name, r.description))
            .collect::<Vec<_>>()
            .join("\n");

        let history = if state.attempts().is_empty() {
            "(none yet)".to_string()
        } else {
            state
                .attempts()
                .iter()
                .map(|a| {
                    let verdict = match &a.rejection {
                        Some(reason) => format!("REJECTED by verifier: {}", reason),
                        None => "not rejected".to_string(),
                    };
                    format!(
                        "Step {} - responder `{}` with input \"{}\"\n\
                         CANDIDATE_ANSWER: {}\nVERDICT: {}",
                        a.step, a.responder, a.input, a.answer, verdict
                    )
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        };

        format!(
            "USER_MESSAGE:\n{query}\n\n\
             AVAILABLE_RESPONDERS:\n{responders}\n\n\
             PREVIOUS_STEPS:\n{history}\n\n\
             REMAINING_RESPONDER_CALLS: {remaining}\n\n\
             Choose the next action.",
            query = state.query(),
            responders = responders,
            history = history,
            remaining = max_steps.saturating_sub(state.step()),
        )
    }

    /// Whether an answer is a "no information" reply rather than content
    pub fn is_no_information(answer: &str) -> bool {
        let normalized = answer.replace(['\u{2019}', '\u{2018}'], "'").to_lowercase();
        [
            "don't have that information",
            "don't have enough information",
            "do not have that information",
            "do not have enough information",
            "not available in the provided",
        ]
        .iter()
        .any(|phrase| normalized.contains(phrase))
    }
}
