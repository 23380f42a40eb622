//! Example commands offered when an utterance is not understood
//!
//! The raw (unnormalized) text is sniffed for keywords so the examples are
//! close to what the person was trying to say.

const DELETE_EXAMPLES: &[&str] =
    &["Delete my appointment", "Remove the task", "Cancel walking task"];
const DONE_EXAMPLES: &[&str] = &["Done with medicine", "Finished walking", "Mark task as done"];
const LIST_EXAMPLES: &[&str] = &["Show my tasks", "What do I have today?", "List all tasks"];
const TIME_EXAMPLES: &[&str] = &["What time is my appointment?", "When do I take medicine?"];
const GENERAL_EXAMPLES: &[&str] = &[
    "Remind me to walk at 3 PM",
    "Delete my meeting",
    "Mark medicine as done",
    "Show my tasks",
];

/// Pick example commands related to `utterance`
pub fn suggestions_for(utterance: &str) -> &'static [&'static str] {
    let lowered = utterance.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|word| lowered.contains(word));

    if mentions(&["delete", "remove", "cancel"]) {
        DELETE_EXAMPLES
    } else if mentions(&["done", "finished", "completed"]) {
        DONE_EXAMPLES
    } else if mentions(&["show", "list", "what", "tell"]) {
        LIST_EXAMPLES
    } else if mentions(&["time", "when", "schedule"]) {
        TIME_EXAMPLES
    } else {
        GENERAL_EXAMPLES
    }
}
