/// Lay a reply out one sentence per paragraph for display and speech.
///
/// Splits on ". ", drops blank pieces, and makes sure each piece ends in a
/// period. Interpretation always runs on the raw reply, not on this.
pub fn format_reply(reply: &str) -> String {
    reply
        .split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.ends_with('.') {
                s.to_string()
            } else {
                format!("{}.", s)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
