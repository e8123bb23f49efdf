use super::methods::RetroMethod;

/// Printable worksheet for a method: numbered questions with room to
/// write, and a date/duration footer.
pub fn render_sheet(method: &RetroMethod) -> String {
    let mut out = format!("[{} Retrospective Sheet]\n\n", method.name);
    for (i, question) in method.questions.iter().enumerate() {
        out.push_str(&format!("{}. {question}\n\n\n", i + 1));
    }
    out.push_str("---\nDate:     /   /     Time spent: about    min");
    out
}
