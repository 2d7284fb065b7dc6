/// Strip markdown artifacts from raw model output.
///
/// Handles a leading/trailing fenced code block (the first line is dropped
/// when it opens a fence, the last line when it is a bare closing fence) and
/// a single pair of inline backticks wrapping the whole string. Anything
/// else is returned trimmed. Re-applying to already-clean input is a no-op.
pub fn clean_command(raw: &str) -> String {
    let mut command = raw.trim().to_string();

    if command.starts_with("```") {
        let mut lines: Vec<&str> = command.lines().collect();
        // Drop the opening fence line (```bash, ```sh, or bare ```)
        lines.remove(0);
        if let Some(last) = lines.last() {
            if last.trim() == "```" {
                lines.pop();
            }
        }
        command = lines.join("\n");
    }

    if command.starts_with('`') && command.ends_with('`') && command.len() >= 2 {
        command = command[1..command.len() - 1].to_string();
    }

    command.trim().to_string()
}
