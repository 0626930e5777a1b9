// Clean caller-supplied text before it is embedded in a model prompt.
// Strips prompt-injection lines and invisible Unicode, normalizes whitespace.

/// Maximum characters of any single field sent to the model.
pub const MAX_FIELD_CHARS: usize = 20_000;

const TRUNCATION_MARKER: &str = "…[TRUNCATED]";

/// Sanitize one prompt field. `field` names the input in the audit log
/// (symptoms, history, ...); the content itself is never logged.
pub fn sanitize_for_prompt(raw: &str, field: &str) -> String {
    let visible = remove_invisible_chars(raw);
    let (kept, removed) = remove_injection_lines(&visible);

    if removed > 0 {
        tracing::warn!(
            field,
            removed_lines = removed,
            "Injection patterns removed from patient input"
        );
    }

    truncate_chars(&normalize_whitespace(&kept), MAX_FIELD_CHARS)
}

/// Zero-width, bidi and control characters. Ordinary whitespace survives.
fn remove_invisible_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            if matches!(*c, ' ' | '\n' | '\t' | '\r') {
                return true;
            }
            if matches!(
                *c,
                '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
            ) {
                return false;
            }
            !c.is_control()
        })
        .collect()
}

const ROLE_MARKERS: &[&str] = &[
    "system:",
    "assistant:",
    "[system]",
    "[assistant]",
    "[inst]",
    "[/inst]",
    "<<sys>>",
    "note to ai:",
    "instructions:",
    "system update:",
];

const OVERRIDE_PHRASES: &[&str] = &[
    "ignore previous instructions",
    "ignore all instructions",
    "ignore the above instructions",
    "disregard your instructions",
    "disregard all instructions",
    "forget your instructions",
    "forget all instructions",
    "new instructions:",
    "respond with the following",
];

const INSTRUCTION_TAGS: &[&str] = &["<instruction", "</instruction", "<system", "</system"];

// "Doctor:" and "Patient:" prefixes are legitimate in conversation logs, so
// "user:" style speaker labels are not treated as role markers here.
fn is_injection(lowered: &str) -> bool {
    ROLE_MARKERS.iter().any(|m| lowered.starts_with(m))
        || INSTRUCTION_TAGS.iter().any(|t| lowered.starts_with(t))
        || OVERRIDE_PHRASES.iter().any(|p| lowered.contains(p))
}

/// Drop injection lines, including an override phrase split over two lines.
/// Returns the kept text and the number of removed lines.
fn remove_injection_lines(text: &str) -> (String, usize) {
    let lines: Vec<&str> = text.lines().collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut removed = 0usize;
    let mut i = 0;

    while i < lines.len() {
        let current = lines[i].trim().to_lowercase();
        if is_injection(&current) {
            removed += 1;
            i += 1;
            continue;
        }

        if let Some(next) = lines.get(i + 1) {
            let next = next.trim().to_lowercase();
            if !is_injection(&next) && is_injection(&format!("{current} {next}")) {
                removed += 2;
                i += 2;
                continue;
            }
        }

        kept.push(lines[i]);
        i += 1;
    }

    (kept.join("\n"), removed)
}

/// Trim each line and collapse runs of blank lines to one.
fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last() == Some(&"") {
        lines.pop();
    }
    lines.join("\n")
}

/// Cut at a word boundary at or before `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };
    let head = &text[..cut];
    let head = match head.rfind(char::is_whitespace) {
        Some(pos) => &head[..pos],
        None => head,
    };
    format!("{head}{TRUNCATION_MARKER}")
}
