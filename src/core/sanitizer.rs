use regex::Regex;
use std::sync::LazyLock;

/// Shorter input (after trimming) is treated as "insufficient information".
pub const MIN_INPUT_CHARS: usize = 5;
/// Input is cut to this many characters before any other processing.
pub const MAX_INPUT_CHARS: usize = 5_000;

/// Phrases removed from user text before classification. Matched case-insensitively
/// as plain substrings, in this order.
pub const INJECTION_PATTERNS: &[&str] = &[
    "ignore previous instructions",
    "ignore all previous",
    "disregard",
    "forget everything",
    "new instructions",
    "system:",
    "assistant:",
    "<|im_start|>",
    "<|im_end|>",
];

/// Sequences that could break the structure of the model prompt.
pub const PROMPT_DELIMITERS: &[&str] = &["```", "###"];

static INJECTION_REGEXES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    INJECTION_PATTERNS
        .iter()
        .map(|pattern| {
            let re = Regex::new(&format!("(?i){}", regex::escape(pattern)))
                .expect("escaped literal is a valid regex");
            (*pattern, re)
        })
        .collect()
});

/// 輸入是否足以進行分類 (去除前後空白後至少 `min_chars` 個字元)
pub fn is_sufficient(text: &str, min_chars: usize) -> bool {
    text.trim().chars().count() >= min_chars
}

/// Sanitize user text with the default length limit.
pub fn sanitize(text: &str) -> String {
    sanitize_with_limit(text, MAX_INPUT_CHARS)
}

/// Truncate, strip invisible/control characters, redact injection phrases, trim.
///
/// Never fails; the result may be empty when everything was redacted.
pub fn sanitize_with_limit(text: &str, max_chars: usize) -> String {
    let truncated = truncate_chars(text, max_chars);
    if truncated.len() < text.len() {
        tracing::debug!(
            "✂️ Input truncated to {} characters (was {})",
            max_chars,
            text.chars().count()
        );
    }

    let visible = remove_invisible_characters(truncated);
    let redacted = redact_injection_patterns(&visible);

    redacted.trim().to_string()
}

/// Remove prompt-structure sequences before the text is embedded in a model prompt.
pub fn strip_prompt_delimiters(text: &str) -> String {
    PROMPT_DELIMITERS
        .iter()
        .fold(text.to_string(), |acc, delimiter| acc.replace(delimiter, ""))
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Repeats full passes over the denylist until nothing matches, since a removal
/// can join the surrounding text into another denylisted phrase.
fn redact_injection_patterns(text: &str) -> String {
    let mut result = text.to_string();
    loop {
        let before = result.len();
        for (pattern, re) in INJECTION_REGEXES.iter() {
            if re.is_match(&result) {
                // 記錄可能的攻擊
                tracing::warn!("🛡️ Potential prompt injection detected: {}", pattern);
                result = re.replace_all(&result, "").into_owned();
            }
        }
        // 每次移除都會縮短字串，長度不變即代表已無相符片段
        if result.len() == before {
            return result;
        }
    }
}

/// Zero-width and directional formatting characters, plus control characters
/// other than newline and tab.
fn remove_invisible_characters(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(
                *c,
                '\u{200B}'..='\u{200F}'
                    | '\u{202A}'..='\u{202E}'
                    | '\u{2060}'..='\u{2064}'
                    | '\u{2066}'..='\u{2069}'
                    | '\u{FEFF}'
                    | '\u{00AD}'
            )
        })
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}
