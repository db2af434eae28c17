//! Word-aware line wrapping.

/// A wrapped line and whether it closes its paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub paragraph_end: bool,
}

/// Splits `text` on line breaks, then wraps every paragraph so that each
/// line measures at most `max_width` according to `measure`.
///
/// Words wider than `max_width` are broken between characters. A single
/// character wider than the limit still gets a line of its own.
pub fn wrap_paragraphs<F>(text: &str, max_width: f64, measure: F) -> Vec<WrappedLine>
where
    F: Fn(&str) -> f64,
{
    let mut out = Vec::new();
    for paragraph in paragraphs(text) {
        let lines = wrap_paragraph(paragraph, max_width, &measure);
        let last = lines.len() - 1;
        out.extend(lines.into_iter().enumerate().map(|(i, text)| WrappedLine {
            text,
            paragraph_end: i == last,
        }));
    }
    out
}

/// Same as [`wrap_paragraphs`] without the paragraph markers.
pub fn split_text_to_size<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    wrap_paragraphs(text, max_width, measure)
        .into_iter()
        .map(|line| line.text)
        .collect()
}

/// Splits on `\r\n`, `\r` and `\n`.
pub(crate) fn paragraphs(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                parts.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            b'\n' => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&text[start..]);
    parts
}

fn wrap_paragraph<F>(paragraph: &str, max_width: f64, measure: &F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in paragraph.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure(&candidate) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if measure(word) <= max_width {
            current = word.to_string();
            continue;
        }

        let mut chunk = String::new();
        for ch in word.chars() {
            let mut next = chunk.clone();
            next.push(ch);
            if !chunk.is_empty() && measure(&next) > max_width {
                lines.push(std::mem::replace(&mut chunk, ch.to_string()));
            } else {
                chunk = next;
            }
        }
        current = chunk;
    }

    lines.push(current);
    lines
}
