//! Char-indexed string edits used to build proposed values.

fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

pub(crate) fn insert_at(text: &str, index: usize, ch: char) -> String {
    let offset = byte_offset(text, index);
    let mut proposed = String::with_capacity(text.len() + ch.len_utf8());
    proposed.push_str(&text[..offset]);
    proposed.push(ch);
    proposed.push_str(&text[offset..]);
    proposed
}

/// Remove the char at `index`, returning the new text and the removed char.
pub(crate) fn remove_at(text: &str, index: usize) -> Option<(String, char)> {
    let (offset, removed) = text.char_indices().nth(index)?;
    let mut proposed = String::with_capacity(text.len());
    proposed.push_str(&text[..offset]);
    proposed.push_str(&text[offset + removed.len_utf8()..]);
    Some((proposed, removed))
}
