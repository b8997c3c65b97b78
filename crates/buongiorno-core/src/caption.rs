//! Caption length enforcement.
//!
//! The Telegram Bot API rejects photo captions longer than 1024 characters,
//! where a character is a UTF-16 code unit: an astral-plane emoji counts as
//! two. Cuts always fall on a `char` boundary, so a surrogate pair is never
//! split and the result stays valid UTF-8.

/// Telegram's caption limit, in UTF-16 code units.
pub const MAX_CAPTION_LENGTH: usize = 1024;

/// Marker appended to a truncated caption.
pub const ELLIPSIS: &str = "...";

/// Caption length as Telegram measures it.
pub fn caption_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Truncate `text` to the default Telegram caption limit.
pub fn truncate_caption(text: &str) -> String {
    truncate(text, MAX_CAPTION_LENGTH)
}

/// Truncate `text` to at most `max_length` UTF-16 code units.
///
/// Text that already fits is returned unchanged. Longer text keeps the
/// longest prefix that fits in `max_length - 3` units, followed by `"..."`.
/// The result is exactly `max_length` units long unless a two-unit `char`
/// straddles the cut, in which case it is one unit shorter. `max_length` is
/// expected to exceed the marker length (config validation guarantees it);
/// smaller limits return a prefix without the marker.
pub fn truncate(text: &str, max_length: usize) -> String {
    if caption_len(text) <= max_length {
        return text.to_string();
    }

    let marker_len = caption_len(ELLIPSIS);
    if max_length <= marker_len {
        return text[..prefix_end(text, max_length)].to_string();
    }

    let cut = prefix_end(text, max_length - marker_len);
    let mut truncated = String::with_capacity(cut + ELLIPSIS.len());
    truncated.push_str(&text[..cut]);
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Byte index ending the longest prefix of `text` within `budget` UTF-16 units.
fn prefix_end(text: &str, budget: usize) -> usize {
    let mut used = 0;
    for (idx, c) in text.char_indices() {
        used += c.len_utf16();
        if used > budget {
            return idx;
        }
    }
    text.len()
}
