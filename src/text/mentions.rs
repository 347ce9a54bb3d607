use crate::model::Mention;

/// Re-insert `@handle` tokens into cast text at recorded offsets.
///
/// `fids` and `positions` are aligned by index; each fid is resolved
/// against the `mentions` table and the insertion is skipped when no entry
/// matches. Insertions are applied right-to-left so earlier offsets are
/// not shifted by later ones. An offset beyond the end of the text appends
/// at the end.
#[must_use]
pub fn insert_mentions(
    text: &str,
    fids: &[u64],
    positions: &[usize],
    mentions: &[Mention],
) -> String {
    if positions.is_empty() {
        return text.to_string();
    }

    let mut inserts: Vec<(usize, &str)> = positions
        .iter()
        .enumerate()
        .filter_map(|(i, &position)| {
            let fid = *fids.get(i)?;
            let mention = mentions.iter().find(|m| m.fid == fid)?;
            Some((position, mention.fname.as_str()))
        })
        .collect();
    inserts.sort_by(|a, b| b.0.cmp(&a.0));

    let mut out = text.to_string();
    for (position, fname) in inserts {
        let at = floor_char_boundary(&out, position.min(out.len()));
        out.insert_str(at, &format!("@{fname}"));
    }
    out
}

/// Round a byte offset down to the nearest char boundary.
fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
