//! Small order statistics shared by the plugins.

/// Median position in a sorted slice of length `len`: the middle element for
/// odd lengths, the lower of the two middle elements for even lengths.
///
/// `len` must be non-zero.
pub fn median_index(len: usize) -> usize {
    if len % 2 == 0 {
        len / 2 - 1
    } else {
        len / 2
    }
}

/// Most frequent value, counted in iteration order. The leader only changes
/// when a running count strictly exceeds the best count so far, so on equal
/// final counts the value that reached that count first wins.
pub fn mode<T: PartialEq + Clone>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    let mut best: Option<(T, usize)> = None;
    for value in values {
        let count = match counts.iter_mut().find(|(v, _)| *v == value) {
            Some(entry) => {
                entry.1 += 1;
                entry.1
            }
            None => {
                counts.push((value.clone(), 1));
                1
            }
        };
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
