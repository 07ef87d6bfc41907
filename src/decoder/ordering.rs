use crate::types::LedgerEvent;

/// Moves the event at `second` so that it directly follows the event at
/// `first`, keeping every other event in its relative order.
///
/// The pair lands where the earlier of the two used to be. The
/// `sequence_index` values of the span between the two original positions are
/// then handed out again in ascending list order, so sorting by index
/// reproduces the new order. Returns the final `(first, second)` positions.
pub fn place_adjacent(
    events: &mut Vec<LedgerEvent>,
    first: usize,
    second: usize,
) -> (usize, usize) {
    if first == second || first >= events.len() || second >= events.len() {
        return (first, second);
    }

    let low = first.min(second);
    let high = first.max(second);
    if second != first + 1 {
        let (lead, follower) = if first > second {
            let lead = events.remove(first);
            let follower = events.remove(second);
            (lead, follower)
        } else {
            let follower = events.remove(second);
            let lead = events.remove(first);
            (lead, follower)
        };
        events.insert(low, follower);
        events.insert(low, lead);
    }

    let span = &mut events[low..=high];
    let mut indices: Vec<u32> = span.iter().map(|e| e.sequence_index).collect();
    indices.sort_unstable();
    for (event, index) in span.iter_mut().zip(indices) {
        event.sequence_index = index;
    }
    (low, low + 1)
}
