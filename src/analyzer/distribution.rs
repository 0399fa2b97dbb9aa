use std::collections::HashMap;
use std::hash::Hash;

/// Counts occurrences of each key, listed in first-seen order.
pub fn tally<K, I>(items: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for key in items {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts
}

/// Key with the highest count; the earliest entry wins a tie.
pub fn mode<K: Clone>(counts: &[(K, usize)]) -> Option<K> {
    let mut best: Option<&(K, usize)> = None;
    for entry in counts {
        if best.is_none_or(|b| entry.1 > b.1) {
            best = Some(entry);
        }
    }
    best.map(|(key, _)| key.clone())
}
