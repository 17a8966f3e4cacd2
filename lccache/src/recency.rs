use std::collections::HashMap;
use std::hash::Hash;
use std::time::SystemTime;

#[derive(Debug, Clone)]
struct Record<V> {
    value: V,
    stamp: u64,
    accessed_at: SystemTime,
}

/// Table clé → valeur ordonnée par date de dernier accès.
///
/// Chaque insertion ou accès tire un nouveau tampon d'une horloge logique
/// croissante ; l'éviction trie tous les enregistrements par tampon.
#[derive(Debug)]
pub struct RecencyIndex<K, V> {
    records: HashMap<K, Record<V>>,
    clock: u64,
    capacity: usize,
}

impl<K, V> RecencyIndex<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            records: HashMap::new(),
            clock: 0,
            capacity,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.records.contains_key(key)
    }

    /// Lit sans rafraîchir la date d'accès
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.records.get(key).map(|r| &r.value)
    }

    /// Lit en rafraîchissant la date d'accès
    pub fn touch(&mut self, key: &K) -> Option<&V> {
        let stamp = self.tick();
        let record = self.records.get_mut(key)?;
        record.stamp = stamp;
        record.accessed_at = SystemTime::now();
        Some(&record.value)
    }

    /// Insère ou remplace ; l'entrée devient la plus récente
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.insert_at(key, value, SystemTime::now())
    }

    /// Insère avec une date d'accès murale donnée (reprise de fichiers existants)
    pub fn insert_at(&mut self, key: K, value: V, accessed_at: SystemTime) -> Option<V> {
        let stamp = self.tick();
        self.records
            .insert(
                key,
                Record {
                    value,
                    stamp,
                    accessed_at,
                },
            )
            .map(|old| old.value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.records.remove(key).map(|r| r.value)
    }

    pub fn accessed_at(&self, key: &K) -> Option<SystemTime> {
        self.records.get(key).map(|r| r.accessed_at)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.records.values().map(|r| &r.value)
    }

    /// Retire les enregistrements les plus anciens au-delà de la capacité.
    ///
    /// Retourne les paires retirées, de la plus ancienne à la plus récente.
    pub fn evict_overflow(&mut self) -> Vec<(K, V)> {
        if self.records.len() <= self.capacity {
            return Vec::new();
        }
        let excess = self.records.len() - self.capacity;

        let mut by_age: Vec<(u64, K)> = self
            .records
            .iter()
            .map(|(k, r)| (r.stamp, k.clone()))
            .collect();
        by_age.sort_unstable_by_key(|(stamp, _)| *stamp);

        by_age
            .into_iter()
            .take(excess)
            .filter_map(|(_, key)| {
                let record = self.records.remove(&key)?;
                Some((key, record.value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_first() {
        let mut index = RecencyIndex::new(2);
        index.insert("a", 1);
        index.insert("b", 2);
        index.insert("c", 3);

        let evicted = index.evict_overflow();
        assert_eq!(evicted, vec![("a", 1)]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_touch_protects_from_eviction() {
        let mut index = RecencyIndex::new(2);
        index.insert("a", 1);
        index.insert("b", 2);
        assert_eq!(index.touch(&"a"), Some(&1));
        index.insert("c", 3);

        let evicted = index.evict_overflow();
        assert_eq!(evicted, vec![("b", 2)]);
        assert!(index.contains(&"a"));
        assert!(index.contains(&"c"));
    }

    #[test]
    fn test_peek_does_not_refresh() {
        let mut index = RecencyIndex::new(1);
        index.insert("a", 1);
        index.insert("b", 2);
        // "a" reste le plus ancien malgré la consultation
        assert_eq!(index.peek(&"a"), Some(&1));
        assert_eq!(index.evict_overflow(), vec![("a", 1)]);
    }

    #[test]
    fn test_reinsert_refreshes_and_replaces() {
        let mut index = RecencyIndex::new(2);
        index.insert("a", 1);
        index.insert("b", 2);
        assert_eq!(index.insert("a", 10), Some(1));
        index.insert("c", 3);
        assert_eq!(index.evict_overflow(), vec![("b", 2)]);
        assert_eq!(index.peek(&"a"), Some(&10));
    }

    #[test]
    fn test_zero_capacity_evicts_everything() {
        let mut index = RecencyIndex::new(0);
        index.insert("a", 1);
        assert_eq!(index.evict_overflow().len(), 1);
        assert!(index.is_empty());
    }
}
