use std::path::{Path, PathBuf};

use lcarchive::EntryName;
use lccache::PageListCache;

fn pages(names: &[&str]) -> Vec<EntryName> {
    names
        .iter()
        .map(|n| EntryName::from_raw(n.as_bytes().to_vec()))
        .collect()
}

#[test]
fn test_put_then_get() {
    let cache = PageListCache::new(4);
    let path = PathBuf::from("/srv/a.cbz");
    cache.put(path.clone(), pages(&["1.jpg", "2.jpg"]));

    let cached = cache.get(&path).unwrap();
    assert_eq!(cached.len(), 2);
    assert_eq!(cached[0].display, "1.jpg");
}

#[test]
fn test_miss() {
    let cache = PageListCache::new(4);
    assert!(cache.get(Path::new("/nope.cbz")).is_none());
}

#[test]
fn test_eviction_keeps_most_recently_accessed() {
    let cache = PageListCache::new(2);
    cache.put(PathBuf::from("/a.cbz"), pages(&["a.jpg"]));
    cache.put(PathBuf::from("/b.cbz"), pages(&["b.jpg"]));
    assert!(cache.get(Path::new("/a.cbz")).is_some());
    cache.put(PathBuf::from("/c.cbz"), pages(&["c.jpg"]));

    assert_eq!(cache.len(), 2);
    assert!(cache.contains(Path::new("/a.cbz")));
    assert!(!cache.contains(Path::new("/b.cbz")));
    assert!(cache.contains(Path::new("/c.cbz")));
}

#[test]
fn test_ties_broken_by_insertion_order() {
    let cache = PageListCache::new(3);
    for i in 0..6 {
        cache.put(PathBuf::from(format!("/{}.cbz", i)), pages(&["p.jpg"]));
    }
    let kept: Vec<bool> = (0..6)
        .map(|i| cache.contains(Path::new(&format!("/{}.cbz", i))))
        .collect();
    assert_eq!(kept, vec![false, false, false, true, true, true]);
}

#[test]
fn test_get_or_load_calls_loader_once() {
    let cache = PageListCache::new(4);
    let path = Path::new("/srv/book.cbz");
    let mut calls = 0;

    for _ in 0..3 {
        let list = cache
            .get_or_load(path, |_| {
                calls += 1;
                Ok::<_, String>(pages(&["001.jpg"]))
            })
            .unwrap();
        assert_eq!(list.len(), 1);
    }
    assert_eq!(calls, 1);
}

#[test]
fn test_get_or_load_error_is_not_cached() {
    let cache = PageListCache::new(4);
    let path = Path::new("/srv/broken.cbz");

    let result = cache.get_or_load(path, |_| Err::<Vec<EntryName>, _>("corrupt"));
    assert_eq!(result.unwrap_err(), "corrupt");
    assert!(!cache.contains(path));
}

#[test]
fn test_stats() {
    let cache = PageListCache::new(8);
    cache.put(PathBuf::from("/a.cbz"), pages(&[]));
    let stats = cache.stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.capacity, 8);
    assert_eq!(stats.total_bytes, None);
}
