//! Ordre naturel : les suites de chiffres se comparent par valeur numérique.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());

        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits {
            Chunk::Digits(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    // Même nombre de chiffres significatifs : l'ordre lexical est l'ordre numérique
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Compare deux noms selon l'ordre naturel.
///
/// Le texte est comparé sans tenir compte de la casse, les nombres par valeur
/// (zéros de tête ignorés, longueur arbitraire). À position égale, un nombre
/// passe avant du texte. Deux noms équivalents sont départagés par l'ordre
/// des octets, ce qui rend l'ordre total.
///
/// ```
/// use lcarchive::natural_cmp;
///
/// let mut names = vec!["page10.jpg", "page2.jpg", "page1.jpg"];
/// names.sort_by(|a, b| natural_cmp(a, b));
/// assert_eq!(names, ["page1.jpg", "page2.jpg", "page10.jpg"]);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks { rest: a };
    let mut right = Chunks { rest: b };

    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Digits(x)), Some(Chunk::Digits(y))) => compare_digits(x, y),
            (Some(Chunk::Text(x)), Some(Chunk::Text(y))) => compare_text(x, y),
            (Some(Chunk::Digits(_)), Some(Chunk::Text(_))) => Ordering::Less,
            (Some(Chunk::Text(_)), Some(Chunk::Digits(_))) => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a.cmp(b)
}
