//! Normalized insertion/deletion distance.
//!
//! The indel distance is the edit distance with substitutions disallowed: a
//! mismatched character costs one deletion plus one insertion. Normalizing
//! by the combined length gives a similarity in [0, 1]:
//!
//! ```text
//! NID = 1 - indel(R, P) / (|R| + |P|)
//! ```
//!
//! Lengths count Unicode scalar values.

/// Minimum number of single-character insertions and deletions turning
/// `prediction` into `reference`.
///
/// Runs the `(|R|+1) × (|P|+1)` dynamic program with two rolling rows sized
/// by the shorter string. A shared prefix and suffix cost nothing and are
/// trimmed before the table is filled.
pub fn indel_distance(reference: &str, prediction: &str) -> usize {
    let r: Vec<char> = reference.chars().collect();
    let p: Vec<char> = prediction.chars().collect();

    let prefix = r.iter().zip(&p).take_while(|(a, b)| a == b).count();
    let (r, p) = (&r[prefix..], &p[prefix..]);
    let suffix = r
        .iter()
        .rev()
        .zip(p.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let (r, p) = (&r[..r.len() - suffix], &p[..p.len() - suffix]);

    // The recurrence is symmetric, so iterate the longer string in the outer loop.
    let (outer, inner) = if r.len() >= p.len() { (r, p) } else { (p, r) };
    if inner.is_empty() {
        return outer.len();
    }

    let mut prev: Vec<usize> = (0..=inner.len()).collect();
    let mut curr = vec![0usize; inner.len() + 1];

    for (i, &oc) in outer.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &ic) in inner.iter().enumerate() {
            let diagonal = prev[j] + if oc == ic { 0 } else { 2 };
            let delete = prev[j + 1] + 1;
            let insert = curr[j] + 1;
            curr[j + 1] = diagonal.min(delete).min(insert);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[inner.len()]
}

/// Normalized indel similarity between a reference and a prediction string.
///
/// Two empty strings are a perfect trivial match and score 1.
pub fn nid(reference: &str, prediction: &str) -> f64 {
    let total = reference.chars().count() + prediction.chars().count();
    if total == 0 {
        return 1.0;
    }
    let distance = indel_distance(reference, prediction);
    (1.0 - distance as f64 / total as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical() {
        assert_eq!(nid("reading order", "reading order"), 1.0);
        assert_eq!(indel_distance("abc", "abc"), 0);
    }

    #[test]
    fn test_empty() {
        assert_eq!(nid("", ""), 1.0);
        assert_eq!(nid("abc", ""), 0.0);
        assert_eq!(nid("", "abc"), 0.0);
    }

    #[test]
    fn test_single_mismatch_costs_two() {
        assert_eq!(indel_distance("abc", "adc"), 2);
        assert!(approx(nid("abc", "adc"), 1.0 - 2.0 / 6.0));
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("kitten", "sitting"),
            ("Hello World", "World Hello"),
            ("abc", "xyz"),
            ("a", "aaaa"),
        ];
        for (a, b) in pairs {
            assert_eq!(indel_distance(a, b), indel_distance(b, a));
            assert!(approx(nid(a, b), nid(b, a)));
        }
    }

    #[test]
    fn test_disjoint() {
        assert_eq!(indel_distance("abc", "xyz"), 6);
        assert_eq!(nid("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_insertion_only() {
        assert_eq!(indel_distance("abcdef", "abef"), 2);
        assert_eq!(indel_distance("abef", "abcdef"), 2);
    }

    #[test]
    fn test_matches_full_table() {
        // kitten -> sitting: LCS "ittn" has length 4, so indel = 6 + 7 - 2 * 4.
        assert_eq!(indel_distance("kitten", "sitting"), 5);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        assert_eq!(indel_distance("가나다", "가다"), 1);
        assert!(approx(nid("가나다", "가다"), 1.0 - 1.0 / 5.0));
    }

    #[test]
    fn test_order_matters() {
        let reference = "Hello World";
        let preserved = nid(reference, "Hello World");
        let swapped = nid(reference, "World Hello");
        assert!(swapped < preserved);
    }
}
