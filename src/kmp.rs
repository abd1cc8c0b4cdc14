use log::{debug, trace};

/// Builds the failure table of `pattern`.
///
/// Entry `i` is the length of the longest proper prefix of `pattern[..=i]` that is also a
/// suffix of it. The table has exactly `pattern.len()` entries and `table[i] <= i` holds for
/// every entry.
pub fn build_failure_table<T: PartialEq>(pattern: &[T]) -> Vec<usize> {
    let mut table = vec![0; pattern.len()];

    let mut k = 0;
    for i in 1..pattern.len() {
        while k > 0 && pattern[i] != pattern[k] {
            k = table[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        table[i] = k;
    }

    trace!("failure table: {table:?}");
    table
}

/// Returns the start of the first occurrence of `pattern` in `text` using a table previously
/// built with [`build_failure_table`].
///
/// An empty pattern matches at index 0. A table that does not belong to `pattern` (wrong
/// length, or an entry pointing past its own index) never matches.
pub fn scan<T: PartialEq>(text: &[T], pattern: &[T], table: &[usize]) -> Option<usize> {
    let m = pattern.len();
    if m == 0 {
        return Some(0);
    }
    if m > text.len() || !is_well_formed(table, m) {
        return None;
    }

    // Number of pattern symbols matched so far, always < m.
    let mut j = 0;
    for (i, symbol) in text.iter().enumerate() {
        while j > 0 && *symbol != pattern[j] {
            j = table[j - 1];
        }
        if *symbol == pattern[j] {
            if j == m - 1 {
                debug!("pattern of length {m} found at {}", i - j);
                return Some(i - j);
            }
            j += 1;
        }
    }

    debug!("pattern of length {m} not found in text of length {}", text.len());
    None
}

/// Returns the start of the first occurrence of `pattern` in `text`.
pub fn find_first<T: PartialEq>(text: &[T], pattern: &[T]) -> Option<usize> {
    if pattern.len() > text.len() {
        return None;
    }
    scan(text, pattern, &build_failure_table(pattern))
}

fn is_well_formed(table: &[usize], m: usize) -> bool {
    table.len() == m && table.iter().enumerate().all(|(i, &k)| k <= i)
}

#[cfg(test)]
mod tests {
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    use super::*;

    /// A string over `{a, b, c}` of length at most 50.
    #[derive(Clone, Debug)]
    struct Abc(String);

    /// A string over `{a, b, c}` of length at most 5, short enough to occur often.
    #[derive(Clone, Debug)]
    struct ShortAbc(String);

    fn abc(g: &mut Gen, max_len: usize) -> String {
        let len = usize::arbitrary(g) % (max_len + 1);
        (0..len)
            .map(|_| *g.choose(&['a', 'b', 'c']).unwrap())
            .collect()
    }

    impl Arbitrary for Abc {
        fn arbitrary(g: &mut Gen) -> Self {
            Abc(abc(g, 50))
        }
    }

    impl Arbitrary for ShortAbc {
        fn arbitrary(g: &mut Gen) -> Self {
            ShortAbc(abc(g, 5))
        }
    }

    fn brute_force<T: PartialEq>(text: &[T], pattern: &[T]) -> Option<usize> {
        if pattern.is_empty() {
            return Some(0);
        }
        text.windows(pattern.len()).position(|w| w == pattern)
    }

    fn find_str(text: &str, pattern: &str) -> Option<usize> {
        find_first(text.as_bytes(), pattern.as_bytes())
    }

    #[test]
    fn scenarios() {
        assert_eq!(find_str("y ababaca siifjae", "ababaca"), Some(2));
        assert_eq!(find_str("abababacsiifjae", "ababac"), Some(2));
        assert_eq!(
            find_str("adfbec dsfoeifj asdfjww sifmyy abcdefg siifjae", "aa"),
            None
        );
        assert_eq!(find_str("aabaaabaaac", "aabaaac"), Some(4));
        assert_eq!(find_str("ababac", "ababac"), Some(0));
        assert_eq!(find_str("bacbababaabcbab", "ababababca"), None);
    }

    #[test]
    fn scenarios_agree_with_str_find() {
        let cases = [
            ("y ababac siifjae", "ababac"),
            ("adfbec dsfoeifj asdfjww abyyabcdefg siifjae", "aba"),
            ("adfbec dsfoeifj asdfjww sifmyy abcdefg siifjae", "ab"),
            ("adfbec dsfoeifj asdfjww sifmyy abcdefg siifjae", "a"),
        ];
        for (text, pattern) in cases {
            let found = find_str(text, pattern);
            assert_eq!(found, text.find(pattern), "searching {pattern:?} in {text:?}");
            if let Some(start) = found {
                assert_eq!(&text[start..start + pattern.len()], pattern);
            }
        }
    }

    #[test]
    fn empty_pattern_matches_at_zero() {
        assert_eq!(find_str("abc", ""), Some(0));
        assert_eq!(find_str("", ""), Some(0));
    }

    #[test]
    fn empty_text() {
        assert_eq!(find_str("", "a"), None);
    }

    #[test]
    fn pattern_longer_than_text() {
        assert_eq!(find_str("ab", "abc"), None);
        assert_eq!(scan(b"ab", b"abc", &[0, 0, 0]), None);
    }

    #[test]
    fn known_tables() {
        assert_eq!(build_failure_table(b"ababaca"), vec![0, 0, 1, 2, 3, 0, 1]);
        assert_eq!(build_failure_table(b"aabaaac"), vec![0, 1, 0, 1, 2, 2, 0]);
        assert_eq!(build_failure_table(b"aaaa"), vec![0, 1, 2, 3]);
        assert_eq!(build_failure_table(b"a"), vec![0]);
        assert!(build_failure_table::<u8>(b"").is_empty());
    }

    #[test]
    fn malformed_table_never_matches() {
        assert_eq!(scan(b"abab", b"ab", &[0]), None);
        assert_eq!(scan(b"abab", b"ab", &[0, 7]), None);
    }

    #[test]
    fn generic_symbols() {
        let text = [1u32, 2, 1, 2, 3, 1];
        assert_eq!(find_first(&text, &[1, 2, 3]), Some(2));

        let text: Vec<char> = "naïve café".chars().collect();
        let pattern: Vec<char> = "café".chars().collect();
        assert_eq!(find_first(&text, &pattern), Some(6));
    }

    #[quickcheck]
    fn agrees_with_brute_force(text: Abc, pattern: ShortAbc) -> bool {
        let (text, pattern) = (text.0.as_bytes(), pattern.0.as_bytes());
        find_first(text, pattern) == brute_force(text, pattern)
    }

    #[quickcheck]
    fn agrees_with_str_find(text: Abc, pattern: Abc) -> bool {
        find_str(&text.0, &pattern.0) == text.0.find(&pattern.0)
    }

    #[quickcheck]
    fn agrees_with_str_find_short_patterns(text: Abc, pattern: ShortAbc) -> bool {
        find_str(&text.0, &pattern.0) == text.0.find(&pattern.0)
    }

    #[quickcheck]
    fn longer_pattern_is_not_found(text: Abc, extra: ShortAbc) -> bool {
        let pattern = format!("{}{}x", text.0, extra.0);
        find_str(&text.0, &pattern).is_none()
    }

    #[quickcheck]
    fn table_invariants(pattern: Abc) -> bool {
        let table = build_failure_table(pattern.0.as_bytes());
        table.len() == pattern.0.len()
            && table.first().map_or(true, |&k| k == 0)
            && table.iter().enumerate().all(|(i, &k)| k <= i)
    }

    #[quickcheck]
    fn table_entries_are_prefix_suffixes(pattern: Abc) -> bool {
        let p = pattern.0.as_bytes();
        build_failure_table(p)
            .iter()
            .enumerate()
            .all(|(i, &k)| p[..k] == p[i + 1 - k..=i])
    }

    #[quickcheck]
    fn table_is_idempotent(pattern: Abc) -> bool {
        build_failure_table(pattern.0.as_bytes()) == build_failure_table(pattern.0.as_bytes())
    }
}
