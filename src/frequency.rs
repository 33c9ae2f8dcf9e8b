use std::collections::HashMap;

/// Term counts that remember the order in which terms were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count compound terms first, then classified terms.
    pub fn from_terms(compounds: &[String], classified: &[String]) -> Self {
        let mut table = Self::new();
        table.extend(compounds.iter().chain(classified));
        table
    }

    pub fn add(&mut self, term: &str) {
        match self.index.get(term) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(term.to_string(), self.entries.len());
                self.entries.push((term.to_string(), 1));
            }
        }
    }

    pub fn get(&self, term: &str) -> u64 {
        self.index
            .get(term)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(term, count)| (term.as_str(), *count))
    }

    /// The `n` most frequent terms; ties keep first-seen order.
    pub fn most_common(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked = self.entries.clone();
        // Stable sort keeps insertion order among equal counts
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl<S: AsRef<str>> Extend<S> for FrequencyTable {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for term in iter {
            self.add(term.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_counts_compounds_then_terms() {
        let table = FrequencyTable::from_terms(
            &strings(&["设备不转动"]),
            &strings(&["设备", "不转动", "良率问题"]),
        );
        assert_eq!(table.len(), 4);
        assert_eq!(table.get("设备不转动"), 1);
        assert_eq!(table.get("良率问题"), 1);
        assert_eq!(table.get("卡料"), 0);
        let order: Vec<&str> = table.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["设备不转动", "设备", "不转动", "良率问题"]);
    }

    #[test]
    fn test_total_matches_input_length() {
        let compounds = strings(&["马达卡料", "马达卡料"]);
        let classified = strings(&["马达", "卡料", "马达", "卡料", "虚焊"]);
        let table = FrequencyTable::from_terms(&compounds, &classified);
        assert_eq!(table.total(), (compounds.len() + classified.len()) as u64);
    }

    #[test]
    fn test_most_common_breaks_ties_by_first_seen() {
        let table: FrequencyTable = ["卡料", "虚焊", "阀", "虚焊", "阀", "卡料", "氧化"]
            .into_iter()
            .collect();
        assert_eq!(
            table.most_common(3),
            vec![
                ("卡料".to_string(), 2),
                ("虚焊".to_string(), 2),
                ("阀".to_string(), 2),
            ]
        );

        // Same counts, reversed first appearance: order follows input, not labels
        let reversed: FrequencyTable = ["阀", "虚焊", "卡料"].into_iter().collect();
        let top: Vec<String> = reversed.most_common(3).into_iter().map(|(t, _)| t).collect();
        assert_eq!(top, strings(&["阀", "虚焊", "卡料"]));
    }

    #[test]
    fn test_most_common_orders_by_count() {
        let table: FrequencyTable = ["a", "b", "b", "c", "c", "c"].into_iter().collect();
        assert_eq!(table.most_common(2), vec![("c".to_string(), 3), ("b".to_string(), 2)]);
        assert_eq!(table.most_common(10).len(), 3);
        assert!(table.most_common(0).is_empty());
    }

    #[test]
    fn test_empty_table() {
        let table = FrequencyTable::new();
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert!(table.most_common(5).is_empty());
    }
}
