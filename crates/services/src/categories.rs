//! # Category Indexer
//!
//! A prompt's `category` field holds any number of labels separated by an ASCII
//! comma or a full-width comma (`，`). The index groups prompts by label for
//! the list page.

use std::collections::BTreeMap;

use domains::Prompt;

const DELIMITERS: [char; 2] = [',', '，'];

/// Splits a raw category field into trimmed, non-empty labels, in field order.
///
/// Idempotent: joining the output with `,` and parsing again yields the same labels.
pub fn parse_categories(field: &str) -> Vec<&str> {
    field
        .split(DELIMITERS)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .collect()
}

/// Prompts grouped by category label.
///
/// A prompt with N labels sits in N buckets. Bucket contents keep input order;
/// bucket keys iterate in code-point order.
#[derive(Debug, Default)]
pub struct CategoryIndex<'a> {
    buckets: BTreeMap<&'a str, Vec<&'a Prompt>>,
    uncategorized: usize,
}

impl<'a> CategoryIndex<'a> {
    pub fn build<I>(prompts: I) -> Self
    where
        I: IntoIterator<Item = &'a Prompt>,
    {
        let mut index = CategoryIndex::default();
        for prompt in prompts {
            let labels = parse_categories(&prompt.category);
            if labels.is_empty() {
                index.uncategorized += 1;
                continue;
            }
            for label in labels {
                index.buckets.entry(label).or_default().push(prompt);
            }
        }
        index
    }

    /// Bucket keys, sorted and duplicate-free.
    pub fn sorted_categories(&self) -> Vec<&'a str> {
        self.buckets.keys().copied().collect()
    }

    pub fn prompts_in(&self, category: &str) -> &[&'a Prompt] {
        self.buckets.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(label, prompts)` pairs in display order.
    pub fn sections(&self) -> impl Iterator<Item = (&'a str, &[&'a Prompt])> + '_ {
        self.buckets
            .iter()
            .map(|(label, prompts)| (*label, prompts.as_slice()))
    }

    /// Prompts whose field produced no label. They exist in storage but are in no bucket.
    pub fn uncategorized(&self) -> usize {
        self.uncategorized
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::catalog_now;
    use uuid::Uuid;

    fn prompt(title: &str, category: &str) -> Prompt {
        Prompt {
            id: Uuid::now_v7(),
            title: title.to_string(),
            content: format!("{title} body"),
            category: category.to_string(),
            creator_ip: "10.0.0.1".to_string(),
            created_at: catalog_now(),
        }
    }

    #[test]
    fn splits_on_both_commas_and_trims() {
        assert_eq!(parse_categories("a, b,，c"), vec!["a", "b", "c"]);
        assert_eq!(parse_categories(" 写作 ，代码 "), vec!["写作", "代码"]);
    }

    #[test]
    fn parsing_is_idempotent() {
        let first = parse_categories("  x ,，, y，z  ");
        let rejoined = first.join(",");
        assert_eq!(parse_categories(&rejoined), first);
    }

    #[test]
    fn mixed_delimiters_place_prompt_once_per_label() {
        let p = prompt("one", "a, b,，c");
        let prompts = vec![p.clone()];
        let index = CategoryIndex::build(&prompts);

        assert_eq!(index.sorted_categories(), vec!["a", "b", "c"]);
        for label in ["a", "b", "c"] {
            let bucket = index.prompts_in(label);
            assert_eq!(bucket.len(), 1);
            assert_eq!(bucket[0].id, p.id);
        }
    }

    #[test]
    fn blank_category_lands_in_no_bucket() {
        let prompts = vec![prompt("empty", ""), prompt("spaces", "   "), prompt("commas", " ,， ")];
        let index = CategoryIndex::build(&prompts);

        assert!(index.is_empty());
        assert!(index.sorted_categories().is_empty());
        assert_eq!(index.uncategorized(), 3);
    }

    #[test]
    fn buckets_keep_input_order() {
        let prompts = vec![
            prompt("third", "z, shared"),
            prompt("first", "shared"),
            prompt("second", "a,shared"),
        ];
        let index = CategoryIndex::build(&prompts);

        let titles: Vec<&str> = index
            .prompts_in("shared")
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["third", "first", "second"]);
    }

    #[test]
    fn categories_are_sorted_by_code_point_without_duplicates() {
        let prompts = vec![
            prompt("p1", "beta, Alpha"),
            prompt("p2", "alpha,beta"),
            prompt("p3", "中文, beta"),
        ];
        let index = CategoryIndex::build(&prompts);

        assert_eq!(index.sorted_categories(), vec!["Alpha", "alpha", "beta", "中文"]);
        assert_eq!(index.prompts_in("beta").len(), 3);
        assert!(index.prompts_in("missing").is_empty());

        let sections: Vec<(&str, usize)> = index.sections().map(|(l, ps)| (l, ps.len())).collect();
        assert_eq!(sections, vec![("Alpha", 1), ("alpha", 1), ("beta", 3), ("中文", 1)]);
    }
}
