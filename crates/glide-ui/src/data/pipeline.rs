//! Search, sort and paginate over a row slice, expressed as index vectors.
//!
//! Every step returns positions into the original rows, so callers keep ownership of the
//! working copy and can map displayed positions back to stable rows.
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Range;
use super::Value;

/// A row whose fields can be searched as text.
pub trait Record {
    /// Every field value, in any order.
    fn values(&self) -> Vec<Value>;
}

/// A row described by external column definitions, keyed by column key.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DynamicRow {
    fields: BTreeMap<String, Value>,
}

impl DynamicRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// The value under `key`; missing keys read as `Null`.
    pub fn get(&self, key: &str) -> Value {
        self.fields.get(key).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl Record for DynamicRow {
    fn values(&self) -> Vec<Value> {
        self.fields.values().cloned().collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SortColumn {
    pub key: String,
    pub direction: SortDirection,
}

impl SortColumn {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Active sort keys, highest priority first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    columns: Vec<SortColumn>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[SortColumn] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub fn direction(&self, key: &str) -> Option<SortDirection> {
        self.columns
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.direction)
    }

    /// Replaces all keys with one. Sorted ascending flips to descending; anything else
    /// becomes ascending.
    pub fn toggle_two_way(&mut self, key: &str) {
        let direction = match self.direction(key) {
            Some(SortDirection::Asc) => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        self.columns = vec![SortColumn {
            key: key.to_string(),
            direction,
        }];
    }

    /// Cycles `key` through ascending, descending and unsorted.
    ///
    /// With `multi`, other keys are kept and a newly added key takes the highest priority.
    /// Without it, other keys are dropped.
    pub fn toggle_three_way(&mut self, key: &str, multi: bool) {
        let current = self.direction(key);
        if !multi {
            self.columns.retain(|c| c.key == key);
        }
        match current {
            None => self.columns.insert(0, SortColumn::asc(key)),
            Some(SortDirection::Asc) => {
                if let Some(c) = self.columns.iter_mut().find(|c| c.key == key) {
                    c.direction = SortDirection::Desc;
                }
            }
            Some(SortDirection::Desc) => self.columns.retain(|c| c.key != key),
        }
    }
}

/// Positions of rows whose string form of any field contains `query`, ignoring case.
///
/// An empty query keeps every row.
pub fn search_rows<T: Record>(rows: &[T], query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| {
            needle.is_empty()
                || row
                    .values()
                    .iter()
                    .any(|v| v.to_string().to_lowercase().contains(&needle))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Stable sort of `order` (positions into `rows`) by `sort`, highest priority first.
///
/// Null values sort after every defined value in both directions.
pub fn sort_rows<T, F>(rows: &[T], order: &mut [usize], sort: &[SortColumn], value: F)
where
    F: Fn(&T, &str) -> Value,
{
    if sort.is_empty() {
        return;
    }
    order.sort_by(|&a, &b| {
        for col in sort {
            let va = value(&rows[a], &col.key);
            let vb = value(&rows[b], &col.key);
            let ord = match (va.is_null(), vb.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => match col.direction {
                    SortDirection::Asc => va.compare(&vb),
                    SortDirection::Desc => vb.compare(&va),
                },
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

/// Search then sort, returning displayed positions into `rows`.
pub fn display_order<T, F>(rows: &[T], query: &str, sort: &[SortColumn], value: F) -> Vec<usize>
where
    T: Record,
    F: Fn(&T, &str) -> Value,
{
    let mut order = search_rows(rows, query);
    sort_rows(rows, &mut order, sort, value);
    order
}

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Fixed-size pages with a clamped page index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page_size: usize,
    page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 0,
        }
    }

    /// Zero-based page index as last clamped.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Always at least one, even with no rows.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Requests a page; out-of-range requests land on the nearest valid page.
    pub fn set_page(&mut self, page: usize, total: usize) {
        self.page = page.min(self.page_count(total) - 1);
    }

    pub fn clamp(&mut self, total: usize) {
        self.set_page(self.page, total);
    }

    pub fn next(&mut self, total: usize) {
        self.set_page(self.page.saturating_add(1), total);
    }

    pub fn prev(&mut self, total: usize) {
        self.set_page(self.page.saturating_sub(1), total);
    }

    pub fn can_next(&self, total: usize) -> bool {
        self.page + 1 < self.page_count(total)
    }

    pub fn can_prev(&self) -> bool {
        self.page > 0
    }

    /// Range of displayed positions on the current page.
    pub fn range(&self, total: usize) -> Range<usize> {
        let page = self.page.min(self.page_count(total) - 1);
        let start = (page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Vec<DynamicRow> {
        vec![
            DynamicRow::new().with("name", "John Doe").with("age", 40),
            DynamicRow::new().with("name", "Jane Smith").with("age", 31),
            DynamicRow::new().with("name", "Al").with("age", Value::Null),
            DynamicRow::new().with("name", "Bo").with("age", 31),
        ]
    }

    fn by_key(row: &DynamicRow, key: &str) -> Value {
        row.get(key)
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        assert_eq!(search_rows(&people(), "OE"), vec![0]);
        assert_eq!(search_rows(&people(), "31"), vec![1, 3]);
        assert_eq!(search_rows(&people(), "").len(), 4);
    }

    #[test]
    fn nulls_sort_last_in_both_directions() {
        let rows = people();
        let mut asc: Vec<usize> = (0..rows.len()).collect();
        sort_rows(&rows, &mut asc, &[SortColumn::asc("age")], by_key);
        assert_eq!(asc, vec![1, 3, 0, 2]);
        let mut desc: Vec<usize> = (0..rows.len()).collect();
        sort_rows(&rows, &mut desc, &[SortColumn::desc("age")], by_key);
        assert_eq!(desc, vec![0, 1, 3, 2]);
    }

    #[test]
    fn later_keys_break_ties() {
        let rows = people();
        let order = display_order(
            &rows,
            "",
            &[SortColumn::asc("age"), SortColumn::desc("name")],
            by_key,
        );
        assert_eq!(order, vec![1, 3, 0, 2]);
        let order = display_order(
            &rows,
            "",
            &[SortColumn::asc("age"), SortColumn::asc("name")],
            by_key,
        );
        assert_eq!(order, vec![3, 1, 0, 2]);
    }

    #[test]
    fn three_way_toggle_cycles_and_prepends() {
        let mut s = SortState::new();
        s.toggle_three_way("a", true);
        s.toggle_three_way("b", true);
        assert_eq!(s.columns()[0], SortColumn::asc("b"));
        s.toggle_three_way("a", true);
        assert_eq!(s.direction("a"), Some(SortDirection::Desc));
        s.toggle_three_way("a", true);
        assert_eq!(s.direction("a"), None);
        assert_eq!(s.columns().len(), 1);
        s.toggle_three_way("c", false);
        assert_eq!(s.columns(), &[SortColumn::asc("c")]);
    }

    #[test]
    fn two_way_toggle_flips_single_key() {
        let mut s = SortState::new();
        s.toggle_two_way("name");
        assert_eq!(s.direction("name"), Some(SortDirection::Asc));
        s.toggle_two_way("name");
        assert_eq!(s.direction("name"), Some(SortDirection::Desc));
        s.toggle_two_way("age");
        assert_eq!(s.columns(), &[SortColumn::asc("age")]);
    }

    #[test]
    fn pagination_clamps() {
        let mut p = Pagination::new(10);
        assert_eq!(p.page_count(0), 1);
        assert_eq!(p.page_count(25), 3);
        p.set_page(7, 25);
        assert_eq!(p.page(), 2);
        assert_eq!(p.range(25), 20..25);
        p.clamp(5);
        assert_eq!(p.page(), 0);
        assert!(!p.can_prev());
        assert!(!p.can_next(5));
    }

    #[test]
    fn pipeline_is_idempotent() {
        let rows = people();
        let sort = [SortColumn::asc("name")];
        let a = display_order(&rows, "o", &sort, by_key);
        let b = display_order(&rows, "o", &sort, by_key);
        assert_eq!(a, b);
    }

    #[test]
    fn mixed_value_kinds_sort_without_panicking() {
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };
        let rows: Vec<DynamicRow> = (0..256)
            .map(|_| {
                let n = (next() % 40) as i64 - 20;
                let x = match next() % 6 {
                    0 => Value::Int(n),
                    1 => Value::Float(n as f64 + 0.5),
                    2 => Value::Text(n.to_string()),
                    3 => Value::Text(format!("w{n}")),
                    4 => Value::Bool(n % 2 == 0),
                    _ => Value::Null,
                };
                DynamicRow::new().with("x", x)
            })
            .collect();
        for col in [SortColumn::asc("x"), SortColumn::desc("x")] {
            let mut order: Vec<usize> = (0..rows.len()).collect();
            sort_rows(&rows, &mut order, std::slice::from_ref(&col), by_key);
            let values: Vec<Value> = order.iter().map(|&i| rows[i].get("x")).collect();
            for pair in values.windows(2) {
                let ord = match (pair[0].is_null(), pair[1].is_null()) {
                    (_, true) => continue,
                    (true, false) => Ordering::Greater,
                    (false, false) if col.direction == SortDirection::Asc => {
                        pair[0].compare(&pair[1])
                    }
                    (false, false) => pair[1].compare(&pair[0]),
                };
                assert_ne!(ord, Ordering::Greater, "{:?} before {:?}", pair[0], pair[1]);
            }
        }
    }
}
