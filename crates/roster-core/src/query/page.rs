//! Pagination: page requests, pages with a total count, and slices

use serde::Serialize;

use super::field::Field;
use super::sort::Sort;

/// A zero-based page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<F> {
    page: u32,
    size: u32,
    sort: Sort<F>,
}

impl<F: Field> PageRequest<F> {
    /// Unsorted request; a size of zero is raised to one
    pub fn of(page: u32, size: u32) -> Self {
        Self::sorted(page, size, Sort::unsorted())
    }

    pub fn sorted(page: u32, size: u32, sort: Sort<F>) -> Self {
        Self {
            page,
            size: size.max(1),
            sort,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> &Sort<F> {
        &self.sort
    }

    pub fn is_sorted(&self) -> bool {
        self.sort.is_sorted()
    }

    /// Rows to skip
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    /// Limit for slice queries, one row past the page
    pub fn overfetch_limit(&self) -> i64 {
        self.limit() + 1
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
            sort: self.sort.clone(),
        }
    }

    pub fn previous_or_first(&self) -> Self {
        Self {
            page: self.page.saturating_sub(1),
            size: self.size,
            sort: self.sort.clone(),
        }
    }

    pub fn first(&self) -> Self {
        Self {
            page: 0,
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

/// One page of results plus the total number of matching rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    content: Vec<T>,
    number: u32,
    size: u32,
    total_elements: i64,
}

impl<T> Page<T> {
    pub fn new<F: Field>(content: Vec<T>, request: &PageRequest<F>, total_elements: i64) -> Self {
        Self {
            content,
            number: request.page(),
            size: request.size(),
            total_elements,
        }
    }

    /// Total implied by the content alone, if any.
    ///
    /// On the first page, or whenever a non-empty page is short, the total is
    /// `offset + content_len` and the count query can be skipped.
    pub fn known_total<F: Field>(content_len: usize, request: &PageRequest<F>) -> Option<i64> {
        let len = content_len as i64;
        let short = len < request.limit();
        (short && (request.offset() == 0 || len > 0)).then(|| request.offset() + len)
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn total_elements(&self) -> i64 {
        self.total_elements
    }

    /// `ceil(total / size)`; zero when nothing matched
    pub fn total_pages(&self) -> i64 {
        let size = i64::from(self.size.max(1));
        (self.total_elements + size - 1) / size
    }

    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    pub fn has_next(&self) -> bool {
        i64::from(self.number) + 1 < self.total_pages()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    /// Convert the content, keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

/// A page without a total count; only knows whether more rows follow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice<T> {
    content: Vec<T>,
    number: u32,
    size: u32,
    has_next: bool,
}

impl<T> Slice<T> {
    /// Build from a query that fetched up to `size + 1` rows
    pub fn from_overfetch<F: Field>(mut rows: Vec<T>, request: &PageRequest<F>) -> Self {
        let size = request.size() as usize;
        let has_next = rows.len() > size;
        rows.truncate(size);
        Self {
            content: rows,
            number: request.page(),
            size: request.size(),
            has_next,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    pub fn is_last(&self) -> bool {
        !self.has_next
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Slice<U> {
        Slice {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            has_next: self.has_next,
        }
    }
}
