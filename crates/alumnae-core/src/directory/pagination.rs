/// Members shown per directory page.
pub const PAGE_SIZE: usize = 12;

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed page number actually shown, after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Offset of the first item in the full list.
    pub fn start_index(&self, page_size: usize) -> usize {
        (self.page - 1) * page_size
    }
}

/// `ceil(count / page_size)`, 0 for an empty list.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Clamp a requested page into `[1, max(1, total_pages)]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slice `[(page-1)*size, page*size)` out of `list`, clamping the page first.
pub fn paginate<T: Clone>(list: &[T], page: usize, page_size: usize) -> Page<T> {
    let total_count = list.len();
    let total_pages = total_pages(total_count, page_size);
    let page = clamp_page(page, total_pages);

    let start = ((page - 1) * page_size).min(total_count);
    let end = (start + page_size).min(total_count);

    Page {
        items: list[start..end].to_vec(),
        page,
        total_pages,
        total_count,
    }
}
