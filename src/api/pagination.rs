//! Offset and cursor pagination
//!
//! The API paginates most list endpoints by numeric offset and the meeting
//! endpoints by opaque cursor. The two loops end on different conditions
//! (short page vs. missing cursor) so they are kept as separate strategies.
//! Pages are fetched one at a time; a failed fetch is returned immediately.

use std::future::Future;

use anyhow::Result;

/// Page size used when fetching everything by offset
pub const PAGE_SIZE: usize = 500;

/// Page size used when following cursors
pub const CURSOR_PAGE_SIZE: usize = 200;

/// Hard ceiling on accumulated items in `--all` mode
pub const MAX_ITEMS: usize = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub limit: usize,
    pub offset: usize,
    pub all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorOptions {
    pub limit: usize,
    pub cursor: Option<String>,
    pub all: bool,
}

/// One page from a cursor endpoint
#[derive(Debug, Clone)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// Accumulated items plus how the loop ended
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Stopped at [`MAX_ITEMS`] before the data ran out
    pub truncated: bool,
    /// Cursor for the next page (cursor endpoints, single-page mode)
    pub next_cursor: Option<String>,
}

impl<T> Paginated<T> {
    fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            truncated: false,
            next_cursor: None,
        }
    }
}

/// Fetch by offset. `fetch_page` receives `(limit, offset)`.
pub async fn paginate<T, F, Fut>(fetch_page: F, options: PageOptions) -> Result<Paginated<T>>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    paginate_with(fetch_page, options, PAGE_SIZE, MAX_ITEMS).await
}

/// Like [`paginate`] for endpoints that cap their page size below [`PAGE_SIZE`]
pub async fn paginate_by<T, F, Fut>(
    fetch_page: F,
    options: PageOptions,
    page_size: usize,
) -> Result<Paginated<T>>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    paginate_with(fetch_page, options, page_size, MAX_ITEMS).await
}

async fn paginate_with<T, F, Fut>(
    mut fetch_page: F,
    options: PageOptions,
    page_size: usize,
    max_items: usize,
) -> Result<Paginated<T>>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    if !options.all {
        let items = fetch_page(options.limit, options.offset).await?;
        return Ok(Paginated::complete(items));
    }

    let mut items = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch_page(page_size, offset).await?;
        let short = page.len() < page_size;
        offset += page.len();
        items.extend(page);

        if short {
            return Ok(Paginated::complete(items));
        }
        if items.len() >= max_items {
            items.truncate(max_items);
            return Ok(Paginated {
                items,
                truncated: true,
                next_cursor: None,
            });
        }
    }
}

/// Follow `next_cursor`. `fetch_page` receives `(limit, cursor)`.
pub async fn paginate_cursor<T, F, Fut>(
    fetch_page: F,
    options: CursorOptions,
) -> Result<Paginated<T>>
where
    F: FnMut(usize, Option<String>) -> Fut,
    Fut: Future<Output = Result<CursorPage<T>>>,
{
    paginate_cursor_with(fetch_page, options, CURSOR_PAGE_SIZE, MAX_ITEMS).await
}

async fn paginate_cursor_with<T, F, Fut>(
    mut fetch_page: F,
    options: CursorOptions,
    page_size: usize,
    max_items: usize,
) -> Result<Paginated<T>>
where
    F: FnMut(usize, Option<String>) -> Fut,
    Fut: Future<Output = Result<CursorPage<T>>>,
{
    if !options.all {
        let page = fetch_page(options.limit, options.cursor).await?;
        return Ok(Paginated {
            items: page.items,
            truncated: false,
            next_cursor: page.next_cursor,
        });
    }

    let mut items = Vec::new();
    let mut cursor = options.cursor;

    loop {
        let page = fetch_page(page_size, cursor.take()).await?;
        items.extend(page.items);

        match page.next_cursor.filter(|c| !c.is_empty()) {
            None => return Ok(Paginated::complete(items)),
            Some(_) if items.len() >= max_items => {
                items.truncate(max_items);
                return Ok(Paginated {
                    items,
                    truncated: true,
                    next_cursor: None,
                });
            }
            Some(next) => cursor = Some(next),
        }
    }
}
