//! Cursor pagination primitives.
//!
//! Both platforms page their result sets behind opaque cursors. A page
//! either carries the cursor of its successor or it is the last one;
//! callers must follow cursors to exhaustion; stopping after one page is
//! a correctness bug, not an optimization.

use crate::error::ConnectorResult;
use std::future::Future;

/// One page of records plus the cursor of the next page, if any.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// A terminal page.
    pub fn last(records: Vec<T>) -> Self {
        Self {
            records,
            next_cursor: None,
        }
    }

    /// A page followed by more.
    pub fn with_next(records: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            records,
            next_cursor: Some(cursor.into()),
        }
    }

    /// Whether another page follows this one.
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Follow cursors until the source is exhausted, preserving record order.
///
/// `fetch` is called with `None` for the first page and with the previous
/// page's cursor afterwards. Any page error aborts the whole drain.
pub async fn drain_pages<T, F, Fut>(mut fetch: F) -> ConnectorResult<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = ConnectorResult<Page<T>>>,
{
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = fetch(cursor.take()).await?;
        records.extend(page.records);

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConnectorError;
    use std::cell::RefCell;

    #[tokio::test]
    async fn test_drains_every_page_in_order() {
        let pages = RefCell::new(vec![
            Page::with_next(vec![1, 2], "c1"),
            Page::with_next(vec![3], "c2"),
            Page::last(vec![4, 5]),
        ]);
        let cursors = RefCell::new(Vec::new());

        let records = drain_pages(|cursor| {
            cursors.borrow_mut().push(cursor);
            let page = pages.borrow_mut().remove(0);
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(records, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            *cursors.borrow(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_single_page_source() {
        let records = drain_pages(|_| async { Ok(Page::last(vec!["only"])) })
            .await
            .unwrap();
        assert_eq!(records, vec!["only"]);
    }

    #[tokio::test]
    async fn test_error_aborts_drain() {
        let calls = RefCell::new(0u32);

        let result: ConnectorResult<Vec<i32>> = drain_pages(|cursor| {
            *calls.borrow_mut() += 1;
            async move {
                if cursor.is_none() {
                    Ok(Page::with_next(vec![1], "c1"))
                } else {
                    Err(ConnectorError::from_status(500, None, "boom".to_string()))
                }
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(*calls.borrow(), 2);
    }
}
