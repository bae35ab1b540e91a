//! Cursor-driven accumulation of paged collections.

use super::Collection;
use super::error::Result;
use crate::facts::timestamp::sentinel_time;
use chrono::{DateTime, Datelike, FixedOffset};
use core::future::Future;
use core::time::Duration;
use std::time::Instant;

const LOG_TARGET: &str = "paginate";

/// What to do after a page has been consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation<C> {
    /// Request the page identified by this cursor.
    Next(C),

    /// The service reported no further pages.
    Exhausted,

    /// The page reached items older than the target year; later pages only hold older items.
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T, C> {
    pub items: Vec<T>,
    pub continuation: Continuation<C>,
}

impl<T, C> Page<T, C> {
    /// A page with no items and no successor.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            continuation: Continuation::Exhausted,
        }
    }
}

/// Bounds applied to one collection's pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Accumulation stops once this many items are held; extra items are dropped.
    pub max_items: usize,

    /// Pause before requesting each page after the first.
    pub pacing_delay: Duration,
}

/// Fetches pages starting at `first` until the cursor runs out, a page signals
/// [`Continuation::Stop`], or `limits.max_items` is reached.
///
/// Pages are requested strictly one after another and items keep their arrival order.
/// The first failing page aborts the whole collection.
pub async fn paginate<T, C, F, Fut>(collection: Collection, first: C, limits: PageLimits, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Result<Page<T, C>>>,
{
    let start_time = Instant::now();
    let mut items = Vec::new();
    let mut cursor = first;
    let mut pages = 0_u32;

    loop {
        let page = fetch_page(cursor).await?;
        pages += 1;
        items.extend(page.items);

        if items.len() >= limits.max_items {
            if items.len() > limits.max_items || !matches!(page.continuation, Continuation::Exhausted) {
                log::warn!(
                    target: LOG_TARGET,
                    "Stopped fetching {collection} at the limit of {} item(s)",
                    limits.max_items
                );
            }
            items.truncate(limits.max_items);
            break;
        }

        match page.continuation {
            Continuation::Next(next) => {
                tokio::time::sleep(limits.pacing_delay).await;
                cursor = next;
            }
            Continuation::Exhausted => break,
            Continuation::Stop => {
                log::debug!(target: LOG_TARGET, "Reached {collection} older than the target year");
                break;
            }
        }
    }

    log::debug!(
        target: LOG_TARGET,
        "Fetched {} {collection} item(s) over {pages} page(s) in {:.3}s",
        items.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(items)
}

/// Keeps items up to the first one created before `year`.
///
/// Returns the kept items and whether an older item was seen, in which case a
/// newest-first collection needs no further pages. Items whose timestamp could not be
/// parsed carry no position in time, so they are kept and never end the walk.
pub fn cut_at_year<T>(items: Vec<T>, year: i32, created_time: impl Fn(&T) -> DateTime<FixedOffset>) -> (Vec<T>, bool) {
    let unparsed = sentinel_time();
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        let time = created_time(&item);
        if time != unparsed && time.year() < year {
            return (kept, true);
        }
        kept.push(item);
    }
    (kept, false)
}
