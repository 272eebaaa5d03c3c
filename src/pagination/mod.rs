//! Pagination module
//!
//! Cursor-based deep paging over list routes.
//!
//! # Flow
//!
//! ```text
//! cursor=* ──▶ page 0 ──▶ next-cursor ──▶ page 1 ──▶ ... ──▶ stop
//! ```
//!
//! A walk stops on an empty page, once `cursor_max` items were fetched,
//! once `total-results` items were fetched, or when the server returns no
//! new cursor.

mod cursor;
mod types;

pub use cursor::CursorPager;
pub use types::{Page, PageSequence, PagerState, StopReason};
