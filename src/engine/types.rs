//! Engine result types

use crate::pagination::{Page, PageSequence};
use crate::request::ResultShape;
use serde::Serialize;

/// Result of a fan-out: bare for zero or one identifier, a list otherwise
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FanOut<T> {
    /// Zero or one identifier
    One(T),
    /// One result per identifier, in input order
    Many(Vec<T>),
}

impl<T> FanOut<T> {
    /// Number of results held
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(results) => results.len(),
        }
    }

    /// Check if a list with no results
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Many(results) if results.is_empty())
    }

    /// Flatten into a list, in input order
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(result) => vec![result],
            Self::Many(results) => results,
        }
    }
}

/// What one identifier (or the bare route) produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Fetched {
    /// A single response
    Page(Page),
    /// A cursor walk
    Pages(PageSequence),
}

/// Result of one logical call
///
/// The variant always matches [`SearchRequest::shape`](crate::request::SearchRequest::shape).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultSet {
    /// One response (no cursor, at most one identifier)
    Single(Page),
    /// A cursor walk (at most one identifier)
    Pages(PageSequence),
    /// One result per identifier, in input order
    Many(Vec<Fetched>),
}

impl ResultSet {
    /// Shape of this result
    pub fn shape(&self) -> ResultShape {
        match self {
            Self::Single(_) => ResultShape::Single,
            Self::Pages(_) => ResultShape::Pages,
            Self::Many(_) => ResultShape::PerId,
        }
    }

    /// The single page, if this is a `Single` result
    pub fn as_page(&self) -> Option<&Page> {
        match self {
            Self::Single(page) => Some(page),
            _ => None,
        }
    }

    /// The page sequence, if this is a `Pages` result
    pub fn as_pages(&self) -> Option<&PageSequence> {
        match self {
            Self::Pages(pages) => Some(pages),
            _ => None,
        }
    }

    /// Per-identifier results, if this is a `Many` result
    pub fn as_many(&self) -> Option<&[Fetched]> {
        match self {
            Self::Many(results) => Some(results),
            _ => None,
        }
    }
}

impl From<FanOut<Fetched>> for ResultSet {
    fn from(fan_out: FanOut<Fetched>) -> Self {
        match fan_out {
            FanOut::One(Fetched::Page(page)) => Self::Single(page),
            FanOut::One(Fetched::Pages(pages)) => Self::Pages(pages),
            FanOut::Many(results) => Self::Many(results),
        }
    }
}
