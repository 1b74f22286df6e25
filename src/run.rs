//! Multi-page diff runs.
//!
//! A comparison run usually executes the same statement pair once per
//! parameter set, yielding one batch of result sets ("page") each time.
//! [`DiffRun`] pulls pages from any fallible iterator (the query executor's
//! seam), diffs each page with the chunked driver and hands back one
//! [`PageOutcome`] per page. With [`RunPolicy::StopOnFirstDivergence`] the run
//! ends as soon as a page diverges, trading completeness for fast feedback;
//! the page that diverged is still diffed completely.

use crate::errors::Error;
use crate::result_set::ResultSet;
use crate::scan::{DiffResult, ScanOptions, diff_all};
use alloc::vec::Vec;

/// When a run stops pulling pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum RunPolicy {
    /// Diff every page.
    #[default]
    RunToCompletion,
    /// Stop after the first page with a divergent row.
    StopOnFirstDivergence,
}

/// Errors ending a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError<E> {
    /// The page source failed to produce a page.
    #[error("Failed to fetch page {page}")]
    Page {
        /// Zero-based page number.
        page: usize,
        /// The page source's error.
        #[source]
        source: E,
    },
    /// The page could not be diffed.
    #[error(transparent)]
    Scan(#[from] Error),
}

/// The diff of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutcome {
    /// Zero-based page number.
    pub page: usize,
    /// The page's diff.
    pub result: DiffResult,
}

/// Totals of a drained run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Pages diffed.
    pub pages: usize,
    /// Row positions compared across all pages.
    pub rows: usize,
    /// Divergent rows across all pages.
    pub diff_rows: usize,
    /// First page with a divergent row.
    pub first_divergent_page: Option<usize>,
    /// Whether the policy ended the run before the page source was drained.
    pub stopped_early: bool,
}

/// Pull-based diff over a sequence of pages.
///
/// # Example
///
/// ```
/// use result_diff_rs::{DiffRun, Field, ResultSet, RunPolicy, ScanOptions, Value};
///
/// let page = |a: i64, b: i64| -> Result<Vec<ResultSet>, core::convert::Infallible> {
///     Ok(vec![
///         ResultSet::read(vec![Field::new("n")], vec![vec![Value::from(a)]]),
///         ResultSet::read(vec![Field::new("n")], vec![vec![Value::from(b)]]),
///     ])
/// };
/// let pages = vec![page(1, 1), page(2, 3), page(4, 4)];
///
/// let summary = DiffRun::new(pages, ScanOptions::default(), RunPolicy::StopOnFirstDivergence)
///     .unwrap()
///     .summarize()
///     .unwrap();
/// assert_eq!(summary.pages, 2);
/// assert_eq!(summary.first_divergent_page, Some(1));
/// assert!(summary.stopped_early);
/// ```
#[derive(Debug)]
pub struct DiffRun<I> {
    pages: I,
    options: ScanOptions,
    policy: RunPolicy,
    next_page: usize,
    source_count: Option<usize>,
    stopped_by_policy: bool,
    finished: bool,
}

impl<I, E> DiffRun<I>
where
    I: Iterator<Item = Result<Vec<ResultSet>, E>>,
{
    /// Prepare a run over `pages`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] when `options.chunk_size` is zero.
    pub fn new<P>(pages: P, options: ScanOptions, policy: RunPolicy) -> Result<Self, Error>
    where
        P: IntoIterator<IntoIter = I>,
    {
        if options.chunk_size == 0 {
            return Err(Error::InvalidChunkSize);
        }
        Ok(Self {
            pages: pages.into_iter(),
            options,
            policy,
            next_page: 0,
            source_count: None,
            stopped_by_policy: false,
            finished: false,
        })
    }

    /// Number of pages diffed so far.
    #[must_use]
    pub fn pages_done(&self) -> usize {
        self.next_page
    }

    /// Whether the policy ended the run.
    #[must_use]
    pub fn stopped_by_policy(&self) -> bool {
        self.stopped_by_policy
    }

    /// Drain the run into totals.
    ///
    /// # Errors
    ///
    /// Returns the first error the run hit.
    pub fn summarize(mut self) -> Result<RunSummary, RunError<E>> {
        let mut summary = RunSummary::default();
        while let Some(outcome) = self.next() {
            let PageOutcome { page, result } = outcome?;
            summary.pages += 1;
            summary.rows += result.row_count;
            summary.diff_rows += result.diff_row_count;
            if !result.is_identical() && summary.first_divergent_page.is_none() {
                summary.first_divergent_page = Some(page);
            }
        }
        summary.stopped_early = self.stopped_by_policy;
        tracing::debug!(
            pages = summary.pages,
            rows = summary.rows,
            diff_rows = summary.diff_rows,
            stopped_early = summary.stopped_early,
            "diff run finished"
        );
        Ok(summary)
    }

    fn fail(&mut self, error: RunError<E>) -> Option<Result<PageOutcome, RunError<E>>> {
        self.finished = true;
        Some(Err(error))
    }
}

impl<I, E> Iterator for DiffRun<I>
where
    I: Iterator<Item = Result<Vec<ResultSet>, E>>,
{
    type Item = Result<PageOutcome, RunError<E>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let page = self.next_page;
        let sources = match self.pages.next() {
            None => {
                self.finished = true;
                return None;
            }
            Some(Err(source)) => return self.fail(RunError::Page { page, source }),
            Some(Ok(sources)) => sources,
        };
        self.next_page += 1;

        let expected = *self.source_count.get_or_insert(sources.len());
        if sources.len() != expected {
            return self.fail(
                Error::SourceCountMismatch {
                    expected,
                    actual: sources.len(),
                }
                .into(),
            );
        }

        let result = match diff_all(sources, self.options) {
            Ok(result) => result,
            Err(error) => return self.fail(error.into()),
        };
        tracing::debug!(page, diff_rows = result.diff_row_count, "page diffed");

        if self.policy == RunPolicy::StopOnFirstDivergence && !result.is_identical() {
            tracing::debug!(page, "stopping run at first divergent page");
            self.stopped_by_policy = true;
            self.finished = true;
        }
        Some(Ok(PageOutcome { page, result }))
    }
}
