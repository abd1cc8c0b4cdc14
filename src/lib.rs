//! Substring search with the Knuth-Morris-Pratt algorithm.
//!
//! [`find_first`] is the one-shot entry point. [`Kmp`] keeps a pattern together with its
//! failure table so the table is built once and reused across many texts, and doubles as a
//! [`grep::matcher::Matcher`] for byte patterns. [`Hits`] applies it to files on disk.

use std::{
    io,
    ops::Range,
    path::{Path, PathBuf},
};

use log::{debug, warn};

mod kmp;

pub use kmp::{build_failure_table, find_first, scan};

/// A pattern paired with its failure table.
///
/// Never mutated after construction, so a single `Kmp` can be shared between threads
/// searching different texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kmp<T> {
    pattern: Vec<T>,
    table: Vec<usize>,
}

impl<T: PartialEq> Kmp<T> {
    pub fn new(pattern: impl Into<Vec<T>>) -> Self {
        let pattern = pattern.into();
        let table = build_failure_table(&pattern);
        Self { pattern, table }
    }

    /// Start of the first occurrence of the pattern in `text`.
    pub fn find(&self, text: &[T]) -> Option<usize> {
        scan(text, &self.pattern, &self.table)
    }

    pub fn pattern(&self) -> &[T] {
        &self.pattern
    }

    pub fn table(&self) -> &[usize] {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

impl grep::matcher::Matcher for Kmp<u8> {
    type Captures = grep::matcher::NoCaptures;

    type Error = grep::matcher::NoError;

    fn find_at(
        &self,
        haystack: &[u8],
        at: usize,
    ) -> Result<Option<grep::matcher::Match>, Self::Error> {
        if self.is_empty() {
            return Ok(None);
        }
        let Some(rest) = haystack.get(at..) else {
            return Ok(None);
        };
        Ok(self
            .find(rest)
            .map(|idx| grep::matcher::Match::new(at + idx, at + idx + self.len())))
    }

    fn new_captures(&self) -> Result<Self::Captures, Self::Error> {
        Ok(grep::matcher::NoCaptures::new())
    }
}

/// First occurrences of a pattern, one per file that contains it.
pub struct Hits {
    pub files: Vec<FileHit>,
}

#[derive(Debug)]
pub struct FileHit {
    pub path: PathBuf,
    /// The offset in bytes from the beginning of the file to the start of the match
    pub offset: usize,
    len: usize,
}

impl FileHit {
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    pub fn read_content(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

impl Hits {
    /// Walks `paths`, honoring ignore files, and records the first occurrence of `pattern` in
    /// every regular file. Files that cannot be read are skipped.
    pub fn collect(pattern: &[u8], paths: &[PathBuf]) -> Result<Self, ignore::Error> {
        let kmp = Kmp::new(pattern);
        let mut files = vec![];
        for root in paths {
            for result in ignore::Walk::new(root) {
                let dir = result?;

                let Some(file_type) = dir.file_type() else {
                    continue;
                };

                if file_type.is_file() {
                    if let Some(hit) = first_in_file(&kmp, dir.path()) {
                        files.push(hit);
                    }
                }
            }
        }
        Ok(Self { files })
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn first_in_file(kmp: &Kmp<u8>, path: &Path) -> Option<FileHit> {
    debug!("searching {}", path.display());
    let mut offset = None;
    let result = grep::searcher::SearcherBuilder::new()
        .multi_line(true)
        .bom_sniffing(false)
        .build()
        .search_path(
            kmp,
            path,
            Sink(|line_offset: u64, lines: &[u8]| {
                // The first occurrence in the file starts inside the first reported line.
                offset = kmp.find(lines).map(|idx| line_offset as usize + idx);
                false
            }),
        );
    if let Err(err) = result {
        warn!("skipping {}: {err}", path.display());
        return None;
    }
    offset.map(|offset| FileHit {
        path: path.to_path_buf(),
        offset,
        len: kmp.len(),
    })
}

struct Sink<F>(F)
where
    F: FnMut(u64, &[u8]) -> bool;

impl<F> grep::searcher::Sink for Sink<F>
where
    F: FnMut(u64, &[u8]) -> bool,
{
    type Error = io::Error;

    fn matched(
        &mut self,
        _searcher: &grep::searcher::Searcher,
        mat: &grep::searcher::SinkMatch<'_>,
    ) -> Result<bool, Self::Error> {
        Ok((self.0)(mat.absolute_byte_offset(), mat.bytes()))
    }
}
