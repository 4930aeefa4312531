use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::{
    error::{AppError, AppResult},
    models::{course, CategoryFilter, Course},
};

/// Ordered, immutable course table
///
/// Row positions are the join key into the similarity index, so rows are never reordered.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
}

/// Header positions of the known columns
struct ColumnMap {
    title: Option<usize>,
    category: Option<usize>,
    sub_category: Option<usize>,
    skills: Option<usize>,
    short_intro: Option<usize>,
    duration: Option<usize>,
    rating: Option<usize>,
    url: Option<usize>,
    width: usize,
}

impl ColumnMap {
    fn new(headers: &StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|h| h == name);
        Self {
            title: position(course::TITLE),
            category: position(course::CATEGORY),
            sub_category: position(course::SUB_CATEGORY),
            skills: position(course::SKILLS),
            short_intro: position(course::SHORT_INTRO),
            duration: position(course::DURATION),
            rating: position(course::RATING),
            url: position(course::URL),
            width: headers.len(),
        }
    }

    fn course(&self, record: &StringRecord) -> Course {
        let field = |column: Option<usize>| {
            column
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };
        Course {
            title: field(self.title),
            category: field(self.category),
            sub_category: field(self.sub_category),
            skills: field(self.skills),
            short_intro: field(self.short_intro),
            duration: field(self.duration),
            rating: field(self.rating),
            url: field(self.url),
        }
    }
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// Loads the catalog, degrading to an empty one when the source is unusable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_from_path(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Catalog could not be read, continuing with an empty catalog"
                );
                Self::default()
            }
        }
    }

    pub fn try_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| AppError::EmptySource(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(file)
    }

    /// Parses catalog CSV, skipping rows that cannot be parsed
    ///
    /// Short rows are padded with empty fields; rows wider than the header are dropped.
    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| AppError::EmptySource(format!("unreadable header: {}", e)))?
            .clone();
        let columns = ColumnMap::new(&headers);

        let mut courses = Vec::new();
        let mut skipped = 0usize;

        for (line, result) in reader.records().enumerate() {
            match result {
                Ok(record) if record.len() <= columns.width => {
                    courses.push(columns.course(&record));
                }
                Ok(record) => {
                    tracing::debug!(
                        row = line + 1,
                        fields = record.len(),
                        expected = columns.width,
                        "Skipping catalog row with too many fields"
                    );
                    skipped += 1;
                }
                Err(e) => {
                    tracing::debug!(row = line + 1, error = %e, "Skipping malformed catalog row");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, loaded = courses.len(), "Skipped malformed catalog rows");
        }
        tracing::info!(courses = courses.len(), "Catalog loaded");

        Ok(Self { courses })
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Course> {
        self.courses.get(row)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Row indices passing the filter, in catalog order
    pub fn rows_matching(&self, filter: &CategoryFilter) -> Vec<usize> {
        self.courses
            .iter()
            .enumerate()
            .filter(|(_, course)| filter.matches(course))
            .map(|(row, _)| row)
            .collect()
    }

    /// Distinct non-empty categories in first-appearance order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.courses
            .iter()
            .map(|course| course.category.as_str())
            .filter(|category| !category.is_empty() && seen.insert(*category))
            .collect()
    }
}
