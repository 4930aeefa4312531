use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use crate::{
    error::{AppError, AppResult, LookupScope},
    models::{split_skills, CategoryFilter, Course, CourseRecord},
    services::{
        rule_table::RuleTable,
        similarity::{SimilarityIndex, TitleIndex},
    },
    sources::{read_rules_from_path, Catalog},
};

/// Files the engine is built from
#[derive(Debug, Clone)]
pub struct EngineSources {
    pub catalog_path: PathBuf,
    pub rules_path: PathBuf,
}

/// Course recommender over an immutable catalog
///
/// Built once and shared by reference; no query mutates it or performs I/O.
///
/// Two strategies are offered:
/// - [`RecommendationEngine::recommend`]: TF-IDF content similarity, best match first
/// - [`RecommendationEngine::recommend_with_apriori`]: skill expansion through mined rules,
///   returned in catalog order
#[derive(Debug)]
pub struct RecommendationEngine {
    catalog: Catalog,
    index: SimilarityIndex,
    titles: TitleIndex,
    rules: Option<RuleTable>,
}

impl RecommendationEngine {
    pub fn new(catalog: Catalog, rules: Option<RuleTable>) -> Self {
        let start = Instant::now();

        let documents: Vec<String> = catalog.courses().iter().map(Course::combined_text).collect();
        let index = SimilarityIndex::build(&documents);
        let titles = TitleIndex::build(
            catalog
                .courses()
                .iter()
                .enumerate()
                .map(|(row, course)| (row, course.title.as_str())),
        );

        tracing::info!(
            courses = catalog.len(),
            distinct_titles = titles.len(),
            rules = rules.as_ref().map(RuleTable::len),
            build_time_ms = start.elapsed().as_millis(),
            "Recommendation engine ready"
        );

        Self {
            catalog,
            index,
            titles,
            rules,
        }
    }

    /// Loads the catalog and rules from disk
    ///
    /// An unreadable catalog becomes an empty one; an unreadable rules file leaves the
    /// engine without rules.
    pub fn from_sources(sources: &EngineSources) -> Self {
        let catalog = Catalog::load(&sources.catalog_path);
        let rules = match read_rules_from_path(&sources.rules_path) {
            Ok(records) => Some(RuleTable::load(records)),
            Err(e) => {
                tracing::warn!(
                    path = %sources.rules_path.display(),
                    error = %e,
                    "Association rules unavailable"
                );
                None
            }
        };
        Self::new(catalog, rules)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn has_rules(&self) -> bool {
        self.rules.is_some()
    }

    /// Content-similarity recommendations within the category filter
    pub fn recommend(
        &self,
        title: &str,
        top_n: usize,
        category: &CategoryFilter,
    ) -> AppResult<Vec<CourseRecord>> {
        let catalog_row = self
            .titles
            .get(title)
            .ok_or_else(|| AppError::course_not_found(title, LookupScope::Catalog))?;

        let candidates = self.catalog.rows_matching(category);

        let query_row = match category {
            CategoryFilter::All => catalog_row,
            CategoryFilter::Exact(name) => TitleIndex::build(
                candidates
                    .iter()
                    .map(|&row| (row, self.catalog.courses()[row].title.as_str())),
            )
            .get(title)
            .ok_or_else(|| {
                AppError::course_not_found(title, LookupScope::Category(name.clone()))
            })?,
        };

        let ranked = self.index.query(query_row, &candidates, top_n);

        tracing::debug!(
            title,
            candidates = candidates.len(),
            returned = ranked.len(),
            top_score = ranked.first().map(|(_, score)| *score),
            "Content recommendations computed"
        );

        Ok(self.project(ranked.into_iter().map(|(row, _)| row)))
    }

    /// Courses sharing a rule-associated skill with the selected course
    ///
    /// Results are the first `top_n` matches in catalog order, not ranked. An empty result
    /// means no rule fired or nothing matched; it is not an error.
    pub fn recommend_with_apriori(
        &self,
        title: &str,
        top_n: usize,
        category: &CategoryFilter,
    ) -> AppResult<Vec<CourseRecord>> {
        let rules = self.rules.as_ref().ok_or(AppError::RulesNotLoaded)?;

        let course = self
            .titles
            .get(title)
            .and_then(|row| self.catalog.get(row))
            .ok_or_else(|| AppError::course_not_found(title, LookupScope::Catalog))?;

        let associated = rules.expand(course.skill_tags());
        let matches = self
            .catalog
            .courses()
            .iter()
            .enumerate()
            .filter(|(_, candidate)| shares_skill(candidate, &associated))
            .filter(|(_, candidate)| category.matches(candidate))
            .map(|(row, _)| row)
            .take(top_n)
            .collect::<Vec<_>>();

        tracing::debug!(
            title,
            associated_skills = associated.len(),
            returned = matches.len(),
            "Rule-based recommendations computed"
        );

        Ok(self.project(matches))
    }

    /// Distinct non-empty categories in catalog order
    pub fn categories(&self) -> Vec<&str> {
        self.catalog.categories()
    }

    /// Titles inside the filter, catalog order
    pub fn titles_in(&self, category: &CategoryFilter) -> Vec<&str> {
        self.catalog
            .courses()
            .iter()
            .filter(|course| category.matches(course))
            .map(|course| course.title.as_str())
            .collect()
    }

    /// First `top_n` courses inside the filter, catalog order
    pub fn browse(&self, top_n: usize, category: &CategoryFilter) -> Vec<CourseRecord> {
        self.project(self.catalog.rows_matching(category).into_iter().take(top_n))
    }

    fn project<I: IntoIterator<Item = usize>>(&self, rows: I) -> Vec<CourseRecord> {
        rows.into_iter()
            .filter_map(|row| self.catalog.get(row))
            .map(Course::to_record)
            .collect()
    }
}

fn shares_skill(course: &Course, skills: &BTreeSet<String>) -> bool {
    split_skills(&course.skills).any(|tag| skills.contains(tag))
}
