use serde::{Deserialize, Serialize};

/// Catalog column names, in source order
pub const TITLE: &str = "Title";
pub const CATEGORY: &str = "Category";
pub const SUB_CATEGORY: &str = "Sub-Category";
pub const SKILLS: &str = "Skills";
pub const SHORT_INTRO: &str = "Short Intro";
pub const DURATION: &str = "Duration";
pub const RATING: &str = "Rating";
pub const URL: &str = "URL";

/// Category value that disables filtering
pub const ALL_CATEGORIES: &str = "All";

/// A single course row from the catalog
///
/// Every field is always present; values missing from the source are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Course {
    pub title: String,
    pub category: String,
    pub sub_category: String,
    pub skills: String,
    pub short_intro: String,
    pub duration: String,
    pub rating: String,
    pub url: String,
}

impl Course {
    /// Text fed to the similarity index
    pub fn combined_text(&self) -> String {
        [
            self.title.as_str(),
            self.category.as_str(),
            self.sub_category.as_str(),
            self.skills.as_str(),
            self.short_intro.as_str(),
        ]
        .join(" ")
    }

    /// Trimmed, non-empty skill tags in source order
    pub fn skill_tags(&self) -> impl Iterator<Item = &str> {
        split_skills(&self.skills)
    }

    pub fn to_record(&self) -> CourseRecord {
        CourseRecord::from(self)
    }
}

/// Splits a comma-separated skill list, dropping empty tags
pub fn split_skills(skills: &str) -> impl Iterator<Item = &str> {
    skills.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Course projection returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Sub-Category")]
    pub sub_category: String,
    #[serde(rename = "Skills")]
    pub skills: String,
    #[serde(rename = "Short Intro")]
    pub short_intro: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "URL")]
    pub url: String,
}

impl From<&Course> for CourseRecord {
    fn from(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            category: course.category.clone(),
            sub_category: course.sub_category.clone(),
            skills: course.skills.clone(),
            short_intro: course.short_intro.clone(),
            duration: course.duration.clone(),
            url: course.url.clone(),
        }
    }
}

/// Category restriction applied to a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Exact(String),
}

impl CategoryFilter {
    /// Absent, empty and "All" all mean no filtering
    pub fn from_param(category: Option<&str>) -> Self {
        match category {
            None | Some("") | Some(ALL_CATEGORIES) => CategoryFilter::All,
            Some(name) => CategoryFilter::Exact(name.to_string()),
        }
    }

    /// Case-sensitive exact match on the Category field
    pub fn matches(&self, course: &Course) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(name) => course.category == *name,
        }
    }
}
