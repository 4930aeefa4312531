pub mod course;
pub mod rule;

pub use course::{split_skills, CategoryFilter, Course, CourseRecord, ALL_CATEGORIES};
pub use rule::AssociationRule;
