mod course;
pub use course::{Course, CourseCreate, CourseSummaryRow};

mod module;
pub use module::{Module, ModuleCreate, ModuleWithCourseRow};

mod lesson;
pub use lesson::{Lesson, LessonCreate};

mod stats;
pub use stats::{CatalogStats, CoursesPerMonth, ModulesPerCourse};
