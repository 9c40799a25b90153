mod user;
pub use user::{UserEntity, UserEntityCreateUpdate, normalize_email};

mod student;
pub use student::{Student, StudentCreate};

mod lecturer;
pub use lecturer::{Lecturer, LecturerCreate};

mod course;
pub use course::{Course, CourseCreate};

mod module;
pub use module::{Module, ModuleCreate, ModuleOutlineRow};

mod video;
pub use video::{Video, VideoCreate};

mod lesson;
pub use lesson::{Lesson, LessonCreate};

mod enrollment;
pub use enrollment::{Enrollment, EnrollmentCreate, EnrollmentDetailRow};

mod quiz;
pub use quiz::{Quiz, QuizCreate};

mod question;
pub use question::{Question, QuestionCreate};

mod choice;
pub use choice::{Choice, ChoiceCreate};

mod quiz_result;
pub use quiz_result::{QuizResult, QuizResultCreate, QuizResultDetailRow};

mod course_like;
pub use course_like::{CourseLike, CourseLikeCreate, CourseLikeDetailRow};

mod wishlist;
pub use wishlist::{Wishlist, WishlistCreate, WishlistDetailRow};
