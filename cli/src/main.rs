use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use lectern::error::AppResult;
use lectern::model::entity::{
    Choice, ChoiceCreate, Course, CourseCreate, Enrollment, EnrollmentCreate, Lecturer,
    LecturerCreate, Lesson, LessonCreate, Module, ModuleCreate, Question, QuestionCreate, Quiz,
    QuizCreate, Student, StudentCreate, UserEntity, UserEntityCreateUpdate, Video, VideoCreate,
};
use lectern::model::{CrudRepository, DatabaseError, DbConnection, Describe, ModelManager};

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the e-learning DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Attach a student profile to a user
    Student {
        #[command(subcommand)]
        action: StudentCommands,
    },

    /// Attach a lecturer profile to a user
    Lecturer {
        #[command(subcommand)]
        action: LecturerCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage videos
    Video {
        #[command(subcommand)]
        action: VideoCommands,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },

    /// Manage quizzes
    Quiz {
        #[command(subcommand)]
        action: QuizCommands,
    },

    /// Manage quiz questions
    Question {
        #[command(subcommand)]
        action: QuestionCommands,
    },

    /// Manage answer choices
    Choice {
        #[command(subcommand)]
        action: ChoiceCommands,
    },

    /// Enroll a student in a course
    Enroll {
        /// Username of the student
        #[arg(long)]
        username: String,
        #[arg(long)]
        course_title: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone_number: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date_of_birth: NaiveDate,
        #[arg(long, default_value_t = false)]
        staff: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum StudentCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        intended: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum LecturerCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        profile_picture: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        /// Username of the owning lecturer
        #[arg(long)]
        lecturer: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        image: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        /// Course title to attach the module to
        #[arg(long)]
        course_title: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// PDF handout
        #[arg(long)]
        resources: String,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

#[derive(Subcommand, Debug)]
pub enum VideoCommands {
    Add {
        /// Module title to attach the video to
        #[arg(long)]
        module_title: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        video: String,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        /// Module title to attach the lesson to
        #[arg(long)]
        module_title: String,
        #[arg(long)]
        title: String,
        /// Path to a Markdown file with lesson content
        #[arg(long)]
        file: String,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

#[derive(Subcommand, Debug)]
pub enum QuizCommands {
    Add {
        /// Lesson title to attach the quiz to
        #[arg(long)]
        lesson_title: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum QuestionCommands {
    Add {
        /// Quiz title to attach the question to
        #[arg(long)]
        quiz_title: String,
        #[arg(long)]
        text: String,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChoiceCommands {
    Add {
        /// Question text to attach the choice to
        #[arg(long)]
        question_text: String,
        #[arg(long)]
        text: String,
        #[arg(long, default_value_t = false)]
        is_correct: bool,
    },
}

/// Missing parents surface as `RowNotFound`, same as a failed `fetch_one`.
fn required<T>(found: Option<T>, what: &str, key: &str) -> AppResult<T> {
    match found {
        Some(value) => Ok(value),
        None => {
            eprintln!("{what} \"{key}\" not found");
            Err(DatabaseError::from(sqlx::Error::RowNotFound).into())
        }
    }
}

async fn report<T: Describe + Sync>(mm: &ModelManager, kind: &str, created: &T) -> AppResult<()> {
    let display = created.describe(mm).await?;
    println!("{kind} created: {display}");
    Ok(())
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => lectern::Config::get_or_init(true)
            .await
            .app()
            .database_uri()
            .to_string(),
    };

    let db_con = DbConnection::connect(&database_url, 2)?;
    let mm = ModelManager::new(db_con);
    mm.migrate().await?;

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add {
                username,
                password,
                first_name,
                last_name,
                email,
                phone_number,
                date_of_birth,
                staff,
            } => {
                let user = UserEntity::create(
                    &mm,
                    UserEntityCreateUpdate {
                        username,
                        password_hash: lectern::auth::hash_password(&password)?,
                        first_name,
                        last_name,
                        email,
                        phone_number,
                        date_of_birth,
                        is_active: None,
                        is_staff: Some(staff),
                    },
                )
                .await?;
                report(&mm, "User", &user).await?;
            }
        },

        Commands::Student { action } => match action {
            StudentCommands::Add { username, intended } => {
                let user = required(
                    UserEntity::find_by_username(&mm, &username).await?,
                    "user",
                    &username,
                )?;
                let student = Student::create(
                    &mm,
                    StudentCreate {
                        user_id: user.id(),
                        intended,
                    },
                )
                .await?;
                report(&mm, "Student", &student).await?;
            }
        },

        Commands::Lecturer { action } => match action {
            LecturerCommands::Add {
                username,
                bio,
                profile_picture,
            } => {
                let user = required(
                    UserEntity::find_by_username(&mm, &username).await?,
                    "user",
                    &username,
                )?;
                let lecturer = Lecturer::create(
                    &mm,
                    LecturerCreate {
                        user_id: user.id(),
                        bio,
                        profile_picture,
                    },
                )
                .await?;
                report(&mm, "Lecturer", &lecturer).await?;
            }
        },

        Commands::Course { action } => match action {
            CourseCommands::Add {
                lecturer,
                title,
                description,
                image,
            } => {
                let owner = required(
                    Lecturer::find_by_username(&mm, &lecturer).await?,
                    "lecturer",
                    &lecturer,
                )?;
                let course = Course::create(
                    &mm,
                    CourseCreate {
                        title,
                        description,
                        image,
                        created_by: owner.id(),
                    },
                )
                .await?;
                report(&mm, "Course", &course).await?;
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::Add {
                course_title,
                title,
                description,
                resources,
                order_index,
            } => {
                let course = required(
                    Course::find_by_title(&mm, &course_title).await?,
                    "course",
                    &course_title,
                )?;
                let module = Module::create(
                    &mm,
                    ModuleCreate {
                        course_id: course.id(),
                        title,
                        description,
                        resources,
                        order_index,
                    },
                )
                .await?;
                report(&mm, "Module", &module).await?;
            }
        },

        Commands::Video { action } => match action {
            VideoCommands::Add {
                module_title,
                title,
                video,
                order_index,
            } => {
                let module = required(
                    Module::find_by_title(&mm, &module_title).await?,
                    "module",
                    &module_title,
                )?;
                let video = Video::create(
                    &mm,
                    VideoCreate {
                        module_id: module.id(),
                        title,
                        video,
                        order_index,
                    },
                )
                .await?;
                report(&mm, "Video", &video).await?;
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add {
                module_title,
                title,
                file,
                order_index,
            } => {
                let module = required(
                    Module::find_by_title(&mm, &module_title).await?,
                    "module",
                    &module_title,
                )?;
                let content = std::fs::read_to_string(file)?;
                let lesson = Lesson::create(
                    &mm,
                    LessonCreate {
                        module_id: module.id(),
                        title,
                        content,
                        order_index,
                    },
                )
                .await?;
                report(&mm, "Lesson", &lesson).await?;
            }
        },

        Commands::Quiz { action } => match action {
            QuizCommands::Add {
                lesson_title,
                title,
                description,
            } => {
                let lesson = required(
                    Lesson::find_by_title(&mm, &lesson_title).await?,
                    "lesson",
                    &lesson_title,
                )?;
                let quiz = Quiz::create(
                    &mm,
                    QuizCreate {
                        lesson_id: lesson.id(),
                        title,
                        description,
                    },
                )
                .await?;
                report(&mm, "Quiz", &quiz).await?;
            }
        },

        Commands::Question { action } => match action {
            QuestionCommands::Add {
                quiz_title,
                text,
                order_index,
            } => {
                let quiz = required(
                    Quiz::find_by_title(&mm, &quiz_title).await?,
                    "quiz",
                    &quiz_title,
                )?;
                let question = Question::create(
                    &mm,
                    QuestionCreate {
                        quiz_id: quiz.id(),
                        text,
                        order_index,
                    },
                )
                .await?;
                report(&mm, "Question", &question).await?;
            }
        },

        Commands::Choice { action } => match action {
            ChoiceCommands::Add {
                question_text,
                text,
                is_correct,
            } => {
                let question = required(
                    Question::find_by_text(&mm, &question_text).await?,
                    "question",
                    &question_text,
                )?;
                let choice = Choice::create(
                    &mm,
                    ChoiceCreate {
                        question_id: question.id(),
                        text,
                        is_correct: Some(is_correct),
                    },
                )
                .await?;
                report(&mm, "Choice", &choice).await?;
            }
        },

        Commands::Enroll {
            username,
            course_title,
        } => {
            let student = required(
                Student::find_by_username(&mm, &username).await?,
                "student",
                &username,
            )?;
            let course = required(
                Course::find_by_title(&mm, &course_title).await?,
                "course",
                &course_title,
            )?;
            let enrollment = Enrollment::create(
                &mm,
                EnrollmentCreate {
                    student_id: student.id(),
                    course_id: course.id(),
                    progress: None,
                },
            )
            .await?;
            report(&mm, "Enrollment", &enrollment).await?;
        }
    }

    Ok(())
}
