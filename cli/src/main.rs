use clap::{Parser, Subcommand};
use syllabus::model::entity::{Course, CourseCreate, Lesson, LessonCreate, Module, ModuleCreate};
use syllabus::model::{
    CrudRepository, DEFAULT_MAX_CONNECTIONS, DatabaseError, DbConnection, ModelManager,
};
use syllabus::ordering::{OrderError, SiblingLevel};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("ordering error: {0}")]
    OrderError(#[from] OrderError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("no row in {table} titled {title:?}")]
    TitleNotFound { table: String, title: String },
    #[error("{count} rows in {table} are titled {title:?}, pass a unique title")]
    AmbiguousTitle {
        table: String,
        title: String,
        count: usize,
    },
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling and repairing the course catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
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

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },

    /// Renumber every module and lesson to 0..N-1, keeping the current relative order
    Normalize,
}

/// Course management
#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
}

/// Module management
#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        /// Course title to attach the module to
        #[arg(long)]
        course_title: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Appended when omitted
        #[arg(long)]
        order_index: Option<i32>,
    },
    Move {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        order_index: i32,
        /// Move into this course
        #[arg(long)]
        course_id: Option<Uuid>,
    },
}

/// Lesson management
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
        file: Option<String>,
        /// Appended when omitted
        #[arg(long)]
        order_index: Option<i32>,
    },
    Move {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        order_index: i32,
        /// Move into this module
        #[arg(long)]
        module_id: Option<Uuid>,
    },
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

async fn id_by_title(mm: &ModelManager, table: &str, title: &str) -> CliResult<Uuid> {
    let ids: Vec<Uuid> = sqlx::query_scalar(&format!("SELECT id FROM {table} WHERE title = $1"))
        .bind(title)
        .fetch_all(mm.executor())
        .await
        .map_err(DatabaseError::SqlxError)?;
    single_id(table, title, ids)
}

/// Titles are not unique, so a lookup only succeeds on exactly one match.
fn single_id(table: &str, title: &str, ids: Vec<Uuid>) -> CliResult<Uuid> {
    match ids.as_slice() {
        [id] => Ok(*id),
        [] => Err(CliError::TitleNotFound {
            table: table.to_string(),
            title: title.to_string(),
        }),
        _ => Err(CliError::AmbiguousTitle {
            table: table.to_string(),
            title: title.to_string(),
            count: ids.len(),
        }),
    }
}

async fn all_ids(mm: &ModelManager, table: &str) -> Result<Vec<Uuid>, DatabaseError> {
    sqlx::query_scalar(&format!("SELECT id FROM {table}"))
        .fetch_all(mm.executor())
        .await
        .map_err(DatabaseError::SqlxError)
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").map_err(std::io::Error::other)?;
    let db_con = DbConnection::connect(&database_url, DEFAULT_MAX_CONNECTIONS)?;
    let mm = ModelManager::new(db_con);

    match args.command {
        Commands::Course { action } => match action {
            CourseCommands::Add { title, description } => {
                let course = Course::create(
                    &mm,
                    CourseCreate {
                        title,
                        description,
                        thumbnail_url: None,
                        cover_url: None,
                    },
                )
                .await?;
                println!("Course created: {:?}", course);
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::Add {
                course_title,
                title,
                description,
                order_index,
            } => {
                let course_id = id_by_title(&mm, "courses", &course_title).await?;
                let module = Module::create(
                    &mm,
                    ModuleCreate {
                        course_id,
                        title,
                        description,
                        thumbnail_url: None,
                        cover_url: None,
                        order_index,
                    },
                )
                .await?;
                println!("Module created: {:?}", module);
            }
            ModuleCommands::Move {
                id,
                order_index,
                course_id,
            } => {
                let module = Module::move_to(&mm, id, order_index, course_id).await?;
                println!("Module moved: {:?}", module);
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add {
                module_title,
                title,
                file,
                order_index,
            } => {
                let module_id = id_by_title(&mm, "modules", &module_title).await?;
                let content = file.map(std::fs::read_to_string).transpose()?;
                let lesson = Lesson::create(
                    &mm,
                    LessonCreate {
                        module_id,
                        title,
                        description: None,
                        content,
                        video_url: None,
                        embed_url: None,
                        thumbnail_url: None,
                        material_url: None,
                        duration: None,
                        order_index,
                    },
                )
                .await?;
                println!("Lesson created: {:?}", lesson);
            }
            LessonCommands::Move {
                id,
                order_index,
                module_id,
            } => {
                let lesson = Lesson::move_to(&mm, id, order_index, module_id).await?;
                println!("Lesson moved: {:?}", lesson);
            }
            LessonCommands::Delete { id } => {
                let removed = mm
                    .ordering()
                    .delete_and_compact(SiblingLevel::Lesson, id)
                    .await?;
                println!("Lesson deleted: {:?}", removed);
            }
        },

        Commands::Normalize => {
            let mut rewritten = 0;
            for course_id in all_ids(&mm, "courses").await? {
                rewritten += mm.ordering().normalize(SiblingLevel::Module, course_id).await?;
            }
            for module_id in all_ids(&mm, "modules").await? {
                rewritten += mm.ordering().normalize(SiblingLevel::Lesson, module_id).await?;
            }
            println!("Positions rewritten: {rewritten}");
        }
    }

    Ok(())
}
