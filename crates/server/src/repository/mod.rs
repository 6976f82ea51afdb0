mod assignment_repository;
mod class_repository;
mod enrollment_repository;
mod progress_repository;
mod submission_repository;
mod syllabus_repository;
mod user_repository;

pub use assignment_repository::{
    AssignmentRecord, AssignmentRepository, NewAssignment, SeaOrmAssignmentRepository,
};
pub use class_repository::{
    ClassChanges, ClassRecord, ClassRepository, ClassTotals, NewClass, SeaOrmClassRepository,
};
pub use enrollment_repository::{
    EnrolledUserRecord, EnrollmentRecord, EnrollmentRepository, SeaOrmEnrollmentRepository,
};
pub use progress_repository::{
    ProgressRecord, ProgressRepository, SeaOrmProgressRepository,
};
pub use submission_repository::{
    GradeSubmission, NewSubmission, SeaOrmSubmissionRepository, SubmissionRecord,
    SubmissionRepository, SubmitterRecord,
};
pub use syllabus_repository::{
    MaterialRecord, MaterialTree, ModuleRecord, NewModule, SeaOrmSyllabusRepository,
    SyllabusRepository,
};
pub use user_repository::{NewUser, SeaOrmUserRepository, UserRecord, UserRepository};

use anyhow::anyhow;
use chrono::{NaiveDateTime, Utc};
use classroom_core::domain::UserId;
use sea_orm::sea_query::{InsertStatement, IntoIden, SelectStatement};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, SqlErr};
use std::str::FromStr;
use tracing::warn;

use crate::error::AppError;

/// Translates constraint violations raised by an insert into domain errors.
/// Anything else stays a database error.
pub(crate) fn classify_insert_error(
    err: DbErr,
    on_unique: impl FnOnce() -> AppError,
    on_foreign_key: impl FnOnce() -> AppError,
) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            warn!(detail = %detail, "unique constraint violated");
            on_unique()
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            warn!(detail = %detail, "foreign key constraint violated");
            on_foreign_key()
        }
        _ => AppError::Database(err),
    }
}

/// Inserts the rows produced by `select` in one statement and returns the new
/// serial id, or `None` when `select` matched nothing.
pub(crate) async fn insert_select_id(
    db: &DatabaseConnection,
    mut insert: InsertStatement,
    select: SelectStatement,
    id_column: impl IntoIden,
) -> Result<Option<i64>, DbErr> {
    insert
        .select_from(select)
        .map_err(|e| DbErr::Custom(format!("malformed insert from select: {e}")))?;

    let backend = db.get_database_backend();
    if backend.support_returning() {
        insert.returning_col(id_column.into_iden());
        let row = db.query_one(backend.build(&insert)).await?;
        return row.map(|row| row.try_get_by_index::<i64>(0)).transpose();
    }

    let result = db.execute(backend.build(&insert)).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    i64::try_from(result.last_insert_id())
        .map(Some)
        .map_err(|e| DbErr::Custom(format!("inserted id out of range: {e}")))
}

pub(crate) fn parse_user_id(column: &str, value: &str) -> anyhow::Result<UserId> {
    UserId::from_str(value).map_err(|e| anyhow!("invalid {column} '{value}' from database: {e}"))
}

pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
