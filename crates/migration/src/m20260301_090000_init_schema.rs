use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(string_len(Users::Id, 36).primary_key())
                    .col(string_len(Users::Name, 100))
                    .col(string_len(Users::Email, 255).unique_key())
                    .col(text_null(Users::ImageUrl))
                    // 'user' | 'teacher' | 'admin', mirrored by Role in app code.
                    .col(
                        string_len(Users::Role, 16)
                            .default("user")
                            .check(Expr::col(Users::Role).is_in(["user", "teacher", "admin"])),
                    )
                    .col(timestamp(Users::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Users::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Class::Table)
                    .if_not_exists()
                    .col(big_integer(Class::Id).auto_increment().primary_key())
                    .col(string_len(Class::CreatorClassId, 36))
                    .col(string_len(Class::Title, 200))
                    .col(text(Class::Description))
                    .col(text_null(Class::Image))
                    .col(text_null(Class::Video))
                    .col(
                        string_len(Class::Status, 16)
                            .check(Expr::col(Class::Status).is_in(["public", "draft"])),
                    )
                    .col(timestamp(Class::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Class::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-class-creator_class_id")
                            .from(Class::Table, Class::CreatorClassId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The composite primary key is what keeps concurrent enrollments of the
        // same pair from both landing.
        manager
            .create_table(
                Table::create()
                    .table(UsersClasses::Table)
                    .if_not_exists()
                    .col(string_len(UsersClasses::UserId, 36))
                    .col(big_integer(UsersClasses::ClassId))
                    .col(
                        string_len(UsersClasses::EnrollmentStatus, 16)
                            .check(Expr::col(UsersClasses::EnrollmentStatus).is_in(["active"])),
                    )
                    .col(timestamp(UsersClasses::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(UsersClasses::UpdatedAt).default(Expr::current_timestamp()))
                    .primary_key(
                        Index::create()
                            .name("pk-users_classes")
                            .col(UsersClasses::UserId)
                            .col(UsersClasses::ClassId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users_classes-user_id")
                            .from(UsersClasses::Table, UsersClasses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users_classes-class_id")
                            .from(UsersClasses::Table, UsersClasses::ClassId)
                            .to(Class::Table, Class::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Materials::Table)
                    .if_not_exists()
                    .col(big_integer(Materials::Id).auto_increment().primary_key())
                    .col(big_integer(Materials::ClassId))
                    .col(string_len(Materials::CreatorMaterialsId, 36))
                    .col(string_len(Materials::Title, 200))
                    .col(timestamp(Materials::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Materials::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-materials-class_id")
                            .from(Materials::Table, Materials::ClassId)
                            .to(Class::Table, Class::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-materials-creator_materials_id")
                            .from(Materials::Table, Materials::CreatorMaterialsId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Modules::Table)
                    .if_not_exists()
                    .col(big_integer(Modules::Id).auto_increment().primary_key())
                    .col(big_integer(Modules::MaterialsId))
                    .col(string_len(Modules::Title, 200))
                    .col(text(Modules::Content))
                    // JSON-encoded string arrays, order preserved.
                    .col(text(Modules::Attachments))
                    .col(text(Modules::Videos))
                    .col(timestamp(Modules::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Modules::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-modules-materials_id")
                            .from(Modules::Table, Modules::MaterialsId)
                            .to(Materials::Table, Materials::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UsersProgress::Table)
                    .if_not_exists()
                    .col(string_len(UsersProgress::UserId, 36))
                    .col(big_integer(UsersProgress::ClassId))
                    .col(big_integer(UsersProgress::MaterialId))
                    .col(big_integer(UsersProgress::ModuleId))
                    .col(
                        string_len(UsersProgress::Status, 16)
                            .check(Expr::col(UsersProgress::Status).is_in(["done"])),
                    )
                    .col(timestamp(UsersProgress::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(UsersProgress::UpdatedAt).default(Expr::current_timestamp()))
                    .primary_key(
                        Index::create()
                            .name("pk-users_progress")
                            .col(UsersProgress::UserId)
                            .col(UsersProgress::ClassId)
                            .col(UsersProgress::ModuleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users_progress-user_id")
                            .from(UsersProgress::Table, UsersProgress::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users_progress-class_id")
                            .from(UsersProgress::Table, UsersProgress::ClassId)
                            .to(Class::Table, Class::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users_progress-material_id")
                            .from(UsersProgress::Table, UsersProgress::MaterialId)
                            .to(Materials::Table, Materials::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users_progress-module_id")
                            .from(UsersProgress::Table, UsersProgress::ModuleId)
                            .to(Modules::Table, Modules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Cached percentage, rewritten after every successful tracking call.
        manager
            .create_table(
                Table::create()
                    .table(UsersClassProgress::Table)
                    .if_not_exists()
                    .col(string_len(UsersClassProgress::UserId, 36))
                    .col(big_integer(UsersClassProgress::ClassId))
                    .col(double(UsersClassProgress::Progress).default(0.0))
                    .col(
                        timestamp(UsersClassProgress::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp(UsersClassProgress::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk-users_class_progress")
                            .col(UsersClassProgress::UserId)
                            .col(UsersClassProgress::ClassId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users_class_progress-user_id")
                            .from(UsersClassProgress::Table, UsersClassProgress::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users_class_progress-class_id")
                            .from(UsersClassProgress::Table, UsersClassProgress::ClassId)
                            .to(Class::Table, Class::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(big_integer(Assignments::Id).auto_increment().primary_key())
                    .col(big_integer(Assignments::ClassId))
                    .col(string_len(Assignments::CreatorAssignmentId, 36))
                    .col(string_len(Assignments::Title, 200))
                    .col(text(Assignments::Description))
                    .col(timestamp_null(Assignments::DueDate))
                    .col(timestamp(Assignments::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Assignments::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assignments-class_id")
                            .from(Assignments::Table, Assignments::ClassId)
                            .to(Class::Table, Class::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assignments-creator_assignment_id")
                            .from(Assignments::Table, Assignments::CreatorAssignmentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(big_integer(Submissions::Id).auto_increment().primary_key())
                    .col(big_integer(Submissions::AssignmentId))
                    .col(string_len(Submissions::StudentId, 36))
                    .col(text(Submissions::Link))
                    .col(
                        string_len(Submissions::Status, 16).check(Expr::col(Submissions::Status).is_in([
                            "not_submit_yet",
                            "submitted",
                            "graded",
                            "revision",
                        ])),
                    )
                    .col(
                        small_integer_null(Submissions::Grade)
                            .check(Expr::col(Submissions::Grade).gte(0))
                            .check(Expr::col(Submissions::Grade).lte(100)),
                    )
                    .col(text_null(Submissions::Feedback))
                    .col(timestamp(Submissions::SubmittedAt).default(Expr::current_timestamp()))
                    .col(timestamp_null(Submissions::GradedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submissions-assignment_id")
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submissions-student_id")
                            .from(Submissions::Table, Submissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_class_creator_class_id")
                    .table(Class::Table)
                    .col(Class::CreatorClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_classes_class_id")
                    .table(UsersClasses::Table)
                    .col(UsersClasses::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_materials_class_id")
                    .table(Materials::Table)
                    .col(Materials::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_modules_materials_id")
                    .table(Modules::Table)
                    .col(Modules::MaterialsId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assignments_class_id")
                    .table(Assignments::Table)
                    .col(Assignments::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_submissions_assignment_student")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UsersClassProgress::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UsersProgress::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Modules::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Materials::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UsersClasses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Class::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    ImageUrl,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Class {
    Table,
    Id,
    CreatorClassId,
    Title,
    Description,
    Image,
    Video,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UsersClasses {
    Table,
    UserId,
    ClassId,
    EnrollmentStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Materials {
    Table,
    Id,
    ClassId,
    CreatorMaterialsId,
    Title,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Modules {
    Table,
    Id,
    MaterialsId,
    Title,
    Content,
    Attachments,
    Videos,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UsersProgress {
    Table,
    UserId,
    ClassId,
    MaterialId,
    ModuleId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UsersClassProgress {
    Table,
    UserId,
    ClassId,
    Progress,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    Table,
    Id,
    ClassId,
    CreatorAssignmentId,
    Title,
    Description,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    Table,
    Id,
    AssignmentId,
    StudentId,
    Link,
    Status,
    Grade,
    Feedback,
    SubmittedAt,
    GradedAt,
}
