use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create plans table
        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Plans::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Plans::Name).string().not_null())
                    .col(ColumnDef::new(Plans::Description).string())
                    .col(ColumnDef::new(Plans::IsPublic).boolean().not_null().default(false))
                    .col(ColumnDef::new(Plans::CreatorId).big_integer().not_null())
                    .col(ColumnDef::new(Plans::PlanType).string().not_null())
                    .col(ColumnDef::new(Plans::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Plans::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plans_creator_id")
                            .from(Plans::Table, Plans::CreatorId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create plan_participants table
        manager
            .create_table(
                Table::create()
                    .table(PlanParticipants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PlanParticipants::PlanId).big_integer().not_null())
                    .col(ColumnDef::new(PlanParticipants::UserId).big_integer().not_null())
                    .col(ColumnDef::new(PlanParticipants::Role).string_len(16).not_null())
                    .col(ColumnDef::new(PlanParticipants::JoinedAt).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(PlanParticipants::PlanId)
                            .col(PlanParticipants::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plan_participants_plan_id")
                            .from(PlanParticipants::Table, PlanParticipants::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plan_participants_user_id")
                            .from(PlanParticipants::Table, PlanParticipants::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_plan_participants_user_id")
                    .table(PlanParticipants::Table)
                    .col(PlanParticipants::UserId)
                    .to_owned(),
            )
            .await?;

        // Create tasks table
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tasks::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Tasks::PlanId).big_integer().not_null())
                    .col(ColumnDef::new(Tasks::ParentTaskId).big_integer().null())
                    .col(ColumnDef::new(Tasks::Title).string().not_null())
                    .col(ColumnDef::new(Tasks::SortOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(Tasks::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Tasks::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_plan_id")
                            .from(Tasks::Table, Tasks::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_parent_task_id")
                            .from(Tasks::Table, Tasks::ParentTaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_plan_id")
                    .table(Tasks::Table)
                    .col(Tasks::PlanId)
                    .to_owned(),
            )
            .await?;

        // Create task_records table
        manager
            .create_table(
                Table::create()
                    .table(TaskRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TaskRecords::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(TaskRecords::TaskId).big_integer().not_null())
                    .col(ColumnDef::new(TaskRecords::UserId).big_integer().not_null())
                    .col(ColumnDef::new(TaskRecords::CompletionDate).date().not_null())
                    .col(ColumnDef::new(TaskRecords::Count).integer().not_null().default(1))
                    .col(ColumnDef::new(TaskRecords::Note).string())
                    .col(ColumnDef::new(TaskRecords::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_records_task_id")
                            .from(TaskRecords::Table, TaskRecords::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_records_user_id")
                            .from(TaskRecords::Table, TaskRecords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One completion entry per user per task per day
        manager
            .create_index(
                Index::create()
                    .name("idx_task_records_task_user_date")
                    .table(TaskRecords::Table)
                    .col(TaskRecords::TaskId)
                    .col(TaskRecords::UserId)
                    .col(TaskRecords::CompletionDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create task_reminders table
        manager
            .create_table(
                Table::create()
                    .table(TaskReminders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TaskReminders::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(TaskReminders::TaskId).big_integer().not_null())
                    .col(ColumnDef::new(TaskReminders::UserId).big_integer().not_null())
                    .col(ColumnDef::new(TaskReminders::RemindAt).string_len(5).not_null())
                    .col(ColumnDef::new(TaskReminders::Enabled).boolean().not_null().default(true))
                    .col(ColumnDef::new(TaskReminders::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_reminders_task_id")
                            .from(TaskReminders::Table, TaskReminders::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_reminders_user_id")
                            .from(TaskReminders::Table, TaskReminders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaskReminders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaskRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlanParticipants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Plans::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Plans {
    Table,
    Id,
    Name,
    Description,
    IsPublic,
    CreatorId,
    PlanType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PlanParticipants {
    Table,
    PlanId,
    UserId,
    Role,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    PlanId,
    ParentTaskId,
    Title,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TaskRecords {
    Table,
    Id,
    TaskId,
    UserId,
    CompletionDate,
    Count,
    Note,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TaskReminders {
    Table,
    Id,
    TaskId,
    UserId,
    RemindAt,
    Enabled,
    CreatedAt,
}
