use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Seeded catalog: (id, name, code, resource, action)
const PERMISSIONS: &[(i64, &str, &str, &str, &str)] = &[
    (1, "Read users", "user:read", "user", "read"),
    (2, "Update users", "user:update", "user", "update"),
    (3, "Delete users", "user:delete", "user", "delete"),
    (4, "Read roles", "role:read", "role", "read"),
    (5, "Manage roles", "role:manage", "role", "manage"),
    (6, "Read plans", "plan:read", "plan", "read"),
    (7, "Manage plans", "plan:manage", "plan", "manage"),
    (8, "Read tasks", "task:read", "task", "read"),
    (9, "Manage tasks", "task:manage", "task", "manage"),
];

const SUPER_ADMIN_ROLE_ID: i64 = 1;
const USER_ROLE_ID: i64 = 2;

// Permission ids granted to the seeded "user" role
const USER_ROLE_PERMISSION_IDS: &[i64] = &[1, 4, 6, 8];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Insert permission catalog
        for (id, name, code, resource, action) in PERMISSIONS {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(Permissions::Table)
                        .columns([
                            Permissions::Id,
                            Permissions::Name,
                            Permissions::Code,
                            Permissions::Resource,
                            Permissions::Action,
                            Permissions::CreatedAt,
                        ])
                        .values_panic([
                            (*id).into(),
                            (*name).into(),
                            (*code).into(),
                            (*resource).into(),
                            (*action).into(),
                            0.into(),
                        ])
                        .to_owned(),
                )
                .await?;
        }

        // Insert system roles
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(Roles::Table)
                    .columns([
                        Roles::Id,
                        Roles::Name,
                        Roles::Code,
                        Roles::Description,
                        Roles::IsSystem,
                        Roles::CreatedAt,
                        Roles::UpdatedAt,
                    ])
                    .values_panic([
                        SUPER_ADMIN_ROLE_ID.into(),
                        "Super Administrator".into(),
                        "super_admin".into(),
                        "Full platform access".into(),
                        true.into(),
                        0.into(),
                        0.into(),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(
                Query::insert()
                    .into_table(Roles::Table)
                    .columns([
                        Roles::Id,
                        Roles::Name,
                        Roles::Code,
                        Roles::Description,
                        Roles::IsSystem,
                        Roles::CreatedAt,
                        Roles::UpdatedAt,
                    ])
                    .values_panic([
                        USER_ROLE_ID.into(),
                        "User".into(),
                        "user".into(),
                        "Default role for registered users".into(),
                        true.into(),
                        0.into(),
                        0.into(),
                    ])
                    .to_owned(),
            )
            .await?;

        // super_admin holds every permission, user the read-only subset
        for (id, _, _, _, _) in PERMISSIONS {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(RolePermissions::Table)
                        .columns([RolePermissions::RoleId, RolePermissions::PermissionId])
                        .values_panic([SUPER_ADMIN_ROLE_ID.into(), (*id).into()])
                        .to_owned(),
                )
                .await?;
        }

        for id in USER_ROLE_PERMISSION_IDS {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(RolePermissions::Table)
                        .columns([RolePermissions::RoleId, RolePermissions::PermissionId])
                        .values_panic([USER_ROLE_ID.into(), (*id).into()])
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(RolePermissions::Table)
                    .and_where(
                        Expr::col(RolePermissions::RoleId)
                            .is_in([SUPER_ADMIN_ROLE_ID, USER_ROLE_ID]),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Roles::Table)
                    .and_where(Expr::col(Roles::Id).is_in([SUPER_ADMIN_ROLE_ID, USER_ROLE_ID]))
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Permissions::Table)
                    .and_where(
                        Expr::col(Permissions::Id)
                            .is_in(PERMISSIONS.iter().map(|p| p.0).collect::<Vec<_>>()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
    Code,
    Description,
    IsSystem,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Permissions {
    Table,
    Id,
    Name,
    Code,
    Resource,
    Action,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RolePermissions {
    Table,
    RoleId,
    PermissionId,
}
