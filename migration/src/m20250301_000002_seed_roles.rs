use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (id, display name, description)
const SEED_ROLES: [(&str, &str, &str); 5] = [
    ("ADMIN", "Administrator", "Full access to users and reports"),
    ("REPORT_MANAGER", "Report Manager", "Create and edit report configurations"),
    ("REPORT_ADMIN", "Report Administrator", "Manage dashboard users and role grants"),
    ("REPORT_VIEWER", "Report Viewer", "Read-only access to report configurations"),
    ("REPORT_EXECUTOR", "Report Executor", "Trigger report executions"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Roles::Table)
            .columns([Roles::Id, Roles::Name, Roles::Description, Roles::IsActive]);

        for (id, name, description) in SEED_ROLES {
            insert.values_panic([id.into(), name.into(), description.into(), true.into()]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let ids: Vec<&str> = SEED_ROLES.iter().map(|(id, _, _)| *id).collect();
        let delete = Query::delete()
            .from_table(Roles::Table)
            .and_where(Expr::col(Roles::Id).is_in(ids))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
    Description,
    IsActive,
}
