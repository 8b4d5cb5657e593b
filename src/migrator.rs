use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240401_000001_create_companies_table::Migration),
            Box::new(m20240401_000002_create_profiles_table::Migration),
            Box::new(m20240401_000003_create_orders_table::Migration),
            Box::new(m20240401_000004_create_suppliers_table::Migration),
            Box::new(m20240401_000005_create_purchase_orders_table::Migration),
            Box::new(m20240401_000006_create_activity_log_table::Migration),
            Box::new(m20240401_000007_create_order_updates_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240401_000001_create_companies_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240401_000001_create_companies_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Companies::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Companies::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Companies::Name).string().not_null())
                        .col(ColumnDef::new(Companies::ContactEmail).string())
                        .col(ColumnDef::new(Companies::Phone).string())
                        .col(ColumnDef::new(Companies::Address).string())
                        .col(
                            ColumnDef::new(Companies::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Companies::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Companies::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Companies {
        Table,
        Id,
        Name,
        ContactEmail,
        Phone,
        Address,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240401_000002_create_profiles_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240401_000002_create_profiles_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Profiles::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Profiles::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Profiles::CompanyId).uuid())
                        .col(ColumnDef::new(Profiles::Email).string().not_null())
                        .col(ColumnDef::new(Profiles::FullName).string())
                        .col(ColumnDef::new(Profiles::Role).string().not_null())
                        .col(
                            ColumnDef::new(Profiles::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Profiles::UpdatedAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_profiles_company")
                                .from(Profiles::Table, Profiles::CompanyId)
                                .to(Companies::Table, Companies::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Profiles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Profiles {
        Table,
        Id,
        CompanyId,
        Email,
        FullName,
        Role,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Companies {
        Table,
        Id,
    }
}

mod m20240401_000003_create_orders_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240401_000003_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Orders::OrderNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Orders::CompanyId).uuid().not_null())
                        .col(ColumnDef::new(Orders::CreatedBy).uuid().not_null())
                        .col(ColumnDef::new(Orders::Title).string().not_null())
                        .col(ColumnDef::new(Orders::Description).text())
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(ColumnDef::new(Orders::ProgressStage).string())
                        .col(ColumnDef::new(Orders::DeliveryAddress).string())
                        .col(ColumnDef::new(Orders::DueDate).date())
                        .col(ColumnDef::new(Orders::Amount).decimal_len(12, 2))
                        .col(
                            ColumnDef::new(Orders::IsArchived)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp_with_time_zone())
                        .col(ColumnDef::new(Orders::Version).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_company")
                                .from(Orders::Table, Orders::CompanyId)
                                .to(Companies::Table, Companies::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_created_by")
                                .from(Orders::Table, Orders::CreatedBy)
                                .to(Profiles::Table, Profiles::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_orders_company")
                        .table(Orders::Table)
                        .col(Orders::CompanyId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Orders {
        Table,
        Id,
        OrderNumber,
        CompanyId,
        CreatedBy,
        Title,
        Description,
        Status,
        ProgressStage,
        DeliveryAddress,
        DueDate,
        Amount,
        IsArchived,
        CreatedAt,
        UpdatedAt,
        Version,
    }

    #[derive(DeriveIden)]
    enum Companies {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Profiles {
        Table,
        Id,
    }
}

mod m20240401_000004_create_suppliers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240401_000004_create_suppliers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Suppliers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::ContactName).string())
                        .col(ColumnDef::new(Suppliers::Email).string())
                        .col(ColumnDef::new(Suppliers::Phone).string())
                        .col(ColumnDef::new(Suppliers::Address).string())
                        .col(ColumnDef::new(Suppliers::Notes).string())
                        .col(
                            ColumnDef::new(Suppliers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Suppliers::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Suppliers {
        Table,
        Id,
        Name,
        ContactName,
        Email,
        Phone,
        Address,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240401_000005_create_purchase_orders_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240401_000005_create_purchase_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderPurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderPurchaseOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderPurchaseOrders::OrderId).uuid().not_null())
                        .col(
                            ColumnDef::new(OrderPurchaseOrders::SupplierId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderPurchaseOrders::PoNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderPurchaseOrders::Amount).decimal_len(12, 2))
                        .col(ColumnDef::new(OrderPurchaseOrders::Description).string())
                        .col(
                            ColumnDef::new(OrderPurchaseOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_purchase_orders_order")
                                .from(OrderPurchaseOrders::Table, OrderPurchaseOrders::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_purchase_orders_supplier")
                                .from(OrderPurchaseOrders::Table, OrderPurchaseOrders::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_order_purchase_orders_order")
                        .table(OrderPurchaseOrders::Table)
                        .col(OrderPurchaseOrders::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderPurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum OrderPurchaseOrders {
        Table,
        Id,
        OrderId,
        SupplierId,
        PoNumber,
        Amount,
        Description,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
    }
}

mod m20240401_000006_create_activity_log_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240401_000006_create_activity_log_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderActivityLog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderActivityLog::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderActivityLog::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderActivityLog::ActorId).uuid())
                        .col(ColumnDef::new(OrderActivityLog::Action).string().not_null())
                        .col(ColumnDef::new(OrderActivityLog::Detail).string())
                        .col(
                            ColumnDef::new(OrderActivityLog::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_activity_log_order")
                                .from(OrderActivityLog::Table, OrderActivityLog::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_order_activity_log_order")
                        .table(OrderActivityLog::Table)
                        .col(OrderActivityLog::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderActivityLog::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum OrderActivityLog {
        Table,
        Id,
        OrderId,
        ActorId,
        Action,
        Detail,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
    }
}

mod m20240401_000007_create_order_updates_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240401_000007_create_order_updates_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderUpdates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderUpdates::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderUpdates::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderUpdates::AuthorId).uuid().not_null())
                        .col(ColumnDef::new(OrderUpdates::Body).text().not_null())
                        .col(
                            ColumnDef::new(OrderUpdates::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_updates_order")
                                .from(OrderUpdates::Table, OrderUpdates::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderUpdates::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum OrderUpdates {
        Table,
        Id,
        OrderId,
        AuthorId,
        Body,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
    }
}
