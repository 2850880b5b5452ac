use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_users_table::Migration),
            Box::new(m20260101_000002_create_providers_table::Migration),
            Box::new(m20260101_000003_create_clients_table::Migration),
            Box::new(m20260101_000004_create_orders_table::Migration),
            Box::new(m20260101_000005_create_order_items_table::Migration),
            Box::new(m20260101_000006_create_invoices_table::Migration),
            Box::new(m20260101_000007_create_stock_items_table::Migration),
            Box::new(m20260101_000008_create_purchase_orders_table::Migration),
            Box::new(m20260101_000009_create_purchase_order_lines_table::Migration),
            Box::new(m20260101_000010_create_audit_log_table::Migration),
        ]
    }
}

mod m20260101_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(
                            ColumnDef::new(Users::Status)
                                .string()
                                .not_null()
                                .default("Offline"),
                        )
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_role")
                        .table(Users::Table)
                        .col(Users::Role)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Name,
        Email,
        PasswordHash,
        Role,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000002_create_providers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000002_create_providers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Providers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Providers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Providers::Name).string().not_null())
                        .col(
                            ColumnDef::new(Providers::TaxId)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Providers::ContactName).string().null())
                        .col(ColumnDef::new(Providers::ContactEmail).string().null())
                        .col(ColumnDef::new(Providers::ContactPhone).string().null())
                        .col(ColumnDef::new(Providers::SupplyCategories).string().null())
                        .col(ColumnDef::new(Providers::FiscalAddress).string().null())
                        .col(ColumnDef::new(Providers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Providers::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Providers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Providers {
        Table,
        Id,
        Name,
        TaxId,
        ContactName,
        ContactEmail,
        ContactPhone,
        SupplyCategories,
        FiscalAddress,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000003_create_clients_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000003_create_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Clients::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Clients::TaxId).string().not_null())
                        .col(ColumnDef::new(Clients::LegalName).string().not_null())
                        .col(ColumnDef::new(Clients::PersonKind).string().not_null())
                        .col(ColumnDef::new(Clients::ContactName).string().null())
                        .col(ColumnDef::new(Clients::Email).string().null())
                        .col(ColumnDef::new(Clients::Phone).string().null())
                        .col(ColumnDef::new(Clients::Address).string().null())
                        .col(ColumnDef::new(Clients::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Clients::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_clients_tax_id")
                        .table(Clients::Table)
                        .col(Clients::TaxId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Clients {
        Table,
        Id,
        TaxId,
        LegalName,
        PersonKind,
        ContactName,
        Email,
        Phone,
        Address,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000004_create_orders_table {
    use sea_orm_migration::prelude::*;

    use super::m20260101_000001_create_users_table::Users;
    use super::m20260101_000003_create_clients_table::Clients;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000004_create_orders_table"
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
                        .col(ColumnDef::new(Orders::Code).string().not_null().unique_key())
                        .col(ColumnDef::new(Orders::OtCode).string().null().unique_key())
                        .col(ColumnDef::new(Orders::ClientId).uuid().not_null())
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(
                            ColumnDef::new(Orders::BillingStatus)
                                .string()
                                .not_null()
                                .default("Pendiente"),
                        )
                        .col(ColumnDef::new(Orders::Currency).string().not_null())
                        .col(ColumnDef::new(Orders::Total).decimal().not_null().default(0))
                        .col(ColumnDef::new(Orders::Notes).string().null())
                        .col(ColumnDef::new(Orders::PrepressAssignee).uuid().null())
                        .col(ColumnDef::new(Orders::PressAssignee).uuid().null())
                        .col(ColumnDef::new(Orders::PostpressAssignee).uuid().null())
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_client")
                                .from(Orders::Table, Orders::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_prepress_assignee")
                                .from(Orders::Table, Orders::PrepressAssignee)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_press_assignee")
                                .from(Orders::Table, Orders::PressAssignee)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_postpress_assignee")
                                .from(Orders::Table, Orders::PostpressAssignee)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_client_id")
                        .table(Orders::Table)
                        .col(Orders::ClientId)
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
    pub(super) enum Orders {
        Table,
        Id,
        Code,
        OtCode,
        ClientId,
        Status,
        BillingStatus,
        Currency,
        Total,
        Notes,
        PrepressAssignee,
        PressAssignee,
        PostpressAssignee,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000005_create_order_items_table {
    use sea_orm_migration::prelude::*;

    use super::m20260101_000004_create_orders_table::Orders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000005_create_order_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(OrderItems::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderItems::Product).string().not_null())
                        .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                        .col(ColumnDef::new(OrderItems::Specs).string().null())
                        .col(ColumnDef::new(OrderItems::UnitPrice).decimal().not_null())
                        .col(ColumnDef::new(OrderItems::Subtotal).decimal().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_items_order")
                                .from(OrderItems::Table, OrderItems::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_items_order_id")
                        .table(OrderItems::Table)
                        .col(OrderItems::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum OrderItems {
        Table,
        Id,
        OrderId,
        Product,
        Quantity,
        Specs,
        UnitPrice,
        Subtotal,
    }
}

mod m20260101_000006_create_invoices_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000006_create_invoices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Invoices::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Invoices::OtCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Invoices::DocType).string().not_null())
                        .col(ColumnDef::new(Invoices::Number).string().not_null().unique_key())
                        .col(ColumnDef::new(Invoices::ClientName).string().not_null())
                        .col(ColumnDef::new(Invoices::ClientTaxId).string().not_null())
                        .col(ColumnDef::new(Invoices::Subtotal).decimal().not_null())
                        .col(ColumnDef::new(Invoices::Igv).decimal().not_null())
                        .col(ColumnDef::new(Invoices::Total).decimal().not_null())
                        .col(ColumnDef::new(Invoices::Items).json().not_null())
                        .col(ColumnDef::new(Invoices::IssuedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_doc_type")
                        .table(Invoices::Table)
                        .col(Invoices::DocType)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Invoices {
        Table,
        Id,
        OtCode,
        DocType,
        Number,
        ClientName,
        ClientTaxId,
        Subtotal,
        Igv,
        Total,
        Items,
        IssuedAt,
    }
}

mod m20260101_000007_create_stock_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000007_create_stock_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockItems::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(StockItems::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(StockItems::Sku).string().not_null().unique_key())
                        .col(ColumnDef::new(StockItems::Name).string().not_null())
                        .col(ColumnDef::new(StockItems::Category).string().not_null())
                        .col(ColumnDef::new(StockItems::AbcClass).string().not_null())
                        .col(ColumnDef::new(StockItems::UnitPrice).decimal().not_null())
                        .col(
                            ColumnDef::new(StockItems::OnHand)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(StockItems::MinLevel)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(StockItems::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(StockItems::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_items_category")
                        .table(StockItems::Table)
                        .col(StockItems::Category)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum StockItems {
        Table,
        Id,
        Sku,
        Name,
        Category,
        AbcClass,
        UnitPrice,
        OnHand,
        MinLevel,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000008_create_purchase_orders_table {
    use sea_orm_migration::prelude::*;

    use super::m20260101_000002_create_providers_table::Providers;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000008_create_purchase_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::ProviderId).uuid().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Status).string().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Subtotal).decimal().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Igv).decimal().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Total).decimal().not_null())
                        .col(ColumnDef::new(PurchaseOrders::ReceivedAt).timestamp().null())
                        .col(ColumnDef::new(PurchaseOrders::ReceptionNotes).string().null())
                        .col(ColumnDef::new(PurchaseOrders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(PurchaseOrders::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_orders_provider")
                                .from(PurchaseOrders::Table, PurchaseOrders::ProviderId)
                                .to(Providers::Table, Providers::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_status")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PurchaseOrders {
        Table,
        Id,
        Code,
        ProviderId,
        Status,
        Subtotal,
        Igv,
        Total,
        ReceivedAt,
        ReceptionNotes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000009_create_purchase_order_lines_table {
    use sea_orm_migration::prelude::*;

    use super::m20260101_000007_create_stock_items_table::StockItems;
    use super::m20260101_000008_create_purchase_orders_table::PurchaseOrders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000009_create_purchase_order_lines_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrderLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrderLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::PurchaseOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::StockItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::Quantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_order_lines_po")
                                .from(
                                    PurchaseOrderLines::Table,
                                    PurchaseOrderLines::PurchaseOrderId,
                                )
                                .to(PurchaseOrders::Table, PurchaseOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_order_lines_stock_item")
                                .from(PurchaseOrderLines::Table, PurchaseOrderLines::StockItemId)
                                .to(StockItems::Table, StockItems::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_order_lines_po_id")
                        .table(PurchaseOrderLines::Table)
                        .col(PurchaseOrderLines::PurchaseOrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrderLines::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PurchaseOrderLines {
        Table,
        Id,
        PurchaseOrderId,
        StockItemId,
        Description,
        Quantity,
        UnitPrice,
    }
}

mod m20260101_000010_create_audit_log_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000010_create_audit_log_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AuditLog::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(AuditLog::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(AuditLog::Actor).string().not_null())
                        .col(ColumnDef::new(AuditLog::Action).string().not_null())
                        .col(ColumnDef::new(AuditLog::Details).string().not_null())
                        .col(ColumnDef::new(AuditLog::At).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_audit_log_at")
                        .table(AuditLog::Table)
                        .col(AuditLog::At)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AuditLog::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum AuditLog {
        Table,
        Id,
        Actor,
        Action,
        Details,
        At,
    }
}
