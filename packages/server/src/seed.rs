use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{card_style, file_upload, space_content};

/// Card styles available on a fresh install.
const DEFAULT_CARD_STYLES: &[(&str, &str)] = &[
    ("modern", "Clean modern design with subtle shadows"),
    ("gradient", "Colorful gradient background"),
    ("minimal", "Simple minimal design"),
];

/// Seed the `card_styles` catalog. Existing names are left untouched.
///
/// Returns the number of styles actually inserted.
pub async fn seed_card_styles(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let mut inserted = 0u64;
    for &(name, description) in DEFAULT_CARD_STYLES {
        let model = card_style::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            ..Default::default()
        };

        let result = card_style::Entity::insert(model)
            .on_conflict(
                OnConflict::column(card_style::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        // A conflicting name reports zero affected rows.
        match result {
            Ok(rows) => inserted += rows,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new card styles", inserted);
    }

    Ok(inserted)
}

/// Ensure composite lookup indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Content listing: WHERE space_id = ? AND status = 'active'
    let content_index = Index::create()
        .if_not_exists()
        .name("idx_space_content_space_status")
        .table(space_content::Entity)
        .col(space_content::Column::SpaceId)
        .col(space_content::Column::Status)
        .to_string(PostgresQueryBuilder);

    // File metadata join: WHERE content_id = ? AND is_active
    let file_index = Index::create()
        .if_not_exists()
        .name("idx_file_uploads_content_active")
        .table(file_upload::Entity)
        .col(file_upload::Column::ContentId)
        .col(file_upload::Column::IsActive)
        .to_string(PostgresQueryBuilder);

    for (name, stmt) in [
        ("idx_space_content_space_status", content_index),
        ("idx_file_uploads_content_active", file_index),
    ] {
        match db.execute_unprepared(&stmt).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
        }
    }

    Ok(())
}
