use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use server::entity::card_style;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "ok");
}

#[tokio::test]
async fn openapi_document_lists_the_api() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::OPENAPI).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["info"]["title"], "CardSpace API");
    let paths = res.body["paths"].as_object().unwrap();
    assert!(paths.keys().any(|p| p.starts_with("/api/users")));
    assert!(paths.keys().any(|p| p.contains("/content")));
}

#[tokio::test]
async fn reseeding_counts_only_missing_styles() {
    let app = TestApp::spawn().await;

    let inserted = server::seed::seed_card_styles(&app.db).await.unwrap();
    assert_eq!(inserted, 0);

    card_style::Entity::delete_many()
        .filter(card_style::Column::Name.eq("minimal"))
        .exec(&app.db)
        .await
        .unwrap();

    let inserted = server::seed::seed_card_styles(&app.db).await.unwrap();
    assert_eq!(inserted, 1);
    assert_eq!(card_style::Entity::find().count(&app.db).await.unwrap(), 3);
}
