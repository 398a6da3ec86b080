use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;

use server::entity::card;

use crate::common::{TestApp, routes};

mod styles {
    use super::*;

    #[tokio::test]
    async fn catalog_is_seeded() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::CARD_STYLES).await;

        assert_eq!(res.status, 200);
        let names: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["modern", "gradient", "minimal"]);
    }

    #[tokio::test]
    async fn single_style_by_name() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::card_style("gradient")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "gradient");

        assert_eq!(app.get(&routes::card_style("neon")).await.status, 404);
    }
}

mod create {
    use super::*;

    #[tokio::test]
    async fn card_includes_owner_details() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;

        let res = app
            .post(
                routes::CARDS,
                &json!({"userId": user_id, "cardData": {"name": "Ada"}, "qrCodeUrl": "https://qr"}),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["card_id"].as_str().unwrap().starts_with("CARD_"));
        assert_eq!(res.body["style_name"], "modern");
        assert_eq!(res.body["card_data"]["name"], "Ada");
        assert_eq!(res.body["first_name"], "Ada");
        assert_eq!(res.body["email"], "ada@example.com");
        assert_eq!(res.body["qr_code_url"], "https://qr");
    }

    #[tokio::test]
    async fn style_can_be_given_by_catalog_id() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;
        let styles = app.get(routes::CARD_STYLES).await;
        let minimal_id = styles
            .body
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["name"] == "minimal")
            .unwrap()["id"]
            .as_i64()
            .unwrap();

        let res = app
            .post(
                routes::CARDS,
                &json!({"userId": user_id, "cardStyleId": minimal_id, "cardData": {"a": 1}}),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["style_name"], "minimal");
    }

    #[tokio::test]
    async fn missing_card_data_is_rejected() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;

        let res = app.post(routes::CARDS, &json!({"userId": user_id})).await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["message"],
            "Missing required fields: userId and cardData are required"
        );
    }

    #[tokio::test]
    async fn unknown_style_is_rejected() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;

        let res = app
            .post(
                routes::CARDS,
                &json!({"userId": user_id, "cardStyle": "neon", "cardData": {"a": 1}}),
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::CARDS, &json!({"userId": 4242, "cardData": {"a": 1}}))
            .await;

        assert_eq!(res.status, 404);
    }
}

mod read_update_delete {
    use super::*;

    #[tokio::test]
    async fn lists_a_users_cards_newest_first() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;
        let older = app.create_card(user_id, "modern").await;
        let newer = app.create_card(user_id, "gradient").await;

        let res = app.get(&routes::user_cards(user_id)).await;

        assert_eq!(res.status, 200);
        let ids: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["card_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec![newer.as_str(), older.as_str()]);
    }

    #[tokio::test]
    async fn updates_style_and_data() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;
        let card_id = app.create_card(user_id, "modern").await;

        let res = app
            .put(
                &routes::card(&card_id),
                &json!({"cardStyle": "minimal", "cardData": {"name": "Countess"}}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["style_name"], "minimal");
        assert_eq!(res.body["card_data"]["name"], "Countess");

        let empty = app.put(&routes::card(&card_id), &json!({"userId": 3})).await;
        assert_eq!(empty.status, 400);
    }

    #[tokio::test]
    async fn invalid_stored_card_data_is_returned_as_text() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;
        let card_id = app.create_card(user_id, "modern").await;

        let stored = card::Entity::find_by_id(card_id.clone())
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        let mut active: card::ActiveModel = stored.into();
        active.card_data = Set("not json at all".into());
        active.update(&app.db).await.unwrap();

        let res = app.get(&routes::card(&card_id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["card_data"], "not json at all");
    }

    #[tokio::test]
    async fn delete_then_not_found() {
        let app = TestApp::spawn().await;
        let user_id = app.create_user("ada@example.com").await;
        let card_id = app.create_card(user_id, "modern").await;

        let res = app.delete(&routes::card(&card_id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["deletedCardId"], card_id.as_str());

        assert_eq!(app.get(&routes::card(&card_id)).await.status, 404);
        assert_eq!(app.delete(&routes::card(&card_id)).await.status, 404);
    }
}
