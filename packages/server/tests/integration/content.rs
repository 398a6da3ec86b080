use base64::{Engine as _, engine::general_purpose::STANDARD};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::json;

use server::entity::{file_upload, space_content};

use crate::common::{TestApp, routes};

async fn app_with_space() -> (TestApp, String) {
    let app = TestApp::spawn().await;
    let user_id = app.create_user("ada@example.com").await;
    let space_id = app.create_space(user_id, "Portfolio", None).await;
    (app, space_id)
}

mod create {
    use super::*;

    #[tokio::test]
    async fn note_is_stored_as_given() {
        let (app, space_id) = app_with_space().await;

        let res = app
            .post(
                &routes::space_content(&space_id),
                &json!({"type": "notes", "data": {"title": "Hi", "text": "Hello"}}),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["content_id"].as_str().unwrap().starts_with("CONTENT_"));
        assert_eq!(res.body["type"], "notes");
        assert_eq!(res.body["status"], "active");
        assert_eq!(res.body["data"], json!({"title": "Hi", "text": "Hello"}));
    }

    #[tokio::test]
    async fn upload_keeps_only_name_and_description_in_data() {
        let (app, space_id) = app_with_space().await;

        let res = app
            .post(
                &routes::space_content(&space_id),
                &json!({
                    "type": "upload",
                    "data": {
                        "fileName": "cv.pdf",
                        "description": "Resume",
                        "fileSize": 5,
                        "fileData": "data:application/pdf;base64,aGVsbG8="
                    }
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let data = &res.body["data"];
        assert_eq!(data["fileName"], "cv.pdf");
        assert_eq!(data["description"], "Resume");
        assert_eq!(data["fileSize"], 5);
        assert_eq!(data["fileType"], "application/pdf");
        assert_eq!(data["fileExtension"], "pdf");
        assert_eq!(data["uploadType"], "document");
        assert_eq!(data["fileSizeFormatted"], "5 Bytes");
        assert!(data["filePath"].as_str().unwrap().starts_with("/uploads/FILE_"));
        assert!(data.get("fileContent").is_none());

        let content_id = res.str_field("content_id");
        let stored = space_content::Entity::find_by_id(content_id.clone())
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        let stored_data: serde_json::Value = serde_json::from_str(&stored.data).unwrap();
        assert_eq!(stored_data, json!({"fileName": "cv.pdf", "description": "Resume"}));

        let file = file_upload::Entity::find()
            .filter(file_upload::Column::ContentId.eq(content_id.as_str()))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.file_content, b"hello");
        assert_eq!(file.file_size, 5);
        assert_eq!(file.upload_context, "space_content");
    }

    #[tokio::test]
    async fn upload_response_metadata_matches_the_listing() {
        let (app, space_id) = app_with_space().await;
        let body: Vec<u8> = (0..=255).cycle().take(4096).collect();

        let created = app
            .post(
                &routes::space_content(&space_id),
                &json!({
                    "type": "upload",
                    "data": {"fileName": "blob.bin", "fileContent": STANDARD.encode(&body)}
                }),
            )
            .await;
        assert_eq!(created.status, 201, "{}", created.text);

        let listed = app.get(&routes::space_content(&space_id)).await;
        let items = listed.body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["data"], created.body["data"]);
        assert_eq!(created.body["data"]["fileSize"], 4096);

        let file = file_upload::Entity::find()
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.file_content, body);
        assert_eq!(created.body["data"]["filePath"], file.storage_path.as_str());
    }

    #[tokio::test]
    async fn missing_type_or_data_is_rejected() {
        let (app, space_id) = app_with_space().await;

        let res = app
            .post(&routes::space_content(&space_id), &json!({"type": "notes"}))
            .await;
        assert_eq!(res.status, 400);

        let res = app
            .post(&routes::space_content(&space_id), &json!({"data": {"x": 1}}))
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unknown_type_is_rejected() {
        let (app, space_id) = app_with_space().await;

        let res = app
            .post(
                &routes::space_content(&space_id),
                &json!({"type": "video", "data": {"x": 1}}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn invalid_base64_is_rejected_and_nothing_is_stored() {
        let (app, space_id) = app_with_space().await;

        let res = app
            .post(
                &routes::space_content(&space_id),
                &json!({"type": "upload", "data": {"fileName": "a.png", "fileContent": "%%%"}}),
            )
            .await;

        assert_eq!(res.status, 400);
        let count = space_content::Entity::find().all(&app.db).await.unwrap().len();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let (app, space_id) = app_with_space().await;
        let too_big = vec![b'a'; 10 * 1024 * 1024 + 1];

        let res = app
            .post(
                &routes::space_content(&space_id),
                &json!({
                    "type": "upload",
                    "data": {"fileName": "big.js", "fileContent": STANDARD.encode(&too_big)}
                }),
            )
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert!(res.body["message"].as_str().unwrap().starts_with("File too large"));
    }

    #[tokio::test]
    async fn unknown_space_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                &routes::space_content("SPACE_0_nope"),
                &json!({"type": "notes", "data": {"text": "x"}}),
            )
            .await;

        assert_eq!(res.status, 404);
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn listing_is_newest_first_without_file_bytes() {
        let (app, space_id) = app_with_space().await;
        let note = app.add_content(&space_id, "notes", json!({"text": "a"})).await;
        let upload = app
            .add_content(
                &space_id,
                "upload",
                json!({"fileName": "pic.png", "fileContent": "iVBORw0KGgo="}),
            )
            .await;

        let res = app.get(&routes::space_content(&space_id)).await;

        assert_eq!(res.status, 200);
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["content_id"], upload.as_str());
        assert_eq!(items[1]["content_id"], note.as_str());
        assert_eq!(items[0]["data"]["uploadType"], "image");
        assert_eq!(items[0]["data"]["fileType"], "image/png");
        assert!(items[0]["data"].get("fileContent").is_none());
        assert!(!res.text.contains("iVBORw0KGgo"));
    }

    #[tokio::test]
    async fn full_view_returns_bytes_as_a_data_url() {
        let (app, space_id) = app_with_space().await;
        let content_id = app
            .add_content(
                &space_id,
                "upload",
                json!({"fileName": "notes.txt", "fileType": "text/plain", "fileContent": "aGVsbG8gd29ybGQ="}),
            )
            .await;

        let res = app.get(&routes::content_full(&space_id, &content_id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(
            res.body["data"]["fileContent"],
            "data:text/plain;base64,aGVsbG8gd29ybGQ="
        );
        assert_eq!(res.body["data"]["fileName"], "notes.txt");
    }

    #[tokio::test]
    async fn malformed_stored_data_reads_as_empty_object() {
        let (app, space_id) = app_with_space().await;
        let broken = app.add_content(&space_id, "notes", json!({"text": "x"})).await;
        let legacy = app.add_content(&space_id, "url", json!({"url": "https://y"})).await;

        for (content_id, raw) in [(&broken, "{not json"), (&legacy, "[object Object]")] {
            let stored = space_content::Entity::find_by_id(content_id.clone())
                .one(&app.db)
                .await
                .unwrap()
                .unwrap();
            let mut active: space_content::ActiveModel = stored.into();
            active.data = Set(raw.to_string());
            active.update(&app.db).await.unwrap();
        }

        let res = app.get(&routes::space_content(&space_id)).await;

        assert_eq!(res.status, 200);
        for item in res.body.as_array().unwrap() {
            assert_eq!(item["data"], json!({}));
        }

        let full = app.get(&routes::content_full(&space_id, &broken)).await;
        assert_eq!(full.body["data"], json!({}));
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn soft_deleted_content_is_hidden() {
        let (app, space_id) = app_with_space().await;
        let content_id = app.add_content(&space_id, "notes", json!({"text": "bye"})).await;

        let res = app
            .patch(
                &routes::content_item(&space_id, &content_id),
                &json!({"action": "soft_delete"}),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["contentId"], content_id.as_str());
        assert_eq!(res.body["action"], "soft_delete");

        let listing = app.get(&routes::space_content(&space_id)).await;
        assert_eq!(listing.body, json!([]));

        let full = app.get(&routes::content_full(&space_id, &content_id)).await;
        assert_eq!(full.status, 404);

        let stored = space_content::Entity::find_by_id(content_id.clone())
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status.as_str(), "deleted");
    }

    #[tokio::test]
    async fn unsupported_action_is_rejected() {
        let (app, space_id) = app_with_space().await;
        let content_id = app.add_content(&space_id, "notes", json!({"text": "x"})).await;

        let res = app
            .patch(
                &routes::content_item(&space_id, &content_id),
                &json!({"action": "archive"}),
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn permanent_delete_removes_the_file_row() {
        let (app, space_id) = app_with_space().await;
        let content_id = app
            .add_content(
                &space_id,
                "upload",
                json!({"fileName": "a.txt", "fileContent": "YQ=="}),
            )
            .await;

        let res = app.delete(&routes::content_item(&space_id, &content_id)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["deletedContentId"], content_id.as_str());

        let files = file_upload::Entity::find().all(&app.db).await.unwrap();
        assert!(files.is_empty());

        let again = app.delete(&routes::content_item(&space_id, &content_id)).await;
        assert_eq!(again.status, 404);
    }
}
