use axum::extract::DefaultBodyLimit;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/users", user_routes())
        .nest("/cards", card_routes())
        .nest("/spaces", space_routes(config))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::user::list_users,
            handlers::user::create_user
        ))
        .routes(routes!(handlers::user::get_user_by_email))
        .routes(routes!(
            handlers::user::get_user,
            handlers::user::update_user
        ))
}

fn card_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::card::list_styles))
        .routes(routes!(handlers::card::get_style))
        .routes(routes!(handlers::card::create_card))
        .routes(routes!(handlers::card::list_user_cards))
        .routes(routes!(
            handlers::card::get_card,
            handlers::card::update_card,
            handlers::card::delete_card
        ))
}

fn space_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::space::create_space))
        .routes(routes!(handlers::space::list_root_spaces))
        .routes(routes!(handlers::space::list_user_spaces))
        .routes(routes!(handlers::space::list_user_root_spaces))
        .routes(routes!(
            handlers::space::get_space,
            handlers::space::update_space,
            handlers::space::delete_space
        ))
        .routes(routes!(handlers::space::list_child_spaces))
        .nest("/{space_id}/content", content_routes(config))
}

/// Uploads arrive base64-encoded inside JSON, so this subtree gets the
/// configured body limit instead of axum's 2 MB default.
fn content_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::content::list_content,
            handlers::content::add_content
        ))
        .routes(routes!(
            handlers::content::update_content_status,
            handlers::content::delete_content
        ))
        .routes(routes!(handlers::content::get_full_content))
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
}
