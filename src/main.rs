//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização (só com Postgres)
    if let Some(pool) = &app_state.db_pool {
        sqlx::migrate!()
            .run(pool)
            .await
            .expect("Falha ao rodar as migrações do banco de dados.");

        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
    }

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/signin", post(handlers::auth::signin));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let company_routes = Router::new()
        .route(
            "/",
            get(handlers::company::get_company)
                .post(handlers::company::create_company)
                .put(handlers::company::update_company),
        )
        .route("/tip", put(handlers::company::update_tip_settings));

    let invoice_routes = Router::new()
        .route(
            "/",
            get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice),
        )
        .route("/stats", get(handlers::invoices::invoice_stats))
        .route(
            "/{id}",
            get(handlers::invoices::get_invoice)
                .put(handlers::invoices::replace_invoice)
                .delete(handlers::invoices::delete_invoice),
        )
        .route("/{id}/status", put(handlers::invoices::update_invoice_status))
        .route("/{id}/items", post(handlers::invoices::add_invoice_item))
        .route(
            "/{id}/items/{item_id}",
            put(handlers::invoices::update_invoice_item)
                .delete(handlers::invoices::remove_invoice_item),
        )
        .route("/{id}/balance", get(handlers::invoices::invoice_balance))
        .route("/{id}/notes", get(handlers::invoices::invoice_notes));

    let note_routes = Router::new()
        .route(
            "/",
            get(handlers::notes::list_notes).post(handlers::notes::create_note),
        )
        .route(
            "/{id}",
            get(handlers::notes::get_note)
                .put(handlers::notes::update_note)
                .patch(handlers::notes::update_note)
                .delete(handlers::notes::delete_note),
        )
        .route("/{id}/items", post(handlers::notes::add_note_item))
        .route(
            "/{id}/items/{item_id}",
            put(handlers::notes::update_note_item).delete(handlers::notes::remove_note_item),
        );

    // Tudo que mexe em dados de negócio exige usuário autenticado
    let protected_routes = Router::new()
        .nest("/api/company", company_routes)
        .nest("/api/invoices", invoice_routes)
        .nest("/api/notes", note_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
