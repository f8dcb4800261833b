use actix_web::middleware::Logger;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::gallery::{GalleryPage, ImagesResponse};
use crate::pager::parse_page;
use crate::templates;
use crate::walker;

/// Walks the picture directory on the blocking pool.
async fn scan(config: &AppConfig) -> Result<Vec<String>, AppError> {
    let root = PathBuf::from(&config.pictures_directory);
    let extensions = config.allowed_extensions.clone();
    let order = config.order;
    tokio::task::spawn_blocking(move || walker::scan_images(&root, &extensions, order)).await?
}

fn json_response<T: Serialize>(value: &T) -> Result<HttpResponse, AppError> {
    let body = serde_json::to_string(value)?;
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

fn requested_page(query: &HashMap<String, String>) -> usize {
    parse_page(query.get("page").map(String::as_str))
}

async fn get_images(
    app_config: web::Data<AppConfig>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    log::debug!("Received request for images with query: {:?}", query);

    let images = scan(&app_config).await?;
    let page = GalleryPage::new(&images, requested_page(&query), app_config.images_per_page);
    log::trace!("Serving page {:?}", page.info);

    json_response(&ImagesResponse::from(page))
}

async fn index(
    app_config: web::Data<AppConfig>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    log::debug!("Received request for gallery page with query: {:?}", query);

    let images = scan(&app_config).await?;
    let page = GalleryPage::new(&images, requested_page(&query), app_config.images_per_page);

    let template_path = app_config.template_path();
    let html = tokio::task::spawn_blocking(move || templates::render_index(&template_path, &page))
        .await
        .map_err(render_task_failed)??;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

fn render_task_failed(e: tokio::task::JoinError) -> AppError {
    AppError::Template(tera::Error::msg(format!("render task failed: {}", e)))
}

async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound(req.path().to_string()))
}

/// Registers every gallery route; shared by the server and the handler tests.
pub fn routes(cfg: &mut web::ServiceConfig, config: &AppConfig) {
    cfg.service(actix_files::Files::new("/static", &config.static_directory).show_files_listing())
        .service(
            actix_files::Files::new("/pictures", &config.pictures_directory).show_files_listing(),
        )
        .service(web::resource("/api/images").route(web::get().to(get_images)))
        .service(web::resource("/").route(web::get().to(index)))
        .default_service(web::to(not_found));
}

pub async fn start_web_server(config: Arc<AppConfig>) -> std::io::Result<()> {
    let address = config.listen_address();
    let workers = config.num_workers.max(1);
    let config_data = web::Data::from(config);

    log::info!("Server starting on http://{}", address);
    log::debug!(
        "Serving pictures from {} and assets from {}",
        config_data.pictures_directory,
        config_data.static_directory
    );

    HttpServer::new(move || {
        let config = config_data.clone();
        App::new()
            .wrap(Logger::default())
            .app_data(config.clone())
            .configure(|cfg| routes(cfg, &config))
    })
    .workers(workers)
    .bind(address)?
    .run()
    .await
}
