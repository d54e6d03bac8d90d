//! HTML pages: dashboard and store detail

use askama::Template;
use axum::{extract::Path, response::Html};

use crate::error::{Error, Result};

const APP_TITLE: &str = "Gemini File Search";

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    title: &'a str,
}

#[derive(Template)]
#[template(path = "store_detail.html")]
struct StoreDetailTemplate<'a> {
    title: &'a str,
    store_id: &'a str,
}

fn render<T: Template>(template: T) -> Result<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| Error::internal(format!("Template rendering failed: {}", e)))
}

/// GET / - Dashboard with the store list
pub async fn dashboard() -> Result<Html<String>> {
    render(DashboardTemplate { title: APP_TITLE })
}

/// GET /stores/:store_id - Documents, upload and query for one store
pub async fn store_detail(Path(store_id): Path<String>) -> Result<Html<String>> {
    render(StoreDetailTemplate {
        title: APP_TITLE,
        store_id: &store_id,
    })
}
