//! Application router configuration.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    category::{create_category_endpoint, get_categories_page},
    endpoints,
    error_page::get_404_not_found,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        get_create_expense_page, get_edit_expense_page,
    },
    logging::logging_middleware,
    report::{export_expenses_endpoint, get_expenses_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::NEW_EXPENSE_VIEW, get(get_create_expense_page))
        .route(endpoints::EDIT_EXPENSE_VIEW, get(get_edit_expense_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page));

    let api_routes = Router::new()
        .route(endpoints::POST_EXPENSE, post(create_expense_endpoint))
        .route(endpoints::EXPORT_EXPENSES, get(export_expenses_endpoint))
        .route(
            endpoints::PUT_EXPENSE,
            put(edit_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(endpoints::POST_CATEGORY, post(create_category_endpoint));

    page_routes
        .merge(api_routes)
        .layer(middleware::from_fn(logging_middleware))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the expenses page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::EXPENSES_VIEW)
}
