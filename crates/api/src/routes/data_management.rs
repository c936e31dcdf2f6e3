use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use pmo_core::entity::{EntityTable, DEPARTMENT, INITIATIVE, PORTFOLIO, PROJECT};
use serde_json::Value;

use crate::handlers::{admin, documents, records, templates, JsonBody};
use crate::state::AppState;

/// Paths of the four CRUD endpoints of one entity.
struct EntityPaths {
    add: &'static str,
    list: &'static str,
    update: &'static str,
    delete: &'static str,
}

/// Routes mounted under `/data-management`.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(entity_routes(
            &DEPARTMENT,
            EntityPaths {
                add: "/addDepartment",
                list: "/getDepartments",
                update: "/updateDepartment",
                delete: "/deleteDepartment",
            },
        ))
        .merge(entity_routes(
            &INITIATIVE,
            EntityPaths {
                add: "/addInitiative",
                list: "/getInitiatives",
                update: "/updateInitiative",
                delete: "/deleteInitiative",
            },
        ))
        .merge(entity_routes(
            &PORTFOLIO,
            EntityPaths {
                add: "/addportfolio",
                list: "/getPortfolios",
                update: "/updateportfolio",
                delete: "/deletePortfolio",
            },
        ))
        .merge(entity_routes(
            &PROJECT,
            EntityPaths {
                add: "/addProject",
                list: "/getProjects",
                update: "/updateProject",
                delete: "/deleteProject",
            },
        ))
        // Team members are also managed from the project settings forms.
        .route("/addUser", post(admin::add_user))
        .route("/updateUser", post(admin::update_user))
        .route("/addProjectDocument", post(documents::add))
        .route("/getProjectDocuments", post(documents::list))
        .route("/deleteProjectDocument", post(documents::delete))
        .route("/addDocumentTemplate", post(templates::add))
        .route("/updateDocumentTemplate", post(templates::update))
        .route("/getDocumentTemplates", get(templates::list))
        .route("/deleteDocumentTemplate", post(templates::delete))
}

/// Bind the shared record handlers to one entity.
fn entity_routes(entity: &'static EntityTable, paths: EntityPaths) -> Router<AppState> {
    Router::new()
        .route(
            paths.add,
            post(move |state: State<AppState>, body: JsonBody<Value>| {
                records::add(entity, state, body)
            }),
        )
        .route(
            paths.list,
            get(move |state: State<AppState>| records::list(entity, state)),
        )
        .route(
            paths.update,
            post(move |state: State<AppState>, body: JsonBody<Value>| {
                records::update(entity, state, body)
            }),
        )
        .route(
            paths.delete,
            post(move |state: State<AppState>, body: JsonBody<Value>| {
                records::delete(entity, state, body)
            }),
        )
}
