pub mod admin;
pub mod data_management;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree (health is mounted separately).
///
/// Route hierarchy:
///
/// ```text
/// /data-management/addDepartment            create (legacy flat shape accepted)
/// /data-management/getDepartments           list
/// /data-management/updateDepartment         update
/// /data-management/deleteDepartment         delete
/// /data-management/{add,get,update,delete}Initiative(s)
/// /data-management/{addportfolio,getPortfolios,updateportfolio,deletePortfolio}
/// /data-management/{add,get,update,delete}Project(s)
/// /data-management/{addUser,updateUser}     same handlers as /admin
///
/// /data-management/addProjectDocument       multipart upload
/// /data-management/getProjectDocuments      list by project
/// /data-management/deleteProjectDocument    two-phase delete
///
/// /data-management/addDocumentTemplate      multipart create
/// /data-management/updateDocumentTemplate   multipart update
/// /data-management/getDocumentTemplates     list
/// /data-management/deleteDocumentTemplate   delete
///
/// /admin/getRoles                           roles with holder counts
/// /admin/getUsers                           list
/// /admin/addUser                            create
/// /admin/updateUser                         update
/// /admin/deleteUser                         delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/data-management", data_management::router())
        .nest("/admin", admin::router())
}
