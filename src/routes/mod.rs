pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use actix_web::web;

/// Routes under the versioned API prefix.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::me),
    )
    .service(
        web::scope("/projects")
            .service(projects::list_projects)
            .service(projects::create_project)
            .service(projects::get_project)
            .service(projects::update_project)
            .service(projects::delete_project)
            .service(tasks::list_project_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    )
    .service(web::scope("/tasks").service(tasks::filter_tasks));
}
