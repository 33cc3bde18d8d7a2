use actix_web::web;

use crate::handlers::home::home;

mod auth;
mod me;
mod rooms;
mod system;
pub mod json_error;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);

    cfg.service(home);

    cfg.service(
        web::scope("/api/v1")
            .configure(system::config_routes)
            .configure(rooms::config_routes)
            .configure(me::config_routes)
            .configure(auth::config_routes)
    );
}
