use actix_web::web;

use crate::handlers::rooms;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/me")
            .service(
                web::resource("/rooms")
                    .route(web::get().to(rooms::my_rooms))
            )
    );
}
