use actix_web::web;

use crate::handlers::session;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/sign-out")
                    .route(web::post().to(session::sign_out))
            )
    );
}
