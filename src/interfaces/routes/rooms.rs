use actix_web::web;

use crate::handlers::rooms;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rooms")
            .service(
                web::resource("")
                    .route(web::get().to(rooms::browse_rooms))
                    .route(web::post().to(rooms::create_room))
            )
            .service(
                web::resource("/filters")
                    .route(web::get().to(rooms::filter_options))
            )
            .service(
                web::resource("/{room_id}")
                    .route(web::get().to(rooms::get_room))
                    .route(web::patch().to(rooms::update_room))
                    .route(web::delete().to(rooms::delete_room))
            )
            .service(
                web::resource("/{room_id}/availability")
                    .route(web::patch().to(rooms::toggle_availability))
            )
    );
}
