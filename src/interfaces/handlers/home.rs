use actix_web::{get, HttpResponse, Responder};
use std::env;

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Room Rental API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "rooms": "/api/v1/rooms",
        "health": "/api/v1/health"
    }))
}
