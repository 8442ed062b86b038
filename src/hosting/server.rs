use super::error::LobbyError;
use super::lobby::Lobby;
use crate::game::CardTemplate;
use crate::protocol::Action;
use crate::templates::DeckTemplateSource;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use serde::Deserialize;
use std::sync::Arc;

/// Body of the game-creation request.
#[derive(Debug, Deserialize)]
struct CreateGame {
    template: Vec<CardTemplate>,
}

pub struct Server;

impl Server {
    pub async fn run(
        addr: &str,
        lobby: Lobby,
        templates: Arc<dyn DeckTemplateSource>,
    ) -> Result<(), std::io::Error> {
        let lobby = web::Data::new(lobby);
        let templates: web::Data<dyn DeckTemplateSource> = web::Data::from(templates);
        log::info!("starting hosting server on {}", addr);
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(lobby.clone())
                .app_data(templates.clone())
                .route("/game", web::post().to(create))
                .route("/game/{game_id}", web::get().to(state))
                .route("/game/{game_id}", web::post().to(act))
                .route("/game/{game_id}/player", web::post().to(join))
                .route("/game/{game_id}/subscribe", web::get().to(subscribe))
                .route("/templates", web::get().to(templates_list))
        })
        .workers(4)
        .bind(addr)?
        .run()
        .await
    }
}

async fn create(lobby: web::Data<Lobby>, body: web::Json<CreateGame>) -> impl Responder {
    let id = lobby.create(&body.template).await;
    HttpResponse::Ok().json(serde_json::json!({ "gameId": id }))
}

async fn state(lobby: web::Data<Lobby>, path: web::Path<String>) -> impl Responder {
    match lobby.state(&path.into_inner()).await {
        Ok(state) => HttpResponse::Ok().json(state),
        Err(e) => HttpResponse::NotFound().body(e.to_string()),
    }
}

async fn act(
    lobby: web::Data<Lobby>,
    path: web::Path<String>,
    action: web::Json<Action>,
) -> impl Responder {
    match lobby.act(&path.into_inner(), action.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(true),
        Err(e @ LobbyError::GameNotFound(_)) => HttpResponse::NotFound().body(e.to_string()),
        Err(e @ LobbyError::UnknownPlayer(_)) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

async fn join(lobby: web::Data<Lobby>, path: web::Path<String>) -> impl Responder {
    match lobby.join(&path.into_inner()).await {
        Ok(player) => HttpResponse::Ok().json(serde_json::json!({ "playerId": player })),
        Err(e) => HttpResponse::NotFound().body(e.to_string()),
    }
}

async fn subscribe(
    lobby: web::Data<Lobby>,
    path: web::Path<String>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    let id = path.into_inner();
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => match lobby.bridge(&id, session, stream).await {
            Ok(()) => response.map_into_left_body(),
            Err(e) => HttpResponse::NotFound()
                .body(e.to_string())
                .map_into_right_body(),
        },
        Err(e) => HttpResponse::InternalServerError()
            .body(e.to_string())
            .map_into_right_body(),
    }
}

async fn templates_list(source: web::Data<dyn DeckTemplateSource>) -> impl Responder {
    match source.get_templates().await {
        Ok(templates) => HttpResponse::Ok().json(templates),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
