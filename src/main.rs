use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use fluxdrive_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::PixService,
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let base_url = config
        .server
        .base_url
        .clone()
        .unwrap_or_else(|| format!("http://{}:{}", config.server.host, config.server.port));

    let pix_service = PixService::new(config.pix.clone());
    let commission_service = CommissionService::new(pool.clone());
    let affiliate_service = AffiliateService::new(
        pool.clone(),
        commission_service.clone(),
        pix_service.clone(),
        base_url.clone(),
        config.affiliate.clone(),
    );
    let auth_service = AuthService::new(
        pool.clone(),
        jwt_service.clone(),
        affiliate_service.clone(),
        config.affiliate.clone(),
    );
    let subscription_service = SubscriptionService::new(
        pool.clone(),
        pix_service.clone(),
        commission_service.clone(),
        affiliate_service.clone(),
        base_url,
        config.affiliate.clone(),
    );
    let network_service = NetworkService::new(pool.clone());
    let expense_service = ExpenseService::new(pool.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(affiliate_service.clone()))
            .app_data(web::Data::new(commission_service.clone()))
            .app_data(web::Data::new(subscription_service.clone()))
            .app_data(web::Data::new(network_service.clone()))
            .app_data(web::Data::new(expense_service.clone()))
            .configure(swagger_config)
            .configure(handlers::health_config)
            .configure(handlers::webhook_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::affiliate_config)
                    .configure(handlers::subscription_config)
                    .configure(handlers::expense_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
