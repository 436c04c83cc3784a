use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

use taskmanager::{
    auth::{AccessPolicy, PasswordHasher, TokenService},
    bootstrap,
    config::Config,
    routes,
    state::AppState,
    store::{MemoryStore, PgStore, RoleStore, UserStore},
    AppError,
};

async fn open_stores(config: &Config) -> Result<(Arc<dyn UserStore>, Arc<dyn RoleStore>), AppError> {
    match &config.database_url {
        Some(url) => {
            let store = Arc::new(PgStore::connect(url).await?);
            store.migrate().await?;
            let users: Arc<dyn UserStore> = store.clone();
            let roles: Arc<dyn RoleStore> = store;
            Ok((users, roles))
        }
        None => {
            log::warn!("DATABASE_URL not set, using the in-memory credential store");
            let store = Arc::new(MemoryStore::new());
            let users: Arc<dyn UserStore> = store.clone();
            let roles: Arc<dyn RoleStore> = store;
            Ok((users, roles))
        }
    }
}

async fn setup() -> Result<(Config, web::Data<AppState>, Arc<AccessPolicy>), AppError> {
    let config = Config::from_env()?;
    let tokens = TokenService::new(&config.jwt_secret, config.jwt_expiration_ms)?;
    let hasher = PasswordHasher::new(config.bcrypt_cost);

    let (users, roles) = open_stores(&config).await?;
    bootstrap::init_roles(roles.as_ref()).await?;

    let policy = AccessPolicy::standard()?;
    for rule in policy.rules() {
        log::debug!("Access rule {} -> {:?}", rule.pattern.as_str(), rule.requirement);
    }

    let state = AppState::new(users, roles, tokens, hasher)?;
    Ok((config, web::Data::new(state), Arc::new(policy)))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let (config, state, policy) = match setup().await {
        Ok(parts) => parts,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e));
        }
    };

    log::info!("Starting task manager server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(state.auth_middleware(Arc::clone(&policy)))
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .service(routes::health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
