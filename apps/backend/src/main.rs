use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::RateLimiter;
use actix_web::{web, App, HttpServer};
use advisor_backend::advisor::{AdvisorConfig, FinanceAdvisor, OpenAiClient};
use advisor_backend::config::db::DbProfile;
use advisor_backend::infra::state::build_state;
use advisor_backend::middleware::cors::cors_middleware;
use advisor_backend::middleware::jwt_extract::JwtExtract;
use advisor_backend::middleware::rate_limit::{advisor_rate_limit_config, auth_rate_limit_config};
use advisor_backend::middleware::request_trace::RequestTrace;
use advisor_backend::middleware::structured_logger::StructuredLogger;
use advisor_backend::middleware::trace_span::TraceSpan;
use advisor_backend::routes;
use advisor_backend::state::security_config::SecurityConfig;
use advisor_backend::telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: via compose env_file or docker run --env-file
    // - Local dev: source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("APP_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("APP_PORT must be a valid port number");
            std::process::exit(1);
        });

    let jwt = match std::env::var("APP_JWT_SECRET") {
        Ok(jwt) => jwt,
        Err(_) => {
            eprintln!("APP_JWT_SECRET must be set");
            std::process::exit(1);
        }
    };
    let token_ttl_minutes = std::env::var("TOKEN_TTL_MINUTES")
        .ok()
        .and_then(|v| v.parse::<u64>().ok());
    let security_config = match token_ttl_minutes {
        Some(minutes) => SecurityConfig::new(jwt.as_bytes()).with_token_ttl_minutes(minutes),
        None => SecurityConfig::new(jwt.as_bytes()),
    };

    let advisor_config = match AdvisorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Advisor configuration invalid: {e}");
            std::process::exit(1);
        }
    };
    let advisor = match OpenAiClient::new(advisor_config).map(FinanceAdvisor::new) {
        Ok(advisor) => advisor,
        Err(e) => {
            eprintln!("Failed to build advisor client: {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_db(DbProfile::Prod)
        .with_security(security_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(host = %host, port = port, "starting advisor backend");

    let data = web::Data::new(app_state);
    let advisor_data = web::Data::new(advisor);
    let rate_limit_backend = InMemoryBackend::builder().build();

    HttpServer::new(move || {
        let auth_limiter = RateLimiter::builder(
            rate_limit_backend.clone(),
            auth_rate_limit_config().build(),
        )
        .add_headers()
        .build();
        let advisor_limiter = RateLimiter::builder(
            rate_limit_backend.clone(),
            advisor_rate_limit_config().build(),
        )
        .add_headers()
        .build();

        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .app_data(advisor_data.clone())
            .route("/", web::get().to(routes::health::root))
            .service(web::scope("/health").configure(routes::health::configure_routes))
            .service(
                web::scope("/auth")
                    .wrap(auth_limiter)
                    .configure(routes::auth::configure_routes),
            )
            .service(
                web::scope("/api")
                    .wrap(JwtExtract)
                    .service(web::scope("/users").configure(routes::users::configure_routes))
                    .service(web::scope("/todos").configure(routes::todos::configure_routes))
                    .service(
                        web::scope("/advisor")
                            .wrap(advisor_limiter)
                            .configure(routes::advisor::configure_routes),
                    ),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
