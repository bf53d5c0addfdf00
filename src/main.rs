mod config;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod testing;
mod usecase;

use std::{net::SocketAddr, time::Duration};

use axum::http::{HeaderValue, Method, header};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{Config, ReceiptBackend},
    infrastructure::{
        argon2_password_hasher::Argon2PasswordHasher,
        configured_receipt_store::ConfiguredReceiptStore,
        credential_repository::MysqlCredentialRepository,
        database,
        gemini_course_recommender::GeminiCourseRecommender,
        jwt_token_generator::JwtTokenGenerator,
        local_receipt_store::LocalReceiptStore,
        registration_repository::MysqlRegistrationRepository,
        supabase_receipt_store::SupabaseReceiptStore,
    },
    presentation::{
        handlers::{
            admin_handler::create_admin_router, auth_handler::create_auth_router,
            receipt_handler::create_receipt_router,
            registration_handler::create_registration_router,
        },
        router::create_app_router,
    },
    usecase::{
        delete_registration_usecase::DeleteRegistrationUsecase,
        list_registrations_usecase::ListRegistrationsUsecase, login_usecase::LoginUsecase,
        provision_admin_usecase::ProvisionAdminUsecase,
        recommend_course_usecase::RecommendCourseUsecase,
        register_student_usecase::RegisterStudentUsecase,
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    info!(environment = ?config.environment, port = config.port, "configuration loaded");

    let db = database::connect(&config).await?;
    database::ensure_schema(&db).await?;

    let registration_repository = MysqlRegistrationRepository::new(db.clone());
    let credential_repository = MysqlCredentialRepository::new(db.clone());
    let password_hasher = Argon2PasswordHasher::new();
    let token_generator =
        JwtTokenGenerator::with_expiration(config.jwt_secret.clone(), config.jwt_expiration_hours);

    if let Some(seed) = &config.admin_seed {
        let provision = ProvisionAdminUsecase::new(
            credential_repository.clone(),
            password_hasher.clone(),
        );
        if let Err(e) = provision.ensure_admin(&seed.email, &seed.password).await {
            error!(email = %seed.email, error = %e, "could not provision the admin account");
        }
    }

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let receipt_store = match &config.receipt_backend {
        ReceiptBackend::Local { dir } => ConfiguredReceiptStore::Local(
            LocalReceiptStore::new(dir.clone(), config.public_base_url.clone()).await?,
        ),
        ReceiptBackend::Supabase {
            url,
            service_key,
            bucket,
        } => ConfiguredReceiptStore::Supabase(SupabaseReceiptStore::new(
            http_client.clone(),
            url,
            service_key.clone(),
            bucket.clone(),
        )),
    };
    let recommender = GeminiCourseRecommender::new(
        http_client,
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    );

    let register_service =
        RegisterStudentUsecase::new(registration_repository.clone(), receipt_store.clone());
    let recommend_service = RecommendCourseUsecase::new(recommender);
    let login_service = LoginUsecase::new(
        credential_repository,
        password_hasher,
        token_generator.clone(),
    );
    let list_service = ListRegistrationsUsecase::new(registration_repository.clone());
    let delete_service =
        DeleteRegistrationUsecase::new(registration_repository, receipt_store.clone());

    let mut app = create_app_router(
        create_registration_router(register_service, recommend_service, config.environment),
        create_auth_router(login_service, config.environment),
        create_admin_router(
            list_service,
            delete_service,
            token_generator,
            config.environment,
        ),
        create_receipt_router(receipt_store),
    )
    .layer(TraceLayer::new_for_http());

    if let Some(origin) = &config.cors_allow_origin {
        let cors = CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true);
        app = app.layer(cors);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
