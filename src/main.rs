use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use seguridad_auth::config::{DatabaseConfig, EnvironmentConfig};
use seguridad_auth::routes::create_app;
use seguridad_auth::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;

    // Configurar logging
    let level = if config.is_production() {
        tracing::Level::INFO
    } else {
        tracing::Level::DEBUG
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🔐 Servicio de Seguridad - Autenticación y Sesiones");
    info!("==================================================");

    // Inicializar base de datos
    let database = DatabaseConfig::from_environment(&config);
    info!("🗄️ Conectando a {}", database.masked_url());
    let pool = match database.create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    info!("✅ Base de datos conectada");

    if config.sms_service_url.is_none() {
        warn!("📱 SMS_SERVICE_URL no configurada: los códigos solo se registran en logs");
    }

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_url()))?;

    let state = AppState::new(pool, config).context("No se pudo crear el cliente HTTP")?;
    let app = create_app(state);

    info!("🚀 Servidor escuchando en http://{}", addr);
    info!("📋 Endpoints disponibles:");
    info!("   POST /api/login, /api/v2/login, /api/login/ciudadania, /api/confirmation");
    info!("   POST /api/validate, /api/refresh, /api/logout");
    info!("   POST /api/permits, /api/v2/permits   GET /api/ciudadania/:codigo");
    info!("   POST /api/recover, /api/confirmcode, /api/change");
    info!("   /api/usuario/list|listFilter|insert|update/:id|status/:id|delete/:id");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor detenido");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
