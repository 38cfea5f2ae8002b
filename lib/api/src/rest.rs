use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use parking_lot::RwLock;
use scoutx_core::{Error, NeighborSearch};
use scoutx_similarity::{PositionGroup, SimilarityConfig, SimilarityEngine};
use scoutx_storage::TableStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Deserialize)]
struct SimilarQuery {
    player: String,
    season: String,
    k: Option<usize>,
}

#[derive(Serialize)]
struct GroupInfo {
    group: PositionGroup,
    rows: usize,
    dim: usize,
    strategy: String,
}

/// Shared server state. Queries take a snapshot of the current engine;
/// a reload builds a complete replacement before swapping it in.
pub struct AppState {
    engine: RwLock<Arc<SimilarityEngine>>,
    store: TableStore,
    config: SimilarityConfig,
}

impl AppState {
    pub fn load(store: TableStore, config: SimilarityConfig) -> scoutx_core::Result<Self> {
        let engine = Self::build_engine(&store, &config)?;
        Ok(Self {
            engine: RwLock::new(Arc::new(engine)),
            store,
            config,
        })
    }

    fn build_engine(store: &TableStore, config: &SimilarityConfig) -> scoutx_core::Result<SimilarityEngine> {
        let registry = store.load_registry(config.strategy)?;
        SimilarityEngine::new(Arc::new(registry), config.clone())
    }

    pub fn engine(&self) -> Arc<SimilarityEngine> {
        self.engine.read().clone()
    }

    /// Rebuild from the data directory and swap. On failure the current
    /// engine stays in place.
    pub fn reload(&self) -> scoutx_core::Result<usize> {
        let engine = Self::build_engine(&self.store, &self.config)?;
        let rows = engine.registry().total_rows();
        *self.engine.write() = Arc::new(engine);
        Ok(rows)
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
        info!("Starting HTTP server on port {}", port);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(Self::routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/", web::get().to(health))
            .route("/groups", web::get().to(list_groups))
            .route("/groups/{group}/similar", web::get().to(similar))
            .route("/reload", web::post().to(reload));
    }
}

fn error_response(e: &Error) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        Error::NotFound { .. } | Error::UnknownGroup(_) => HttpResponse::NotFound().json(body),
        Error::AmbiguousMatch { .. } => HttpResponse::Conflict().json(body),
        Error::InvalidK { .. }
        | Error::DimensionMismatch { .. }
        | Error::InvalidConfig(_)
        | Error::MalformedInput { .. } => HttpResponse::BadRequest().json(body),
        Error::Io(_) | Error::Serialization(_) => HttpResponse::InternalServerError().json(body),
    }
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "title": "scoutx",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

async fn list_groups(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    let engine = state.engine();
    let registry = engine.registry();
    let groups: Vec<GroupInfo> = registry
        .groups()
        .into_iter()
        .filter_map(|group| {
            registry.get(group).ok().map(|entry| GroupInfo {
                group,
                rows: entry.index().len(),
                dim: entry.index().dim(),
                strategy: entry.index().strategy().to_string(),
            })
        })
        .collect();
    Ok(HttpResponse::Ok().json(groups))
}

async fn similar(
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    query: web::Query<SimilarQuery>,
) -> ActixResult<HttpResponse> {
    let group: PositionGroup = match path.into_inner().parse() {
        Ok(group) => group,
        Err(e) => return Ok(error_response(&e)),
    };

    let engine = state.engine();
    match engine.similar(group, &query.player, &query.season, query.k) {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn reload(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    let state = state.get_ref().clone();
    let result = web::block(move || state.reload()).await?;
    match result {
        Ok(rows) => {
            info!("Reloaded feature tables ({} rows)", rows);
            Ok(HttpResponse::Ok().json(serde_json::json!({ "result": true, "rows": rows })))
        }
        Err(e) => {
            warn!("Reload failed: {}", e);
            Ok(error_response(&e))
        }
    }
}
