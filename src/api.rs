use std::collections::HashMap;

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, ResponseError};
use askama::Template;
use log::{debug, error, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::color::{self, ColorError};
use crate::config::Config;
use crate::palette::{self, Mode, Policy, PolicyPalette, SelectionError};
use crate::templates::{PaletteColumn, PalettePageTemplate};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("missing query parameter {0:?}")]
    MissingParameter(&'static str),
    #[error("query parameter {field:?} must be a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }
        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

#[derive(Serialize)]
struct HexResponse {
    hex: String,
}

#[derive(Serialize)]
struct ContrastResponse {
    hex: String,
    text_color: String,
}

fn query_params(req: &HttpRequest) -> HashMap<String, String> {
    url::form_urlencoded::parse(req.query_string().as_bytes()).into_owned().collect()
}

/// Base color and mode from the query, falling back to the configured defaults.
fn selection(params: &HashMap<String, String>, config: &Config) -> Result<(String, Mode), ApiError> {
    let color = match params.get("color") {
        Some(raw) => color::normalize_hex(raw)?,
        None => config.default_color.clone(),
    };
    let mode = match params.get("mode") {
        Some(raw) => raw.parse::<Mode>()?,
        None => config.default_mode,
    };
    Ok((color, mode))
}

fn required<'a>(params: &'a HashMap<String, String>, name: &'static str) -> Result<&'a str, ApiError> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or(ApiError::MissingParameter(name))
}

fn number(params: &HashMap<String, String>, field: &'static str) -> Result<f64, ApiError> {
    match params.get(field) {
        Some(raw) => raw.trim().parse().map_err(|_| ApiError::InvalidNumber {
            field,
            value: raw.clone(),
        }),
        None => Ok(0.0),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(palette_page_handler))
        .route("/api/palettes", web::get().to(palettes_handler))
        .route("/api/palettes/{policy}", web::get().to(policy_palette_handler))
        .route("/api/convert/hsl", web::get().to(hex_to_hsl_handler))
        .route("/api/convert/hex", web::get().to(hsl_to_hex_handler))
        .route("/api/contrast", web::get().to(contrast_handler));
}

pub async fn run_api_server(config: Config) -> std::io::Result<()> {
    info!("Starting API server on {}:{}", config.bind_address, config.port);
    info!(
        "Defaults: color {}, mode {}, hue shift {} degrees",
        config.default_color, config.default_mode, config.tuning.hue_shift_degrees
    );

    let bind = (config.bind_address.clone(), config.port);
    let data = web::Data::new(config);
    HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .bind(bind)?
        .run()
        .await
}

async fn palette_page_handler(req: HttpRequest, config: web::Data<Config>) -> Result<HttpResponse, ApiError> {
    let params = query_params(&req);
    let (base, mode) = selection(&params, &config)?;
    debug!("Rendering palette page for {} ({})", base, mode);
    let palettes = palette::build_all(&base, mode, &config.tuning)?;
    let columns = palettes
        .iter()
        .map(PaletteColumn::from_palette)
        .collect::<Result<Vec<_>, _>>()?;
    let template = PalettePageTemplate {
        color_text: color::contrast_text_color(&base)?,
        color: base,
        mode,
        columns,
    };
    let body = template.render()?;
    Ok(HttpResponse::Ok().content_type("text/html").body(body))
}

async fn palettes_handler(req: HttpRequest, config: web::Data<Config>) -> Result<HttpResponse, ApiError> {
    let params = query_params(&req);
    let (base, mode) = selection(&params, &config)?;
    let palettes = palette::build_all(&base, mode, &config.tuning)?;
    Ok(HttpResponse::Ok().json(palettes))
}

async fn policy_palette_handler(
    path: web::Path<String>,
    req: HttpRequest,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let policy: Policy = path.into_inner().parse()?;
    let params = query_params(&req);
    let (base, mode) = selection(&params, &config)?;
    let palette = PolicyPalette::build(policy, &base, mode, &config.tuning)?;
    Ok(HttpResponse::Ok().json(palette))
}

async fn hex_to_hsl_handler(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let params = query_params(&req);
    let hsl = color::hex_to_hsl(required(&params, "hex")?)?;
    Ok(HttpResponse::Ok().json(hsl))
}

async fn hsl_to_hex_handler(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let params = query_params(&req);
    let hex = color::hsl_to_hex(number(&params, "h")?, number(&params, "s")?, number(&params, "l")?);
    Ok(HttpResponse::Ok().json(HexResponse { hex }))
}

async fn contrast_handler(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let params = query_params(&req);
    let raw = required(&params, "hex")?;
    Ok(HttpResponse::Ok().json(ContrastResponse {
        hex: color::normalize_hex(raw)?,
        text_color: color::contrast_text_color(raw)?,
    }))
}
