use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use serde_json::json;

use crate::api_json::parse_y_resolver;
use crate::curriculum::{PlanCache, construir_grafo, opciones_intersemestral};
use crate::datos;

/// GET /programas
/// Lista los programas académicos embebidos con sus totales.
async fn programas_handler() -> impl Responder {
    let resumen: Vec<serde_json::Value> = datos::programas()
        .iter()
        .map(|p| {
            json!({
                "nombre": p.nombre,
                "creditos_totales": p.creditos_totales,
                "creditos_por_semestre": p.creditos_por_semestre,
                "materias": p.materias.len(),
            })
        })
        .collect();
    HttpResponse::Ok().json(json!({ "programas": resumen }))
}

/// GET /programas/{programa}/materias
/// Devuelve la malla completa del programa en orden de declaración.
async fn materias_handler(path: web::Path<String>) -> impl Responder {
    let nombre = path.into_inner();
    match datos::buscar_programa(&nombre) {
        Some(programa) => HttpResponse::Ok().json(json!({
            "programa": programa.nombre,
            "creditos_totales": programa.creditos_totales,
            "materias": programa.materias,
        })),
        None => HttpResponse::BadRequest()
            .json(json!({"error": format!("programa desconocido: '{}'", nombre)})),
    }
}

/// POST /plan
/// Genera el plan recomendado para un `PlanRequest`. Las generaciones se
/// memoizan en un `PlanCache` compartido entre workers.
async fn plan_handler(
    body: web::Json<serde_json::Value>,
    cache: web::Data<Mutex<PlanCache>>,
) -> impl Responder {
    let body_value = body.into_inner();
    let json_str = match serde_json::to_string(&body_value) {
        Ok(s) => s,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("invalid JSON body: {}", e)}));
        }
    };

    let params = match parse_y_resolver(&json_str) {
        Ok(p) => p,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("failed to parse input: {}", e)}));
        }
    };

    let programa = match datos::buscar_programa(&params.programa) {
        Some(p) => p,
        None => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("programa desconocido: '{}'", params.programa)}));
        }
    };

    let grafo = match construir_grafo(programa) {
        Ok(g) => g,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("malla inválida: {}", e)}));
        }
    };

    let aprobadas_set = params.aprobadas.iter().cloned().collect();
    let creditos_aprobados = grafo.creditos_aprobados(&aprobadas_set);
    let semestre_actual =
        datos::semestre_por_creditos(&programa.umbrales_semestre, creditos_aprobados);

    let plan = match cache.lock() {
        Ok(mut cache) => {
            cache.obtener_o_generar(&grafo, programa, &params.aprobadas, &params.opciones)
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("cache lock poisoned: {}", e)}));
        }
    };

    HttpResponse::Ok().json(json!({
        "programa": programa.nombre,
        "creditos_aprobados": creditos_aprobados,
        "semestre_actual": semestre_actual,
        "estado": plan.estado,
        "costo_total": plan.costo_total,
        "semestres": plan.semestres,
    }))
}

/// POST /intersemestrales
/// Lista las materias elegibles para cursar en intersemestral dado un
/// conjunto de aprobadas. Mismo cuerpo que /plan; `opciones` se ignora.
async fn intersemestrales_handler(body: web::Json<serde_json::Value>) -> impl Responder {
    let body_value = body.into_inner();
    let json_str = match serde_json::to_string(&body_value) {
        Ok(s) => s,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("invalid JSON body: {}", e)}));
        }
    };

    let params = match parse_y_resolver(&json_str) {
        Ok(p) => p,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("failed to parse input: {}", e)}));
        }
    };

    let programa = match datos::buscar_programa(&params.programa) {
        Some(p) => p,
        None => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("programa desconocido: '{}'", params.programa)}));
        }
    };

    let grafo = match construir_grafo(programa) {
        Ok(g) => g,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("malla inválida: {}", e)}));
        }
    };

    let aprobadas = params.aprobadas.iter().cloned().collect();
    let opciones = opciones_intersemestral(&grafo, &aprobadas);
    HttpResponse::Ok().json(json!({
        "programa": programa.nombre,
        "opciones": opciones,
    }))
}

async fn help_handler() -> impl Responder {
    // Ejemplo de PlanRequest mostrando el formato esperado por POST /plan
    let example = json!({
        "programa": "Fisioterapia",
        "aprobadas": ["Inglés 1", "Ciencias básicas", "Morfofisiología I"],
        "opciones": {
            "2": {
                "media_matricula": false,
                "creditos_extra": 3,
                "intersemestral": "Inglés 2"
            }
        }
    });

    let help = json!({
        "description": "API del orientador de plan de estudios. POST /plan genera el plan recomendado semestre a semestre; POST /intersemestrales lista la oferta intersemestral elegible. Los nombres de materias son insensibles a mayúsculas.",
        "post_example": example,
        "endpoints": {
            "GET /programas": "lista de programas embebidos",
            "GET /programas/{programa}/materias": "malla completa del programa",
            "POST /plan": "plan recomendado (body: PlanRequest)",
            "POST /intersemestrales": "oferta intersemestral elegible (body: PlanRequest)"
        },
        "programa_choices": datos::programas().iter().map(|p| p.nombre.clone()).collect::<Vec<_>>()
    });

    HttpResponse::Ok().json(help)
}

pub async fn run_server(bind_addr: &str) -> std::io::Result<()> {
    let cache = web::Data::new(Mutex::new(PlanCache::new()));
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(cache.clone())
            .route("/programas", web::get().to(programas_handler))
            .route("/programas/{programa}/materias", web::get().to(materias_handler))
            .route("/plan", web::post().to(plan_handler))
            .route("/intersemestrales", web::post().to(intersemestrales_handler))
            .route("/help", web::get().to(help_handler))
    })
    .bind(bind_addr)?
    .run()
    .await
}
