use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::datos;
use crate::models::OpcionesSemestre;

/// Parámetros de entrada para la generación de un plan de estudios
///
/// # Estructura del JSON esperado:
/// ```json
/// {
///   "programa": "Fisioterapia",
///   "aprobadas": ["Inglés 1", "Ciencias básicas"],
///   "opciones": {
///     "2": {
///       "media_matricula": false,
///       "creditos_extra": 3,
///       "intersemestral": "Inglés 2"
///     }
///   }
/// }
/// ```
///
/// # Campos:
/// - `programa`: Nombre del programa académico (requerido, insensible a mayúsculas)
/// - `aprobadas`: Materias ya aprobadas por nombre. Nombres desconocidos se
///   conservan y el motor los ignora (tolerancia a mallas viejas del frontend)
/// - `opciones`: Overrides por semestre nominal, keyed por "1".."10". La
///   ausencia de entrada para un semestre equivale a todo apagado
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanRequest {
    pub programa: String,
    #[serde(default)]
    pub aprobadas: Vec<String>,
    #[serde(default)]
    pub opciones: HashMap<u8, OpcionesSemestre>,
}

pub fn parse_json_input(json_str: &str) -> Result<PlanRequest, serde_json::Error> {
    serde_json::from_str::<PlanRequest>(json_str)
}

/// Parsea el JSON de entrada y normaliza los nombres de `aprobadas` contra la
/// malla del programa: una entrada que difiere solo en mayúsculas o espacios
/// extremos se reemplaza por el nombre canónico del datafile. Los nombres que
/// no se pueden resolver se conservan tal cual (el motor los ignora).
pub fn parse_y_resolver(json_str: &str) -> Result<PlanRequest, Box<dyn std::error::Error>> {
    parse_y_resolver_with_resolver(json_str, |programa, nombre| {
        nombre_canonico(programa, nombre)
    })
}

/// Versión parametrizable para pruebas: recibe un `resolver` que intenta
/// mapear un nombre escrito por el usuario al nombre canónico de la malla.
/// Permite mockear sin depender de los datafiles embebidos.
pub fn parse_y_resolver_with_resolver<F>(
    json_str: &str,
    resolver: F,
) -> Result<PlanRequest, Box<dyn std::error::Error>>
where
    F: Fn(&str, &str) -> Option<String>,
{
    let mut params = parse_json_input(json_str)?;

    let programa = params.programa.clone();
    params.aprobadas = params
        .aprobadas
        .into_iter()
        .map(|nombre| resolver(&programa, &nombre).unwrap_or(nombre))
        .collect();

    for opciones in params.opciones.values_mut() {
        if let Some(inter) = opciones.intersemestral.take() {
            opciones.intersemestral = Some(resolver(&programa, &inter).unwrap_or(inter));
        }
    }

    Ok(params)
}

/// Busca en la malla del programa la materia cuyo nombre coincide ignorando
/// mayúsculas y espacios extremos, y devuelve el nombre canónico.
pub fn nombre_canonico(programa: &str, nombre: &str) -> Option<String> {
    let programa = datos::buscar_programa(programa)?;
    let buscado = nombre.trim().to_lowercase();
    programa
        .materias
        .iter()
        .find(|m| m.nombre.to_lowercase() == buscado)
        .map(|m| m.nombre.clone())
}
