// Estructuras de datos principales del orientador de plan de estudios

use serde::{Deserialize, Serialize};

/// Nodo del grafo curricular: una materia con su peso en créditos y el
/// semestre nominal (1..=10) en el que la malla la ubica.
#[derive(Debug, Clone, Serialize)]
pub struct Materia {
    pub nombre: String,
    pub creditos: u32,
    pub semestre: u8,
}

/// Tipo de arista de dependencia `A -> B` (B depende de A).
///
/// - `Prerrequisito`: A debe estar aprobada en un término estrictamente anterior.
/// - `Correquisito`: A debe cursarse en el mismo término o estar ya aprobada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TipoDependencia {
    Prerrequisito,
    Correquisito,
}

/// Registro de una materia tal como viene en el datafile del programa.
/// El orden de declaración dentro del arreglo `materias` es el orden de
/// iteración determinista que usa todo el motor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MateriaDef {
    pub nombre: String,
    pub creditos: u32,
    pub semestre: u8,
    #[serde(default)]
    pub prerrequisitos: Vec<String>,
    #[serde(default)]
    pub correquisitos: Vec<String>,
}

/// Definición completa de un programa académico: malla, tabla de capacidad
/// por semestre nominal y umbrales acumulados de créditos -> semestre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramaDef {
    pub nombre: String,
    pub creditos_totales: u32,
    /// Capacidad base de créditos para los semestres nominales 1..=10.
    pub creditos_por_semestre: [u32; 10],
    /// Umbrales de la función escalonada créditos acumulados -> semestre.
    /// `creditos <= umbrales[i]` implica semestre `i + 1`; por encima del
    /// último umbral el semestre es 10.
    pub umbrales_semestre: [u32; 9],
    pub materias: Vec<MateriaDef>,
}

/// Opciones externas por semestre nominal. La ausencia de entrada para un
/// semestre equivale a todo apagado.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpcionesSemestre {
    #[serde(default)]
    pub media_matricula: bool,
    #[serde(default)]
    pub creditos_extra: u32,
    #[serde(default)]
    pub intersemestral: Option<String>,
}

/// Un término académico real dentro del plan generado. Inmutable una vez
/// anexado: una regeneración reemplaza el plan completo.
#[derive(Debug, Clone, Serialize)]
pub struct SemestrePlan {
    /// Semestre nominal de la malla al que corresponde este término.
    pub semestre: u8,
    /// Cuántos términos reales lleva el estudiante en este semestre nominal
    /// (1 para el primero, 2+ si necesitó términos adicionales).
    pub repeticion: u32,
    pub materias: Vec<String>,
    pub creditos: u32,
    pub intersemestral: Option<String>,
    pub creditos_intersemestral: u32,
    pub media_matricula: bool,
    pub creditos_extra: u32,
    pub costo: u64,
}

/// Estado terminal del generador de planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EstadoPlan {
    /// Se alcanzaron los créditos totales del programa.
    Completo,
    /// Ninguna materia seleccionable con créditos pendientes: el plan
    /// devuelto es parcial y el llamador debe tratarlo como "no puede
    /// graduarse bajo estas restricciones".
    Estancado,
    /// Se agotó el tope de iteraciones de seguridad (datos patológicos).
    CorteIteraciones,
}

/// Plan completo: secuencia ordenada de términos más el costo acumulado.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub semestres: Vec<SemestrePlan>,
    pub costo_total: u64,
    pub estado: EstadoPlan,
}

impl Plan {
    /// Créditos regulares + intersemestrales recomendados por el plan.
    pub fn creditos_recomendados(&self) -> u32 {
        self.semestres
            .iter()
            .map(|s| s.creditos + s.creditos_intersemestral)
            .sum()
    }
}
