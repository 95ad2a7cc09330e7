// Selector de semestre: decide qué materias inscribir en un término dado el
// conjunto de elegibles y la capacidad efectiva, y calcula el costo directo
// del término. Es el corazón del motor de recomendación.

use std::collections::HashSet;

use crate::curriculum::disponibles::{materias_disponibles, opciones_intersemestral};
use crate::curriculum::{MallaGrafo, es_obligatoria};
use crate::models::{ProgramaDef, TipoDependencia};

/// Costo fijo del término con matrícula completa.
pub const COSTO_MATRICULA_COMPLETA: u64 = 10_000_000;
/// Costo fijo del término con media matrícula.
pub const COSTO_MEDIA_MATRICULA: u64 = 5_000_000;
/// Recargo por cada crédito tomado por encima de la capacidad base sin
/// modificar del semestre (créditos comprados).
pub const COSTO_CREDITO_EXTRA: u64 = 800_000;
/// Recargo fijo por cursar un intersemestral.
pub const COSTO_INTERSEMESTRAL: u64 = 1_500_000;
/// Techo absoluto de créditos por término, compre lo que compre el estudiante.
pub const TECHO_CREDITOS: u32 = 25;

// Pesos del puntaje voraz: llenar capacidad pesa más que desbloquear, y las
// materias en su semestre nominal reciben un empujón adicional.
const PESO_CREDITOS: f64 = 3.0;
const PESO_DESBLOQUEO_1: f64 = 1.0;
const PESO_DESBLOQUEO_2: f64 = 0.5;
const BONO_EN_SEMESTRE: f64 = 2.0;

/// Configuración de un término: los modificadores que afectan la capacidad.
#[derive(Debug, Clone, Default)]
pub struct ConfigSemestre {
    pub media_matricula: bool,
    pub creditos_extra: u32,
    pub intersemestral: Option<String>,
}

/// Resultado de empacar un término.
#[derive(Debug, Clone)]
pub struct SeleccionSemestre {
    pub materias: Vec<String>,
    pub creditos: u32,
    pub intersemestral: Option<String>,
    pub creditos_intersemestral: u32,
    pub costo: u64,
    /// Capacidad efectiva usada para esta selección.
    pub capacidad: u32,
    /// Capacidad regular sin usar (no cuenta el intersemestral, que es
    /// fuera de ciclo). Primera clave del orden lexicográfico del driver.
    pub brecha: u32,
}

impl SeleccionSemestre {
    /// Selección vacía: señal de estancamiento para el driver.
    pub fn vacia(&self) -> bool {
        self.materias.is_empty() && self.intersemestral.is_none()
    }
}

/// Capacidad efectiva del término: capacidad base del semestre nominal
/// (topada al valor del semestre 10 para cualquier semestre posterior);
/// con media matrícula se reduce a base/2 - 1 con piso en cero y los
/// créditos extra comprados se recortan a lo sumo 1; el total se topa en
/// el techo absoluto de 25 créditos.
pub fn capacidad_efectiva(
    tabla: &[u32; 10],
    semestre: u8,
    media_matricula: bool,
    creditos_extra: u32,
) -> u32 {
    let base = tabla[(semestre.clamp(1, 10) - 1) as usize];
    let reducida = if media_matricula {
        (base / 2).saturating_sub(1)
    } else {
        base
    };
    let extra = if media_matricula {
        creditos_extra.min(1)
    } else {
        creditos_extra
    };
    (reducida + extra).min(TECHO_CREDITOS)
}

/// Estrategia de empaque de un término. El voraz con anticipación es la
/// implementación de referencia; la costura permite sustituirla por un
/// backend de optimización exacta sin tocar al driver.
pub trait Empacador {
    fn seleccionar(
        &self,
        grafo: &MallaGrafo,
        programa: &ProgramaDef,
        aprobadas: &HashSet<String>,
        semestre_ref: u8,
        config: &ConfigSemestre,
    ) -> SeleccionSemestre;
}

/// Empacador voraz con puntaje de anticipación.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmpacadorVoraz;

impl EmpacadorVoraz {
    /// Cuántas materias aún no elegibles quedarían con prerrequisitos
    /// completos si `candidata` se aprobara junto con lo ya seleccionado.
    /// Devuelve (a un término, a dos términos) acotado por semestre nominal.
    fn desbloqueos(
        grafo: &MallaGrafo,
        aprobadas: &HashSet<String>,
        seleccion: &[String],
        candidata: &str,
        semestre_ref: u8,
    ) -> (u32, u32) {
        let completa = |nombre: &str| {
            aprobadas.contains(nombre)
                || seleccion.iter().any(|s| s == nombre)
                || nombre == candidata
        };

        let mut a_un_termino = 0u32;
        let mut a_dos_terminos = 0u32;
        for dependiente in grafo.dependientes_por_prerrequisito(candidata) {
            if completa(dependiente) {
                continue;
            }
            let prerreqs = grafo.predecesores(dependiente, TipoDependencia::Prerrequisito);
            if !prerreqs.iter().all(|p| completa(p)) {
                continue;
            }
            let semestre = grafo.semestre_de(dependiente);
            if semestre <= semestre_ref + 1 {
                a_un_termino += 1;
            } else if semestre <= semestre_ref + 2 {
                a_dos_terminos += 1;
            }
        }
        (a_un_termino, a_dos_terminos)
    }

    fn puntaje(
        grafo: &MallaGrafo,
        aprobadas: &HashSet<String>,
        seleccion: &[String],
        candidata: &str,
        semestre_ref: u8,
    ) -> f64 {
        let creditos = grafo.creditos_de(candidata) as f64;
        let (d1, d2) = Self::desbloqueos(grafo, aprobadas, seleccion, candidata, semestre_ref);
        let mut puntaje = PESO_CREDITOS * creditos
            + PESO_DESBLOQUEO_1 * d1 as f64
            + PESO_DESBLOQUEO_2 * d2 as f64;
        if grafo.semestre_de(candidata) == semestre_ref || es_obligatoria(candidata) {
            puntaje += BONO_EN_SEMESTRE;
        }
        puntaje
    }
}

impl Empacador for EmpacadorVoraz {
    fn seleccionar(
        &self,
        grafo: &MallaGrafo,
        programa: &ProgramaDef,
        aprobadas: &HashSet<String>,
        semestre_ref: u8,
        config: &ConfigSemestre,
    ) -> SeleccionSemestre {
        let capacidad = capacidad_efectiva(
            &programa.creditos_por_semestre,
            semestre_ref,
            config.media_matricula,
            config.creditos_extra,
        );

        let elegibles = materias_disponibles(grafo, aprobadas, semestre_ref);
        let mut seleccion: Vec<String> = Vec::new();
        let mut creditos = 0u32;

        // 1) Obligatorias en su semestre (el bloque del frente de la lista
        // de elegibles), vorazmente en orden de elegibilidad.
        let (obligatorias, optativas): (Vec<&String>, Vec<&String>) = elegibles
            .iter()
            .partition(|m| es_obligatoria(m) && grafo.semestre_de(m) <= semestre_ref);
        for materia in &obligatorias {
            let cr = grafo.creditos_de(materia);
            if creditos + cr <= capacidad {
                seleccion.push((*materia).clone());
                creditos += cr;
            }
        }

        // 2) Optativas en su semestre nominal: si el conjunto completo cabe,
        // se toma entero de una vez.
        let en_semestre: Vec<&String> = optativas
            .iter()
            .copied()
            .filter(|m| grafo.semestre_de(m) == semestre_ref)
            .collect();
        let creditos_en_semestre: u32 = en_semestre.iter().map(|m| grafo.creditos_de(m)).sum();
        if !en_semestre.is_empty() && creditos + creditos_en_semestre <= capacidad {
            for materia in &en_semestre {
                seleccion.push((*materia).clone());
            }
            creditos += creditos_en_semestre;
        } else {
            // 3) Voraz con puntaje: balancea llenar la capacidad contra
            // cuántas materias se desbloquean a uno y dos términos.
            loop {
                let mut mejor: Option<(&String, f64)> = None;
                for materia in &optativas {
                    if seleccion.iter().any(|s| s == *materia) {
                        continue;
                    }
                    if creditos + grafo.creditos_de(materia) > capacidad {
                        continue;
                    }
                    let p = Self::puntaje(grafo, aprobadas, &seleccion, materia, semestre_ref);
                    // Empates: gana la primera en orden de elegibilidad.
                    if mejor.map(|(_, mp)| p > mp).unwrap_or(true) {
                        mejor = Some((*materia, p));
                    }
                }
                match mejor {
                    Some((materia, _)) => {
                        creditos += grafo.creditos_de(materia);
                        seleccion.push(materia.clone());
                    }
                    None => break,
                }
            }
        }

        // 4) Pasada de cierre de brecha: obligatorias que quedaron fuera,
        // luego optativas en su semestre, luego el resto por créditos
        // descendentes; entra lo que aún quepa.
        let mut cierre: Vec<&String> = Vec::new();
        cierre.extend(elegibles.iter().filter(|m| es_obligatoria(m)));
        cierre.extend(
            elegibles
                .iter()
                .filter(|m| !es_obligatoria(m) && grafo.semestre_de(m) == semestre_ref),
        );
        let mut restantes: Vec<&String> = elegibles
            .iter()
            .filter(|m| !es_obligatoria(m) && grafo.semestre_de(m) != semestre_ref)
            .collect();
        restantes.sort_by(|a, b| grafo.creditos_de(b).cmp(&grafo.creditos_de(a)));
        cierre.extend(restantes);
        for materia in cierre {
            if seleccion.iter().any(|s| s == materia) {
                continue;
            }
            let cr = grafo.creditos_de(materia);
            if creditos + cr <= capacidad {
                seleccion.push(materia.clone());
                creditos += cr;
            }
        }

        // 5) Intersemestral: se anexa si sus créditos más los seleccionados
        // no exceden la capacidad efectiva; sus créditos se registran aparte.
        let mut intersemestral = None;
        let mut creditos_intersemestral = 0u32;
        if let Some(eleccion) = &config.intersemestral {
            let cr = grafo.creditos_de(eleccion);
            if opciones_intersemestral(grafo, aprobadas).contains(eleccion)
                && !seleccion.iter().any(|s| s == eleccion)
                && creditos + cr <= capacidad
            {
                intersemestral = Some(eleccion.clone());
                creditos_intersemestral = cr;
            }
        }

        // 6) Costo directo del término.
        let base_sin_modificar = programa.creditos_por_semestre[(semestre_ref.clamp(1, 10) - 1) as usize];
        let mut costo = if config.media_matricula {
            COSTO_MEDIA_MATRICULA
        } else {
            COSTO_MATRICULA_COMPLETA
        };
        costo += creditos.saturating_sub(base_sin_modificar) as u64 * COSTO_CREDITO_EXTRA;
        if intersemestral.is_some() {
            costo += COSTO_INTERSEMESTRAL;
        }

        debug_assert!(
            creditos + creditos_intersemestral <= capacidad,
            "selección excede la capacidad efectiva"
        );

        SeleccionSemestre {
            materias: seleccion,
            creditos,
            intersemestral,
            creditos_intersemestral,
            costo,
            capacidad,
            brecha: capacidad - creditos,
        }
    }
}
