// Resolutor de elegibilidad: qué materias puede inscribir el estudiante en
// un término, dado el conjunto de aprobadas y el semestre de referencia.

use std::collections::HashSet;

use crate::curriculum::{MallaGrafo, es_obligatoria};
use crate::models::TipoDependencia;

/// Materias elegibles para el término de referencia, en orden de prioridad.
///
/// Recorre la malla en orden de declaración del datafile. Una materia entra
/// si no está aprobada, todos sus prerrequisitos están aprobados y cada
/// correquisito está aprobado o ya figura en el resultado en construcción.
/// Esa última condición hace la resolución de correquisitos sensible al
/// orden: el correquisito debe declararse antes que su dependiente para ser
/// co-seleccionable en la misma pasada, y el orden de declaración es el
/// contrato que lo vuelve determinista.
///
/// Ventana nominal: las obligatorias (idiomas / ciclo Core) con semestre
/// nominal <= referencia se insertan al frente; el resto entra al final si
/// su semestre nominal <= referencia + 1 (un término de anticipación).
///
/// Una materia con correquisito bloqueado simplemente no aparece; no es un
/// error, queda excluida hasta que su correquisito sea elegible.
pub fn materias_disponibles(
    grafo: &MallaGrafo,
    aprobadas: &HashSet<String>,
    semestre_ref: u8,
) -> Vec<String> {
    let mut disponibles: Vec<String> = Vec::new();

    for materia in grafo.materias_en_orden() {
        if aprobadas.contains(&materia.nombre) {
            continue;
        }

        let prerreqs = grafo.predecesores(&materia.nombre, TipoDependencia::Prerrequisito);
        if !prerreqs.iter().all(|p| aprobadas.contains(*p)) {
            continue;
        }

        let correqs = grafo.predecesores(&materia.nombre, TipoDependencia::Correquisito);
        let correqs_resueltos = correqs
            .iter()
            .all(|c| aprobadas.contains(*c) || disponibles.iter().any(|d| d == c));
        if !correqs_resueltos {
            continue;
        }

        if es_obligatoria(&materia.nombre) && materia.semestre <= semestre_ref {
            disponibles.insert(0, materia.nombre.clone());
        } else if materia.semestre <= semestre_ref + 1 {
            disponibles.push(materia.nombre.clone());
        }
    }

    disponibles
}

/// Opciones de intersemestral: oferta acelerada fuera de ciclo, restringida
/// a la secuencia de idiomas y a Precálculo. Una materia califica si no está
/// aprobada y todos sus prerrequisitos lo están; los correquisitos se
/// ignoran porque el intersemestral es de materia única. Orden de
/// declaración, sin más.
pub fn opciones_intersemestral(grafo: &MallaGrafo, aprobadas: &HashSet<String>) -> Vec<String> {
    let mut opciones = Vec::new();
    for materia in grafo.materias_en_orden() {
        if !(materia.nombre.starts_with("Inglés") || materia.nombre == "Precálculo") {
            continue;
        }
        if aprobadas.contains(&materia.nombre) {
            continue;
        }
        let prerreqs = grafo.predecesores(&materia.nombre, TipoDependencia::Prerrequisito);
        if prerreqs.iter().all(|p| aprobadas.contains(*p)) {
            opciones.push(materia.nombre.clone());
        }
    }
    opciones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::construir_grafo;
    use crate::datos;

    fn aprobadas(nombres: &[&str]) -> HashSet<String> {
        nombres.iter().map(|s| s.to_string()).collect()
    }

    fn grafo_fisio() -> MallaGrafo {
        construir_grafo(datos::buscar_programa("Fisioterapia").unwrap()).unwrap()
    }

    fn grafo_enfermeria() -> MallaGrafo {
        construir_grafo(datos::buscar_programa("Enfermería").unwrap()).unwrap()
    }

    #[test]
    fn test_estudiante_nuevo_fisioterapia() {
        let grafo = grafo_fisio();
        let lista = materias_disponibles(&grafo, &aprobadas(&[]), 1);

        // Inglés 1 es la única obligatoria de semestre 1: va al frente.
        assert_eq!(lista[0], "Inglés 1");
        // Las cuatro de semestre 1 y las de semestre 2 sin prerrequisitos entran.
        assert!(lista.contains(&"Ciencias básicas".to_string()));
        assert!(lista.contains(&"Desarrollo motor humano".to_string()));
        // Core I es de semestre 2: entra por la ventana de anticipación, al final.
        assert!(lista.contains(&"Core Currículum Persona y Cultura I".to_string()));
        // Morfofisiología II tiene prerrequisitos sin aprobar.
        assert!(!lista.contains(&"Morfofisiología II".to_string()));
        // Semestre 3 queda fuera de la ventana.
        assert!(!lista.contains(&"Biomecánica".to_string()));
    }

    #[test]
    fn test_prerrequisitos_bloquean() {
        let grafo = grafo_fisio();
        let lista = materias_disponibles(&grafo, &aprobadas(&["Morfofisiología I"]), 2);
        // Falta Ciencias básicas para Morfofisiología II.
        assert!(!lista.contains(&"Morfofisiología II".to_string()));

        let lista = materias_disponibles(
            &grafo,
            &aprobadas(&["Morfofisiología I", "Ciencias básicas"]),
            2,
        );
        assert!(lista.contains(&"Morfofisiología II".to_string()));
    }

    #[test]
    fn test_correquisito_coseleccionable_en_la_misma_pasada() {
        let grafo = grafo_fisio();
        // Educación en salud y programas (sem 6) exige el correquisito
        // Práctica formativa en Salud Pública, declarado antes en la malla.
        let base = [
            "Competencias idiomáticas básicas",
            "Ciencias básicas",
            "Morfofisiología I",
            "Fundamentos de Fisioterapia",
            "Morfofisiología II",
            "Desarrollo motor humano",
            "Condiciones de salud y movimiento corporal humano",
            "Biomecánica",
            "Evaluación y diagnóstico fisioterapéutico I",
            "Inglés 1",
            "Inglés 2",
            "Inglés 3",
            "Evaluación y diagnóstico fisioterapéutico II",
            "Fundamentos de salud pública",
        ];
        let lista = materias_disponibles(&grafo, &aprobadas(&base), 6);
        let pos_practica = lista
            .iter()
            .position(|m| m == "Práctica formativa en Salud Pública");
        let pos_educacion = lista.iter().position(|m| m == "Educación en salud y programas");
        assert!(pos_practica.is_some());
        assert!(pos_educacion.is_some());
        assert!(pos_practica.unwrap() < pos_educacion.unwrap());
    }

    #[test]
    fn test_correquisito_bloqueado_excluye_sin_error() {
        let grafo = grafo_enfermeria();
        // Fisiopatología exige el correquisito Semiología; sin Fundamentación
        // del Cuidado aprobada, Semiología no es elegible y Fisiopatología
        // queda excluida en silencio.
        let base = ["Morfofisiología I", "Ciencias Básicas", "Morfofisiología II"];
        let lista = materias_disponibles(&grafo, &aprobadas(&base), 3);
        assert!(!lista.contains(&"Fisiopatología".to_string()));
        assert!(!lista.contains(&"Semiología".to_string()));

        // Con Fundamentación del Cuidado aprobada ambas entran, y Semiología
        // (declarada después de Fisiopatología) habilita a Fisiopatología
        // solo cuando ya está en la lista... el orden de declaración pone a
        // Fisiopatología antes, así que requiere la pasada con Semiología
        // aprobada o co-listada antes. Verificamos el contrato tal cual.
        let con_fund = [
            "Morfofisiología I",
            "Ciencias Básicas",
            "Morfofisiología II",
            "Naturaleza del Cuidado",
            "Fundamentación del Cuidado",
        ];
        let lista = materias_disponibles(&grafo, &aprobadas(&con_fund), 3);
        // Semiología entra (prerrequisitos completos, sin correquisitos).
        assert!(lista.contains(&"Semiología".to_string()));
        // Fisiopatología está declarada antes que Semiología: en esta pasada
        // su correquisito aún no figura y queda excluida.
        assert!(!lista.contains(&"Fisiopatología".to_string()));

        // Con Semiología aprobada, Fisiopatología ya resuelve.
        let mut con_semio = aprobadas(&con_fund);
        con_semio.insert("Semiología".to_string());
        let lista = materias_disponibles(&grafo, &con_semio, 3);
        assert!(lista.contains(&"Fisiopatología".to_string()));
    }

    #[test]
    fn test_ventana_de_anticipacion() {
        let grafo = grafo_fisio();
        let lista = materias_disponibles(&grafo, &aprobadas(&[]), 2);
        // Salud mental es de semestre 3 y no tiene prerrequisitos: entra con
        // referencia 2 por la ventana +1.
        assert!(lista.contains(&"Salud mental y movimiento corporal humano".to_string()));
        let lista = materias_disponibles(&grafo, &aprobadas(&[]), 1);
        assert!(!lista.contains(&"Salud mental y movimiento corporal humano".to_string()));
    }

    #[test]
    fn test_determinismo() {
        let grafo = grafo_fisio();
        let a = materias_disponibles(&grafo, &aprobadas(&["Inglés 1"]), 2);
        let b = materias_disponibles(&grafo, &aprobadas(&["Inglés 1"]), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_intersemestral_estudiante_nuevo() {
        let grafo = grafo_fisio();
        let opciones = opciones_intersemestral(&grafo, &aprobadas(&[]));
        // Sin aprobadas: Precálculo (sin prerrequisitos) e Inglés 1.
        assert_eq!(opciones, vec!["Precálculo".to_string(), "Inglés 1".to_string()]);
    }

    #[test]
    fn test_intersemestral_avanza_con_la_secuencia() {
        let grafo = grafo_fisio();
        let opciones = opciones_intersemestral(&grafo, &aprobadas(&["Inglés 1", "Precálculo"]));
        assert_eq!(opciones, vec!["Inglés 2".to_string()]);
    }

    #[test]
    fn test_intersemestral_ignora_correquisitos() {
        // Ninguna materia de la categoría intersemestral tiene correquisitos
        // en las mallas embebidas; el filtro por categoría es lo que cuenta.
        let grafo = grafo_enfermeria();
        let opciones = opciones_intersemestral(&grafo, &aprobadas(&[]));
        assert!(opciones.contains(&"Inglés 1".to_string()));
        assert!(opciones.contains(&"Precálculo".to_string()));
        assert!(!opciones.contains(&"Microbiología".to_string()));
    }
}
