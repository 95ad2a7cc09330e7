// Carga de los datafiles de programas académicos.
//
// Los datasets viven en `datafiles/*.json` y se embeben en el binario con
// `include_str!`. Cada archivo trae la malla en orden de declaración, la
// tabla de capacidad por semestre y los umbrales de la función escalonada
// créditos acumulados -> semestre nominal.

use std::error::Error;
use std::sync::OnceLock;

use crate::models::ProgramaDef;

const FISIOTERAPIA_JSON: &str = include_str!("../../datafiles/fisioterapia.json");
const ENFERMERIA_JSON: &str = include_str!("../../datafiles/enfermeria.json");

static PROGRAMAS: OnceLock<Vec<ProgramaDef>> = OnceLock::new();

fn parsear_programa(raw: &str, origen: &str) -> ProgramaDef {
    // Los datafiles se embeben en compilación; si uno no parsea el binario
    // no puede operar, así que fallar al arrancar es lo correcto.
    serde_json::from_str(raw)
        .unwrap_or_else(|e| panic!("datafile '{}' inválido: {}", origen, e))
}

/// Programas disponibles, en el orden en que se embeben los datafiles.
pub fn programas() -> &'static [ProgramaDef] {
    PROGRAMAS.get_or_init(|| {
        vec![
            parsear_programa(FISIOTERAPIA_JSON, "fisioterapia.json"),
            parsear_programa(ENFERMERIA_JSON, "enfermeria.json"),
        ]
    })
}

/// Busca un programa por nombre (insensible a mayúsculas).
pub fn buscar_programa(nombre: &str) -> Option<&'static ProgramaDef> {
    let buscado = nombre.trim().to_lowercase();
    programas().iter().find(|p| p.nombre.to_lowercase() == buscado)
}

/// Variante con error descriptivo para el servidor.
pub fn programa_o_error(nombre: &str) -> Result<&'static ProgramaDef, Box<dyn Error>> {
    buscar_programa(nombre).ok_or_else(|| {
        let conocidos: Vec<&str> = programas().iter().map(|p| p.nombre.as_str()).collect();
        format!(
            "programa desconocido '{}'; disponibles: {}",
            nombre,
            conocidos.join(", ")
        )
        .into()
    })
}

/// Función escalonada monótona créditos acumulados -> semestre nominal.
/// `creditos <= umbrales[i]` da el semestre `i + 1`; sobre el último umbral
/// el estudiante está en el semestre 10.
pub fn semestre_por_creditos(umbrales: &[u32; 9], creditos: u32) -> u8 {
    for (i, umbral) in umbrales.iter().enumerate() {
        if creditos <= *umbral {
            return (i + 1) as u8;
        }
    }
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carga_programas_embebidos() {
        let progs = programas();
        assert_eq!(progs.len(), 2);
        assert_eq!(progs[0].nombre, "Fisioterapia");
        assert_eq!(progs[0].creditos_totales, 180);
        assert_eq!(progs[1].nombre, "Enfermería");
        assert_eq!(progs[1].creditos_totales, 189);
    }

    #[test]
    fn test_orden_de_declaracion_preservado() {
        let fisio = buscar_programa("fisioterapia").unwrap();
        // El selector depende de que el arreglo conserve el orden del datafile.
        assert_eq!(fisio.materias[0].nombre, "Competencias idiomáticas básicas");
        assert_eq!(fisio.materias[1].nombre, "Ciencias básicas");
        assert_eq!(
            fisio.materias.last().unwrap().nombre,
            "Core Currículum Persona y Cultura V"
        );
    }

    #[test]
    fn test_buscar_programa_insensible_a_mayusculas() {
        assert!(buscar_programa("ENFERMERÍA").is_some());
        assert!(buscar_programa("  Fisioterapia ").is_some());
        assert!(buscar_programa("Medicina").is_none());
        assert!(programa_o_error("Medicina").is_err());
    }

    #[test]
    fn test_semestre_por_creditos_fisioterapia() {
        let fisio = buscar_programa("Fisioterapia").unwrap();
        let u = &fisio.umbrales_semestre;
        assert_eq!(semestre_por_creditos(u, 0), 1);
        assert_eq!(semestre_por_creditos(u, 13), 1);
        assert_eq!(semestre_por_creditos(u, 14), 2);
        assert_eq!(semestre_por_creditos(u, 31), 2);
        assert_eq!(semestre_por_creditos(u, 50), 3);
        assert_eq!(semestre_por_creditos(u, 159), 9);
        assert_eq!(semestre_por_creditos(u, 160), 10);
        assert_eq!(semestre_por_creditos(u, 500), 10);
    }

    #[test]
    fn test_semestre_por_creditos_monotono() {
        let enf = buscar_programa("Enfermería").unwrap();
        let mut anterior = 0u8;
        for c in 0..=200 {
            let s = semestre_por_creditos(&enf.umbrales_semestre, c);
            assert!(s >= anterior, "la función escalonada retrocedió en {}", c);
            anterior = s;
        }
    }
}
