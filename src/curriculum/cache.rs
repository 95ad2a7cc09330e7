// Cache de planes como función pura memoizada.
//
// La generación es determinista, así que un plan puede cachearse con una
// clave canónica de sus entradas: programa + aprobadas como conjunto
// ordenado + opciones como pares ordenados (la ausencia de entradas queda
// codificada por construcción). No se usa ninguna serialización reflexiva:
// la clave se arma explícitamente campo por campo.

use std::collections::HashMap;

use crate::curriculum::{MallaGrafo, generar_plan};
use crate::models::{OpcionesSemestre, Plan, ProgramaDef};

/// Clave canónica de una invocación de generación.
pub fn clave_canonica(
    programa: &str,
    aprobadas: &[String],
    opciones: &HashMap<u8, OpcionesSemestre>,
) -> String {
    let mut nombres: Vec<&str> = aprobadas.iter().map(|s| s.as_str()).collect();
    nombres.sort_unstable();
    nombres.dedup();

    let mut pares: Vec<(&u8, &OpcionesSemestre)> = opciones.iter().collect();
    pares.sort_by_key(|(semestre, _)| **semestre);
    let opciones_codificadas: Vec<String> = pares
        .iter()
        .map(|(semestre, o)| {
            format!(
                "{}:{}:{}:{}",
                semestre,
                o.media_matricula as u8,
                o.creditos_extra,
                o.intersemestral.as_deref().unwrap_or("-")
            )
        })
        .collect();

    format!(
        "{}|{}|{}",
        programa,
        nombres.join(","),
        opciones_codificadas.join(";")
    )
}

/// Tope de entradas del cache. Al llenarse se vacía entero en lugar de
/// desalojar por antigüedad: regenerar un plan es barato y el cache solo
/// amortigua el recálculo repetido desde la UI.
pub const CAPACIDAD_CACHE: usize = 256;

/// Cache de planes generados, keyed por `clave_canonica`.
#[derive(Default)]
pub struct PlanCache {
    planes: HashMap<String, Plan>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Devuelve el plan cacheado para estas entradas o lo genera y guarda.
    pub fn obtener_o_generar(
        &mut self,
        grafo: &MallaGrafo,
        programa: &ProgramaDef,
        aprobadas: &[String],
        opciones: &HashMap<u8, OpcionesSemestre>,
    ) -> Plan {
        let clave = clave_canonica(&programa.nombre, aprobadas, opciones);
        if let Some(plan) = self.planes.get(&clave) {
            return plan.clone();
        }
        let plan = generar_plan(grafo, programa, aprobadas, opciones);
        if self.planes.len() >= CAPACIDAD_CACHE {
            self.planes.clear();
        }
        self.planes.insert(clave, plan.clone());
        plan
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::construir_grafo;
    use crate::datos;

    #[test]
    fn test_clave_independiente_del_orden_de_aprobadas() {
        let a = clave_canonica(
            "Fisioterapia",
            &["Inglés 1".to_string(), "Ciencias básicas".to_string()],
            &HashMap::new(),
        );
        let b = clave_canonica(
            "Fisioterapia",
            &["Ciencias básicas".to_string(), "Inglés 1".to_string()],
            &HashMap::new(),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_clave_distingue_opciones() {
        let sin = clave_canonica("Fisioterapia", &[], &HashMap::new());
        let mut opciones = HashMap::new();
        opciones.insert(2u8, OpcionesSemestre { media_matricula: true, ..Default::default() });
        let con = clave_canonica("Fisioterapia", &[], &opciones);
        assert_ne!(sin, con);

        // La ausencia de entrada y la entrada por defecto codifican distinto,
        // pero ambas generan el mismo plan; lo que importa es no mezclarlas
        // con configuraciones reales.
        let mut defaults = HashMap::new();
        defaults.insert(2u8, OpcionesSemestre::default());
        let con_default = clave_canonica("Fisioterapia", &[], &defaults);
        assert_ne!(con, con_default);
    }

    #[test]
    fn test_clave_distingue_programa() {
        let fisio = clave_canonica("Fisioterapia", &[], &HashMap::new());
        let enf = clave_canonica("Enfermería", &[], &HashMap::new());
        assert_ne!(fisio, enf);
    }

    #[test]
    fn test_cache_reusa_y_coincide_con_generacion_directa() {
        let programa = datos::buscar_programa("Fisioterapia").unwrap();
        let grafo = construir_grafo(programa).unwrap();
        let mut cache = PlanCache::new();

        let directo = generar_plan(&grafo, programa, &[], &HashMap::new());
        let primero = cache.obtener_o_generar(&grafo, programa, &[], &HashMap::new());
        let segundo = cache.obtener_o_generar(&grafo, programa, &[], &HashMap::new());

        assert_eq!(cache.len(), 1);
        assert_eq!(primero.costo_total, directo.costo_total);
        assert_eq!(segundo.costo_total, directo.costo_total);
        assert_eq!(primero.semestres.len(), segundo.semestres.len());
    }

    #[test]
    fn test_cache_acotado() {
        use crate::models::MateriaDef;
        let programa = ProgramaDef {
            nombre: "Mini".to_string(),
            creditos_totales: 10,
            creditos_por_semestre: [10; 10],
            umbrales_semestre: [5, 10, 15, 20, 25, 30, 35, 40, 45],
            materias: vec![
                MateriaDef {
                    nombre: "A".to_string(),
                    creditos: 5,
                    semestre: 1,
                    prerrequisitos: vec![],
                    correquisitos: vec![],
                },
                MateriaDef {
                    nombre: "B".to_string(),
                    creditos: 5,
                    semestre: 2,
                    prerrequisitos: vec!["A".to_string()],
                    correquisitos: vec![],
                },
            ],
        };
        let grafo = construir_grafo(&programa).unwrap();
        let mut cache = PlanCache::new();

        // Más entradas distintas que el tope: el cache nunca lo supera.
        for extra in 0..(CAPACIDAD_CACHE as u32 + 40) {
            let mut opciones = HashMap::new();
            opciones.insert(1u8, OpcionesSemestre { creditos_extra: extra, ..Default::default() });
            cache.obtener_o_generar(&grafo, &programa, &[], &opciones);
            assert!(cache.len() <= CAPACIDAD_CACHE);
        }
    }
}
