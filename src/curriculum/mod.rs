// Módulo de alto nivel del motor curricular.
//
// Construye el grafo dirigido de la malla (una materia por nodo, una arista
// por dependencia, etiquetada como prerrequisito o correquisito) y expone
// los submódulos del pipeline de generación:
//
//   grafo -> disponibles (elegibilidad) -> selector (empaque) -> driver (plan)

pub mod cache;
pub mod disponibles;
pub mod driver;
pub mod selector;

pub use cache::PlanCache;
pub use disponibles::{materias_disponibles, opciones_intersemestral};
pub use driver::generar_plan;
pub use selector::{EmpacadorVoraz, capacidad_efectiva};

use std::collections::{HashMap, HashSet};
use std::error::Error;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::models::{Materia, MateriaDef, ProgramaDef, TipoDependencia};

/// Grafo curricular inmutable tras su construcción. Se pasa explícitamente a
/// cada operación; los llamadores comparten referencias y nunca lo mutan.
#[derive(Debug)]
pub struct MallaGrafo {
    grafo: DiGraph<Materia, TipoDependencia>,
    indice: HashMap<String, NodeIndex>,
    /// Índices de nodo en el orden de declaración del datafile. Es el orden
    /// de iteración contractual del resolutor de elegibilidad.
    orden: Vec<NodeIndex>,
}

impl MallaGrafo {
    pub fn contiene(&self, nombre: &str) -> bool {
        self.indice.contains_key(nombre)
    }

    pub fn materia(&self, nombre: &str) -> Option<&Materia> {
        self.indice.get(nombre).map(|&idx| &self.grafo[idx])
    }

    pub fn creditos_de(&self, nombre: &str) -> u32 {
        self.materia(nombre).map(|m| m.creditos).unwrap_or(0)
    }

    pub fn semestre_de(&self, nombre: &str) -> u8 {
        self.materia(nombre).map(|m| m.semestre).unwrap_or(0)
    }

    /// Materias en orden de declaración del datafile.
    pub fn materias_en_orden(&self) -> impl Iterator<Item = &Materia> {
        self.orden.iter().map(|&idx| &self.grafo[idx])
    }

    /// Predecesores de `nombre` conectados por aristas del tipo dado.
    pub fn predecesores(&self, nombre: &str, tipo: TipoDependencia) -> Vec<&str> {
        let Some(&idx) = self.indice.get(nombre) else {
            return Vec::new();
        };
        let mut previos = Vec::new();
        for arista in self.grafo.edges_directed(idx, Direction::Incoming) {
            if *arista.weight() == tipo {
                previos.push(self.grafo[arista.source()].nombre.as_str());
            }
        }
        previos
    }

    /// Sucesores de `nombre` vía aristas de prerrequisito (materias que lo
    /// exigen aprobado). Lo usa el puntaje de desbloqueo del selector.
    pub fn dependientes_por_prerrequisito(&self, nombre: &str) -> Vec<&str> {
        let Some(&idx) = self.indice.get(nombre) else {
            return Vec::new();
        };
        let mut siguientes = Vec::new();
        for arista in self.grafo.edges_directed(idx, Direction::Outgoing) {
            if *arista.weight() == TipoDependencia::Prerrequisito {
                siguientes.push(self.grafo[arista.target()].nombre.as_str());
            }
        }
        siguientes
    }

    /// Suma los créditos de los nombres aprobados que existen en la malla.
    /// Los nombres desconocidos se ignoran (tolerancia a estado de UI viejo).
    pub fn creditos_aprobados(&self, aprobadas: &HashSet<String>) -> u32 {
        aprobadas.iter().map(|n| self.creditos_de(n)).sum()
    }
}

/// Materias de la secuencia de idiomas o del ciclo de formación general:
/// se priorizan al frente de la lista de elegibles en su semestre nominal.
/// El patrón cubre las dos grafías del ciclo Core presentes en las mallas.
pub fn es_obligatoria(nombre: &str) -> bool {
    nombre.contains("Inglés") || nombre.starts_with("Core Curr")
}

fn validar_materia(def: &MateriaDef) -> Result<(), Box<dyn Error>> {
    if def.nombre.trim().is_empty() {
        return Err("materia con nombre vacío en el datafile".into());
    }
    if def.creditos == 0 {
        return Err(format!("materia '{}' con créditos en cero", def.nombre).into());
    }
    if def.semestre == 0 || def.semestre > 10 {
        return Err(format!(
            "materia '{}' con semestre nominal {} fuera de 1..=10",
            def.nombre, def.semestre
        )
        .into());
    }
    Ok(())
}

/// Construye el grafo curricular de un programa.
///
/// Falla únicamente por errores de integridad del dataset: campos inválidos,
/// nombres duplicados, dependencias hacia materias inexistentes o un ciclo
/// en el subgrafo de prerrequisitos (un ciclo dejaría materias inalcanzables
/// para siempre). Los correquisitos pueden formar cadenas cortas y no se
/// verifican por aciclicidad.
pub fn construir_grafo(programa: &ProgramaDef) -> Result<MallaGrafo, Box<dyn Error>> {
    let mut grafo: DiGraph<Materia, TipoDependencia> = DiGraph::new();
    let mut indice: HashMap<String, NodeIndex> = HashMap::new();
    let mut orden: Vec<NodeIndex> = Vec::with_capacity(programa.materias.len());

    for def in &programa.materias {
        validar_materia(def)?;
        if indice.contains_key(&def.nombre) {
            return Err(format!("materia duplicada '{}' en el datafile", def.nombre).into());
        }
        let idx = grafo.add_node(Materia {
            nombre: def.nombre.clone(),
            creditos: def.creditos,
            semestre: def.semestre,
        });
        indice.insert(def.nombre.clone(), idx);
        orden.push(idx);
    }

    // Aristas en una segunda pasada, cuando todos los nodos ya existen.
    for def in &programa.materias {
        let destino = indice[&def.nombre];
        for (previos, tipo) in [
            (&def.prerrequisitos, TipoDependencia::Prerrequisito),
            (&def.correquisitos, TipoDependencia::Correquisito),
        ] {
            for previo in previos {
                let Some(&origen) = indice.get(previo) else {
                    return Err(format!(
                        "'{}' depende de '{}', que no existe en la malla",
                        def.nombre, previo
                    )
                    .into());
                };
                grafo.add_edge(origen, destino, tipo);
            }
        }
    }

    verificar_prerrequisitos_aciclicos(&grafo, programa)?;

    Ok(MallaGrafo { grafo, indice, orden })
}

/// Chequeo de integridad: el subgrafo de prerrequisitos debe ser un DAG.
fn verificar_prerrequisitos_aciclicos(
    grafo: &DiGraph<Materia, TipoDependencia>,
    programa: &ProgramaDef,
) -> Result<(), Box<dyn Error>> {
    let mut solo_prerreq: DiGraph<(), ()> = DiGraph::new();
    let indices: Vec<NodeIndex> = (0..grafo.node_count())
        .map(|_| solo_prerreq.add_node(()))
        .collect();
    for arista in grafo.edge_indices() {
        if grafo[arista] == TipoDependencia::Prerrequisito {
            let (a, b) = grafo.edge_endpoints(arista).expect("arista recién listada");
            solo_prerreq.add_edge(indices[a.index()], indices[b.index()], ());
        }
    }
    if toposort(&solo_prerreq, None).is_err() {
        return Err(format!(
            "ciclo de prerrequisitos en la malla de '{}'",
            programa.nombre
        )
        .into());
    }
    Ok(())
}
