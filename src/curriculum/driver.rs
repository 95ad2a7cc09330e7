// Driver del plan: el lazo externo que invoca elegibilidad y selector
// semestre a semestre hasta acumular los créditos del programa, detectando
// estancamiento y topando las iteraciones por seguridad.

use std::collections::{HashMap, HashSet};

use crate::curriculum::disponibles::opciones_intersemestral;
use crate::curriculum::selector::{
    COSTO_MATRICULA_COMPLETA, ConfigSemestre, Empacador, EmpacadorVoraz, SeleccionSemestre,
};
use crate::curriculum::MallaGrafo;
use crate::datos::semestre_por_creditos;
use crate::models::{EstadoPlan, OpcionesSemestre, Plan, ProgramaDef, SemestrePlan};

/// Tope de iteraciones del lazo: protege contra no-terminación por datos
/// patológicos. Diez semestres nominales con repeticiones y media matrícula
/// caben holgadamente.
pub const MAX_ITERACIONES: usize = 40;

/// Proyección del costo restante de una configuración candidata: costo del
/// término más los términos estimados que faltan a matrícula completa.
/// Segunda y tercera clave del orden lexicográfico de comparación.
fn proyeccion(
    programa: &ProgramaDef,
    seleccion: &SeleccionSemestre,
    creditos_acumulados: u32,
    semestre_ref: u8,
) -> (u64, u32) {
    let tomados = seleccion.creditos + seleccion.creditos_intersemestral;
    let restantes = programa
        .creditos_totales
        .saturating_sub(creditos_acumulados + tomados);
    let capacidad_base = programa.creditos_por_semestre[(semestre_ref.clamp(1, 10) - 1) as usize];
    let terminos_estimados = restantes.div_ceil(capacidad_base.max(1));
    let costo_proyectado =
        seleccion.costo + terminos_estimados as u64 * COSTO_MATRICULA_COMPLETA;
    (costo_proyectado, terminos_estimados)
}

/// Elige entre la configuración de matrícula completa y la de media
/// matrícula por comparación lexicográfica: brecha de capacidad ascendente,
/// costo proyectado ascendente, términos estimados ascendentes.
fn mejor_configuracion(
    grafo: &MallaGrafo,
    programa: &ProgramaDef,
    empacador: &dyn Empacador,
    aprobadas: &HashSet<String>,
    semestre_ref: u8,
    creditos_acumulados: u32,
) -> (ConfigSemestre, SeleccionSemestre) {
    let completa = ConfigSemestre::default();
    let media = ConfigSemestre { media_matricula: true, ..Default::default() };

    let sel_completa = empacador.seleccionar(grafo, programa, aprobadas, semestre_ref, &completa);
    let sel_media = empacador.seleccionar(grafo, programa, aprobadas, semestre_ref, &media);

    // Una configuración sin progreso nunca le gana a una con materias:
    // la brecha chica de una selección vacía no es un mérito.
    if sel_media.vacia() && !sel_completa.vacia() {
        return (completa, sel_completa);
    }
    if sel_completa.vacia() && !sel_media.vacia() {
        return (media, sel_media);
    }

    let (costo_c, terminos_c) = proyeccion(programa, &sel_completa, creditos_acumulados, semestre_ref);
    let (costo_m, terminos_m) = proyeccion(programa, &sel_media, creditos_acumulados, semestre_ref);

    let clave_c = (sel_completa.brecha, costo_c, terminos_c);
    let clave_m = (sel_media.brecha, costo_m, terminos_m);
    if clave_m < clave_c {
        (media, sel_media)
    } else {
        (completa, sel_completa)
    }
}

/// Genera el plan completo de un estudiante.
///
/// Entradas: el grafo del programa, las materias ya aprobadas (los nombres
/// desconocidos se ignoran) y las opciones por semestre nominal (la ausencia
/// de entrada equivale a todo apagado). Cada invocación trabaja sobre su
/// propia copia del estado: llamadas repetidas o concurrentes no se observan
/// entre sí, y con entradas idénticas el plan resultante es idéntico.
pub fn generar_plan(
    grafo: &MallaGrafo,
    programa: &ProgramaDef,
    aprobadas_entrada: &[String],
    opciones: &HashMap<u8, OpcionesSemestre>,
) -> Plan {
    generar_plan_con(grafo, programa, aprobadas_entrada, opciones, &EmpacadorVoraz)
}

/// Variante con estrategia de empaque inyectable.
pub fn generar_plan_con(
    grafo: &MallaGrafo,
    programa: &ProgramaDef,
    aprobadas_entrada: &[String],
    opciones: &HashMap<u8, OpcionesSemestre>,
    empacador: &dyn Empacador,
) -> Plan {
    // Copia de trabajo filtrada a la malla: tolerancia a estado de UI viejo.
    let mut aprobadas: HashSet<String> = aprobadas_entrada
        .iter()
        .filter(|n| grafo.contiene(n))
        .cloned()
        .collect();
    let mut creditos_acumulados = grafo.creditos_aprobados(&aprobadas);

    let mut semestres: Vec<SemestrePlan> = Vec::new();
    let mut costo_total: u64 = 0;
    let mut repeticiones: HashMap<u8, u32> = HashMap::new();
    let mut estado = EstadoPlan::CorteIteraciones;

    for _ in 0..MAX_ITERACIONES {
        if creditos_acumulados >= programa.creditos_totales {
            estado = EstadoPlan::Completo;
            break;
        }

        let semestre_ref =
            semestre_por_creditos(&programa.umbrales_semestre, creditos_acumulados);

        // Resolver opciones externas del semestre; el intersemestral pedido
        // solo pasa si es una opción válida en este punto del plan.
        let (config, seleccion) = match opciones.get(&semestre_ref) {
            Some(opcion) => {
                let intersemestral = opcion
                    .intersemestral
                    .clone()
                    .filter(|m| opciones_intersemestral(grafo, &aprobadas).contains(m));
                let config = ConfigSemestre {
                    media_matricula: opcion.media_matricula,
                    creditos_extra: opcion.creditos_extra,
                    intersemestral,
                };
                let seleccion =
                    empacador.seleccionar(grafo, programa, &aprobadas, semestre_ref, &config);
                (config, seleccion)
            }
            None => mejor_configuracion(
                grafo,
                programa,
                empacador,
                &aprobadas,
                semestre_ref,
                creditos_acumulados,
            ),
        };

        if seleccion.vacia() {
            eprintln!(
                "WARN: sin materias seleccionables en el semestre {} con {} créditos; plan estancado",
                semestre_ref, creditos_acumulados
            );
            estado = EstadoPlan::Estancado;
            break;
        }

        let repeticion = repeticiones
            .entry(semestre_ref)
            .and_modify(|r| *r += 1)
            .or_insert(1);

        costo_total += seleccion.costo;
        semestres.push(SemestrePlan {
            semestre: semestre_ref,
            repeticion: *repeticion,
            materias: seleccion.materias.clone(),
            creditos: seleccion.creditos,
            intersemestral: seleccion.intersemestral.clone(),
            creditos_intersemestral: seleccion.creditos_intersemestral,
            media_matricula: config.media_matricula,
            creditos_extra: config.creditos_extra,
            costo: seleccion.costo,
        });

        for materia in &seleccion.materias {
            aprobadas.insert(materia.clone());
        }
        if let Some(inter) = &seleccion.intersemestral {
            aprobadas.insert(inter.clone());
        }
        creditos_acumulados += seleccion.creditos + seleccion.creditos_intersemestral;
    }

    if estado == EstadoPlan::CorteIteraciones
        && creditos_acumulados >= programa.creditos_totales
    {
        // El lazo se agotó justo al completar: el último chequeo no corrió.
        estado = EstadoPlan::Completo;
    }

    Plan { semestres, costo_total, estado }
}
