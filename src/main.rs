//! flowpath-demo: recorre el workflow de pedido de comida con decisiones
//! predefinidas e imprime el pedido y la bitácora de eventos del run.
//!
//! Variables de entorno: `RUST_LOG` (nivel de log) y `FLOWPATH_*` (ver
//! `EngineConfig`). Un `.env` en el directorio actual se carga si existe.

use flowpath::config::init_dotenv;
use flowpath::demo::{ordering_workflow, place_order, sample_locations, MenuType, Script};
use flowpath::Orchestrator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let workflow = ordering_workflow(true);
    log::info!("workflow {} ({} nodes)", workflow.definition_hash(), workflow.len());
    let workflow = std::sync::Arc::new(workflow);
    let mut orchestrator = Orchestrator::from_env();

    // Local con alternativas: pasa por todas las pantallas y vuelve una vez.
    let script = Script { location: 0,
                          delivery_address: Some("Calle Falsa 123".into()),
                          menu: Some(MenuType::Catering),
                          items: vec!["empanadas".into(), "limonada".into()],
                          revisit_food: true,
                          cancel_reason: None };
    let (run, order) = place_order(&mut orchestrator, workflow.clone(), sample_locations(), &script)?;
    println!("Pedido: {}", serde_json::to_string_pretty(&order)?);
    println!("Eventos: {}", serde_json::to_string_pretty(&orchestrator.events(run))?);

    // Local sin alternativas: retiro y menú se saltan.
    let script = Script { location: 1,
                          items: vec!["café".into()],
                          ..Script::default() };
    let (run, order) = place_order(&mut orchestrator, workflow, sample_locations(), &script)?;
    println!("Pedido: {}", serde_json::to_string_pretty(&order)?);
    println!("Secuencia: {:?}", orchestrator.event_codes(run));
    Ok(())
}
