//! Conduce un run del pedido con decisiones predefinidas, como lo haría un
//! usuario tocando cada pantalla.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use flowpath_core::{Args, EventStore, Orchestrator, RunHandle, RunState, StepInstance, Workflow, WorkflowError};
use log::{debug, info, warn};
use thiserror::Error;

use super::order::{Location, MenuType, Order};
use super::steps::{FoodSelection, Locations, MenuSelection, PickupOrDelivery, ReviewOrder};

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Error de workflow: {0}")]
    Workflow(#[from] WorkflowError),
    #[error("Pedido abandonado: {0}")]
    Abandoned(String),
    #[error("No existe el local {0}")]
    UnknownLocation(usize),
    #[error("Pantalla inesperada: {0}")]
    UnexpectedStep(&'static str),
    #[error("El run terminó sin pedido")]
    Incomplete,
}

/// Decisiones del usuario simulado.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub location: usize,
    /// `None` = retiro en local.
    pub delivery_address: Option<String>,
    pub menu: Option<MenuType>,
    pub items: Vec<String>,
    /// Volver una vez desde la revisión a la selección de comida.
    pub revisit_food: bool,
    /// En la revisión, cancelar con este motivo en lugar de confirmar.
    pub cancel_reason: Option<String>,
}

enum Decision {
    Proceed(Order),
    Back,
    Cancel(String),
}

/// Lanza `workflow` con `locations` y lo recorre hasta que termina.
pub fn place_order<E>(orchestrator: &mut Orchestrator<E>,
                      workflow: Arc<Workflow>,
                      locations: Vec<Location>,
                      script: &Script)
                      -> Result<(RunHandle, Order), DemoError>
    where E: EventStore
{
    let run = orchestrator.prepare(workflow);

    let placed: Rc<RefCell<Option<Order>>> = Rc::default();
    let abandoned: Rc<RefCell<Option<String>>> = Rc::default();
    let sink = Rc::clone(&placed);
    orchestrator.on_complete(run, move |args| *sink.borrow_mut() = args.downcast_ref::<Order>().cloned())?;
    let sink = Rc::clone(&abandoned);
    orchestrator.on_abandon(run, move |reason| *sink.borrow_mut() = Some(reason))?;

    orchestrator.start(run, Args::from_output(locations))?;
    if let Err(err) = drive(orchestrator, run, script) {
        // Un run que queda activo nunca sale del registro.
        if orchestrator.state(run) == Some(RunState::Active) {
            warn!("abandoning order run: {err}");
            orchestrator.abandon(run, err.to_string())?;
        }
        return Err(err);
    }

    if let Some(reason) = abandoned.borrow_mut().take() {
        return Err(DemoError::Abandoned(reason));
    }
    let order = placed.borrow_mut().take().ok_or(DemoError::Incomplete)?;
    info!("order placed with {} item(s)", order.items.len());
    Ok((run, order))
}

fn drive<E>(orchestrator: &mut Orchestrator<E>, run: RunHandle, script: &Script) -> Result<(), DemoError>
    where E: EventStore
{
    let mut revisit = script.revisit_food;
    while let Some(step) = orchestrator.current(run) {
        let handle = step.handle();
        debug!("screen {} ({:?})", step.name(), step.hint());
        match decide(step, script, &mut revisit)? {
            Decision::Proceed(order) => orchestrator.proceed(handle, order)?,
            Decision::Back => orchestrator.backup(handle)?,
            Decision::Cancel(reason) => orchestrator.abandon(handle, reason)?,
        };
    }
    Ok(())
}

fn decide(step: &StepInstance, script: &Script, revisit: &mut bool) -> Result<Decision, DemoError> {
    if let Some(screen) = step.downcast_ref::<Locations>() {
        debug!("{} location(s) offered", screen.locations().len());
        return screen.choose(script.location)
                     .map(Decision::Proceed)
                     .ok_or(DemoError::UnknownLocation(script.location));
    }
    if let Some(screen) = step.downcast_ref::<PickupOrDelivery>() {
        let order = match &script.delivery_address {
            Some(address) => screen.deliver_to(address.clone()),
            None => screen.pickup(),
        };
        return Ok(Decision::Proceed(order));
    }
    if let Some(screen) = step.downcast_ref::<MenuSelection>() {
        return Ok(Decision::Proceed(screen.choose(script.menu.unwrap_or(MenuType::Regular))));
    }
    if let Some(screen) = step.downcast_ref::<FoodSelection>() {
        return Ok(Decision::Proceed(screen.select(script.items.iter().cloned())));
    }
    if step.is::<ReviewOrder>() {
        if std::mem::take(revisit) {
            return Ok(Decision::Back);
        }
        if let Some(reason) = &script.cancel_reason {
            return Ok(Decision::Cancel(reason.clone()));
        }
        if let Some(screen) = step.downcast_ref::<ReviewOrder>() {
            debug!("reviewing {} item(s)", screen.order().items.len());
            return Ok(Decision::Proceed(screen.confirm()));
        }
    }
    Err(DemoError::UnexpectedStep(step.name()))
}
