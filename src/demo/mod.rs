//! Workflow de ejemplo: pedido de comida.
//!
//! locales -> retiro o envío -> menú -> comida -> revisión
//!
//! Las pantallas de retiro/envío y de menú se saltan solas cuando el local
//! elegido no ofrece alternativas.

pub mod order;
pub mod script;
pub mod steps;

use flowpath_core::{PresentationHint, Workflow};

pub use order::{sample_locations, Location, MenuType, Order, OrderType, OrderTypeKind};
pub use script::{place_order, DemoError, Script};
pub use steps::{FoodSelection, Locations, MenuSelection, PickupOrDelivery, ReviewOrder};

/// Arma el workflow del pedido. La revisión final es opcional.
pub fn ordering_workflow(with_review: bool) -> Workflow {
    Workflow::starting_with::<Locations>().then::<PickupOrDelivery>()
                                          .then_presented::<MenuSelection>(PresentationHint::Navigation)
                                          .then::<FoodSelection>()
                                          .then_if(with_review, |b| {
                                              b.then_presented::<ReviewOrder>(PresentationHint::Modal)
                                          })
                                          .build()
}
