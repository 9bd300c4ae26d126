//! Pantallas del pedido. Cada una recibe el pedido parcial y entrega la
//! versión completada con su decisión.

use flowpath_core::FlowStep;

use super::order::{Location, MenuType, Order, OrderType, OrderTypeKind};

pub struct Locations {
    locations: Vec<Location>,
}

impl FlowStep for Locations {
    type Input = Vec<Location>;
    type Output = Order;

    fn create(locations: Vec<Location>) -> Self {
        Self { locations }
    }
}

impl Locations {
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn choose(&self, index: usize) -> Option<Order> {
        self.locations.get(index).cloned().map(Order::at)
    }
}

pub struct PickupOrDelivery {
    order: Order,
}

impl FlowStep for PickupOrDelivery {
    type Input = Order;
    type Output = Order;

    fn create(order: Order) -> Self {
        Self { order }
    }

    fn should_load(&self) -> bool {
        self.order.order_type.is_none()
    }
}

impl PickupOrDelivery {
    pub fn options(&self) -> &[OrderTypeKind] {
        self.order.location.as_ref().map(|l| l.order_types.as_slice()).unwrap_or_default()
    }

    pub fn pickup(&self) -> Order {
        Order { order_type: Some(OrderType::Pickup),
                ..self.order.clone() }
    }

    pub fn deliver_to(&self, address: impl Into<String>) -> Order {
        Order { order_type: Some(OrderType::Delivery { address: address.into() }),
                ..self.order.clone() }
    }
}

pub struct MenuSelection {
    order: Order,
}

impl FlowStep for MenuSelection {
    type Input = Order;
    type Output = Order;

    fn create(order: Order) -> Self {
        Self { order }
    }

    fn should_load(&self) -> bool {
        self.order.menu_type.is_none()
    }
}

impl MenuSelection {
    pub fn choose(&self, menu: MenuType) -> Order {
        Order { menu_type: Some(menu),
                ..self.order.clone() }
    }
}

pub struct FoodSelection {
    order: Order,
}

impl FlowStep for FoodSelection {
    type Input = Order;
    type Output = Order;

    fn create(order: Order) -> Self {
        Self { order }
    }
}

impl FoodSelection {
    /// Reemplaza la selección previa (volver a esta pantalla no acumula).
    pub fn select<I, S>(&self, items: I) -> Order
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Order { items: items.into_iter().map(Into::into).collect(),
                ..self.order.clone() }
    }
}

pub struct ReviewOrder {
    order: Order,
}

impl FlowStep for ReviewOrder {
    type Input = Order;
    type Output = Order;

    fn create(order: Order) -> Self {
        Self { order }
    }
}

impl ReviewOrder {
    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn confirm(&self) -> Order {
        self.order.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::order::sample_locations;

    #[test]
    fn decided_choices_make_their_screens_skip() {
        let kiosk = Order::at(sample_locations()[1].clone());
        assert!(!PickupOrDelivery::create(kiosk.clone()).should_load());
        assert!(!MenuSelection::create(kiosk).should_load());

        let downtown = Order::at(sample_locations()[0].clone());
        let screen = PickupOrDelivery::create(downtown);
        assert!(screen.should_load());
        assert_eq!(screen.options(), &[OrderTypeKind::Pickup, OrderTypeKind::Delivery]);
    }

    #[test]
    fn food_selection_replaces_items() {
        let screen = FoodSelection::create(Order { items: vec!["old".into()],
                                                   ..Order::default() });
        assert_eq!(screen.select(["taco", "soda"]).items, vec!["taco", "soda"]);
    }
}
