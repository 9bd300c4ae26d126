//! Modelo del pedido que viaja de pantalla en pantalla.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuType {
    Catering,
    Regular,
}

/// Modalidades que ofrece un local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderTypeKind {
    Pickup,
    Delivery,
}

/// Modalidad elegida para un pedido.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Pickup,
    Delivery { address: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: String,
    pub order_types: Vec<OrderTypeKind>,
    pub menu_types: Vec<MenuType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub location: Option<Location>,
    pub order_type: Option<OrderType>,
    pub menu_type: Option<MenuType>,
    pub items: Vec<String>,
}

impl Order {
    /// Pedido para `location`. Lo que el local ofrece sin alternativa queda
    /// decidido de antemano (sólo retiro en local, un único menú).
    pub fn at(location: Location) -> Self {
        let order_type = match location.order_types.as_slice() {
            [OrderTypeKind::Pickup] => Some(OrderType::Pickup),
            _ => None,
        };
        let menu_type = match location.menu_types.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        Self { location: Some(location),
               order_type,
               menu_type,
               items: Vec::new() }
    }
}

/// Locales de prueba para el demo.
pub fn sample_locations() -> Vec<Location> {
    vec![Location { name: "Centro".into(),
                    address: "Av. Principal 100".into(),
                    order_types: vec![OrderTypeKind::Pickup, OrderTypeKind::Delivery],
                    menu_types: vec![MenuType::Regular, MenuType::Catering] },
         Location { name: "Estación".into(),
                    address: "Andén 2".into(),
                    order_types: vec![OrderTypeKind::Pickup],
                    menu_types: vec![MenuType::Regular] },]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_choices_are_decided_up_front() {
        let locations = sample_locations();
        let kiosk = Order::at(locations[1].clone());
        assert_eq!(kiosk.order_type, Some(OrderType::Pickup));
        assert_eq!(kiosk.menu_type, Some(MenuType::Regular));

        let downtown = Order::at(locations[0].clone());
        assert_eq!(downtown.order_type, None);
        assert_eq!(downtown.menu_type, None);
    }
}
