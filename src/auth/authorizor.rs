use oso::{Oso, PolarClass};

use crate::auth::User;
use crate::entities::Place;

pub fn new() -> Oso {
    let mut o = Oso::new();

    o.register_class(User::get_polar_class()).unwrap();
    o.register_class(Place::get_polar_class()).unwrap();

    o.load_str(include_str!("rules.polar")).unwrap();

    o
}

#[cfg(test)]
fn test_place(creator_id: uuid::Uuid) -> Place {
    use crate::entities::{Coordinates, NewPlace};

    Place::new(
        NewPlace {
            title: "Istanbul".into(),
            description: "Hagia Sophia museum visit".into(),
            address: "Sultan Ahmet, Ayasofya Meydanı, 34122 Fatih/İstanbul".into(),
            image_url: "uploads/images/hagia-sophia.jpeg".into(),
        },
        Coordinates {
            lat: 41.008583,
            lng: 28.9779863,
        },
        creator_id,
    )
}

#[test]
fn owner_can_update_and_delete_test() {
    use uuid::Uuid;

    let authorizor = new();

    let owner = User::new(Uuid::new_v4());
    let place = test_place(owner.id);

    let result = authorizor.is_allowed(owner.clone(), "update", place.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(owner, "delete", place);
    assert_eq!(result.unwrap(), true);
}

#[test]
fn non_owner_cannot_update_or_delete_test() {
    use uuid::Uuid;

    let authorizor = new();

    let place = test_place(Uuid::new_v4());
    let other = User::new(Uuid::new_v4());

    let result = authorizor.is_allowed(other.clone(), "update", place.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(other, "delete", place);
    assert_eq!(result.unwrap(), false);
}

#[test]
fn admin_can_act_on_any_place_test() {
    use uuid::Uuid;

    let authorizor = new();

    let place = test_place(Uuid::new_v4());
    let admin = User::new_admin_user();

    let result = authorizor.is_allowed(admin.clone(), "update", place.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(admin, "delete", place);
    assert_eq!(result.unwrap(), true);
}
