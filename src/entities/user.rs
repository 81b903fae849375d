use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A directory account. `places` holds the ids of every place the user
/// created, kept in step with `Place.creator_id` by the place service's
/// transactions. Registration here is identity-only; credentials live with
/// the external auth service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub places: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            places: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn add_place(&mut self, place_id: Uuid) {
        if !self.places.contains(&place_id) {
            self.places.push(place_id);
        }
    }

    pub fn remove_place(&mut self, place_id: &Uuid) {
        self.places.retain(|id| id != place_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_place_is_idempotent_test() {
        let mut user = User::new("umran".into());
        let place_id = Uuid::new_v4();

        user.add_place(place_id);
        user.add_place(place_id);

        assert_eq!(user.places, vec![place_id]);
    }

    #[test]
    fn remove_place_drops_the_reference_test() {
        let mut user = User::new("umran".into());
        let kept = Uuid::new_v4();
        let removed = Uuid::new_v4();

        user.add_place(kept);
        user.add_place(removed);
        user.remove_place(&removed);

        assert_eq!(user.places, vec![kept]);
    }
}
