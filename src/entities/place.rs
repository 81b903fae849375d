use chrono::{DateTime, Utc};
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{invalid_input_error, Error};

pub const MIN_DESCRIPTION_LEN: usize = 8;

/// A point-of-interest record owned by a user. `location` is derived from
/// `address` at creation; `image_url` and `creator_id` are set once and
/// never reassigned.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Coordinates,
    pub image_url: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Fields accepted when registering a place. The image must already be
/// stored; coordinates are resolved from the address server side.
#[derive(Clone, Debug)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub address: String,
    pub image_url: String,
}

/// The only fields an owner may change after creation. Anything else in
/// the request body is dropped during deserialization.
#[derive(Clone, Debug, Deserialize)]
pub struct PlaceChanges {
    pub title: String,
    pub description: String,
}

impl Place {
    pub fn new(params: NewPlace, location: Coordinates, creator_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: params.title,
            description: params.description,
            address: params.address,
            location,
            image_url: params.image_url,
            creator_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.creator_id == user_id
    }

    pub fn apply(&mut self, changes: PlaceChanges) {
        self.title = changes.title;
        self.description = changes.description;
    }
}

impl NewPlace {
    pub fn validate(&self) -> Result<(), Error> {
        validate_details(&self.title, &self.description)?;

        if self.address.trim().is_empty() {
            return Err(invalid_input_error());
        }

        Ok(())
    }
}

impl PlaceChanges {
    pub fn validate(&self) -> Result<(), Error> {
        validate_details(&self.title, &self.description)
    }
}

fn validate_details(title: &str, description: &str) -> Result<(), Error> {
    if title.trim().is_empty() {
        return Err(invalid_input_error());
    }

    if description.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(invalid_input_error());
    }

    Ok(())
}

impl PolarClass for Place {
    fn get_polar_class_builder() -> oso::ClassBuilder<Place> {
        oso::Class::builder()
            .name("Place")
            .add_attribute_getter("id", |recv: &Place| recv.id.clone())
            .add_attribute_getter("creator_id", |recv: &Place| recv.creator_id.clone())
            .add_method("is_owned_by", Place::is_owned_by)
    }

    fn get_polar_class() -> oso::Class {
        let builder = Place::get_polar_class_builder();
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> NewPlace {
        NewPlace {
            title: "Istanbul".into(),
            description: "Hagia Sophia museum visit".into(),
            address: "Sultan Ahmet, Ayasofya Meydanı, 34122 Fatih/İstanbul".into(),
            image_url: "uploads/images/hagia-sophia.jpeg".into(),
        }
    }

    #[test]
    fn ownership_is_a_creator_id_match_test() {
        let creator_id = Uuid::new_v4();
        let location = Coordinates {
            lat: 41.008583,
            lng: 28.9779863,
        };

        let place = Place::new(sample_params(), location, creator_id);

        assert!(place.is_owned_by(creator_id));
        assert!(!place.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn apply_changes_only_title_and_description_test() {
        let creator_id = Uuid::new_v4();
        let location = Coordinates {
            lat: 41.008583,
            lng: 28.9779863,
        };

        let mut place = Place::new(sample_params(), location, creator_id);
        let id = place.id;

        place.apply(PlaceChanges {
            title: "Ayasofya".into(),
            description: "Worth more than one visit".into(),
        });

        assert_eq!(place.title, "Ayasofya");
        assert_eq!(place.description, "Worth more than one visit");
        assert_eq!(place.id, id);
        assert_eq!(place.address, sample_params().address);
        assert_eq!(place.location, location);
        assert_eq!(place.image_url, sample_params().image_url);
        assert_eq!(place.creator_id, creator_id);
    }

    #[test]
    fn changes_deserialization_drops_immutable_fields_test() {
        let changes: PlaceChanges = serde_json::from_str(
            r#"{
                "title": "Ayasofya",
                "description": "Worth more than one visit",
                "address": "somewhere else entirely",
                "location": { "lat": 1.0, "lng": 2.0 },
                "imageUrl": "uploads/images/other.png",
                "creatorId": "5f7eef76-7f7d-4b65-9c8b-598bf5e97b79"
            }"#,
        )
        .unwrap();

        assert_eq!(changes.title, "Ayasofya");
        assert_eq!(changes.description, "Worth more than one visit");
    }

    #[test]
    fn validate_rejects_blank_title_test() {
        let mut params = sample_params();
        params.title = "   ".into();

        assert!(params.validate().is_err());
    }

    #[test]
    fn validate_rejects_short_description_test() {
        let mut params = sample_params();
        params.description = "short".into();

        assert!(params.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_address_test() {
        let mut params = sample_params();
        params.address = "".into();

        assert!(params.validate().is_err());
    }

    #[test]
    fn validate_accepts_well_formed_params_test() {
        assert!(sample_params().validate().is_ok());
    }
}
