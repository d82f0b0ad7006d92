use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::MarketplaceConfig;
use crate::marketplace::{
    Actor, AdvertisementRequest, AdvertisementSubmission, Clock, ManualClock, Marketplace,
    MemoryStore, ModerationDecision, Property, PropertyAttributes, PropertyType, Role, UserId,
    UserRegistration, ACTOR_HEADER,
};

pub(super) struct Fixture {
    pub(super) marketplace: Arc<Marketplace<MemoryStore>>,
    pub(super) clock: Arc<ManualClock>,
    pub(super) admin: Actor,
    pub(super) employee: Actor,
    pub(super) seller: Actor,
    pub(super) other_seller: Actor,
    pub(super) buyer: Actor,
}

impl Fixture {
    /// Moves the clock forward so consecutive records get distinct timestamps.
    pub(super) fn tick(&self) {
        self.clock.advance(Duration::minutes(1));
    }

    pub(super) fn list(&self, title: &str, price: f64, kind: PropertyType) -> Property {
        self.list_as(&self.seller, title, price, kind)
    }

    pub(super) fn list_as(
        &self,
        seller: &Actor,
        title: &str,
        price: f64,
        kind: PropertyType,
    ) -> Property {
        self.tick();
        self.marketplace
            .properties
            .create(seller, attributes(title, price, kind))
            .expect("listing created")
    }

    pub(super) fn request_ad(&self, property: &Property) -> AdvertisementRequest {
        self.tick();
        self.marketplace
            .advertisements
            .submit(&self.seller, submission(property))
            .expect("request submitted")
    }

    pub(super) fn approve(&self, request: &AdvertisementRequest) -> AdvertisementRequest {
        self.tick();
        self.marketplace
            .advertisements
            .decide(&self.employee, request.id, ModerationDecision::Approved)
            .expect("request approved")
    }
}

pub(super) fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0)
        .single()
        .expect("valid start")
}

pub(super) fn fixture() -> Fixture {
    fixture_with(MarketplaceConfig::default())
}

pub(super) fn fixture_with(config: MarketplaceConfig) -> Fixture {
    let clock = Arc::new(ManualClock::new(start()));
    let shared_clock: Arc<dyn Clock> = clock.clone();
    let marketplace = Marketplace::new(Arc::new(MemoryStore::new()), shared_clock, &config);

    let register = |name: &str, role: Role| {
        marketplace
            .users
            .register(UserRegistration {
                name: name.to_string(),
                email: format!("{}@realty.test", name.to_ascii_lowercase()),
                role,
            })
            .expect("user registered")
            .actor()
    };

    let admin = register("Ada", Role::Admin);
    let employee = register("Eli", Role::Employee);
    let seller = register("Sam", Role::Seller);
    let other_seller = register("Sol", Role::Seller);
    let buyer = register("Bea", Role::Buyer);

    Fixture {
        marketplace: Arc::new(marketplace),
        clock,
        admin,
        employee,
        seller,
        other_seller,
        buyer,
    }
}

pub(super) fn attributes(title: &str, price: f64, kind: PropertyType) -> PropertyAttributes {
    PropertyAttributes {
        title: title.to_string(),
        description: format!("{title} close to town"),
        price,
        location: "Riverside".to_string(),
        property_type: kind,
        bedrooms: 3,
        bathrooms: 2,
        area: Some(120.0),
        amenities: vec!["Garden".to_string()],
        image: Some("images/listing.jpg".to_string()),
    }
}

pub(super) fn submission(property: &Property) -> AdvertisementSubmission {
    AdvertisementSubmission {
        property_id: property.id,
        amount: 75.0,
        currency: "usd".to_string(),
    }
}

pub(super) fn request(
    method: Method,
    uri: &str,
    actor: Option<UserId>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor.to_string());
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).expect("serialize body"))
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
