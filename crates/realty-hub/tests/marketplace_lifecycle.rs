use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use realty_hub::config::MarketplaceConfig;
use realty_hub::marketplace::{
    Actor, AdvertisementStatus, AdvertisementSubmission, AdvertisingAction, Clock,
    DashboardFilters, ManualClock, Marketplace, MemoryStore, ModerationDecision,
    PropertyAttributes, PropertyCriteria, PropertyStatus, PropertyType, Role, UserRegistration,
};

struct World {
    marketplace: Marketplace<MemoryStore>,
    clock: Arc<ManualClock>,
}

impl World {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 7, 14, 10, 0, 0)
                .single()
                .expect("valid start"),
        ));
        let shared: Arc<dyn Clock> = clock.clone();
        let marketplace = Marketplace::new(
            Arc::new(MemoryStore::new()),
            shared,
            &MarketplaceConfig::default(),
        );
        Self { marketplace, clock }
    }

    fn join(&self, name: &str, role: Role) -> Actor {
        self.clock.advance(Duration::seconds(30));
        self.marketplace
            .users
            .register(UserRegistration {
                name: name.to_string(),
                email: format!("{}@homes.test", name.to_ascii_lowercase()),
                role,
            })
            .expect("registration succeeds")
            .actor()
    }
}

fn townhouse() -> PropertyAttributes {
    PropertyAttributes {
        title: "Canal Townhouse".to_string(),
        description: "Three storeys on the canal".to_string(),
        price: 410_000.0,
        location: "Old Harbour".to_string(),
        property_type: PropertyType::House,
        bedrooms: 3,
        bathrooms: 2,
        area: Some(140.0),
        amenities: vec!["Roof terrace".to_string(), "Bike storage".to_string()],
        image: Some("uploads/canal.jpg".to_string()),
    }
}

#[test]
fn listing_is_advertised_favourited_and_sold() {
    let world = World::new();
    let admin = world.join("Morgan", Role::Admin);
    let employee = world.join("Robin", Role::Employee);
    let seller = world.join("Taylor", Role::Seller);
    let buyer = world.join("Jordan", Role::Buyer);
    let market = &world.marketplace;

    let property = market
        .properties
        .create(&seller, townhouse())
        .expect("listing created");

    world.clock.advance(Duration::minutes(5));
    let request = market
        .advertisements
        .submit(
            &seller,
            AdvertisementSubmission {
                property_id: property.id,
                amount: 120.0,
                currency: "gbp".to_string(),
            },
        )
        .expect("advertisement requested");
    assert_eq!(
        market.advertisements.advertising_action(property.id).expect("action"),
        AdvertisingAction::Pending
    );
    assert!(market.feed.active_feed().expect("feed").is_empty());

    world.clock.advance(Duration::minutes(5));
    let approved = market
        .advertisements
        .decide(&employee, request.id, ModerationDecision::Approved)
        .expect("approved");
    assert_eq!(approved.status, AdvertisementStatus::Approved);

    let feed = market.feed.active_feed().expect("feed");
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].property.id, property.id);

    let outcome = market
        .favorites
        .toggle(&buyer, property.id)
        .expect("favourited");
    assert!(outcome.added);

    let found = market
        .properties
        .list_filtered(&PropertyCriteria {
            location: Some("harbour".to_string()),
            min_bedrooms: Some(3),
            ..PropertyCriteria::default()
        })
        .expect("search");
    assert_eq!(found.len(), 1);

    market
        .properties
        .reserve(&buyer, property.id)
        .expect("reserved");
    let sold = market
        .properties
        .complete_sale(&seller, property.id)
        .expect("sold");
    assert_eq!(sold.status, PropertyStatus::Sold);
    assert_eq!(sold.buyer_id, Some(buyer.user_id));

    let stats = market
        .reporting
        .dashboard_stats(&admin, &DashboardFilters::default())
        .expect("dashboard");
    assert_eq!(stats.users.total, 4);
    assert_eq!(stats.properties.total, 1);
    assert_eq!(stats.advertisements.total, 1);
    assert_eq!(stats.properties.recent_properties[0].status, PropertyStatus::Sold);
}

#[test]
fn rejected_advertisement_is_retried_and_approved() {
    let world = World::new();
    let employee = world.join("Robin", Role::Employee);
    let seller = world.join("Taylor", Role::Seller);
    let market = &world.marketplace;
    let property = market
        .properties
        .create(&seller, townhouse())
        .expect("listing created");
    let submission = AdvertisementSubmission {
        property_id: property.id,
        amount: 60.0,
        currency: "EUR".to_string(),
    };

    let first = market
        .advertisements
        .submit(&seller, submission.clone())
        .expect("first request");
    world.clock.advance(Duration::hours(1));
    market
        .advertisements
        .decide(&employee, first.id, ModerationDecision::Rejected)
        .expect("rejected");

    world.clock.advance(Duration::hours(1));
    let retry = market
        .advertisements
        .submit(&seller, submission)
        .expect("retry allowed after rejection");
    market
        .advertisements
        .decide(&employee, retry.id, ModerationDecision::Approved)
        .expect("approved");

    let history = market
        .advertisements
        .list_for_property(property.id)
        .expect("history");
    let statuses: Vec<_> = history.iter().map(|request| request.status).collect();
    assert_eq!(
        statuses,
        vec![AdvertisementStatus::Approved, AdvertisementStatus::Rejected]
    );
    assert_eq!(
        market
            .advertisements
            .status_for_property(property.id)
            .expect("status"),
        Some(AdvertisementStatus::Approved)
    );
}

#[test]
fn duplicate_email_is_rejected_case_insensitively() {
    let world = World::new();
    world.join("Avery", Role::Buyer);
    let err = world
        .marketplace
        .users
        .register(UserRegistration {
            name: "Avery Again".to_string(),
            email: "AVERY@homes.test".to_string(),
            role: Role::Seller,
        })
        .expect_err("duplicate");
    assert_eq!(err.kind(), "conflict");
}
