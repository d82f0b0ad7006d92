use super::common::*;

use crate::marketplace::{
    MarketplaceError, ModerationDecision, PropertyCriteria, PropertyStatus, PropertyType,
};

#[test]
fn only_sellers_can_list_properties() {
    let fx = fixture();
    let err = fx
        .marketplace
        .properties
        .create(&fx.buyer, attributes("Barn", 90_000.0, PropertyType::Land))
        .expect_err("buyers cannot list");
    assert_eq!(err.kind(), "forbidden");
}

#[test]
fn new_listing_starts_available_and_owned_by_seller() {
    let fx = fixture();
    let property = fx.list("Maple House", 250_000.0, PropertyType::House);
    assert_eq!(property.status, PropertyStatus::Available);
    assert_eq!(property.owner_id, fx.seller.user_id);
    assert_eq!(property.buyer_id, None);
}

#[test]
fn sold_is_terminal() {
    let fx = fixture();
    let property = fx.list("Maple House", 250_000.0, PropertyType::House);

    let sold = fx
        .marketplace
        .properties
        .set_status(&fx.seller, property.id, PropertyStatus::Sold)
        .expect("direct sale");
    assert_eq!(sold.status, PropertyStatus::Sold);

    for next in PropertyStatus::ordered() {
        let err = fx
            .marketplace
            .properties
            .set_status(&fx.seller, property.id, next)
            .expect_err("sold is final");
        assert!(matches!(err, MarketplaceError::InvalidTransition { .. }));
    }
}

#[test]
fn same_state_change_is_an_invalid_transition() {
    let fx = fixture();
    let property = fx.list("Maple House", 250_000.0, PropertyType::House);
    let err = fx
        .marketplace
        .properties
        .set_status(&fx.seller, property.id, PropertyStatus::Available)
        .expect_err("no-op change");
    assert_eq!(err.kind(), "invalid_transition");
}

#[test]
fn status_changes_require_owner_or_admin() {
    let fx = fixture();
    let property = fx.list("Maple House", 250_000.0, PropertyType::House);

    let err = fx
        .marketplace
        .properties
        .set_status(&fx.other_seller, property.id, PropertyStatus::Pending)
        .expect_err("not the owner");
    assert_eq!(err.kind(), "forbidden");

    let updated = fx
        .marketplace
        .properties
        .set_status(&fx.admin, property.id, PropertyStatus::Pending)
        .expect("admin may change status");
    assert_eq!(updated.status, PropertyStatus::Pending);
}

#[test]
fn filters_combine_price_range_and_type() {
    let fx = fixture();
    fx.list("Cheap Flat", 80_000.0, PropertyType::Apartment);
    let wanted = fx.list("City Flat", 300_000.0, PropertyType::Apartment);
    fx.list("Town House", 300_000.0, PropertyType::House);
    fx.list("Penthouse", 900_000.0, PropertyType::Apartment);

    let criteria = PropertyCriteria {
        min_price: Some(100_000.0),
        max_price: Some(500_000.0),
        property_type: Some(PropertyType::Apartment),
        ..PropertyCriteria::default()
    };
    let found = fx
        .marketplace
        .properties
        .list_filtered(&criteria)
        .expect("filtered");

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, wanted.id);
    for property in &found {
        assert!(property.attributes.price >= 100_000.0 && property.attributes.price <= 500_000.0);
        assert_eq!(property.attributes.property_type, PropertyType::Apartment);
    }
}

#[test]
fn empty_criteria_return_everything_newest_first() {
    let fx = fixture();
    let first = fx.list("First", 1.0, PropertyType::Land);
    let second = fx.list("Second", 2.0, PropertyType::Land);
    let third = fx.list("Third", 3.0, PropertyType::Land);

    let all = fx
        .marketplace
        .properties
        .list_filtered(&PropertyCriteria::default())
        .expect("all");
    let ids: Vec<_> = all.iter().map(|property| property.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[test]
fn inverted_price_range_is_rejected() {
    let fx = fixture();
    let criteria = PropertyCriteria {
        min_price: Some(10.0),
        max_price: Some(5.0),
        ..PropertyCriteria::default()
    };
    let err = fx
        .marketplace
        .properties
        .list_filtered(&criteria)
        .expect_err("min above max");
    assert_eq!(err.kind(), "validation_error");
}

#[test]
fn reservation_then_sale_records_the_buyer() {
    let fx = fixture();
    let property = fx.list("Maple House", 250_000.0, PropertyType::House);

    let reserved = fx
        .marketplace
        .properties
        .reserve(&fx.buyer, property.id)
        .expect("reserved");
    assert_eq!(reserved.status, PropertyStatus::Pending);
    assert_eq!(reserved.buyer_id, Some(fx.buyer.user_id));

    let err = fx
        .marketplace
        .properties
        .reserve(&fx.buyer, property.id)
        .expect_err("already pending");
    assert_eq!(err.kind(), "invalid_transition");

    let sold = fx
        .marketplace
        .properties
        .complete_sale(&fx.seller, property.id)
        .expect("sale completed");
    assert_eq!(sold.status, PropertyStatus::Sold);
    assert_eq!(sold.buyer_id, Some(fx.buyer.user_id));

    let purchases = fx
        .marketplace
        .properties
        .list_purchased(fx.buyer.user_id)
        .expect("purchases");
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].id, property.id);
}

#[test]
fn cancelled_reservation_releases_the_listing() {
    let fx = fixture();
    let property = fx.list("Maple House", 250_000.0, PropertyType::House);
    fx.marketplace
        .properties
        .reserve(&fx.buyer, property.id)
        .expect("reserved");

    let released = fx
        .marketplace
        .properties
        .cancel_reservation(&fx.buyer, property.id)
        .expect("buyer cancels");
    assert_eq!(released.status, PropertyStatus::Available);
    assert_eq!(released.buyer_id, None);
    assert!(fx
        .marketplace
        .properties
        .list_purchased(fx.buyer.user_id)
        .expect("purchases")
        .is_empty());
}

#[test]
fn completing_without_reservation_is_refused() {
    let fx = fixture();
    let property = fx.list("Maple House", 250_000.0, PropertyType::House);
    let err = fx
        .marketplace
        .properties
        .complete_sale(&fx.seller, property.id)
        .expect_err("nothing reserved");
    match err {
        MarketplaceError::InvalidTransition { entity, from, .. } => {
            assert_eq!(entity, "reservation");
            assert_eq!(from, "available");
        }
        other => panic!("expected invalid transition, got {other:?}"),
    }
}

#[test]
fn only_the_owner_edits_attributes_and_status_is_kept() {
    let fx = fixture();
    let property = fx.list("Maple House", 250_000.0, PropertyType::House);
    fx.marketplace
        .properties
        .reserve(&fx.buyer, property.id)
        .expect("reserved");

    let err = fx
        .marketplace
        .properties
        .update(
            &fx.other_seller,
            property.id,
            attributes("Stolen", 1.0, PropertyType::House),
        )
        .expect_err("not the owner");
    assert_eq!(err.kind(), "forbidden");

    let updated = fx
        .marketplace
        .properties
        .update(
            &fx.seller,
            property.id,
            attributes("Maple House Renovated", 275_000.0, PropertyType::House),
        )
        .expect("owner edits");
    assert_eq!(updated.attributes.title, "Maple House Renovated");
    assert_eq!(updated.status, PropertyStatus::Pending);
}

#[test]
fn delete_is_blocked_while_an_advertisement_is_active() {
    let fx = fixture();
    let property = fx.list("Maple House", 250_000.0, PropertyType::House);
    let request = fx.request_ad(&property);

    let err = fx
        .marketplace
        .properties
        .delete(&fx.seller, property.id)
        .expect_err("pending request");
    assert_eq!(err.kind(), "conflict");

    fx.marketplace
        .advertisements
        .decide(&fx.employee, request.id, ModerationDecision::Rejected)
        .expect("rejected");
    fx.marketplace
        .properties
        .delete(&fx.seller, property.id)
        .expect("rejected history does not block");

    let err = fx
        .marketplace
        .properties
        .get(property.id)
        .expect_err("gone");
    assert_eq!(err.kind(), "not_found");
}

#[test]
fn reserving_a_sold_property_leaves_it_untouched() {
    let fx = fixture();
    let property = fx.list("Sold Loft", 320_000.0, PropertyType::Apartment);
    fx.marketplace
        .properties
        .set_status(&fx.seller, property.id, PropertyStatus::Sold)
        .expect("sold directly");

    let err = fx
        .marketplace
        .properties
        .reserve(&fx.buyer, property.id)
        .expect_err("already sold");
    assert!(matches!(err, MarketplaceError::InvalidTransition { .. }));

    let stored = fx.marketplace.properties.get(property.id).expect("stored");
    assert_eq!(stored.status, PropertyStatus::Sold);
    assert_eq!(stored.buyer_id, None);
}
