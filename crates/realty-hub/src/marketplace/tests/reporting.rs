use chrono::{Duration, NaiveDate};

use super::common::*;

use crate::config::MarketplaceConfig;
use crate::marketplace::reporting::CountEntry;
use crate::marketplace::{
    DashboardFilters, FeedbackSubmission, ModerationDecision, PropertyStatus, PropertyType, Role,
};

fn feedback(name: &str) -> FeedbackSubmission {
    FeedbackSubmission {
        name: name.to_string(),
        email: format!("{}@mail.test", name.to_ascii_lowercase()),
        message: "Great listings".to_string(),
    }
}

#[test]
fn dashboard_is_admin_only() {
    let fx = fixture();
    let err = fx
        .marketplace
        .reporting
        .dashboard_stats(&fx.employee, &DashboardFilters::default())
        .expect_err("employee");
    assert_eq!(err.kind(), "forbidden");
}

#[test]
fn user_role_filter_narrows_listing_but_not_counts() {
    let fx = fixture();
    let filters = DashboardFilters {
        user_role: Some(Role::Seller),
        ..DashboardFilters::default()
    };
    let stats = fx
        .marketplace
        .reporting
        .dashboard_stats(&fx.admin, &filters)
        .expect("stats");

    assert_eq!(stats.users.total, 5);
    assert_eq!(CountEntry::count_for(&stats.users.by_role, "seller"), 2);
    assert_eq!(CountEntry::count_for(&stats.users.by_role, "buyer"), 1);
    assert_eq!(stats.users.users.len(), 2);
    assert!(stats.users.users.iter().all(|user| user.role == Role::Seller));
}

#[test]
fn categories_are_filtered_independently() {
    let fx = fixture();
    fx.list("May Listing", 1.0, PropertyType::Land);
    fx.clock.advance(Duration::days(40));
    let june = fx.list("June Listing", 2.0, PropertyType::Land);
    fx.marketplace
        .properties
        .set_status(&fx.seller, june.id, PropertyStatus::Sold)
        .expect("sold");
    fx.marketplace
        .feedback
        .submit(feedback("Quinn"))
        .expect("feedback");

    let filters = DashboardFilters {
        property_date_from: NaiveDate::from_ymd_opt(2025, 6, 1),
        ..DashboardFilters::default()
    };
    let stats = fx
        .marketplace
        .reporting
        .dashboard_stats(&fx.admin, &filters)
        .expect("stats");

    assert_eq!(stats.properties.total, 1);
    assert_eq!(CountEntry::count_for(&stats.properties.by_status, "sold"), 1);
    assert_eq!(CountEntry::count_for(&stats.properties.by_status, "available"), 0);
    assert_eq!(stats.users.total, 5);
    assert_eq!(stats.feedback.total, 1);

    let filters = DashboardFilters {
        property_status: Some(PropertyStatus::Available),
        ..DashboardFilters::default()
    };
    let stats = fx
        .marketplace
        .reporting
        .dashboard_stats(&fx.admin, &filters)
        .expect("stats");
    assert_eq!(stats.properties.total, 2);
    assert_eq!(stats.properties.recent_properties.len(), 1);
    assert_eq!(
        stats.properties.recent_properties[0].attributes.title,
        "May Listing"
    );
}

#[test]
fn recent_lists_follow_configured_limit() {
    let fx = fixture_with(MarketplaceConfig {
        recent_limit: 2,
        ..MarketplaceConfig::default()
    });
    for index in 0..4 {
        fx.list(&format!("Plot {index}"), 10.0, PropertyType::Land);
        fx.marketplace
            .feedback
            .submit(feedback(&format!("Guest{index}")))
            .expect("feedback");
    }

    let stats = fx
        .marketplace
        .reporting
        .dashboard_stats(&fx.admin, &DashboardFilters::default())
        .expect("stats");
    assert_eq!(stats.properties.total, 4);
    let titles: Vec<_> = stats
        .properties
        .recent_properties
        .iter()
        .map(|property| property.attributes.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Plot 3", "Plot 2"]);
    assert_eq!(stats.feedback.total, 4);
    assert_eq!(stats.feedback.recent_feedback.len(), 2);
}

#[test]
fn default_limit_is_five() {
    let fx = fixture();
    for index in 0..7 {
        fx.list(&format!("Plot {index}"), 10.0, PropertyType::Land);
    }
    let stats = fx
        .marketplace
        .reporting
        .dashboard_stats(&fx.admin, &DashboardFilters::default())
        .expect("stats");
    assert_eq!(stats.properties.recent_properties.len(), 5);
}

#[test]
fn advertisement_requests_are_counted_per_status() {
    let fx = fixture();
    let approved = fx.list("Approved", 1.0, PropertyType::Land);
    let rejected = fx.list("Rejected", 1.0, PropertyType::Land);
    let pending = fx.list("Pending", 1.0, PropertyType::Land);

    let request = fx.request_ad(&approved);
    fx.approve(&request);
    let request = fx.request_ad(&rejected);
    fx.marketplace
        .advertisements
        .decide(&fx.employee, request.id, ModerationDecision::Rejected)
        .expect("rejected");
    fx.request_ad(&pending);

    let stats = fx
        .marketplace
        .reporting
        .dashboard_stats(&fx.admin, &DashboardFilters::default())
        .expect("stats");
    assert_eq!(stats.advertisements.total, 3);
    for key in ["pending", "approved", "rejected"] {
        assert_eq!(CountEntry::count_for(&stats.advertisements.by_status, key), 1);
    }
}

#[test]
fn inverted_feedback_range_is_rejected() {
    let fx = fixture();
    let filters = DashboardFilters {
        feedback_date_from: NaiveDate::from_ymd_opt(2025, 2, 1),
        feedback_date_to: NaiveDate::from_ymd_opt(2025, 1, 1),
        ..DashboardFilters::default()
    };
    let err = fx
        .marketplace
        .reporting
        .dashboard_stats(&fx.admin, &filters)
        .expect_err("inverted");
    assert_eq!(err.kind(), "validation_error");
}
