use chrono::{Duration, NaiveDate, Utc};
use clap::Args;
use realty_hub::config::MarketplaceConfig;
use realty_hub::error::AppError;
use realty_hub::marketplace::{
    Actor, AdvertisementRequest, AdvertisementSubmission, Clock, DashboardFilters, ManualClock,
    Marketplace, MemoryStore, ModerationDecision, PropertyAttributes, PropertyType, Role,
    UserRegistration,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Day the scripted walk-through starts on (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Reject the first advertisement request so the seller has to retry.
    #[arg(long)]
    pub(crate) reject_first: bool,
    /// Upper bound for the dashboard's recent lists.
    #[arg(long, default_value_t = MarketplaceConfig::DEFAULT_RECENT_LIMIT)]
    pub(crate) recent_limit: usize,
}

struct Cast {
    admin: Actor,
    employee: Actor,
    seller: Actor,
    buyer: Actor,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        start_date,
        reject_first,
        recent_limit,
    } = args;

    let start_date = start_date.unwrap_or_else(|| Utc::now().date_naive());
    let start = start_date
        .and_hms_opt(9, 0, 0)
        .unwrap_or_default()
        .and_utc();
    let clock = Arc::new(ManualClock::new(start));
    let shared_clock: Arc<dyn Clock> = clock.clone();
    let config = MarketplaceConfig {
        recent_limit: recent_limit.max(1),
        ..MarketplaceConfig::default()
    };
    let market = Marketplace::new(Arc::new(MemoryStore::new()), shared_clock, &config);

    println!("realty-hub lifecycle demo ({start_date})");
    let cast = register_cast(&market)?;

    println!("\nListings");
    let townhouse = market.properties.create(
        &cast.seller,
        listing("Canal Townhouse", 410_000.0, PropertyType::House, 3),
    )?;
    clock.advance(Duration::hours(1));
    let studio = market.properties.create(
        &cast.seller,
        listing("Harbour Studio", 165_000.0, PropertyType::Apartment, 1),
    )?;
    for property in [&townhouse, &studio] {
        println!(
            "  #{} {} ({}, {:.0}) status={}",
            property.id,
            property.attributes.title,
            property.attributes.property_type.label(),
            property.attributes.price,
            property.status.label()
        );
    }

    println!("\nAdvertisement requests");
    clock.advance(Duration::hours(1));
    let mut request = submit(&market, &cast, townhouse.id)?;
    if reject_first {
        clock.advance(Duration::hours(1));
        let rejected =
            market
                .advertisements
                .decide(&cast.employee, request.id, ModerationDecision::Rejected)?;
        print_request("rejected", &rejected);
        println!(
            "  seller action for #{}: {:?}",
            townhouse.id,
            market.advertisements.advertising_action(townhouse.id)?
        );
        clock.advance(Duration::hours(1));
        request = submit(&market, &cast, townhouse.id)?;
    }
    if let Err(err) = market.advertisements.submit(
        &cast.seller,
        AdvertisementSubmission {
            property_id: townhouse.id,
            amount: 50.0,
            currency: "EUR".to_string(),
        },
    ) {
        println!("  duplicate request refused: {err}");
    }

    clock.advance(Duration::hours(1));
    let approved =
        market
            .advertisements
            .decide(&cast.employee, request.id, ModerationDecision::Approved)?;
    print_request("approved", &approved);

    println!("\nActive advertisement feed");
    for featured in market.feed.active_feed()? {
        println!(
            "  request #{} -> {} at {:.0}",
            featured.request.id,
            featured.property.attributes.title,
            featured.property.attributes.price
        );
    }

    println!("\nBuyer activity");
    for property in [&studio, &townhouse] {
        let outcome = market.favorites.toggle(&cast.buyer, property.id)?;
        println!("  favourite #{} added={}", property.id, outcome.added);
    }
    let favourites = market.favorites.list(cast.buyer.user_id)?;
    println!(
        "  favourites (newest first): {}",
        favourites
            .iter()
            .map(|property| property.attributes.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    clock.advance(Duration::days(1));
    let reserved = market.properties.reserve(&cast.buyer, townhouse.id)?;
    println!("  reserved #{} status={}", reserved.id, reserved.status.label());
    clock.advance(Duration::days(2));
    let sold = market.properties.complete_sale(&cast.seller, townhouse.id)?;
    println!("  sale completed #{} status={}", sold.id, sold.status.label());

    market.feedback.submit(realty_hub::marketplace::FeedbackSubmission {
        name: "Visitor".to_string(),
        email: "visitor@example.com".to_string(),
        message: "Smooth purchase, thanks!".to_string(),
    })?;

    println!("\nAdmin dashboard");
    let stats = market
        .reporting
        .dashboard_stats(&cast.admin, &DashboardFilters::default())?;
    println!("  users: {}", stats.users.total);
    for entry in &stats.users.by_role {
        println!("    {}: {}", entry.key, entry.count);
    }
    println!("  properties: {}", stats.properties.total);
    for entry in &stats.properties.by_status {
        println!("    {}: {}", entry.key, entry.count);
    }
    println!("  advertisement requests: {}", stats.advertisements.total);
    for entry in &stats.advertisements.by_status {
        println!("    {}: {}", entry.key, entry.count);
    }
    println!("  feedback: {}", stats.feedback.total);

    Ok(())
}

fn register_cast(market: &Marketplace<MemoryStore>) -> Result<Cast, AppError> {
    let join = |name: &str, role: Role| -> Result<Actor, AppError> {
        let user = market.users.register(UserRegistration {
            name: name.to_string(),
            email: format!("{}@realty-hub.example", name.to_ascii_lowercase()),
            role,
        })?;
        println!("  registered {} #{} as {}", user.name, user.id, user.role.label());
        Ok(user.actor())
    };

    println!("\nUsers");
    Ok(Cast {
        admin: join("Morgan", Role::Admin)?,
        employee: join("Robin", Role::Employee)?,
        seller: join("Taylor", Role::Seller)?,
        buyer: join("Jordan", Role::Buyer)?,
    })
}

fn submit(
    market: &Marketplace<MemoryStore>,
    cast: &Cast,
    property_id: realty_hub::marketplace::PropertyId,
) -> Result<AdvertisementRequest, AppError> {
    let request = market.advertisements.submit(
        &cast.seller,
        AdvertisementSubmission {
            property_id,
            amount: 120.0,
            currency: "eur".to_string(),
        },
    )?;
    print_request("submitted", &request);
    Ok(request)
}

fn print_request(event: &str, request: &AdvertisementRequest) {
    println!(
        "  {event} request #{} for property #{} ({:.2} {}) status={}",
        request.id,
        request.property_id,
        request.amount,
        request.currency,
        request.status.label()
    );
}

fn listing(title: &str, price: f64, kind: PropertyType, bedrooms: u16) -> PropertyAttributes {
    PropertyAttributes {
        title: title.to_string(),
        description: format!("{title}, freshly listed"),
        price,
        location: "Old Harbour".to_string(),
        property_type: kind,
        bedrooms,
        bathrooms: 1,
        area: None,
        amenities: Vec::new(),
        image: None,
    }
}
