use chrono::{Duration, Local, NaiveDate};
use clap::Args;

use immokey::auth::AuthContext;
use immokey::config::AppConfig;
use immokey::error::AppError;
use immokey::hospitality::domain::{BookingChannel, Establishment, GuestContact, Room};
use immokey::hospitality::reservations::ReservationRequest;
use immokey::hospitality::revenue::{Granularity, ReportingWindow, RevenueError};
use immokey::hospitality::{NewEstablishment, NewRoom};

use crate::infra::{parse_date, parse_granularity, Backend};

const DEMO_OWNER: &str = "user-demo";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Bucket size for the revenue section: day, week, or month
    #[arg(long, value_parser = parse_granularity)]
    pub(crate) granularity: Option<Granularity>,
}

#[derive(Args, Debug)]
pub(crate) struct RevenueReportArgs {
    /// Bucket size: day, week, or month
    #[arg(long, default_value = "month", value_parser = parse_granularity)]
    pub(crate) granularity: Granularity,
    /// Explicit window start (YYYY-MM-DD); requires --end
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Explicit window end, exclusive (YYYY-MM-DD); requires --start
    #[arg(long, value_parser = parse_date)]
    pub(crate) end: Option<NaiveDate>,
    /// Override the reporting date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Caller identity the report is scoped to
    #[arg(long, default_value = DEMO_OWNER)]
    pub(crate) user: String,
}

struct DemoSeed {
    establishment: Establishment,
    rooms: Vec<Room>,
}

fn guest(full_name: &str, email: &str) -> GuestContact {
    GuestContact {
        full_name: full_name.to_string(),
        email: email.to_string(),
        phone: None,
    }
}

/// Provision the demo establishment and a season of bookings so that the
/// availability and revenue sections have something to show.
fn seed_demo(backend: &Backend, today: NaiveDate, currency: &str) -> Result<DemoSeed, AppError> {
    let inventory = backend.inventory();
    let reservations = backend.reservations();

    let establishment = inventory.register_establishment(NewEstablishment {
        owner_id: DEMO_OWNER.to_string(),
        name: "Résidence Teranga".to_string(),
        slug: "residence-teranga".to_string(),
        public_booking_enabled: true,
        branding: immokey::hospitality::Branding {
            tagline: Some("Hospitalité au bord de l'Atlantique".to_string()),
            logo_url: None,
        },
    })?;

    let baobab = inventory.open_room(NewRoom {
        establishment_id: establishment.id.clone(),
        name: "Chambre Baobab".to_string(),
        price_per_night: 50_000,
        currency: currency.to_string(),
    })?;
    let atlantique = inventory.open_room(NewRoom {
        establishment_id: establishment.id.clone(),
        name: "Suite Atlantique".to_string(),
        price_per_night: 85_000,
        currency: currency.to_string(),
    })?;
    for room in [&baobab, &atlantique] {
        backend.bookings.register_owner(room.id.clone(), DEMO_OWNER);
    }

    // A season of completed, paid stays plus one upcoming pending booking.
    let paid_stays = [
        (&baobab, today - Duration::days(70), 3, "Awa Diop"),
        (&baobab, today - Duration::days(40), 2, "Moussa Ndiaye"),
        (&atlantique, today - Duration::days(38), 4, "Fatou Sall"),
        (&baobab, today - Duration::days(10), 2, "Ibrahima Ba"),
    ];
    for (room, check_in, nights, name) in paid_stays {
        let booking = reservations.create(ReservationRequest {
            room_id: room.id.clone(),
            guest: guest(name, "guest@example.test"),
            check_in,
            check_out: check_in + Duration::days(nights),
            channel: BookingChannel::BackOffice,
        })?;
        reservations.confirm(&booking.id)?;
        reservations.capture_payment(&booking.id)?;
    }

    let upcoming = reservations.create(ReservationRequest {
        room_id: atlantique.id.clone(),
        guest: guest("Cheikh Faye", "cheikh@example.test"),
        check_in: today + Duration::days(7),
        check_out: today + Duration::days(10),
        channel: BookingChannel::PublicSite,
    })?;
    reservations.confirm(&upcoming.id)?;

    Ok(DemoSeed {
        establishment,
        rooms: vec![baobab, atlantique],
    })
}

pub(crate) fn run_revenue_report(args: RevenueReportArgs) -> Result<(), AppError> {
    let RevenueReportArgs {
        granularity,
        start,
        end,
        today,
        user,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let window = match (start, end) {
        (Some(start), Some(end)) => {
            Some(ReportingWindow::explicit(start, end).map_err(RevenueError::from)?)
        }
        _ => None,
    };

    let config = AppConfig::load()?;
    let backend = Backend::new();
    seed_demo(&backend, today, &config.catalog.default_currency)?;

    let report = backend
        .revenue()
        .report(&AuthContext::authenticated(user), granularity, window, today)?;
    render_revenue_report(&report);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, granularity } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let granularity = granularity.unwrap_or(Granularity::Month);

    let config = AppConfig::load()?;
    let backend = Backend::new();
    let seed = seed_demo(&backend, today, &config.catalog.default_currency)?;
    let reservations = backend.reservations();

    println!("== ImmoKey demo ==");
    println!(
        "Establishment: {} (slug {})",
        seed.establishment.name, seed.establishment.slug
    );
    for room in &seed.rooms {
        println!(
            "  {}  {} at {}/night [{}]",
            room.id, room.name, room.price_per_night, room.currency
        );
    }

    let baobab = &seed.rooms[0];
    println!();
    println!("== Availability ==");

    // The seeded stay on Chambre Baobab ten days back still holds its range.
    let taken_from = today - Duration::days(10);
    let taken_until = taken_from + Duration::days(2);
    match reservations.quote(&baobab.id, taken_from, taken_until) {
        Ok(_) => println!("unexpected: overlapping range was quoted as free"),
        Err(error) => println!(
            "{} to {} on {}: {}",
            taken_from, taken_until, baobab.name, error
        ),
    }

    let turnover_until = taken_until + Duration::days(3);
    let quote = reservations.quote(&baobab.id, taken_until, turnover_until)?;
    println!(
        "{} to {} on {}: {} nights for {} {} (same-day turnover)",
        taken_until, turnover_until, baobab.name, quote.nights, quote.total, quote.currency
    );

    println!();
    let report = backend.revenue().report(
        &AuthContext::authenticated(DEMO_OWNER),
        granularity,
        None,
        today,
    )?;
    render_revenue_report(&report);

    let captures = backend.payments.captures();
    println!();
    println!("== Payments ==");
    for capture in captures {
        println!(
            "  {}  {} {}",
            capture.reference, capture.amount, capture.currency
        );
    }

    Ok(())
}

fn render_revenue_report(report: &immokey::hospitality::revenue::views::RevenueReportView) {
    println!(
        "== Revenue ({}) {} to {} ==",
        report.granularity_label, report.window_start, report.window_end
    );
    if report.points.is_empty() {
        println!("  no paid bookings in the window");
    }
    for point in &report.points {
        println!(
            "  {:<10} {:>12}  {} booking(s)",
            point.bucket, point.revenue, point.bookings
        );
    }
    println!(
        "  total {}  average {:.0}  growth {:+.1}%",
        report.total_revenue, report.average_per_bucket, report.growth_pct
    );
}
